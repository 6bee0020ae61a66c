//! Executive-Report (ER) filter: tracks, per key, a country/channel/OS
//! classification, a "default" flag, and a 7-bit day-of-week activity
//! bitmap plus an 8th "new since last report" bit. Supports a destructive
//! aggregation pass (`report`) that folds filter state into a
//! caller-supplied table keyed by (country, channel, os).
//!
//! Grounded on `original_source/heka/plugins/fx/executive_report.c`
//! (`er_data`, `bucket_insert_lookup`, `bucket_add`, `fxer_report`).

use std::collections::HashMap;

use crate::error::CuckooError;
use crate::filter::CuckooFilter;
use crate::payload::Payload;

/// Stable public name for this filter type, part of the interoperable
/// serialization format. Not to be renamed.
pub const TYPE_TABLE: &str = "fx.executive_report";

const CHANNEL_MASK: u8 = 0b0000_0111;
const OS_SHIFT: u8 = 3;
const OS_MASK: u8 = 0b0000_0011;
const DFLT_SHIFT: u8 = 5;
const NEW_BIT: u8 = 0x80;
const DOW_MASK: u8 = 0x7F;

/// Bit-packed payload: `country` is a full byte, `channel`/`os`/`dflt` share
/// a packed byte (with the top 2 bits reserved and always zero), and `dow`
/// holds the day-of-week bitmap plus the "new" flag in bit 7.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub struct ErPayload {
    pub country: u8,
    packed: u8,
    pub dow: u8,
}

impl ErPayload {
    fn new(country: u8, channel: u8, os: u8, dflt: bool, day: u8) -> Self {
        let mut p = Self {
            country,
            packed: 0,
            dow: 1 << day,
        };
        p.set_channel(channel);
        p.set_os(os);
        p.set_dflt(dflt);
        p
    }

    pub fn channel(&self) -> u8 {
        self.packed & CHANNEL_MASK
    }

    pub fn os(&self) -> u8 {
        (self.packed >> OS_SHIFT) & OS_MASK
    }

    pub fn dflt(&self) -> bool {
        (self.packed >> DFLT_SHIFT) & 1 != 0
    }

    /// Whether this entry has been added/merged since the last `report`.
    pub fn is_new(&self) -> bool {
        self.dow & NEW_BIT != 0
    }

    fn set_channel(&mut self, v: u8) {
        self.packed = (self.packed & !CHANNEL_MASK) | (v & CHANNEL_MASK);
    }

    fn set_os(&mut self, v: u8) {
        self.packed = (self.packed & !(OS_MASK << OS_SHIFT)) | ((v & OS_MASK) << OS_SHIFT);
    }

    fn set_dflt(&mut self, v: bool) {
        if v {
            self.packed |= 1 << DFLT_SHIFT;
        } else {
            self.packed &= !(1 << DFLT_SHIFT);
        }
    }
}

impl Payload for ErPayload {
    type Outcome = bool;
    const PAYLOAD_BYTES: usize = 3;

    fn on_match_update(stored: &mut Self, incoming: &Self) -> bool {
        stored.country = incoming.country;
        stored.set_channel(incoming.channel());
        stored.set_os(incoming.os());
        stored.set_dflt(incoming.dflt());
        // OR-merge: bit 7 ("new") is never cleared here, only ever set by
        // `on_insert_init` or inherited from `incoming` already carrying it.
        stored.dow |= incoming.dow;
        true
    }

    fn on_insert_init(mut incoming: Self) -> Self {
        incoming.dow |= NEW_BIT;
        incoming
    }

    fn fresh_outcome() -> bool {
        true
    }

    fn failed_outcome() -> bool {
        false
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.country);
        out.push(self.packed);
        out.push(self.dow);
    }

    fn read_bytes(buf: &[u8]) -> Self {
        Self {
            country: buf[0],
            packed: buf[1],
            dow: buf[2],
        }
    }
}

/// A mutable destination for `report`'s per-group column counters.
///
/// The nine columns follow the reference's 1-indexed layout, addressed here
///0-indexed: `row[1]` actives, `row[3]` inactives, `row[4]` new, `row[5]`
/// five-of-seven, `row[6]` total, `row[8]` default. Columns 0, 2, 7 are
/// reserved by the host format and untouched by this crate.
pub trait ReportSink {
    fn row_mut(&mut self, country: u8, channel: u8, os: u8) -> Option<&mut [u64]>;
}

impl ReportSink for HashMap<(u8, u8, u8), [u64; 9]> {
    fn row_mut(&mut self, country: u8, channel: u8, os: u8) -> Option<&mut [u64]> {
        self.get_mut(&(country, channel, os)).map(|row| row.as_mut_slice())
    }
}

/// Formats the `"{country},{channel},{os}"` group key the host format uses,
/// for interop with a non-Rust report table.
pub fn group_key(country: u8, channel: u8, os: u8) -> String {
    format!("{},{},{}", country, channel, os)
}

pub struct ExecutiveReportFilter {
    inner: CuckooFilter<ErPayload>,
}

impl ExecutiveReportFilter {
    pub fn new(items: usize) -> Result<Self, CuckooError> {
        Ok(Self {
            inner: CuckooFilter::new(items)?,
        })
    }

    pub fn with_seed(items: usize, seed: u64) -> Result<Self, CuckooError> {
        Ok(Self {
            inner: CuckooFilter::with_seed(items, seed)?,
        })
    }

    /// Adds (or merges into) `key`. `channel` must be `0..=7`, `os`
    /// `0..=3`, `day` `0..=6`. Out-of-range values are rejected before the
    /// filter is touched. `Ok(false)` means relocation exhausted
    /// `MAX_KICKS`, matching the reference's plain `false` return.
    pub fn add(
        &mut self,
        key: &str,
        country: u8,
        channel: u8,
        os: u8,
        day: u8,
        dflt: bool,
    ) -> Result<bool, CuckooError> {
        if channel > 7 {
            return Err(CuckooError::ArgumentOutOfRange {
                name: "channel",
                value: channel as u32,
                expected: "0..=7",
            });
        }
        if os > 3 {
            return Err(CuckooError::ArgumentOutOfRange {
                name: "os",
                value: os as u32,
                expected: "0..=3",
            });
        }
        if day > 6 {
            return Err(CuckooError::ArgumentOutOfRange {
                name: "day",
                value: day as u32,
                expected: "0..=6",
            });
        }
        let payload = ErPayload::new(country, channel, os, dflt, day);
        Ok(self.inner.add(key.as_bytes(), payload))
    }

    pub fn query(&self, key: &str) -> bool {
        self.inner.query(key.as_bytes())
    }

    pub fn delete(&mut self, key: &str) -> bool {
        self.inner.delete(key.as_bytes())
    }

    pub fn count(&self) -> usize {
        self.inner.count()
    }

    pub fn clear(&mut self) {
        self.inner.clear()
    }

    pub fn items(&self) -> usize {
        self.inner.items()
    }

    pub fn bytes(&self) -> usize {
        self.inner.bytes()
    }

    pub fn fromstring(&mut self, cnt: usize, blob: &[u8]) -> Result<(), CuckooError> {
        self.inner.fromstring(cnt, blob)
    }

    /// Raw on-wire bucket bytes, as consumed by `fromstring`. Native-endian,
    /// not portable across architectures.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes()
    }

    pub fn serialize(&self, key_name: &str) -> String {
        self.inner.serialize(key_name, TYPE_TABLE)
    }

    /// Destructive aggregation pass: for every occupied slot whose
    /// `(country, channel, os)` group exists in `sink`, increments the
    /// appropriate columns and then clears `dow`/`dflt` for that slot.
    /// Slots whose group is absent are skipped entirely, including the
    /// clear, matching the reference's `continue` bypassing both.
    pub fn report<S: ReportSink>(&mut self, sink: &mut S) {
        for (_fp, payload) in self.inner.iter_occupied_mut() {
            let row = match sink.row_mut(payload.country, payload.channel(), payload.os()) {
                Some(row) => row,
                None => continue,
            };

            let active_mask = payload.dow & DOW_MASK;
            if active_mask != 0 {
                row[1] += 1; // col 2: actives
                if active_mask.count_ones() >= 5 {
                    row[5] += 1; // col 6: five-of-seven
                }
            } else {
                row[3] += 1; // col 4: inactives
            }
            if payload.dow & NEW_BIT != 0 {
                row[4] += 1; // col 5: new
            }
            row[6] += 1; // col 7: total
            if payload.dflt() {
                row[8] += 1; // col 9: default
            }

            payload.dow = 0;
            payload.set_dflt(false);
        }
    }
}
