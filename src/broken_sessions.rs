//! Broken-Sessions (BS) filter: tracks, per key, the highest session
//! counter observed contiguously plus an 8-bit sliding window of counters
//! seen out of order above it.
//!
//! Grounded on `original_source/heka/plugins/fx/broken_sessions.c`
//! (`bs_data`, `bucket_insert_lookup`, `fxbs_add`).

use crate::error::CuckooError;
use crate::filter::CuckooFilter;
use crate::payload::Payload;

/// Stable public name for this filter type, part of the interoperable
/// serialization format. Not to be renamed.
pub const TYPE_TABLE: &str = "fx.broken_sessions";

/// Outcome codes returned by `BrokenSessionsFilter::add`, numerically
/// identical to the reference implementation's integer return codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum BsOutcome {
    /// Relocation exhausted `MAX_KICKS`; the filter is unchanged in count
    /// (though some other entry may have been evicted and lost).
    NotAdded = -1,
    /// Fresh fingerprint, added.
    Inserted = 0,
    /// Exact next session counter; `last_consecutive` advanced (possibly
    /// collapsing part of the missing-counter window).
    FoundAndCorrect = 1,
    /// Counter arrived out of order but within the 8-wide window.
    OutOfOrder = 2,
    /// `session_cnt > 255`; the filter was not consulted.
    TooManySubsessions = 3,
    /// Counter already seen (`session_cnt <= last_consecutive`).
    Duplicate = 4,
    /// Counter arrived more than 8 past `last_consecutive`; the window
    /// was reset rather than tracked.
    TooManyMissing = 5,
}

impl BsOutcome {
    pub fn code(self) -> i8 {
        self as i8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(serde::Serialize, serde::Deserialize))]
pub struct BsPayload {
    pub last_consecutive: u8,
    pub missing: u8,
}

impl Payload for BsPayload {
    type Outcome = BsOutcome;
    const PAYLOAD_BYTES: usize = 2;

    fn on_match_update(stored: &mut Self, incoming: &Self) -> BsOutcome {
        let s = incoming.last_consecutive;
        let lc = stored.last_consecutive;
        // 8-bit wraparound subtraction, evaluated before the plain `s <= lc`
        // comparison below so a wrapped "exact next" (e.g. lc=255, s=0) is
        // recognized ahead of a false duplicate read. See SPEC_FULL.md §4.4.
        let delta = s.wrapping_sub(lc);

        if delta == 1 {
            stored.last_consecutive = s;
            if stored.missing != 0 {
                stored.missing >>= 1;
                while stored.missing & 1 == 1 {
                    stored.missing >>= 1;
                    stored.last_consecutive = stored.last_consecutive.wrapping_add(1);
                }
            }
            BsOutcome::FoundAndCorrect
        } else if s <= lc {
            BsOutcome::Duplicate
        } else if delta <= 8 {
            stored.missing |= 1 << (delta - 1);
            BsOutcome::OutOfOrder
        } else {
            stored.last_consecutive = s;
            stored.missing = 0;
            BsOutcome::TooManyMissing
        }
    }

    fn on_insert_init(incoming: Self) -> Self {
        incoming
    }

    fn fresh_outcome() -> BsOutcome {
        BsOutcome::Inserted
    }

    fn failed_outcome() -> BsOutcome {
        BsOutcome::NotAdded
    }

    fn write_bytes(&self, out: &mut Vec<u8>) {
        out.push(self.last_consecutive);
        out.push(self.missing);
    }

    fn read_bytes(buf: &[u8]) -> Self {
        Self {
            last_consecutive: buf[0],
            missing: buf[1],
        }
    }
}

pub struct BrokenSessionsFilter {
    inner: CuckooFilter<BsPayload>,
}

impl BrokenSessionsFilter {
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

    /// Adds (or updates) `key` with the given session counter.
    ///
    /// `session_cnt` is deliberately wider than the 8-bit value it
    /// represents: a value over 255 is the documented overflow case
    /// (`BsOutcome::TooManySubsessions`), and the filter is never consulted
    /// for it. The original's `fxbs_add` also computed `dflt`, `channel`,
    /// `os`, `day`, and `country` locals that went entirely unused. This
    /// port drops them rather than carrying forward a vestigial, unused
    /// contract (see DESIGN.md Open Question).
    pub fn add(&mut self, key: &str, session_cnt: u32) -> BsOutcome {
        if session_cnt > 255 {
            return BsOutcome::TooManySubsessions;
        }
        let payload = BsPayload {
            last_consecutive: session_cnt as u8,
            missing: 0,
        };
        self.inner.add(key.as_bytes(), payload)
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
}
