//! Fixed-capacity cuckoo filters with per-key payloads and update-in-place
//! semantics.
//!
//! This crate implements two concrete filter policies on top of one shared
//! cuckoo-hashing substrate:
//!
//! - [`BrokenSessionsFilter`]: tracks the highest contiguous session counter
//!   seen per key, plus a sliding window of out-of-order counters.
//! - [`ExecutiveReportFilter`]: tracks a country/channel/OS classification
//!   and a day-of-week activity bitmap per key, with a destructive
//!   aggregation pass into a caller-supplied report sink.
//!
//! Both policies share sizing, hashing, the insert/relocate protocol, and
//! the textual serialize/fromstring codec from [`filter::CuckooFilter`],
//! parameterized by the [`payload::Payload`] trait.
//!
//! The hash kernel (xxHash32, seed 1) and the on-wire bucket layout are
//! fixed, not pluggable: both are part of the interoperable serialized
//! format, which is native-endian and therefore only portable between hosts
//! sharing endianness.

mod bucket;
pub mod error;
mod filter;
mod hash;
mod payload;

pub mod broken_sessions;
pub mod executive_report;

pub use broken_sessions::{BrokenSessionsFilter, BsOutcome, BsPayload};
pub use error::CuckooError;
pub use executive_report::{group_key, ErPayload, ExecutiveReportFilter, ReportSink};
pub use filter::{CuckooFilter, MAX_KICKS};
pub use payload::Payload;

mod serialize;
