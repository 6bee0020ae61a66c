//! The payload-capability abstraction that lets one generic filter
//! substrate (`crate::filter::CuckooFilter`) serve both policies.
//!
//! A `Payload` is the per-slot side data a filter stores next to a
//! fingerprint. The filter core never interprets the payload itself. All
//! policy-specific merge and persistence logic is supplied through this
//! trait.

/// Per-slot payload shape plus the merge/init/codec hooks a policy needs.
///
/// `Outcome` is the value the policy's `add` returns to its caller (BS
/// returns a 7-way status code, ER returns a plain `bool`), so it is left as
/// an associated type rather than hardcoded.
pub trait Payload: Copy + Default {
    type Outcome: Copy;

    /// Exact on-wire size of one payload, in bytes. Must match
    /// `write_bytes`/`read_bytes` exactly. This is the number baked into the
    /// filter's `bytes()` arithmetic and the persisted format.
    const PAYLOAD_BYTES: usize;

    /// Invoked when a slot already holds the fingerprint being inserted.
    /// `incoming` is the freshly-constructed payload for this call, or, in
    /// the middle of a cuckoo relocation chain, the evicted entry's own
    /// payload. See `CuckooFilter::add`.
    fn on_match_update(stored: &mut Self, incoming: &Self) -> Self::Outcome;

    /// Invoked exactly when a payload is placed into a previously-empty
    /// slot via `Bucket::add` (fresh insert, or relocation landing in an
    /// empty alternate slot). Not invoked for the raw overwrite used while
    /// evicting a slot mid-relocation.
    fn on_insert_init(incoming: Self) -> Self;

    /// Outcome reported for a fresh placement (`Bucket::add` succeeded).
    fn fresh_outcome() -> Self::Outcome;

    /// Outcome reported when relocation exhausts `MAX_KICKS`.
    fn failed_outcome() -> Self::Outcome;

    fn write_bytes(&self, out: &mut Vec<u8>);
    fn read_bytes(buf: &[u8]) -> Self;
}
