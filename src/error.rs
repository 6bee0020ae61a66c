use thiserror::Error;

/// Errors returned by the filter constructors and mutation paths that can
/// fail without ever touching a bucket.
///
/// Filter-full (relocation exhausted `MAX_KICKS`) is deliberately *not* a
/// variant here: the reference implementation treats it as an ordinary
/// (if unwelcome) return value, not an exception, so callers see it through
/// `BsOutcome::NotAdded` / `Ok(false)` instead of an `Err`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuckooError {
    /// `new`/`with_seed` was called with `items <= 4`.
    #[error("items must be greater than 4, got {0}")]
    CapacityTooSmall(usize),

    /// A policy input argument fell outside its documented range.
    #[error("argument `{name}` out of range: {value} (expected {expected})")]
    ArgumentOutOfRange {
        name: &'static str,
        value: u32,
        expected: &'static str,
    },

    /// `fromstring` was called with a blob whose length doesn't match the
    /// filter's exact on-wire size.
    #[error("fromstring() found {found} bytes, expected {expected}")]
    LengthMismatch { found: usize, expected: usize },
}
