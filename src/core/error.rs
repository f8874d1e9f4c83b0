//! Codec Errors
//!
//! Malformed board values. Raised by the codec before any simulation runs.

use thiserror::Error;

/// Errors from reading or writing packed board fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Tile index is not in `0..16`.
    #[error("tile index {index} out of range")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
    },

    /// Exponent exceeds the largest representable tile.
    #[error("tile exponent {exponent} out of range (max {max})")]
    ExponentOutOfRange {
        /// Offending exponent.
        exponent: u8,
        /// Largest accepted exponent.
        max: u8,
    },
}
