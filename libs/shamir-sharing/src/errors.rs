//! Reconstruction errors.

use thiserror::Error;

/// Single-share robust reconstruction could not agree on a degree-bounded polynomial.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    /// The party index referenced by an incoming share is outside `[0, n)`.
    #[error("unknown party index {0}")]
    UnknownParty(usize),

    /// No degree-`t` polynomial was consistent with enough of the received shares.
    #[error("reconstruction failed, suspect parties: {error_positions:?}")]
    ReconstructionFailed {
        /// Party indices whose shares could not be reconciled with the recovered polynomial.
        error_positions: Vec<usize>,
    },

    /// An interpolation or decoding step failed outright (e.g. malformed input).
    #[error(transparent)]
    Math(#[from] math_lib::DecodeError),
}

impl From<math_lib::InterpolationError> for ReconstructError {
    fn from(value: math_lib::InterpolationError) -> Self {
        Self::Math(math_lib::DecodeError::Interpolation(value))
    }
}

/// Batch reconstruction could not recover all items.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The party index referenced by an incoming row is outside `[0, n)`.
    #[error("unknown party index {0}")]
    UnknownParty(usize),

    /// A party's row did not carry exactly `m` values.
    #[error("malformed batch row: expected {expected} values, got {actual}")]
    MalformedRow {
        /// The batch size agreed for this opening.
        expected: usize,
        /// The number of values actually received.
        actual: usize,
    },

    /// At least one of the `m` items could not be reconstructed.
    #[error("batch reconstruction failed for item {item}")]
    BatchReconstructionFailed {
        /// Index, within the batch, of the item that failed.
        item: usize,
        /// The underlying per-item reconstruction error.
        #[source]
        source: ReconstructError,
    },
}
