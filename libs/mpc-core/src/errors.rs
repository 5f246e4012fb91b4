//! The error taxonomy a running program can observe.

use cryptography::PreprocessingExhausted;
use shamir_sharing::{BatchError, ReconstructError};
use thiserror::Error;

/// Everything that can go wrong while a program drives a [crate::Context].
///
/// With the exception of the two locally-retried conditions documented on
/// [crate::mixins::equality] and [crate::mixins::invert], every variant here is fatal: it
/// propagates to the program and the context is no longer usable afterwards.
#[derive(Error, Debug, Clone)]
pub enum ContextError {
    /// Single-share reconstruction could not agree on a degree-bounded polynomial.
    #[error("reconstruction failed, suspect parties: {error_positions:?}")]
    ReconstructionFailed {
        /// Party indices whose shares could not be reconciled with the recovered polynomial.
        error_positions: Vec<usize>,
    },

    /// Batch reconstruction could not recover every item in the batch.
    #[error("batch reconstruction failed for item {item}: {source}")]
    BatchReconstructionFailed {
        /// Index, within the batch, of the item that failed.
        item: usize,
        /// The underlying per-item reconstruction error.
        source: ReconstructError,
    },

    /// A peer sent a second share for a `share_id` it had already contributed to.
    #[error("redundant share from party {src} for share_id {share_id}")]
    RedundantShare {
        /// The offending peer's party index.
        src: usize,
        /// The opening the duplicate share was addressed to.
        share_id: u64,
    },

    /// A `share_id` was used as both a single-share and a batch opening.
    #[error("share_id {share_id} used as both a single and a batch opening")]
    TagMismatch {
        /// The conflicting opening's id.
        share_id: u64,
    },

    /// The program invoked an operator whose sub-protocol was never registered.
    #[error("mixin not installed: {0}")]
    MixinNotInstalled(&'static str),

    /// The preprocessing source ran out of elements of the requested kind.
    #[error(transparent)]
    PreprocessingExhausted(#[from] PreprocessingExhausted),

    /// The background receive loop exited while the program was still running.
    #[error("background receive loop exited before the program did")]
    BackgroundLoopExited,

    /// An operand violated a precondition of the operation it was passed to (e.g. a
    /// `LessThan` operand outside the allowed range, or an array-length mismatch).
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    /// The router could not deliver a message to a peer.
    #[error("peer {0} unreachable")]
    PeerUnreachable(usize),
}

impl From<ReconstructError> for ContextError {
    fn from(value: ReconstructError) -> Self {
        match value {
            ReconstructError::ReconstructionFailed { error_positions } => {
                ContextError::ReconstructionFailed { error_positions }
            }
            // `UnknownParty`/`Math` don't carry a position list; there's no share-index to
            // report, so fold them into the same fatal variant with an empty list.
            other => {
                tracing::warn!(%other, "reconstruction failed for a reason other than suspect parties");
                ContextError::ReconstructionFailed { error_positions: vec![] }
            }
        }
    }
}

impl From<BatchError> for ContextError {
    fn from(value: BatchError) -> Self {
        match value {
            BatchError::BatchReconstructionFailed { item, source } => {
                ContextError::BatchReconstructionFailed { item, source }
            }
            BatchError::UnknownParty(p) => ContextError::InvalidOperand(format!("unknown party index {p}")),
            BatchError::MalformedRow { expected, actual } => {
                ContextError::InvalidOperand(format!("malformed batch row: expected {expected}, got {actual}"))
            }
        }
    }
}
