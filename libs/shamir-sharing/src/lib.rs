//! Robust and batch reconstruction of Shamir-shared secrets over [math_lib::GF].

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod batch;
pub mod errors;
pub mod robust;

pub use batch::BatchReconstructor;
pub use errors::{BatchError, ReconstructError};
pub use robust::{RobustReconstructor, ReconstructOutcome};
