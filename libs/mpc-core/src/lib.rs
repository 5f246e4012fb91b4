//! Per-party MPC runtime core: contexts, shares, and the arithmetic/comparison sub-protocols
//! that operate on them over a router and a preprocessing element supply.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod context;
pub mod errors;
pub mod mixins;
pub mod program_runner;
pub mod router;
pub mod share;
pub mod share_manager;

pub use context::{Context, DebugChecks, MixinName, MixinTable};
pub use errors::ContextError;
pub use program_runner::ProgramRunner;
pub use router::{Envelope, Router, RouterError, SimpleRouter, Tag};
pub use share::{Share, ShareArray};
