//! Preprocessed correlated randomness and the Beaver-triple multiplication primitive
//! built on top of it.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod beaver;
pub mod preprocessing;

pub use beaver::BeaverTriple;
pub use preprocessing::{
    CubeTriple, DoubleShare, ElementKind, ElementSource, FileSource, InMemorySource, PreprocessingExhausted,
    PreprocessingIoError,
};
