//! Finite field arithmetic, polynomials and robust reconstruction primitives
//! used to build and recover Shamir secret shares.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod decoder;
pub mod errors;
pub mod eval_points;
pub mod field;
pub mod lagrange;
pub mod polynomial;

pub use decoder::{error_positions, gao_decode, Decoded};
pub use errors::{DecodeError, DivByZero, EvalPointError, InterpolationError, PolynomialError};
pub use eval_points::{fft_points, sequential_points};
pub use field::{Legendre, ENCODED_LEN, GF};
pub use lagrange::{interpolate, interpolate_at_zero};
pub use polynomial::Polynomial;
