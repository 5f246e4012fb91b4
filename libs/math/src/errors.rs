//! Crate errors.

use thiserror::Error;

/// Division by zero.
#[derive(Error, Debug, Eq, PartialEq, Clone, Copy)]
#[error("division by zero")]
pub struct DivByZero;

/// Polynomial error.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum PolynomialError {
    /// Division by zero.
    #[error("division by zero")]
    DivByZero,

    /// A coefficient index was out of bounds.
    #[error("polynomial coefficient not found")]
    CoefficientNotFound,
}

impl From<DivByZero> for PolynomialError {
    fn from(_: DivByZero) -> Self {
        Self::DivByZero
    }
}

/// Interpolation failure.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum InterpolationError {
    /// Division by zero.
    #[error("division by zero")]
    DivByZero,

    /// Empty point sequence.
    #[error("empty point sequence")]
    EmptySequence,

    /// Two points shared the same abscissa.
    #[error("degenerate input: duplicate abscissa")]
    DegenerateInputs,

    /// A polynomial operation failed.
    #[error("polynomial error: {0}")]
    Polynomial(#[from] PolynomialError),
}

impl From<DivByZero> for InterpolationError {
    fn from(_: DivByZero) -> Self {
        Self::DivByZero
    }
}

/// Berlekamp-Welch / Gao decoding failure.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum DecodeError {
    /// Too many errors to recover a degree-bounded polynomial.
    #[error("unrecoverable: too many errors to decode")]
    Unrecoverable,

    /// The point sequence was empty.
    #[error("empty point sequence")]
    EmptySequence,

    /// The point sequence had duplicate abscissas.
    #[error("point sequence has duplicate abscissas")]
    HasDuplicates,

    /// An interpolation step failed.
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    /// A polynomial operation failed.
    #[error(transparent)]
    Polynomial(#[from] PolynomialError),
}

/// No valid evaluation point set could be constructed for the requested size.
#[derive(Error, Debug, Eq, PartialEq, Clone)]
pub enum EvalPointError {
    /// The field has no subgroup of the requested (rounded-up) power-of-two size.
    #[error("field has no 2-adic subgroup of size {0}")]
    NoSubgroup(u64),

    /// Too many points were requested relative to the field size.
    #[error("too many points requested")]
    TooManyPoints,
}
