//! Share values bound to the context that can open and operate on them.
//!
//! A [Share] carries its owning [Context] directly rather than being a dynamically created
//! per-context subtype: arithmetic is just methods on the value, and operations that need a
//! sub-protocol (multiplication, inversion, comparison) consult the context's mixin table.

use crate::{context::Context, errors::ContextError, mixins};
use math_lib::GF;
use std::sync::Arc;

/// A single party's evaluation `v_i = P(x_i)` of a degree-bounded secret-sharing polynomial.
#[derive(Clone)]
pub struct Share {
    pub(crate) value: GF,
    pub(crate) degree: usize,
    pub(crate) context: Arc<Context>,
}

impl Share {
    /// Wraps a raw field element as a share of the given degree, bound to `context`.
    pub fn new(value: GF, degree: usize, context: Arc<Context>) -> Self {
        Self { value, degree, context }
    }

    /// A public constant, represented as a degree-0 "share" identical at every party.
    pub fn public(value: GF, context: Arc<Context>) -> Self {
        Self { value, degree: 0, context }
    }

    /// This party's raw evaluation.
    pub fn value(&self) -> &GF {
        &self.value
    }

    /// The degree this share is bound by.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The context this share belongs to.
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    fn same_context(&self, other: &Share) -> Result<(), ContextError> {
        if Arc::ptr_eq(&self.context, &other.context) {
            Ok(())
        } else {
            Err(ContextError::InvalidOperand("shares belong to different contexts".into()))
        }
    }

    /// Local, non-interactive addition: `[x]+[y]`. The result's degree is the larger of the
    /// two operands' (summing a public constant and a degree-`t` share stays degree `t`).
    pub fn add(&self, other: &Share) -> Result<Share, ContextError> {
        self.same_context(other)?;
        Ok(Share { value: &self.value + &other.value, degree: self.degree.max(other.degree), context: self.context.clone() })
    }

    /// Local, non-interactive subtraction: `[x]-[y]`.
    pub fn sub(&self, other: &Share) -> Result<Share, ContextError> {
        self.same_context(other)?;
        Ok(Share { value: &self.value - &other.value, degree: self.degree.max(other.degree), context: self.context.clone() })
    }

    /// Local negation: `-[x]`.
    pub fn neg(&self) -> Share {
        Share { value: -&self.value, degree: self.degree, context: self.context.clone() }
    }

    /// Local scaling by a public constant: `c * [x]`.
    pub fn scale(&self, c: &GF) -> Share {
        Share { value: c * &self.value, degree: self.degree, context: self.context.clone() }
    }

    /// Opens this share, reconstructing the secret it encodes.
    pub async fn open(&self) -> Result<GF, ContextError> {
        self.context.open_single(self.value.clone(), self.degree).await
    }

    /// `[x]*[y] = [xy]`, via the installed `MultiplyShare` Beaver protocol.
    pub async fn mul(&self, other: &Share) -> Result<Share, ContextError> {
        self.same_context(other)?;
        mixins::multiply::multiply(self, other).await
    }

    /// `[x]^-1 = [1/x]`, via the installed `InvertShare` protocol. Fails with
    /// [ContextError::InvalidOperand] if the opened mask happens to be zero; the caller may
    /// simply retry, since a fresh preprocessed `r` is drawn on each call.
    pub async fn invert(&self) -> Result<Share, ContextError> {
        mixins::invert::invert(self).await
    }

    /// `[x]/[y] = [x * y^-1]`, via the installed `DivideShares` protocol.
    pub async fn div(&self, other: &Share) -> Result<Share, ContextError> {
        self.same_context(other)?;
        mixins::divide::divide(self, other).await
    }

    /// `[x] == [y]`, opening to `1` iff equal, with error probability `<= 2^-k`.
    pub async fn equals(&self, other: &Share, k: usize) -> Result<Share, ContextError> {
        self.same_context(other)?;
        mixins::equality::equality(self, other, k).await
    }

    /// `[x] < [y]`, opening to `1` iff `x < y`. Requires `2x+1 < p` and `2y+1 < p`.
    pub async fn less_than(&self, other: &Share) -> Result<Share, ContextError> {
        self.same_context(other)?;
        mixins::less_than::less_than(self, other).await
    }
}

/// An ordered sequence of shares of a common degree, opened together as a single batch.
#[derive(Clone)]
pub struct ShareArray {
    shares: Vec<Share>,
}

impl ShareArray {
    /// Wraps a vector of shares as a batch. Does not itself enforce a common degree; mixins
    /// that need one derive it as the maximum across the array's elements.
    pub fn new(shares: Vec<Share>) -> Self {
        Self { shares }
    }

    /// The shares making up this array.
    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// The number of shares in this array.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether this array is empty.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    fn degree(&self) -> usize {
        self.shares.iter().map(Share::degree).max().unwrap_or(0)
    }

    fn same_length(&self, other: &ShareArray) -> Result<(), ContextError> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(ContextError::InvalidOperand(format!(
                "share array length mismatch: {} vs {}",
                self.len(),
                other.len()
            )))
        }
    }

    /// Opens the whole batch at once, equivalent to (but cheaper than) opening each element.
    pub async fn open(&self) -> Result<Vec<GF>, ContextError> {
        let Some(first) = self.shares.first() else { return Ok(Vec::new()) };
        let degree = self.degree();
        let values = self.shares.iter().map(|s| s.value.clone()).collect();
        first.context.open_batch(values, degree).await
    }

    /// Elementwise local addition.
    pub fn add(&self, other: &ShareArray) -> Result<ShareArray, ContextError> {
        self.same_length(other)?;
        let shares =
            self.shares.iter().zip(other.shares.iter()).map(|(a, b)| a.add(b)).collect::<Result<Vec<_>, _>>()?;
        Ok(ShareArray { shares })
    }

    /// Elementwise local subtraction.
    pub fn sub(&self, other: &ShareArray) -> Result<ShareArray, ContextError> {
        self.same_length(other)?;
        let shares =
            self.shares.iter().zip(other.shares.iter()).map(|(a, b)| a.sub(b)).collect::<Result<Vec<_>, _>>()?;
        Ok(ShareArray { shares })
    }

    /// `MultiplyShareArray`: elementwise product, batching the two Beaver openings.
    pub async fn mul(&self, other: &ShareArray) -> Result<ShareArray, ContextError> {
        self.same_length(other)?;
        mixins::multiply::multiply_array(self, other).await
    }

    /// `InvertShareArray`: elementwise inverse, batching the opening.
    pub async fn invert(&self) -> Result<ShareArray, ContextError> {
        mixins::invert::invert_array(self).await
    }

    /// `DivideShareArrays`: elementwise division, batching both openings.
    pub async fn div(&self, other: &ShareArray) -> Result<ShareArray, ContextError> {
        self.same_length(other)?;
        mixins::divide::divide_array(self, other).await
    }
}
