//! `DivideShares`/`DivideShareArrays`: division as multiplication by the inverse.

use crate::{
    context::{require_mixin, MixinName},
    errors::ContextError,
    mixins::{invert, multiply},
    share::{Share, ShareArray},
};

/// `[x]/[y] = [x * y^-1]`.
pub async fn divide(x: &Share, y: &Share) -> Result<Share, ContextError> {
    require_mixin(&x.context.mixins, MixinName::Divide)?;
    let y_inv = invert::invert(y).await?;
    multiply::multiply(x, &y_inv).await
}

/// Elementwise `[x_i]/[y_i]`.
pub async fn divide_array(x: &ShareArray, y: &ShareArray) -> Result<ShareArray, ContextError> {
    let context = x
        .shares()
        .first()
        .ok_or_else(|| ContextError::InvalidOperand("cannot divide an empty share array".into()))?
        .context
        .clone();
    require_mixin(&context.mixins, MixinName::DivideArray)?;
    let y_inv = invert::invert_array(y).await?;
    multiply::multiply_array(x, &y_inv).await
}
