//! `InvertShare`/`InvertShareArray`: masked-opening inversion.

use crate::{
    context::{require_mixin, MixinName},
    errors::ContextError,
    mixins::multiply,
    share::{Share, ShareArray},
};

/// `[x]^-1 = [1/x]`: consume `[r]`, open `xr`, return `r / (xr)`.
///
/// Retries with a fresh `r` if the opened mask happens to be zero, per the recovery policy
/// for this mixin: that condition occurs with negligible probability and is not itself an
/// error in the protocol.
pub async fn invert(x: &Share) -> Result<Share, ContextError> {
    let context = x.context.clone();
    require_mixin(&context.mixins, MixinName::Invert)?;
    loop {
        let r = context.next_rand().await?;
        let r_share = Share::new(r, context.t, context.clone());
        let xr_share = multiply::multiply(x, &r_share).await?;
        let xr = xr_share.open().await?;
        if xr.is_zero() {
            continue;
        }
        let xr_inv = xr.inverse().map_err(|_| ContextError::InvalidOperand("mask product not invertible".into()))?;
        return Ok(r_share.scale(&xr_inv));
    }
}

/// Elementwise inversion, batching the masked opening across the array.
///
/// Unlike the single-share form, a zero mask anywhere in the batch fails the whole call
/// rather than retrying just that element, since the batch open is already committed to one
/// round; the caller may retry the entire array with fresh preprocessing.
pub async fn invert_array(x: &ShareArray) -> Result<ShareArray, ContextError> {
    if x.is_empty() {
        return Ok(ShareArray::new(Vec::new()));
    }
    let context = x.shares()[0].context.clone();
    require_mixin(&context.mixins, MixinName::InvertArray)?;

    let m = x.len();
    let mut r_shares = Vec::with_capacity(m);
    for _ in 0..m {
        r_shares.push(Share::new(context.next_rand().await?, context.t, context.clone()));
    }
    let r_array = ShareArray::new(r_shares.clone());
    let xr_values = multiply::multiply_array(x, &r_array).await?.open().await?;

    let mut results = Vec::with_capacity(m);
    for (r_share, xr) in r_shares.iter().zip(xr_values.iter()) {
        if xr.is_zero() {
            return Err(ContextError::InvalidOperand("mask product not invertible in batch inversion".into()));
        }
        let xr_inv = xr.inverse().map_err(|_| ContextError::InvalidOperand("mask product not invertible".into()))?;
        results.push(r_share.scale(&xr_inv));
    }
    Ok(ShareArray::new(results))
}
