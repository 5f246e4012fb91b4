//! `ShareEquality`: `k` independent Legendre-based trials combined by pairwise multiplication.

use crate::{
    context::{require_mixin, Context, MixinName},
    errors::ContextError,
    mixins::multiply,
    share::{Share, ShareArray},
};
use math_lib::{Legendre, GF};
use std::sync::Arc;

/// The default security parameter used when a caller doesn't pick one explicitly (e.g. via
/// [crate::context::Context::call_mixin]), giving a `2^-32` false-positive probability.
pub const DEFAULT_SECURITY: usize = 32;

/// Tests `[x] == [y]`, opening to `1` iff `x = y`, with false-positive probability `<= 2^-k`.
pub async fn equality(x: &Share, y: &Share, k: usize) -> Result<Share, ContextError> {
    if k == 0 {
        return Err(ContextError::InvalidOperand("equality security parameter k must be at least 1".into()));
    }
    let context = x.context.clone();
    require_mixin(&context.mixins, MixinName::Equality)?;

    let diff = Share::new(&x.value - &y.value, context.t, context.clone());

    let mut trials = Vec::with_capacity(k);
    for _ in 0..k {
        trials.push(equality_trial(&context, &diff).await?);
    }

    // Combine by recursive pairwise multiplication: the product of all k trial shares is 1
    // iff every trial independently returned 1, i.e. iff x = y.
    let mut layer = trials;
    while layer.len() > 1 {
        let half = layer.len() / 2;
        let left = ShareArray::new(layer[..half].to_vec());
        let right = ShareArray::new(layer[half..2 * half].to_vec());
        let mut products = left.mul(&right).await?.shares().to_vec();
        if layer.len() % 2 == 1 {
            products.push(layer[2 * half].clone());
        }
        layer = products;
    }
    Ok(layer.into_iter().next().unwrap_or_else(|| Share::public(GF::one(), context.clone())))
}

/// One Legendre trial for `diff`: retries locally on `c = 0` or `legendre(c) = 0`, both of
/// which occur only with negligible probability.
async fn equality_trial(context: &Arc<Context>, diff: &Share) -> Result<Share, ContextError> {
    loop {
        let b = context.next_bit().await?;
        let r = context.next_rand().await?;
        let r_prime = context.next_rand().await?;

        // beta = -4b + 5, so beta in {1, 5}: b flips which of the two fixed quadratic-character
        // classes (1 is always a residue, 5's character is a fixed fact about this field) c's
        // "equal" value falls into, which is what lets the opened legendre symbol distinguish
        // x = y from x != y without revealing anything else about diff.
        let beta_value = &(&GF::from_i64(-4) * &b) + &GF::from_u64(5);
        let beta_share = Share::new(beta_value.clone(), context.t, context.clone());
        let r_share = Share::new(r, context.t, context.clone());
        let r_prime_share = Share::new(r_prime, context.t, context.clone());

        let dr = multiply::multiply(diff, &r_share).await?;
        let r_prime_squared = multiply::multiply(&r_prime_share, &r_prime_share).await?;
        let beta_r_prime_squared = multiply::multiply(&beta_share, &r_prime_squared).await?;
        let c_value = &dr.value + &beta_r_prime_squared.value;
        let c = Share::new(c_value, context.t, context.clone()).open().await?;
        if c.is_zero() {
            continue;
        }

        let legendre = c.legendre();
        if legendre == Legendre::Zero {
            // c != 0 implies this never actually triggers; kept for parity with the trial's
            // documented retry conditions.
            continue;
        }
        let l = legendre.as_field_element();
        let two_inv = GF::from_u64(2).inverse().map_err(|_| ContextError::InvalidOperand("2 is not invertible".into()))?;
        let trial_value = &(&l * &two_inv) * &(&beta_value + &l);
        return Ok(Share::new(trial_value, context.t, context.clone()));
    }
}
