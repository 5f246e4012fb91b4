//! `MultiplyShare`/`MultiplyShareArray`: Beaver-triple multiplication.

use crate::{
    context::{require_mixin, MixinName},
    errors::ContextError,
    share::{Share, ShareArray},
};

/// `[x]*[y] = [xy]`: consume a triple `(a,b,ab)`, open `d=x-a` and `e=y-b` concurrently, and
/// return `d*e + d*b + e*a + ab`.
pub async fn multiply(x: &Share, y: &Share) -> Result<Share, ContextError> {
    let context = x.context.clone();
    require_mixin(&context.mixins, MixinName::Multiply)?;
    let triple = context.next_triple().await?;
    let (d, e) = triple.prepare_multiplication(&x.value, &y.value);
    let (d_open, e_open) = tokio::join!(context.open_single(d, context.t), context.open_single(e, context.t));
    let result = triple.finalize_multiplication(&d_open?, &e_open?);
    Ok(Share::new(result, context.t, context.clone()))
}

/// Elementwise `[x_i]*[y_i]`, batching both openings of the whole array into a single round.
pub async fn multiply_array(x: &ShareArray, y: &ShareArray) -> Result<ShareArray, ContextError> {
    if x.is_empty() {
        return Ok(ShareArray::new(Vec::new()));
    }
    let context = x.shares()[0].context.clone();
    require_mixin(&context.mixins, MixinName::MultiplyArray)?;

    let m = x.len();
    let mut triples = Vec::with_capacity(m);
    let mut ds = Vec::with_capacity(m);
    let mut es = Vec::with_capacity(m);
    for (xi, yi) in x.shares().iter().zip(y.shares().iter()) {
        let triple = context.next_triple().await?;
        let (d, e) = triple.prepare_multiplication(&xi.value, &yi.value);
        ds.push(d);
        es.push(e);
        triples.push(triple);
    }
    let mut combined = ds;
    combined.extend(es);
    let opened = context.open_batch(combined, context.t).await?;
    let (d_open, e_open) = opened.split_at(m);

    let shares = triples
        .iter()
        .zip(d_open.iter().zip(e_open.iter()))
        .map(|(triple, (d, e))| Share::new(triple.finalize_multiplication(d, e), context.t, context.clone()))
        .collect();
    Ok(ShareArray::new(shares))
}
