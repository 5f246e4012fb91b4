//! The demonstration programs a node can be configured to run, selected by the `run_id` extra
//! in its configuration file. Each one exercises one corner of the online protocol end to end
//! against whatever preprocessing and router the caller wired up.

use math_lib::GF;
use mpc_core::{Context, ContextError, Share};
use std::{collections::HashMap, sync::Arc};

/// Which demonstration program to run, as named by the `extras.run_id` configuration value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunId {
    /// Opens a fresh zero-share offset by a public constant; exercises plain single-share
    /// reconstruction with no arithmetic sub-protocol involved.
    OpenZero,
    /// Multiplies two public values via a consumed Beaver triple.
    Multiply,
    /// Inverts a random share and opens the product with itself, which must equal one.
    Invert,
    /// Runs the equality sub-protocol on two public operands.
    Equality,
    /// Runs the less-than sub-protocol on two public operands.
    LessThan,
}

impl RunId {
    /// Parses a `run_id` extra; unrecognized values are reported as invalid operands so the
    /// caller gets a config-shaped error instead of a panic.
    pub fn parse(value: &str) -> Result<Self, ContextError> {
        match value {
            "open_zero" => Ok(RunId::OpenZero),
            "multiply" => Ok(RunId::Multiply),
            "invert" => Ok(RunId::Invert),
            "equality" => Ok(RunId::Equality),
            "less_than" => Ok(RunId::LessThan),
            other => Err(ContextError::InvalidOperand(format!("unknown run_id {other:?}"))),
        }
    }
}

/// Reads `key` out of `extras` as a `u64`, falling back to `default` when absent or unparsable.
fn extra_u64(extras: &HashMap<String, String>, key: &str, default: u64) -> u64 {
    extras.get(key).and_then(|value| value.parse().ok()).unwrap_or(default)
}

/// Runs `run_id` to completion against `context`, returning the opened result.
pub async fn run(run_id: RunId, extras: &HashMap<String, String>, context: Arc<Context>) -> Result<GF, ContextError> {
    match run_id {
        RunId::OpenZero => {
            let offset = GF::from_u64(extra_u64(extras, "value", 0));
            let zero = context.next_zero().await?;
            Share::new(zero, context.t, context.clone()).add(&Share::public(offset, context.clone()))?.open().await
        }
        RunId::Multiply => {
            let x = Share::public(GF::from_u64(extra_u64(extras, "x", 0)), context.clone());
            let y = Share::public(GF::from_u64(extra_u64(extras, "y", 0)), context.clone());
            x.mul(&y).await?.open().await
        }
        RunId::Invert => {
            let r = context.next_rand().await?;
            let r_share = Share::new(r, context.t, context.clone());
            let inverse = r_share.invert().await?;
            r_share.mul(&inverse).await?.open().await
        }
        RunId::Equality => {
            let k = extra_u64(extras, "k", mpc_core::mixins::equality::DEFAULT_SECURITY as u64) as usize;
            let x = Share::public(GF::from_u64(extra_u64(extras, "x", 0)), context.clone());
            let y = Share::public(GF::from_u64(extra_u64(extras, "y", 0)), context.clone());
            x.equals(&y, k).await?.open().await
        }
        RunId::LessThan => {
            let x = Share::public(GF::from_u64(extra_u64(extras, "x", 0)), context.clone());
            let y = Share::public(GF::from_u64(extra_u64(extras, "y", 0)), context.clone());
            x.less_than(&y).await?.open().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptography::{BeaverTriple, InMemorySource};
    use mpc_core::ProgramRunner;

    #[tokio::test]
    async fn open_zero_adds_the_configured_offset() {
        let mut extras = HashMap::new();
        extras.insert("value".to_string(), "9".to_string());
        let mut runner = ProgramRunner::<GF>::new(3, 1);
        runner.add(
            |_| Box::new(InMemorySource::new().with_zeros([GF::zero()])),
            move |context: Arc<Context>| {
                let extras = extras.clone();
                async move { run(RunId::OpenZero, &extras, context).await }
            },
        );
        for result in runner.join().await.unwrap() {
            assert_eq!(result, GF::from_u64(9));
        }
    }

    #[tokio::test]
    async fn multiply_uses_the_consumed_triple() {
        let mut extras = HashMap::new();
        extras.insert("x".to_string(), "6".to_string());
        extras.insert("y".to_string(), "7".to_string());
        let triple = BeaverTriple::new(GF::from_u64(2), GF::from_u64(3), GF::from_u64(6));
        let mut runner = ProgramRunner::<GF>::new(3, 1);
        runner.add(
            move |_| Box::new(InMemorySource::new().with_triples([triple.clone()])),
            move |context: Arc<Context>| {
                let extras = extras.clone();
                async move { run(RunId::Multiply, &extras, context).await }
            },
        );
        for result in runner.join().await.unwrap() {
            assert_eq!(result, GF::from_u64(42));
        }
    }

    #[test]
    fn rejects_an_unknown_run_id() {
        assert!(matches!(RunId::parse("frobnicate"), Err(ContextError::InvalidOperand(_))));
    }
}
