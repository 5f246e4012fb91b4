//! Wires a loaded [config::Config] to a running party: builds the router and preprocessing
//! supply the configuration calls for, runs the configured demonstration program, and returns
//! its opened result so `main` can turn it into an exit code.

pub mod config;
pub mod program;
pub mod router;

use anyhow::Context as _;
use cryptography::{BeaverTriple, ElementSource, FileSource, InMemorySource};
use math_lib::{sequential_points, GF};
use mpc_core::{Context, ContextError, MixinTable, Router, SimpleRouter};
use std::sync::Arc;

pub use config::Config;

/// How many of each preprocessing element kind [preprocessing_source] stocks a demo run with;
/// comfortably more than any of the [program::RunId] demonstration programs consume in one run.
const DEMO_SUPPLY: usize = 4096;

/// The bit-share value [preprocessing_source] stocks a demo run's `next_bit` supply with.
///
/// `ShareEquality`'s "equal" legendre class only comes out to `1` when the drawn bit is `1`
/// ([crate::program]'s own tests rely on the same choice); `ShareLessThan` collapses to its
/// `c0`-only fast path precisely when the drawn bit is `0`. A demo run only ever exercises one
/// program, so the supply is tailored to whichever one was requested rather than split down the
/// middle.
fn demo_bit_value(run_id: program::RunId) -> GF {
    match run_id {
        program::RunId::Equality => GF::one(),
        _ => GF::zero(),
    }
}

/// Builds the preprocessing supply for `my_id`: the on-disk [FileSource] laid out under
/// `preprocessing_dir`, or, when `skip_preprocessing` is set, a canned [InMemorySource] stocked
/// with zero-valued elements and the trivial `(0, 0, 0)` Beaver triple. That triple still makes
/// multiplication come out correctly (`d*e = (x-0)*(y-0) = x*y` when `a = b = c = 0`), so a demo
/// run gets the right answer without ever touching disk; it only gives up the privacy a real
/// random triple would provide, which a demo run never needed in the first place.
fn preprocessing_source(config: &Config, run_id: program::RunId, my_id: usize) -> anyhow::Result<Box<dyn ElementSource + Send>> {
    if config.skip_preprocessing {
        let source = InMemorySource::new()
            .with_zeros(vec![GF::zero(); DEMO_SUPPLY])
            .with_rands(vec![GF::from_u64(7); DEMO_SUPPLY])
            .with_bits(vec![demo_bit_value(run_id); DEMO_SUPPLY])
            .with_triples(vec![BeaverTriple::new(GF::zero(), GF::zero(), GF::zero()); DEMO_SUPPLY]);
        return Ok(Box::new(source));
    }
    let source = FileSource::open(&config.preprocessing_dir, config.n, config.t, my_id)
        .with_context(|| format!("loading preprocessing for party {my_id} from {}", config.preprocessing_dir.display()))?;
    Ok(Box::new(source))
}

/// Runs every party in this one process over an in-memory router, for `config.peers.is_empty()`
/// deployments (demos and integration tests, never an honest multi-party run since every
/// party's secret state lives in the same address space).
async fn run_in_process(config: &Config) -> anyhow::Result<GF> {
    let run_id = program::RunId::parse(config.extras.get("run_id").map(String::as_str).unwrap_or("open_zero"))?;
    let points = sequential_points(config.n);
    let routers = SimpleRouter::network(config.n);
    let mut tasks = Vec::with_capacity(config.n);
    for (my_id, router) in routers.into_iter().enumerate() {
        let preprocessing = preprocessing_source(config, run_id, my_id)?;
        let context = Context::new(
            b"node".to_vec(),
            config.n,
            config.t,
            my_id,
            0,
            points.clone(),
            Arc::new(router) as Arc<dyn Router>,
            preprocessing,
            MixinTable::all(),
            mpc_core::DebugChecks::Disabled,
        );
        let extras = config.extras.clone();
        tasks.push(tokio::spawn(async move {
            let result = program::run(run_id, &extras, context.clone()).await;
            context.shutdown().await;
            result
        }));
    }
    let mut last = None;
    for task in tasks {
        last = Some(task.await.context("party task panicked")??);
    }
    last.ok_or_else(|| anyhow::anyhow!("no parties configured"))
}

/// Runs this single party against its configured peers, for `!config.peers.is_empty()`
/// deployments. [router::NetworkRouter] always fails with [ContextError::PeerUnreachable] since
/// real peer-to-peer transport isn't implemented here.
async fn run_networked(config: &Config, node_id: usize) -> anyhow::Result<GF> {
    let run_id = program::RunId::parse(config.extras.get("run_id").map(String::as_str).unwrap_or("open_zero"))?;
    let points = sequential_points(config.n);
    let preprocessing = preprocessing_source(config, run_id, node_id)?;
    let router = Arc::new(router::NetworkRouter::new(config.peers.clone())) as Arc<dyn Router>;
    let context = Context::new(
        b"node".to_vec(),
        config.n,
        config.t,
        node_id,
        0,
        points,
        router,
        preprocessing,
        MixinTable::all(),
        mpc_core::DebugChecks::Disabled,
    );
    let result = program::run(run_id, &config.extras, context.clone()).await;
    context.shutdown().await;
    Ok(result?)
}

/// Runs `node_id`'s configured program to completion, dispatching on whether `config.peers` is
/// populated.
pub async fn run(config: &Config, node_id: usize) -> anyhow::Result<GF> {
    config.check_node_id(node_id)?;
    if config.peers.is_empty() {
        run_in_process(config).await
    } else {
        run_networked(config, node_id).await
    }
}

/// Maps a failed run's error to the process exit code it should produce, per the documented
/// exit-code contract: reconstruction failures, configuration/IO failures and unreachable peers
/// each get their own code so a caller scripting this binary can branch on what went wrong.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(context_error) = error.downcast_ref::<ContextError>() {
        return match context_error {
            ContextError::ReconstructionFailed { .. } | ContextError::BatchReconstructionFailed { .. } => 1,
            ContextError::PeerUnreachable(_) => 3,
            _ => 2,
        };
    }
    // `config::ConfigError` here is the `config` crate's type; this module's own `config`
    // (the local `node::config`) shadows the crate name, so it's addressed by absolute path.
    if error.downcast_ref::<::config::ConfigError>().is_some() {
        return 2;
    }
    2
}
