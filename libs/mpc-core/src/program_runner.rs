//! Sets up a fixed-size party set and runs one or more programs against it, each program
//! getting its own [Context] per party sharing a program id, over a shared in-process router.

use crate::{
    context::{Context, DebugChecks, MixinTable},
    errors::ContextError,
    router::{Router, SimpleRouter},
};
use cryptography::ElementSource;
use math_lib::{sequential_points, GF};
use std::{future::Future, sync::Arc};
use tokio::task::JoinHandle;

/// Runs MPC programs across an in-process party set.
///
/// Every call to [ProgramRunner::add] spawns `n` tasks, one per party, each running `program`
/// against its own [Context]; the program id increments on each call so concurrently running
/// programs never cross messages meant for a different one. Collect results with
/// [ProgramRunner::join].
pub struct ProgramRunner<T> {
    n: usize,
    t: usize,
    points: Vec<GF>,
    routers: Vec<Arc<dyn Router>>,
    mixins: MixinTable,
    debug_checks: DebugChecks,
    faulty_parties: Vec<usize>,
    next_pid: u64,
    tasks: Vec<JoinHandle<Result<T, ContextError>>>,
}

impl<T: Send + 'static> ProgramRunner<T> {
    /// Builds a runner for `n` parties tolerating `t` faults, with every mixin installed and
    /// debug checks disabled; evaluation points default to [sequential_points].
    pub fn new(n: usize, t: usize) -> Self {
        let routers = SimpleRouter::network(n).into_iter().map(|router| Arc::new(router) as Arc<dyn Router>).collect();
        Self {
            n,
            t,
            points: sequential_points(n),
            routers,
            mixins: MixinTable::all(),
            debug_checks: DebugChecks::Disabled,
            faulty_parties: Vec::new(),
            next_pid: 0,
            tasks: Vec::new(),
        }
    }

    /// Overrides the default evaluation points.
    pub fn with_points(mut self, points: Vec<GF>) -> Self {
        self.points = points;
        self
    }

    /// Overrides the default (fully-installed) mixin table, e.g. to exercise
    /// [ContextError::MixinNotInstalled].
    pub fn with_mixins(mut self, mixins: MixinTable) -> Self {
        self.mixins = mixins;
        self
    }

    /// Enables or disables the `LessThan` re-derivation debug checks.
    pub fn with_debug_checks(mut self, debug_checks: DebugChecks) -> Self {
        self.debug_checks = debug_checks;
        self
    }

    /// Marks the given party indices as faulty: their outgoing single-share openings get a
    /// random substitute instead of the true value (§4.4's fault injection hook), for boundary
    /// tests like "reconstruction still succeeds with exactly `t` faulty parties".
    pub fn with_faulty_parties(mut self, faulty_parties: Vec<usize>) -> Self {
        self.faulty_parties = faulty_parties;
        self
    }

    /// Adds a program to run once across every party, each getting its own preprocessing
    /// supply from `preprocessing(my_id)`.
    pub fn add<F, Fut, P>(&mut self, preprocessing: P, program: F)
    where
        F: Fn(Arc<Context>) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Result<T, ContextError>> + Send + 'static,
        P: Fn(usize) -> Box<dyn ElementSource + Send>,
    {
        let pid = self.next_pid;
        self.next_pid += 1;
        for my_id in 0..self.n {
            let context = Context::new_with_faults(
                b"sid".to_vec(),
                self.n,
                self.t,
                my_id,
                pid,
                self.points.clone(),
                self.routers[my_id].clone(),
                preprocessing(my_id),
                self.mixins.clone(),
                self.debug_checks,
                self.faulty_parties.contains(&my_id),
            );
            let program = program.clone();
            self.tasks.push(tokio::spawn(async move {
                let result = program(context.clone()).await;
                context.shutdown().await;
                result
            }));
        }
    }

    /// Awaits every spawned task and returns each party's result, indexed by party id.
    ///
    /// Fails on the first party whose task panicked or whose program returned an error.
    pub async fn join(self) -> Result<Vec<T>, ContextError> {
        let mut results = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            let result = task.await.map_err(|_| ContextError::BackgroundLoopExited)?;
            results.push(result?);
        }
        Ok(results)
    }
}
