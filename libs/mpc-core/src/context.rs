//! The per-party context: the field, router, share manager and preprocessing
//! supply a program draws on, bound together for the lifetime of one run.

use crate::{
    errors::ContextError,
    router::Router,
    share_manager::ShareManager,
};
use cryptography::{BeaverTriple, CubeTriple, DoubleShare, ElementSource};
use math_lib::GF;
use rand::thread_rng;
use std::{collections::HashSet, sync::Arc};
use tokio::{sync::Mutex, task::JoinHandle};

/// A sub-protocol the mixin table can have installed or not.
///
/// `ShareEquality`/`ShareLessThan` are named as in §4.5 of the component design; the `Array`
/// variants cover the elementwise/batched forms of the arithmetic mixins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MixinName {
    /// `MultiplyShare`.
    Multiply,
    /// `MultiplyShareArray`.
    MultiplyArray,
    /// `InvertShare`.
    Invert,
    /// `InvertShareArray`.
    InvertArray,
    /// `DivideShares`.
    Divide,
    /// `DivideShareArrays`.
    DivideArray,
    /// `ShareEquality`.
    Equality,
    /// `ShareLessThan`.
    LessThan,
}

impl MixinName {
    /// The name as it appears in [ContextError::MixinNotInstalled].
    pub fn as_str(self) -> &'static str {
        match self {
            MixinName::Multiply => "MultiplyShare",
            MixinName::MultiplyArray => "MultiplyShareArray",
            MixinName::Invert => "InvertShare",
            MixinName::InvertArray => "InvertShareArray",
            MixinName::Divide => "DivideShares",
            MixinName::DivideArray => "DivideShareArrays",
            MixinName::Equality => "ShareEquality",
            MixinName::LessThan => "ShareLessThan",
        }
    }
}

/// The registry of sub-protocols a context has installed. Every exposed arithmetic and
/// comparison operator consults this table before running; an uninstalled mixin fails fast
/// with [ContextError::MixinNotInstalled] instead of silently doing the wrong thing.
#[derive(Clone, Debug)]
pub struct MixinTable {
    installed: HashSet<MixinName>,
}

impl MixinTable {
    /// A table with every mixin installed; the default for production contexts.
    pub fn all() -> Self {
        use MixinName::*;
        Self {
            installed: [Multiply, MultiplyArray, Invert, InvertArray, Divide, DivideArray, Equality, LessThan]
                .into_iter()
                .collect(),
        }
    }

    /// An empty table, for tests that exercise [ContextError::MixinNotInstalled].
    pub fn empty() -> Self {
        Self { installed: HashSet::new() }
    }

    /// Returns a copy of this table with `name` installed.
    pub fn with(mut self, name: MixinName) -> Self {
        self.installed.insert(name);
        self
    }

    /// Whether `name` is installed.
    pub fn is_installed(&self, name: MixinName) -> bool {
        self.installed.contains(&name)
    }
}

/// Fails fast with [ContextError::MixinNotInstalled] unless `name` is installed.
pub(crate) fn require_mixin(table: &MixinTable, name: MixinName) -> Result<(), ContextError> {
    if table.is_installed(name) {
        Ok(())
    } else {
        Err(ContextError::MixinNotInstalled(name.as_str()))
    }
}

/// Whether the `debug_checks` assertions documented in §4.7 (re-deriving opened intermediate
/// values in the `LessThan` protocol) are enabled. See [crate::mixins::less_than].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugChecks {
    /// Skip the re-derivation checks; only the protocol's actual outputs are trusted.
    Disabled,
    /// Re-derive and assert every opened intermediate value matches its expected shape.
    Enabled,
}

/// One party's view of a running program: the evaluation points, router, share manager,
/// preprocessing supply and mixin table bound together, plus the session/program identifiers
/// that distinguish this run's messages from any other sharing the same router.
pub struct Context {
    /// Session id: an opaque byte string identifying this deployment/run.
    pub sid: Vec<u8>,
    /// Total number of parties.
    pub n: usize,
    /// Tolerated-faults threshold; shares default to this degree.
    pub t: usize,
    /// This party's index, `0 <= my_id < n`.
    pub my_id: usize,
    /// Program id: distinguishes concurrent programs sharing one router.
    pub pid: u64,
    pub(crate) mixins: MixinTable,
    pub(crate) debug_checks: DebugChecks,
    points: Vec<GF>,
    router: Arc<dyn Router>,
    share_manager: ShareManager,
    preprocessing: Mutex<Box<dyn ElementSource + Send>>,
    receive_loop: Mutex<Option<JoinHandle<()>>>,
    induce_faults: bool,
}

impl Context {
    /// Builds a context and spawns its background receive loop.
    ///
    /// `points` are the `n` evaluation points assigned to parties `0..n`, in order; callers
    /// typically pass [math_lib::sequential_points].
    pub fn new(
        sid: Vec<u8>,
        n: usize,
        t: usize,
        my_id: usize,
        pid: u64,
        points: Vec<GF>,
        router: Arc<dyn Router>,
        preprocessing: Box<dyn ElementSource + Send>,
        mixins: MixinTable,
        debug_checks: DebugChecks,
    ) -> Arc<Self> {
        Self::new_with_faults(sid, n, t, my_id, pid, points, router, preprocessing, mixins, debug_checks, false)
    }

    /// As [Context::new], but additionally controls whether this party's outgoing single-share
    /// openings are corrupted with a uniformly random substitute, for robustness testing (§4.4's
    /// fault injection hook). Reconstruction must still succeed as long as no more than `t`
    /// parties in the whole run have this set.
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_faults(
        sid: Vec<u8>,
        n: usize,
        t: usize,
        my_id: usize,
        pid: u64,
        points: Vec<GF>,
        router: Arc<dyn Router>,
        preprocessing: Box<dyn ElementSource + Send>,
        mixins: MixinTable,
        debug_checks: DebugChecks,
        induce_faults: bool,
    ) -> Arc<Self> {
        let share_manager = ShareManager::new(n, points.clone());
        let context = Arc::new(Self {
            sid,
            n,
            t,
            my_id,
            pid,
            mixins,
            debug_checks,
            points,
            share_manager,
            router,
            preprocessing: Mutex::new(preprocessing),
            receive_loop: Mutex::new(None),
            induce_faults,
        });
        let handle = {
            let context = context.clone();
            tokio::spawn(async move { context.run_receive_loop().await })
        };
        // No other task can reach `context` yet, so this lock is always immediately available.
        if let Ok(mut guard) = context.receive_loop.try_lock() {
            *guard = Some(handle);
        }
        context
    }

    async fn run_receive_loop(self: Arc<Self>) {
        loop {
            match self.router.recv().await {
                Ok((src, envelope)) => self.share_manager.dispatch(src, envelope).await,
                Err(_) => break,
            }
        }
    }

    /// This party's evaluation point.
    pub fn my_point(&self) -> &GF {
        &self.points[self.my_id]
    }

    /// The `n` parties' evaluation points, indexed by party index.
    pub fn points(&self) -> &[GF] {
        &self.points
    }

    /// Opens a single degree-`degree` share to its secret.
    ///
    /// If this context has fault injection enabled, the value actually broadcast is replaced
    /// with a uniformly random field element instead of `value` — the caller's own view of the
    /// share is untouched, only what goes out over the wire is corrupted.
    pub(crate) async fn open_single(&self, value: GF, degree: usize) -> Result<GF, ContextError> {
        let value = if self.induce_faults {
            tracing::debug!(my_id = self.my_id, "injecting a faulty share for this opening");
            GF::random(&mut thread_rng())
        } else {
            value
        };
        self.share_manager.open_single(self.router.as_ref(), value, degree).await
    }

    /// Opens `m` degree-`degree` shares at once.
    pub(crate) async fn open_batch(&self, values: Vec<GF>, degree: usize) -> Result<Vec<GF>, ContextError> {
        self.share_manager.open_batch(self.router.as_ref(), values, degree).await
    }

    /// Consumes the next zero-share.
    pub(crate) async fn next_zero(&self) -> Result<GF, ContextError> {
        Ok(self.preprocessing.lock().await.next_zero()?)
    }

    /// Consumes the next uniformly random share.
    pub(crate) async fn next_rand(&self) -> Result<GF, ContextError> {
        Ok(self.preprocessing.lock().await.next_rand()?)
    }

    /// Consumes the next random bit-share.
    pub(crate) async fn next_bit(&self) -> Result<GF, ContextError> {
        Ok(self.preprocessing.lock().await.next_bit()?)
    }

    /// Consumes the next Beaver triple.
    pub(crate) async fn next_triple(&self) -> Result<BeaverTriple, ContextError> {
        Ok(self.preprocessing.lock().await.next_triple()?)
    }

    /// Consumes the next cube triple.
    pub(crate) async fn next_cube(&self) -> Result<CubeTriple, ContextError> {
        Ok(self.preprocessing.lock().await.next_cube()?)
    }

    /// Consumes the next degree-reduction pair.
    pub(crate) async fn next_double_share(&self) -> Result<DoubleShare, ContextError> {
        Ok(self.preprocessing.lock().await.next_double_share()?)
    }

    /// Looks up a mixin by name and invokes it, for callers that only know which operator to
    /// run at runtime (e.g. a bytecode interpreter). The strongly-typed [crate::Share] methods
    /// (`mul`, `invert`, `div`, `equals`, `less_than`) remain the primary API; this is optional
    /// sugar over the same mixin table, so it fails the same way
    /// ([ContextError::MixinNotInstalled]) when the name isn't registered.
    ///
    /// `Equality` runs with [crate::mixins::equality::DEFAULT_SECURITY] trials, since a dynamic
    /// call site has no way to supply its own `k`.
    pub async fn call_mixin(&self, name: MixinName, operands: &[&crate::share::Share]) -> Result<crate::share::Share, ContextError> {
        use crate::mixins;
        match (name, operands) {
            (MixinName::Multiply, [x, y]) => mixins::multiply::multiply(x, y).await,
            (MixinName::Invert, [x]) => mixins::invert::invert(x).await,
            (MixinName::Divide, [x, y]) => mixins::divide::divide(x, y).await,
            (MixinName::Equality, [x, y]) => mixins::equality::equality(x, y, mixins::equality::DEFAULT_SECURITY).await,
            (MixinName::LessThan, [x, y]) => mixins::less_than::less_than(x, y).await,
            (name, operands) => Err(ContextError::InvalidOperand(format!(
                "{} takes a different number of operands than the {} given",
                name.as_str(),
                operands.len()
            ))),
        }
    }

    /// Cancels the background receive loop. Called when the program driving this context is
    /// done; any opening still awaiting a reply at that point resolves with
    /// [ContextError::BackgroundLoopExited].
    pub async fn shutdown(&self) {
        if let Some(handle) = self.receive_loop.lock().await.take() {
            handle.abort();
        }
    }
}
