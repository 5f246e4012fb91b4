//! Assigns share ids, and multiplexes the background receive loop's incoming
//! messages into the reconstruction in progress for each one.

use crate::{
    errors::ContextError,
    router::{Envelope, Router, Tag},
};
use math_lib::GF;
use shamir_sharing::{BatchReconstructor, ReconstructOutcome, RobustReconstructor};
use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicU64, Ordering},
};
use tokio::sync::{oneshot, Mutex};

enum PendingEntry {
    Single { seen: HashSet<usize>, reconstructor: RobustReconstructor, waiter: oneshot::Sender<Result<GF, ContextError>> },
    Batch {
        seen: HashSet<usize>,
        reconstructor: BatchReconstructor,
        waiter: oneshot::Sender<Result<Vec<GF>, ContextError>>,
    },
}

/// Advances one opening's state machine by one received message, consuming `entry` and either
/// returning it (still pending) or resolving its waiter and dropping it.
fn dispatch_one(entry: PendingEntry, src: usize, envelope: Envelope) -> Option<PendingEntry> {
    let share_id = envelope.share_id;
    match (entry, envelope.tag) {
        (PendingEntry::Single { mut seen, mut reconstructor, waiter }, Tag::Single) => {
            if !seen.insert(src) {
                let _ = waiter.send(Err(ContextError::RedundantShare { src, share_id }));
                return None;
            }
            let Some(value) = envelope.payload.into_iter().next() else {
                let _ = waiter.send(Err(ContextError::InvalidOperand("empty single-share payload".into())));
                return None;
            };
            match reconstructor.add_share(src, value) {
                Ok(ReconstructOutcome::Resolved(v)) => {
                    let _ = waiter.send(Ok(v));
                    None
                }
                Ok(ReconstructOutcome::Pending) => Some(PendingEntry::Single { seen, reconstructor, waiter }),
                Err(e) => {
                    let _ = waiter.send(Err(e.into()));
                    None
                }
            }
        }
        (PendingEntry::Batch { mut seen, mut reconstructor, waiter }, Tag::Round1) => {
            if !seen.insert(src) {
                let _ = waiter.send(Err(ContextError::RedundantShare { src, share_id }));
                return None;
            }
            match reconstructor.add_round1(src, envelope.payload) {
                Ok(Some(values)) => {
                    let _ = waiter.send(Ok(values));
                    None
                }
                Ok(None) => Some(PendingEntry::Batch { seen, reconstructor, waiter }),
                Err(e) => {
                    let _ = waiter.send(Err(e.into()));
                    None
                }
            }
        }
        // R2 is an accepted no-op; see `shamir_sharing::batch` for why the R1 round alone suffices.
        (entry @ PendingEntry::Batch { .. }, Tag::Round2) => Some(entry),
        // A single-share id that received an R1/R2, or a batch id that received an S: crossed tags.
        (PendingEntry::Single { waiter, .. }, _) => {
            let _ = waiter.send(Err(ContextError::TagMismatch { share_id }));
            None
        }
        (PendingEntry::Batch { waiter, .. }, _) => {
            let _ = waiter.send(Err(ContextError::TagMismatch { share_id }));
            None
        }
    }
}

/// Assigns deterministic share ids and drives every reconstruction in progress for this party.
pub struct ShareManager {
    n: usize,
    points: Vec<GF>,
    next_share_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingEntry>>,
}

impl ShareManager {
    /// Creates a share manager for `n` parties, each holding the given evaluation point.
    pub fn new(n: usize, points: Vec<GF>) -> Self {
        Self { n, points, next_share_id: AtomicU64::new(0), pending: Mutex::new(HashMap::new()) }
    }

    /// The next share id this party will assign. Exposed so a debug build can cross-check
    /// that every honest party's opening sequence lines up.
    pub fn next_share_id(&self) -> u64 {
        self.next_share_id.load(Ordering::SeqCst)
    }

    /// Assigns `share_id = k`, broadcasts `value` to all `n` parties (including this one) as a
    /// single-share opening at degree `degree`, and awaits the reconstructed secret.
    pub async fn open_single(
        &self,
        router: &dyn Router,
        value: GF,
        degree: usize,
    ) -> Result<GF, ContextError> {
        let share_id = self.next_share_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        let reconstructor = RobustReconstructor::new(self.n, degree, self.points.clone());
        self.pending
            .lock()
            .await
            .insert(share_id, PendingEntry::Single { seen: HashSet::new(), reconstructor, waiter: tx });

        for dest in 0..self.n {
            router
                .send(dest, Envelope::single(share_id, value.clone()))
                .await
                .map_err(|_| ContextError::PeerUnreachable(dest))?;
        }
        rx.await.map_err(|_| ContextError::BackgroundLoopExited)?
    }

    /// Assigns a single `share_id` for the whole batch, broadcasts `values` as an `R1` row, and
    /// awaits the reconstructed secrets.
    pub async fn open_batch(
        &self,
        router: &dyn Router,
        values: Vec<GF>,
        degree: usize,
    ) -> Result<Vec<GF>, ContextError> {
        let share_id = self.next_share_id.fetch_add(1, Ordering::SeqCst);
        let m = values.len();
        let (tx, rx) = oneshot::channel();
        let reconstructor = BatchReconstructor::new(self.n, degree, self.points.clone(), m);
        self.pending
            .lock()
            .await
            .insert(share_id, PendingEntry::Batch { seen: HashSet::new(), reconstructor, waiter: tx });

        for dest in 0..self.n {
            router
                .send(dest, Envelope::round1(share_id, values.clone()))
                .await
                .map_err(|_| ContextError::PeerUnreachable(dest))?;
        }
        rx.await.map_err(|_| ContextError::BackgroundLoopExited)?
    }

    /// Feeds one incoming message into whichever opening it belongs to. Messages for an
    /// unknown (already resolved, or never-opened) `share_id` are dropped: a share opened and
    /// resolved locally can still see late traffic for it from slower peers.
    pub async fn dispatch(&self, src: usize, envelope: Envelope) {
        let share_id = envelope.share_id;
        let mut pending = self.pending.lock().await;
        let Some(entry) = pending.remove(&share_id) else { return };
        if let Some(entry) = dispatch_one(entry, src, envelope) {
            pending.insert(share_id, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::SimpleRouter;
    use math_lib::Polynomial;
    use std::sync::Arc;

    fn points(n: usize) -> Vec<GF> {
        (1..=n as u64).map(GF::from_u64).collect()
    }

    async fn run_receive_loop(router: Arc<SimpleRouter>, manager: Arc<ShareManager>) {
        loop {
            match Router::recv(router.as_ref()).await {
                Ok((src, envelope)) => manager.dispatch(src, envelope).await,
                Err(_) => break,
            }
        }
    }

    #[tokio::test]
    async fn opens_a_single_degree_one_share_among_three_parties() {
        let n = 3;
        let t = 1;
        let pts = points(n);
        let poly = Polynomial::new(vec![GF::from_u64(100), GF::from_u64(1)]);

        let routers: Vec<Arc<SimpleRouter>> = SimpleRouter::network(n).into_iter().map(Arc::new).collect();
        let managers: Vec<Arc<ShareManager>> = (0..n).map(|_| Arc::new(ShareManager::new(n, pts.clone()))).collect();

        let mut loops = Vec::new();
        for (router, manager) in routers.iter().cloned().zip(managers.iter().cloned()) {
            loops.push(tokio::spawn(run_receive_loop(router, manager)));
        }

        let mut opens = Vec::new();
        for (i, (router, manager)) in routers.iter().cloned().zip(managers.iter().cloned()).enumerate() {
            let share = poly.eval(&pts[i]);
            opens.push(tokio::spawn(async move { manager.open_single(router.as_ref(), share, t).await }));
        }

        for handle in opens {
            let secret = handle.await.unwrap().unwrap();
            assert_eq!(secret, GF::from_u64(100));
        }
        for handle in loops {
            handle.abort();
        }
    }
}
