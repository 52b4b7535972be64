//! Switch-to-latest sequencing for dependent requests.
//!
//! Every value arriving from upstream starts a derived request. When a newer
//! upstream value arrives first, the pending request is dropped, its token is
//! cancelled, and the stage's generation moves on. A response is only emitted
//! if its ticket still matches the current generation.

use futures::stream::Stream;
use futures::StreamExt;
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::debug;

use super::token::CancellationToken;
use crate::core::StageName;
use crate::errors::StageError;

/// Proof that a derived request belongs to a particular generation.
#[derive(Debug, Clone)]
pub struct StageTicket {
    generation: u64,
    token: Arc<CancellationToken>,
}

impl StageTicket {
    /// The generation this ticket was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The token cancelled when this ticket is superseded.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Generation counter for one stage.
#[derive(Debug)]
pub struct StageSlot {
    stage: StageName,
    generation: AtomicU64,
    current: Mutex<Option<Arc<CancellationToken>>>,
}

impl StageSlot {
    /// Creates a slot with no request issued.
    #[must_use]
    pub fn new(stage: StageName) -> Self {
        Self {
            stage,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    /// The stage this slot sequences.
    #[must_use]
    pub const fn stage(&self) -> StageName {
        self.stage
    }

    /// The most recently issued generation (0 before the first request).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Invalidates the previous ticket and issues a new one.
    pub fn supersede(&self) -> StageTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = Arc::new(CancellationToken::new());

        if let Some(previous) = self.current.lock().replace(Arc::clone(&token)) {
            if previous.cancel(format!("superseded by generation {generation}")) {
                debug!(
                    stage = %self.stage,
                    generation,
                    "Superseded in-flight request"
                );
            }
        }

        StageTicket { generation, token }
    }

    /// Whether `ticket` is still the latest one issued.
    #[must_use]
    pub fn is_current(&self, ticket: &StageTicket) -> bool {
        !ticket.token.is_cancelled() && self.generation() == ticket.generation
    }

    /// Cancels the current ticket without issuing a new one.
    pub fn cancel_current(&self, reason: &str) {
        if let Some(current) = self.current.lock().take() {
            current.cancel(reason);
        }
    }
}

/// Stream that maps each upstream value to a derived request, keeping only
/// the newest one alive.
///
/// Upstream errors are forwarded and end the stream. Derived results are
/// emitted in order of the upstream values that produced them; results of
/// superseded requests are never emitted.
#[must_use = "streams do nothing unless polled"]
pub struct SwitchLatest<S, F, Fut> {
    upstream: S,
    derive: F,
    slot: StageSlot,
    in_flight: Option<(StageTicket, Pin<Box<Fut>>)>,
    upstream_done: bool,
}

// `derive` is never pinned and the in-flight future is boxed.
impl<S: Unpin, F, Fut> Unpin for SwitchLatest<S, F, Fut> {}

impl<S, F, Fut> SwitchLatest<S, F, Fut> {
    /// Creates the stream for `stage`.
    pub fn new(stage: StageName, upstream: S, derive: F) -> Self {
        Self {
            upstream,
            derive,
            slot: StageSlot::new(stage),
            in_flight: None,
            upstream_done: false,
        }
    }

    /// The stage's generation counter.
    #[must_use]
    pub const fn slot(&self) -> &StageSlot {
        &self.slot
    }
}

impl<S, A, B, F, Fut> Stream for SwitchLatest<S, F, Fut>
where
    S: Stream<Item = Result<A, StageError>> + Unpin,
    F: FnMut(A) -> Fut,
    Fut: Future<Output = Result<B, StageError>>,
{
    type Item = Result<B, StageError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if !this.upstream_done {
                match this.upstream.poll_next_unpin(cx) {
                    Poll::Ready(Some(Ok(value))) => {
                        let ticket = this.slot.supersede();
                        debug!(
                            stage = %this.slot.stage(),
                            generation = ticket.generation(),
                            "Issuing derived request"
                        );
                        // Replacing drops the previous future before it can resolve.
                        let request = Box::pin((this.derive)(value));
                        this.in_flight = Some((ticket, request));
                        continue;
                    }
                    Poll::Ready(Some(Err(error))) => {
                        this.slot.cancel_current("upstream failed");
                        this.in_flight = None;
                        this.upstream_done = true;
                        return Poll::Ready(Some(Err(error)));
                    }
                    Poll::Ready(None) => this.upstream_done = true,
                    Poll::Pending => {}
                }
            }

            let Some((ticket, request)) = this.in_flight.as_mut() else {
                return if this.upstream_done {
                    Poll::Ready(None)
                } else {
                    Poll::Pending
                };
            };

            match request.as_mut().poll(cx) {
                Poll::Ready(output) => {
                    let current = this.slot.is_current(ticket);
                    let generation = ticket.generation();
                    this.in_flight = None;
                    if current {
                        return Poll::Ready(Some(output));
                    }
                    debug!(
                        stage = %this.slot.stage(),
                        generation,
                        "Discarding stale response"
                    );
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Adds [`switch_latest`](SwitchLatestExt::switch_latest) to fallible streams.
pub trait SwitchLatestExt: Stream + Sized {
    /// Derives a request from every upstream value, cancelling the previous one.
    fn switch_latest<A, B, F, Fut>(self, stage: StageName, derive: F) -> SwitchLatest<Self, F, Fut>
    where
        Self: Stream<Item = Result<A, StageError>>,
        F: FnMut(A) -> Fut,
        Fut: Future<Output = Result<B, StageError>>,
    {
        SwitchLatest::new(stage, self, derive)
    }
}

impl<S: Stream> SwitchLatestExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::{mpsc, oneshot};
    use futures::stream;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use tokio_test::{assert_pending, assert_ready, task};

    type Pending = Arc<Mutex<HashMap<u32, oneshot::Receiver<u32>>>>;

    /// Derived requests resolve when the test sends on the matching channel.
    fn scripted(ids: &[u32]) -> (Pending, HashMap<u32, oneshot::Sender<u32>>) {
        let mut receivers = HashMap::new();
        let mut senders = HashMap::new();
        for id in ids {
            let (tx, rx) = oneshot::channel();
            receivers.insert(*id, rx);
            senders.insert(*id, tx);
        }
        (Arc::new(Mutex::new(receivers)), senders)
    }

    fn request(pending: &Pending, id: u32) -> impl Future<Output = Result<u32, StageError>> {
        let rx = pending.lock().remove(&id);
        async move {
            match rx {
                Some(rx) => rx
                    .await
                    .map_err(|_| StageError::transport(format!("req/{id}"), "sender dropped")),
                None => Err(StageError::transport(format!("req/{id}"), "not scripted")),
            }
        }
    }

    #[test]
    fn test_slot_supersede_cancels_previous() {
        let slot = StageSlot::new(StageName::Posts);
        assert_eq!(slot.generation(), 0);

        let first = slot.supersede();
        assert!(slot.is_current(&first));

        let second = slot.supersede();
        assert_eq!(second.generation(), 2);
        assert!(!slot.is_current(&first));
        assert!(slot.is_current(&second));
        assert!(first.token().is_cancelled());
        assert_eq!(
            first.token().reason(),
            Some("superseded by generation 2".to_string())
        );
    }

    #[test]
    fn test_slot_cancel_current() {
        let slot = StageSlot::new(StageName::Comments);
        let ticket = slot.supersede();
        slot.cancel_current("upstream failed");
        assert!(!slot.is_current(&ticket));
        assert_eq!(slot.generation(), 1);
    }

    #[tokio::test]
    async fn test_single_value_passes_through() {
        let upstream = stream::iter(vec![Ok::<_, StageError>(3u32)]);
        let results: Vec<_> = upstream
            .switch_latest(StageName::Posts, |n| async move { Ok(n * 10) })
            .collect()
            .await;

        assert_eq!(results, vec![Ok(30)]);
    }

    #[tokio::test]
    async fn test_empty_upstream_ends_without_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let upstream = stream::iter(Vec::<Result<u32, StageError>>::new());

        let results: Vec<Result<u32, StageError>> = upstream
            .switch_latest(StageName::Posts, move |n| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Ok(n) }
            })
            .collect()
            .await;

        assert!(results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_newer_value_supersedes_in_flight_request() {
        let (pending, mut senders) = scripted(&[1, 2]);
        let (up_tx, up_rx) = mpsc::unbounded::<Result<u32, StageError>>();
        let requests = Arc::clone(&pending);
        let mut task = task::spawn(
            up_rx.switch_latest(StageName::Posts, move |id| request(&requests, id)),
        );

        up_tx.unbounded_send(Ok(1)).unwrap();
        assert_pending!(task.poll_next());

        up_tx.unbounded_send(Ok(2)).unwrap();
        assert_pending!(task.poll_next());

        // The first request was dropped with its receiver.
        let first = senders.remove(&1).unwrap();
        assert!(first.send(10).is_err());

        senders.remove(&2).unwrap().send(20).unwrap();
        assert_eq!(assert_ready!(task.poll_next()), Some(Ok(20)));

        drop(up_tx);
        assert_eq!(assert_ready!(task.poll_next()), None);
    }

    #[test]
    fn test_burst_only_issues_latest() {
        let started = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&started);
        let (up_tx, up_rx) = mpsc::unbounded::<Result<u32, StageError>>();
        let mut task = task::spawn(up_rx.switch_latest(StageName::Comments, move |id| {
            let log = Arc::clone(&log);
            async move {
                log.lock().push(id);
                Ok(id)
            }
        }));

        up_tx.unbounded_send(Ok(1)).unwrap();
        up_tx.unbounded_send(Ok(2)).unwrap();
        up_tx.unbounded_send(Ok(3)).unwrap();

        assert_eq!(assert_ready!(task.poll_next()), Some(Ok(3)));
        // Superseded futures were never polled, so no request went out.
        assert_eq!(*started.lock(), vec![3]);
    }

    #[test]
    fn test_upstream_error_drops_in_flight() {
        let (pending, mut senders) = scripted(&[1]);
        let (up_tx, up_rx) = mpsc::unbounded::<Result<u32, StageError>>();
        let requests = Arc::clone(&pending);
        let mut task = task::spawn(
            up_rx.switch_latest(StageName::Posts, move |id| request(&requests, id)),
        );

        up_tx.unbounded_send(Ok(1)).unwrap();
        assert_pending!(task.poll_next());

        up_tx
            .unbounded_send(Err(StageError::empty_collection(StageName::Users)))
            .unwrap();
        assert_eq!(
            assert_ready!(task.poll_next()),
            Some(Err(StageError::empty_collection(StageName::Users)))
        );
        assert!(senders.remove(&1).unwrap().send(10).is_err());
        assert_eq!(assert_ready!(task.poll_next()), None);
    }

    #[tokio::test]
    async fn test_derived_error_is_emitted() {
        let upstream = stream::iter(vec![Ok::<_, StageError>(7u32)]);
        let results: Vec<Result<u32, StageError>> = upstream
            .switch_latest(StageName::Comments, |n| async move {
                Err(StageError::http_status(format!("/posts/{n}/comments"), 503))
            })
            .collect()
            .await;

        assert_eq!(
            results,
            vec![Err(StageError::http_status("/posts/7/comments", 503))]
        );
    }

    #[test]
    fn test_at_most_one_request_in_flight() {
        struct Live(Arc<AtomicUsize>);
        impl Drop for Live {
            fn drop(&mut self) {
                self.0.fetch_sub(1, Ordering::SeqCst);
            }
        }

        let live = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (live_c, peak_c) = (Arc::clone(&live), Arc::clone(&peak));
        let (up_tx, up_rx) = mpsc::unbounded::<Result<u32, StageError>>();
        let mut task = task::spawn(up_rx.switch_latest(StageName::Posts, move |_id| {
            let now = live_c.fetch_add(1, Ordering::SeqCst) + 1;
            peak_c.fetch_max(now, Ordering::SeqCst);
            let guard = Live(Arc::clone(&live_c));
            async move {
                let _guard = guard;
                futures::future::pending::<Result<u32, StageError>>().await
            }
        }));

        for id in 0..5 {
            up_tx.unbounded_send(Ok(id)).unwrap();
            assert_pending!(task.poll_next());
        }

        assert_eq!(live.load(Ordering::SeqCst), 1);
        // Each new future is created before the previous one is dropped.
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }
}
