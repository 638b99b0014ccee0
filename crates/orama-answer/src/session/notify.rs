//! State-change subscriptions.
//!
//! Every mutation of the interaction history publishes a full snapshot to
//! each live subscriber. Publishing happens while the session state is
//! locked, so subscribers observe snapshots in mutation order.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;

use crate::interaction::Interaction;

/// The whole interaction history at one point in time.
pub type Snapshot = Arc<Vec<Interaction>>;

#[derive(Default)]
pub(crate) struct Observers {
    next_id: AtomicU64,
    senders: Mutex<HashMap<u64, mpsc::UnboundedSender<Snapshot>>>,
}

impl Observers {
    fn senders(&self) -> MutexGuard<'_, HashMap<u64, mpsc::UnboundedSender<Snapshot>>> {
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders().insert(id, tx);
        Subscription {
            id,
            rx,
            observers: Arc::downgrade(self),
        }
    }

    /// Deliver `snapshot` to every subscriber, dropping the ones whose
    /// receiver is gone.
    pub(crate) fn publish(&self, snapshot: Snapshot) {
        self.senders()
            .retain(|_, tx| tx.send(Arc::clone(&snapshot)).is_ok());
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders().len()
    }

    fn remove(&self, id: u64) {
        self.senders().remove(&id);
    }
}

/// Handle to a stream of session snapshots. Dropping it unsubscribes.
#[must_use = "a dropped subscription receives nothing"]
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<Snapshot>,
    observers: Weak<Observers>,
}

impl Subscription {
    /// Next snapshot, or `None` once the session is gone.
    pub async fn recv(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }

    /// Next snapshot if one is already queued.
    pub fn try_recv(&mut self) -> Option<Snapshot> {
        self.rx.try_recv().ok()
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.remove(self.id);
        }
    }
}

impl Stream for Subscription {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Snapshot>> {
        self.rx.poll_recv(cx)
    }
}
