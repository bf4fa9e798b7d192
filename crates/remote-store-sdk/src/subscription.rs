//! Live observation of one app-config record.
//!
//! [`AppConfigWatcher`] is the pull form: each `next().await` yields the next
//! projected change. [`AppConfigSubscription`] is the push form: a background
//! task drives a watcher and hands every change to a caller-supplied callback
//! until the subscription is cancelled.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use remote_store_config::{Clock, ConfigChange, ConfigGetters, ConfigRecord, DocumentKey, project};
use remote_store_data::DocumentWatch;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::decode::decode_snapshot;

/// Pull-based stream of projected changes for one document.
pub struct AppConfigWatcher {
    id: Uuid,
    key: DocumentKey,
    version: String,
    clock: Arc<dyn Clock>,
    watch: DocumentWatch,
}

impl AppConfigWatcher {
    pub(crate) fn new(
        key: DocumentKey,
        version: String,
        clock: Arc<dyn Clock>,
        watch: DocumentWatch,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            version,
            clock,
            watch,
        }
    }

    /// Identifier used in diagnostics.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Observed document.
    #[must_use]
    pub const fn key(&self) -> DocumentKey {
        self.key
    }

    /// Await the next observation and project it for the watcher's version.
    ///
    /// The first call yields the current state, including a missing document.
    /// Returns `None` once the store stops publishing for this path.
    pub async fn next(&mut self) -> Option<ConfigChange> {
        let snapshot = self.watch.next().await?;
        let record = decode_snapshot(&snapshot);
        Some(project(record, &self.version, self.clock.now()))
    }
}

impl fmt::Debug for AppConfigWatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfigWatcher")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Serialises callback delivery against cancellation.
#[derive(Default)]
struct DeliveryGate {
    cancelled: AtomicBool,
    delivery: Mutex<()>,
    delivering: Mutex<Option<ThreadId>>,
}

impl DeliveryGate {
    /// Run `callback` unless cancelled; returns whether it ran.
    fn deliver(&self, callback: impl FnOnce()) -> bool {
        let _delivery = self
            .delivery
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.cancelled.load(Ordering::SeqCst) {
            return false;
        }
        *self.delivering() = Some(thread::current().id());
        let _reset = DeliveringReset(self);
        callback();
        true
    }

    /// Cancel delivery; returns `true` only for the call that flipped the flag.
    ///
    /// Waits for an in-flight callback unless called from inside it.
    fn close(&self) -> bool {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }
        let reentrant = *self.delivering() == Some(thread::current().id());
        if !reentrant {
            drop(
                self.delivery
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner),
            );
        }
        true
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn delivering(&self) -> MutexGuard<'_, Option<ThreadId>> {
        self.delivering
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

struct DeliveringReset<'a>(&'a DeliveryGate);

impl Drop for DeliveringReset<'_> {
    fn drop(&mut self) {
        *self.0.delivering() = None;
    }
}

struct SubscriptionInner {
    id: Uuid,
    key: DocumentKey,
    gate: DeliveryGate,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SubscriptionInner {
    fn cancel(&self) -> bool {
        let cancelled = self.gate.close();
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            task.abort();
        }
        if cancelled {
            debug!(subscription = %self.id, key = %self.key, "app-config subscription cancelled");
        }
        cancelled
    }
}

/// Cloneable cancellation handle for an [`AppConfigSubscription`].
///
/// Unlike the subscription itself, dropping a handle does not cancel anything,
/// so a handle can be moved into the callback to unsubscribe from within it.
#[derive(Clone)]
pub struct SubscriptionHandle {
    inner: Arc<SubscriptionInner>,
}

impl SubscriptionHandle {
    /// Cancel the subscription. See [`AppConfigSubscription::unsubscribe`].
    pub fn unsubscribe(&self) -> bool {
        self.inner.cancel()
    }

    /// Whether callbacks may still be delivered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.inner.gate.is_cancelled()
    }
}

impl fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("id", &self.inner.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Push-based subscription; cancelled by [`Self::unsubscribe`] or on drop.
pub struct AppConfigSubscription {
    handle: SubscriptionHandle,
}

impl AppConfigSubscription {
    pub(crate) fn spawn<F>(mut watcher: AppConfigWatcher, mut on_change: F) -> Self
    where
        F: FnMut(Option<&ConfigRecord>, &ConfigGetters) + Send + 'static,
    {
        let inner = Arc::new(SubscriptionInner {
            id: watcher.id(),
            key: watcher.key(),
            gate: DeliveryGate::default(),
            task: Mutex::new(None),
        });

        let task_inner = Arc::clone(&inner);
        let task = tokio::spawn(async move {
            while let Some(change) = watcher.next().await {
                let delivered = task_inner
                    .gate
                    .deliver(|| on_change(change.record.as_ref(), &change.getters));
                if !delivered {
                    break;
                }
            }
            debug!(subscription = %task_inner.id, "app-config subscription loop finished");
        });

        // The task may already have been cancelled from inside the first
        // callback; in that case there is nothing left to abort.
        let mut slot = inner.task.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.gate.is_cancelled() {
            task.abort();
        } else {
            *slot = Some(task);
        }
        drop(slot);

        debug!(subscription = %inner.id, key = %inner.key, "app-config subscription started");
        Self {
            handle: SubscriptionHandle { inner },
        }
    }

    /// Identifier used in diagnostics.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.handle.inner.id
    }

    /// Cancel the subscription.
    ///
    /// Idempotent: only the first call returns `true`. When called outside
    /// the callback it waits for an in-flight callback to return; once it
    /// returns no further callback runs.
    pub fn unsubscribe(&self) -> bool {
        self.handle.unsubscribe()
    }

    /// Whether callbacks may still be delivered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.handle.is_active()
    }

    /// Cancellation handle that can be shared with the callback.
    #[must_use]
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }
}

impl Drop for AppConfigSubscription {
    fn drop(&mut self) {
        self.handle.unsubscribe();
    }
}

impl fmt::Debug for AppConfigSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfigSubscription")
            .field("id", &self.id())
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn gate_close_is_idempotent() {
        let gate = DeliveryGate::default();
        assert!(gate.close());
        assert!(!gate.close());
        assert!(gate.is_cancelled());
    }

    #[test]
    fn gate_skips_delivery_after_close() {
        let gate = DeliveryGate::default();
        let calls = AtomicUsize::new(0);
        assert!(gate.deliver(|| {
            calls.fetch_add(1, Ordering::SeqCst);
        }));
        gate.close();
        assert!(!gate.deliver(|| {
            calls.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn gate_close_from_inside_delivery_does_not_deadlock() {
        let gate = DeliveryGate::default();
        let mut closed = None;
        gate.deliver(|| closed = Some(gate.close()));
        assert_eq!(closed, Some(true));
        assert!(gate.delivering().is_none());
    }

    #[test]
    fn gate_close_waits_for_in_flight_delivery() {
        let gate = Arc::new(DeliveryGate::default());
        let finished = Arc::new(AtomicBool::new(false));
        let (started_tx, started_rx) = std::sync::mpsc::channel();

        let worker = {
            let gate = Arc::clone(&gate);
            let finished = Arc::clone(&finished);
            thread::spawn(move || {
                gate.deliver(|| {
                    started_tx.send(()).expect("signal start");
                    thread::sleep(std::time::Duration::from_millis(50));
                    finished.store(true, Ordering::SeqCst);
                });
            })
        };

        started_rx.recv().expect("delivery started");
        assert!(gate.close());
        assert!(finished.load(Ordering::SeqCst));
        worker.join().expect("worker thread");
    }
}
