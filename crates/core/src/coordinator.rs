//! Polling coordinator owning the cached calendar snapshot
//!
//! One coordinator instance is constructed per configured account and handed
//! by reference to every consumer. A poll cycle authenticates, fetches the
//! configured user's entries, and atomically swaps the snapshot; a failed
//! cycle keeps the previous snapshot and surfaces an update-failed event
//! instead. Subscribers are invoked synchronously after every cycle, on the
//! task that ran the poll.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use offday_domain::{CalendarEntry, CalendarSnapshot, Result};
use tracing::{debug, warn};

use crate::calendar_ports::CalendarApi;

/// Event delivered to subscribers after a poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// The snapshot was replaced with fresh data.
    Updated,
    /// The cycle failed; the previous snapshot is still being served.
    UpdateFailed {
        /// Human-readable failure description for the host's notification sink.
        message: String,
    },
}

/// Identifies one subscription; pass back to
/// [`CalendarCoordinator::unsubscribe`] on consumer teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// Outcome of a scheduled poll attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The cycle ran and replaced the snapshot.
    Updated,
    /// Another cycle was still in flight; this attempt was skipped.
    Skipped,
}

type Listener = Box<dyn Fn(&CoordinatorEvent) + Send + Sync>;

/// Coordinator for one polled calendar account.
pub struct CalendarCoordinator {
    api: Arc<dyn CalendarApi>,
    full_name: String,
    snapshot: RwLock<Option<Arc<CalendarSnapshot>>>,
    listeners: Mutex<HashMap<u64, Listener>>,
    next_listener_id: AtomicU64,
    stale: AtomicBool,
    // Held for the duration of a cycle; try_refresh skips when contended.
    poll_gate: tokio::sync::Mutex<()>,
}

impl CalendarCoordinator {
    /// Create a coordinator polling `api` for the entries of `full_name`.
    pub fn new(api: Arc<dyn CalendarApi>, full_name: impl Into<String>) -> Self {
        Self {
            api,
            full_name: full_name.into(),
            snapshot: RwLock::new(None),
            listeners: Mutex::new(HashMap::new()),
            next_listener_id: AtomicU64::new(0),
            stale: AtomicBool::new(false),
            poll_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Full name whose entries this coordinator polls.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Run one poll cycle: authenticate, fetch, swap the snapshot.
    ///
    /// On failure the previous snapshot is retained, subscribers receive
    /// [`CoordinatorEvent::UpdateFailed`], and the error is returned so that
    /// manual-refresh callers can surface it. A failed cycle never clears
    /// cached data. Waits for an in-flight cycle to finish first.
    pub async fn refresh(&self) -> Result<()> {
        let _cycle = self.poll_gate.lock().await;
        self.run_cycle().await
    }

    /// Scheduled entry point: run a cycle unless one is already in flight.
    ///
    /// At most one poll runs at a time; a tick that arrives while the
    /// previous cycle is still running is skipped, not queued.
    pub async fn try_refresh(&self) -> Result<PollOutcome> {
        match self.poll_gate.try_lock() {
            Ok(_cycle) => {
                self.run_cycle().await?;
                Ok(PollOutcome::Updated)
            }
            Err(_) => {
                debug!(full_name = %self.full_name, "previous poll cycle still in flight, skipping");
                Ok(PollOutcome::Skipped)
            }
        }
    }

    async fn run_cycle(&self) -> Result<()> {
        debug!(full_name = %self.full_name, "starting poll cycle");

        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                let entry_count = snapshot.entries.len();
                *self.write_snapshot() = Some(Arc::new(snapshot));
                self.stale.store(false, Ordering::SeqCst);
                debug!(entries = entry_count, "poll cycle succeeded");
                self.notify(&CoordinatorEvent::Updated);
                Ok(())
            }
            Err(err) => {
                self.stale.store(true, Ordering::SeqCst);
                warn!(error = %err, "poll cycle failed, keeping previous snapshot");
                self.notify(&CoordinatorEvent::UpdateFailed { message: err.to_string() });
                Err(err)
            }
        }
    }

    async fn fetch_snapshot(&self) -> Result<CalendarSnapshot> {
        self.api.authenticate().await?;
        let entries = self.api.entries(&self.full_name).await?;
        Ok(CalendarSnapshot { label: self.full_name.clone(), entries })
    }

    /// Entries of the current snapshot whose name equals `fullname` exactly.
    ///
    /// Snapshot order is preserved. An empty result means no match, or no
    /// successful poll yet; neither is an error.
    pub fn entries_for(&self, fullname: &str) -> Vec<CalendarEntry> {
        match self.read_snapshot().as_ref() {
            Some(snapshot) => {
                snapshot.entries.iter().filter(|entry| entry.name == fullname).cloned().collect()
            }
            None => Vec::new(),
        }
    }

    /// Current snapshot, if any poll has ever succeeded.
    pub fn snapshot(&self) -> Option<Arc<CalendarSnapshot>> {
        self.read_snapshot().clone()
    }

    /// Whether the last poll cycle failed (the snapshot, if any, is stale).
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Register a callback invoked synchronously after every poll cycle.
    ///
    /// Callbacks must not subscribe or unsubscribe from inside the callback.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionHandle
    where
        F: Fn(&CoordinatorEvent) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::SeqCst);
        self.lock_listeners().insert(id, Box::new(callback));
        SubscriptionHandle(id)
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) {
        self.lock_listeners().remove(&handle.0);
    }

    /// Whether any consumer is currently subscribed.
    ///
    /// The scheduler suspends polling while this is false.
    pub fn has_subscribers(&self) -> bool {
        !self.lock_listeners().is_empty()
    }

    fn notify(&self, event: &CoordinatorEvent) {
        let listeners = self.lock_listeners();
        for listener in listeners.values() {
            listener(event);
        }
    }

    // Lock holders only assign or clone, so a poisoned lock still guards
    // consistent data and can be recovered.
    fn read_snapshot(&self) -> std::sync::RwLockReadGuard<'_, Option<Arc<CalendarSnapshot>>> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_snapshot(&self) -> std::sync::RwLockWriteGuard<'_, Option<Arc<CalendarSnapshot>>> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> std::sync::MutexGuard<'_, HashMap<u64, Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
