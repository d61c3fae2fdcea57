//! Poll scheduler driving the calendar coordinator
//!
//! Interval-based loop with explicit lifecycle management: one tick per poll
//! interval, polling suspended while the coordinator has no subscribers, and
//! a tick skipped when the previous cycle is still in flight. A failed cycle
//! is logged and never terminates the loop.
//!
//! The first cycle runs one interval after `start()`; call
//! [`CalendarCoordinator::refresh`] beforehand for an immediate fill.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use offday_core::CalendarCoordinator;
//! use offday_infra::scheduling::{PollScheduler, PollSchedulerConfig, SchedulerResult};
//!
//! # async fn example(coordinator: Arc<CalendarCoordinator>) -> SchedulerResult<()> {
//! let mut scheduler = PollScheduler::new(
//!     coordinator,
//!     PollSchedulerConfig { interval: Duration::from_secs(3600), ..Default::default() },
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use offday_core::{CalendarCoordinator, PollOutcome};
use offday_domain::constants::DEFAULT_POLL_INTERVAL_SECS;
use offday_domain::CalendarConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the poll scheduler
#[derive(Debug, Clone)]
pub struct PollSchedulerConfig {
    /// Poll interval
    pub interval: Duration,
    /// Timeout applied to a single poll cycle
    pub job_timeout: Duration,
    /// Timeout for awaiting the loop task on stop
    pub join_timeout: Duration,
}

impl Default for PollSchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS), // 1 hour
            job_timeout: Duration::from_secs(300),
            join_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&CalendarConfig> for PollSchedulerConfig {
    fn from(config: &CalendarConfig) -> Self {
        Self { interval: Duration::from_secs(config.poll_interval_secs), ..Default::default() }
    }
}

/// Poll scheduler with explicit lifecycle management.
pub struct PollScheduler {
    coordinator: Arc<CalendarCoordinator>,
    config: PollSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl PollScheduler {
    /// Create a scheduler for `coordinator`.
    pub fn new(coordinator: Arc<CalendarCoordinator>, config: PollSchedulerConfig) -> Self {
        Self {
            coordinator,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler, spawning the poll loop task.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheduler is already running.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!("Starting poll scheduler");

        // Create a new cancellation token (supports restart after stop)
        self.cancellation_token = CancellationToken::new();

        let coordinator = Arc::clone(&self.coordinator);
        let config = self.config.clone();
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::poll_loop(coordinator, config, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Poll scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully.
    ///
    /// Cancels the loop task and awaits completion with a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheduler is not running, or if the loop task
    /// does not finish within the join timeout.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping poll scheduler");

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })?
                .map_err(|err| SchedulerError::TaskJoinFailed(err.to_string()))?;
        }

        info!("Poll scheduler stopped");
        Ok(())
    }

    /// Check if the scheduler is running.
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Background poll loop
    async fn poll_loop(
        coordinator: Arc<CalendarCoordinator>,
        config: PollSchedulerConfig,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Poll loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(config.interval) => {
                    Self::run_tick(&coordinator, &config).await;
                }
            }
        }
    }

    async fn run_tick(coordinator: &Arc<CalendarCoordinator>, config: &PollSchedulerConfig) {
        // Polling is suspended while nothing consumes the data.
        if !coordinator.has_subscribers() {
            debug!("no subscribers, polling suspended");
            return;
        }

        let started = Instant::now();
        match tokio::time::timeout(config.job_timeout, coordinator.try_refresh()).await {
            Ok(Ok(PollOutcome::Updated)) => {
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, "poll cycle completed");
            }
            Ok(Ok(PollOutcome::Skipped)) => {
                warn!("previous poll cycle still running, tick skipped");
            }
            Ok(Err(err)) => {
                // Subscribers were already notified by the coordinator; the
                // loop keeps running.
                error!(error = %err, "poll cycle failed");
            }
            Err(_) => {
                warn!(timeout_secs = config.job_timeout.as_secs(), "poll cycle timed out");
            }
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("PollScheduler dropped while running, cancelling poll loop");
            self.cancellation_token.cancel();
        }
    }
}
