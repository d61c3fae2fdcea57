//! Scheduling infrastructure for the polling loop
//!
//! One scheduler drives one coordinator on a fixed interval. Lifecycle rules:
//! - Explicit start/stop
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Structured tracing on every tick outcome

pub mod error;
pub mod poll_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use poll_scheduler::{PollScheduler, PollSchedulerConfig};
