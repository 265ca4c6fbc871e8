//! Progress reporting and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::ProgressError;

/// Receives "processed `current` of `total`" updates during a scan.
///
/// Errors are logged and dropped by the scanner.
pub trait ProgressSink {
    /// Report that `current` of `total` pages have been processed.
    fn report(&mut self, current: u32, total: u32) -> Result<(), ProgressError>;
}

/// A sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _current: u32, _total: u32) -> Result<(), ProgressError> {
        Ok(())
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(u32, u32) -> Result<(), ProgressError>,
{
    fn report(&mut self, current: u32, total: u32) -> Result<(), ProgressError> {
        self(current, total)
    }
}

/// Rate limiter for progress updates.
///
/// The final update always passes.
#[derive(Debug)]
pub(crate) struct ProgressThrottle {
    interval: Duration,
    last: Instant,
}

impl ProgressThrottle {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Instant::now(),
        }
    }

    pub(crate) fn should_report(&mut self, current: u32, total: u32) -> bool {
        let now = Instant::now();
        if current >= total || now.duration_since(self.last) >= self.interval {
            self.last = now;
            true
        } else {
            false
        }
    }
}

/// Shared flag used to stop a scan at the next page boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
