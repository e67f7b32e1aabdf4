//! Telemetry utilities for purge timing and span construction.

use std::time::Instant;

/// Guard for timing a purge and recording metrics.
///
/// Records the result passed to [`PurgeTimer::finish`], or `"aborted"` if the
/// guard is dropped first.
pub struct PurgeTimer {
    trigger: &'static str,
    start: Instant,
    result: Option<&'static str>,
}

impl PurgeTimer {
    pub fn new(trigger: &'static str) -> Self {
        Self {
            trigger,
            start: Instant::now(),
            result: None,
        }
    }

    pub fn finish(mut self, result: &'static str) {
        self.result = Some(result);
    }
}

impl Drop for PurgeTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        crate::metrics::record_purge(self.trigger, self.result.unwrap_or("aborted"), duration);
    }
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for the whole bootstrap sequence.
    pub fn bootstrap(extension: &str, version: &str) -> Span {
        info_span!("bootstrap", extension = %extension, version = %version)
    }

    /// Span for one purge.
    pub fn purge(trigger: &str) -> Span {
        info_span!("purge", trigger = %trigger)
    }

    /// Span for an event listener task.
    pub fn listener(kind: &str) -> Span {
        debug_span!("listener", kind = %kind)
    }
}
