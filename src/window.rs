use std::collections::VecDeque;
use tokio::time::{Duration, Instant};

/// A log of call outcomes over a rolling time window.
///
/// Records that fall out of the window are dropped lazily, whenever the log
/// is written to or its totals are read.
#[derive(Debug)]
pub(crate) struct RollingWindow {
    window: Duration,
    records: VecDeque<Outcome>,
    failures: usize,
}

#[derive(Debug, Clone, Copy)]
struct Outcome {
    at: Instant,
    success: bool,
}

/// Counts of the outcomes currently inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Totals {
    pub(crate) total: usize,
    pub(crate) failures: usize,
}

impl RollingWindow {
    pub(crate) fn new(window: Duration) -> Self {
        RollingWindow {
            window,
            records: VecDeque::new(),
            failures: 0,
        }
    }

    pub(crate) fn record(&mut self, now: Instant, success: bool) {
        self.prune(now);
        self.records.push_back(Outcome { at: now, success });
        if !success {
            self.failures += 1;
        }
    }

    pub(crate) fn totals(&mut self, now: Instant) -> Totals {
        self.prune(now);
        Totals {
            total: self.records.len(),
            failures: self.failures,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.failures = 0;
    }

    fn prune(&mut self, now: Instant) {
        // `checked_sub` fails only when `now` is closer to the clock's origin
        // than the window is long, in which case nothing can have expired.
        let Some(cutoff) = now.checked_sub(self.window) else {
            return;
        };

        while let Some(oldest) = self.records.front() {
            if oldest.at >= cutoff {
                break;
            }
            if !oldest.success {
                self.failures -= 1;
            }
            self.records.pop_front();
        }
    }
}

impl Totals {
    /// Failure rate as a percentage. An empty window has a rate of zero.
    pub(crate) fn failure_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.failures as f64 / self.total as f64 * 100.0
    }
}
