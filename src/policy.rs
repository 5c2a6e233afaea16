use crate::{window::Totals, Config};
use std::fmt;

/// Why a closed breaker should trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Trip {
    /// Too many failures in a row.
    ConsecutiveFailures(u32),
    /// Too large a share of the calls in the rolling window failed.
    FailureRate(f64),
}

/// Decides whether a closed breaker should open after recording a failure.
///
/// The consecutive-failure check catches a hard outage quickly. The windowed
/// rate check catches a dependency that keeps failing with successes
/// interleaved, once the window holds at least `minimum_requests` calls.
pub(crate) fn should_open(
    config: &Config,
    consecutive_failures: u32,
    totals: Totals,
) -> Option<Trip> {
    if consecutive_failures >= config.failure_threshold {
        return Some(Trip::ConsecutiveFailures(consecutive_failures));
    }

    if totals.total < config.minimum_requests as usize {
        return None;
    }

    let rate = totals.failure_rate();
    if rate >= config.failure_rate_threshold {
        tracing::trace!(
            failure_rate = rate,
            max_rate = config.failure_rate_threshold,
            requests = totals.total,
            "Failure rate exceeds max"
        );
        return Some(Trip::FailureRate(rate));
    }

    None
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trip::ConsecutiveFailures(n) => write!(f, "{n} consecutive failures"),
            Trip::FailureRate(rate) => write!(f, "failure rate of {rate:.1}%"),
        }
    }
}
