//! An in-process circuit breaker for async calls to unreliable dependencies.
//!
//! A [`CircuitBreaker`] watches the outcomes of the calls it guards. Once too
//! many of them fail, either in a row or as a share of a rolling window, it
//! stops issuing calls for [`Config::reset_timeout`], then lets trial calls
//! through to find out whether the dependency has recovered.
//!
//! ```
//! use circuit_breaker::{CircuitBreaker, Config, Error};
//! use std::time::Duration;
//!
//! # async fn fetch() -> Result<u32, std::io::Error> { Ok(1) }
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default()
//!     .with_failure_threshold(3)
//!     .with_timeout(Duration::from_secs(2));
//! let breaker = CircuitBreaker::new("inventory", config)?;
//!
//! match breaker.execute(fetch).await {
//!     Ok(n) => println!("got {n}"),
//!     Err(Error::Open) => println!("inventory unavailable, serving cached data"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Many dependencies can each get their own breaker through a [`Registry`].
pub mod breaker;
pub mod error;
mod policy;
pub mod registry;
pub mod service;
mod window;

pub use self::{
    breaker::{Call, CircuitBreaker, CircuitState, Stats},
    error::{ConfigError, Error},
    registry::Registry,
    service::BreakerService,
};
use tokio::time::Duration;

/// Configures a [`CircuitBreaker`].
///
/// A breaker's configuration is fixed once it is constructed. Start from
/// [`Config::default`] and adjust individual settings with the `with_*`
/// methods; the result is checked by [`Config::validate`] when the breaker is
/// built.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Config {
    /// Number of consecutive failures that trips the breaker.
    pub failure_threshold: u32,
    /// Number of consecutive successful trial calls needed to close a
    /// half-open breaker.
    pub success_threshold: u32,
    /// How long a breaker stays open before it admits a trial call.
    pub reset_timeout: Duration,
    /// Deadline for each guarded call. A call that runs past it counts as a
    /// failure.
    pub timeout: Duration,
    /// Length of the rolling window used to compute the failure rate.
    pub monitor_window: Duration,
    /// Failure rate, in percent, at or above which the breaker trips.
    pub failure_rate_threshold: f64,
    /// Number of calls the rolling window must hold before the failure rate
    /// is considered.
    pub minimum_requests: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            failure_threshold: 5,
            success_threshold: 2,
            reset_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(10),
            monitor_window: Duration::from_secs(60),
            failure_rate_threshold: 50.0,
            minimum_requests: 10,
        }
    }
}

impl Config {
    pub fn with_failure_threshold(self, failure_threshold: u32) -> Self {
        Config {
            failure_threshold,
            ..self
        }
    }

    pub fn with_success_threshold(self, success_threshold: u32) -> Self {
        Config {
            success_threshold,
            ..self
        }
    }

    pub fn with_reset_timeout(self, reset_timeout: Duration) -> Self {
        Config {
            reset_timeout,
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        Config { timeout, ..self }
    }

    pub fn with_monitor_window(self, monitor_window: Duration) -> Self {
        Config {
            monitor_window,
            ..self
        }
    }

    /// Sets the failure rate threshold, in percent (`0.0..=100.0`).
    pub fn with_failure_rate_threshold(self, failure_rate_threshold: f64) -> Self {
        Config {
            failure_rate_threshold,
            ..self
        }
    }

    pub fn with_minimum_requests(self, minimum_requests: u32) -> Self {
        Config {
            minimum_requests,
            ..self
        }
    }

    /// Checks that every setting is usable.
    ///
    /// Durations must be non-zero, counts must be at least 1, and the failure
    /// rate threshold must be a percentage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("reset_timeout", self.reset_timeout),
            ("timeout", self.timeout),
            ("monitor_window", self.monitor_window),
        ];
        if let Some((field, _)) = durations.iter().find(|(_, d)| d.is_zero()) {
            return Err(ConfigError::ZeroDuration { field: *field });
        }

        let counts = [
            ("failure_threshold", self.failure_threshold),
            ("success_threshold", self.success_threshold),
            ("minimum_requests", self.minimum_requests),
        ];
        if let Some((field, _)) = counts.iter().find(|(_, n)| *n == 0) {
            return Err(ConfigError::ZeroThreshold { field: *field });
        }

        let rate = self.failure_rate_threshold;
        if !(0.0..=100.0).contains(&rate) {
            return Err(ConfigError::FailureRate { rate });
        }

        Ok(())
    }
}
