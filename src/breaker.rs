use crate::{policy, window::RollingWindow, Config, ConfigError, Error};
use parking_lot::Mutex;
use std::{fmt, future::Future, sync::Arc};
use tokio::time::{self, Duration, Instant};

/// The state of a [`CircuitBreaker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitState {
    /// Calls pass through to the dependency.
    Closed,
    /// Calls are rejected without being attempted.
    Open,
    /// Trial calls are let through to find out whether the dependency has
    /// recovered.
    HalfOpen,
}

/// Guards calls to a single dependency.
///
/// A `CircuitBreaker` is a cheap handle: clones share the same state, so a
/// breaker can be handed to every task that talks to the dependency.
#[derive(Clone)]
pub struct CircuitBreaker(Arc<Shared>);

/// A point-in-time snapshot of a breaker's bookkeeping.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Stats {
    pub name: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    /// Successful trial calls since the breaker last went half-open.
    pub consecutive_successes: u32,
    /// Calls recorded in the rolling window.
    pub total_requests: usize,
    /// Failed calls recorded in the rolling window.
    pub failed_requests: usize,
    /// Percentage of the calls in the rolling window that failed.
    pub failure_rate: f64,
    pub last_failure: Option<Instant>,
    pub last_success: Option<Instant>,
    pub last_state_change: Instant,
    /// How many times the breaker has opened since it was created or reset.
    pub times_opened: u64,
}

/// Permission to make one call through a breaker.
///
/// Returned by [`CircuitBreaker::admit`]. The outcome of the call must be
/// reported with [`Call::succeeded`] or [`Call::failed`]. Dropping a `Call`
/// without reporting records nothing, and gives back its half-open trial slot
/// if it holds one.
#[must_use = "the outcome of an admitted call must be reported"]
#[derive(Debug)]
pub struct Call {
    breaker: CircuitBreaker,
    generation: u64,
    /// Holds one of the half-open trial slots until the call is reported or
    /// dropped.
    trial: bool,
}

#[derive(Debug)]
struct Shared {
    name: String,
    config: Config,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    /// Bumped on every transition and on reset. Outcomes of calls admitted
    /// under an older generation are discarded.
    generation: u64,
    consecutive_failures: u32,
    consecutive_successes: u32,
    /// Half-open trial calls admitted and not yet reported.
    trials_in_flight: u32,
    window: RollingWindow,
    last_failure: Option<Instant>,
    last_success: Option<Instant>,
    last_state_change: Instant,
    times_opened: u64,
}

// === impl CircuitBreaker ===

impl CircuitBreaker {
    /// Returns a new breaker named `name`, which is used in log messages and
    /// [`Stats`].
    ///
    /// # Errors
    ///
    /// If `config` does not pass [`Config::validate`].
    pub fn new(name: impl Into<String>, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(name.into(), config))
    }

    /// Returns a new breaker with the default [`Config`].
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::build(name.into(), Config::default())
    }

    pub(crate) fn build(name: String, config: Config) -> Self {
        tracing::debug!(
            breaker = %name,
            failure_threshold = config.failure_threshold,
            failure_rate_threshold = config.failure_rate_threshold,
            reset_timeout = ?config.reset_timeout,
            timeout = ?config.timeout,
            "Circuit breaker created"
        );
        let inner = Inner::new(&config, Instant::now(), 0);
        CircuitBreaker(Arc::new(Shared {
            name,
            config,
            inner: Mutex::new(inner),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn config(&self) -> &Config {
        &self.0.config
    }

    /// Returns `true` if both handles refer to the same breaker.
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.0, &other.0)
    }

    /// Runs `op` if the breaker admits it, racing it against the configured
    /// timeout.
    ///
    /// The operation is never started while the breaker is open. If the
    /// timeout elapses first, the operation's future is dropped and the call is
    /// counted as a failure.
    ///
    /// # Errors
    ///
    /// - [`Error::Open`] if the breaker rejected the call.
    /// - [`Error::Timeout`] if `op` did not complete in time.
    /// - [`Error::Inner`] with the operation's own error.
    pub async fn execute<F, Fut, T, E>(&self, op: F) -> Result<T, Error<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(call) = self.admit() else {
            return Err(Error::Open);
        };
        let timeout = self.0.config.timeout;
        match time::timeout(timeout, op()).await {
            Ok(Ok(value)) => {
                call.succeeded();
                Ok(value)
            }
            Ok(Err(error)) => {
                call.failed();
                Err(Error::Inner(error))
            }
            Err(_) => {
                tracing::trace!(breaker = %self.0.name, ?timeout, "Call timed out");
                call.failed();
                Err(Error::Timeout(timeout))
            }
        }
    }

    /// Asks the breaker for permission to make a call.
    ///
    /// Returns `None` while the breaker is open. Once the reset timeout has
    /// passed, the breaker goes half-open and this call is admitted as a
    /// trial. At most [`Config::success_threshold`] trials run at once; any
    /// more are rejected until one of them is reported or dropped.
    ///
    /// This is the building block for [`execute`](Self::execute); it is meant
    /// for callers that drive the guarded future themselves, and it applies no
    /// timeout.
    pub fn admit(&self) -> Option<Call> {
        let mut inner = self.0.inner.lock();
        if inner.state == CircuitState::Open {
            let now = Instant::now();
            let open_for = now.saturating_duration_since(inner.last_state_change);
            let reset_timeout = self.0.config.reset_timeout;
            if open_for < reset_timeout {
                tracing::trace!(
                    breaker = %self.0.name,
                    retry_in = ?(reset_timeout - open_for),
                    "Circuit open; rejecting call"
                );
                return None;
            }

            inner.transition(CircuitState::HalfOpen, now);
            tracing::debug!(
                breaker = %self.0.name,
                ?open_for,
                "Circuit half-open; admitting trial call"
            );
        }

        let trial = inner.state == CircuitState::HalfOpen;
        if trial {
            if inner.trials_in_flight >= self.0.config.success_threshold {
                tracing::trace!(
                    breaker = %self.0.name,
                    trials = inner.trials_in_flight,
                    "Circuit half-open; trial limit reached, rejecting call"
                );
                return None;
            }
            inner.trials_in_flight += 1;
        }

        Some(Call {
            breaker: self.clone(),
            generation: inner.generation,
            trial,
        })
    }

    /// Returns the breaker's current state.
    ///
    /// An open breaker reports [`CircuitState::Open`] until a call is made
    /// after the reset timeout, even if the timeout has already passed.
    pub fn state(&self) -> CircuitState {
        self.0.inner.lock().state
    }

    pub fn stats(&self) -> Stats {
        let now = Instant::now();
        let mut inner = self.0.inner.lock();
        let totals = inner.window.totals(now);
        Stats {
            name: self.0.name.clone(),
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            consecutive_successes: inner.consecutive_successes,
            total_requests: totals.total,
            failed_requests: totals.failures,
            failure_rate: totals.failure_rate(),
            last_failure: inner.last_failure,
            last_success: inner.last_success,
            last_state_change: inner.last_state_change,
            times_opened: inner.times_opened,
        }
    }

    /// Forces the breaker closed and clears all of its counters and its
    /// rolling window.
    ///
    /// Outcomes of calls that were admitted before the reset are discarded
    /// when they complete.
    pub fn reset(&self) {
        let mut inner = self.0.inner.lock();
        let generation = inner.generation + 1;
        *inner = Inner::new(&self.0.config, Instant::now(), generation);
        tracing::debug!(breaker = %self.0.name, "Circuit reset");
    }

    fn release_trial(&self, generation: u64) {
        let mut inner = self.0.inner.lock();
        if inner.generation == generation {
            inner.trials_in_flight = inner.trials_in_flight.saturating_sub(1);
        }
    }

    fn record(&self, generation: u64, trial: bool, success: bool) {
        let now = Instant::now();
        let config = &self.0.config;
        let mut inner = self.0.inner.lock();
        if inner.generation != generation {
            tracing::trace!(
                breaker = %self.0.name,
                success,
                "Discarding outcome of a call admitted before the last transition"
            );
            return;
        }

        if trial {
            inner.trials_in_flight = inner.trials_in_flight.saturating_sub(1);
        }
        inner.window.record(now, success);

        if success {
            inner.last_success = Some(now);
            inner.consecutive_failures = 0;
            if inner.state == CircuitState::HalfOpen {
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= config.success_threshold {
                    tracing::info!(
                        breaker = %self.0.name,
                        successes = inner.consecutive_successes,
                        "Circuit closed; dependency recovered"
                    );
                    inner.transition(CircuitState::Closed, now);
                }
            }
            return;
        }

        inner.last_failure = Some(now);
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        match inner.state {
            CircuitState::Closed => {
                let totals = inner.window.totals(now);
                let trip = policy::should_open(config, inner.consecutive_failures, totals);
                if let Some(trip) = trip {
                    tracing::warn!(
                        breaker = %self.0.name,
                        reason = %trip,
                        reset_timeout = ?config.reset_timeout,
                        "Circuit opened"
                    );
                    inner.transition(CircuitState::Open, now);
                }
            }
            CircuitState::HalfOpen => {
                tracing::warn!(
                    breaker = %self.0.name,
                    reset_timeout = ?config.reset_timeout,
                    "Trial call failed; circuit reopened"
                );
                inner.transition(CircuitState::Open, now);
            }
            // calls are never admitted under an open generation.
            CircuitState::Open => {}
        }
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.0.name)
            .field("state", &self.state())
            .field("config", &self.0.config)
            .finish()
    }
}

// === impl Call ===

impl Call {
    pub fn succeeded(mut self) {
        self.breaker.record(self.generation, self.trial, true);
        self.trial = false;
    }

    pub fn failed(mut self) {
        self.breaker.record(self.generation, self.trial, false);
        self.trial = false;
    }
}

impl Drop for Call {
    fn drop(&mut self) {
        if self.trial {
            self.breaker.release_trial(self.generation);
        }
    }
}

// === impl Inner ===

impl Inner {
    fn new(config: &Config, now: Instant, generation: u64) -> Self {
        Inner {
            state: CircuitState::Closed,
            generation,
            consecutive_failures: 0,
            consecutive_successes: 0,
            trials_in_flight: 0,
            window: RollingWindow::new(config.monitor_window),
            last_failure: None,
            last_success: None,
            last_state_change: now,
            times_opened: 0,
        }
    }

    fn transition(&mut self, to: CircuitState, now: Instant) {
        self.state = to;
        self.generation += 1;
        self.last_state_change = now;
        self.consecutive_successes = 0;
        self.trials_in_flight = 0;
        match to {
            CircuitState::Open => self.times_opened += 1,
            CircuitState::Closed => {
                self.consecutive_failures = 0;
                self.window.clear();
            }
            CircuitState::HalfOpen => {}
        }
    }
}

// === impl CircuitState ===

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half-open",
        })
    }
}

// === impl Stats ===

impl Stats {
    /// How long the breaker has been in its current state.
    pub fn time_in_state(&self) -> Duration {
        self.last_state_change.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::atomic::{AtomicUsize, Ordering},
    };

    fn breaker(config: Config) -> CircuitBreaker {
        CircuitBreaker::new("test", config).expect("valid config")
    }

    async fn fail(breaker: &CircuitBreaker) -> Error<io::Error> {
        breaker
            .execute(|| async { Err::<(), _>(io::Error::new(io::ErrorKind::Other, "boom")) })
            .await
            .expect_err("call should fail")
    }

    async fn succeed(breaker: &CircuitBreaker) {
        breaker
            .execute(|| async { Ok::<_, io::Error>(()) })
            .await
            .expect("call should succeed")
    }

    #[tokio::test(start_paused = true)]
    async fn opens_after_consecutive_failures() {
        let breaker = breaker(Config::default().with_failure_threshold(3));

        for _ in 0..2 {
            assert!(fail(&breaker).await.is_inner());
            assert_eq!(breaker.state(), CircuitState::Closed);
        }
        assert!(fail(&breaker).await.is_inner());
        assert_eq!(breaker.state(), CircuitState::Open);

        let invoked = AtomicUsize::new(0);
        let result = breaker
            .execute(|| {
                invoked.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, io::Error>(()) }
            })
            .await;
        assert!(matches!(result, Err(Error::Open)));
        assert_eq!(invoked.load(Ordering::SeqCst), 0);

        let stats = breaker.stats();
        assert_eq!(stats.consecutive_failures, 3);
        assert_eq!(stats.times_opened, 1);
        // the rejected call is not part of the window.
        assert_eq!(stats.total_requests, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn success_resets_consecutive_failures() {
        // keep the window below the rate check's minimum.
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(3)
                .with_minimum_requests(100),
        );

        for _ in 0..5 {
            fail(&breaker).await;
            fail(&breaker).await;
            succeed(&breaker).await;
        }
        let stats = breaker.stats();
        assert_eq!(stats.state, CircuitState::Closed);
        assert_eq!(stats.consecutive_failures, 0);
        assert_eq!(stats.total_requests, 15);
        assert_eq!(stats.failed_requests, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn opens_on_failure_rate() {
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(5)
                .with_minimum_requests(10)
                .with_failure_rate_threshold(50.0),
        );

        // alternate, so the consecutive-failure threshold is never reached.
        for _ in 0..4 {
            succeed(&breaker).await;
            fail(&breaker).await;
        }
        succeed(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);

        // the tenth call is the fifth failure.
        fail(&breaker).await;
        let stats = breaker.stats();
        assert_eq!(stats.state, CircuitState::Open);
        assert_eq!(stats.total_requests, 10);
        assert_eq!(stats.failure_rate, 50.0);
    }

    #[tokio::test(start_paused = true)]
    async fn no_rate_trip_below_minimum_requests() {
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(20)
                .with_minimum_requests(10),
        );

        for _ in 0..9 {
            fail(&breaker).await;
        }
        let stats = breaker.stats();
        assert_eq!(stats.state, CircuitState::Closed);
        assert_eq!(stats.failure_rate, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_outcomes_do_not_count_toward_rate() {
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(100)
                .with_minimum_requests(4)
                .with_monitor_window(Duration::from_secs(10)),
        );

        for _ in 0..3 {
            fail(&breaker).await;
        }
        time::advance(Duration::from_secs(11)).await;
        assert_eq!(breaker.stats().total_requests, 0);

        // only one outcome is in the window, below the minimum.
        fail(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_closes_after_success_threshold() {
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(1)
                .with_success_threshold(2)
                .with_reset_timeout(Duration::from_secs(5)),
        );

        fail(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Open);

        time::advance(Duration::from_secs(5)).await;
        // the timeout passing does not change the state by itself.
        assert_eq!(breaker.state(), CircuitState::Open);

        succeed(&breaker).await;
        let stats = breaker.stats();
        assert_eq!(stats.state, CircuitState::HalfOpen);
        assert_eq!(stats.consecutive_successes, 1);

        succeed(&breaker).await;
        let stats = breaker.stats();
        assert_eq!(stats.state, CircuitState::Closed);
        assert_eq!(stats.consecutive_successes, 0);
        assert_eq!(stats.consecutive_failures, 0);
        assert_eq!(stats.total_requests, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_reopens_on_any_failure() {
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(1)
                .with_success_threshold(3)
                .with_reset_timeout(Duration::from_secs(5)),
        );

        fail(&breaker).await;
        time::advance(Duration::from_secs(5)).await;
        succeed(&breaker).await;
        succeed(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        assert!(fail(&breaker).await.is_inner());
        let stats = breaker.stats();
        assert_eq!(stats.state, CircuitState::Open);
        assert_eq!(stats.consecutive_successes, 0);
        assert_eq!(stats.times_opened, 2);

        // the cooldown starts over from the reopening.
        time::advance(Duration::from_secs(4)).await;
        assert!(fail(&breaker).await.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_counts_as_failure() {
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(2)
                .with_timeout(Duration::from_millis(100)),
        );

        let started = Instant::now();
        let result = breaker
            .execute(std::future::pending::<Result<(), io::Error>>)
            .await;
        assert!(matches!(result, Err(Error::Timeout(t)) if t == Duration::from_millis(100)));
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert_eq!(breaker.stats().consecutive_failures, 1);

        // a timeout and an operation error count the same.
        fail(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_operation_is_dropped() {
        let breaker = breaker(Config::default().with_timeout(Duration::from_millis(100)));
        let finished = Arc::new(AtomicUsize::new(0));

        let op_finished = finished.clone();
        let result = breaker
            .execute(|| async move {
                time::sleep(Duration::from_secs(1)).await;
                op_finished.fetch_add(1, Ordering::SeqCst);
                Ok::<_, io::Error>(())
            })
            .await;
        assert!(result.unwrap_err().is_timeout());

        time::advance(Duration::from_secs(2)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
        let stats = breaker.stats();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.failed_requests, 1);
        assert!(stats.last_success.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn operation_error_is_returned_verbatim() {
        let breaker = breaker(Config::default());
        let err = fail(&breaker).await.into_inner().expect("inner error");
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test(start_paused = true)]
    async fn reset_is_idempotent() {
        let breaker = breaker(Config::default().with_failure_threshold(2));
        fail(&breaker).await;
        fail(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Open);

        breaker.reset();
        let once = breaker.stats();
        breaker.reset();
        let twice = breaker.stats();

        for stats in [&once, &twice] {
            assert_eq!(stats.state, CircuitState::Closed);
            assert_eq!(stats.consecutive_failures, 0);
            assert_eq!(stats.consecutive_successes, 0);
            assert_eq!(stats.total_requests, 0);
            assert_eq!(stats.times_opened, 0);
            assert!(stats.last_failure.is_none());
        }
        assert_eq!(once, twice);

        succeed(&breaker).await;
    }

    #[tokio::test(start_paused = true)]
    async fn outcome_admitted_before_reset_is_discarded() {
        let breaker = breaker(Config::default().with_failure_threshold(1));
        let call = breaker.admit().expect("closed breaker admits calls");
        breaker.reset();
        call.failed();

        let stats = breaker.stats();
        assert_eq!(stats.state, CircuitState::Closed);
        assert_eq!(stats.consecutive_failures, 0);
        assert_eq!(stats.total_requests, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_failures_open_once() {
        let breaker = breaker(Config::default().with_failure_threshold(3));

        let tasks = (0..10)
            .map(|_| {
                let breaker = breaker.clone();
                tokio::spawn(async move {
                    breaker
                        .execute(|| async {
                            time::sleep(Duration::from_millis(10)).await;
                            Err::<(), _>(io::Error::new(io::ErrorKind::Other, "boom"))
                        })
                        .await
                })
            })
            .collect::<Vec<_>>();
        for task in tasks {
            let result = task.await.expect("task panicked");
            assert!(result.unwrap_err().is_inner());
        }

        let stats = breaker.stats();
        assert_eq!(stats.state, CircuitState::Open);
        assert_eq!(stats.times_opened, 1);
        // failures after the trip belong to calls admitted while closed.
        assert_eq!(stats.consecutive_failures, 3);
        assert_eq!(stats.total_requests, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn records_outcome_timestamps() {
        let breaker = breaker(Config::default());
        succeed(&breaker).await;
        let succeeded_at = Instant::now();

        time::advance(Duration::from_secs(1)).await;
        fail(&breaker).await;

        let stats = breaker.stats();
        assert_eq!(stats.last_success, Some(succeeded_at));
        assert_eq!(stats.last_failure, Some(Instant::now()));
        assert!(stats.time_in_state() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_limits_trials_in_flight() {
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(1)
                .with_success_threshold(2)
                .with_reset_timeout(Duration::from_secs(5)),
        );
        fail(&breaker).await;
        time::advance(Duration::from_secs(5)).await;

        let first = breaker.admit().expect("first trial is admitted");
        let second = breaker.admit().expect("second trial is admitted");
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        for _ in 0..50 {
            assert!(breaker.admit().is_none());
        }

        // reporting a trial frees its slot.
        first.succeeded();
        let third = breaker.admit().expect("a slot was freed");
        assert!(breaker.admit().is_none());

        second.succeeded();
        assert_eq!(breaker.state(), CircuitState::Closed);
        // the straggler from the half-open generation changes nothing.
        third.failed();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(breaker.admit().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_trial_frees_its_slot() {
        let breaker = breaker(
            Config::default()
                .with_failure_threshold(1)
                .with_success_threshold(1)
                .with_reset_timeout(Duration::from_secs(5)),
        );
        fail(&breaker).await;
        time::advance(Duration::from_secs(5)).await;

        let trial = breaker.admit().expect("trial is admitted");
        assert!(breaker.admit().is_none());
        assert!(fail(&breaker).await.is_open());

        drop(trial);
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        succeed(&breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn with_defaults_uses_default_config() {
        let breaker = CircuitBreaker::with_defaults("inventory");
        assert_eq!(breaker.name(), "inventory");
        assert_eq!(breaker.config(), &Config::default());
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(breaker.admit().is_some());
    }

    #[test]
    fn rejects_invalid_config() {
        let err = CircuitBreaker::new("bad", Config::default().with_failure_threshold(0))
            .expect_err("zero threshold is invalid");
        assert_eq!(
            err,
            ConfigError::ZeroThreshold {
                field: "failure_threshold"
            }
        );
    }

    #[test]
    fn state_display() {
        assert_eq!(CircuitState::Closed.to_string(), "closed");
        assert_eq!(CircuitState::Open.to_string(), "open");
        assert_eq!(CircuitState::HalfOpen.to_string(), "half-open");
    }
}
