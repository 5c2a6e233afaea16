use tokio::time::Duration;

/// Errors returned by a call guarded by a [`CircuitBreaker`].
///
/// The breaker adds two failure kinds of its own, [`Error::Open`] and
/// [`Error::Timeout`]. Anything the guarded operation fails with is passed
/// through untouched as [`Error::Inner`].
///
/// [`CircuitBreaker`]: crate::CircuitBreaker
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    /// The breaker is open; the operation was not attempted.
    #[error("circuit breaker is open")]
    Open,
    /// The operation did not complete within the configured timeout.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
    /// The operation itself failed.
    #[error(transparent)]
    Inner(E),
}

impl<E> Error<E> {
    pub fn is_open(&self) -> bool {
        matches!(self, Error::Open)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    pub fn is_inner(&self) -> bool {
        matches!(self, Error::Inner(_))
    }

    /// Returns the operation's own error, if this is one.
    pub fn into_inner(self) -> Option<E> {
        match self {
            Error::Inner(e) => Some(e),
            _ => None,
        }
    }
}

/// A [`Config`](crate::Config) that cannot be used to build a breaker.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("`{field}` must be greater than zero")]
    ZeroDuration { field: &'static str },
    #[error("`{field}` must be at least 1")]
    ZeroThreshold { field: &'static str },
    #[error("failure rate threshold must be a percentage between 0 and 100, got {rate}")]
    FailureRate { rate: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn inner_errors_pass_through() {
        let err: Error<io::Error> = Error::Inner(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.to_string(), "boom");
        assert!(err.is_inner());
        let inner = err.into_inner().expect("inner error");
        assert_eq!(inner.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn breaker_errors_are_distinguishable() {
        let open: Error<io::Error> = Error::Open;
        assert!(open.is_open());
        assert!(!open.is_timeout());
        assert!(open.into_inner().is_none());

        let timeout: Error<io::Error> = Error::Timeout(Duration::from_millis(250));
        assert!(timeout.is_timeout());
        assert_eq!(timeout.to_string(), "operation timed out after 250ms");
    }
}
