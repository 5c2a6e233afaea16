//! Named circuit breakers.
//!
//! A [`Registry`] hands out one [`CircuitBreaker`] per dependency name,
//! creating it the first time the name is asked for. Registries are ordinary
//! values: construct one at startup and pass it to whatever needs breakers.
use crate::{CircuitBreaker, Config, ConfigError, Stats};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A keyed collection of [`CircuitBreaker`]s.
///
/// # First registration wins
///
/// A breaker's configuration is fixed when it is created. If
/// [`get_with_config`](Registry::get_with_config) is called for a name that
/// already has a breaker, the configuration passed in is ignored and the
/// existing breaker is returned. Register each dependency's configuration
/// once, before the breaker is first used.
#[derive(Debug, Default)]
pub struct Registry {
    default_config: Config,
    breakers: RwLock<HashMap<String, CircuitBreaker>>,
}

impl Registry {
    /// Returns an empty registry whose breakers use the default [`Config`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an empty registry whose breakers use `config` unless another
    /// configuration is given when they are created.
    ///
    /// # Errors
    ///
    /// If `config` does not pass [`Config::validate`].
    pub fn with_default_config(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Registry {
            default_config: config,
            breakers: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the breaker named `name`, creating it with the registry's
    /// default configuration if it does not exist yet.
    pub fn get(&self, name: &str) -> CircuitBreaker {
        if let Some(breaker) = self.breakers.read().get(name) {
            return breaker.clone();
        }

        self.breakers
            .write()
            .entry(name.to_owned())
            .or_insert_with(|| {
                tracing::debug!(breaker = %name, "Registering circuit breaker");
                CircuitBreaker::build(name.to_owned(), self.default_config.clone())
            })
            .clone()
    }

    /// Returns the breaker named `name`, creating it with `config` if it does
    /// not exist yet.
    ///
    /// If the breaker already exists, `config` is ignored; see the
    /// [type-level documentation](Registry#first-registration-wins).
    ///
    /// # Errors
    ///
    /// If the breaker has to be created and `config` does not pass
    /// [`Config::validate`].
    pub fn get_with_config(
        &self,
        name: &str,
        config: Config,
    ) -> Result<CircuitBreaker, ConfigError> {
        let mut breakers = self.breakers.write();
        if let Some(breaker) = breakers.get(name) {
            if breaker.config() != &config {
                tracing::debug!(
                    breaker = %name,
                    "Circuit breaker already registered; ignoring new config"
                );
            }
            return Ok(breaker.clone());
        }

        let breaker = CircuitBreaker::new(name, config)?;
        breakers.insert(name.to_owned(), breaker.clone());
        Ok(breaker)
    }

    pub fn get_all(&self) -> HashMap<String, CircuitBreaker> {
        self.breakers.read().clone()
    }

    /// Returns a snapshot of every registered breaker's [`Stats`].
    pub fn all_stats(&self) -> HashMap<String, Stats> {
        self.breakers
            .read()
            .iter()
            .map(|(name, breaker)| (name.clone(), breaker.stats()))
            .collect()
    }

    /// Resets the breaker named `name`. Returns `false` if there is no such
    /// breaker.
    pub fn reset(&self, name: &str) -> bool {
        match self.breakers.read().get(name) {
            Some(breaker) => {
                breaker.reset();
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&self) {
        for breaker in self.breakers.read().values() {
            breaker.reset();
        }
    }

    /// Removes the breaker named `name` from the registry.
    ///
    /// Handles to the breaker that are already held keep working, but a later
    /// [`get`](Registry::get) creates a fresh breaker.
    pub fn remove(&self, name: &str) -> Option<CircuitBreaker> {
        self.breakers.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.breakers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.read().is_empty()
    }
}
