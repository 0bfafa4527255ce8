//! # Runtime Configuration
//!
//! Environment-driven configuration with compiled defaults. Every knob has
//! a `HELABOOKING_*` variable; anything unset falls back to the constants
//! the rest of the crate uses directly. Durations are configured in
//! milliseconds.

use std::time::Duration;

use crate::constants::system;
use crate::consumers::WorkerConfig;
use crate::error::{HelabookingError, Result};
use crate::orchestration::{OutboxRelayConfig, PublishMode};
use crate::resilience::CircuitBreakerConfig;

/// Top-level configuration for a helabooking process.
#[derive(Debug, Clone)]
pub struct HelabookingConfig {
    /// Address the HTTP server binds.
    pub bind_address: String,
    /// Name of the topic exchange all events flow through.
    pub exchange: String,
    /// Upper bound on one reservation attempt.
    pub reservation_timeout: Duration,
    /// How confirmed-booking events reach the broker.
    pub publish_mode: PublishMode,
    pub circuit_breaker: CircuitBreakerConfig,
    pub worker: WorkerConfig,
    pub outbox_relay: OutboxRelayConfig,
}

impl Default for HelabookingConfig {
    fn default() -> Self {
        Self {
            bind_address: system::DEFAULT_BIND_ADDRESS.to_string(),
            exchange: system::DEFAULT_EXCHANGE.to_string(),
            reservation_timeout: system::DEFAULT_RESERVATION_TIMEOUT,
            publish_mode: PublishMode::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            worker: WorkerConfig::default(),
            outbox_relay: OutboxRelayConfig::default(),
        }
    }
}

impl HelabookingConfig {
    /// Load configuration from the environment, defaulting anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(address) = read_env("HELABOOKING_BIND_ADDRESS") {
            config.bind_address = address;
        }
        if let Some(exchange) = read_env("HELABOOKING_EXCHANGE") {
            config.exchange = exchange;
        }
        if let Some(timeout) = parse_env_ms("HELABOOKING_RESERVATION_TIMEOUT_MS")? {
            config.reservation_timeout = timeout;
        }
        if let Some(mode) = read_env("HELABOOKING_PUBLISH_MODE") {
            config.publish_mode = mode.parse().map_err(HelabookingError::Configuration)?;
        }

        if let Some(threshold) = parse_env::<u32>("HELABOOKING_BREAKER_FAILURE_THRESHOLD")? {
            config.circuit_breaker.failure_threshold = threshold;
        }
        if let Some(timeout) = parse_env_ms("HELABOOKING_BREAKER_TIMEOUT_MS")? {
            config.circuit_breaker.timeout = timeout;
        }
        if let Some(threshold) = parse_env::<u32>("HELABOOKING_BREAKER_SUCCESS_THRESHOLD")? {
            config.circuit_breaker.success_threshold = threshold;
        }

        if let Some(timeout) = parse_env_ms("HELABOOKING_VISIBILITY_TIMEOUT_MS")? {
            config.worker.visibility_timeout = timeout;
        }
        if let Some(interval) = parse_env_ms("HELABOOKING_POLL_INTERVAL_MS")? {
            config.worker.poll_interval = interval;
        }
        if let Some(batch_size) = parse_env::<usize>("HELABOOKING_BATCH_SIZE")? {
            config.worker.batch_size = batch_size;
        }
        if let Some(attempts) = parse_env::<u32>("HELABOOKING_MAX_DELIVERY_ATTEMPTS")? {
            config.worker.max_delivery_attempts = attempts;
        }

        if let Some(interval) = parse_env_ms("HELABOOKING_OUTBOX_POLL_INTERVAL_MS")? {
            config.outbox_relay.poll_interval = interval;
        }
        if let Some(batch_size) = parse_env::<usize>("HELABOOKING_OUTBOX_BATCH_SIZE")? {
            config.outbox_relay.batch_size = batch_size;
        }

        Ok(config)
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match read_env(key) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|err| {
            HelabookingError::Configuration(format!("invalid value for {key}: {err}"))
        }),
    }
}

fn parse_env_ms(key: &str) -> Result<Option<Duration>> {
    Ok(parse_env::<u64>(key)?.map(Duration::from_millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HelabookingConfig::default();
        assert_eq!(config.bind_address, system::DEFAULT_BIND_ADDRESS);
        assert_eq!(config.exchange, system::DEFAULT_EXCHANGE);
        assert_eq!(
            config.reservation_timeout,
            system::DEFAULT_RESERVATION_TIMEOUT
        );
        assert_eq!(config.publish_mode, PublishMode::Direct);
        assert_eq!(config.worker.batch_size, system::DEFAULT_BATCH_SIZE);
    }

    // Env-var mutation stays inside one test so parallel tests never race
    // on the same keys.
    #[test]
    fn test_env_overrides_and_validation() {
        std::env::set_var("HELABOOKING_RESERVATION_TIMEOUT_MS", "750");
        std::env::set_var("HELABOOKING_PUBLISH_MODE", "outbox");
        std::env::set_var("HELABOOKING_BREAKER_FAILURE_THRESHOLD", "9");
        let config = HelabookingConfig::from_env().unwrap();
        assert_eq!(config.reservation_timeout, Duration::from_millis(750));
        assert_eq!(config.publish_mode, PublishMode::Outbox);
        assert_eq!(config.circuit_breaker.failure_threshold, 9);

        std::env::set_var("HELABOOKING_BREAKER_FAILURE_THRESHOLD", "not-a-number");
        let result = HelabookingConfig::from_env();
        assert!(matches!(result, Err(HelabookingError::Configuration(_))));

        std::env::remove_var("HELABOOKING_RESERVATION_TIMEOUT_MS");
        std::env::remove_var("HELABOOKING_PUBLISH_MODE");
        std::env::remove_var("HELABOOKING_BREAKER_FAILURE_THRESHOLD");
    }
}
