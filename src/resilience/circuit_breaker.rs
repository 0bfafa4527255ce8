//! # Circuit Breaker Implementation
//!
//! Fault isolation for the remote seat-reservation boundary. Classic three
//! state pattern: Closed (normal operation), Open (failing fast), and
//! Half-Open (probing recovery).
//!
//! Note the failure contract: a reservation *denial* is a successful call
//! that answered `false`; only transport errors and timeouts count as
//! failures here. Callers encode that distinction in the `Result` they
//! return from the protected operation.

use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::config::CircuitBreakerConfig;
use super::metrics::CircuitBreakerMetrics;

/// Circuit breaker states representing the current operational mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircuitState {
    /// Normal operation - all calls are allowed through
    Closed = 0,
    /// Failure mode - all calls fail fast without executing
    Open = 1,
    /// Testing recovery - limited calls allowed to test system health
    HalfOpen = 2,
}

impl From<u8> for CircuitState {
    fn from(value: u8) -> Self {
        match value {
            0 => CircuitState::Closed,
            1 => CircuitState::Open,
            2 => CircuitState::HalfOpen,
            _ => CircuitState::Open, // Default to safest state
        }
    }
}

/// Errors that can occur during circuit breaker operation
#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError<E> {
    /// Circuit is open, rejecting all calls
    #[error("Circuit breaker is open for {component}")]
    CircuitOpen { component: String },

    /// Operation failed and was recorded
    #[error("Operation failed: {0}")]
    OperationFailed(E),
}

/// Rolling counters and open-timestamp, guarded by one lock.
#[derive(Debug, Default)]
struct BreakerWindow {
    total_calls: u64,
    success_count: u64,
    failure_count: u64,
    consecutive_failures: u64,
    half_open_calls: u64,
    opened_at: Option<Instant>,
}

/// Circuit breaker with atomic state and a single mutex-guarded window.
#[derive(Debug)]
pub struct CircuitBreaker {
    /// Component name for logging and metrics
    name: String,

    /// Current circuit state (atomic for lock-free reads)
    state: AtomicU8,

    /// Configuration parameters
    config: CircuitBreakerConfig,

    /// Counters and open-timestamp
    window: Mutex<BreakerWindow>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given name and configuration
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        info!(
            component = %name,
            failure_threshold = config.failure_threshold,
            timeout_ms = config.timeout.as_millis() as u64,
            success_threshold = config.success_threshold,
            "🛡️ Circuit breaker initialized"
        );

        Self {
            name,
            state: AtomicU8::new(CircuitState::Closed as u8),
            config,
            window: Mutex::new(BreakerWindow::default()),
        }
    }

    /// Get current circuit state
    pub fn state(&self) -> CircuitState {
        CircuitState::from(self.state.load(Ordering::Acquire))
    }

    /// Get component name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute an operation with circuit breaker protection
    pub async fn call<F, T, E, Fut>(&self, operation: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.should_allow_call() {
            return Err(CircuitBreakerError::CircuitOpen {
                component: self.name.clone(),
            });
        }

        let start_time = Instant::now();
        let result = operation().await;
        let duration_ms = start_time.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => self.record_success(duration_ms),
            Err(_) => self.record_failure(duration_ms),
        }

        result.map_err(CircuitBreakerError::OperationFailed)
    }

    /// Check if a call should be allowed based on current state
    fn should_allow_call(&self) -> bool {
        match self.state() {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let window = self.window.lock();
                match window.opened_at {
                    Some(opened_time) if opened_time.elapsed() >= self.config.timeout => {
                        drop(window);
                        self.transition_to_half_open();
                        true
                    }
                    Some(_) => false,
                    None => {
                        warn!(component = %self.name, "Circuit open but no timestamp recorded");
                        true
                    }
                }
            }
            CircuitState::HalfOpen => {
                let window = self.window.lock();
                window.half_open_calls < u64::from(self.config.success_threshold)
            }
        }
    }

    /// Record a successful operation
    fn record_success(&self, duration_ms: u64) {
        let mut window = self.window.lock();
        window.total_calls += 1;
        window.success_count += 1;

        debug!(
            component = %self.name,
            duration_ms = duration_ms,
            "🟢 Protected call succeeded"
        );

        match self.state() {
            CircuitState::HalfOpen => {
                window.half_open_calls += 1;
                if window.half_open_calls >= u64::from(self.config.success_threshold) {
                    drop(window);
                    self.transition_to_closed();
                }
            }
            CircuitState::Closed => {
                window.consecutive_failures = 0;
            }
            CircuitState::Open => {
                warn!(component = %self.name, "Success recorded while circuit is open");
            }
        }
    }

    /// Record a failed operation
    fn record_failure(&self, duration_ms: u64) {
        let mut window = self.window.lock();
        window.total_calls += 1;
        window.failure_count += 1;

        error!(
            component = %self.name,
            duration_ms = duration_ms,
            "🔴 Protected call failed"
        );

        match self.state() {
            CircuitState::Closed => {
                window.consecutive_failures += 1;
                if window.consecutive_failures >= u64::from(self.config.failure_threshold) {
                    drop(window);
                    self.transition_to_open();
                }
            }
            CircuitState::HalfOpen => {
                // Any failure during recovery probing re-opens immediately
                drop(window);
                self.transition_to_open();
            }
            CircuitState::Open => {}
        }
    }

    /// Transition to closed state (normal operation)
    fn transition_to_closed(&self) {
        self.state
            .store(CircuitState::Closed as u8, Ordering::Release);

        let mut window = self.window.lock();
        window.consecutive_failures = 0;
        window.half_open_calls = 0;
        window.opened_at = None;

        info!(
            component = %self.name,
            total_calls = window.total_calls,
            "🟢 Circuit breaker closed (recovered)"
        );
    }

    /// Transition to open state (failing fast)
    fn transition_to_open(&self) {
        self.state.store(CircuitState::Open as u8, Ordering::Release);

        let mut window = self.window.lock();
        window.opened_at = Some(Instant::now());
        window.half_open_calls = 0;

        error!(
            component = %self.name,
            consecutive_failures = window.consecutive_failures,
            failure_threshold = self.config.failure_threshold,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "🔴 Circuit breaker opened (failing fast)"
        );
    }

    /// Transition to half-open state (testing recovery)
    fn transition_to_half_open(&self) {
        self.state
            .store(CircuitState::HalfOpen as u8, Ordering::Release);

        let mut window = self.window.lock();
        window.half_open_calls = 0;

        info!(
            component = %self.name,
            success_threshold = self.config.success_threshold,
            "🟡 Circuit breaker half-open (testing recovery)"
        );
    }

    /// Force circuit to open state (for emergency situations)
    pub fn force_open(&self) {
        warn!(component = %self.name, "🚨 Circuit breaker forced open");
        self.transition_to_open();
    }

    /// Force circuit to closed state (for emergency recovery)
    pub fn force_closed(&self) {
        warn!(component = %self.name, "🚨 Circuit breaker forced closed");
        self.transition_to_closed();
    }

    /// Get current metrics snapshot
    pub fn metrics(&self) -> CircuitBreakerMetrics {
        let window = self.window.lock();
        let mut snapshot = CircuitBreakerMetrics {
            total_calls: window.total_calls,
            success_count: window.success_count,
            failure_count: window.failure_count,
            consecutive_failures: window.consecutive_failures,
            half_open_calls: window.half_open_calls,
            current_state: self.state(),
            failure_rate: 0.0,
            success_rate: 0.0,
        };

        if window.total_calls > 0 {
            snapshot.failure_rate = window.failure_count as f64 / window.total_calls as f64;
            snapshot.success_rate = window.success_count as f64 / window.total_calls as f64;
        }

        snapshot
    }
}
