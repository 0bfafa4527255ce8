use serde::Serialize;

use super::circuit_breaker::CircuitState;

/// Point-in-time snapshot of a circuit breaker's counters.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerMetrics {
    pub total_calls: u64,
    pub success_count: u64,
    pub failure_count: u64,
    pub consecutive_failures: u64,
    pub half_open_calls: u64,
    pub current_state: CircuitState,
    pub failure_rate: f64,
    pub success_rate: f64,
}

impl CircuitBreakerMetrics {
    pub fn new() -> Self {
        Self {
            total_calls: 0,
            success_count: 0,
            failure_count: 0,
            consecutive_failures: 0,
            half_open_calls: 0,
            current_state: CircuitState::Closed,
            failure_rate: 0.0,
            success_rate: 0.0,
        }
    }
}

impl Default for CircuitBreakerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
