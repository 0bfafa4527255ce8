//! # Resilience Module
//!
//! Circuit breaker protection for the remote seat-reservation boundary,
//! preventing a struggling reservation backend from dragging every booking
//! call through a full timeout.
//!
//! ## Usage
//!
//! ```rust
//! use helabooking_core::resilience::{CircuitBreaker, CircuitBreakerConfig};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let config = CircuitBreakerConfig {
//!     failure_threshold: 5,
//!     timeout: Duration::from_secs(30),
//!     success_threshold: 2,
//! };
//!
//! let circuit_breaker = CircuitBreaker::new("seat-reservation", config);
//!
//! let result = circuit_breaker
//!     .call(|| async {
//!         // Remote reservation call here
//!         Ok::<bool, String>(true)
//!     })
//!     .await;
//! assert!(result.is_ok());
//! # }
//! ```

pub mod circuit_breaker;
pub mod config;
pub mod metrics;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerError, CircuitState};
pub use config::CircuitBreakerConfig;
pub use metrics::CircuitBreakerMetrics;
