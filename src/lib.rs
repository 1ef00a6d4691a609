//! # tokenpool
//!
//! Bounded, self-replenishing token pool: pre-generated opaque values are
//! held so callers can acquire one without paying the generation cost on the
//! hot path. Useful where producing a value (a derived credential, a
//! precomputed buffer, a rate-limit permit) is expensive or rate-limited and
//! consumers need low-latency acquisition with bounded memory.
//!
//! ## Features
//!
//! - Bounded primary queue backed by a secondary overflow queue
//! - Periodic replenishment by a dedicated background thread
//! - Promotion from overflow into primary on every acquisition
//! - Lifecycle hooks for observability (created/saved/cached/discarded/removed)
//! - Non-blocking acquisition, plus an async variant with timeout
//! - Metrics and health snapshots, Prometheus-format export
//! - Explicit shutdown; dropping the pool stops the background thread
//!
//! ## Quick Start
//!
//! ```rust
//! use tokenpool::{PoolConfig, TokenPool};
//! use std::time::Duration;
//!
//! // 2 tokens pre-warmed, up to 4 held, replenished every 100ms.
//! let config = PoolConfig::new(2, 4, 0, Duration::from_millis(100));
//! let pool = TokenPool::new(config, || String::from("credential"));
//!
//! if let Some(token) = pool.token() {
//!     println!("Got: {token}");
//! }
//! ```

mod config;
mod errors;
mod generator;
mod health;
mod hooks;
mod metrics;
mod pool;
mod replenisher;

pub use config::PoolConfig;
pub use errors::{PoolError, PoolResult};
pub use generator::TokenGenerator;
pub use health::HealthStatus;
pub use hooks::{HookSet, NoopHooks, PoolHooks};
pub use metrics::{MetricsExporter, PoolMetrics};
pub use pool::TokenPool;
