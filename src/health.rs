//! Health monitoring for token pools

/// Health snapshot of a token pool
///
/// # Examples
///
/// ```
/// use tokenpool::{PoolConfig, TokenPool};
/// use std::time::Duration;
///
/// let config = PoolConfig::new(3, 3, 0, Duration::from_secs(60));
/// let pool = TokenPool::new(config, || 1u8);
///
/// let health = pool.health_status();
/// assert!(health.is_healthy());
/// assert_eq!(health.available_tokens, 3);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HealthStatus {
    /// Whether the pool can currently serve acquisitions
    pub is_healthy: bool,

    /// Number of warnings detected
    pub warning_count: usize,

    /// Primary queue fill ratio (0.0 to 1.0)
    pub fill_ratio: f64,

    /// Current primary queue length
    pub available_tokens: usize,

    /// Current overflow queue length
    pub cached_tokens: usize,

    /// Primary queue capacity
    pub max_size: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Derive a health snapshot from the current queue levels.
    pub fn new(available: usize, cached: usize, max_size: usize, cache_max_size: usize) -> Self {
        let fill_ratio = if max_size > 0 {
            available as f64 / max_size as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        if max_size == 0 {
            warnings.push("Pool is disabled (max size is zero)".to_string());
        } else if available == 0 {
            warnings.push("Primary queue is empty".to_string());
            is_healthy = false;
        }

        if cache_max_size > 0 && cached == cache_max_size {
            warnings.push("Overflow queue is full".to_string());
        }

        Self {
            is_healthy,
            warning_count: warnings.len(),
            fill_ratio,
            available_tokens: available,
            cached_tokens: cached,
            max_size,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}
