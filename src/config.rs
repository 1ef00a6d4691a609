//! Pool configuration options

use std::time::Duration;

/// Configuration for a [`TokenPool`](crate::TokenPool).
///
/// # Examples
///
/// ```
/// use tokenpool::PoolConfig;
/// use std::time::Duration;
///
/// let config = PoolConfig::new(3, 10, 5, Duration::from_secs(1));
///
/// assert_eq!(config.initial_size, 3);
/// assert_eq!(config.max_size, 10);
/// assert_eq!(config.cache_max_size, 5);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Tokens generated synchronously before the constructor returns
    pub initial_size: usize,

    /// Primary queue capacity; zero disables the pool entirely
    pub max_size: usize,

    /// Overflow queue capacity; zero disables overflow, so tokens generated
    /// while the primary queue is full are discarded
    pub cache_max_size: usize,

    /// Interval between automatic replenish ticks
    pub period: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_size: 0,
            max_size: 100,
            cache_max_size: 0,
            period: Duration::from_secs(1),
        }
    }
}

impl PoolConfig {
    /// Create a configuration from raw sizes.
    ///
    /// Negative sizes are silently normalized to zero rather than rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenpool::PoolConfig;
    /// use std::time::Duration;
    ///
    /// let config = PoolConfig::new(-2, -1, -3, Duration::from_secs(1));
    ///
    /// assert_eq!(config.initial_size, 0);
    /// assert_eq!(config.max_size, 0);
    /// assert_eq!(config.cache_max_size, 0);
    /// ```
    pub fn new(initial_size: i64, max_size: i64, cache_max_size: i64, period: Duration) -> Self {
        Self {
            initial_size: initial_size.max(0) as usize,
            max_size: max_size.max(0) as usize,
            cache_max_size: cache_max_size.max(0) as usize,
            period,
        }
    }

    /// Set the number of tokens pre-generated at construction
    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.initial_size = size;
        self
    }

    /// Set the primary queue capacity
    pub fn with_max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Set the overflow queue capacity
    pub fn with_cache_max_size(mut self, size: usize) -> Self {
        self.cache_max_size = size;
        self
    }

    /// Set the replenish interval
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }
}
