//! Metrics collection and export for token pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of pool metrics
///
/// # Examples
///
/// ```
/// use tokenpool::{PoolConfig, TokenPool};
/// use std::time::Duration;
///
/// let config = PoolConfig::new(2, 4, 0, Duration::from_secs(60));
/// let pool = TokenPool::new(config, || 7u32);
///
/// let _ = pool.token();
/// let metrics = pool.metrics();
/// assert_eq!(metrics.created, 2);
/// assert_eq!(metrics.removed, 1);
/// assert_eq!(metrics.available_tokens, 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PoolMetrics {
    /// Total tokens produced by the generator
    pub created: usize,

    /// Total tokens saved into the primary queue
    pub saved: usize,

    /// Total tokens cached into the overflow queue
    pub cached: usize,

    /// Total tokens discarded because both queues were full
    pub discarded: usize,

    /// Total tokens acquired by callers
    pub removed: usize,

    /// Number of acquisitions that found the pool empty
    pub empty_events: usize,

    /// Current primary queue length
    pub available_tokens: usize,

    /// Current overflow queue length
    pub cached_tokens: usize,

    /// Primary queue capacity
    pub max_size: usize,

    /// Overflow queue capacity
    pub cache_max_size: usize,

    /// Primary queue fill ratio (0.0 to 1.0)
    pub fill_ratio: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("created".to_string(), self.created.to_string());
        metrics.insert("saved".to_string(), self.saved.to_string());
        metrics.insert("cached".to_string(), self.cached.to_string());
        metrics.insert("discarded".to_string(), self.discarded.to_string());
        metrics.insert("removed".to_string(), self.removed.to_string());
        metrics.insert("empty_events".to_string(), self.empty_events.to_string());
        metrics.insert(
            "available_tokens".to_string(),
            self.available_tokens.to_string(),
        );
        metrics.insert("cached_tokens".to_string(), self.cached_tokens.to_string());
        metrics.insert("max_size".to_string(), self.max_size.to_string());
        metrics.insert(
            "cache_max_size".to_string(),
            self.cache_max_size.to_string(),
        );
        metrics.insert("fill_ratio".to_string(), format!("{:.2}", self.fill_ratio));
        metrics
    }
}

/// Metrics exporter for Prometheus exposition format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenpool::{PoolConfig, TokenPool};
    /// use std::collections::HashMap;
    /// use std::time::Duration;
    ///
    /// let config = PoolConfig::new(1, 2, 0, Duration::from_secs(60));
    /// let pool = TokenPool::new(config, || 7u32);
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("my_pool", Some(&tags));
    /// assert!(output.contains("tokenpool_tokens_available"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        // Gauge metrics
        output.push_str("# HELP tokenpool_tokens_available Current primary queue length\n");
        output.push_str("# TYPE tokenpool_tokens_available gauge\n");
        output.push_str(&format!(
            "tokenpool_tokens_available{{{}}} {}\n",
            labels, metrics.available_tokens
        ));

        output.push_str("# HELP tokenpool_tokens_cached Current overflow queue length\n");
        output.push_str("# TYPE tokenpool_tokens_cached gauge\n");
        output.push_str(&format!(
            "tokenpool_tokens_cached{{{}}} {}\n",
            labels, metrics.cached_tokens
        ));

        output.push_str("# HELP tokenpool_fill_ratio Primary queue fill ratio\n");
        output.push_str("# TYPE tokenpool_fill_ratio gauge\n");
        output.push_str(&format!(
            "tokenpool_fill_ratio{{{}}} {:.2}\n",
            labels, metrics.fill_ratio
        ));

        // Counter metrics
        output.push_str("# HELP tokenpool_tokens_created_total Total tokens generated\n");
        output.push_str("# TYPE tokenpool_tokens_created_total counter\n");
        output.push_str(&format!(
            "tokenpool_tokens_created_total{{{}}} {}\n",
            labels, metrics.created
        ));

        output.push_str("# HELP tokenpool_tokens_saved_total Total tokens saved to primary\n");
        output.push_str("# TYPE tokenpool_tokens_saved_total counter\n");
        output.push_str(&format!(
            "tokenpool_tokens_saved_total{{{}}} {}\n",
            labels, metrics.saved
        ));

        output.push_str("# HELP tokenpool_tokens_cached_total Total tokens cached to overflow\n");
        output.push_str("# TYPE tokenpool_tokens_cached_total counter\n");
        output.push_str(&format!(
            "tokenpool_tokens_cached_total{{{}}} {}\n",
            labels, metrics.cached
        ));

        output.push_str("# HELP tokenpool_tokens_discarded_total Total tokens discarded\n");
        output.push_str("# TYPE tokenpool_tokens_discarded_total counter\n");
        output.push_str(&format!(
            "tokenpool_tokens_discarded_total{{{}}} {}\n",
            labels, metrics.discarded
        ));

        output.push_str("# HELP tokenpool_tokens_removed_total Total tokens acquired\n");
        output.push_str("# TYPE tokenpool_tokens_removed_total counter\n");
        output.push_str(&format!(
            "tokenpool_tokens_removed_total{{{}}} {}\n",
            labels, metrics.removed
        ));

        output.push_str("# HELP tokenpool_events_empty_total Acquisitions on an empty pool\n");
        output.push_str("# TYPE tokenpool_events_empty_total counter\n");
        output.push_str(&format!(
            "tokenpool_events_empty_total{{{}}} {}\n",
            labels, metrics.empty_events
        ));

        output
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal counters, one per token fate plus empty-pool events
pub(crate) struct MetricsTracker {
    pub created: AtomicUsize,
    pub saved: AtomicUsize,
    pub cached: AtomicUsize,
    pub discarded: AtomicUsize,
    pub removed: AtomicUsize,
    pub empty_events: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            created: AtomicUsize::new(0),
            saved: AtomicUsize::new(0),
            cached: AtomicUsize::new(0),
            discarded: AtomicUsize::new(0),
            removed: AtomicUsize::new(0),
            empty_events: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(
        &self,
        available: usize,
        cached_tokens: usize,
        max_size: usize,
        cache_max_size: usize,
    ) -> PoolMetrics {
        let fill_ratio = if max_size > 0 {
            available as f64 / max_size as f64
        } else {
            0.0
        };

        PoolMetrics {
            created: self.created.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            cached: self.cached.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
            empty_events: self.empty_events.load(Ordering::Relaxed),
            available_tokens: available,
            cached_tokens,
            max_size,
            cache_max_size,
            fill_ratio,
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}
