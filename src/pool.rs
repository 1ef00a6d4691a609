//! Core token pool implementation

use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::generator::TokenGenerator;
use crate::health::HealthStatus;
use crate::hooks::{NoopHooks, PoolHooks};
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};
use crate::replenisher::Replenisher;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

struct Queues<T> {
    primary: VecDeque<T>,
    overflow: VecDeque<T>,
}

/// Shared state behind the pool handle; the replenisher thread holds a
/// second reference.
struct PoolInner<T> {
    config: PoolConfig,
    queues: Mutex<Queues<T>>,
    generator: Box<dyn TokenGenerator<T>>,
    hooks: Box<dyn PoolHooks<T>>,
    metrics: MetricsTracker,
}

impl<T> PoolInner<T> {
    /// One replenish pass: generate a token and route it into the primary
    /// queue, the overflow queue, or drop it.
    ///
    /// Generation happens outside the lock so a slow generator does not stall
    /// concurrent acquires; capacity is re-checked under the lock before
    /// insertion. A disabled pool (`max_size == 0`) never invokes the
    /// generator.
    fn replenish(&self) {
        if self.config.max_size == 0 {
            return;
        }

        let token = self.generator.generate();
        self.metrics.created.fetch_add(1, Ordering::Relaxed);
        self.hooks.on_create(&token);

        let discarded = {
            let mut queues = self.queues.lock();
            if queues.primary.len() < self.config.max_size {
                self.metrics.saved.fetch_add(1, Ordering::Relaxed);
                self.hooks.on_save(&token);
                queues.primary.push_back(token);
                None
            } else if self.config.cache_max_size > 0
                && queues.overflow.len() < self.config.cache_max_size
            {
                self.metrics.cached.fetch_add(1, Ordering::Relaxed);
                self.hooks.on_cache(&token);
                queues.overflow.push_back(token);
                None
            } else {
                Some(token)
            }
        };

        if let Some(token) = discarded {
            self.metrics.discarded.fetch_add(1, Ordering::Relaxed);
            self.hooks.on_discard(&token);
        }
    }

    /// Remove the front primary token, promoting one overflow token into the
    /// vacancy. Promotion fires no hook of its own.
    fn token(&self) -> Option<T> {
        let token = {
            let mut queues = self.queues.lock();
            match queues.primary.pop_front() {
                Some(token) => {
                    if let Some(promoted) = queues.overflow.pop_front() {
                        queues.primary.push_back(promoted);
                    }
                    token
                }
                None => {
                    self.metrics.empty_events.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        };

        self.metrics.removed.fetch_add(1, Ordering::Relaxed);
        self.hooks.on_remove(&token);
        Some(token)
    }

    fn levels(&self) -> (usize, usize) {
        let queues = self.queues.lock();
        (queues.primary.len(), queues.overflow.len())
    }
}

/// Bounded, self-replenishing token pool.
///
/// Holds pre-generated tokens in a bounded primary queue backed by an
/// overflow queue, refilled on a fixed period by a background thread.
/// Acquisition never waits: [`token`](TokenPool::token) returns `None` when
/// the pool is empty.
///
/// # Examples
///
/// ```
/// use tokenpool::{PoolConfig, TokenPool};
/// use std::time::Duration;
///
/// let config = PoolConfig::new(2, 4, 0, Duration::from_secs(60));
/// let pool = TokenPool::new(config, || String::from("credential"));
///
/// assert_eq!(pool.available_count(), 2);
/// assert!(pool.token().is_some());
/// ```
pub struct TokenPool<T: Send + 'static> {
    inner: Arc<PoolInner<T>>,
    replenisher: Replenisher,
}

impl<T: Send + 'static> TokenPool<T> {
    /// Create a pool with no lifecycle hooks.
    ///
    /// Pre-warms the primary queue by running the replenish operation
    /// `initial_size` times synchronously, then starts the background
    /// replenisher, so the pool is ready to serve before it is returned.
    pub fn new<G>(config: PoolConfig, generator: G) -> Self
    where
        G: TokenGenerator<T> + 'static,
    {
        Self::with_hooks(config, generator, NoopHooks)
    }

    /// Create a pool with lifecycle hooks.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenpool::{HookSet, PoolConfig, TokenPool};
    /// use std::time::Duration;
    ///
    /// let hooks = HookSet::new().on_save(|t: &u32| println!("pooled {t}"));
    /// let config = PoolConfig::new(1, 2, 0, Duration::from_secs(60));
    /// let pool = TokenPool::with_hooks(config, || 9u32, hooks);
    /// assert_eq!(pool.available_count(), 1);
    /// ```
    pub fn with_hooks<G, H>(config: PoolConfig, generator: G, hooks: H) -> Self
    where
        G: TokenGenerator<T> + 'static,
        H: PoolHooks<T> + 'static,
    {
        let inner = Arc::new(PoolInner {
            queues: Mutex::new(Queues {
                primary: VecDeque::new(),
                overflow: VecDeque::new(),
            }),
            generator: Box::new(generator),
            hooks: Box::new(hooks),
            metrics: MetricsTracker::new(),
            config,
        });

        for _ in 0..inner.config.initial_size {
            inner.replenish();
        }

        let worker = Arc::clone(&inner);
        let replenisher = Replenisher::spawn(inner.config.period, move || worker.replenish());

        Self { inner, replenisher }
    }

    /// Acquire a token, or `None` if the pool is empty.
    ///
    /// Removes the front token from the primary queue and promotes one
    /// overflow token into the vacancy, if any. Never waits for
    /// availability; an empty pool is an expected condition, not an error.
    pub fn token(&self) -> Option<T> {
        self.inner.token()
    }

    /// Acquire a token asynchronously, polling until one is available or the
    /// timeout elapses.
    ///
    /// # Examples
    ///
    /// ```
    /// use tokenpool::{PoolConfig, TokenPool};
    /// use std::time::Duration;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let config = PoolConfig::new(1, 2, 0, Duration::from_secs(60));
    /// let pool = TokenPool::new(config, || 3u64);
    ///
    /// let token = pool.token_timeout(Duration::from_millis(100)).await.unwrap();
    /// assert_eq!(token, 3);
    /// # }
    /// ```
    pub async fn token_timeout(&self, timeout: Duration) -> PoolResult<T> {
        if self.inner.config.max_size == 0 {
            return Err(PoolError::Disabled);
        }

        tokio::time::timeout(timeout, async {
            loop {
                match self.token() {
                    Some(token) => return token,
                    None => tokio::time::sleep(Duration::from_millis(10)).await,
                }
            }
        })
        .await
        .map_err(|_| PoolError::Timeout(timeout))
    }

    /// Current primary queue length
    pub fn available_count(&self) -> usize {
        self.inner.levels().0
    }

    /// Current overflow queue length
    pub fn cached_count(&self) -> usize {
        self.inner.levels().1
    }

    /// Whether the pool is disabled (`max_size == 0`)
    pub fn is_disabled(&self) -> bool {
        self.inner.config.max_size == 0
    }

    /// The configuration the pool was built with
    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Get a metrics snapshot
    pub fn metrics(&self) -> PoolMetrics {
        let (available, cached) = self.inner.levels();
        self.inner.metrics.snapshot(
            available,
            cached,
            self.inner.config.max_size,
            self.inner.config.cache_max_size,
        )
    }

    /// Export metrics as a HashMap
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.metrics().export()
    }

    /// Export metrics in Prometheus exposition format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.metrics(), pool_name, tags)
    }

    /// Get a health snapshot
    pub fn health_status(&self) -> HealthStatus {
        let (available, cached) = self.inner.levels();
        HealthStatus::new(
            available,
            cached,
            self.inner.config.max_size,
            self.inner.config.cache_max_size,
        )
    }

    /// Stop the background replenisher and join its thread.
    ///
    /// Dropping the pool does the same; this makes the teardown point
    /// explicit.
    pub fn shutdown(mut self) {
        self.replenisher.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::HookSet;
    use std::sync::atomic::AtomicUsize;

    // Long enough that background ticks never interfere with a test run.
    const IDLE: Duration = Duration::from_secs(3600);

    fn counting_generator() -> (Arc<AtomicUsize>, impl Fn() -> usize + Send + Sync) {
        let count = Arc::new(AtomicUsize::new(0));
        let state = Arc::clone(&count);
        (count, move || state.fetch_add(1, Ordering::Relaxed))
    }

    #[test]
    fn test_prewarm_fills_primary() {
        let pool = TokenPool::new(PoolConfig::new(3, 5, 0, IDLE), || 0u8);
        assert_eq!(pool.available_count(), 3);
        assert_eq!(pool.cached_count(), 0);
    }

    #[test]
    fn test_empty_pool_returns_none() {
        let pool = TokenPool::new(PoolConfig::new(0, 5, 0, IDLE), || 0u8);
        assert!(pool.token().is_none());
        assert_eq!(pool.metrics().empty_events, 1);
    }

    #[test]
    fn test_tokens_come_out_in_fifo_order() {
        let (_, generator) = counting_generator();
        let pool = TokenPool::new(PoolConfig::new(3, 3, 0, IDLE), generator);

        assert_eq!(pool.token(), Some(0));
        assert_eq!(pool.token(), Some(1));
        assert_eq!(pool.token(), Some(2));
        assert_eq!(pool.token(), None);
    }

    #[test]
    fn test_promotion_refills_primary_from_overflow() {
        let (_, generator) = counting_generator();
        // Pre-warm runs replenish twice: primary=[0], overflow=[1].
        let pool = TokenPool::new(PoolConfig::new(2, 1, 1, IDLE), generator);
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.cached_count(), 1);

        assert_eq!(pool.token(), Some(0));
        // 1 was promoted at the moment 0 left; no new replenish happened.
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.cached_count(), 0);
        assert_eq!(pool.token(), Some(1));
    }

    #[test]
    fn test_overflow_disabled_discards_excess() {
        let (count, generator) = counting_generator();
        let pool = TokenPool::new(PoolConfig::new(2, 1, 0, IDLE), generator);

        assert_eq!(count.load(Ordering::Relaxed), 2);
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.cached_count(), 0);
        assert_eq!(pool.metrics().discarded, 1);

        // The discarded token is gone; only the saved one comes out.
        assert_eq!(pool.token(), Some(0));
        assert_eq!(pool.token(), None);
    }

    #[test]
    fn test_disabled_pool_never_calls_generator() {
        let (count, generator) = counting_generator();
        let pool = TokenPool::new(PoolConfig::new(5, 0, 3, IDLE), generator);

        pool.inner.replenish();
        pool.inner.replenish();

        assert_eq!(count.load(Ordering::Relaxed), 0);
        assert_eq!(pool.available_count(), 0);
        assert_eq!(pool.cached_count(), 0);
        assert!(pool.token().is_none());
        assert!(pool.is_disabled());
    }

    #[test]
    fn test_capacity_invariants_hold_under_overproduction() {
        let pool = TokenPool::new(PoolConfig::new(10, 3, 2, IDLE), || 0u8);

        assert_eq!(pool.available_count(), 3);
        assert_eq!(pool.cached_count(), 2);
        let metrics = pool.metrics();
        assert_eq!(metrics.created, 10);
        assert_eq!(metrics.saved, 3);
        assert_eq!(metrics.cached, 2);
        assert_eq!(metrics.discarded, 5);

        // Draining and refilling never exceeds either bound.
        for _ in 0..20 {
            let _ = pool.token();
            pool.inner.replenish();
            assert!(pool.available_count() <= 3);
            assert!(pool.cached_count() <= 2);
        }
    }

    #[test]
    fn test_replenish_after_acquire_refills() {
        let (_, generator) = counting_generator();
        let pool = TokenPool::new(PoolConfig::new(1, 1, 0, IDLE), generator);

        assert_eq!(pool.token(), Some(0));
        assert!(pool.token().is_none());
        pool.inner.replenish();
        assert_eq!(pool.token(), Some(1));
    }

    #[test]
    fn test_hooks_fire_once_per_transition() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hooks = HookSet::new()
            .on_create({
                let log = Arc::clone(&log);
                move |t: &usize| log.lock().push(("create", *t))
            })
            .on_save({
                let log = Arc::clone(&log);
                move |t: &usize| log.lock().push(("save", *t))
            })
            .on_cache({
                let log = Arc::clone(&log);
                move |t: &usize| log.lock().push(("cache", *t))
            })
            .on_discard({
                let log = Arc::clone(&log);
                move |t: &usize| log.lock().push(("discard", *t))
            })
            .on_remove({
                let log = Arc::clone(&log);
                move |t: &usize| log.lock().push(("remove", *t))
            });

        let (_, generator) = counting_generator();
        // Three replenishes: 0 saved, 1 cached, 2 discarded.
        let pool = TokenPool::with_hooks(PoolConfig::new(3, 1, 1, IDLE), generator, hooks);

        assert_eq!(pool.token(), Some(0));
        assert_eq!(pool.token(), Some(1));
        assert!(pool.token().is_none());

        assert_eq!(
            *log.lock(),
            vec![
                ("create", 0),
                ("save", 0),
                ("create", 1),
                ("cache", 1),
                ("create", 2),
                ("discard", 2),
                ("remove", 0),
                ("remove", 1),
            ]
        );
    }

    #[test]
    fn test_promotion_fires_no_hook() {
        let saves = Arc::new(AtomicUsize::new(0));
        let hooks = HookSet::new().on_save({
            let saves = Arc::clone(&saves);
            move |_: &usize| {
                saves.fetch_add(1, Ordering::Relaxed);
            }
        });

        let (_, generator) = counting_generator();
        let pool = TokenPool::with_hooks(PoolConfig::new(2, 1, 1, IDLE), generator, hooks);
        assert_eq!(saves.load(Ordering::Relaxed), 1);

        let _ = pool.token();
        // The overflow token moved into primary without an on_save.
        assert_eq!(pool.available_count(), 1);
        assert_eq!(saves.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_background_replenisher_refills_pool() {
        let pool = TokenPool::new(
            PoolConfig::new(0, 2, 0, Duration::from_millis(5)),
            || 0u8,
        );

        std::thread::sleep(Duration::from_millis(100));
        assert!(pool.token().is_some());
    }

    #[test]
    fn test_shutdown_stops_replenishment() {
        let (count, generator) = counting_generator();
        let pool = TokenPool::new(
            PoolConfig::new(0, 100, 0, Duration::from_millis(5)),
            generator,
        );

        std::thread::sleep(Duration::from_millis(30));
        pool.shutdown();
        let after = count.load(Ordering::Relaxed);

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::Relaxed), after);
    }

    #[test]
    fn test_health_status_tracks_levels() {
        let pool = TokenPool::new(PoolConfig::new(2, 2, 0, IDLE), || 0u8);
        assert!(pool.health_status().is_healthy());

        let _ = pool.token();
        let _ = pool.token();
        let health = pool.health_status();
        assert!(!health.is_healthy());
        assert_eq!(health.available_tokens, 0);
    }

    #[test]
    fn test_concurrent_acquires_get_distinct_tokens() {
        let (_, generator) = counting_generator();
        let pool = Arc::new(TokenPool::new(PoolConfig::new(64, 64, 0, IDLE), generator));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = Arc::clone(&pool);
            handles.push(std::thread::spawn(move || {
                let mut seen = Vec::new();
                for _ in 0..8 {
                    if let Some(token) = pool.token() {
                        seen.push(token);
                    }
                }
                seen
            }));
        }

        let mut all: Vec<usize> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        let len = all.len();
        all.dedup();
        assert_eq!(all.len(), len, "a token was handed out twice");
        assert_eq!(len, 64);
    }

    #[tokio::test]
    async fn test_async_acquire_hit() {
        let pool = TokenPool::new(PoolConfig::new(1, 2, 0, IDLE), || 5u32);
        let token = pool.token_timeout(Duration::from_millis(50)).await.unwrap();
        assert_eq!(token, 5);
    }

    #[tokio::test]
    async fn test_async_acquire_times_out_on_empty_pool() {
        let pool = TokenPool::new(PoolConfig::new(0, 2, 0, IDLE), || 5u32);
        let result = pool.token_timeout(Duration::from_millis(30)).await;
        assert!(matches!(result, Err(PoolError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_async_acquire_waits_for_background_refill() {
        let pool = TokenPool::new(
            PoolConfig::new(0, 2, 0, Duration::from_millis(5)),
            || 5u32,
        );
        let token = pool.token_timeout(Duration::from_secs(1)).await.unwrap();
        assert_eq!(token, 5);
    }

    #[tokio::test]
    async fn test_async_acquire_on_disabled_pool() {
        let pool = TokenPool::new(PoolConfig::new(0, 0, 0, IDLE), || 5u32);
        let result = pool.token_timeout(Duration::from_millis(30)).await;
        assert!(matches!(result, Err(PoolError::Disabled)));
    }
}
