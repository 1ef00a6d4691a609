//! Lifecycle observability: wire hooks and watch tokens move through the
//! pool, then print a metrics snapshot.

use std::time::Duration;
use tokenpool::{HookSet, PoolConfig, TokenPool};

fn main() {
    let hooks: HookSet<u64> = HookSet::new()
        .on_create(|t| println!("created   {t}"))
        .on_save(|t| println!("saved     {t}"))
        .on_cache(|t| println!("cached    {t}"))
        .on_discard(|t| println!("discarded {t}"))
        .on_remove(|t| println!("removed   {t}"));

    // Pre-warm over-produces on purpose: 1 saved, 1 cached, 2 discarded.
    let config = PoolConfig::new(4, 1, 1, Duration::from_secs(60));
    let counter = std::sync::atomic::AtomicU64::new(0);
    let pool = TokenPool::with_hooks(config, move || {
        counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
    }, hooks);

    // First acquire promotes the cached token; second drains it.
    let _ = pool.token();
    let _ = pool.token();

    println!();
    for (key, value) in pool.export_metrics() {
        println!("{key}: {value}");
    }

    println!();
    println!("{}", pool.export_metrics_prometheus("demo", None));

    pool.shutdown();
}
