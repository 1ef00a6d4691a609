//! Basic usage: pre-warm, acquire, let the background replenisher refill.

use std::time::Duration;
use tokenpool::{PoolConfig, TokenPool};

fn main() {
    // 3 tokens pre-warmed, at most 5 held, refilled every 50ms.
    let config = PoolConfig::new(3, 5, 0, Duration::from_millis(50));
    let pool = TokenPool::new(config, || {
        // Stand-in for an expensive derivation.
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });

    println!("pre-warmed: {} tokens", pool.available_count());

    for i in 0..3 {
        match pool.token() {
            Some(token) => println!("acquire #{i}: {token}"),
            None => println!("acquire #{i}: pool empty"),
        }
    }

    println!("drained, waiting for the replenisher...");
    std::thread::sleep(Duration::from_millis(200));
    println!("available again: {}", pool.available_count());

    pool.shutdown();
}
