// This is just a binary wrapper - the actual library is in lib.rs
// Run examples with: cargo run --example basic

use std::time::Duration;
use tokenpool::{PoolConfig, TokenPool};

fn main() {
    println!("=== tokenpool ===");
    println!("See demos/ directory for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    // Quick demo
    println!("Quick Demo:");
    let config = PoolConfig::new(3, 5, 2, Duration::from_millis(200));
    let pool = TokenPool::new(config, || "token");

    if let Some(token) = pool.token() {
        println!("  Got token: {token}");
    }

    println!("  Available after acquire: {}", pool.available_count());
    pool.shutdown();
}
