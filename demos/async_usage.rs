//! Async acquisition: wait (with a timeout) for the background replenisher
//! to produce a token instead of polling by hand.

use std::time::Duration;
use tokenpool::{PoolConfig, PoolError, TokenPool};

#[tokio::main]
async fn main() {
    // Starts empty; the replenisher fills it every 20ms.
    let config = PoolConfig::new(0, 2, 0, Duration::from_millis(20));
    let pool = TokenPool::new(config, || "session-key");

    match pool.token_timeout(Duration::from_secs(1)).await {
        Ok(token) => println!("acquired: {token}"),
        Err(PoolError::Timeout(t)) => println!("no token within {t:?}"),
        Err(e) => println!("error: {e}"),
    }

    // Immediate acquire may or may not hit, and that's fine.
    println!("non-blocking acquire: {:?}", pool.token());

    pool.shutdown();
}
