//! Error types for the token pool

use thiserror::Error;

/// Errors surfaced by the async acquisition path.
///
/// The synchronous [`token`](crate::TokenPool::token) call never fails; an
/// empty pool is an expected condition reported as `None`.
#[derive(Error, Debug, Clone)]
pub enum PoolError {
    #[error("Pool is disabled - max size is zero")]
    Disabled,

    #[error("Timed out after {0:?} waiting for a token")]
    Timeout(std::time::Duration),
}

pub type PoolResult<T> = Result<T, PoolError>;
