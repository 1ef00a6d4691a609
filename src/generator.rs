//! Token generation capability

/// Produces one token per call.
///
/// The pool treats tokens as opaque: it never inspects what the generator
/// returns, it only controls residency in its queues. Generation is assumed
/// infallible; a generator with a fallible source wraps its own fallback.
///
/// Any `Fn() -> T` closure is a generator:
///
/// ```
/// use tokenpool::TokenGenerator;
///
/// let generator = || String::from("credential");
/// assert_eq!(generator.generate(), "credential");
/// ```
pub trait TokenGenerator<T>: Send + Sync {
    /// Produce a single new token.
    fn generate(&self) -> T;
}

impl<T, F> TokenGenerator<T> for F
where
    F: Fn() -> T + Send + Sync,
{
    fn generate(&self) -> T {
        self()
    }
}
