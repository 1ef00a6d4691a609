//! Lifecycle hooks for token state transitions
//!
//! The pool reports five transitions: a token is created by the generator,
//! then saved into the primary queue, cached into the overflow queue, or
//! discarded; an acquired token is removed. Hooks are invoked synchronously
//! on the context that performs the transition (the caller's for `on_remove`,
//! the replenisher's for the rest) and must not call back into the pool.

/// Observer for token lifecycle transitions.
///
/// Every method has a no-op default, so implementors override only the
/// transitions they care about.
pub trait PoolHooks<T>: Send + Sync {
    /// A token was produced by the generator, before classification.
    fn on_create(&self, _token: &T) {}

    /// A token entered the primary queue.
    fn on_save(&self, _token: &T) {}

    /// A token entered the overflow queue.
    fn on_cache(&self, _token: &T) {}

    /// A token was dropped because both queues were full.
    fn on_discard(&self, _token: &T) {}

    /// A token was acquired by a caller and left the pool.
    fn on_remove(&self, _token: &T) {}
}

/// Hooks that observe nothing; used when no hooks are supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl<T> PoolHooks<T> for NoopHooks {}

type Hook<T> = Box<dyn Fn(&T) + Send + Sync>;

/// A table of five independently optional callbacks.
///
/// An alternative to implementing [`PoolHooks`] directly, for callers that
/// prefer wiring individual closures. Unset entries are legal no-ops.
///
/// # Examples
///
/// ```
/// use tokenpool::HookSet;
///
/// let hooks: HookSet<u64> = HookSet::new()
///     .on_save(|token| println!("pooled {token}"))
///     .on_discard(|token| println!("dropped {token}"));
/// ```
pub struct HookSet<T> {
    create: Option<Hook<T>>,
    save: Option<Hook<T>>,
    cache: Option<Hook<T>>,
    discard: Option<Hook<T>>,
    remove: Option<Hook<T>>,
}

impl<T> HookSet<T> {
    pub fn new() -> Self {
        Self {
            create: None,
            save: None,
            cache: None,
            discard: None,
            remove: None,
        }
    }

    /// Set the callback for generated tokens
    pub fn on_create<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.create = Some(Box::new(f));
        self
    }

    /// Set the callback for tokens entering the primary queue
    pub fn on_save<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.save = Some(Box::new(f));
        self
    }

    /// Set the callback for tokens entering the overflow queue
    pub fn on_cache<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.cache = Some(Box::new(f));
        self
    }

    /// Set the callback for discarded tokens
    pub fn on_discard<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.discard = Some(Box::new(f));
        self
    }

    /// Set the callback for acquired tokens
    pub fn on_remove<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.remove = Some(Box::new(f));
        self
    }
}

impl<T> Default for HookSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PoolHooks<T> for HookSet<T> {
    fn on_create(&self, token: &T) {
        if let Some(f) = &self.create {
            f(token);
        }
    }

    fn on_save(&self, token: &T) {
        if let Some(f) = &self.save {
            f(token);
        }
    }

    fn on_cache(&self, token: &T) {
        if let Some(f) = &self.cache {
            f(token);
        }
    }

    fn on_discard(&self, token: &T) {
        if let Some(f) = &self.discard {
            f(token);
        }
    }

    fn on_remove(&self, token: &T) {
        if let Some(f) = &self.remove {
            f(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_hook_set_dispatches_only_set_entries() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let hooks: HookSet<u32> = HookSet::new()
            .on_create(move |t: &u32| log.lock().push(("create", *t)))
            .on_remove({
                let log = Arc::clone(&seen);
                move |t: &u32| log.lock().push(("remove", *t))
            });

        PoolHooks::on_create(&hooks, &1);
        PoolHooks::on_save(&hooks, &1);
        PoolHooks::on_cache(&hooks, &1);
        PoolHooks::on_discard(&hooks, &1);
        PoolHooks::on_remove(&hooks, &2);

        assert_eq!(*seen.lock(), vec![("create", 1), ("remove", 2)]);
    }

    #[test]
    fn test_noop_hooks_accept_any_token() {
        let hooks = NoopHooks;
        PoolHooks::on_create(&hooks, &"anything");
        PoolHooks::on_remove(&hooks, &42u8);
    }
}
