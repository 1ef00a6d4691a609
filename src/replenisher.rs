//! Background replenishment loop

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Sender};
use crossbeam::select;

/// Handle to the dedicated replenisher thread, one per pool instance.
///
/// The thread runs one replenish pass per tick of a fixed period, measured
/// from the completion of the previous wait. No backoff, no catch-up for
/// missed ticks, no jitter. [`stop`](Replenisher::stop) signals the thread
/// and joins it; dropping the handle does the same, so the thread never
/// outlives the pool that spawned it.
pub(crate) struct Replenisher {
    stop: Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Replenisher {
    pub(crate) fn spawn<F>(period: Duration, tick_fn: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (stop, stopped) = channel::bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("tokenpool-replenisher".into())
            .spawn(move || {
                let ticker = channel::tick(period);
                loop {
                    select! {
                        recv(ticker) -> _ => tick_fn(),
                        recv(stopped) -> _ => break,
                    }
                }
            })
            .expect("failed to spawn replenisher thread");

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for it to exit. Idempotent.
    pub(crate) fn stop(&mut self) {
        let _ = self.stop.try_send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Replenisher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_ticks_invoke_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut replenisher = Replenisher::spawn(Duration::from_millis(5), move || {
            seen.fetch_add(1, Ordering::Relaxed);
        });

        thread::sleep(Duration::from_millis(60));
        replenisher.stop();

        assert!(count.load(Ordering::Relaxed) >= 1);
    }

    #[test]
    fn test_stop_joins_and_halts_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut replenisher = Replenisher::spawn(Duration::from_millis(5), move || {
            seen.fetch_add(1, Ordering::Relaxed);
        });

        thread::sleep(Duration::from_millis(30));
        replenisher.stop();
        let after_stop = count.load(Ordering::Relaxed);

        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::Relaxed), after_stop);

        // second stop is a no-op
        replenisher.stop();
    }

    #[test]
    fn test_drop_stops_thread() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let replenisher = Replenisher::spawn(Duration::from_millis(5), move || {
            seen.fetch_add(1, Ordering::Relaxed);
        });

        drop(replenisher);
        let after_drop = count.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::Relaxed), after_drop);
    }
}
