//! Periodic job runner for the pool's background tasks

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Spawn a task that runs `task` every `period` until the shutdown channel
/// flips to `true` or its sender is dropped.
///
/// A run that is already in progress when shutdown is signalled completes;
/// only further ticks are suppressed.
pub(crate) fn spawn_interval_job<F, Fut>(
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut task: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => task().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_job_ticks_until_shutdown() {
        let (tx, rx) = watch::channel(false);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let handle = spawn_interval_job(Duration::from_millis(100), rx, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(350)).await;
        let ticks = count.load(Ordering::SeqCst);
        assert!(ticks >= 3, "expected at least 3 ticks, got {ticks}");

        tx.send(true).ok();
        handle.await.ok();
        let after_stop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_exits_when_sender_dropped() {
        let (tx, rx) = watch::channel(false);
        let handle = spawn_interval_job(Duration::from_millis(50), rx, || async {});
        drop(tx);
        handle.await.ok();
    }
}
