//! Repeating task with an explicit stop handle

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Runs a tick function on a fixed period until stopped.
///
/// The first tick fires immediately. Ticks never overlap: the next one waits
/// for the previous to finish. Once stopped it stays stopped.
#[derive(Default)]
pub struct MarketScheduler {
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
    halted: AtomicBool,
}

impl MarketScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ticking. Returns `false` without spawning if already running or
    /// already stopped.
    pub async fn start<F, Fut>(&self, name: &'static str, period: Duration, mut tick: F) -> bool
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.handle.write().await;
        if slot.is_some() {
            warn!(task = name, "MarketScheduler: already running");
            return false;
        }
        if self.halted.load(Ordering::SeqCst) {
            warn!(task = name, "MarketScheduler: stopped, refusing to start");
            return false;
        }

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                debug!(task = name, "MarketScheduler: tick");
                tick().await;
            }
        });
        *slot = Some(handle);

        info!(
            task = name,
            period_ms = period.as_millis() as u64,
            "MarketScheduler: started {} every {}ms",
            name,
            period.as_millis()
        );
        true
    }

    /// Stop the scheduler. No tick runs after this returns.
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        self.halted.store(true, Ordering::SeqCst);
        if let Some(h) = handle.take() {
            h.abort();
            info!("MarketScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
