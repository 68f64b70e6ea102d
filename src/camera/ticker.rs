use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::timestamp::CaptureTimestamp;
use crate::view::ViewState;

pub fn overlay_text(ts: &CaptureTimestamp) -> String {
    format!("Timestamp: {}", ts.formatted)
}

/// Counters shared by every ticker a session spawns
#[derive(Debug, Default)]
pub struct TickerStats {
    live: AtomicUsize,
    refreshes: AtomicUsize,
}

impl TickerStats {
    /// Tickers currently running
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Overlay writes across all tickers, including the initial one
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

/// Refreshes the timestamp overlay on a fixed period until dropped
pub struct TimestampTicker {
    cancel: CancellationToken,
    stats: Arc<TickerStats>,
}

impl TimestampTicker {
    /// Write the overlay now, then once per `period`
    pub async fn spawn(
        view: Arc<Mutex<ViewState>>,
        period: Duration,
        stats: Arc<TickerStats>,
    ) -> Self {
        view.lock().await.timestamp_overlay = overlay_text(&CaptureTimestamp::now());
        stats.refreshes.fetch_add(1, Ordering::SeqCst);

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task_stats = Arc::clone(&stats);

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        view.lock().await.timestamp_overlay =
                            overlay_text(&CaptureTimestamp::now());
                        task_stats.refreshes.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }

            debug!("Timestamp ticker stopped");
        });

        stats.live.fetch_add(1, Ordering::SeqCst);
        Self { cancel, stats }
    }
}

impl Drop for TimestampTicker {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.stats.live.fetch_sub(1, Ordering::SeqCst);
    }
}
