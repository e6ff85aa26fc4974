use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::leaderboard::{LeaderboardSnapshot, LeaderboardSource};

/// Outcome of one leaderboard poll, delivered to the UI thread
#[derive(Debug, Clone)]
pub enum RefreshEvent {
    /// New data is available; the UI should repaint and restart scrolling
    Loaded(LeaderboardSnapshot),
    /// The poll failed; the UI should show the error and stop scrolling
    Failed { message: String },
}

/// Background task that polls the leaderboard on a fixed interval
pub struct RefreshService {
    source: Arc<dyn LeaderboardSource>,
    interval: Duration,
    event_tx: mpsc::UnboundedSender<RefreshEvent>,
}

impl RefreshService {
    pub fn new(
        source: Arc<dyn LeaderboardSource>,
        interval: Duration,
        event_tx: mpsc::UnboundedSender<RefreshEvent>,
    ) -> Self {
        Self {
            source,
            interval,
            event_tx,
        }
    }

    /// Fetch once and forward the result
    ///
    /// Returns false once the receiver is gone.
    async fn poll(&self) -> bool {
        let event = match self.source.fetch().await {
            Ok(snapshot) => RefreshEvent::Loaded(snapshot),
            Err(e) => {
                warn!("Leaderboard refresh failed: {}", e);
                RefreshEvent::Failed {
                    message: e.to_string(),
                }
            }
        };

        if self.event_tx.send(event).is_err() {
            warn!("Failed to send refresh event: receiver dropped");
            return false;
        }
        true
    }

    /// Poll immediately, then on every interval tick and manual trigger,
    /// until shutdown is signalled
    pub async fn run(
        self,
        mut trigger: mpsc::UnboundedReceiver<()>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("Refresh service started: interval={}s", self.interval.as_secs());

        // An interval's first tick completes immediately
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Refresh service received shutdown signal");
                        break;
                    }
                }

                _ = interval.tick() => {
                    debug!("Running scheduled leaderboard refresh");
                    if !self.poll().await {
                        break;
                    }
                }

                Some(()) = trigger.recv() => {
                    debug!("Running manual leaderboard refresh");
                    if !self.poll().await {
                        break;
                    }
                    interval.reset();
                }
            }
        }

        info!("Refresh service stopped");
    }
}
