//! Sweep sessions use case
//!
//! Periodically drops live sessions nobody touched within the idle TTL and
//! archived sessions past the archive TTL.

use crate::config::RegistryConfig;
use crate::ports::session_event_logger::{
    NoSessionEventLogger, SessionEvent, SessionEventLogger,
};
use crate::registry::{SessionRegistry, SweepReport};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Background expiry of idle and archived sessions
pub struct SweepSessionsUseCase {
    registry: Arc<SessionRegistry>,
    config: RegistryConfig,
    events: Arc<dyn SessionEventLogger>,
}

impl SweepSessionsUseCase {
    pub fn new(registry: Arc<SessionRegistry>, config: RegistryConfig) -> Self {
        Self {
            registry,
            config,
            events: Arc::new(NoSessionEventLogger),
        }
    }

    pub fn with_event_logger(mut self, events: Arc<dyn SessionEventLogger>) -> Self {
        self.events = events;
        self
    }

    /// One sweep as of `now`.
    pub async fn sweep_once(&self, now: Instant) -> SweepReport {
        let report = self
            .registry
            .sweep(now, self.config.idle_ttl, self.config.archive_ttl)
            .await;

        for code in &report.expired_live {
            self.events
                .log(SessionEvent::new("session_expired", code, json!({ "archived": false })));
        }
        for code in &report.expired_archived {
            self.events
                .log(SessionEvent::new("session_expired", code, json!({ "archived": true })));
        }
        if !report.is_empty() {
            info!(
                "Swept {} idle and {} archived sessions",
                report.expired_live.len(),
                report.expired_archived.len()
            );
        }
        report
    }

    /// Sweep every `sweep_interval` until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; nothing can be stale yet
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Session sweeper stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.sweep_once(Instant::now()).await;
                }
            }
        }
    }
}
