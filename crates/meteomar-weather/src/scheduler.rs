//! Periodic background refresh.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::dashboard::{Dashboard, Presenter};

/// Refresh `dashboard` every `period` until `cancel` fires.
///
/// The first refresh happens one full period after start; the caller is
/// expected to have done the initial refresh itself.
pub fn spawn_periodic_refresh<P>(
    dashboard: Arc<Dashboard<P>>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    P: Presenter + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; skip that tick
        ticker.tick().await;

        tracing::info!(period_secs = period.as_secs(), "Periodic refresh started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Periodic refresh stopped");
                    break;
                }
                _ = ticker.tick() => {
                    tracing::debug!("Periodic refresh tick");
                    dashboard.on_refresh_requested().await;
                }
            }
        }
    })
}
