//! Periodic expired-sale sweep

use std::sync::Arc;

use chrono::Utc;
use guild_common::SweepConfig;
use guild_service::{ServiceContext, SweepService};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Spawn the sweep loop
///
/// Each tick draws every expired OPEN sale. A failed run is logged and the
/// next tick retries whatever is still open.
pub fn spawn_sweep(ctx: Arc<ServiceContext>, config: SweepConfig) -> JoinHandle<()> {
    info!(
        interval_secs = config.interval.as_secs(),
        batch_size = config.batch_size,
        "Starting sale sweep"
    );

    tokio::spawn(async move {
        let mut ticker = interval(config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let sweep = SweepService::new(&ctx).with_batch_size(config.batch_size);
            if let Err(e) = sweep.run_once(Utc::now()).await {
                error!(error = %e, "Sale sweep failed");
            }
        }
    })
}
