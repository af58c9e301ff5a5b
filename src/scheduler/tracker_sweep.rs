use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::antinuke::tracker::ActionTracker, util::clock::Clock};

/// Every ten minutes, on the minute.
const SWEEP_SCHEDULE: &str = "0 */10 * * * *";

/// Starts the tracker sweep scheduler
///
/// Evicts actors whose tracked actions are all older than the sweep retention, so
/// the tracker does not grow with every actor ever seen.
///
/// # Arguments
/// - `tracker`: Action tracker shared with the anti-nuke service
/// - `clock`: Time source for the retention cutoff
pub async fn start_scheduler(
    tracker: ActionTracker,
    clock: Arc<dyn Clock>,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(SWEEP_SCHEDULE, move |_uuid, _lock| {
        let tracker = tracker.clone();
        let clock = clock.clone();

        Box::pin(async move {
            sweep_tracker(&tracker, clock.as_ref());
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Tracker sweep scheduler started");

    Ok(())
}

/// Runs one sweep and logs what it removed.
pub fn sweep_tracker(tracker: &ActionTracker, clock: &dyn Clock) -> usize {
    let evicted = tracker.sweep(clock.now_ms());

    if evicted > 0 {
        tracing::debug!(
            "Tracker sweep evicted {} actors, {} still tracked",
            evicted,
            tracker.tracked_actors()
        );
    }

    evicted
}
