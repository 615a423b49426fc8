use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::reminder::ReminderSweep;

/// Registers the daily reminder sweep on a cron schedule (six fields, UTC) and starts it.
pub async fn start_reminder_schedule(
    cron_schedule: &str,
    sweep: ReminderSweep,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    let job = Job::new_async(cron_schedule, move |_uuid, _scheduler| {
        let sweep = sweep.clone();

        Box::pin(async move {
            run_scheduled_sweep(&sweep).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Subscription reminder scheduled with '{}'", cron_schedule);

    Ok(scheduler)
}

#[tracing::instrument(name = "Running scheduled subscription check", skip(sweep))]
async fn run_scheduled_sweep(sweep: &ReminderSweep) {
    match sweep.run().await {
        Ok(summary) => tracing::info!(
            "Scheduled subscription check sent {} of {} reminders",
            summary.success_count,
            summary.ran_count
        ),
        Err(err) => tracing::error!("Scheduled subscription check failed: {:?}", err),
    }
}
