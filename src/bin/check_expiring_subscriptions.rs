//! Runs a single expiry reminder sweep and exits. Meant for external schedulers
//! (system cron, platform cron jobs) that own the timing themselves.

use std::process::ExitCode;
use std::sync::Arc;

use subscription_reminder::config::get_configuration;
use subscription_reminder::domain::notification_outcome::SweepSummary;
use subscription_reminder::email_client::NotificationChannel;
use subscription_reminder::reminder::SweepError;
use subscription_reminder::startup::{build_email_client, build_reminder_sweep, StartupError};
use subscription_reminder::telemetry::{get_subscriber, init_subscriber};

#[derive(thiserror::Error, Debug)]
enum CheckError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("{0}")]
    Sweep(#[from] SweepError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = get_subscriber(
        String::from("check_expiring_subscriptions"),
        String::from("info"),
        std::io::stdout,
    );

    if let Err(err) = init_subscriber(subscriber) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    match check_expiring_subscriptions().await {
        Ok(summary) => {
            tracing::info!(
                ran_count = summary.ran_count,
                success_count = summary.success_count,
                error_count = summary.error_count,
                "Results: {:?}",
                summary.details
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Error in subscription reminder check: {:?}", err);
            ExitCode::FAILURE
        }
    }
}

async fn check_expiring_subscriptions() -> Result<SweepSummary, CheckError> {
    let config = get_configuration().map_err(StartupError::from)?;
    let email_client: Arc<dyn NotificationChannel> = Arc::new(build_email_client(&config)?);
    let sweep = build_reminder_sweep(&config, email_client);

    Ok(sweep.run().await?)
}
