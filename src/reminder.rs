use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::day_window::DayWindow;
use crate::domain::notification_outcome::{NotificationOutcome, SweepSummary};
use crate::email_client::NotificationChannel;
use crate::email_template::{reminder_email, REMINDER_SUBJECT};
use crate::member_store::{MemberStore, MemberStoreError};
use crate::notification::notify_recipient;

/// Finds the members whose subscription ends tomorrow and reminds each of them.
///
/// Dates are evaluated in UTC. Members are notified one at a time in the order the
/// store returns them; a failed send is recorded and the sweep moves on to the next
/// member. Nothing is retried within a run.
#[derive(Clone)]
pub struct ReminderSweep {
    member_store: Arc<dyn MemberStore>,
    channel: Arc<dyn NotificationChannel>,
}

#[derive(thiserror::Error)]
pub enum SweepError {
    #[error("Failed to fetch members with expiring subscriptions.")]
    MemberQuery(#[from] MemberStoreError),
    #[error("There is no day after {0} to check.")]
    DateOutOfRange(NaiveDate),
}

impl std::fmt::Debug for SweepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepError::MemberQuery(source) => {
                write!(f, "{}\nCaused by:\n\t({:?})", self, source)
            }
            SweepError::DateOutOfRange(_) => write!(f, "{}", self),
        }
    }
}

impl ReminderSweep {
    pub fn new(
        member_store: Arc<dyn MemberStore>,
        channel: Arc<dyn NotificationChannel>,
    ) -> ReminderSweep {
        ReminderSweep {
            member_store,
            channel,
        }
    }

    pub async fn run(&self) -> Result<SweepSummary, SweepError> {
        self.run_for_day(Utc::now().date_naive()).await
    }

    #[tracing::instrument(name = "Checking for expiring subscriptions", skip(self))]
    pub async fn run_for_day(&self, today: NaiveDate) -> Result<SweepSummary, SweepError> {
        let window = DayWindow::tomorrow(today).ok_or_else(|| {
            tracing::error!("Cannot compute the day after {}", today);
            SweepError::DateOutOfRange(today)
        })?;
        let members = self
            .member_store
            .find_expiring_members(&window)
            .await
            .map_err(|err| {
                tracing::error!("Error in subscription reminder check: {:?}", err);
                err
            })?;

        tracing::info!(
            "Found {} members with expiring subscriptions",
            members.len()
        );

        let mut details = Vec::with_capacity(members.len());

        for member in &members {
            let outcome = match reminder_email(member) {
                Ok(html_content) => {
                    notify_recipient(
                        self.channel.as_ref(),
                        Some(member.id.clone()),
                        &member.email,
                        REMINDER_SUBJECT,
                        &html_content,
                    )
                    .await
                }
                Err(err) => {
                    tracing::error!("Failed to render the reminder for {}: {:?}", member.id, err);
                    NotificationOutcome::error(
                        Some(member.id.clone()),
                        member.email.clone(),
                        err.to_string(),
                    )
                }
            };

            details.push(outcome);
        }

        let summary = SweepSummary::from(details);

        tracing::info!(
            ran_count = summary.ran_count,
            success_count = summary.success_count,
            error_count = summary.error_count,
            "Subscription reminder check completed"
        );

        Ok(summary)
    }
}
