use handlebars::RenderError;

use crate::domain::member_email::MemberEmail;
use crate::domain::notification_outcome::NotificationOutcome;
use crate::email_client::NotificationChannel;
use crate::email_template::html_email;

/// Someone to notify, as handed over by an operator.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Recipient {
    pub id: Option<String>,
    pub email: String,
}

/// Sends one email and turns whatever happens into an outcome. Never fails.
#[tracing::instrument(
    name = "Notifying a recipient",
    skip(channel, subject, html_content)
)]
pub async fn notify_recipient(
    channel: &dyn NotificationChannel,
    member_id: Option<String>,
    email: &str,
    subject: &str,
    html_content: &str,
) -> NotificationOutcome {
    let recipient = match MemberEmail::parse(email.to_string()) {
        Ok(recipient) => recipient,
        Err(err) => {
            tracing::error!("Skipping recipient with an invalid address: {}", err);
            return NotificationOutcome::error(member_id, email.to_string(), err);
        }
    };

    match channel.send_email(&recipient, subject, html_content).await {
        Ok(()) => {
            tracing::info!("Email sent to {}", recipient);
            NotificationOutcome::success(member_id, email.to_string())
        }
        Err(err) => {
            tracing::error!("Failed to send an email to {}: {:?}", recipient, err);
            NotificationOutcome::error(member_id, email.to_string(), err.to_string())
        }
    }
}

/// Sends the same message to every recipient, one after the other. Only rendering the
/// message can fail; delivery problems end up in the outcomes.
#[tracing::instrument(
    name = "Broadcasting a notification",
    skip(channel, message, recipients),
    fields(recipient_count = recipients.len())
)]
pub async fn broadcast(
    channel: &dyn NotificationChannel,
    subject: &str,
    message: &str,
    recipients: &[Recipient],
) -> Result<Vec<NotificationOutcome>, RenderError> {
    let html_content = html_email(subject, message)?;
    let mut outcomes = Vec::with_capacity(recipients.len());

    for recipient in recipients {
        let outcome = notify_recipient(
            channel,
            recipient.id.clone(),
            &recipient.email,
            subject,
            &html_content,
        )
        .await;

        outcomes.push(outcome);
    }

    Ok(outcomes)
}
