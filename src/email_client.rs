use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::time;

use crate::domain::member_email::MemberEmail;

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

/// Anything able to deliver a rendered email to a single recipient.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn send_email(
        &self,
        recipient: &MemberEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<(), NotificationError>;
}

#[derive(thiserror::Error, Debug)]
pub enum NotificationError {
    /// The provider answered with a non 2xx status. `message` is the provider's own explanation.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Email provider did not answer in time.")]
    Timeout(#[source] reqwest::Error),
    #[error("Failed to reach the email provider: {0}")]
    Request(#[source] reqwest::Error),
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NotificationError::Timeout(err)
        } else {
            NotificationError::Request(err)
        }
    }
}

pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: MemberEmail,
    sender_name: String,
    api_key: Secret<String>,
}

#[derive(serde::Serialize)]
struct SendEmailBody<'a> {
    from: String,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(serde::Deserialize)]
struct ProviderErrorBody {
    message: String,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        sender: MemberEmail,
        sender_name: String,
        api_key: Secret<String>,
        timeout: Option<time::Duration>,
    ) -> Result<EmailClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(EmailClient {
            http_client,
            base_url,
            sender,
            sender_name,
            api_key,
        })
    }

    fn from_header(&self) -> String {
        format!("{} <{}>", self.sender_name, self.sender.as_ref())
    }
}

#[async_trait]
impl NotificationChannel for EmailClient {
    #[tracing::instrument(
        name = "Sending an email through the provider API",
        skip(self, subject, html_content),
        fields(recipient = %recipient)
    )]
    async fn send_email(
        &self,
        recipient: &MemberEmail,
        subject: &str,
        html_content: &str,
    ) -> Result<(), NotificationError> {
        let url = format!("{}/emails", self.base_url);
        let body = SendEmailBody {
            from: self.from_header(),
            to: vec![recipient.as_ref()],
            subject,
            html: html_content,
        };

        let response = self
            .http_client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        // Providers explain rejections in a JSON body, fall back to the status when they don't
        let message = match response.json::<ProviderErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => format!("Email provider responded with status {}", status),
        };

        Err(NotificationError::Rejected { status, message })
    }
}
