use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use handlebars::RenderError;
use serde::Deserialize;

use crate::domain::notification_outcome::NotificationOutcome;
use crate::email_client::NotificationChannel;
use crate::notification::{broadcast, Recipient};
use crate::routes::authorization::{check_trigger_token, AuthError, TriggerToken};

#[derive(Deserialize, Debug)]
pub struct SendNotificationsBody {
    pub subject: String,
    pub message: String,
    pub members: Vec<Recipient>,
}

#[derive(serde::Serialize)]
struct SendNotificationsResponse {
    results: Vec<NotificationOutcome>,
}

#[tracing::instrument(
    name = "Sending a notification to members",
    skip(request, body, channel, trigger_token),
    fields(
        subject = %body.subject,
        recipients = body.members.len()
    )
)]
pub async fn handle_send_notifications(
    request: HttpRequest,
    body: web::Json<SendNotificationsBody>,
    channel: web::Data<dyn NotificationChannel>,
    trigger_token: web::Data<TriggerToken>,
) -> Result<HttpResponse, SendNotificationsError> {
    check_trigger_token(&request, &trigger_token)?;

    if body.subject.trim().is_empty() || body.message.trim().is_empty() {
        return Err(SendNotificationsError::InvalidBody);
    }

    let results = broadcast(
        channel.get_ref(),
        &body.subject,
        &body.message,
        &body.members,
    )
    .await?;

    Ok(HttpResponse::Ok().json(SendNotificationsResponse { results }))
}

#[derive(thiserror::Error)]
pub enum SendNotificationsError {
    #[error("Rejected notification request.")]
    Unauthorized(#[from] AuthError),
    #[error("Subject and message cannot be empty.")]
    InvalidBody,
    #[error("Failed to render the notification.")]
    Render(#[from] RenderError),
}

impl std::fmt::Debug for SendNotificationsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendNotificationsError::Unauthorized(source) => {
                write!(f, "{}\nCaused by:\n\t({})", self, source)
            }
            SendNotificationsError::InvalidBody => write!(f, "{}", self),
            SendNotificationsError::Render(source) => {
                write!(f, "{}\nCaused by:\n\t({:?})", self, source)
            }
        }
    }
}

impl ResponseError for SendNotificationsError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendNotificationsError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SendNotificationsError::InvalidBody => StatusCode::BAD_REQUEST,
            SendNotificationsError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            SendNotificationsError::Unauthorized(_) => HttpResponse::Unauthorized()
                .insert_header((WWW_AUTHENTICATE, "Bearer"))
                .json(serde_json::json!({ "error": "Unauthorized" })),
            SendNotificationsError::InvalidBody => HttpResponse::BadRequest()
                .json(serde_json::json!({ "error": self.to_string() })),
            SendNotificationsError::Render(_) => HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Internal server error" })),
        }
    }
}
