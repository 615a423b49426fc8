use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};

use crate::domain::notification_outcome::SweepSummary;
use crate::reminder::{ReminderSweep, SweepError};
use crate::routes::authorization::{check_trigger_token, AuthError, TriggerToken};

#[derive(serde::Serialize)]
struct ReminderResponse {
    message: &'static str,
    #[serde(flatten)]
    summary: SweepSummary,
}

/// Runs one expiry reminder sweep on demand, for platform cron jobs or operators.
#[tracing::instrument(
    name = "Subscription reminder trigger handler",
    skip(request, sweep, trigger_token)
)]
pub async fn handle_subscription_reminder(
    request: HttpRequest,
    sweep: web::Data<ReminderSweep>,
    trigger_token: web::Data<TriggerToken>,
) -> Result<HttpResponse, ReminderTriggerError> {
    check_trigger_token(&request, &trigger_token)?;

    let summary = sweep.run().await?;

    Ok(HttpResponse::Ok().json(ReminderResponse {
        message: "Subscription reminder check completed",
        summary,
    }))
}

#[derive(thiserror::Error)]
pub enum ReminderTriggerError {
    #[error("Rejected subscription reminder trigger.")]
    Unauthorized(#[from] AuthError),
    #[error("Subscription reminder check failed.")]
    SweepFailed(#[from] SweepError),
}

impl std::fmt::Debug for ReminderTriggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReminderTriggerError::Unauthorized(source) => {
                write!(f, "{}\nCaused by:\n\t({})", self, source)
            }
            ReminderTriggerError::SweepFailed(source) => {
                write!(f, "{}\nCaused by:\n\t({:?})", self, source)
            }
        }
    }
}

impl ResponseError for ReminderTriggerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReminderTriggerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ReminderTriggerError::SweepFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ReminderTriggerError::Unauthorized(_) => HttpResponse::Unauthorized()
                .insert_header((WWW_AUTHENTICATE, "Bearer"))
                .json(serde_json::json!({ "error": "Unauthorized" })),
            ReminderTriggerError::SweepFailed(_) => HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Internal server error" })),
        }
    }
}
