use actix_web::http::header::AUTHORIZATION;
use actix_web::HttpRequest;
use secrecy::{ExposeSecret, Secret};

/// Shared secret expected by the trigger endpoints. `None` leaves them open.
pub struct TriggerToken(pub Option<Secret<String>>);

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("The Authorization header is missing.")]
    MissingHeader,
    #[error("The trigger token is not valid.")]
    InvalidToken,
}

pub fn check_trigger_token(request: &HttpRequest, expected: &TriggerToken) -> Result<(), AuthError> {
    let expected = match &expected.0 {
        Some(token) => token,
        None => return Ok(()),
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)?;

    if token != expected.expose_secret() {
        return Err(AuthError::InvalidToken);
    }

    Ok(())
}
