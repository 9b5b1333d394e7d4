use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use super::NoData;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;

/// Always answers the same way for known and unknown addresses.
pub async fn forgot_password(
    State(state): State<AppState>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<ApiSuccess<NoData>, ApiError> {
    let Json(body) = body?;
    let email = EmailAddress::new(body.email).map_err(|e| {
        ApiError::UnprocessableEntity(vec![FieldError::new("email", e.to_string())])
    })?;

    state
        .credential_service
        .request_password_reset(&email)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                "Password reset mail has been sent on your email",
                NoData {},
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequest {
    email: String,
}
