use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use super::NoData;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Password;
use crate::inbound::http::cookies;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Replace the caller's password. The session ends, so cookies are cleared.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
    body: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<NoData>), ApiError> {
    let Json(body) = body?;
    state
        .credential_service
        .change_password(&user.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)?;

    Ok((
        cookies::without_session(jar),
        ApiSuccess::new(StatusCode::OK, "Password changed successfully", NoData {}),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    old_password: String,
    new_password: String,
}

impl ChangePasswordRequest {
    fn try_into_command(self) -> Result<ChangePasswordCommand, ApiError> {
        let mut errors = Vec::new();
        if self.old_password.is_empty() {
            errors.push(FieldError::new("oldPassword", "Old password is required"));
        }
        let new_password = Password::new(self.new_password)
            .map_err(|e| errors.push(FieldError::new("newPassword", e.to_string())))
            .ok();

        match new_password {
            Some(new_password) if errors.is_empty() => Ok(ChangePasswordCommand {
                current_password: self.old_password,
                new_password,
            }),
            _ => Err(ApiError::UnprocessableEntity(errors)),
        }
    }
}
