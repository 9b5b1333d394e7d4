use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<LoginResponseData>), ApiError> {
    let Json(body) = body?;
    let (email, password) = body.try_into_credentials()?;

    let session = state
        .credential_service
        .login(&email, &password)
        .await
        .map_err(ApiError::from)?;

    let jar = cookies::with_session(jar, &session.tokens);
    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            "User logged in successfully",
            LoginResponseData {
                user: (&session.user).into(),
                access_token: session.tokens.access_token,
                refresh_token: session.tokens.refresh_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    fn try_into_credentials(self) -> Result<(EmailAddress, String), ApiError> {
        let mut errors = Vec::new();
        let email = EmailAddress::new(self.email)
            .map_err(|e| errors.push(FieldError::new("email", e.to_string())))
            .ok();
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "Password is required"));
        }

        match email {
            Some(email) if errors.is_empty() => Ok((email, self.password)),
            _ => Err(ApiError::UnprocessableEntity(errors)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub user: UserData,
    pub access_token: String,
    pub refresh_token: String,
}
