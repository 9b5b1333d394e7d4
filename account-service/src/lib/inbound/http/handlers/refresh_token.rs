use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::cookies;
use crate::inbound::http::router::AppState;

/// Exchange a refresh token, taken from the `refreshToken` cookie or the
/// request body, for a new token pair.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<(CookieJar, ApiSuccess<RefreshTokenResponseData>), ApiError> {
    let from_cookie = jar
        .get(cookies::REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let from_body = body.ok().and_then(|Json(body)| body.refresh_token);

    let presented = from_cookie
        .into_iter()
        .chain(from_body)
        .find(|token| !token.is_empty())
        .ok_or_else(ApiError::unauthorized)?;

    let session = state
        .credential_service
        .refresh_session(&presented)
        .await
        .map_err(ApiError::from)?;

    let jar = cookies::with_session(jar, &session.tokens);
    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            "Access token refreshed",
            RefreshTokenResponseData {
                access_token: session.tokens.access_token,
                refresh_token: session.tokens.refresh_token,
            },
        ),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponseData {
    pub access_token: String,
    pub refresh_token: String,
}
