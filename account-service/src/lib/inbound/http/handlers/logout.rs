use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum_extra::extract::CookieJar;

use super::ApiError;
use super::ApiSuccess;
use super::NoData;
use crate::inbound::http::cookies;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<NoData>), ApiError> {
    state
        .credential_service
        .logout(&user.user_id)
        .await
        .map_err(ApiError::from)?;

    Ok((
        cookies::without_session(jar),
        ApiSuccess::new(StatusCode::OK, "User logged out successfully", NoData {}),
    ))
}
