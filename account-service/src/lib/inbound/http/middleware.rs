use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::inbound::http::cookies::ACCESS_TOKEN_COOKIE;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Extension type to store the authenticated user in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub profile: UserData,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            profile: user.into(),
        }
    }
}

/// Extracts a candidate access token from request headers.
pub type TokenResolver = fn(&HeaderMap) -> Option<String>;

/// Resolvers tried in order; the first non-empty token wins.
pub const TOKEN_RESOLVERS: [TokenResolver; 2] = [token_from_cookie, token_from_bearer_header];

pub fn token_from_cookie(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

pub fn token_from_bearer_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn resolve_token(headers: &HeaderMap) -> Option<String> {
    TOKEN_RESOLVERS
        .iter()
        .find_map(|resolver| resolver(headers))
}

/// Middleware that validates the access token and adds the user to request
/// extensions. Every rejection is the same 401.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = resolve_token(req.headers()).ok_or_else(ApiError::unauthorized)?;

    let claims = state.token_issuer.verify_access(&token).map_err(|e| {
        tracing::warn!("Access token rejected: {}", e);
        ApiError::unauthorized()
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!("Failed to parse user ID from token: {}", e);
        ApiError::unauthorized()
    })?;

    let user = state
        .credential_service
        .current_user(&user_id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => {
                tracing::warn!(user_id = %user_id, "Access token for unknown user");
                ApiError::unauthorized()
            }
            _ => ApiError::from(e),
        })?;

    req.extensions_mut().insert(AuthenticatedUser::from(&user));

    Ok(next.run(req).await)
}
