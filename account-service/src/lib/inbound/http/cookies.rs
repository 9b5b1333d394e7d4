use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use axum_extra::extract::CookieJar;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Add both session cookies for a freshly issued token pair.
pub fn with_session(jar: CookieJar, tokens: &auth::TokenPair) -> CookieJar {
    jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        tokens.access_token.clone(),
    ))
    .add(session_cookie(
        REFRESH_TOKEN_COOKIE,
        tokens.refresh_token.clone(),
    ))
}

/// Emit removal cookies for both session cookies, whether or not the
/// request carried them.
pub fn without_session(jar: CookieJar) -> CookieJar {
    let mut access = session_cookie(ACCESS_TOKEN_COOKIE, String::new());
    access.make_removal();
    let mut refresh = session_cookie(REFRESH_TOKEN_COOKIE, String::new());
    refresh.make_removal();

    jar.add(access).add(refresh)
}
