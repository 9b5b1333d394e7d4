use chrono::Duration;
use chrono::Utc;

use crate::jwt::AccessClaims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::RefreshClaims;

/// Issues and verifies the two session token kinds.
///
/// Access and refresh tokens are signed with distinct secrets, so a token of
/// one kind can never be verified as the other.
pub struct TokenIssuer {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// Freshly issued access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenIssuer {
    /// Create a token issuer from start-up configuration.
    ///
    /// # Arguments
    /// * `access_secret` - HMAC secret for access tokens
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_secret` - HMAC secret for refresh tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    ///
    /// # Errors
    /// * `InvalidConfiguration` - A secret is empty or both secrets are equal
    pub fn new(
        access_secret: &[u8],
        access_ttl: Duration,
        refresh_secret: &[u8],
        refresh_ttl: Duration,
    ) -> Result<Self, JwtError> {
        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(JwtError::InvalidConfiguration(
                "token secrets must not be empty".to_string(),
            ));
        }
        if access_secret == refresh_secret {
            return Err(JwtError::InvalidConfiguration(
                "access and refresh secrets must differ".to_string(),
            ));
        }

        Ok(Self {
            access: JwtHandler::new(access_secret),
            refresh: JwtHandler::new(refresh_secret),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Sign an access token carrying `{sub, email, username}`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_access(
        &self,
        user_id: impl ToString,
        email: &str,
        username: &str,
    ) -> Result<String, JwtError> {
        let claims = AccessClaims::for_user(user_id, email, username, Utc::now(), self.access_ttl);
        self.access.encode(&claims)
    }

    /// Sign a refresh token carrying only `{sub}` and a unique `jti`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_refresh(&self, user_id: impl ToString) -> Result<String, JwtError> {
        let claims = RefreshClaims::for_user(user_id, Utc::now(), self.refresh_ttl);
        self.refresh.encode(&claims)
    }

    /// Sign both tokens for one user.
    pub fn issue_pair(
        &self,
        user_id: impl ToString,
        email: &str,
        username: &str,
    ) -> Result<TokenPair, JwtError> {
        let user_id = user_id.to_string();
        Ok(TokenPair {
            access_token: self.issue_access(&user_id, email, username)?,
            refresh_token: self.issue_refresh(&user_id)?,
        })
    }

    /// Verify an access token against the access secret.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `InvalidToken` - Bad signature (including any refresh token) or malformed token
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.access.decode(token)
    }

    /// Verify a refresh token against the refresh secret.
    ///
    /// # Errors
    /// * `TokenExpired` - Token has expired
    /// * `InvalidToken` - Bad signature (including any access token) or malformed token
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        self.refresh.decode(token)
    }
}
