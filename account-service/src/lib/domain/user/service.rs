use std::sync::Arc;

use async_trait::async_trait;
use auth::constant_time_eq;
use auth::TemporaryTokenGenerator;
use auth::TokenIssuer;
use chrono::Utc;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::PendingToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::CredentialServicePort;
use crate::user::ports::EmailSender;
use crate::user::ports::UserRepository;

const VERIFY_EMAIL_PATH: &str = "/api/v1/auth/verify-email";
const RESET_PASSWORD_PATH: &str = "/api/v1/auth/reset-password";

/// Domain service implementation for the credential lifecycle.
///
/// Concrete implementation of CredentialServicePort with dependency injection.
pub struct CredentialService<UR, ES>
where
    UR: UserRepository,
    ES: EmailSender,
{
    repository: Arc<UR>,
    email_sender: Arc<ES>,
    password_hasher: auth::PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
    temporary_tokens: TemporaryTokenGenerator,
    public_url: String,
}

impl<UR, ES> CredentialService<UR, ES>
where
    UR: UserRepository,
    ES: EmailSender,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `email_sender` - Delivery of verification and reset links
    /// * `token_issuer` - Access/refresh token signing, shared with the HTTP gate
    /// * `temporary_tokens` - Generator for email verification and reset tokens
    /// * `public_url` - Externally reachable base URL used to build links
    ///
    /// # Returns
    /// Configured credential service instance
    pub fn new(
        repository: Arc<UR>,
        email_sender: Arc<ES>,
        token_issuer: Arc<TokenIssuer>,
        temporary_tokens: TemporaryTokenGenerator,
        public_url: impl Into<String>,
    ) -> Self {
        let public_url = public_url.into().trim_end_matches('/').to_string();
        Self {
            repository,
            email_sender,
            password_hasher: auth::PasswordHasher::new(),
            token_issuer,
            temporary_tokens,
            public_url,
        }
    }

    fn link(&self, path: &str, raw_token: &str) -> String {
        format!("{}{}/{}", self.public_url, path, raw_token)
    }

    async fn find_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    fn issue_session(&self, user: &User) -> Result<auth::TokenPair, UserError> {
        self.token_issuer
            .issue_pair(user.id, user.email.as_str(), user.username.as_str())
            .map_err(|e| UserError::TokenIssuance(e.to_string()))
    }
}

#[async_trait]
impl<UR, ES> CredentialServicePort for CredentialService<UR, ES>
where
    UR: UserRepository,
    ES: EmailSender,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }
        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = PasswordHash::generate(&self.password_hasher, &command.password)?;
        let verification = self.temporary_tokens.generate();
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            is_email_verified: false,
            refresh_token: None,
            email_verification: Some(PendingToken::from(&verification)),
            forgot_password: None,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        let link = self.link(VERIFY_EMAIL_PATH, &verification.raw);
        if let Err(e) = self
            .email_sender
            .send_email_verification(&created_user, &link)
            .await
        {
            tracing::error!(
                "Failed to send verification email for user {}: {}",
                created_user.id,
                e
            );
        }

        Ok(created_user)
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<Session, UserError> {
        let mut user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFound(email.to_string()))?;

        if !user.password_hash.matches(&self.password_hasher, password)? {
            tracing::warn!(user_id = %user.id, "Login rejected: password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        let tokens = self.issue_session(&user)?;
        self.repository
            .set_refresh_token(&user.id, Some(tokens.refresh_token.clone()))
            .await?;
        user.refresh_token = Some(tokens.refresh_token.clone());

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(Session { user, tokens })
    }

    async fn logout(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.set_refresh_token(id, None).await?;
        tracing::info!(user_id = %id, "User logged out");
        Ok(())
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, UserError> {
        let claims = self
            .token_issuer
            .verify_refresh(refresh_token)
            .map_err(|e| {
                tracing::warn!("Refresh rejected: {}", e);
                UserError::Unauthorized
            })?;

        let id = UserId::from_string(&claims.sub).map_err(|_| UserError::Unauthorized)?;
        let mut user = match self.repository.find_by_id(&id).await? {
            Some(user) => user,
            None => {
                tracing::warn!(user_id = %id, "Refresh rejected: unknown user");
                return Err(UserError::Unauthorized);
            }
        };

        let is_current = user
            .refresh_token
            .as_deref()
            .map(|stored| constant_time_eq(stored.as_bytes(), refresh_token.as_bytes()))
            .unwrap_or(false);
        if !is_current {
            tracing::warn!(user_id = %id, "Refresh rejected: token is not the stored one");
            return Err(UserError::Unauthorized);
        }

        let tokens = self.issue_session(&user)?;
        self.repository
            .set_refresh_token(&user.id, Some(tokens.refresh_token.clone()))
            .await?;
        user.refresh_token = Some(tokens.refresh_token.clone());

        tracing::info!(user_id = %user.id, "Session refreshed");
        Ok(Session { user, tokens })
    }

    async fn current_user(&self, id: &UserId) -> Result<User, UserError> {
        self.find_user(id).await
    }

    async fn verify_email(&self, raw_token: &str) -> Result<User, UserError> {
        let token_hash = TemporaryTokenGenerator::hash(raw_token);
        let mut user = self
            .repository
            .find_by_email_verification_hash(&token_hash)
            .await?
            .ok_or(UserError::InvalidOrExpiredToken)?;

        let pending = user
            .email_verification
            .take()
            .ok_or(UserError::InvalidOrExpiredToken)?;
        if !TemporaryTokenGenerator::redeem(raw_token, &pending.token_hash, pending.expires_at) {
            tracing::warn!(user_id = %user.id, "Email verification rejected: token expired");
            return Err(UserError::InvalidOrExpiredToken);
        }

        if !self
            .repository
            .mark_email_verified(&user.id, &pending.token_hash)
            .await?
        {
            tracing::warn!(user_id = %user.id, "Email verification rejected: token already used");
            return Err(UserError::InvalidOrExpiredToken);
        }

        user.is_email_verified = true;
        user.updated_at = Utc::now();
        tracing::info!(user_id = %user.id, "Email verified");
        Ok(user)
    }

    async fn resend_email_verification(&self, id: &UserId) -> Result<(), UserError> {
        let user = self.find_user(id).await?;
        if user.is_email_verified {
            return Err(UserError::AlreadyVerified);
        }

        let verification = self.temporary_tokens.generate();
        self.repository
            .set_email_verification(&user.id, Some(PendingToken::from(&verification)))
            .await?;

        let link = self.link(VERIFY_EMAIL_PATH, &verification.raw);
        self.email_sender
            .send_email_verification(&user, &link)
            .await?;

        tracing::info!(user_id = %user.id, "Verification email resent");
        Ok(())
    }

    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let user = self.find_user(id).await?;
        if !user
            .password_hash
            .matches(&self.password_hasher, &command.current_password)?
        {
            tracing::warn!(user_id = %user.id, "Password change rejected: password mismatch");
            return Err(UserError::InvalidCredentials);
        }

        let password_hash = PasswordHash::generate(&self.password_hasher, &command.new_password)?;
        self.repository
            .update_password(&user.id, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), UserError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let reset = self.temporary_tokens.generate();
        self.repository
            .set_forgot_password(&user.id, Some(PendingToken::from(&reset)))
            .await?;

        let link = self.link(RESET_PASSWORD_PATH, &reset.raw);
        self.email_sender.send_password_reset(&user, &link).await?;

        tracing::info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }
}
