use async_trait::async_trait;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::PendingToken;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::EmailDeliveryError;
use crate::user::errors::UserError;

/// Port for the credential lifecycle: registration, sessions and
/// temporary-token flows.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new, unverified user and send the verification link.
    ///
    /// # Arguments
    /// * `command` - Validated username, email and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Check credentials and open a session.
    ///
    /// The new refresh token replaces any previously stored one.
    ///
    /// # Arguments
    /// * `email` - Normalized email address
    /// * `password` - Plaintext password candidate
    ///
    /// # Returns
    /// User with access and refresh tokens
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<Session, UserError>;

    /// Drop the stored refresh token. Calling it twice is harmless.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn logout(&self, id: &UserId) -> Result<(), UserError>;

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, expired, or not the stored one
    /// * `TokenIssuance` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, UserError>;

    /// Load the user behind an authenticated request.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn current_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Redeem an email verification token. Tokens are single-use.
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - Unknown, already used, or expired token
    /// * `DatabaseError` - Database operation failed
    async fn verify_email(&self, raw_token: &str) -> Result<User, UserError>;

    /// Issue and send a fresh verification token, replacing the pending one.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `AlreadyVerified` - Email is already verified
    /// * `EmailDelivery` - Sending failed
    /// * `DatabaseError` - Database operation failed
    async fn resend_email_verification(&self, id: &UserId) -> Result<(), UserError>;

    /// Replace the password after checking the current one. Ends the
    /// stored session.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `InvalidCredentials` - Current password does not match
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn change_password(
        &self,
        id: &UserId,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError>;

    /// Issue and send a password reset token. Unknown emails succeed
    /// silently.
    ///
    /// # Errors
    /// * `EmailDelivery` - Sending failed
    /// * `DatabaseError` - Database operation failed
    async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), UserError>;
}

/// Persistence operations for user aggregate.
///
/// Every mutation touches a single record in a single statement. The
/// password column is written only by `create` and `update_password`.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve the user whose pending email verification has this hash.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email_verification_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, UserError>;

    /// Store or clear the user's refresh token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_refresh_token(
        &self,
        id: &UserId,
        refresh_token: Option<String>,
    ) -> Result<(), UserError>;

    /// Store or clear the pending email verification token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_email_verification(
        &self,
        id: &UserId,
        pending: Option<PendingToken>,
    ) -> Result<(), UserError>;

    /// Store or clear the pending password reset token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_forgot_password(
        &self,
        id: &UserId,
        pending: Option<PendingToken>,
    ) -> Result<(), UserError>;

    /// Mark the email verified and clear the pending token, but only if the
    /// stored hash is still `token_hash`.
    ///
    /// # Returns
    /// `true` if this call consumed the token, `false` if it was already gone
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn mark_email_verified(&self, id: &UserId, token_hash: &str) -> Result<bool, UserError>;

    /// Replace the password hash and clear the refresh token.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserError>;
}

/// Outbound delivery of temporary-token links.
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    /// Send the email verification link.
    ///
    /// # Errors
    /// * `CompositionFailed` - Message could not be built
    /// * `SendFailed` - Delivery failed
    async fn send_email_verification(
        &self,
        user: &User,
        verification_link: &str,
    ) -> Result<(), EmailDeliveryError>;

    /// Send the password reset link.
    ///
    /// # Errors
    /// * `CompositionFailed` - Message could not be built
    /// * `SendFailed` - Delivery failed
    async fn send_password_reset(
        &self,
        user: &User,
        reset_link: &str,
    ) -> Result<(), EmailDeliveryError>;
}
