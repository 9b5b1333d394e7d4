use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::PendingToken;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, is_email_verified, refresh_token,
    email_verification_token_hash, email_verification_expires_at,
    forgot_password_token_hash, forgot_password_expires_at,
    created_at, updated_at
"#;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        sqlx::query_as::<_, UserRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(UserRow::into_user)
            .transpose()
    }
}

/// Flat row shape of the `users` table.
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    is_email_verified: bool,
    refresh_token: Option<String>,
    email_verification_token_hash: Option<String>,
    email_verification_expires_at: Option<DateTime<Utc>>,
    forgot_password_token_hash: Option<String>,
    forgot_password_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn pending_token(
    token_hash: Option<String>,
    expires_at: Option<DateTime<Utc>>,
) -> Option<PendingToken> {
    match (token_hash, expires_at) {
        (Some(token_hash), Some(expires_at)) => Some(PendingToken {
            token_hash,
            expires_at,
        }),
        _ => None,
    }
}

impl UserRow {
    fn into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.id),
            username: Username::new(self.username)?,
            email: EmailAddress::new(self.email)?,
            password_hash: PasswordHash::from_stored(self.password_hash),
            is_email_verified: self.is_email_verified,
            refresh_token: self.refresh_token,
            email_verification: pending_token(
                self.email_verification_token_hash,
                self.email_verification_expires_at,
            ),
            forgot_password: pending_token(
                self.forgot_password_token_hash,
                self.forgot_password_expires_at,
            ),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn expect_one_row(rows_affected: u64, id: &UserId) -> Result<(), UserError> {
    if rows_affected == 0 {
        Err(UserError::NotFound(id.to_string()))
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let (verification_hash, verification_expires_at) = match &user.email_verification {
            Some(pending) => (Some(pending.token_hash.as_str()), Some(pending.expires_at)),
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, is_email_verified,
                email_verification_token_hash, email_verification_expires_at,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.is_email_verified)
        .bind(verification_hash)
        .bind(verification_expires_at)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_username_key") {
                        return UserError::UsernameAlreadyExists(
                            user.username.as_str().to_string(),
                        );
                    }
                    if db_err.constraint() == Some("users_email_key") {
                        return UserError::EmailAlreadyExists(user.email.as_str().to_string());
                    }
                }
            }
            UserError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?
            .map(UserRow::into_user)
            .transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        self.find_one("email", email.as_str()).await
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        self.find_one("username", username.as_str()).await
    }

    async fn find_by_email_verification_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, UserError> {
        self.find_one("email_verification_token_hash", token_hash)
            .await
    }

    async fn set_refresh_token(
        &self,
        id: &UserId,
        refresh_token: Option<String>,
    ) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(refresh_token)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        expect_one_row(result.rows_affected(), id)
    }

    async fn set_email_verification(
        &self,
        id: &UserId,
        pending: Option<PendingToken>,
    ) -> Result<(), UserError> {
        let (token_hash, expires_at) = match pending {
            Some(pending) => (Some(pending.token_hash), Some(pending.expires_at)),
            None => (None, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE users
            SET email_verification_token_hash = $2,
                email_verification_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        expect_one_row(result.rows_affected(), id)
    }

    async fn set_forgot_password(
        &self,
        id: &UserId,
        pending: Option<PendingToken>,
    ) -> Result<(), UserError> {
        let (token_hash, expires_at) = match pending {
            Some(pending) => (Some(pending.token_hash), Some(pending.expires_at)),
            None => (None, None),
        };

        let result = sqlx::query(
            r#"
            UPDATE users
            SET forgot_password_token_hash = $2,
                forgot_password_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        expect_one_row(result.rows_affected(), id)
    }

    async fn mark_email_verified(&self, id: &UserId, token_hash: &str) -> Result<bool, UserError> {
        // Conditional on the hash, so two concurrent redemptions cannot both win.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_email_verified = TRUE,
                email_verification_token_hash = NULL,
                email_verification_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1 AND email_verification_token_hash = $2
            "#,
        )
        .bind(id.0)
        .bind(token_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, refresh_token = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .bind(password_hash.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        expect_one_row(result.rows_affected(), id)
    }
}
