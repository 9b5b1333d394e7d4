//! Credential and token primitives
//!
//! Service-agnostic building blocks for an authentication backend:
//! - Password hashing (Argon2id)
//! - Access/refresh JWT issuance and verification with separate secrets
//! - Temporary single-use tokens (email verification, password reset)
//!
//! Services define their own user model and persistence; this crate only
//! deals in strings, identifiers and timestamps.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("other_password", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::TokenIssuer;
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(
//!     b"access_secret_key_at_least_32_bytes!",
//!     Duration::minutes(15),
//!     b"refresh_secret_key_at_least_32_bytes",
//!     Duration::days(10),
//! )
//! .unwrap();
//!
//! let pair = issuer.issue_pair("user123", "alice@example.com", "alice").unwrap();
//! let claims = issuer.verify_access(&pair.access_token).unwrap();
//! assert_eq!(claims.username, "alice");
//! assert!(issuer.verify_access(&pair.refresh_token).is_err());
//! ```
//!
//! ## Temporary Tokens
//! ```
//! use auth::TemporaryTokenGenerator;
//!
//! let token = TemporaryTokenGenerator::default().generate();
//! // persist token.hash and token.expires_at, email token.raw
//! assert!(TemporaryTokenGenerator::redeem(&token.raw, &token.hash, token.expires_at));
//! ```

pub mod jwt;
pub mod password;
pub mod temporary;
pub mod token_issuer;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use temporary::constant_time_eq;
pub use temporary::TemporaryToken;
pub use temporary::TemporaryTokenGenerator;
pub use token_issuer::TokenIssuer;
pub use token_issuer::TokenPair;
