use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldError;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = body?;
    state
        .credential_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User registered successfully and verification email has been sent on your email",
                RegisterResponseData { user: user.into() },
            )
        })
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

impl RegisterRequest {
    /// Parse every field, reporting all failures at once.
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        let username = Username::new(self.username);
        let email = EmailAddress::new(self.email);
        let password = Password::new(self.password);

        match (username, email, password) {
            (Ok(username), Ok(email), Ok(password)) => {
                Ok(RegisterCommand::new(username, email, password))
            }
            (username, email, password) => {
                let mut errors = Vec::new();
                if let Err(e) = username {
                    errors.push(FieldError::new("username", e.to_string()));
                }
                if let Err(e) = email {
                    errors.push(FieldError::new("email", e.to_string()));
                }
                if let Err(e) = password {
                    errors.push(FieldError::new("password", e.to_string()));
                }
                Err(ApiError::UnprocessableEntity(errors))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user: UserData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_invalid_fields_are_reported() {
        let request = RegisterRequest {
            username: "a b".to_string(),
            email: "nope".to_string(),
            password: "123".to_string(),
        };

        match request.try_into_command() {
            Err(ApiError::UnprocessableEntity(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["username", "email", "password"]);
            }
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_valid_request_is_normalized() {
        let request = RegisterRequest {
            username: " Alice ".to_string(),
            email: "Alice@Example.com".to_string(),
            password: "password123".to_string(),
        };

        let command = request.try_into_command().unwrap();
        assert_eq!(command.username.as_str(), "alice");
        assert_eq!(command.email.as_str(), "alice@example.com");
    }
}
