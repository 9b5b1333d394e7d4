use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

pub mod change_password;
pub mod current_user;
pub mod forgot_password;
pub mod health;
pub mod login;
pub mod logout;
pub mod refresh_token;
pub mod register;
pub mod resend_email_verification;
pub mod verify_email;

const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong";
const VALIDATION_ERROR_MESSAGE: &str = "Received data is not valid";
const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(Vec<FieldError>),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::UnprocessableEntity(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                    Vec::new(),
                )
            }
            ApiError::UnprocessableEntity(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                VALIDATION_ERROR_MESSAGE.to_string(),
                errors,
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
        };

        (status, Json(ApiErrorBody::new(status, message, errors))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(e) => {
                ApiError::UnprocessableEntity(vec![FieldError::new("userId", e.to_string())])
            }
            UserError::InvalidUsername(e) => {
                ApiError::UnprocessableEntity(vec![FieldError::new("username", e.to_string())])
            }
            UserError::InvalidEmail(e) => {
                ApiError::UnprocessableEntity(vec![FieldError::new("email", e.to_string())])
            }
            UserError::InvalidPassword(e) => {
                ApiError::UnprocessableEntity(vec![FieldError::new("password", e.to_string())])
            }
            UserError::NotFound(_) => ApiError::NotFound("User does not exist".to_string()),
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict("User with this email or username already exists".to_string())
            }
            UserError::AlreadyVerified => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials | UserError::InvalidOrExpiredToken => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::Unauthorized => ApiError::unauthorized(),
            UserError::Password(_)
            | UserError::TokenIssuance(_)
            | UserError::EmailDelivery(_)
            | UserError::DatabaseError(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

/// One `{ field: message }` entry of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.field, &self.message)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    success: bool,
    status_code: u16,
    data: T,
    message: String,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            success: status_code.as_u16() < 400,
            status_code: status_code.as_u16(),
            data,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    success: bool,
    status_code: u16,
    message: String,
    errors: Vec<FieldError>,
}

impl ApiErrorBody {
    pub fn new(status_code: StatusCode, message: String, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            status_code: status_code.as_u16(),
            message,
            errors,
        }
    }
}

/// Empty `data` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoData {}

/// Public projection of a user. Never carries secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            is_email_verified: user.is_email_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::errors::PasswordPolicyError;

    #[test]
    fn test_user_error_status_mapping() {
        let cases = [
            (
                UserError::EmailAlreadyExists("a@b.c".to_string()),
                StatusCode::CONFLICT,
            ),
            (UserError::AlreadyVerified, StatusCode::CONFLICT),
            (
                UserError::NotFound("x".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (UserError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (UserError::InvalidOrExpiredToken, StatusCode::BAD_REQUEST),
            (UserError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                UserError::InvalidPassword(PasswordPolicyError::TooShort { min: 6 }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                UserError::DatabaseError("connection refused".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response =
            ApiError::from(UserError::DatabaseError("password=hunter2".to_string())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(!body.contains("hunter2"));
        assert!(body.contains(INTERNAL_ERROR_MESSAGE));
    }

    #[test]
    fn test_field_error_serializes_as_single_entry_map() {
        let errors = vec![FieldError::new("email", "A valid email is required")];
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "email": "A valid email is required" }])
        );
    }

    #[test]
    fn test_success_envelope_shape() {
        let body = ApiResponseBody::new(StatusCode::CREATED, "created", NoData {});
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "statusCode": 201,
                "data": {},
                "message": "created"
            })
        );
    }
}
