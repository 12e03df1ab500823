use application::{ApplicationError, AuthFailure};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, RepositoryError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    /// 校验失败时的首个出错字段
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
                field: None,
            },
        }
    }

    fn with_field(mut self, field: &'static str) -> Self {
        self.body.field = Some(field);
        self
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.body.code
    }
}

fn validation_code(error: &DomainError) -> &'static str {
    match error {
        DomainError::EmptyField { .. } => "EMPTY_FIELD",
        DomainError::InvalidLength { .. } => "INVALID_LENGTH",
        DomainError::InvalidCharacterSet { .. } => "INVALID_CHARACTER_SET",
        DomainError::InvalidCharacters { .. } => "INVALID_CHARACTERS",
        DomainError::PolicyViolation(_) => "PASSWORD_POLICY",
        DomainError::PriceBelowMinimum { .. } => "PRICE_TOO_LOW",
        DomainError::ImageTypeNotAllowed { .. } => "IMAGE_TYPE_NOT_ALLOWED",
        DomainError::InvalidArgument { .. } => "INVALID_ARGUMENT",
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        use application::ApplicationError as AppErr;

        match error {
            AppErr::Validation(err) => {
                ApiError::new(StatusCode::BAD_REQUEST, validation_code(&err), err.to_string())
                    .with_field(err.field())
            }
            AppErr::NotFound(what) => {
                ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{what} not found"))
            }
            AppErr::Unauthorized(failure) => {
                let code = match failure {
                    AuthFailure::InvalidCredentials => "INVALID_CREDENTIALS",
                    AuthFailure::InvalidToken => "INVALID_TOKEN",
                    AuthFailure::TokenExpired => "TOKEN_EXPIRED",
                };
                ApiError::new(StatusCode::UNAUTHORIZED, code, failure.to_string())
            }
            AppErr::Conflict(message) => ApiError::new(StatusCode::CONFLICT, "CONFLICT", message),
            AppErr::Repository(repo_err) => match repo_err {
                RepositoryError::Conflict => {
                    ApiError::new(StatusCode::CONFLICT, "CONFLICT", "resource already exists")
                }
                RepositoryError::Storage { message } => {
                    tracing::error!(error = %message, "storage failure");
                    ApiError::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        "storage is unavailable",
                    )
                }
            },
            AppErr::Password(err) => {
                tracing::error!(error = %err, "password hashing failure");
                ApiError::internal_server_error("password processing failed")
            }
            AppErr::Token(message) => {
                tracing::error!(error = %message, "token signing failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TOKEN_ERROR",
                    "token could not be issued",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_and_invalid_tokens_have_distinct_codes() {
        let expired = ApiError::from(ApplicationError::Unauthorized(AuthFailure::TokenExpired));
        let invalid = ApiError::from(ApplicationError::Unauthorized(AuthFailure::InvalidToken));

        assert_eq!(expired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(expired.code(), "TOKEN_EXPIRED");
        assert_eq!(invalid.code(), "INVALID_TOKEN");
    }

    #[test]
    fn validation_errors_are_bad_requests() {
        let err = ApiError::from(ApplicationError::Validation(DomainError::InvalidLength {
            field: "title",
            min: 3,
            max: 100,
        }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_LENGTH");
        assert_eq!(err.body.field, Some("title"));

        let json = serde_json::to_value(&err.body).unwrap();
        assert_eq!(json["field"], "title");
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let err = ApiError::from(ApplicationError::Repository(RepositoryError::storage(
            "password authentication failed for user postgres",
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.body.message.contains("postgres"));

        let json = serde_json::to_value(&err.body).unwrap();
        assert!(json.get("field").is_none());
    }
}
