use domain::{DomainError, RepositoryError};
use thiserror::Error;

use crate::password::PasswordHasherError;
use crate::token::TokenError;

/// 认证失败的具体原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    TokenExpired,
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("unauthorized: {0}")]
    Unauthorized(AuthFailure),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
    #[error("password error: {0}")]
    Password(#[from] PasswordHasherError),
    #[error("token error: {0}")]
    Token(String),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Repository(value)
    }
}

impl From<TokenError> for ApplicationError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Invalid => ApplicationError::Unauthorized(AuthFailure::InvalidToken),
            TokenError::Expired => ApplicationError::Unauthorized(AuthFailure::TokenExpired),
            TokenError::Encoding(message) => ApplicationError::Token(message),
        }
    }
}
