//! 领域模型错误定义
//!
//! 校验错误携带出错的字段与具体规则，调用方可以直接展示给用户；
//! 仓储错误则保持不透明，只区分“冲突”和“存储失败”。

use std::fmt;

use thiserror::Error;

use crate::value_objects::Price;

/// 密码策略中可以单独开启的规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    /// 禁止包含空格（始终生效）
    NoSpaces,
    /// 至少一个大写字母
    RequireUppercase,
    /// 至少一个小写字母
    RequireLowercase,
    /// 至少一个数字
    RequireDigit,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordRule::NoSpaces => f.write_str("must not contain spaces"),
            PasswordRule::RequireUppercase => f.write_str("must contain an uppercase letter"),
            PasswordRule::RequireLowercase => f.write_str("must contain a lowercase letter"),
            PasswordRule::RequireDigit => f.write_str("must contain a digit"),
        }
    }
}

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// 必填字段为空
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    /// 长度超出范围（按字符计数）
    #[error("{field} must be between {min} and {max} characters")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
    },

    /// 包含允许字符集之外的字符
    #[error("{field} contains characters outside the allowed set")]
    InvalidCharacterSet { field: &'static str },

    /// 包含不可见或控制字符
    #[error("{field} contains invalid characters")]
    InvalidCharacters { field: &'static str },

    /// 违反密码策略
    #[error("password {0}")]
    PolicyViolation(PasswordRule),

    /// 价格低于下限
    #[error("price must be at least {min}")]
    PriceBelowMinimum { min: Price },

    /// 图片扩展名不在允许列表中
    #[error("image type {extension:?} is not allowed")]
    ImageTypeNotAllowed { extension: String },

    /// 其他参数错误
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

impl DomainError {
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// 出错的字段名，用于对外返回
    pub fn field(&self) -> &'static str {
        match self {
            DomainError::EmptyField { field }
            | DomainError::InvalidLength { field, .. }
            | DomainError::InvalidCharacterSet { field }
            | DomainError::InvalidCharacters { field }
            | DomainError::InvalidArgument { field, .. } => field,
            DomainError::PolicyViolation(_) => "password",
            DomainError::PriceBelowMinimum { .. } => "price",
            DomainError::ImageTypeNotAllowed { .. } => "image_url",
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 仓储层错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
