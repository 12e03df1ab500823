//! 凭证策略
//!
//! 登录名与密码的格式校验。所有阈值都来自调用方显式传入的策略值，
//! 这里不读取任何全局配置。

use std::{fmt, sync::LazyLock};

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult, PasswordRule};

static DEFAULT_LOGIN_CHARACTERS: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::parse("A-Za-z0-9_-").expect("default login character class compiles")
});

/// 允许的字符集合。
///
/// 写法与正则字符类的内容相同，例如 `A-Za-z0-9_-`，编译为 `^[...]+$`。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterSet {
    spec: String,
    pattern: Regex,
}

impl CharacterSet {
    pub fn parse(spec: impl Into<String>) -> DomainResult<Self> {
        let spec = spec.into();
        if spec.is_empty() {
            return Err(DomainError::invalid_argument(
                "allowed_characters",
                "cannot be empty",
            ));
        }

        let pattern = Regex::new(&format!("^[{spec}]+$"))
            .map_err(|err| DomainError::invalid_argument("allowed_characters", err.to_string()))?;
        Ok(Self { spec, pattern })
    }

    /// 整个字符串都由集合内的字符组成（空串不匹配）
    pub fn is_match(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    pub fn contains(&self, c: char) -> bool {
        self.is_match(c.encode_utf8(&mut [0; 4]))
    }

    pub fn as_str(&self) -> &str {
        &self.spec
    }
}

impl PartialEq for CharacterSet {
    fn eq(&self, other: &Self) -> bool {
        self.spec == other.spec
    }
}

impl Eq for CharacterSet {}

impl TryFrom<String> for CharacterSet {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CharacterSet> for String {
    fn from(value: CharacterSet) -> Self {
        value.spec
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

/// 登录名策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub allowed_characters: CharacterSet,
    /// 为 false 时登录名在比较和存储前统一转为小写
    pub case_sensitive: bool,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 20,
            allowed_characters: DEFAULT_LOGIN_CHARACTERS.clone(),
            case_sensitive: false,
        }
    }
}

impl LoginPolicy {
    pub fn normalize(&self, login: String) -> String {
        if self.case_sensitive {
            login
        } else {
            login.to_lowercase()
        }
    }

    /// 校验登录名：先长度，后字符集。
    pub fn validate(&self, login: &str) -> DomainResult<()> {
        let length = login.chars().count();
        if length < self.min_length || length > self.max_length {
            return Err(DomainError::InvalidLength {
                field: "login",
                min: self.min_length,
                max: self.max_length,
            });
        }

        if !self.allowed_characters.is_match(login) {
            return Err(DomainError::InvalidCharacterSet { field: "login" });
        }

        Ok(())
    }
}

/// 密码策略
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_upper: bool,
    pub require_lower: bool,
    pub require_digit: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 64,
            require_upper: true,
            require_lower: true,
            require_digit: true,
        }
    }
}

impl PasswordPolicy {
    /// 校验密码强度
    ///
    /// 检查顺序：长度、控制字符、空格、大写、小写、数字，返回第一个不满足的规则。
    /// 空格无论策略如何都会被拒绝。
    pub fn validate(&self, password: &str) -> DomainResult<()> {
        let length = password.chars().count();
        if length < self.min_length || length > self.max_length {
            return Err(DomainError::InvalidLength {
                field: "password",
                min: self.min_length,
                max: self.max_length,
            });
        }

        if password.chars().any(|c| c.is_control()) {
            return Err(DomainError::InvalidCharacters { field: "password" });
        }

        if password.contains(' ') {
            return Err(DomainError::PolicyViolation(PasswordRule::NoSpaces));
        }

        if self.require_upper && !password.chars().any(char::is_uppercase) {
            return Err(DomainError::PolicyViolation(PasswordRule::RequireUppercase));
        }

        if self.require_lower && !password.chars().any(char::is_lowercase) {
            return Err(DomainError::PolicyViolation(PasswordRule::RequireLowercase));
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(DomainError::PolicyViolation(PasswordRule::RequireDigit));
        }

        Ok(())
    }
}
