use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::credentials::LoginPolicy;
use crate::errors::{DomainError, DomainResult};

/// 统一的时间戳类型。
pub type Timestamp = DateTime<Utc>;

/// 用户唯一标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// 随机生成新的用户ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<UserId> for Uuid {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// 广告唯一标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdId(pub Uuid);

impl AdId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for AdId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<AdId> for Uuid {
    fn from(value: AdId) -> Self {
        value.0
    }
}

/// 经过规范化的登录名。
///
/// 大小写不敏感的策略下，登录名在比较和存储之前统一转为小写。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Login(String);

impl Login {
    /// 规范化并按策略校验，用于注册。
    pub fn parse(value: impl Into<String>, policy: &LoginPolicy) -> DomainResult<Self> {
        let login = Self::for_lookup(value, policy);
        policy.validate(login.as_str())?;
        Ok(login)
    }

    /// 只做规范化不做校验，用于按登录名查找。
    pub fn for_lookup(value: impl Into<String>, policy: &LoginPolicy) -> Self {
        Self(policy.normalize(value.into()))
    }

    /// 从存储中恢复，存储中的值已经规范化过。
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 密码哈希值，不会出现在日志或序列化输出中。
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::invalid_argument(
                "password_hash",
                "cannot be empty",
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(***)")
    }
}

/// 价格，以最小货币单位（分）保存，保证非负。
///
/// 对外序列化为带两位小数的数值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);
    /// 一分钱，默认的价格下限
    pub const CENT: Price = Price(1);
    /// 查询时表示“没有上限”
    pub const MAX: Price = Price(i64::MAX);

    pub fn from_cents(cents: i64) -> DomainResult<Self> {
        if cents < 0 {
            return Err(DomainError::invalid_argument("price", "cannot be negative"));
        }
        Ok(Self(cents))
    }

    /// 从十进制数值构造，四舍五入到分。
    pub fn from_decimal(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::invalid_argument("price", "must be a finite number"));
        }
        if value < 0.0 {
            return Err(DomainError::invalid_argument("price", "cannot be negative"));
        }
        let cents = (value * 100.0).round();
        if cents >= i64::MAX as f64 {
            return Ok(Self::MAX);
        }
        Ok(Self(cents as i64))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_| DomainError::invalid_argument("price", "not a number"))?;
        Self::from_decimal(value)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Price::from_decimal(value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_rounds_to_cents() {
        assert_eq!(Price::from_decimal(0.01).unwrap().cents(), 1);
        assert_eq!(Price::from_decimal(19.999).unwrap().cents(), 2000);
        assert_eq!(Price::from_decimal(1500.5).unwrap().to_string(), "1500.50");
    }

    #[test]
    fn price_rejects_negative_and_non_finite() {
        assert!(Price::from_decimal(-0.5).is_err());
        assert!(Price::from_decimal(f64::NAN).is_err());
        assert!(Price::from_cents(-1).is_err());
        assert!("abc".parse::<Price>().is_err());
    }

    #[test]
    fn price_serializes_as_decimal_number() {
        let price = Price::from_cents(1234).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "12.34");
        let parsed: Price = serde_json::from_str("12.34").unwrap();
        assert_eq!(parsed, price);
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }

    #[test]
    fn password_hash_is_redacted_in_debug() {
        let hash = PasswordHash::new("$2b$04$secret").unwrap();
        assert_eq!(format!("{hash:?}"), "PasswordHash(***)");
        assert!(PasswordHash::new("").is_err());
    }

    #[test]
    fn login_lookup_folds_case_when_insensitive() {
        let policy = LoginPolicy::default();
        assert_eq!(Login::for_lookup("Alice_01", &policy).as_str(), "alice_01");

        let sensitive = LoginPolicy {
            case_sensitive: true,
            ..LoginPolicy::default()
        };
        assert_eq!(Login::for_lookup("Alice_01", &sensitive).as_str(), "Alice_01");
    }
}
