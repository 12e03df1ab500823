//! JWT 令牌服务
//!
//! 访问令牌和刷新令牌使用不同的密钥签名（HS256），并在载荷中带上令牌类型，
//! 两种令牌不能互换使用。过期时间由注入的时钟独立校验，从而区分“已过期”和“无效”。

use std::sync::Arc;

use chrono::Duration;
use config::JwtConfig;
use domain::UserId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Claims 结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64, // 过期时间 (Unix timestamp)
    pub kind: TokenKind,
}

impl TokenClaims {
    pub fn subject(&self) -> UserId {
        UserId::from(self.sub)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("token encoding failed: {0}")]
    Encoding(String),
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// JWT Token 服务
pub struct TokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_lifetimes(
            &config.access_secret,
            &config.refresh_secret,
            Duration::try_minutes(config.access_token_minutes).unwrap_or(Duration::MAX),
            Duration::try_hours(config.refresh_token_hours).unwrap_or(Duration::MAX),
            clock,
        )
    }

    /// 有效期可以为负数，签发出来的令牌立即过期
    pub fn with_lifetimes(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            access: SigningKeys::new(access_secret, access_ttl),
            refresh: SigningKeys::new(refresh_secret, refresh_ttl),
            clock,
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// 签发指定类型的令牌
    pub fn issue(&self, subject: UserId, kind: TokenKind) -> Result<String, TokenError> {
        let keys = self.keys(kind);
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(keys.ttl)
            .ok_or_else(|| TokenError::Encoding("token lifetime out of range".to_string()))?;
        let claims = TokenClaims {
            sub: subject.into(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            kind,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|err| TokenError::Encoding(err.to_string()))
    }

    pub fn issue_pair(&self, subject: UserId) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.issue(subject, TokenKind::Access)?,
            refresh_token: self.issue(subject, TokenKind::Refresh)?,
        })
    }

    /// 验证签名、令牌类型和过期时间
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, TokenError> {
        let keys = self.keys(kind);

        let mut validation = Validation::new(Algorithm::HS256);
        // 过期时间交给注入的时钟判断
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<TokenClaims>(token, &keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)?;

        if claims.kind != kind {
            return Err(TokenError::Invalid);
        }
        if self.clock.now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
