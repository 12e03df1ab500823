//! 密码哈希端口
//!
//! 注册时明文只在这里被转换成哈希，随后与 `User` 一起保存；登录时用同一个端口比对。
//! 比对不一致返回 `Ok(false)`，只有存储的哈希本身损坏或计算失败时才返回错误。

use async_trait::async_trait;
use domain::PasswordHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHasherError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
    /// 存储的哈希无法解析
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(String),
    #[error("password worker failed: {0}")]
    Worker(String),
}

impl PasswordHasherError {
    pub fn hashing(message: impl Into<String>) -> Self {
        Self::Hashing(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedHash(message.into())
    }
}

/// 实现方需要把计算放到阻塞线程池中执行
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError>;

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError>;
}
