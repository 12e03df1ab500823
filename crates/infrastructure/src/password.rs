//! bcrypt 实现的密码哈希
//!
//! 成本因子来自 `server.bcrypt_cost`，缺省为 bcrypt 的默认值。

use application::{password::PasswordHasherError, PasswordHasher};
use async_trait::async_trait;
use bcrypt::{BcryptError, DEFAULT_COST};
use domain::PasswordHash;

#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: Option<u32>) -> Self {
        Self {
            cost: cost.unwrap_or(DEFAULT_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(None)
    }
}

/// 在阻塞线程池中运行 bcrypt，任务本身失败（panic/取消）单独归类
async fn run_blocking<T, F>(
    work: F,
    on_error: fn(BcryptError) -> PasswordHasherError,
) -> Result<T, PasswordHasherError>
where
    F: FnOnce() -> Result<T, BcryptError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| PasswordHasherError::Worker(err.to_string()))?
        .map_err(on_error)
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();
        let digest = run_blocking(move || bcrypt::hash(plaintext, cost), |err| {
            PasswordHasherError::hashing(err.to_string())
        })
        .await?;

        PasswordHash::new(digest).map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        let plaintext = plaintext.to_owned();
        let stored = hashed.as_str().to_owned();
        run_blocking(move || bcrypt::verify(plaintext, &stored), |err| {
            PasswordHasherError::malformed(err.to_string())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = BcryptPasswordHasher::new(Some(4));
        let hashed = hasher.hash("Secret123").await.unwrap();

        assert_ne!(hashed.as_str(), "Secret123");
        assert!(hashed.as_str().starts_with("$2"));
        assert!(hasher.verify("Secret123", &hashed).await.unwrap());
        assert!(!hasher.verify("Secret124", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently() {
        let hasher = BcryptPasswordHasher::new(Some(4));
        let first = hasher.hash("Secret123").await.unwrap();
        let second = hasher.hash("Secret123").await.unwrap();
        assert_ne!(first.as_str(), second.as_str());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = BcryptPasswordHasher::new(Some(4));
        let bogus = PasswordHash::new("not-a-bcrypt-hash").unwrap();
        assert!(matches!(
            hasher.verify("Secret123", &bogus).await,
            Err(PasswordHasherError::MalformedHash(_))
        ));
    }

    #[tokio::test]
    async fn invalid_cost_is_a_hashing_error() {
        let hasher = BcryptPasswordHasher::new(Some(2));
        assert!(matches!(
            hasher.hash("Secret123").await,
            Err(PasswordHasherError::Hashing(_))
        ));
    }

    #[test]
    fn default_cost() {
        assert_eq!(BcryptPasswordHasher::default().cost(), DEFAULT_COST);
    }
}
