use async_trait::async_trait;
use domain::{Ad, AdQuery, Login, RepositoryError, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 登录名重复时返回 `RepositoryError::Conflict`
    async fn create(&self, user: User) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_by_login(&self, login: Login) -> Result<Option<User>, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdRepository: Send + Sync {
    async fn create(&self, ad: Ad) -> Result<Ad, RepositoryError>;

    // 按价格区间过滤、排序后返回 offset/limit 指定的一页
    async fn query(&self, query: AdQuery) -> Result<Vec<Ad>, RepositoryError>;
}
