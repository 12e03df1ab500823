//! 内存仓储
//!
//! 不依赖数据库，供本地运行和测试使用。过滤、排序、分页语义与 Postgres 实现一致。

use std::{cmp::Ordering, collections::HashMap};

use application::{AdRepository, UserRepository};
use async_trait::async_trait;
use domain::{Ad, AdQuery, Login, RepositoryError, SortDirection, SortKey, User, UserId};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) || users.values().any(|u| u.login == user.login) {
            return Err(RepositoryError::Conflict);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_login(&self, login: Login) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.login == login).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAdRepository {
    ads: RwLock<Vec<Ad>>,
}

impl InMemoryAdRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Ad, b: &Ad, sort: SortKey) -> Ordering {
    let primary = match sort {
        SortKey::CreatedAt => Ordering::Equal,
        SortKey::Price => a.price.cmp(&b.price),
    };
    primary
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl AdRepository for InMemoryAdRepository {
    async fn create(&self, ad: Ad) -> Result<Ad, RepositoryError> {
        let mut ads = self.ads.write().await;
        if ads.iter().any(|existing| existing.id == ad.id) {
            return Err(RepositoryError::Conflict);
        }
        ads.push(ad.clone());
        Ok(ad)
    }

    async fn query(&self, query: AdQuery) -> Result<Vec<Ad>, RepositoryError> {
        let ads = self.ads.read().await;
        let mut matched: Vec<&Ad> = ads.iter().filter(|ad| query.matches(ad)).collect();

        matched.sort_by(|a, b| {
            let order = compare(a, b, query.sort);
            match query.direction {
                SortDirection::Asc => order,
                SortDirection::Desc => order.reverse(),
            }
        });

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        Ok(matched
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}
