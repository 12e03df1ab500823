use std::sync::Arc;

use application::{AdRepository, UserRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    Ad, AdId, AdQuery, Login, PasswordHash, Price, RepositoryError, SortDirection, SortKey, User,
    UserId,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    if err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
    {
        return RepositoryError::Conflict;
    }
    RepositoryError::storage(err.to_string())
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct UserRecord {
    id: Uuid,
    login: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = RepositoryError;

    fn try_from(value: UserRecord) -> Result<Self, Self::Error> {
        let password =
            PasswordHash::new(value.password_hash).map_err(|err| invalid_data(err.to_string()))?;

        Ok(User {
            id: UserId::from(value.id),
            login: Login::from_stored(value.login),
            password,
            created_at: value.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct AdRecord {
    id: Uuid,
    title: String,
    description: String,
    image_url: String,
    author_id: Uuid,
    author_name: String,
    price_cents: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<AdRecord> for Ad {
    type Error = RepositoryError;

    fn try_from(value: AdRecord) -> Result<Self, Self::Error> {
        let price =
            Price::from_cents(value.price_cents).map_err(|err| invalid_data(err.to_string()))?;

        Ok(Ad {
            id: AdId::from(value.id),
            title: value.title,
            description: value.description,
            image_url: value.image_url,
            author_id: UserId::from(value.author_id),
            author_name: value.author_name,
            price,
            created_at: value.created_at,
        })
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, login, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, login, password_hash, created_at
            "#,
        )
        .bind(Uuid::from(user.id))
        .bind(user.login.as_str())
        .bind(user.password.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        User::try_from(record)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"SELECT id, login, password_hash, created_at FROM users WHERE id = $1"#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }

    async fn find_by_login(&self, login: Login) -> Result<Option<User>, RepositoryError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"SELECT id, login, password_hash, created_at FROM users WHERE login = $1"#,
        )
        .bind(login.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        record.map(User::try_from).transpose()
    }
}

pub struct PgAdRepository {
    pool: PgPool,
}

impl PgAdRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 排序子句只来自枚举，不拼接任何用户输入
fn order_clause(sort: SortKey, direction: SortDirection) -> &'static str {
    match (sort, direction) {
        (SortKey::CreatedAt, SortDirection::Asc) => "created_at ASC, id ASC",
        (SortKey::CreatedAt, SortDirection::Desc) => "created_at DESC, id DESC",
        (SortKey::Price, SortDirection::Asc) => "price_cents ASC, created_at ASC, id ASC",
        (SortKey::Price, SortDirection::Desc) => "price_cents DESC, created_at DESC, id DESC",
    }
}

#[async_trait]
impl AdRepository for PgAdRepository {
    async fn create(&self, ad: Ad) -> Result<Ad, RepositoryError> {
        let record = sqlx::query_as::<_, AdRecord>(
            r#"
            INSERT INTO ads (id, title, description, image_url, author_id, author_name, price_cents, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, image_url, author_id, author_name, price_cents, created_at
            "#,
        )
        .bind(Uuid::from(ad.id))
        .bind(&ad.title)
        .bind(&ad.description)
        .bind(&ad.image_url)
        .bind(Uuid::from(ad.author_id))
        .bind(&ad.author_name)
        .bind(ad.price.cents())
        .bind(ad.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ad::try_from(record)
    }

    async fn query(&self, query: AdQuery) -> Result<Vec<Ad>, RepositoryError> {
        let sql = format!(
            r#"
            SELECT id, title, description, image_url, author_id, author_name, price_cents, created_at
            FROM ads
            WHERE price_cents >= $1 AND price_cents <= $2
            ORDER BY {}
            LIMIT $3 OFFSET $4
            "#,
            order_clause(query.sort, query.direction)
        );

        let records = sqlx::query_as::<_, AdRecord>(&sql)
            .bind(query.min_price.cents())
            .bind(query.max_price.cents())
            .bind(i64::from(query.limit))
            .bind(i64::try_from(query.offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        records.into_iter().map(Ad::try_from).collect()
    }
}

/// Postgres 仓储集合
pub struct PgStorage {
    pub pool: PgPool,
    pub user_repository: Arc<PgUserRepository>,
    pub ad_repository: Arc<PgAdRepository>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self {
            user_repository: Arc::new(PgUserRepository::new(pool.clone())),
            ad_repository: Arc::new(PgAdRepository::new(pool.clone())),
            pool,
        }
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
