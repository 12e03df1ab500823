//! 基础设施层实现。
//!
//! 提供数据库仓储、内存仓储与密码哈希等适配器，实现应用层定义的接口。

pub mod builder;
pub mod memory;
pub mod migrations;
pub mod password;
pub mod repository;

pub use builder::{Infrastructure, InfrastructureConfig, InfrastructureError};
pub use memory::{InMemoryAdRepository, InMemoryUserRepository};
pub use migrations::MIGRATOR;
pub use password::BcryptPasswordHasher;
pub use repository::{create_pg_pool, PgAdRepository, PgStorage, PgUserRepository};
