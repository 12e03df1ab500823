use sqlx::migrate::Migrator;

/// 嵌入的数据库迁移脚本（工作区根目录下的 `migrations/`）
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");
