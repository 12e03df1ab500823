use serde::Serialize;

use crate::value_objects::{Login, PasswordHash, Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub login: Login,
    #[serde(skip_serializing)] // 密码字段不暴露给客户端
    pub password: PasswordHash,
    pub created_at: Timestamp,
}

impl User {
    pub fn register(id: UserId, login: Login, password: PasswordHash, now: Timestamp) -> Self {
        Self {
            id,
            login,
            password,
            created_at: now,
        }
    }

    /// 作者显示名，发布广告时作为快照写入
    pub fn display_name(&self) -> &str {
        self.login.as_str()
    }
}
