//! 二手市场核心领域模型
//!
//! 包含用户、广告等核心实体，凭证策略、广告内容规则以及列表查询的规范化逻辑。
//! 领域层不依赖任何存储或传输实现。

pub mod ad;
pub mod credentials;
pub mod errors;
pub mod listing;
pub mod policy;
pub mod user;
pub mod value_objects;

// 重新导出常用类型
pub use ad::{Ad, AdDraft, AdPolicy, ImageTypes, ValidatedAd};
pub use credentials::{CharacterSet, LoginPolicy, PasswordPolicy};
pub use errors::{DomainError, DomainResult, PasswordRule, RepositoryError};
pub use listing::{AdQuery, ListedAd, ListingParams, ListingPolicy, ListingQuery, SortDirection, SortKey};
pub use policy::PolicyBundle;
pub use user::User;
pub use value_objects::{AdId, Login, PasswordHash, Price, Timestamp, UserId};
