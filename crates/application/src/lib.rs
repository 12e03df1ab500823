//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务：注册、登录、令牌刷新、广告发布与列表查询，
//! 以及对外部适配器（例如密码哈希、存储）的抽象。

pub mod clock;
pub mod error;
pub mod password;
pub mod repository;
pub mod services;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ApplicationError, AuthFailure};
pub use password::{PasswordHasher, PasswordHasherError};
pub use repository::{AdRepository, UserRepository};
pub use services::{
    AdListing, AdService, AdServiceDependencies, AuthenticateUserRequest, RegisterUserRequest,
    UserService, UserServiceDependencies,
};
pub use token::{TokenClaims, TokenError, TokenKind, TokenPair, TokenService};
