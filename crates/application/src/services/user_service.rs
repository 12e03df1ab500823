use std::sync::Arc;

use domain::{DomainError, Login, LoginPolicy, PasswordPolicy, RepositoryError, User, UserId};
use tracing::{info, warn};

use crate::{
    clock::Clock,
    error::{ApplicationError, AuthFailure},
    password::PasswordHasher,
    repository::UserRepository,
    token::{TokenKind, TokenPair, TokenService},
};

#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AuthenticateUserRequest {
    pub login: String,
    pub password: String,
}

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_service: Arc<TokenService>,
    pub clock: Arc<dyn Clock>,
    pub login_policy: LoginPolicy,
    pub password_policy: PasswordPolicy,
}

pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    /// 注册新用户
    ///
    /// 先拒绝空字段，再规范化登录名并检查是否已被占用，之后才执行登录名和密码策略校验。
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, ApplicationError> {
        if request.login.is_empty() {
            return Err(DomainError::EmptyField { field: "login" }.into());
        }
        if request.password.is_empty() {
            return Err(DomainError::EmptyField { field: "password" }.into());
        }

        let login = Login::for_lookup(request.login, &self.deps.login_policy);
        if self
            .deps
            .user_repository
            .find_by_login(login.clone())
            .await?
            .is_some()
        {
            return Err(login_taken(&login));
        }

        self.deps.login_policy.validate(login.as_str())?;
        self.deps.password_policy.validate(&request.password)?;

        let password_hash = self.deps.password_hasher.hash(&request.password).await?;

        let user = User::register(
            UserId::generate(),
            login.clone(),
            password_hash,
            self.deps.clock.now(),
        );

        let stored = self
            .deps
            .user_repository
            .create(user)
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict => login_taken(&login),
                other => ApplicationError::Repository(other),
            })?;

        info!(user_id = %stored.id, login = %stored.login, "user registered");
        Ok(stored)
    }

    /// 校验登录名和密码，成功后签发访问令牌与刷新令牌
    pub async fn login(
        &self,
        request: AuthenticateUserRequest,
    ) -> Result<TokenPair, ApplicationError> {
        let login = Login::for_lookup(request.login, &self.deps.login_policy);
        let user = self
            .deps
            .user_repository
            .find_by_login(login.clone())
            .await?
            .ok_or(ApplicationError::NotFound("user"))?;

        let password_ok = self
            .deps
            .password_hasher
            .verify(&request.password, &user.password)
            .await?;
        if !password_ok {
            warn!(login = %login, "login rejected: wrong password");
            return Err(ApplicationError::Unauthorized(
                AuthFailure::InvalidCredentials,
            ));
        }

        let pair = self.deps.token_service.issue_pair(user.id)?;
        info!(user_id = %user.id, "user logged in");
        Ok(pair)
    }

    /// 用刷新令牌换取一对新令牌
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ApplicationError> {
        let claims = self
            .deps
            .token_service
            .verify(refresh_token, TokenKind::Refresh)
            .inspect_err(|err| warn!(error = %err, "refresh token rejected"))?;

        let user = self
            .deps
            .user_repository
            .find_by_id(claims.subject())
            .await?
            .ok_or(ApplicationError::NotFound("user"))?;

        let pair = self.deps.token_service.issue_pair(user.id)?;
        info!(user_id = %user.id, "tokens refreshed");
        Ok(pair)
    }

    /// 解析访问令牌，返回调用者ID
    pub fn authenticate_access(&self, access_token: &str) -> Result<UserId, ApplicationError> {
        let claims = self
            .deps
            .token_service
            .verify(access_token, TokenKind::Access)?;
        Ok(claims.subject())
    }
}

fn login_taken(login: &Login) -> ApplicationError {
    ApplicationError::Conflict(format!("login '{login}' is already taken"))
}
