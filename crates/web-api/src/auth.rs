//! 请求认证
//!
//! 从 `Authorization: Bearer <token>` 头中解析访问令牌。

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::UserId;

use crate::{error::ApiError, state::AppState};

/// 必须登录的调用者
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

/// 可选登录的调用者，缺少或无效的令牌都视为匿名
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<UserId>);

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization header format"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = state.user_service.authenticate_access(token)?;
        Ok(AuthUser(user_id))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_id = bearer_token(parts)
            .ok()
            .and_then(|token| state.user_service.authenticate_access(token).ok());
        Ok(MaybeAuthUser(user_id))
    }
}
