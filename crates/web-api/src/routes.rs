use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use application::services::{AuthenticateUserRequest, RegisterUserRequest};
use domain::{Ad, AdDraft, ListedAd, ListingParams, UserId};

use crate::{
    auth::{AuthUser, MaybeAuthUser},
    error::ApiError,
    state::AppState,
};

#[derive(Debug, Deserialize)]
struct CredentialsPayload {
    login: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct RefreshPayload {
    refresh_token: String,
}

#[derive(Debug, Serialize)]
struct RegisteredUser {
    id: UserId,
    login: String,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    token_type: &'static str,
    access_token: String,
    refresh_token: String,
}

impl From<application::TokenPair> for TokenResponse {
    fn from(pair: application::TokenPair) -> Self {
        Self {
            token_type: "Bearer",
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

#[derive(Debug, Serialize)]
struct AdPage {
    page: u32,
    limit: u32,
    items: Vec<ListedAd>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_user))
        .route("/auth/login", post(login_user))
        .route("/auth/refresh", post(refresh_tokens))
        .route("/ads", post(create_ad).get(list_ads))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<(StatusCode, Json<RegisteredUser>), ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            login: payload.login,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredUser {
            id: user.id,
            login: user.login.to_string(),
        }),
    ))
}

async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<TokenResponse>, ApiError> {
    let pair = state
        .user_service
        .login(AuthenticateUserRequest {
            login: payload.login,
            password: payload.password,
        })
        .await?;

    Ok(Json(pair.into()))
}

async fn refresh_tokens(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<TokenResponse>, ApiError> {
    let pair = state.user_service.refresh(&payload.refresh_token).await?;
    Ok(Json(pair.into()))
}

async fn create_ad(
    State(state): State<AppState>,
    AuthUser(author_id): AuthUser,
    Json(draft): Json<AdDraft>,
) -> Result<(StatusCode, Json<Ad>), ApiError> {
    let ad = state.ad_service.create_ad(author_id, draft).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

async fn list_ads(
    State(state): State<AppState>,
    MaybeAuthUser(requester): MaybeAuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<AdPage>, ApiError> {
    // 逐对读取，重复或无法识别的参数不会导致 400
    let params = ListingParams::from_pairs(pairs);
    let query = state.ad_service.listing_query(&params);
    let listing = state.ad_service.list_ads(&query, requester).await?;

    Ok(Json(AdPage {
        page: query.page,
        limit: query.page_size,
        items: listing.into_items(),
    }))
}
