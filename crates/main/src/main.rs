//! 主应用程序入口
//!
//! 加载配置，组装存储与用例服务，启动 Axum Web API 服务。

use std::sync::Arc;

use application::{
    services::{AdService, AdServiceDependencies, UserService, UserServiceDependencies},
    Clock, SystemClock, TokenService,
};
use config::{AppConfig, LogConfig, LogFormat};
use infrastructure::{Infrastructure, InfrastructureConfig};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

fn init_tracing(log: &LogConfig) {
    // RUST_LOG 优先于配置文件
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("收到关闭信号，停止接收新请求");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.log);
    tracing::info!(config = %config.sanitize(), "配置加载完成");

    let infra = Infrastructure::connect(InfrastructureConfig::from(&config)).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let token_service = Arc::new(TokenService::new(&config.jwt, clock.clone()));

    // 创建应用层服务
    let user_service = UserService::new(UserServiceDependencies {
        user_repository: infra.user_repository.clone(),
        password_hasher: infra.password_hasher_trait(),
        token_service,
        clock: clock.clone(),
        login_policy: config.policies.login.clone(),
        password_policy: config.policies.password.clone(),
    });
    let ad_service = AdService::new(AdServiceDependencies {
        ad_repository: infra.ad_repository.clone(),
        user_repository: infra.user_repository.clone(),
        clock,
        ad_policy: config.policies.ad.clone(),
        listing_policy: config.policies.listing.clone(),
    });

    let state = AppState::new(Arc::new(user_service), Arc::new(ad_service));

    // 启动 Web 服务器
    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("市场服务启动在 http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
