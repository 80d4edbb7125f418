//! # 管理服务器
//!
//! Axum HTTP服务器，提供用户与 API 密钥接口

use std::net::{IpAddr, SocketAddr};
use std::ops::Deref;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app::AppContext;
use crate::config::ServerConfig;
use crate::error::{PortalError, Result};
use crate::management::handlers::health;

/// 管理服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    /// 以应用上下文创建路由状态
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// 创建完整路由器
pub fn create_router(context: Arc<AppContext>) -> Router {
    let config = context.config.server.clone();
    let state = AppState::new(context);

    let api_routes = super::routes::create_routes(state.clone());
    let base = Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .with_state(state);

    // axum 不允许在根路径 nest
    let mut app = match config.api_prefix.trim_end_matches('/') {
        "" => base.merge(api_routes),
        prefix => base.nest(prefix, api_routes),
    };

    let service_builder = ServiceBuilder::new().layer(TraceLayer::new_for_http());
    if config.enable_cors {
        app = app.layer(service_builder.layer(cors_layer(&config)));
    } else {
        app = app.layer(service_builder);
    }

    app
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ]);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return cors_layer.allow_origin(Any);
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>();

    match origins {
        Ok(origins) => cors_layer.allow_origin(origins),
        Err(e) => {
            warn!("Invalid CORS origin configuration: {e}, falling back to allow any");
            cors_layer.allow_origin(Any)
        }
    }
}

/// 解析监听地址
pub fn bind_address(config: &ServerConfig) -> Result<SocketAddr> {
    let ip = config.bind_address.parse::<IpAddr>().map_err(|e| {
        PortalError::config(format!(
            "Invalid bind address '{}': {e}",
            config.bind_address
        ))
    })?;
    Ok(SocketAddr::new(ip, config.port))
}

/// 启动服务器，直到收到 Ctrl-C
pub async fn serve(context: Arc<AppContext>) -> Result<()> {
    let addr = bind_address(&context.config.server)?;
    let router = create_router(context);

    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PortalError::internal_with_source("Server error", e))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
