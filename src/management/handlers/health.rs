//! 健康检查相关处理器

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::management::response::StandardResponse;
use crate::management::server::AppState;

/// 健康检查数据
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthInfo {
    /// 数据库是否可用
    pub database: bool,
    /// 服务版本号
    pub version: String,
}

/// 存活探针
pub async fn ping() -> &'static str {
    "pong"
}

/// 健康检查，数据库不可用时返回 503
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = state.db.is_active().await;
    if database {
        let info = HealthInfo {
            database,
            version: env!("CARGO_PKG_VERSION").to_string(),
        };
        (StatusCode::OK, StandardResponse::success(info, "healthy"))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            StandardResponse::error("database unavailable"),
        )
    }
}
