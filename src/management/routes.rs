//! # 路由配置
//!
//! 定义所有API路由和路由组织

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};

use crate::management::handlers::{keys, users};
use crate::management::middleware::auth;
use crate::management::server::AppState;

/// 创建所有业务路由，由调用方挂载到 API 前缀下
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/user", public_user_routes().merge(key_routes(state.clone())))
        .with_state(state)
}

/// 无需认证的用户路由
fn public_user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
}

/// 密钥管理路由，全部需要令牌
fn key_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/{uid}/keys", get(keys::list_keys))
        .route("/{uid}/key/list", get(keys::list_keys))
        .route("/{uid}/key/generate", post(keys::generate_key))
        .route("/{uid}/key/delete", delete(keys::delete_key))
        .route_layer(from_fn_with_state(state, auth))
}
