//! # 用户处理器

use axum::Json;
use axum::extract::State;

use crate::error::Result;
use crate::management::response::StandardResponse;
use crate::management::server::AppState;
use crate::management::services::{Credentials, LoginResponse, UsersService};

/// 注册
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<StandardResponse<()>> {
    UsersService::new(&state).register(&request).await?;
    Ok(StandardResponse::message("Register successfully"))
}

/// 登录
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<StandardResponse<LoginResponse>> {
    let data = UsersService::new(&state).login(&request).await?;
    Ok(StandardResponse::success(data, "Login successfully"))
}
