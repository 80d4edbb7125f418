//! # 认证中间件
//!
//! 从请求头中提取 JWT，验证并将解析出的 `(uid, level)` 注入到请求扩展中。
//! 令牌缺失或无效时直接返回 401，处理器不会被调用。

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::utils::bearer_from_headers;
use crate::error::PortalError;
use crate::management::server::AppState;

/// 包含认证用户信息的上下文
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// 令牌中的用户 ID
    pub user_id: i32,
    /// 权限等级，0 为普通用户
    pub level: i32,
}

impl AuthContext {
    /// 非零等级即管理员
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.level != 0
    }

    /// 管理员或本人
    #[must_use]
    pub const fn can_access(&self, uid: i32) -> bool {
        self.is_admin() || self.user_id == uid
    }
}

/// Axum认证中间件
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, PortalError> {
    let Some(token) = bearer_from_headers(request.headers()) else {
        debug!(path = %request.uri().path(), "缺少 Bearer 令牌");
        return Err(PortalError::auth("Missing bearer token"));
    };

    let (user_id, level) = state.tokens.decode(token)?;

    request
        .extensions_mut()
        .insert(Arc::new(AuthContext { user_id, level }));
    Ok(next.run(request).await)
}
