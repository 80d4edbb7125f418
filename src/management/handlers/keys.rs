//! # API 密钥处理器
//!
//! 所有路由都挂在认证中间件之后，`AuthContext` 必然存在。

use std::sync::Arc;

use axum::Extension;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::Result;
use crate::management::middleware::AuthContext;
use crate::management::response::StandardResponse;
use crate::management::server::AppState;
use crate::management::services::{ApiKeyList, ApiKeysService, GeneratedApiKey};

/// 删除密钥的查询参数
#[derive(Debug, Deserialize)]
pub struct DeleteKeyQuery {
    /// 待删除密钥的密文，缺省为空串
    #[serde(default)]
    pub api_key_secret: String,
}

/// 列出密钥
pub async fn list_keys(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Path(uid): Path<i32>,
) -> Result<StandardResponse<ApiKeyList>> {
    let data = ApiKeysService::new(&state).list(uid, &auth).await?;
    Ok(StandardResponse::success(data, "List api key successfully"))
}

/// 生成密钥
pub async fn generate_key(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Path(uid): Path<i32>,
) -> Result<StandardResponse<GeneratedApiKey>> {
    let data = ApiKeysService::new(&state).generate(uid, &auth).await?;
    Ok(StandardResponse::success(
        data,
        "Generate api key successfully. Please save it carefully.",
    ))
}

/// 删除密钥
pub async fn delete_key(
    State(state): State<AppState>,
    Extension(auth): Extension<Arc<AuthContext>>,
    Path(uid): Path<i32>,
    Query(query): Query<DeleteKeyQuery>,
) -> Result<StandardResponse<()>> {
    ApiKeysService::new(&state)
        .delete(uid, &query.api_key_secret, &auth)
        .await?;
    Ok(StandardResponse::message("Delete api key successfully"))
}
