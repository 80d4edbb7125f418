//! # 认证工具函数

use axum::http::{HeaderMap, header};

/// 从 `Authorization` 头的值中提取 Bearer token
///
/// 仅接受 `Bearer <token>` 形式，空 token 视为缺失。
#[must_use]
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// 从请求头中提取 Bearer token
#[must_use]
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
}
