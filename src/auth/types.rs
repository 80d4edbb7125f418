//! # 认证类型定义

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{PortalError, Result};

/// JWT 载荷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// 用户ID
    pub sub: String,
    /// 权限等级，非零为管理员
    pub level: i32,
    /// 签发时间
    pub iat: i64,
    /// 过期时间
    pub exp: i64,
    /// 签发者
    pub iss: String,
    /// 令牌ID
    pub jti: String,
}

impl JwtClaims {
    /// 创建新的 JWT 载荷
    #[must_use]
    pub fn new(user_id: i32, level: i32, issuer: &str, expires_in: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            level,
            iat: now,
            exp: now + expires_in,
            iss: issuer.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// 获取用户ID
    pub fn user_id(&self) -> Result<i32> {
        self.sub
            .parse()
            .map_err(|_| PortalError::auth(format!("Invalid user ID in token: {}", self.sub)))
    }

    /// 检查是否已过期
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}
