//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 服务配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: super::DatabaseConfig,
    /// 令牌配置
    pub auth: AuthConfig,
    /// API 密钥策略
    pub keys: KeyPolicyConfig,
    /// 启动时确保存在的管理员账户
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminConfig>,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// API前缀
    pub api_prefix: String,
    /// 是否启用CORS
    pub enable_cors: bool,
    /// 允许的CORS源地址
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            api_prefix: "/api/v1".to_string(),
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// 令牌签发配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 签名密钥
    pub jwt_secret: String,
    /// 令牌有效期（秒）
    pub token_expires_in: i64,
    /// 签发者
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            token_expires_in: 24 * 3600,
            issuer: "llm-portal".to_string(),
        }
    }
}

/// API 密钥配额与有效期
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyPolicyConfig {
    /// 每个用户最多持有的存活密钥数
    pub max_per_user: u64,
    /// 新密钥有效天数
    pub ttl_days: i64,
}

impl Default for KeyPolicyConfig {
    fn default() -> Self {
        Self {
            max_per_user: 5,
            ttl_days: 30,
        }
    }
}

impl KeyPolicyConfig {
    /// 新密钥有效期
    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.ttl_days)
    }
}

/// 管理员账户
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// 管理员用户名
    pub user_name: String,
    /// 管理员密码（明文）
    pub password: String,
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if !self.server.api_prefix.is_empty() && !self.server.api_prefix.starts_with('/') {
            return Err("server.api_prefix must start with '/'".to_string());
        }
        if self.database.url.is_empty() {
            return Err("Database URL cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.auth.jwt_secret.is_empty() {
            return Err("auth.jwt_secret cannot be empty".to_string());
        }
        if self.auth.token_expires_in <= 0 {
            return Err("auth.token_expires_in must be positive".to_string());
        }
        if self.keys.max_per_user == 0 {
            return Err("keys.max_per_user must be greater than 0".to_string());
        }
        if self.keys.ttl_days <= 0 {
            return Err("keys.ttl_days must be positive".to_string());
        }
        if let Some(admin) = &self.admin {
            if admin.user_name.is_empty() || admin.password.is_empty() {
                return Err("admin.user_name and admin.password are both required".to_string());
            }
        }
        Ok(())
    }
}
