//! # 配置管理模块
//!
//! 处理应用配置加载、环境变量覆盖和验证

mod app_config;
mod database;

pub use app_config::{AdminConfig, AppConfig, AuthConfig, KeyPolicyConfig, ServerConfig};
pub use database::DatabaseConfig;

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Context, PortalError, Result};

/// 环境变量覆盖前缀，例如 `LLM_PORTAL_SERVER_PORT` -> `server.port`
pub const ENV_PREFIX: &str = "LLM_PORTAL_";

/// 配置文件路径解析：显式路径 > `LLM_PORTAL_CONFIG_PATH` > `config/config.{RUST_ENV}.toml`
#[must_use]
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = env::var("LLM_PORTAL_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    PathBuf::from(format!("config/config.{env}.toml"))
}

/// 加载配置文件，应用环境变量覆盖并验证
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let config_file = resolve_config_path(explicit);

    let mut config = if config_file.exists() {
        let content = std::fs::read_to_string(&config_file)
            .with_context(|| format!("读取配置文件失败: {}", config_file.display()))?;
        parse_config(&content)?
    } else {
        warn!("配置文件不存在: {}, 使用默认配置", config_file.display());
        AppConfig::default()
    };

    let overrides = collect_env_overrides(env::vars());
    apply_env_overrides(&mut config, &overrides)?;

    config.validate().map_err(PortalError::config)?;
    info!("配置加载完成: {}", config_file.display());
    Ok(config)
}

/// 从 TOML 文本解析配置
pub fn parse_config(content: &str) -> Result<AppConfig> {
    Ok(toml::from_str(content)?)
}

/// 收集以 `LLM_PORTAL_` 开头的环境变量
///
/// 第一个下划线分隔段落与字段：`LLM_PORTAL_AUTH_JWT_SECRET` -> `auth.jwt_secret`
pub fn collect_env_overrides<I>(vars: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut overrides = HashMap::new();
    for (key, value) in vars {
        let Some(config_key) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        if config_key == "CONFIG_PATH" {
            continue;
        }
        if let Some((section, field)) = config_key.to_lowercase().split_once('_') {
            overrides.insert(format!("{section}.{field}"), value);
        }
    }

    debug!("发现 {} 个环境变量覆盖", overrides.len());
    overrides
}

/// 应用环境变量覆盖
pub fn apply_env_overrides(
    config: &mut AppConfig,
    overrides: &HashMap<String, String>,
) -> Result<()> {
    for (path, value) in overrides {
        debug!(
            "应用环境变量覆盖: {} = {}",
            path,
            if path.contains("password") || path.contains("secret") {
                "***"
            } else {
                value
            }
        );
        apply_override(config, path, value)?;
    }
    Ok(())
}

fn parse_value<T>(path: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .map_err(|e| PortalError::config_with_source(format!("无效的配置值 {path}={value}"), e))
}

fn apply_override(config: &mut AppConfig, path: &str, value: &str) -> Result<()> {
    match path {
        "server.bind_address" => config.server.bind_address = value.to_string(),
        "server.port" => config.server.port = parse_value(path, value)?,
        "server.api_prefix" => config.server.api_prefix = value.to_string(),
        "server.enable_cors" => config.server.enable_cors = parse_value(path, value)?,
        "database.url" => config.database.url = value.to_string(),
        "database.max_connections" => {
            config.database.max_connections = parse_value(path, value)?;
        }
        "auth.jwt_secret" => config.auth.jwt_secret = value.to_string(),
        "auth.token_expires_in" => config.auth.token_expires_in = parse_value(path, value)?,
        "auth.issuer" => config.auth.issuer = value.to_string(),
        "keys.max_per_user" => config.keys.max_per_user = parse_value(path, value)?,
        "keys.ttl_days" => config.keys.ttl_days = parse_value(path, value)?,
        "admin.user_name" => {
            config.admin.get_or_insert_with(AdminConfig::default).user_name = value.to_string();
        }
        "admin.password" => {
            config.admin.get_or_insert_with(AdminConfig::default).password = value.to_string();
        }
        _ => warn!("未知的环境变量覆盖: {}", path),
    }
    Ok(())
}
