//! # 数据库配置

use std::path::Path;
use std::time::Duration;

use sea_orm::ConnectOptions;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PortalError, Result};

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 数据库URL
    pub url: String,
    /// 最大连接数
    pub max_connections: u32,
    /// 连接超时时间（秒）
    pub connect_timeout: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/llm_portal.db".to_string(),
            max_connections: 10,
            connect_timeout: 30,
        }
    }
}

impl DatabaseConfig {
    /// 确保数据库路径存在（仅对SQLite文件数据库）
    pub fn ensure_database_path(&self) -> Result<()> {
        if self.is_sqlite() && !self.is_memory_database() {
            let path_str = self
                .url
                .strip_prefix("sqlite://")
                .or_else(|| self.url.strip_prefix("sqlite:"))
                .unwrap_or(&self.url);
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            let db_path = Path::new(path_str);

            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        PortalError::config_with_source(
                            format!("无法创建数据库目录: {}", parent.display()),
                            e,
                        )
                    })?;
                    info!("创建数据库目录: {}", parent.display());
                }
            }

            if !db_path.exists() {
                std::fs::File::create(db_path).map_err(|e| {
                    PortalError::config_with_source(
                        format!("无法创建数据库文件: {}", db_path.display()),
                        e,
                    )
                })?;
                info!("数据库文件创建成功: {}", db_path.display());
            }
        }

        Ok(())
    }

    /// 连接选项
    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        // 内存数据库每个连接都是独立的库，只能使用单连接
        let max_connections = if self.is_memory_database() {
            1
        } else {
            self.max_connections
        };
        options
            .max_connections(max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout))
            .sqlx_logging(false);
        options
    }

    /// 检查是否为内存数据库
    #[must_use]
    pub fn is_memory_database(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// 检查是否为SQLite数据库
    #[must_use]
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}
