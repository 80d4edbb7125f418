//! # 错误类型定义

use thiserror::Error;

use super::BusinessError;

/// 应用主要错误类型
#[derive(Debug, Error)]
pub enum PortalError {
    /// 配置相关错误
    #[error("配置错误: {message}")]
    Config {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("数据库错误: {message}")]
    Database {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 令牌缺失、无效或过期
    #[error("认证错误: {message}")]
    Auth {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 业务规则拒绝
    #[error(transparent)]
    Business(#[from] BusinessError),

    /// 系统内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO相关错误
    #[error("IO错误: {message}")]
    Io {
        /// 错误描述
        message: String,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },

    /// 附加上下文的错误
    #[error("{context}: {source}")]
    Context {
        /// 附加的上下文说明
        context: String,
        /// 被包装的错误
        #[source]
        source: Box<PortalError>,
    },
}

impl PortalError {
    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的数据库错误
    pub fn database_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建认证错误
    pub fn auth<T: Into<String>>(message: T) -> Self {
        Self::Auth {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的认证错误
    pub fn auth_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Auth {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 剥离上下文后的根错误
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// 若根错误为业务错误则返回之
    #[must_use]
    pub fn as_business(&self) -> Option<&BusinessError> {
        match self.root() {
            Self::Business(err) => Some(err),
            _ => None,
        }
    }
}

// 自动转换常见错误类型
impl From<std::io::Error> for PortalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: "文件操作失败".to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for PortalError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML解析失败", err)
    }
}

impl From<sea_orm::error::DbErr> for PortalError {
    fn from(err: sea_orm::error::DbErr) -> Self {
        Self::database_with_source("数据库操作失败", err)
    }
}

// JWT错误转换
impl From<jsonwebtoken::errors::Error> for PortalError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::auth_with_source("JWT处理失败", err)
    }
}
