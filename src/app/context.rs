//! 应用上下文（DI 容器）
//!
//! 统一持有跨模块共享的配置、连接提供者与令牌编解码器，便于在测试中注入内存数据库。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::database::ConnectionProvider;
use crate::error::Result;

/// 请求处理共享的依赖
#[derive(Clone)]
pub struct AppContext {
    /// 已校验的应用配置
    pub config: Arc<AppConfig>,
    /// 数据库连接提供者
    pub db: ConnectionProvider,
    /// 令牌编解码器
    pub tokens: Arc<TokenCodec>,
}

impl AppContext {
    /// 由已构建好的各部件组装上下文
    #[must_use]
    pub const fn new(
        config: Arc<AppConfig>,
        db: ConnectionProvider,
        tokens: Arc<TokenCodec>,
    ) -> Self {
        Self { config, db, tokens }
    }

    /// 由配置和已建立的数据库连接组装上下文
    pub fn build(config: AppConfig, db: DatabaseConnection) -> Result<Self> {
        let tokens = TokenCodec::new(&config.auth)?;
        Ok(Self::new(
            Arc::new(config),
            ConnectionProvider::new(Arc::new(db)),
            Arc::new(tokens),
        ))
    }
}
