//! # 连接作用域
//!
//! 每个处理单元通过 [`ConnectionProvider::acquire`] 获得一个 [`UnitOfWork`]。
//! 工作单元只能通过 [`UnitOfWork::commit`] 提交；提前返回、`?` 传播或 panic
//! 都会丢弃它，底层事务随之回滚，连接归还连接池。

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, warn};

use crate::error::Result;

/// 作用域连接提供者
#[derive(Clone, Debug)]
pub struct ConnectionProvider {
    db: Arc<DatabaseConnection>,
}

impl ConnectionProvider {
    /// 包装共享的数据库连接池
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 底层连接池
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 开启一个工作单元
    pub async fn acquire(&self, label: &'static str) -> Result<UnitOfWork> {
        let txn = self.db.begin().await?;
        debug!(unit = label, "工作单元开始");
        Ok(UnitOfWork { txn, label })
    }

    /// 连接探活
    pub async fn is_active(&self) -> bool {
        match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("数据库探活失败: {}", e);
                false
            }
        }
    }
}

/// 单次请求内的事务作用域
pub struct UnitOfWork {
    txn: DatabaseTransaction,
    label: &'static str,
}

impl UnitOfWork {
    /// 事务连接，供查询与更新使用
    #[must_use]
    pub const fn conn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// 提交并释放连接
    pub async fn commit(self) -> Result<()> {
        let label = self.label;
        self.txn.commit().await?;
        debug!(unit = label, "工作单元提交");
        Ok(())
    }

    /// 显式回滚
    pub async fn rollback(self) -> Result<()> {
        let label = self.label;
        self.txn.rollback().await?;
        debug!(unit = label, "工作单元回滚");
        Ok(())
    }
}
