//! # 数据库模块
//!
//! 数据库连接、迁移和启动数据初始化

mod scope;

pub use scope::{ConnectionProvider, UnitOfWork};

use chrono::Utc;
use entity::{users, users::Entity as Users};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set,
};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::{AdminConfig, DatabaseConfig};
use crate::error::Result;

/// 初始化数据库连接
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    info!(
        "正在连接数据库: {}",
        config.url.chars().take(50).collect::<String>()
    );

    // 对于SQLite数据库，确保数据库文件的目录和文件存在
    config.ensure_database_path()?;

    let db = Database::connect(config.connect_options()).await?;

    info!("数据库连接成功");
    Ok(db)
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> std::result::Result<(), DbErr> {
    info!("开始运行数据库迁移...");

    match ::migration::Migrator::up(db, None).await {
        Ok(()) => {
            info!("数据库迁移完成");
            Ok(())
        }
        Err(e) => {
            error!("数据库迁移失败: {}", e);
            Err(e)
        }
    }
}

/// 检查数据库状态
pub async fn check_database_status(db: &DatabaseConnection) -> std::result::Result<usize, DbErr> {
    let pending = ::migration::Migrator::get_pending_migrations(db).await?;

    if pending.is_empty() {
        info!("所有迁移都已应用");
    } else {
        warn!("有 {} 个待应用的迁移", pending.len());
    }

    Ok(pending.len())
}

/// 确保配置中的管理员账户存在
///
/// 已存在同名用户时只提升其管理员标记，不改动密码。
pub async fn ensure_admin_user(db: &DatabaseConnection, admin: &AdminConfig) -> Result<i32> {
    let existing = Users::find()
        .filter(users::Column::UserName.eq(admin.user_name.as_str()))
        .one(db)
        .await?;

    if let Some(user) = existing {
        if user.is_admin {
            info!(uid = user.uid, "管理员账户已存在");
            return Ok(user.uid);
        }
        let uid = user.uid;
        let mut active: users::ActiveModel = user.into();
        active.is_admin = Set(true);
        active.update(db).await?;
        warn!(uid, "已有同名普通用户，提升为管理员");
        return Ok(uid);
    }

    let created = users::ActiveModel {
        user_name: Set(admin.user_name.clone()),
        password: Set(admin.password.clone()),
        is_admin: Set(true),
        ak_num: Set(0),
        delete_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(uid = created.uid, at = %Utc::now().naive_utc(), "管理员账户创建完成");
    Ok(created.uid)
}
