//! # 测试辅助函数

use std::sync::{Arc, Once};

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::MigratorTrait;
use tracing::Level;

use crate::app::AppContext;
use crate::config::AppConfig;

use super::{ApiKeyFixture, UserFixture};

static INIT: Once = Once::new();

/// 初始化测试环境
pub fn init_test_env() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 创建已执行迁移的内存数据库
pub async fn create_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // 内存库只存在于单个连接上
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;

    migration::Migrator::up(&db, None).await?;

    Ok(db)
}

/// 测试用配置
#[must_use]
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "test-secret-key-for-jwt-testing".to_string();
    config
}

/// 基于内存数据库的完整应用上下文
pub async fn create_test_context() -> Result<Arc<AppContext>, DbErr> {
    init_test_env();
    let db = create_test_db().await?;
    let context = AppContext::build(test_config(), db)
        .map_err(|e| DbErr::Custom(format!("构建测试上下文失败: {e}")))?;
    Ok(Arc::new(context))
}

/// 插入用户并返回 uid
pub async fn insert_user<C>(
    db: &C,
    user_name: &str,
    password: &str,
    is_admin: bool,
) -> Result<i32, DbErr>
where
    C: ConnectionTrait,
{
    let mut fixture = UserFixture::new().user_name(user_name).password(password);
    if is_admin {
        fixture = fixture.admin();
    }
    insert_user_fixture(db, fixture).await
}

/// 按 fixture 插入用户
pub async fn insert_user_fixture<C>(db: &C, fixture: UserFixture) -> Result<i32, DbErr>
where
    C: ConnectionTrait,
{
    let result = entity::Users::insert(fixture.to_active_model())
        .exec(db)
        .await?;
    Ok(result.last_insert_id)
}

/// 按 fixture 插入密钥
pub async fn insert_api_key<C>(db: &C, fixture: ApiKeyFixture) -> Result<i32, DbErr>
where
    C: ConnectionTrait,
{
    let result = entity::ApiKeys::insert(fixture.to_active_model())
        .exec(db)
        .await?;
    Ok(result.last_insert_id)
}
