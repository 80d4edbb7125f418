//! # LLM Portal 主程序

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use llm_portal::{AppContext, config, database, logging, management};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "llm-portal", version, about = "User accounts and API key service")]
struct Args {
    /// 配置文件路径
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// 日志级别 (`RUST_LOG` 优先)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_level.as_deref());

    if let Err(e) = run(args).await {
        error!("服务启动失败: {e:?}");
        return Err(e);
    }

    info!("服务正常关闭");
    Ok(())
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = config::load_config(args.config.as_deref()).context("配置加载失败")?;

    let db = database::init_database(&config.database)
        .await
        .context("数据库连接失败")?;
    database::run_migrations(&db)
        .await
        .context("数据库迁移失败")?;
    database::check_database_status(&db)
        .await
        .context("数据库状态检查失败")?;

    if let Some(admin) = &config.admin {
        database::ensure_admin_user(&db, admin)
            .await
            .context("管理员账户初始化失败")?;
    }

    let context = AppContext::build(config, db).context("应用上下文初始化失败")?;
    info!("服务启动");
    management::serve(Arc::new(context)).await?;
    Ok(())
}
