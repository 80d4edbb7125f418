//! # LLM Portal Library
//!
//! 用户账户与 API 密钥生命周期服务的核心库，附带 LLM 提示词构建工具

pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod management;
pub mod prompt;
#[doc(hidden)]
pub mod testing;

// Re-export commonly used types
pub use app::AppContext;
pub use config::AppConfig;
pub use error::{PortalError, Result};
