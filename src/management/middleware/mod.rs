//! # 管理服务器中间件

pub mod auth;

pub use auth::{AuthContext, auth};
