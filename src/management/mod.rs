//! # 管理API模块
//!
//! 用户注册登录与 API 密钥管理的 HTTP 接口

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod services;

pub use response::StandardResponse;
pub use routes::create_routes;
pub use server::{AppState, create_router, serve};
