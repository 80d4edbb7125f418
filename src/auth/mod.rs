//! # 认证授权模块
//!
//! 提供令牌编解码 (`TokenCodec`) 以及请求头解析工具。请求级的鉴权守卫位于
//! `management::middleware::auth`，此处只负责令牌本身。

pub mod jwt;
pub mod types;
pub mod utils;

pub use jwt::TokenCodec;
pub use types::JwtClaims;
pub use utils::extract_bearer_token;
