//! # 业务服务层
//!
//! 处理器只负责提取参数与包装响应，业务规则集中在此处。每个操作在一个
//! [`UnitOfWork`](crate::database::UnitOfWork) 内完成。

pub mod api_keys;
pub mod users;

pub use api_keys::{ApiKeyItem, ApiKeyList, ApiKeysService, GeneratedApiKey, generate_key_secret};
pub use users::{Credentials, LoginResponse, UsersService};
