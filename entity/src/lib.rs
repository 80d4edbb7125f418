//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod api_keys;
pub mod llms;
pub mod sessions;
pub mod users;

pub use api_keys::Entity as ApiKeys;
pub use llms::Entity as Llms;
pub use sessions::Entity as Sessions;
pub use users::Entity as Users;
