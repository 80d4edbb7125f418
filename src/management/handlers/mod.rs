//! # API处理器模块

pub mod health;
pub mod keys;
pub mod users;
