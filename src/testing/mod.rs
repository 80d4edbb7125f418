//! # 测试框架模块
//!
//! 提供测试工具、fixtures 和测试辅助函数，单元测试与 `tests/` 集成测试共用

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
