//! # 应用层

pub mod context;

pub use context::AppContext;
