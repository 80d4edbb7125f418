//! # 业务错误
//!
//! 请求处理中可预期的业务拒绝。对外统一以 `code=1` 的响应返回，
//! 内部保留具体类别便于日志与测试区分。

use thiserror::Error;

/// 业务规则失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessError {
    /// 用户名已被注册
    #[error("User already exist")]
    UserExists,

    /// 用户不存在或密码错误，两种情况刻意不做区分
    #[error("User not exist or password incorrect")]
    InvalidCredentials,

    /// 调用者无权操作目标用户
    #[error("No permission")]
    NoPermission,

    /// 令牌指向的用户不存在
    #[error("Token invalid")]
    TokenInvalid,

    /// 存活密钥数量已达上限
    #[error("You can only generate {max} api keys at most")]
    KeyQuotaExceeded {
        /// 每个用户的密钥上限
        max: u64,
    },

    /// 未找到匹配的存活密钥
    #[error("Key not exist")]
    KeyNotFound,
}

impl BusinessError {
    /// 日志中使用的稳定标识
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UserExists => "conflict",
            Self::InvalidCredentials => "authentication",
            Self::NoPermission => "authorization",
            Self::TokenInvalid | Self::KeyNotFound => "not_found",
            Self::KeyQuotaExceeded { .. } => "quota",
        }
    }
}
