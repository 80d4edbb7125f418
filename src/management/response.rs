//! # API 响应结构
//!
//! 所有接口共用的 `{code, status, message, data?}` 信封。业务失败同样以 HTTP 200
//! 返回，仅通过 `code=1` 区分。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{BusinessError, PortalError};

/// 成功码
pub const SUCCESS_CODE: i32 = 0;
/// 业务失败码
pub const ERROR_CODE: i32 = 1;

const STATUS_SUCCESS: &str = "success";
const STATUS_ERROR: &str = "error";

/// # 标准响应信封
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardResponse<T = serde_json::Value> {
    /// 0 表示成功，1 表示失败
    pub code: i32,
    /// `success` 或 `error`
    pub status: String,
    /// 提示信息
    pub message: String,
    /// 业务数据，无数据时省略
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> StandardResponse<T> {
    /// 带数据的成功响应
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: SUCCESS_CODE,
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// 失败响应
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: ERROR_CODE,
            status: STATUS_ERROR.to_string(),
            message: message.into(),
            data: None,
        }
    }
}

impl StandardResponse<()> {
    /// 无数据的成功响应
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: SUCCESS_CODE,
            status: STATUS_SUCCESS.to_string(),
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for StandardResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        match self.root() {
            Self::Business(err) => {
                debug!(kind = err.kind(), "业务拒绝: {}", err);
                StandardResponse::<()>::error(err.to_string()).into_response()
            }
            Self::Auth { message, .. } => {
                debug!("令牌校验失败: {}", message);
                (
                    StatusCode::UNAUTHORIZED,
                    Json(StandardResponse::<()>::error(
                        BusinessError::TokenInvalid.to_string(),
                    )),
                )
                    .into_response()
            }
            _ => {
                error!(error = ?self, "请求处理失败");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(StandardResponse::<()>::error("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}
