// ==========================================
// 库存洞察引擎 - 操作结果信封
// ==========================================
// 格式: {success, data | error, error_code}
// 红线: 单个操作失败只体现在自身信封，不中断批量报告
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl<T> OperationResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_code: None,
        }
    }

    pub fn failure(err: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            error_code: Some(err.code().to_string()),
        }
    }

    /// 把操作结果包装为信封（失败时记录 warn 日志）
    pub fn from_result(operation: &str, result: ApiResult<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => {
                tracing::warn!(operation = operation, code = err.code(), error = %err, "操作失败");
                Self::failure(&err)
            }
        }
    }
}
