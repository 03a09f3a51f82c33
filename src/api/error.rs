// ==========================================
// 库存洞察引擎 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把各层错误转换为可读的失败原因
// 口径: 错误码集中在 ApiError::code 一处映射
// ==========================================

use crate::config::error::ConfigError;
use crate::engine::normalize::NormalizeError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 边界校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 快照错误
    // ==========================================
    #[error("快照结构错误: {0}")]
    MalformedSnapshot(String),

    #[error("快照获取失败: {0}")]
    SnapshotSourceError(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl ApiError {
    /// 稳定错误码（供调用方分支处理）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::MalformedSnapshot(_) => "MALFORMED_SNAPSHOT",
            ApiError::SnapshotSourceError(_) => "SNAPSHOT_SOURCE_ERROR",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
        }
    }
}

// ==========================================
// 从各层错误转换
// ==========================================
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidPolicy { field, message } => {
                ApiError::ValidationError(format!("策略配置 {} 非法: {}", field, message))
            }
            other => ApiError::ConfigError(other.to_string()),
        }
    }
}

impl From<NormalizeError> for ApiError {
    fn from(err: NormalizeError) -> Self {
        ApiError::MalformedSnapshot(err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
