// ==========================================
// 库存洞察引擎 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("策略配置非法 ({field}): {message}")]
    InvalidPolicy { field: String, message: String },

    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    #[error("配置库错误: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("配置 JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),
}
