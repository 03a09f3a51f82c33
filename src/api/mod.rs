// ==========================================
// 库存洞察引擎 - API 层
// ==========================================
// 职责: 提供六个洞察操作与统一结果信封
// ==========================================

pub mod dto;
pub mod error;
pub mod insight_api;
pub mod response;

// 重导出核心类型
pub use dto::{
    AbcOptions, AnalyzeHealthOptions, BenchmarkOptions, ReorderOptions, ReportOptions,
    TurnoverOptions,
};
pub use error::{ApiError, ApiResult};
pub use insight_api::InventoryInsightApi;
pub use response::OperationResponse;
