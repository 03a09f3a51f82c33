// ==========================================
// 库存洞察引擎 - 核心库
// ==========================================
// 系统定位: 决策支持系统（只读快照 → 运营信号）
// 输出: 健康分 / ABC 分类 / 周转分层 / 补货计划 / 问题建议 / 绩效对标
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 快照实体与类型
pub mod domain;

// 引擎层 - 纯计算规则
pub mod engine;

// 导入层 - 本地快照文件
pub mod importer;

// 配置层 - 策略配置
pub mod config;

// 数据库基础设施（策略配置库）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 对外操作
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AbcClass, BenchmarkProfile, BudgetStatus, FocusArea, HealthGrade, PerformanceTier, Priority,
    Severity, StockStatus, UrgencyFilter, UrgencyLevel, ValuationMethod,
};

// 快照
pub use domain::{InventorySnapshot, SnapshotBundle};

// 引擎
pub use engine::{
    AbcClassifier, BenchmarkEngine, FullInsightReport, HealthScorer, InsightEngine,
    InsightOrchestrator, ReorderPlanner, SnapshotNormalizer, SnapshotSource, StaticSnapshotSource,
    TurnoverClassifier,
};

// API
pub use api::{ApiError, ApiResult, InventoryInsightApi, OperationResponse, ReportOptions};

// 配置
pub use config::{ConfigManager, PolicyConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存洞察引擎";
