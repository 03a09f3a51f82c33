// ==========================================
// 库存洞察引擎 - 领域模型层
// ==========================================
// 职责: 定义快照实体（原始/规范化）与枚举类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod alert;
pub mod movement;
pub mod snapshot;
pub mod stock;
pub mod turnover;
pub mod types;
pub mod valuation;

// 重导出核心类型
pub use alert::{
    Alert, AlertSnapshot, AlertSummary, RawAlertRecord, RawReorderRecommendation,
    ReorderRecommendation,
};
pub use movement::{MovementSnapshot, MovementSummary, RawMovementRecord};
pub use snapshot::{InventorySnapshot, SnapshotBundle};
pub use stock::{RawStockRecord, StockItem, StockSnapshot, StockSummary};
pub use turnover::{RawTurnoverSummary, TurnoverSummary};
pub use types::{
    AbcClass, BenchmarkProfile, BudgetStatus, FocusArea, HealthGrade, PerformanceTier, Priority,
    Severity, StockStatus, UrgencyFilter, UrgencyLevel, ValuationMethod,
};
pub use valuation::{RawValuationRecord, ValuationAggregate, ValuationRecord, ValuationSnapshot};
