// ==========================================
// 库存洞察引擎 - 引擎层
// ==========================================
// 职责: 纯计算规则引擎（规范化 / 健康分 / ABC / 周转 / 补货 / 洞察 / 对标）
// 红线: 引擎无状态、无 I/O；同一输入必须产出同一结果
// ==========================================

pub mod abc;
pub mod benchmark;
pub mod health;
pub mod insight;
pub mod normalize;
pub mod orchestrator;
pub mod reorder;
pub mod turnover;

// 重导出核心引擎
pub use abc::{AbcBucket, AbcClassification, AbcClassifier, AbcItem};
pub use benchmark::{
    BenchmarkEngine, BenchmarkInputs, BenchmarkReport, KpiSet, MetricDirection, PerformanceGap,
};
pub use health::{HealthDeduction, HealthInputs, HealthScore, HealthScorer};
pub use insight::{
    HealthAnalysis, HealthSummary, InsightEngine, InsightInputs, Issue, Opportunity,
    OptimizationOpportunities, Recommendation,
};
pub use normalize::{NormalizeError, SnapshotNormalizer};
pub use orchestrator::{FullInsightReport, InsightOrchestrator, SnapshotSource, StaticSnapshotSource};
pub use reorder::{BudgetOptimization, Order, ReorderPlan, ReorderPlanner};
pub use turnover::{
    CategoryTurnover, TurnoverClassification, TurnoverClassifier, TurnoverItem,
    TurnoverOverallMetrics,
};
