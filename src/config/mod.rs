// ==========================================
// 库存洞察引擎 - 配置层
// ==========================================
// 职责: 策略配置（阈值/权重/对标表）管理,支持库内覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod policy;
pub mod policy_reader;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager};
pub use error::ConfigError;
pub use policy::{
    AbcBreakpoints, BenchmarkPolicy, BenchmarkTable, HealthWeights, InsightPolicy, PolicyConfig,
    TurnoverPolicy,
};
pub use policy_reader::PolicyConfigReader;
