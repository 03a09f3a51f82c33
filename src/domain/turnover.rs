// ==========================================
// 库存洞察引擎 - 周转汇总
// ==========================================
// 职责: 周转汇总口径（外部提供或由周转分类引擎派生）
// ==========================================

use serde::{Deserialize, Serialize};

/// 原始周转汇总（外部数据层提供时使用）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTurnoverSummary {
    pub average_turnover: Option<f64>,
    pub fast_moving_count: Option<u64>,
    pub slow_moving_count: Option<u64>,
    pub dead_stock_count: Option<u64>,
    pub slow_moving_value: Option<f64>,
    pub dead_stock_value: Option<f64>,
}

/// 周转汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnoverSummary {
    pub average_turnover: f64,
    pub fast_moving_count: u64,
    pub slow_moving_count: u64,
    pub dead_stock_count: u64,
    pub slow_moving_value: f64,
    pub dead_stock_value: f64,
}

impl TurnoverSummary {
    /// 优化潜力 = 呆滞价值 + 慢周转价值
    pub fn optimization_potential(&self) -> f64 {
        self.dead_stock_value + self.slow_moving_value
    }
}
