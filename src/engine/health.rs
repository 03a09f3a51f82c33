// ==========================================
// 库存洞察引擎 - 健康评分引擎
// ==========================================
// 职责: 按加权扣分计算库存健康分 (0-100)
// 输入: 库存状态计数 + 周转分层计数 + 紧急预警计数
// 输出: HealthScore（分值 + 等级 + 扣分明细）
// ==========================================
// 口径: 从 100 起扣，结果钳制到 [0, 100]；缺失输入按 0 计
// ==========================================

use crate::config::policy::HealthWeights;
use crate::domain::alert::AlertSummary;
use crate::domain::stock::StockSummary;
use crate::domain::turnover::TurnoverSummary;
use crate::domain::types::HealthGrade;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 健康分起点
pub const MAX_HEALTH_SCORE: u8 = 100;

// ==========================================
// HealthInputs - 评分输入计数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInputs {
    pub out_of_stock: u64,
    pub critical_stock: u64,
    pub low_stock: u64,
    pub overstock: u64,
    pub dead_stock: u64,
    pub slow_moving: u64,
    pub critical_alerts: u64,
}

impl HealthInputs {
    /// 从三份汇总组装输入（周转/预警缺失按 0 计）
    pub fn from_summaries(
        stock: &StockSummary,
        turnover: Option<&TurnoverSummary>,
        alerts: Option<&AlertSummary>,
    ) -> Self {
        Self {
            out_of_stock: stock.out_of_stock,
            critical_stock: stock.critical_stock,
            low_stock: stock.low_stock,
            overstock: stock.overstock,
            dead_stock: turnover.map(|t| t.dead_stock_count).unwrap_or(0),
            slow_moving: turnover.map(|t| t.slow_moving_count).unwrap_or(0),
            critical_alerts: alerts.map(|a| a.critical_count).unwrap_or(0),
        }
    }
}

/// 单项扣分明细
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDeduction {
    pub factor: String,
    pub count: u64,
    pub weight: u32,
    pub points: u64,
}

/// 健康评分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u8,
    pub grade: HealthGrade,
    pub deductions: Vec<HealthDeduction>,
}

// ==========================================
// HealthScorer - 健康评分引擎
// ==========================================
pub struct HealthScorer {
    weights: HealthWeights,
}

impl HealthScorer {
    pub fn new(weights: HealthWeights) -> Self {
        Self { weights }
    }

    /// 计算健康分
    ///
    /// # 参数
    /// - inputs: 各类问题物料计数
    ///
    /// # 返回
    /// HealthScore，score ∈ [0, 100]
    #[instrument(skip(self), fields(out_of_stock = inputs.out_of_stock, critical_alerts = inputs.critical_alerts))]
    pub fn score(&self, inputs: &HealthInputs) -> HealthScore {
        let w = &self.weights;
        let factors = [
            ("out_of_stock", inputs.out_of_stock, w.out_of_stock),
            ("critical_stock", inputs.critical_stock, w.critical_stock),
            ("low_stock", inputs.low_stock, w.low_stock),
            ("overstock", inputs.overstock, w.overstock),
            ("dead_stock", inputs.dead_stock, w.dead_stock),
            ("slow_moving", inputs.slow_moving, w.slow_moving),
            ("critical_alert", inputs.critical_alerts, w.critical_alert),
        ];

        let mut total: u64 = 0;
        let mut deductions = Vec::new();
        for (factor, count, weight) in factors {
            let points = count.saturating_mul(weight as u64);
            if points == 0 {
                continue;
            }
            total = total.saturating_add(points);
            deductions.push(HealthDeduction {
                factor: factor.to_string(),
                count,
                weight,
                points,
            });
        }

        let score = (MAX_HEALTH_SCORE as u64).saturating_sub(total) as u8;

        tracing::debug!(score = score, deducted = total, "健康分计算完成");

        HealthScore {
            score,
            grade: HealthGrade::from_score(score),
            deductions,
        }
    }
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new(HealthWeights::default())
    }
}
