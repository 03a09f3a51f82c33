// ==========================================
// 库存洞察引擎 - 周转分类引擎
// ==========================================
// 职责: 计算物料周转率/可用天数，划分 fast / slow / dead
// 输入: StockSnapshot + MovementSnapshot + 观察窗口
// 输出: TurnoverClassification（总体指标 + 品类汇总 + 物料明细）
// ==========================================
// 口径:
// - 年化系数 = 365 / window_days
// - 期初库存 = max(current - net_movement, 0)
// - 平均在库 = (期初 + 期末) / 2；为 0 且有出库时按 1 计
// - 周转率 = 年化出库量 / 平均在库
// - 可用天数 = current / 日均出库；无出库取哨兵值
// - 分层: 出库为 0 → dead；周转率 < 阈值 → slow；否则 fast
// ==========================================

use crate::config::policy::TurnoverPolicy;
use crate::domain::movement::{MovementSnapshot, MovementSummary};
use crate::domain::stock::{StockItem, StockSnapshot};
use crate::domain::turnover::TurnoverSummary;
use crate::domain::types::PerformanceTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// 单物料周转明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub current_stock: u64,
    pub stock_value: f64,
    pub outbound_quantity: f64,
    pub outbound_value: f64,
    pub average_on_hand: f64,
    pub daily_usage: f64,
    pub turnover_rate: f64,
    pub days_of_stock: f64,
    pub tier: PerformanceTier,
}

/// 总体周转指标
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnoverOverallMetrics {
    pub total_items: u64,
    pub average_turnover: f64,
    pub fast_moving_count: u64,
    pub slow_moving_count: u64,
    pub dead_stock_count: u64,
    pub fast_moving_value: f64,
    pub slow_moving_value: f64,
    pub dead_stock_value: f64,
    pub total_value: f64,
    pub optimization_potential: f64,
}

/// 品类周转汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTurnover {
    pub category: String,
    pub item_count: u64,
    pub average_turnover: f64,
    pub fast_moving_count: u64,
    pub slow_moving_count: u64,
    pub dead_stock_count: u64,
    pub total_value: f64,
}

/// 周转分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverClassification {
    pub period_days: u32,
    pub overall_metrics: TurnoverOverallMetrics,
    pub category_summary: Vec<CategoryTurnover>,
    pub items: Vec<TurnoverItem>,
}

impl TurnoverClassification {
    /// 折算为周转汇总（供健康分/洞察在上游缺失周转快照时使用）
    pub fn to_summary(&self) -> TurnoverSummary {
        let m = &self.overall_metrics;
        TurnoverSummary {
            average_turnover: m.average_turnover,
            fast_moving_count: m.fast_moving_count,
            slow_moving_count: m.slow_moving_count,
            dead_stock_count: m.dead_stock_count,
            slow_moving_value: m.slow_moving_value,
            dead_stock_value: m.dead_stock_value,
        }
    }
}

// ==========================================
// TurnoverClassifier - 周转分类引擎
// ==========================================
pub struct TurnoverClassifier {
    policy: TurnoverPolicy,
}

impl TurnoverClassifier {
    pub fn new(policy: TurnoverPolicy) -> Self {
        Self { policy }
    }

    /// 执行周转分类
    ///
    /// # 参数
    /// - stock: 库存快照
    /// - movements: 出入库汇总快照（缺失物料按零出入库处理）
    /// - period_days: 观察窗口天数
    ///
    /// # 返回
    /// TurnoverClassification，物料按 item_id 升序
    #[instrument(skip(self, stock, movements), fields(items = stock.items.len(), movements = movements.movements.len()))]
    pub fn classify(
        &self,
        stock: &StockSnapshot,
        movements: &MovementSnapshot,
        period_days: u32,
    ) -> TurnoverClassification {
        let by_item = movements.by_item();

        let mut items: Vec<TurnoverItem> = stock
            .items
            .iter()
            .map(|item| match by_item.get(item.item_id.as_str()) {
                Some(movement) => self.classify_item(item, movement),
                None => self.classify_item(item, &MovementSummary::empty(&item.item_id, period_days)),
            })
            .collect();
        items.sort_by(|a, b| a.item_id.cmp(&b.item_id));

        let overall_metrics = Self::overall(&items);
        let category_summary = Self::by_category(&items);

        tracing::debug!(
            fast = overall_metrics.fast_moving_count,
            slow = overall_metrics.slow_moving_count,
            dead = overall_metrics.dead_stock_count,
            "周转分类完成"
        );

        TurnoverClassification {
            period_days,
            overall_metrics,
            category_summary,
            items,
        }
    }

    fn classify_item(&self, item: &StockItem, movement: &MovementSummary) -> TurnoverItem {
        let current = item.current_stock as f64;
        let outbound = movement.outbound_quantity;

        let opening = (current - movement.net_movement).max(0.0);
        let average_on_hand = (opening + current) / 2.0;
        let denominator = if average_on_hand <= 0.0 && outbound > 0.0 {
            1.0
        } else {
            average_on_hand
        };

        let turnover_rate = if denominator > 0.0 {
            outbound * movement.annual_factor() / denominator
        } else {
            0.0
        };

        let daily_usage = movement.daily_usage();
        let days_of_stock = if daily_usage > 0.0 {
            current / daily_usage
        } else {
            self.policy.days_of_stock_sentinel
        };

        let tier = if outbound <= 0.0 {
            PerformanceTier::Dead
        } else if turnover_rate < self.policy.low_turnover_threshold {
            PerformanceTier::Slow
        } else {
            PerformanceTier::Fast
        };

        TurnoverItem {
            item_id: item.item_id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            current_stock: item.current_stock,
            stock_value: item.stock_value,
            outbound_quantity: outbound,
            outbound_value: movement.outbound_value,
            average_on_hand,
            daily_usage,
            turnover_rate,
            days_of_stock,
            tier,
        }
    }

    fn overall(items: &[TurnoverItem]) -> TurnoverOverallMetrics {
        let mut m = TurnoverOverallMetrics {
            total_items: items.len() as u64,
            ..TurnoverOverallMetrics::default()
        };

        let mut turnover_sum = 0.0;
        for item in items {
            turnover_sum += item.turnover_rate;
            m.total_value += item.stock_value;
            match item.tier {
                PerformanceTier::Fast => {
                    m.fast_moving_count += 1;
                    m.fast_moving_value += item.stock_value;
                }
                PerformanceTier::Slow => {
                    m.slow_moving_count += 1;
                    m.slow_moving_value += item.stock_value;
                }
                PerformanceTier::Dead => {
                    m.dead_stock_count += 1;
                    m.dead_stock_value += item.stock_value;
                }
            }
        }

        if !items.is_empty() {
            m.average_turnover = turnover_sum / items.len() as f64;
        }
        m.optimization_potential = m.dead_stock_value + m.slow_moving_value;
        m
    }

    fn by_category(items: &[TurnoverItem]) -> Vec<CategoryTurnover> {
        let mut groups: BTreeMap<&str, Vec<&TurnoverItem>> = BTreeMap::new();
        for item in items {
            groups.entry(item.category.as_str()).or_default().push(item);
        }

        groups
            .into_iter()
            .map(|(category, members)| {
                let count = members.len() as u64;
                let turnover_sum: f64 = members.iter().map(|i| i.turnover_rate).sum();
                let tier_count =
                    |tier: PerformanceTier| members.iter().filter(|i| i.tier == tier).count() as u64;

                CategoryTurnover {
                    category: category.to_string(),
                    item_count: count,
                    average_turnover: turnover_sum / count as f64,
                    fast_moving_count: tier_count(PerformanceTier::Fast),
                    slow_moving_count: tier_count(PerformanceTier::Slow),
                    dead_stock_count: tier_count(PerformanceTier::Dead),
                    total_value: members.iter().map(|i| i.stock_value).sum(),
                }
            })
            .collect()
    }
}

impl Default for TurnoverClassifier {
    fn default() -> Self {
        Self::new(TurnoverPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::StockStatus;

    fn stock_item(id: &str, current: u64) -> StockItem {
        StockItem {
            item_id: id.to_string(),
            name: id.to_string(),
            category: "general".to_string(),
            location: "WH1".to_string(),
            current_stock: current,
            stock_value: current as f64 * 10.0,
            stock_status: StockStatus::Normal,
        }
    }

    #[test]
    fn test_turnover_formula() {
        // 365 天窗口出库 120，净变动 0，平均在库 20 → 周转 6
        let stock = StockSnapshot::new(vec![stock_item("SKU-1", 20)]);
        let mut movement = MovementSummary::empty("SKU-1", 365);
        movement.outbound_quantity = 120.0;
        movement.inbound_quantity = 120.0;

        let result = TurnoverClassifier::default().classify(
            &stock,
            &MovementSnapshot::new(vec![movement]),
            365,
        );

        let item = &result.items[0];
        assert!((item.turnover_rate - 6.0).abs() < 1e-9);
        assert_eq!(item.tier, PerformanceTier::Fast);
        assert!((item.days_of_stock - 20.0 / (120.0 / 365.0)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_on_hand_with_outbound_uses_unit_floor() {
        // 期初 0 期末 0，但窗口内有出库（进多少出多少）
        let stock = StockSnapshot::new(vec![stock_item("SKU-1", 0)]);
        let mut movement = MovementSummary::empty("SKU-1", 365);
        movement.inbound_quantity = 5.0;
        movement.outbound_quantity = 5.0;

        let result = TurnoverClassifier::default().classify(
            &stock,
            &MovementSnapshot::new(vec![movement]),
            365,
        );
        assert!((result.items[0].turnover_rate - 5.0).abs() < 1e-9);
        assert_eq!(result.items[0].tier, PerformanceTier::Slow);
    }

    #[test]
    fn test_category_rollup_sorted() {
        let mut a = stock_item("SKU-1", 10);
        a.category = "tools".to_string();
        let mut b = stock_item("SKU-2", 10);
        b.category = "parts".to_string();

        let result = TurnoverClassifier::default().classify(
            &StockSnapshot::new(vec![a, b]),
            &MovementSnapshot::default(),
            90,
        );

        assert_eq!(result.category_summary[0].category, "parts");
        assert_eq!(result.category_summary[1].category, "tools");
        assert_eq!(result.overall_metrics.dead_stock_count, 2);
        assert_eq!(result.to_summary().dead_stock_value, 200.0);
    }
}
