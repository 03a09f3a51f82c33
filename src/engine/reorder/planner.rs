use super::plan::{BudgetOptimization, Order, ReorderPlan};
use crate::domain::alert::AlertSnapshot;
use crate::domain::types::BudgetStatus;
use std::cmp::Ordering;
use tracing::instrument;

/// 金额比较容差（半分）
const MONEY_EPSILON: f64 = 0.005;

// ==========================================
// ReorderPlanner - 补货计划引擎
// ==========================================
pub struct ReorderPlanner {
    // 无状态引擎
}

impl ReorderPlanner {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成补货计划
    ///
    /// # 参数
    /// - alerts: 预警快照（已规范化，已按过滤条件裁剪）
    /// - budget_limit: 预算上限；None 表示不限预算
    ///
    /// # 返回
    /// ReorderPlan
    ///
    /// # 说明
    /// - 预算合法性（非负、有限）由 API 层校验
    /// - 总成本 ≤ 预算时不做分配
    /// - 金额比较带 MONEY_EPSILON 容差
    #[instrument(skip(self, alerts), fields(alerts = alerts.alerts.len()))]
    pub fn plan(&self, alerts: &AlertSnapshot, budget_limit: Option<f64>) -> ReorderPlan {
        // 步骤1: 选择需立即补货的预警
        let mut items_to_reorder: Vec<Order> = alerts
            .alerts
            .iter()
            .filter(|alert| alert.reorder_recommendation.should_reorder_now)
            .map(Order::from_alert)
            .collect();
        items_to_reorder.sort_by(Self::urgency_then_stockout);

        let total_cost: f64 = items_to_reorder.iter().map(|o| o.estimated_cost).sum();

        let (priority_orders, regular_orders): (Vec<Order>, Vec<Order>) = items_to_reorder
            .iter()
            .cloned()
            .partition(|o| o.urgency_level.is_priority());

        // 步骤2: 预算检查
        let (budget_status, budget_optimization) = match budget_limit {
            Some(budget) if total_cost > budget + MONEY_EPSILON => (
                BudgetStatus::OverBudget,
                Some(self.allocate(&items_to_reorder, budget)),
            ),
            _ => (BudgetStatus::WithinBudget, None),
        };

        tracing::debug!(
            orders = items_to_reorder.len(),
            total_cost = total_cost,
            over_budget = budget_optimization.is_some(),
            "补货计划生成完成"
        );

        ReorderPlan {
            items_to_reorder,
            total_cost,
            priority_orders,
            regular_orders,
            budget_status,
            budget_optimization,
        }
    }

    /// 步骤3: 贪心分配（仅超预算时）
    ///
    /// 排序: 紧急等级 → 成本降序 → item_id；
    /// 剩余预算够则接受，不够则顺延，不拆单
    fn allocate(&self, orders: &[Order], budget: f64) -> BudgetOptimization {
        let mut candidates: Vec<&Order> = orders.iter().collect();
        candidates.sort_by(|a, b| {
            a.urgency_level
                .rank()
                .cmp(&b.urgency_level.rank())
                .then_with(|| {
                    b.estimated_cost
                        .partial_cmp(&a.estimated_cost)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        let mut remaining = budget;
        let mut optimized_orders = Vec::new();
        let mut deferred_orders = Vec::new();

        for order in candidates {
            if order.estimated_cost <= remaining + MONEY_EPSILON {
                remaining = (remaining - order.estimated_cost).max(0.0);
                optimized_orders.push(order.clone());
            } else {
                tracing::debug!(
                    item_id = %order.item_id,
                    cost = order.estimated_cost,
                    remaining = remaining,
                    "预算不足，订单顺延"
                );
                deferred_orders.push(order.clone());
            }
        }

        let allocated_cost: f64 = optimized_orders.iter().map(|o| o.estimated_cost).sum();

        BudgetOptimization {
            budget_limit: budget,
            deferred_count: deferred_orders.len() as u64,
            optimized_orders,
            allocated_cost,
            deferred_orders,
            remaining_budget: remaining,
        }
    }

    fn urgency_then_stockout(a: &Order, b: &Order) -> Ordering {
        a.urgency_level
            .rank()
            .cmp(&b.urgency_level.rank())
            .then_with(|| {
                a.days_until_stockout
                    .partial_cmp(&b.days_until_stockout)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.item_id.cmp(&b.item_id))
    }
}

impl Default for ReorderPlanner {
    fn default() -> Self {
        Self::new()
    }
}
