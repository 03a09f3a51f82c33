use crate::domain::alert::Alert;
use crate::domain::types::{BudgetStatus, UrgencyLevel};
use serde::{Deserialize, Serialize};

// ==========================================
// Order - 补货订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub urgency_level: UrgencyLevel,
    pub current_stock: u64,
    pub reorder_point: u64,
    pub days_until_stockout: f64,
    pub recommended_quantity: u64,
    pub estimated_cost: f64,
}

impl Order {
    pub fn from_alert(alert: &Alert) -> Self {
        Self {
            item_id: alert.item_id.clone(),
            name: alert.name.clone(),
            category: alert.category.clone(),
            location: alert.location.clone(),
            urgency_level: alert.urgency_level,
            current_stock: alert.current_stock,
            reorder_point: alert.reorder_point,
            days_until_stockout: alert.days_until_stockout,
            recommended_quantity: alert.reorder_recommendation.recommended_quantity,
            estimated_cost: alert.reorder_recommendation.estimated_cost,
        }
    }
}

// ==========================================
// BudgetOptimization - 超预算时的贪心分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOptimization {
    pub budget_limit: f64,
    /// 按分配顺序排列
    pub optimized_orders: Vec<Order>,
    pub allocated_cost: f64,
    pub deferred_orders: Vec<Order>,
    pub deferred_count: u64,
    pub remaining_budget: f64,
}

// ==========================================
// ReorderPlan - 补货计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderPlan {
    pub items_to_reorder: Vec<Order>,
    pub total_cost: f64,
    pub priority_orders: Vec<Order>,
    pub regular_orders: Vec<Order>,
    pub budget_status: BudgetStatus,
    pub budget_optimization: Option<BudgetOptimization>,
}

impl ReorderPlan {
    pub fn order_count(&self) -> usize {
        self.items_to_reorder.len()
    }

    /// 实际可执行的采购金额（超预算时取分配金额）
    pub fn committed_cost(&self) -> f64 {
        match &self.budget_optimization {
            Some(opt) => opt.allocated_cost,
            None => self.total_cost,
        }
    }
}
