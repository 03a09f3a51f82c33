// ==========================================
// 库存洞察引擎 - 当前库存快照
// ==========================================
// 职责: 定义外部数据层提供的库存记录（原始/规范化两种形态）
// 红线: 本引擎只读，不修改库存
// ==========================================

use crate::domain::types::StockStatus;
use serde::{Deserialize, Serialize};

/// 原始库存记录（外部数据层提供，字段均可缺失）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStockRecord {
    pub item_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub current_stock: Option<f64>,
    pub unit_cost: Option<f64>,
    pub stock_value: Option<f64>,
    pub stock_status: Option<String>,
    pub reorder_point: Option<f64>,
}

/// 规范化后的库存条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub location: String,
    /// 当前库存数量（非负整数）
    pub current_stock: u64,
    /// current_stock × unit_cost
    pub stock_value: f64,
    pub stock_status: StockStatus,
}

/// 库存状态计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total_items: u64,
    pub out_of_stock: u64,
    pub critical_stock: u64,
    pub low_stock: u64,
    pub overstock: u64,
}

/// 库存快照（规范化）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub items: Vec<StockItem>,
}

impl StockSnapshot {
    pub fn new(items: Vec<StockItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 按库存状态汇总计数
    pub fn summary(&self) -> StockSummary {
        let mut summary = StockSummary {
            total_items: self.items.len() as u64,
            ..StockSummary::default()
        };

        for item in &self.items {
            match item.stock_status {
                StockStatus::OutOfStock => summary.out_of_stock += 1,
                StockStatus::Critical => summary.critical_stock += 1,
                StockStatus::Low => summary.low_stock += 1,
                StockStatus::Overstock => summary.overstock += 1,
                StockStatus::Normal => {}
            }
        }

        summary
    }

    /// 库存总价值
    pub fn total_value(&self) -> f64 {
        self.items.iter().map(|item| item.stock_value).sum()
    }

    /// 库存总数量（饱和累加）
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, item| acc.saturating_add(item.current_stock))
    }
}
