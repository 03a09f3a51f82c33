// ==========================================
// 库存洞察引擎 - 出入库流水汇总
// ==========================================
// 职责: 定义观察窗口内的单品出入库汇总
// 口径: 周转率 = 年化出库量 / 平均在库量
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始出入库汇总（外部数据层提供，字段均可缺失）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMovementRecord {
    pub item_id: Option<String>,
    pub inbound_quantity: Option<f64>,
    pub inbound_value: Option<f64>,
    pub outbound_quantity: Option<f64>,
    pub outbound_value: Option<f64>,
    pub outbound_revenue: Option<f64>,
    pub net_movement: Option<f64>,
    pub adjustment_quantity: Option<f64>,
    pub window_days: Option<u32>,
}

/// 规范化后的单品出入库汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementSummary {
    pub item_id: String,
    pub inbound_quantity: f64,
    pub inbound_value: f64,
    pub outbound_quantity: f64,
    /// 出库成本
    pub outbound_value: f64,
    /// 出库收入（缺失时等于出库成本，即零毛利）
    pub outbound_revenue: f64,
    /// 净变动 = 入库 - 出库（外部未提供时按此计算）
    pub net_movement: f64,
    /// 窗口内盘点调整数量（绝对值）
    pub adjustment_quantity: f64,
    /// 观察窗口（天）
    pub window_days: u32,
}

impl MovementSummary {
    /// 无流水记录
    pub fn empty(item_id: &str, window_days: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            inbound_quantity: 0.0,
            inbound_value: 0.0,
            outbound_quantity: 0.0,
            outbound_value: 0.0,
            outbound_revenue: 0.0,
            net_movement: 0.0,
            adjustment_quantity: 0.0,
            window_days,
        }
    }

    /// 窗口内日均出库量
    pub fn daily_usage(&self) -> f64 {
        if self.window_days == 0 {
            return 0.0;
        }
        self.outbound_quantity / self.window_days as f64
    }

    /// 年化系数 (365 / 窗口天数)
    pub fn annual_factor(&self) -> f64 {
        if self.window_days == 0 {
            return 0.0;
        }
        365.0 / self.window_days as f64
    }
}

/// 出入库快照（规范化）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementSnapshot {
    pub movements: Vec<MovementSummary>,
}

impl MovementSnapshot {
    pub fn new(movements: Vec<MovementSummary>) -> Self {
        Self { movements }
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// 按 item_id 建立索引
    pub fn by_item(&self) -> HashMap<&str, &MovementSummary> {
        self.movements
            .iter()
            .map(|m| (m.item_id.as_str(), m))
            .collect()
    }

    pub fn total_outbound_value(&self) -> f64 {
        self.movements.iter().map(|m| m.outbound_value).sum()
    }

    pub fn total_outbound_revenue(&self) -> f64 {
        self.movements.iter().map(|m| m.outbound_revenue).sum()
    }

    pub fn total_adjustment_quantity(&self) -> f64 {
        self.movements.iter().map(|m| m.adjustment_quantity).sum()
    }
}
