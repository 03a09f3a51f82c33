// ==========================================
// 库存洞察引擎 - 快照集合
// ==========================================
// 职责: 组合五类快照
// - SnapshotBundle: 外部数据层交付的原始形态（可整体缺失）
// - InventorySnapshot: 规范化后的形态（引擎只接受此形态）
// ==========================================

use crate::domain::alert::{AlertSnapshot, RawAlertRecord};
use crate::domain::movement::{MovementSnapshot, RawMovementRecord};
use crate::domain::stock::{RawStockRecord, StockSnapshot};
use crate::domain::turnover::{RawTurnoverSummary, TurnoverSummary};
use crate::domain::types::ValuationMethod;
use crate::domain::valuation::{RawValuationRecord, ValuationSnapshot};
use serde::{Deserialize, Serialize};

/// 原始快照集合
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotBundle {
    pub stock: Vec<RawStockRecord>,
    pub movements: Vec<RawMovementRecord>,
    pub turnover: Option<RawTurnoverSummary>,
    pub valuation_method: Option<String>,
    pub valuation: Vec<RawValuationRecord>,
    pub alerts: Vec<RawAlertRecord>,
}

/// 规范化快照集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub stock: StockSnapshot,
    pub movements: MovementSnapshot,
    /// 外部提供的周转汇总；缺失时由周转分类引擎派生
    pub turnover: Option<TurnoverSummary>,
    pub valuation: ValuationSnapshot,
    pub alerts: AlertSnapshot,
}

impl InventorySnapshot {
    pub fn valuation_method(&self) -> ValuationMethod {
        self.valuation.method
    }
}
