// ==========================================
// 库存洞察引擎 - 快照规范化
// ==========================================
// 职责: 原始快照 → 规范化快照（所有缺省值在此一处决定）
// 红线: 缺失数据不报错，统一落为中性默认值；仅结构性错误（缺主键）报错
// ==========================================
// 默认值口径:
// - 缺失数值 → 0；负数/非有限数 → 0（warn 日志）
// - 缺失 stock_value → current_stock × unit_cost
// - 缺失/未知 stock_status → 按再订货点推导，否则 normal
// - 缺失 urgency_level → medium；缺失补货建议 → 不补货
// - 缺失观察窗口 → 调用方给定的 period_days
// - 缺失 outbound_revenue → 等于 outbound_value（零毛利）
// - 数量取整为 u64，超出上限时饱和为 u64::MAX（warn 日志）
// - 同一物料多条出入库记录 → 按物料合并累加，窗口取首条
// ==========================================

use crate::domain::alert::{Alert, AlertSnapshot, RawAlertRecord, ReorderRecommendation};
use crate::domain::movement::{MovementSnapshot, MovementSummary, RawMovementRecord};
use crate::domain::snapshot::{InventorySnapshot, SnapshotBundle};
use crate::domain::stock::{RawStockRecord, StockItem, StockSnapshot};
use crate::domain::turnover::{RawTurnoverSummary, TurnoverSummary};
use crate::domain::types::{StockStatus, UrgencyLevel, ValuationMethod};
use crate::domain::valuation::{RawValuationRecord, ValuationRecord, ValuationSnapshot};
use std::collections::HashMap;
use thiserror::Error;
use tracing::instrument;

/// 规范化错误（快照结构性损坏）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("快照结构错误: {snapshot}[{index}] 缺少 item_id")]
    MissingItemId { snapshot: &'static str, index: usize },
}

// ==========================================
// SnapshotNormalizer - 快照规范化器
// ==========================================
pub struct SnapshotNormalizer {
    /// 缺失观察窗口时使用的默认天数
    default_window_days: u32,
}

impl SnapshotNormalizer {
    pub fn new(default_window_days: u32) -> Self {
        Self {
            default_window_days,
        }
    }

    /// 规范化完整快照集合
    #[instrument(skip(self, bundle), fields(
        stock = bundle.stock.len(),
        movements = bundle.movements.len(),
        valuation = bundle.valuation.len(),
        alerts = bundle.alerts.len()
    ))]
    pub fn normalize(&self, bundle: &SnapshotBundle) -> Result<InventorySnapshot, NormalizeError> {
        let method = bundle
            .valuation_method
            .as_deref()
            .and_then(|m| m.parse::<ValuationMethod>().ok())
            .unwrap_or_default();

        Ok(InventorySnapshot {
            stock: self.normalize_stock(&bundle.stock)?,
            movements: self.normalize_movements(&bundle.movements)?,
            turnover: bundle.turnover.as_ref().map(|t| self.normalize_turnover(t)),
            valuation: self.normalize_valuation(method, &bundle.valuation)?,
            alerts: self.normalize_alerts(&bundle.alerts)?,
        })
    }

    pub fn normalize_stock(&self, records: &[RawStockRecord]) -> Result<StockSnapshot, NormalizeError> {
        let mut items = Vec::with_capacity(records.len());

        for (index, raw) in records.iter().enumerate() {
            let item_id = require_id(raw.item_id.as_deref(), "stock", index)?;
            let current_stock = quantity(raw.current_stock, "current_stock", &item_id);
            let unit_cost = non_negative(raw.unit_cost, "unit_cost", &item_id);
            let stock_value = match raw.stock_value {
                Some(_) => non_negative(raw.stock_value, "stock_value", &item_id),
                None => current_stock as f64 * unit_cost,
            };

            let stock_status = match raw.stock_status.as_deref().map(str::parse::<StockStatus>) {
                Some(Ok(status)) => status,
                other => {
                    if let Some(Err(msg)) = other {
                        tracing::warn!(item_id = %item_id, "{}，按库存推导状态", msg);
                    }
                    derive_stock_status(current_stock, raw.reorder_point)
                }
            };

            items.push(StockItem {
                name: text_or(raw.name.as_deref(), &item_id),
                category: text_or(raw.category.as_deref(), "uncategorized"),
                location: text_or(raw.location.as_deref(), "unassigned"),
                item_id,
                current_stock,
                stock_value,
                stock_status,
            });
        }

        Ok(StockSnapshot::new(items))
    }

    pub fn normalize_movements(
        &self,
        records: &[RawMovementRecord],
    ) -> Result<MovementSnapshot, NormalizeError> {
        let mut movements: Vec<MovementSummary> = Vec::with_capacity(records.len());
        let mut positions: HashMap<String, usize> = HashMap::new();

        for (index, raw) in records.iter().enumerate() {
            let item_id = require_id(raw.item_id.as_deref(), "movements", index)?;
            let inbound_quantity = non_negative(raw.inbound_quantity, "inbound_quantity", &item_id);
            let outbound_quantity = non_negative(raw.outbound_quantity, "outbound_quantity", &item_id);
            let outbound_value = non_negative(raw.outbound_value, "outbound_value", &item_id);

            // 净变动允许为负，仅过滤非有限数
            let net_movement = match raw.net_movement {
                Some(v) if v.is_finite() => v,
                _ => inbound_quantity - outbound_quantity,
            };
            let outbound_revenue = match raw.outbound_revenue {
                Some(_) => non_negative(raw.outbound_revenue, "outbound_revenue", &item_id),
                None => outbound_value,
            };
            let window_days = match raw.window_days {
                Some(days) if days > 0 => days,
                _ => self.default_window_days,
            };

            let summary = MovementSummary {
                inbound_value: non_negative(raw.inbound_value, "inbound_value", &item_id),
                adjustment_quantity: raw
                    .adjustment_quantity
                    .filter(|v| v.is_finite())
                    .map(f64::abs)
                    .unwrap_or(0.0),
                item_id,
                inbound_quantity,
                outbound_quantity,
                outbound_value,
                outbound_revenue,
                net_movement,
                window_days,
            };

            match positions.get(&summary.item_id) {
                Some(&pos) => merge_movement(&mut movements[pos], &summary, index),
                None => {
                    positions.insert(summary.item_id.clone(), movements.len());
                    movements.push(summary);
                }
            }
        }

        Ok(MovementSnapshot::new(movements))
    }

    pub fn normalize_valuation(
        &self,
        method: ValuationMethod,
        records: &[RawValuationRecord],
    ) -> Result<ValuationSnapshot, NormalizeError> {
        let mut normalized = Vec::with_capacity(records.len());

        for (index, raw) in records.iter().enumerate() {
            let item_id = require_id(raw.item_id.as_deref(), "valuation", index)?;
            normalized.push(ValuationRecord {
                name: text_or(raw.name.as_deref(), &item_id),
                category: text_or(raw.category.as_deref(), "uncategorized"),
                location: text_or(raw.location.as_deref(), "unassigned"),
                quantity: non_negative(raw.quantity, "quantity", &item_id),
                total_value: non_negative(raw.total_value, "total_value", &item_id),
                item_id,
            });
        }

        Ok(ValuationSnapshot::new(method, normalized))
    }

    pub fn normalize_alerts(&self, records: &[RawAlertRecord]) -> Result<AlertSnapshot, NormalizeError> {
        let mut alerts = Vec::with_capacity(records.len());

        for (index, raw) in records.iter().enumerate() {
            let item_id = require_id(raw.item_id.as_deref(), "alerts", index)?;

            let urgency_level = match raw.urgency_level.as_deref().map(str::parse::<UrgencyLevel>) {
                Some(Ok(level)) => level,
                Some(Err(msg)) => {
                    tracing::warn!(item_id = %item_id, "{}，按 medium 处理", msg);
                    UrgencyLevel::Medium
                }
                None => UrgencyLevel::Medium,
            };

            let reorder_recommendation = match &raw.reorder_recommendation {
                Some(rec) => ReorderRecommendation {
                    should_reorder_now: rec.should_reorder_now.unwrap_or(false),
                    recommended_quantity: quantity(
                        rec.recommended_quantity,
                        "recommended_quantity",
                        &item_id,
                    ),
                    estimated_cost: non_negative(rec.estimated_cost, "estimated_cost", &item_id),
                },
                None => ReorderRecommendation::default(),
            };

            alerts.push(Alert {
                name: text_or(raw.name.as_deref(), &item_id),
                category: text_or(raw.category.as_deref(), "uncategorized"),
                location: text_or(raw.location.as_deref(), "unassigned"),
                urgency_level,
                current_stock: quantity(raw.current_stock, "current_stock", &item_id),
                reorder_point: quantity(raw.reorder_point, "reorder_point", &item_id),
                days_until_stockout: non_negative(raw.days_until_stockout, "days_until_stockout", &item_id),
                daily_usage: non_negative(raw.daily_usage, "daily_usage", &item_id),
                reorder_recommendation,
                item_id,
            });
        }

        Ok(AlertSnapshot::new(alerts))
    }

    pub fn normalize_turnover(&self, raw: &RawTurnoverSummary) -> TurnoverSummary {
        TurnoverSummary {
            average_turnover: non_negative(raw.average_turnover, "average_turnover", "turnover"),
            fast_moving_count: raw.fast_moving_count.unwrap_or(0),
            slow_moving_count: raw.slow_moving_count.unwrap_or(0),
            dead_stock_count: raw.dead_stock_count.unwrap_or(0),
            slow_moving_value: non_negative(raw.slow_moving_value, "slow_moving_value", "turnover"),
            dead_stock_value: non_negative(raw.dead_stock_value, "dead_stock_value", "turnover"),
        }
    }
}

// ==========================================
// 内部辅助函数
// ==========================================

fn require_id(raw: Option<&str>, snapshot: &'static str, index: usize) -> Result<String, NormalizeError> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(NormalizeError::MissingItemId { snapshot, index }),
    }
}

fn non_negative(value: Option<f64>, field: &str, item_id: &str) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        Some(v) => {
            tracing::warn!(item_id = %item_id, field = field, value = v, "数值非法，按 0 处理");
            0.0
        }
        None => 0.0,
    }
}

/// 非负数量取整；超出 u64 上限时饱和
fn quantity(value: Option<f64>, field: &str, item_id: &str) -> u64 {
    let v = non_negative(value, field, item_id).round();
    if v >= u64::MAX as f64 {
        tracing::warn!(item_id = %item_id, field = field, value = v, "数量超出上限，按 u64::MAX 处理");
        return u64::MAX;
    }
    v as u64
}

/// 同一物料的重复出入库记录累加到首条
fn merge_movement(target: &mut MovementSummary, extra: &MovementSummary, index: usize) {
    if target.window_days != extra.window_days {
        tracing::warn!(
            item_id = %target.item_id,
            index = index,
            kept = target.window_days,
            dropped = extra.window_days,
            "重复出入库记录观察窗口不一致，沿用首条窗口"
        );
    } else {
        tracing::debug!(item_id = %target.item_id, index = index, "合并重复出入库记录");
    }

    target.inbound_quantity += extra.inbound_quantity;
    target.inbound_value += extra.inbound_value;
    target.outbound_quantity += extra.outbound_quantity;
    target.outbound_value += extra.outbound_value;
    target.outbound_revenue += extra.outbound_revenue;
    target.net_movement += extra.net_movement;
    target.adjustment_quantity += extra.adjustment_quantity;
}

fn text_or(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// 外部未提供状态时按库存与再订货点推导
fn derive_stock_status(current_stock: u64, reorder_point: Option<f64>) -> StockStatus {
    if current_stock == 0 {
        return StockStatus::OutOfStock;
    }
    match reorder_point {
        Some(rp) if rp.is_finite() && rp > 0.0 => {
            let stock = current_stock as f64;
            if stock <= rp * 0.5 {
                StockStatus::Critical
            } else if stock <= rp {
                StockStatus::Low
            } else {
                StockStatus::Normal
            }
        }
        _ => StockStatus::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::RawReorderRecommendation;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let normalizer = SnapshotNormalizer::new(30);
        let stock = normalizer
            .normalize_stock(&[RawStockRecord {
                item_id: Some("SKU-1".to_string()),
                current_stock: Some(10.0),
                unit_cost: Some(2.5),
                ..RawStockRecord::default()
            }])
            .unwrap();

        let item = &stock.items[0];
        assert_eq!(item.current_stock, 10);
        assert_eq!(item.stock_value, 25.0);
        assert_eq!(item.stock_status, StockStatus::Normal);
        assert_eq!(item.category, "uncategorized");
        assert_eq!(item.name, "SKU-1");
    }

    #[test]
    fn test_negative_values_clamped() {
        let normalizer = SnapshotNormalizer::new(30);
        let stock = normalizer
            .normalize_stock(&[RawStockRecord {
                item_id: Some("SKU-1".to_string()),
                current_stock: Some(-4.0),
                stock_value: Some(f64::NAN),
                stock_status: Some("low".to_string()),
                ..RawStockRecord::default()
            }])
            .unwrap();

        assert_eq!(stock.items[0].current_stock, 0);
        assert_eq!(stock.items[0].stock_value, 0.0);
        assert_eq!(stock.items[0].stock_status, StockStatus::Low);
    }

    #[test]
    fn test_status_derived_from_reorder_point() {
        assert_eq!(derive_stock_status(0, Some(10.0)), StockStatus::OutOfStock);
        assert_eq!(derive_stock_status(4, Some(10.0)), StockStatus::Critical);
        assert_eq!(derive_stock_status(8, Some(10.0)), StockStatus::Low);
        assert_eq!(derive_stock_status(20, Some(10.0)), StockStatus::Normal);
        assert_eq!(derive_stock_status(20, None), StockStatus::Normal);
    }

    #[test]
    fn test_missing_item_id_is_malformed() {
        let normalizer = SnapshotNormalizer::new(30);
        let err = normalizer
            .normalize_alerts(&[RawAlertRecord::default()])
            .unwrap_err();
        assert_eq!(
            err,
            NormalizeError::MissingItemId {
                snapshot: "alerts",
                index: 0
            }
        );
    }

    #[test]
    fn test_movement_defaults() {
        let normalizer = SnapshotNormalizer::new(90);
        let movements = normalizer
            .normalize_movements(&[RawMovementRecord {
                item_id: Some("SKU-1".to_string()),
                inbound_quantity: Some(50.0),
                outbound_quantity: Some(20.0),
                outbound_value: Some(200.0),
                adjustment_quantity: Some(-3.0),
                ..RawMovementRecord::default()
            }])
            .unwrap();

        let m = &movements.movements[0];
        assert_eq!(m.window_days, 90);
        assert_eq!(m.net_movement, 30.0);
        assert_eq!(m.outbound_revenue, 200.0);
        assert_eq!(m.adjustment_quantity, 3.0);
    }

    #[test]
    fn test_duplicate_movements_merged_per_item() {
        let normalizer = SnapshotNormalizer::new(90);
        let movements = normalizer
            .normalize_movements(&[
                RawMovementRecord {
                    item_id: Some("SKU-1".to_string()),
                    outbound_quantity: Some(20.0),
                    outbound_value: Some(200.0),
                    adjustment_quantity: Some(2.0),
                    ..RawMovementRecord::default()
                },
                RawMovementRecord {
                    item_id: Some("SKU-2".to_string()),
                    outbound_quantity: Some(5.0),
                    ..RawMovementRecord::default()
                },
                RawMovementRecord {
                    item_id: Some(" SKU-1 ".to_string()),
                    inbound_quantity: Some(10.0),
                    outbound_quantity: Some(30.0),
                    outbound_value: Some(300.0),
                    adjustment_quantity: Some(-1.0),
                    ..RawMovementRecord::default()
                },
            ])
            .unwrap();

        assert_eq!(movements.movements.len(), 2);
        let by_item = movements.by_item();
        let merged = by_item["SKU-1"];
        assert_eq!(merged.outbound_quantity, 50.0);
        assert_eq!(merged.outbound_value, 500.0);
        assert_eq!(merged.inbound_quantity, 10.0);
        assert_eq!(merged.net_movement, -40.0);
        assert_eq!(merged.adjustment_quantity, 3.0);
        assert_eq!(merged.window_days, 90);

        // 按物料索引与全量汇总口径一致
        assert_eq!(movements.total_outbound_value(), 500.0);
        assert_eq!(movements.total_adjustment_quantity(), 3.0);
    }

    #[test]
    fn test_huge_quantity_saturates() {
        let normalizer = SnapshotNormalizer::new(30);
        let stock = normalizer
            .normalize_stock(&[RawStockRecord {
                item_id: Some("SKU-1".to_string()),
                current_stock: Some(1e20),
                ..RawStockRecord::default()
            }])
            .unwrap();
        assert_eq!(stock.items[0].current_stock, u64::MAX);
        assert_eq!(quantity(Some(12.6), "current_stock", "SKU-1"), 13);
    }

    #[test]
    fn test_alert_defaults() {
        let normalizer = SnapshotNormalizer::new(30);
        let alerts = normalizer
            .normalize_alerts(&[
                RawAlertRecord {
                    item_id: Some("SKU-1".to_string()),
                    urgency_level: Some("urgent!!".to_string()),
                    ..RawAlertRecord::default()
                },
                RawAlertRecord {
                    item_id: Some("SKU-2".to_string()),
                    urgency_level: Some("CRITICAL".to_string()),
                    reorder_recommendation: Some(RawReorderRecommendation {
                        should_reorder_now: Some(true),
                        recommended_quantity: Some(12.4),
                        estimated_cost: Some(120.0),
                    }),
                    ..RawAlertRecord::default()
                },
            ])
            .unwrap();

        assert_eq!(alerts.alerts[0].urgency_level, UrgencyLevel::Medium);
        assert!(!alerts.alerts[0].reorder_recommendation.should_reorder_now);
        assert_eq!(alerts.alerts[1].urgency_level, UrgencyLevel::Critical);
        assert_eq!(alerts.alerts[1].reorder_recommendation.recommended_quantity, 12);
    }

    #[test]
    fn test_bundle_valuation_method() {
        let normalizer = SnapshotNormalizer::new(30);
        let bundle = SnapshotBundle {
            valuation_method: Some("lifo".to_string()),
            ..SnapshotBundle::default()
        };
        let snapshot = normalizer.normalize(&bundle).unwrap();
        assert_eq!(snapshot.valuation_method(), ValuationMethod::Lifo);
        assert!(snapshot.turnover.is_none());
    }
}
