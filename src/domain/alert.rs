// ==========================================
// 库存洞察引擎 - 补货预警
// ==========================================
// 职责: 定义外部数据层派生的补货预警与补货建议
// 红线: 预警由外部生成，本引擎只消费
// ==========================================

use crate::domain::types::{UrgencyFilter, UrgencyLevel};
use serde::{Deserialize, Serialize};

/// 原始补货建议
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawReorderRecommendation {
    pub should_reorder_now: Option<bool>,
    pub recommended_quantity: Option<f64>,
    pub estimated_cost: Option<f64>,
}

/// 原始预警记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAlertRecord {
    pub item_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub urgency_level: Option<String>,
    pub current_stock: Option<f64>,
    pub reorder_point: Option<f64>,
    pub days_until_stockout: Option<f64>,
    pub daily_usage: Option<f64>,
    pub reorder_recommendation: Option<RawReorderRecommendation>,
}

/// 补货建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    pub should_reorder_now: bool,
    pub recommended_quantity: u64,
    pub estimated_cost: f64,
}

impl Default for ReorderRecommendation {
    fn default() -> Self {
        Self {
            should_reorder_now: false,
            recommended_quantity: 0,
            estimated_cost: 0.0,
        }
    }
}

/// 规范化后的预警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub urgency_level: UrgencyLevel,
    pub current_stock: u64,
    pub reorder_point: u64,
    pub days_until_stockout: f64,
    pub daily_usage: f64,
    pub reorder_recommendation: ReorderRecommendation,
}

impl Alert {
    /// 当前库存是否已低于（含等于）再订货点
    pub fn is_below_reorder_point(&self) -> bool {
        self.current_stock <= self.reorder_point
    }
}

/// 预警计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub total: u64,
    pub critical_count: u64,
    pub high_count: u64,
    pub medium_count: u64,
}

/// 预警快照（规范化）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertSnapshot {
    pub alerts: Vec<Alert>,
}

impl AlertSnapshot {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts }
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// 按过滤条件裁剪预警
    ///
    /// - critical: 紧急等级为 critical
    /// - low: 当前库存 ≤ 再订货点
    /// - reorder: 建议立即补货
    pub fn filtered(&self, filter: UrgencyFilter) -> AlertSnapshot {
        let alerts = self
            .alerts
            .iter()
            .filter(|alert| match filter {
                UrgencyFilter::All => true,
                UrgencyFilter::Critical => alert.urgency_level == UrgencyLevel::Critical,
                UrgencyFilter::Low => alert.is_below_reorder_point(),
                UrgencyFilter::Reorder => alert.reorder_recommendation.should_reorder_now,
            })
            .cloned()
            .collect();
        AlertSnapshot::new(alerts)
    }

    pub fn summary(&self) -> AlertSummary {
        let mut summary = AlertSummary {
            total: self.alerts.len() as u64,
            ..AlertSummary::default()
        };

        for alert in &self.alerts {
            match alert.urgency_level {
                UrgencyLevel::Critical => summary.critical_count += 1,
                UrgencyLevel::High => summary.high_count += 1,
                UrgencyLevel::Medium => summary.medium_count += 1,
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(id: &str, urgency: UrgencyLevel, stock: u64, reorder_now: bool) -> Alert {
        Alert {
            item_id: id.to_string(),
            name: id.to_string(),
            category: "general".to_string(),
            location: "WH1".to_string(),
            urgency_level: urgency,
            current_stock: stock,
            reorder_point: 10,
            days_until_stockout: 5.0,
            daily_usage: 1.0,
            reorder_recommendation: ReorderRecommendation {
                should_reorder_now: reorder_now,
                ..ReorderRecommendation::default()
            },
        }
    }

    #[test]
    fn test_filtered_by_urgency_filter() {
        let snapshot = AlertSnapshot::new(vec![
            alert("A", UrgencyLevel::Critical, 20, false),
            alert("B", UrgencyLevel::High, 10, true),
            alert("C", UrgencyLevel::Medium, 30, false),
        ]);

        assert_eq!(snapshot.filtered(UrgencyFilter::All).alerts.len(), 3);
        assert_eq!(snapshot.filtered(UrgencyFilter::Critical).alerts[0].item_id, "A");
        assert_eq!(snapshot.filtered(UrgencyFilter::Low).alerts[0].item_id, "B");
        assert_eq!(snapshot.filtered(UrgencyFilter::Reorder).alerts.len(), 1);
    }

    #[test]
    fn test_summary_counts() {
        let snapshot = AlertSnapshot::new(vec![
            alert("A", UrgencyLevel::Critical, 0, true),
            alert("B", UrgencyLevel::Critical, 0, true),
            alert("C", UrgencyLevel::Medium, 0, false),
        ]);
        let summary = snapshot.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.critical_count, 2);
        assert_eq!(summary.high_count, 0);
    }
}
