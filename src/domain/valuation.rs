// ==========================================
// 库存洞察引擎 - 库存估值快照
// ==========================================
// 职责: 定义单品估值记录及分类/库位汇总
// 说明: 计价方法（平均/先进先出/后进先出）由外部数据层计算
// ==========================================

use crate::domain::types::ValuationMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 原始估值记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawValuationRecord {
    pub item_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub quantity: Option<f64>,
    pub total_value: Option<f64>,
}

/// 规范化后的估值记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecord {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub quantity: f64,
    pub total_value: f64,
}

/// 分组估值汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationAggregate {
    pub key: String,
    pub item_count: u64,
    pub total_value: f64,
    /// 占总估值百分比
    pub value_percentage: f64,
}

/// 估值快照（规范化）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationSnapshot {
    pub method: ValuationMethod,
    pub records: Vec<ValuationRecord>,
}

impl ValuationSnapshot {
    pub fn new(method: ValuationMethod, records: Vec<ValuationRecord>) -> Self {
        Self { method, records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_value(&self) -> f64 {
        self.records.iter().map(|r| r.total_value).sum()
    }

    /// 按分类汇总（按分类名排序）
    pub fn aggregate_by_category(&self) -> Vec<ValuationAggregate> {
        self.aggregate_by(|r| r.category.as_str())
    }

    /// 按库位汇总（按库位名排序）
    pub fn aggregate_by_location(&self) -> Vec<ValuationAggregate> {
        self.aggregate_by(|r| r.location.as_str())
    }

    fn aggregate_by<F>(&self, key_of: F) -> Vec<ValuationAggregate>
    where
        F: Fn(&ValuationRecord) -> &str,
    {
        let total = self.total_value();
        let mut groups: BTreeMap<&str, (u64, f64)> = BTreeMap::new();

        for record in &self.records {
            let entry = groups.entry(key_of(record)).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += record.total_value;
        }

        groups
            .into_iter()
            .map(|(key, (item_count, total_value))| ValuationAggregate {
                key: key.to_string(),
                item_count,
                total_value,
                value_percentage: if total > 0.0 {
                    total_value / total * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }
}
