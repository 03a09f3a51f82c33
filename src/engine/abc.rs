// ==========================================
// 库存洞察引擎 - ABC 分类引擎
// ==========================================
// 职责: 按价值累计占比将物料划分为 A/B/C 三类
// 输入: ValuationSnapshot
// 输出: AbcClassification（三个分桶 + 价值集中度）
// ==========================================
// 排序: total_value 降序 → item_id 升序
// 分界: 累计占比（含当前物料）≤ a_max_pct → A，≤ b_max_pct → B，其余 C
// 退化: 总价值为 0 → 全部 C，占比 0
// ==========================================

use crate::config::policy::AbcBreakpoints;
use crate::domain::types::AbcClass;
use crate::domain::valuation::{ValuationRecord, ValuationSnapshot};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

/// 累计占比比较容差（避免 79.99999 与 80 的浮点误判）
const SHARE_EPSILON: f64 = 1e-9;

/// 分桶内的单个物料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub total_value: f64,
    pub value_percentage: f64,
    pub cumulative_percentage: f64,
}

/// 单个分类桶
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcBucket {
    pub class: AbcClass,
    pub count: u64,
    pub value_total: f64,
    pub value_percentage: f64,
    pub items: Vec<AbcItem>,
}

impl AbcBucket {
    fn empty(class: AbcClass) -> Self {
        Self {
            class,
            count: 0,
            value_total: 0.0,
            value_percentage: 0.0,
            items: Vec::new(),
        }
    }

    fn push(&mut self, item: AbcItem) {
        self.count += 1;
        self.value_total += item.total_value;
        self.value_percentage += item.value_percentage;
        self.items.push(item);
    }
}

/// ABC 分类结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcClassification {
    pub a_class: AbcBucket,
    pub b_class: AbcBucket,
    pub c_class: AbcBucket,
    /// A 类价值占比（%）
    pub inventory_concentration: f64,
    pub total_value: f64,
}

impl AbcClassification {
    pub fn bucket(&self, class: AbcClass) -> &AbcBucket {
        match class {
            AbcClass::A => &self.a_class,
            AbcClass::B => &self.b_class,
            AbcClass::C => &self.c_class,
        }
    }
}

// ==========================================
// AbcClassifier - ABC 分类引擎
// ==========================================
pub struct AbcClassifier {
    breakpoints: AbcBreakpoints,
}

impl AbcClassifier {
    pub fn new(breakpoints: AbcBreakpoints) -> Self {
        Self { breakpoints }
    }

    /// 执行 ABC 分类
    ///
    /// # 参数
    /// - valuation: 估值快照（已规范化）
    ///
    /// # 返回
    /// AbcClassification，三个分桶占比之和为 100（总价值为 0 时为 0）
    #[instrument(skip(self, valuation), fields(count = valuation.records.len(), method = ?valuation.method))]
    pub fn classify(&self, valuation: &ValuationSnapshot) -> AbcClassification {
        let mut ranked: Vec<&ValuationRecord> = valuation.records.iter().collect();
        ranked.sort_by(|a, b| {
            b.total_value
                .partial_cmp(&a.total_value)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        let total_value: f64 = ranked.iter().map(|r| r.total_value).sum();

        let mut a_class = AbcBucket::empty(AbcClass::A);
        let mut b_class = AbcBucket::empty(AbcClass::B);
        let mut c_class = AbcBucket::empty(AbcClass::C);

        let mut cumulative = 0.0;
        for record in ranked {
            let (share, class) = if total_value > 0.0 {
                let share = record.total_value / total_value * 100.0;
                cumulative += share;
                (share, self.class_for(cumulative))
            } else {
                (0.0, AbcClass::C)
            };

            let item = AbcItem {
                item_id: record.item_id.clone(),
                name: record.name.clone(),
                category: record.category.clone(),
                total_value: record.total_value,
                value_percentage: share,
                cumulative_percentage: cumulative,
            };

            match class {
                AbcClass::A => a_class.push(item),
                AbcClass::B => b_class.push(item),
                AbcClass::C => c_class.push(item),
            }
        }

        tracing::debug!(
            a = a_class.count,
            b = b_class.count,
            c = c_class.count,
            total_value = total_value,
            "ABC 分类完成"
        );

        AbcClassification {
            inventory_concentration: a_class.value_percentage,
            a_class,
            b_class,
            c_class,
            total_value,
        }
    }

    fn class_for(&self, cumulative: f64) -> AbcClass {
        if cumulative <= self.breakpoints.a_max_pct + SHARE_EPSILON {
            AbcClass::A
        } else if cumulative <= self.breakpoints.b_max_pct + SHARE_EPSILON {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }
}

impl Default for AbcClassifier {
    fn default() -> Self {
        Self::new(AbcBreakpoints::default())
    }
}
