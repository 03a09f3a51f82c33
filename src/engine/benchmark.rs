// ==========================================
// 库存洞察引擎 - 绩效对标引擎
// ==========================================
// 职责: 计算库存 KPI，并与对标表比较输出差距
// 输入: 库存/出入库/估值快照 + 呆滞金额 + 观察窗口
// 输出: BenchmarkReport（kpis + benchmarks + performance_gaps）
// ==========================================
// 口径:
// - 年化系数 = 365 / period_days
// - 库存价值 = 估值合计；估值快照为空时取库存金额合计
// - 仅当 KPI 在其方向上劣于目标时输出差距
// - 差距优先级按相对差距 (|目标-实际| / 目标) 划分
// ==========================================

use crate::config::policy::{BenchmarkPolicy, BenchmarkTable};
use crate::domain::movement::MovementSnapshot;
use crate::domain::stock::StockSnapshot;
use crate::domain::types::{BenchmarkProfile, Priority};
use crate::domain::valuation::ValuationSnapshot;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 指标方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricDirection {
    HigherIsBetter,
    LowerIsBetter,
}

impl MetricDirection {
    /// 指标方向（未列出的均为越高越好）
    pub fn of(metric: &str) -> Self {
        match metric {
            "days_on_hand" | "stockout_rate" | "carrying_cost_pct" | "obsolescence_rate" => {
                MetricDirection::LowerIsBetter
            }
            _ => MetricDirection::HigherIsBetter,
        }
    }

    pub fn underperforms(&self, current: f64, target: f64) -> bool {
        match self {
            MetricDirection::HigherIsBetter => current < target,
            MetricDirection::LowerIsBetter => current > target,
        }
    }
}

/// KPI 实际值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSet {
    pub turnover_ratio: f64,
    pub days_on_hand: f64,
    pub stockout_rate: f64,
    pub inventory_accuracy: f64,
    pub carrying_cost_pct: f64,
    pub gmroi: f64,
    pub service_level: f64,
    pub obsolescence_rate: f64,
}

impl KpiSet {
    /// 与 BenchmarkTable::values 顺序一致
    pub fn values(&self) -> [(&'static str, f64); 8] {
        [
            ("turnover_ratio", self.turnover_ratio),
            ("days_on_hand", self.days_on_hand),
            ("stockout_rate", self.stockout_rate),
            ("inventory_accuracy", self.inventory_accuracy),
            ("carrying_cost_pct", self.carrying_cost_pct),
            ("gmroi", self.gmroi),
            ("service_level", self.service_level),
            ("obsolescence_rate", self.obsolescence_rate),
        ]
    }
}

/// 单项绩效差距
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceGap {
    pub metric: String,
    pub current: f64,
    pub target: f64,
    pub gap: f64,
    pub direction: MetricDirection,
    pub priority: Priority,
}

/// 对标报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub period_days: u32,
    pub benchmark_against: BenchmarkProfile,
    pub kpis: KpiSet,
    pub benchmarks: BenchmarkTable,
    pub performance_gaps: Vec<PerformanceGap>,
}

/// KPI 计算输入
#[derive(Debug, Clone, Copy)]
pub struct BenchmarkInputs<'a> {
    pub stock: &'a StockSnapshot,
    pub movements: &'a MovementSnapshot,
    pub valuation: &'a ValuationSnapshot,
    pub dead_stock_value: f64,
    pub period_days: u32,
}

// ==========================================
// BenchmarkEngine - 绩效对标引擎
// ==========================================
pub struct BenchmarkEngine {
    policy: BenchmarkPolicy,
}

impl BenchmarkEngine {
    pub fn new(policy: BenchmarkPolicy) -> Self {
        Self { policy }
    }

    /// 执行对标
    ///
    /// # 参数
    /// - inputs: KPI 计算输入
    /// - profile: 对标口径（行业平均 / 行业标杆）
    ///
    /// # 返回
    /// BenchmarkReport，差距按 KPI 固定顺序排列
    #[instrument(skip(self, inputs), fields(items = inputs.stock.items.len(), period_days = inputs.period_days))]
    pub fn benchmark(&self, inputs: &BenchmarkInputs<'_>, profile: BenchmarkProfile) -> BenchmarkReport {
        let kpis = self.compute_kpis(inputs);
        let benchmarks = self.policy.table(profile).clone();
        let performance_gaps = self.find_gaps(&kpis, &benchmarks);

        tracing::debug!(gaps = performance_gaps.len(), profile = ?profile, "绩效对标完成");

        BenchmarkReport {
            period_days: inputs.period_days,
            benchmark_against: profile,
            kpis,
            benchmarks,
            performance_gaps,
        }
    }

    /// 计算 KPI（缺失数据按 0 计，体现为更大的差距）
    pub fn compute_kpis(&self, inputs: &BenchmarkInputs<'_>) -> KpiSet {
        let annual_factor = if inputs.period_days > 0 {
            365.0 / inputs.period_days as f64
        } else {
            0.0
        };

        let inventory_value = if inputs.valuation.is_empty() {
            inputs.stock.total_value()
        } else {
            inputs.valuation.total_value()
        };
        let annual_outbound_value = inputs.movements.total_outbound_value() * annual_factor;
        let annual_margin = (inputs.movements.total_outbound_revenue()
            - inputs.movements.total_outbound_value())
            * annual_factor;

        let summary = inputs.stock.summary();

        let turnover_ratio = ratio(annual_outbound_value, inventory_value);
        let days_on_hand = if turnover_ratio > 0.0 {
            365.0 / turnover_ratio
        } else {
            self.policy.days_on_hand_sentinel
        };

        let stockout_rate = ratio(summary.out_of_stock as f64, summary.total_items as f64) * 100.0;

        let adjustments = inputs.movements.total_adjustment_quantity();
        let inventory_accuracy = if adjustments <= 0.0 {
            100.0
        } else {
            let on_hand = inputs.stock.total_quantity() as f64;
            if on_hand > 0.0 {
                (100.0 - adjustments / on_hand * 100.0).clamp(0.0, 100.0)
            } else {
                0.0
            }
        };

        let carrying_cost_pct = if annual_outbound_value > 0.0 {
            self.policy.annual_carrying_rate * inventory_value / annual_outbound_value * 100.0
        } else {
            100.0
        };

        KpiSet {
            turnover_ratio,
            days_on_hand,
            stockout_rate,
            inventory_accuracy,
            carrying_cost_pct,
            gmroi: ratio(annual_margin, inventory_value),
            service_level: 100.0 - stockout_rate,
            obsolescence_rate: ratio(inputs.dead_stock_value, inventory_value) * 100.0,
        }
    }

    /// 找出劣于目标的指标
    pub fn find_gaps(&self, kpis: &KpiSet, table: &BenchmarkTable) -> Vec<PerformanceGap> {
        kpis.values()
            .into_iter()
            .zip(table.values())
            .filter_map(|((metric, current), (_, target))| {
                let direction = MetricDirection::of(metric);
                if !direction.underperforms(current, target) {
                    return None;
                }
                let gap = (target - current).abs();
                Some(PerformanceGap {
                    metric: metric.to_string(),
                    current,
                    target,
                    gap,
                    direction,
                    priority: self.gap_priority(gap, target),
                })
            })
            .collect()
    }

    fn gap_priority(&self, gap: f64, target: f64) -> Priority {
        let relative = if target > 0.0 { gap / target } else { f64::INFINITY };
        if relative >= self.policy.high_gap_ratio {
            Priority::High
        } else if relative >= self.policy.medium_gap_ratio {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl Default for BenchmarkEngine {
    fn default() -> Self {
        Self::new(BenchmarkPolicy::default())
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
