// ==========================================
// 库存洞察引擎 - 策略配置
// ==========================================
// 职责: 汇集所有阈值/权重/对标表（可注入，默认值即业务口径）
// 红线: 任何引擎不得硬编码阈值，一律从 PolicyConfig 读取
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::types::BenchmarkProfile;
use serde::{Deserialize, Serialize};

/// 健康分扣分权重
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthWeights {
    pub out_of_stock: u32,
    pub critical_stock: u32,
    pub low_stock: u32,
    pub overstock: u32,
    pub dead_stock: u32,
    pub slow_moving: u32,
    pub critical_alert: u32,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            out_of_stock: 5,
            critical_stock: 3,
            low_stock: 1,
            overstock: 2,
            dead_stock: 4,
            slow_moving: 2,
            critical_alert: 5,
        }
    }
}

/// ABC 分界点（累计价值占比，百分数）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbcBreakpoints {
    pub a_max_pct: f64,
    pub b_max_pct: f64,
}

impl Default for AbcBreakpoints {
    fn default() -> Self {
        Self {
            a_max_pct: 80.0,
            b_max_pct: 95.0,
        }
    }
}

/// 周转分层口径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnoverPolicy {
    /// 低周转阈值（次/年），低于即为慢周转
    pub low_turnover_threshold: f64,
    /// 零消耗时的可售天数哨兵值
    pub days_of_stock_sentinel: f64,
}

impl Default for TurnoverPolicy {
    fn default() -> Self {
        Self {
            low_turnover_threshold: 6.0,
            days_of_stock_sentinel: 999.0,
        }
    }
}

/// 问题/建议规则阈值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightPolicy {
    /// 紧急预警数超过该值触发补货计划问题
    pub critical_alert_issue_threshold: u64,
    /// 平均周转低于该值触发周转改善建议
    pub low_turnover_recommendation_threshold: f64,
    /// C 类数量超过 A 类数量的倍数触发 SKU 精简建议
    pub sku_rationalization_ratio: f64,
}

impl Default for InsightPolicy {
    fn default() -> Self {
        Self {
            critical_alert_issue_threshold: 5,
            low_turnover_recommendation_threshold: 6.0,
            sku_rationalization_ratio: 3.0,
        }
    }
}

/// KPI 对标表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkTable {
    pub turnover_ratio: f64,
    pub days_on_hand: f64,
    pub stockout_rate: f64,
    pub inventory_accuracy: f64,
    pub carrying_cost_pct: f64,
    pub gmroi: f64,
    pub service_level: f64,
    pub obsolescence_rate: f64,
}

impl BenchmarkTable {
    /// 行业平均
    pub fn industry() -> Self {
        Self {
            turnover_ratio: 8.0,
            days_on_hand: 45.0,
            stockout_rate: 2.0,
            inventory_accuracy: 97.0,
            carrying_cost_pct: 4.0,
            gmroi: 3.0,
            service_level: 95.0,
            obsolescence_rate: 5.0,
        }
    }

    /// 行业标杆
    pub fn best_in_class() -> Self {
        Self {
            turnover_ratio: 12.0,
            days_on_hand: 30.0,
            stockout_rate: 1.0,
            inventory_accuracy: 99.5,
            carrying_cost_pct: 2.5,
            gmroi: 4.0,
            service_level: 98.0,
            obsolescence_rate: 2.0,
        }
    }

    /// 按固定顺序列出各项指标（名称, 目标值）
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

impl Default for BenchmarkTable {
    fn default() -> Self {
        Self::industry()
    }
}

/// 对标口径
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkPolicy {
    /// 年持有成本率（0~1）
    pub annual_carrying_rate: f64,
    /// 周转为 0 时的库存天数哨兵值
    pub days_on_hand_sentinel: f64,
    /// 相对差距 ≥ 该值为 high
    pub high_gap_ratio: f64,
    /// 相对差距 ≥ 该值为 medium
    pub medium_gap_ratio: f64,
    pub industry: BenchmarkTable,
    pub best_in_class: BenchmarkTable,
}

impl Default for BenchmarkPolicy {
    fn default() -> Self {
        Self {
            annual_carrying_rate: 0.25,
            days_on_hand_sentinel: 999.0,
            high_gap_ratio: 0.5,
            medium_gap_ratio: 0.2,
            industry: BenchmarkTable::industry(),
            best_in_class: BenchmarkTable::best_in_class(),
        }
    }
}

impl BenchmarkPolicy {
    pub fn table(&self, profile: BenchmarkProfile) -> &BenchmarkTable {
        match profile {
            BenchmarkProfile::Industry => &self.industry,
            BenchmarkProfile::BestInClass => &self.best_in_class,
        }
    }
}

// ==========================================
// PolicyConfig - 策略配置总入口
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub health_weights: HealthWeights,
    pub abc_breakpoints: AbcBreakpoints,
    pub turnover: TurnoverPolicy,
    pub insight: InsightPolicy,
    pub benchmark: BenchmarkPolicy,
}

impl PolicyConfig {
    /// 从 JSON 解析（缺省字段取默认值），并校验
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let policy: PolicyConfig = serde_json::from_str(raw)?;
        policy.validate()?;
        Ok(policy)
    }

    /// 校验策略配置
    ///
    /// 非法配置直接拒绝，不做静默修正
    pub fn validate(&self) -> Result<(), ConfigError> {
        let abc = &self.abc_breakpoints;
        if !(abc.a_max_pct.is_finite() && abc.b_max_pct.is_finite())
            || abc.a_max_pct <= 0.0
            || abc.a_max_pct >= abc.b_max_pct
            || abc.b_max_pct > 100.0
        {
            return Err(ConfigError::InvalidPolicy {
                field: "abc_breakpoints".to_string(),
                message: format!(
                    "要求 0 < a_max_pct < b_max_pct <= 100，实际 a={}, b={}",
                    abc.a_max_pct, abc.b_max_pct
                ),
            });
        }

        require_positive("turnover.low_turnover_threshold", self.turnover.low_turnover_threshold)?;
        require_positive("turnover.days_of_stock_sentinel", self.turnover.days_of_stock_sentinel)?;
        require_positive(
            "insight.low_turnover_recommendation_threshold",
            self.insight.low_turnover_recommendation_threshold,
        )?;
        require_positive(
            "insight.sku_rationalization_ratio",
            self.insight.sku_rationalization_ratio,
        )?;

        let bench = &self.benchmark;
        if !bench.annual_carrying_rate.is_finite()
            || !(0.0..=1.0).contains(&bench.annual_carrying_rate)
        {
            return Err(ConfigError::InvalidPolicy {
                field: "benchmark.annual_carrying_rate".to_string(),
                message: format!("应在 [0, 1] 内，实际 {}", bench.annual_carrying_rate),
            });
        }
        require_positive("benchmark.days_on_hand_sentinel", bench.days_on_hand_sentinel)?;
        if !(bench.medium_gap_ratio > 0.0 && bench.medium_gap_ratio < bench.high_gap_ratio) {
            return Err(ConfigError::InvalidPolicy {
                field: "benchmark.gap_ratio".to_string(),
                message: format!(
                    "要求 0 < medium_gap_ratio < high_gap_ratio，实际 medium={}, high={}",
                    bench.medium_gap_ratio, bench.high_gap_ratio
                ),
            });
        }

        for (profile, table) in [("industry", &bench.industry), ("best_in_class", &bench.best_in_class)] {
            for (name, value) in table.values() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidPolicy {
                        field: format!("benchmark.{}.{}", profile, name),
                        message: format!("对标值必须为非负有限数，实际 {}", value),
                    });
                }
            }
        }

        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidPolicy {
            field: field.to_string(),
            message: format!("必须为正数，实际 {}", value),
        })
    }
}
