// ==========================================
// 库存洞察引擎 - 问题与建议引擎
// ==========================================
// 职责: 汇总健康状况，识别问题，按焦点生成建议，估算优化空间
// 输入: 健康分 + 库存/周转/预警汇总 + ABC 分类 + 估值快照
// 输出: HealthAnalysis
// ==========================================
// 规则（彼此独立）:
// - 缺货物料 > 0          → stockout (critical)
// - 呆滞物料 > 0          → dead_stock (high)
// - 紧急预警 > 阈值       → reorder_planning (high)
// - 积压物料 > 0          → overstock (medium)
// 建议门控: focus = overall 时全部规则生效
// ==========================================

use crate::config::policy::InsightPolicy;
use crate::domain::alert::AlertSummary;
use crate::domain::stock::StockSummary;
use crate::domain::turnover::TurnoverSummary;
use crate::domain::types::{FocusArea, Priority, Severity, ValuationMethod};
use crate::domain::valuation::{ValuationAggregate, ValuationSnapshot};
use crate::engine::abc::AbcClassification;
use crate::engine::health::HealthScore;
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ==========================================
// 输出结构
// ==========================================

/// 识别出的问题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_type: String,
    pub severity: Severity,
    pub affected_items: u64,
    pub description: String,
    pub impact: String,
    /// 可量化的价值影响（如呆滞金额）
    pub impact_value: Option<f64>,
}

/// 改善建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub actions: Vec<String>,
    pub expected_impact: String,
}

/// 单项优化机会
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub opportunity_type: String,
    pub description: String,
    pub potential_value: f64,
    pub affected_items: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOpportunities {
    pub opportunities: Vec<Opportunity>,
    pub total_potential: f64,
}

/// ABC 分布计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbcDistribution {
    pub a_count: u64,
    pub b_count: u64,
    pub c_count: u64,
}

/// 健康摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total_items: u64,
    pub total_value: f64,
    pub stock: StockSummary,
    pub alerts: AlertSummary,
    pub average_turnover: f64,
    pub slow_moving_count: u64,
    pub dead_stock_count: u64,
    pub abc_distribution: AbcDistribution,
    pub inventory_concentration: f64,
    pub valuation_method: ValuationMethod,
    pub value_by_category: Vec<ValuationAggregate>,
    pub value_by_location: Vec<ValuationAggregate>,
}

/// 完整健康分析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAnalysis {
    pub health_score: HealthScore,
    pub focus_area: FocusArea,
    pub summary: HealthSummary,
    pub issues: Vec<Issue>,
    pub recommendations: Vec<Recommendation>,
    pub optimization_opportunities: OptimizationOpportunities,
}

/// 分析输入（均为规范化后的汇总）
#[derive(Debug, Clone, Copy)]
pub struct InsightInputs<'a> {
    pub stock: StockSummary,
    pub stock_value: f64,
    pub turnover: TurnoverSummary,
    pub alerts: AlertSummary,
    pub abc: &'a AbcClassification,
    pub valuation: &'a ValuationSnapshot,
}

// ==========================================
// InsightEngine - 问题与建议引擎
// ==========================================
pub struct InsightEngine {
    policy: InsightPolicy,
}

impl InsightEngine {
    pub fn new(policy: InsightPolicy) -> Self {
        Self { policy }
    }

    /// 执行完整健康分析
    ///
    /// # 参数
    /// - health_score: 已计算的健康分
    /// - inputs: 各类汇总
    /// - focus: 建议焦点
    #[instrument(skip(self, health_score, inputs), fields(score = health_score.score, focus = ?focus))]
    pub fn analyze(
        &self,
        health_score: HealthScore,
        inputs: &InsightInputs<'_>,
        focus: FocusArea,
    ) -> HealthAnalysis {
        let issues = self.identify_issues(&inputs.stock, &inputs.turnover, &inputs.alerts);
        let recommendations =
            self.generate_recommendations(&inputs.turnover, &inputs.alerts, inputs.abc, focus);
        let optimization_opportunities = self.optimization_opportunities(&inputs.turnover);

        tracing::debug!(
            issues = issues.len(),
            recommendations = recommendations.len(),
            "健康分析完成"
        );

        HealthAnalysis {
            summary: Self::summarize(inputs),
            health_score,
            focus_area: focus,
            issues,
            recommendations,
            optimization_opportunities,
        }
    }

    /// 识别问题（规则彼此独立，全部评估）
    pub fn identify_issues(
        &self,
        stock: &StockSummary,
        turnover: &TurnoverSummary,
        alerts: &AlertSummary,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();

        if stock.out_of_stock > 0 {
            issues.push(Issue {
                issue_type: "stockout".to_string(),
                severity: Severity::Critical,
                affected_items: stock.out_of_stock,
                description: format!("{} 个物料已缺货", stock.out_of_stock),
                impact: "缺货导致订单无法履约，直接损失销售".to_string(),
                impact_value: None,
            });
        }

        if turnover.dead_stock_count > 0 {
            issues.push(Issue {
                issue_type: "dead_stock".to_string(),
                severity: Severity::High,
                affected_items: turnover.dead_stock_count,
                description: format!("{} 个物料观察期内无出库", turnover.dead_stock_count),
                impact: format!("呆滞库存占用资金 {:.2}", turnover.dead_stock_value),
                impact_value: Some(turnover.dead_stock_value),
            });
        }

        if alerts.critical_count > self.policy.critical_alert_issue_threshold {
            issues.push(Issue {
                issue_type: "reorder_planning".to_string(),
                severity: Severity::High,
                affected_items: alerts.critical_count,
                description: format!(
                    "{} 个紧急补货预警，超过 {} 个",
                    alerts.critical_count, self.policy.critical_alert_issue_threshold
                ),
                impact: "补货计划滞后，缺货风险集中爆发".to_string(),
                impact_value: None,
            });
        }

        if stock.overstock > 0 {
            issues.push(Issue {
                issue_type: "overstock".to_string(),
                severity: Severity::Medium,
                affected_items: stock.overstock,
                description: format!("{} 个物料库存积压", stock.overstock),
                impact: "积压抬高持有成本与过期风险".to_string(),
                impact_value: None,
            });
        }

        issues
    }

    /// 生成建议（按焦点门控）
    pub fn generate_recommendations(
        &self,
        turnover: &TurnoverSummary,
        alerts: &AlertSummary,
        abc: &AbcClassification,
        focus: FocusArea,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if focus.includes(FocusArea::Turnover)
            && turnover.average_turnover < self.policy.low_turnover_recommendation_threshold
        {
            recommendations.push(Recommendation {
                category: "turnover_improvement".to_string(),
                priority: Priority::High,
                title: "提升库存周转".to_string(),
                description: format!(
                    "平均周转率 {:.2} 次/年，低于 {:.0} 次/年",
                    turnover.average_turnover, self.policy.low_turnover_recommendation_threshold
                ),
                actions: vec![
                    "下调慢周转物料的安全库存与订货量".to_string(),
                    "对呆滞物料安排促销或调拨".to_string(),
                    "复核补货周期，改为小批量多批次".to_string(),
                ],
                expected_impact: "释放占用资金，降低持有成本".to_string(),
            });
        }

        if focus.includes(FocusArea::Stockouts) && alerts.critical_count > 0 {
            recommendations.push(Recommendation {
                category: "immediate_order".to_string(),
                priority: Priority::Critical,
                title: "立即补货".to_string(),
                description: format!("{} 个物料处于紧急补货状态", alerts.critical_count),
                actions: vec![
                    "按补货计划下达紧急采购单".to_string(),
                    "与供应商确认加急交期".to_string(),
                ],
                expected_impact: "避免缺货造成的销售损失".to_string(),
            });
        }

        let a_count = abc.a_class.count as f64;
        let c_count = abc.c_class.count as f64;
        if focus.includes(FocusArea::Valuation) && c_count > self.policy.sku_rationalization_ratio * a_count {
            recommendations.push(Recommendation {
                category: "sku_rationalization".to_string(),
                priority: Priority::Medium,
                title: "精简 SKU".to_string(),
                description: format!(
                    "C 类物料 {} 个，A 类 {} 个，长尾物料过多",
                    abc.c_class.count, abc.a_class.count
                ),
                actions: vec![
                    "评估 C 类物料的淘汰或替代".to_string(),
                    "合并功能重复的物料".to_string(),
                ],
                expected_impact: "降低管理复杂度与长尾库存占用".to_string(),
            });
        }

        recommendations
    }

    /// 估算优化空间（呆滞清理 + 慢周转压降）
    pub fn optimization_opportunities(&self, turnover: &TurnoverSummary) -> OptimizationOpportunities {
        let mut opportunities = Vec::new();

        if turnover.dead_stock_value > 0.0 {
            opportunities.push(Opportunity {
                opportunity_type: "dead_stock_liquidation".to_string(),
                description: "清理呆滞库存回笼资金".to_string(),
                potential_value: turnover.dead_stock_value,
                affected_items: turnover.dead_stock_count,
            });
        }

        if turnover.slow_moving_value > 0.0 {
            opportunities.push(Opportunity {
                opportunity_type: "slow_mover_reduction".to_string(),
                description: "压降慢周转物料库存".to_string(),
                potential_value: turnover.slow_moving_value,
                affected_items: turnover.slow_moving_count,
            });
        }

        OptimizationOpportunities {
            total_potential: opportunities.iter().map(|o| o.potential_value).sum(),
            opportunities,
        }
    }

    fn summarize(inputs: &InsightInputs<'_>) -> HealthSummary {
        let total_value = if inputs.valuation.is_empty() {
            inputs.stock_value
        } else {
            inputs.valuation.total_value()
        };

        HealthSummary {
            total_items: inputs.stock.total_items,
            total_value,
            stock: inputs.stock,
            alerts: inputs.alerts,
            average_turnover: inputs.turnover.average_turnover,
            slow_moving_count: inputs.turnover.slow_moving_count,
            dead_stock_count: inputs.turnover.dead_stock_count,
            abc_distribution: AbcDistribution {
                a_count: inputs.abc.a_class.count,
                b_count: inputs.abc.b_class.count,
                c_count: inputs.abc.c_class.count,
            },
            inventory_concentration: inputs.abc.inventory_concentration,
            valuation_method: inputs.valuation.method,
            value_by_category: inputs.valuation.aggregate_by_category(),
            value_by_location: inputs.valuation.aggregate_by_location(),
        }
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(InsightPolicy::default())
    }
}
