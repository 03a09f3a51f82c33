// ==========================================
// 库存洞察引擎 - 洞察 API
// ==========================================
// 职责: 对外六个操作（健康分 / ABC / 周转 / 补货 / 健康分析 / 绩效对标）
// 流程: 边界校验 → 快照规范化 → 引擎计算
// 红线: 引擎纯计算，无状态；每次调用从策略配置构建引擎
// ==========================================

use crate::api::dto::{
    validate_budget, validate_org_id, validate_period_days, AbcOptions, AnalyzeHealthOptions,
    BenchmarkOptions, ReorderOptions, TurnoverOptions, DEFAULT_HEALTH_PERIOD_DAYS,
};
use crate::api::error::ApiResult;
use crate::config::policy::PolicyConfig;
use crate::domain::alert::RawAlertRecord;
use crate::domain::movement::RawMovementRecord;
use crate::domain::snapshot::{InventorySnapshot, SnapshotBundle};
use crate::domain::stock::RawStockRecord;
use crate::domain::turnover::{RawTurnoverSummary, TurnoverSummary};
use crate::domain::valuation::RawValuationRecord;
use crate::engine::abc::{AbcClassification, AbcClassifier};
use crate::engine::benchmark::{BenchmarkEngine, BenchmarkInputs, BenchmarkReport};
use crate::engine::health::{HealthInputs, HealthScore, HealthScorer};
use crate::engine::insight::{HealthAnalysis, InsightEngine, InsightInputs};
use crate::engine::normalize::SnapshotNormalizer;
use crate::engine::reorder::{ReorderPlan, ReorderPlanner};
use crate::engine::turnover::{TurnoverClassification, TurnoverClassifier};
use tracing::instrument;

// ==========================================
// InventoryInsightApi - 洞察 API
// ==========================================
pub struct InventoryInsightApi {
    policy: PolicyConfig,
}

impl InventoryInsightApi {
    /// 创建 API 实例
    ///
    /// # 参数
    /// - policy: 已校验的策略配置
    pub fn new(policy: PolicyConfig) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    // ==========================================
    // 健康分
    // ==========================================

    /// 计算健康分
    ///
    /// # 参数
    /// - org_id: 组织ID
    /// - stock: 库存快照
    /// - turnover: 周转汇总（缺失按 0 计）
    /// - alerts: 预警快照
    #[instrument(skip(self, stock, turnover, alerts), fields(org_id = %org_id))]
    pub fn health_score(
        &self,
        org_id: &str,
        stock: &[RawStockRecord],
        turnover: Option<&RawTurnoverSummary>,
        alerts: &[RawAlertRecord],
    ) -> ApiResult<HealthScore> {
        validate_org_id(org_id)?;

        let normalizer = SnapshotNormalizer::new(DEFAULT_HEALTH_PERIOD_DAYS);
        let stock = normalizer.normalize_stock(stock)?;
        let alerts = normalizer.normalize_alerts(alerts)?;
        let turnover = turnover.map(|t| normalizer.normalize_turnover(t));

        let inputs =
            HealthInputs::from_summaries(&stock.summary(), turnover.as_ref(), Some(&alerts.summary()));
        Ok(HealthScorer::new(self.policy.health_weights.clone()).score(&inputs))
    }

    // ==========================================
    // ABC 分类
    // ==========================================

    #[instrument(skip(self, valuation), fields(org_id = %org_id))]
    pub fn abc_classification(
        &self,
        org_id: &str,
        valuation: &[RawValuationRecord],
        options: &AbcOptions,
    ) -> ApiResult<AbcClassification> {
        validate_org_id(org_id)?;

        let valuation = SnapshotNormalizer::new(DEFAULT_HEALTH_PERIOD_DAYS)
            .normalize_valuation(options.valuation_method, valuation)?;
        Ok(AbcClassifier::new(self.policy.abc_breakpoints.clone()).classify(&valuation))
    }

    // ==========================================
    // 周转分类
    // ==========================================

    #[instrument(skip(self, stock, movements), fields(org_id = %org_id, period_days = options.period_days))]
    pub fn turnover_classification(
        &self,
        org_id: &str,
        stock: &[RawStockRecord],
        movements: &[RawMovementRecord],
        options: &TurnoverOptions,
    ) -> ApiResult<TurnoverClassification> {
        validate_org_id(org_id)?;
        validate_period_days(options.period_days)?;

        let normalizer = SnapshotNormalizer::new(options.period_days);
        let stock = normalizer.normalize_stock(stock)?;
        let movements = normalizer.normalize_movements(movements)?;

        Ok(TurnoverClassifier::new(self.policy.turnover.clone()).classify(
            &stock,
            &movements,
            options.period_days,
        ))
    }

    // ==========================================
    // 补货计划
    // ==========================================

    #[instrument(skip(self, alerts), fields(org_id = %org_id, budget = ?options.budget_limit))]
    pub fn reorder_plan(
        &self,
        org_id: &str,
        alerts: &[RawAlertRecord],
        options: &ReorderOptions,
    ) -> ApiResult<ReorderPlan> {
        validate_org_id(org_id)?;
        validate_budget(options.budget_limit)?;

        let alerts = SnapshotNormalizer::new(DEFAULT_HEALTH_PERIOD_DAYS)
            .normalize_alerts(alerts)?
            .filtered(options.urgency);

        Ok(ReorderPlanner::new().plan(&alerts, options.budget_limit))
    }

    // ==========================================
    // 健康分析
    // ==========================================

    /// 完整健康分析（健康分 + 摘要 + 问题 + 建议 + 优化空间）
    #[instrument(skip(self, bundle), fields(org_id = %org_id, focus = ?options.focus_area))]
    pub fn analyze_health(
        &self,
        org_id: &str,
        bundle: &SnapshotBundle,
        options: &AnalyzeHealthOptions,
    ) -> ApiResult<HealthAnalysis> {
        validate_org_id(org_id)?;
        validate_period_days(options.period_days)?;

        let snapshot = SnapshotNormalizer::new(options.period_days).normalize(bundle)?;
        let turnover = self.resolve_turnover(&snapshot, options.period_days);
        let stock_summary = snapshot.stock.summary();
        let alert_summary = snapshot.alerts.summary();

        let health_score = HealthScorer::new(self.policy.health_weights.clone()).score(
            &HealthInputs::from_summaries(&stock_summary, Some(&turnover), Some(&alert_summary)),
        );
        let abc = AbcClassifier::new(self.policy.abc_breakpoints.clone()).classify(&snapshot.valuation);

        let inputs = InsightInputs {
            stock: stock_summary,
            stock_value: snapshot.stock.total_value(),
            turnover,
            alerts: alert_summary,
            abc: &abc,
            valuation: &snapshot.valuation,
        };

        Ok(InsightEngine::new(self.policy.insight.clone()).analyze(
            health_score,
            &inputs,
            options.focus_area,
        ))
    }

    // ==========================================
    // 绩效对标
    // ==========================================

    #[instrument(skip(self, bundle), fields(org_id = %org_id, profile = ?options.benchmark_against))]
    pub fn performance_benchmark(
        &self,
        org_id: &str,
        bundle: &SnapshotBundle,
        options: &BenchmarkOptions,
    ) -> ApiResult<BenchmarkReport> {
        validate_org_id(org_id)?;
        validate_period_days(options.period_days)?;

        let snapshot = SnapshotNormalizer::new(options.period_days).normalize(bundle)?;
        let turnover = self.resolve_turnover(&snapshot, options.period_days);

        let inputs = BenchmarkInputs {
            stock: &snapshot.stock,
            movements: &snapshot.movements,
            valuation: &snapshot.valuation,
            dead_stock_value: turnover.dead_stock_value,
            period_days: options.period_days,
        };

        Ok(BenchmarkEngine::new(self.policy.benchmark.clone()).benchmark(&inputs, options.benchmark_against))
    }

    /// 周转汇总来源: 上游快照 → 由出入库推算 → 全 0
    fn resolve_turnover(&self, snapshot: &InventorySnapshot, period_days: u32) -> TurnoverSummary {
        if let Some(turnover) = snapshot.turnover {
            return turnover;
        }
        if snapshot.movements.is_empty() {
            return TurnoverSummary::default();
        }

        tracing::debug!("上游未提供周转汇总，按出入库推算");
        TurnoverClassifier::new(self.policy.turnover.clone())
            .classify(&snapshot.stock, &snapshot.movements, period_days)
            .to_summary()
    }
}

impl Default for InventoryInsightApi {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}
