// ==========================================
// 库存洞察引擎 - 报告编排器
// ==========================================
// 职责: 并发获取五份快照，依次执行六个操作，汇总为完整报告
// 红线: 单份快照获取失败 → 记录日志并以空快照继续
// 红线: 单个操作失败只体现在自身信封，不中断报告
// 红线: 出入库记录缺失窗口时按取数窗口补齐，报告内各操作年化口径一致
// ==========================================

use crate::api::dto::{validate_org_id, ReportOptions};
use crate::api::error::{ApiError, ApiResult};
use crate::api::insight_api::InventoryInsightApi;
use crate::api::response::OperationResponse;
use crate::domain::alert::RawAlertRecord;
use crate::domain::movement::RawMovementRecord;
use crate::domain::snapshot::SnapshotBundle;
use crate::domain::stock::RawStockRecord;
use crate::domain::turnover::RawTurnoverSummary;
use crate::domain::types::ValuationMethod;
use crate::domain::valuation::RawValuationRecord;
use crate::engine::abc::AbcClassification;
use crate::engine::benchmark::BenchmarkReport;
use crate::engine::health::HealthScore;
use crate::engine::insight::HealthAnalysis;
use crate::engine::reorder::ReorderPlan;
use crate::engine::turnover::TurnoverClassification;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

// ==========================================
// SnapshotSource Trait - 快照来源
// ==========================================
// 实现者: 外部数据访问层；StaticSnapshotSource（文件/内存）
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_stock(&self, org_id: &str) -> ApiResult<Vec<RawStockRecord>>;

    async fn fetch_movements(&self, org_id: &str, period_days: u32) -> ApiResult<Vec<RawMovementRecord>>;

    /// 上游周转汇总（可能不存在）
    async fn fetch_turnover(&self, org_id: &str, period_days: u32) -> ApiResult<Option<RawTurnoverSummary>>;

    async fn fetch_valuation(
        &self,
        org_id: &str,
        method: ValuationMethod,
    ) -> ApiResult<Vec<RawValuationRecord>>;

    async fn fetch_alerts(&self, org_id: &str) -> ApiResult<Vec<RawAlertRecord>>;
}

/// 内存快照来源（文件导入 / 测试）
pub struct StaticSnapshotSource {
    bundle: SnapshotBundle,
}

impl StaticSnapshotSource {
    pub fn new(bundle: SnapshotBundle) -> Self {
        Self { bundle }
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    async fn fetch_stock(&self, _org_id: &str) -> ApiResult<Vec<RawStockRecord>> {
        Ok(self.bundle.stock.clone())
    }

    async fn fetch_movements(&self, _org_id: &str, _period_days: u32) -> ApiResult<Vec<RawMovementRecord>> {
        Ok(self.bundle.movements.clone())
    }

    async fn fetch_turnover(&self, _org_id: &str, _period_days: u32) -> ApiResult<Option<RawTurnoverSummary>> {
        Ok(self.bundle.turnover.clone())
    }

    async fn fetch_valuation(
        &self,
        _org_id: &str,
        method: ValuationMethod,
    ) -> ApiResult<Vec<RawValuationRecord>> {
        // 内存来源只有一份估值，计价方法不一致时仅提示
        if let Some(stored) = self.bundle.valuation_method.as_deref() {
            if stored.parse::<ValuationMethod>().ok() != Some(method) {
                warn!(stored = stored, requested = method.as_str(), "估值快照计价方法与请求不一致");
            }
        }
        Ok(self.bundle.valuation.clone())
    }

    async fn fetch_alerts(&self, _org_id: &str) -> ApiResult<Vec<RawAlertRecord>> {
        Ok(self.bundle.alerts.clone())
    }
}

// ==========================================
// FullInsightReport - 完整洞察报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullInsightReport {
    pub report_id: String,
    pub org_id: String,
    pub generated_at: DateTime<Utc>,
    /// 获取失败、以空快照代替的来源
    pub degraded_sources: Vec<String>,
    pub health_score: OperationResponse<HealthScore>,
    pub abc_classification: OperationResponse<AbcClassification>,
    pub turnover_classification: OperationResponse<TurnoverClassification>,
    pub reorder_plan: OperationResponse<ReorderPlan>,
    pub health_analysis: OperationResponse<HealthAnalysis>,
    pub performance_benchmark: OperationResponse<BenchmarkReport>,
}

impl FullInsightReport {
    pub fn failed_operations(&self) -> usize {
        [
            self.health_score.success,
            self.abc_classification.success,
            self.turnover_classification.success,
            self.reorder_plan.success,
            self.health_analysis.success,
            self.performance_benchmark.success,
        ]
        .iter()
        .filter(|ok| !**ok)
        .count()
    }
}

// ==========================================
// InsightOrchestrator - 报告编排器
// ==========================================
pub struct InsightOrchestrator<S>
where
    S: SnapshotSource,
{
    source: Arc<S>,
    api: InventoryInsightApi,
}

impl<S> InsightOrchestrator<S>
where
    S: SnapshotSource,
{
    /// 创建编排器
    ///
    /// # 参数
    /// - source: 快照来源
    /// - api: 洞察 API（携带策略配置）
    pub fn new(source: Arc<S>, api: InventoryInsightApi) -> Self {
        Self { source, api }
    }

    /// 并发获取五份快照
    ///
    /// # 返回
    /// (快照集合, 降级来源列表)
    pub async fn gather(&self, org_id: &str, options: &ReportOptions) -> (SnapshotBundle, Vec<String>) {
        let period_days = options.turnover().period_days;
        let method = options.valuation_method;

        let (stock, movements, turnover, valuation, alerts) = futures::join!(
            self.source.fetch_stock(org_id),
            self.source.fetch_movements(org_id, period_days),
            self.source.fetch_turnover(org_id, period_days),
            self.source.fetch_valuation(org_id, method),
            self.source.fetch_alerts(org_id),
        );

        let mut degraded = Vec::new();
        let stock = or_degraded("stock", stock, &mut degraded);
        let mut movements = or_degraded("movements", movements, &mut degraded);
        stamp_window(&mut movements, period_days);

        let bundle = SnapshotBundle {
            stock,
            movements,
            turnover: or_degraded("turnover", turnover, &mut degraded),
            valuation_method: Some(method.as_str().to_string()),
            valuation: or_degraded("valuation", valuation, &mut degraded),
            alerts: or_degraded("alerts", alerts, &mut degraded),
        };

        (bundle, degraded)
    }

    /// 生成完整报告（六个独立信封）
    pub async fn run_full_report(&self, org_id: &str, options: &ReportOptions) -> FullInsightReport {
        let report_id = Uuid::new_v4().to_string();
        info!(report_id = %report_id, org_id = %org_id, "开始生成洞察报告");

        // org_id 非法时不访问来源，由各操作分别返回校验失败
        let (bundle, degraded_sources) = match validate_org_id(org_id) {
            Ok(()) => self.gather(org_id, options).await,
            Err(_) => (SnapshotBundle::default(), Vec::new()),
        };

        let api = &self.api;
        let report = FullInsightReport {
            health_score: OperationResponse::from_result(
                "health_score",
                api.health_score(org_id, &bundle.stock, bundle.turnover.as_ref(), &bundle.alerts),
            ),
            abc_classification: OperationResponse::from_result(
                "abc_classification",
                api.abc_classification(org_id, &bundle.valuation, &options.abc()),
            ),
            turnover_classification: OperationResponse::from_result(
                "turnover_classification",
                api.turnover_classification(org_id, &bundle.stock, &bundle.movements, &options.turnover()),
            ),
            reorder_plan: OperationResponse::from_result(
                "reorder_plan",
                api.reorder_plan(org_id, &bundle.alerts, &options.reorder()),
            ),
            health_analysis: OperationResponse::from_result(
                "analyze_health",
                api.analyze_health(org_id, &bundle, &options.analyze_health()),
            ),
            performance_benchmark: OperationResponse::from_result(
                "performance_benchmark",
                api.performance_benchmark(org_id, &bundle, &options.benchmark()),
            ),
            report_id,
            org_id: org_id.to_string(),
            generated_at: Utc::now(),
            degraded_sources,
        };

        info!(
            report_id = %report.report_id,
            failed = report.failed_operations(),
            degraded = report.degraded_sources.len(),
            "洞察报告生成完成"
        );
        report
    }
}

/// 未携带窗口的出入库记录补上取数窗口
fn stamp_window(movements: &mut [RawMovementRecord], period_days: u32) {
    for record in movements.iter_mut() {
        if record.window_days.map_or(true, |days| days == 0) {
            record.window_days = Some(period_days);
        }
    }
}

fn or_degraded<T: Default>(source: &str, result: Result<T, ApiError>, degraded: &mut Vec<String>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(source = source, error = %err, "快照获取失败，按空快照继续");
            degraded.push(source.to_string());
            T::default()
        }
    }
}
