// ==========================================
// InsightOrchestrator 报告编排集成测试
// ==========================================
// 测试目标: 并发取数、来源降级、独立信封
// ==========================================


use async_trait::async_trait;
use inventory_insight::domain::{
    BudgetStatus, RawAlertRecord, RawMovementRecord, RawStockRecord, RawTurnoverSummary,
    RawValuationRecord, ValuationMethod,
};
use inventory_insight::{
    ApiError, ApiResult, InsightOrchestrator, InventoryInsightApi, ReportOptions, SnapshotSource,
    StaticSnapshotSource,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use test_helpers::*;

// ==========================================
// 测试辅助: 预警来源故障的快照来源
// ==========================================

struct FlakyAlertSource {
    inner: StaticSnapshotSource,
    calls: AtomicUsize,
}

impl FlakyAlertSource {
    fn new() -> Self {
        Self {
            inner: StaticSnapshotSource::new(full_bundle()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SnapshotSource for FlakyAlertSource {
    async fn fetch_stock(&self, org_id: &str) -> ApiResult<Vec<RawStockRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_stock(org_id).await
    }

    async fn fetch_movements(&self, org_id: &str, period_days: u32) -> ApiResult<Vec<RawMovementRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_movements(org_id, period_days).await
    }

    async fn fetch_turnover(&self, org_id: &str, period_days: u32) -> ApiResult<Option<RawTurnoverSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_turnover(org_id, period_days).await
    }

    async fn fetch_valuation(
        &self,
        org_id: &str,
        method: ValuationMethod,
    ) -> ApiResult<Vec<RawValuationRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_valuation(org_id, method).await
    }

    async fn fetch_alerts(&self, _org_id: &str) -> ApiResult<Vec<RawAlertRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::SnapshotSourceError("预警服务不可用".to_string()))
    }
}

fn orchestrator_for<S: SnapshotSource>(source: Arc<S>) -> InsightOrchestrator<S> {
    InsightOrchestrator::new(source, InventoryInsightApi::default())
}

// ==========================================
// 测试用例
// ==========================================

#[tokio::test]
async fn test_full_report_all_operations_succeed() {
    inventory_insight::logging::init_test();
    let orchestrator = orchestrator_for(Arc::new(StaticSnapshotSource::new(full_bundle())));
    let options = ReportOptions {
        valuation_method: ValuationMethod::Fifo,
        ..ReportOptions::default()
    };

    let report = orchestrator.run_full_report(TEST_ORG, &options).await;

    println!("报告 {}: 失败操作 {}", report.report_id, report.failed_operations());
    assert_eq!(report.failed_operations(), 0);
    assert!(report.degraded_sources.is_empty());
    assert_eq!(report.org_id, TEST_ORG);
    assert!(!report.report_id.is_empty());

    // health_score 只用上游周转汇总（此处缺失），扣分 5 + 2 + 5 = 12
    let health = report.health_score.data.as_ref().unwrap();
    assert_eq!(health.score, 88);

    let plan = report.reorder_plan.data.as_ref().unwrap();
    assert_eq!(plan.order_count(), 1);
    assert_eq!(plan.budget_status, BudgetStatus::WithinBudget);

    let abc = report.abc_classification.data.as_ref().unwrap();
    assert_eq!(abc.a_class.count, 1);
}

#[tokio::test]
async fn test_report_ids_are_unique() {
    let orchestrator = orchestrator_for(Arc::new(StaticSnapshotSource::new(full_bundle())));
    let options = ReportOptions::default();

    let first = orchestrator.run_full_report(TEST_ORG, &options).await;
    let second = orchestrator.run_full_report(TEST_ORG, &options).await;
    assert_ne!(first.report_id, second.report_id);
}

#[tokio::test]
async fn test_failed_source_degrades_to_empty_snapshot() {
    let source = Arc::new(FlakyAlertSource::new());
    let orchestrator = orchestrator_for(Arc::clone(&source));

    let report = orchestrator
        .run_full_report(TEST_ORG, &ReportOptions::default())
        .await;

    assert_eq!(report.degraded_sources, vec!["alerts".to_string()]);
    assert_eq!(report.failed_operations(), 0, "来源降级不应导致操作失败");
    assert_eq!(source.calls.load(Ordering::SeqCst), 5);

    let plan = report.reorder_plan.data.as_ref().unwrap();
    assert_eq!(plan.order_count(), 0, "无预警时补货计划为空");

    // 缺少紧急预警扣分: 5 + 2 = 7
    assert_eq!(report.health_score.data.as_ref().unwrap().score, 93);
}

#[tokio::test]
async fn test_invalid_org_fails_every_envelope() {
    let source = Arc::new(FlakyAlertSource::new());
    let orchestrator = orchestrator_for(Arc::clone(&source));

    let report = orchestrator.run_full_report("  ", &ReportOptions::default()).await;

    assert_eq!(report.failed_operations(), 6);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0, "org_id 非法时不应访问来源");
    assert_eq!(report.health_score.error_code.as_deref(), Some("INVALID_INPUT"));
    assert_eq!(report.performance_benchmark.error_code.as_deref(), Some("INVALID_INPUT"));
}

#[tokio::test]
async fn test_invalid_option_fails_only_its_envelope() {
    let orchestrator = orchestrator_for(Arc::new(StaticSnapshotSource::new(full_bundle())));
    let options = ReportOptions {
        budget_limit: Some(-10.0),
        ..ReportOptions::default()
    };

    let report = orchestrator.run_full_report(TEST_ORG, &options).await;

    assert_eq!(report.failed_operations(), 1);
    assert!(!report.reorder_plan.success);
    assert_eq!(report.reorder_plan.error_code.as_deref(), Some("INVALID_INPUT"));
    assert!(report.health_analysis.success);
}

#[tokio::test]
async fn test_report_serializes_envelopes() {
    let orchestrator = orchestrator_for(Arc::new(StaticSnapshotSource::new(full_bundle())));
    let report = orchestrator
        .run_full_report(TEST_ORG, &ReportOptions::default())
        .await;

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["health_score"]["success"], true);
    assert!(json["health_score"].get("error").is_none());
    assert!(json["performance_benchmark"]["data"]["kpis"].is_object());
}

#[tokio::test]
async fn test_movements_without_window_use_fetch_window() {
    let bundle = inventory_insight::SnapshotBundle {
        stock: vec![raw_stock("SKU-1", "tools", 100.0, 1000.0, "normal")],
        movements: vec![RawMovementRecord {
            window_days: None,
            ..raw_movement("SKU-1", 100.0, 1000.0, 90)
        }],
        ..Default::default()
    };
    let orchestrator = orchestrator_for(Arc::new(StaticSnapshotSource::new(bundle)));

    let report = orchestrator
        .run_full_report(TEST_ORG, &ReportOptions::default())
        .await;

    let turnover = report.turnover_classification.data.as_ref().unwrap();
    let analysis = report.health_analysis.data.as_ref().unwrap();

    // 取数窗口 90 天: 年化 100 × 365 / 90 / 100 ≈ 4.06 < 6 → 慢周转
    assert_eq!(turnover.overall_metrics.slow_moving_count, 1);
    assert_eq!(
        turnover.overall_metrics.slow_moving_count,
        analysis.summary.slow_moving_count
    );
    assert!(approx_eq(
        turnover.overall_metrics.average_turnover,
        analysis.summary.average_turnover
    ));
}
