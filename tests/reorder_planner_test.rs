// ==========================================
// ReorderPlanner 补货计划集成测试
// ==========================================
// 测试目标: 预算分配、预算校验、预警过滤
// ==========================================


use inventory_insight::api::ReorderOptions;
use inventory_insight::domain::{BudgetStatus, UrgencyFilter};
use inventory_insight::InventoryInsightApi;
use test_helpers::*;

fn plan_with_budget(budget_limit: Option<f64>) -> inventory_insight::engine::ReorderPlan {
    InventoryInsightApi::default()
        .reorder_plan(
            TEST_ORG,
            &reorder_scenario_alerts(),
            &ReorderOptions {
                budget_limit,
                urgency: UrgencyFilter::All,
            },
        )
        .expect("补货计划应成功")
}

#[test]
fn test_over_budget_greedy_allocation() {
    let plan = plan_with_budget(Some(300.0));

    assert!(approx_eq(plan.total_cost, 450.0));
    assert_eq!(plan.budget_status, BudgetStatus::OverBudget);
    assert_eq!(plan.priority_orders.len(), 2);
    assert_eq!(plan.regular_orders.len(), 1);

    let opt = plan.budget_optimization.expect("超预算时应给出分配结果");
    let accepted: Vec<&str> = opt.optimized_orders.iter().map(|o| o.item_id.as_str()).collect();
    let deferred: Vec<&str> = opt.deferred_orders.iter().map(|o| o.item_id.as_str()).collect();

    println!("接受: {:?}, 顺延: {:?}", accepted, deferred);
    assert_eq!(accepted, vec!["SKU-C", "SKU-M"]);
    assert_eq!(deferred, vec!["SKU-H"]);
    assert_eq!(opt.deferred_count, 1);
    assert!(approx_eq(opt.allocated_cost, 300.0));
    assert!(approx_eq(opt.remaining_budget, 0.0));
}

#[test]
fn test_allocation_never_exceeds_budget() {
    for budget in [0.0, 50.0, 100.0, 199.0, 250.0, 349.0, 449.0, 450.0, 1000.0] {
        let plan = plan_with_budget(Some(budget));

        match plan.budget_status {
            BudgetStatus::WithinBudget => {
                assert!(plan.total_cost <= budget, "预算 {} 内却总成本 {}", budget, plan.total_cost);
                assert!(plan.budget_optimization.is_none());
            }
            BudgetStatus::OverBudget => {
                let opt = plan.budget_optimization.as_ref().unwrap();
                assert!(opt.allocated_cost <= budget + 1e-9, "分配金额超过预算 {}", budget);
                assert_eq!(
                    opt.optimized_orders.len() + opt.deferred_orders.len(),
                    plan.order_count()
                );
            }
        }
    }
}

#[test]
fn test_no_budget_is_within_budget() {
    let plan = plan_with_budget(None);
    assert_eq!(plan.budget_status, BudgetStatus::WithinBudget);
    assert!(approx_eq(plan.committed_cost(), 450.0));
}

#[test]
fn test_invalid_budget_rejected() {
    let api = InventoryInsightApi::default();
    for budget in [-1.0, f64::NAN, f64::INFINITY] {
        let err = api
            .reorder_plan(
                TEST_ORG,
                &reorder_scenario_alerts(),
                &ReorderOptions {
                    budget_limit: Some(budget),
                    urgency: UrgencyFilter::All,
                },
            )
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT", "预算 {} 应被拒绝", budget);
    }
}

#[test]
fn test_urgency_filter_applied_before_planning() {
    let api = InventoryInsightApi::default();
    let plan = api
        .reorder_plan(
            TEST_ORG,
            &reorder_scenario_alerts(),
            &ReorderOptions {
                budget_limit: None,
                urgency: UrgencyFilter::Critical,
            },
        )
        .unwrap();

    assert_eq!(plan.order_count(), 1);
    assert_eq!(plan.items_to_reorder[0].item_id, "SKU-C");
    assert!(approx_eq(plan.total_cost, 200.0));
}

#[test]
fn test_alerts_without_reorder_flag_excluded() {
    let api = InventoryInsightApi::default();
    let alerts = vec![
        raw_alert("SKU-1", "high", 80.0, false),
        raw_alert("SKU-2", "medium", 40.0, true),
    ];

    let plan = api
        .reorder_plan(TEST_ORG, &alerts, &ReorderOptions::default())
        .unwrap();
    assert_eq!(plan.order_count(), 1);
    assert_eq!(plan.regular_orders[0].item_id, "SKU-2");
    assert!(plan.priority_orders.is_empty());
}

#[test]
fn test_empty_org_rejected() {
    let err = InventoryInsightApi::default()
        .reorder_plan("", &reorder_scenario_alerts(), &ReorderOptions::default())
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_INPUT");
}
