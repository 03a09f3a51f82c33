// ==========================================
// TurnoverClassifier 周转分类集成测试
// ==========================================
// 测试目标: 分层规则、哨兵值、品类汇总、幂等性、窗口校验
// ==========================================


use inventory_insight::api::TurnoverOptions;
use inventory_insight::domain::PerformanceTier;
use inventory_insight::InventoryInsightApi;
use test_helpers::*;

fn classify(
    stock: &[inventory_insight::domain::RawStockRecord],
    movements: &[inventory_insight::domain::RawMovementRecord],
    period_days: u32,
) -> inventory_insight::engine::TurnoverClassification {
    InventoryInsightApi::default()
        .turnover_classification(TEST_ORG, stock, movements, &TurnoverOptions { period_days })
        .expect("周转分类应成功")
}

#[test]
fn test_tiers_fast_slow_dead() {
    let stock = vec![
        raw_stock("FAST", "tools", 10.0, 100.0, "normal"),
        raw_stock("SLOW", "tools", 100.0, 1000.0, "normal"),
        raw_stock("DEAD", "parts", 50.0, 500.0, "normal"),
    ];
    // 90 天窗口: FAST 出库 90 → 年化 365 / 平均在库 10 = 36.5
    //            SLOW 出库 90 → 年化 365 / 平均在库 100 = 3.65
    let movements = vec![
        raw_movement("FAST", 90.0, 900.0, 90),
        raw_movement("SLOW", 90.0, 900.0, 90),
    ];

    let result = classify(&stock, &movements, 90);
    let tier_of = |id: &str| {
        result
            .items
            .iter()
            .find(|i| i.item_id == id)
            .map(|i| i.tier)
            .unwrap()
    };

    assert_eq!(tier_of("FAST"), PerformanceTier::Fast);
    assert_eq!(tier_of("SLOW"), PerformanceTier::Slow);
    assert_eq!(tier_of("DEAD"), PerformanceTier::Dead);

    let overall = &result.overall_metrics;
    assert_eq!(overall.total_items, 3);
    assert_eq!(overall.fast_moving_count, 1);
    assert_eq!(overall.slow_moving_count, 1);
    assert_eq!(overall.dead_stock_count, 1);
    assert!(approx_eq(overall.dead_stock_value, 500.0));
    assert!(approx_eq(overall.slow_moving_value, 1000.0));
    assert!(approx_eq(overall.optimization_potential, 1500.0));
    assert!(approx_eq(overall.average_turnover, (36.5 + 3.65 + 0.0) / 3.0));
}

#[test]
fn test_zero_usage_uses_sentinel() {
    let stock = vec![raw_stock("IDLE", "tools", 25.0, 250.0, "normal")];
    let result = classify(&stock, &[], 90);

    let item = &result.items[0];
    assert_eq!(item.turnover_rate, 0.0);
    assert_eq!(item.days_of_stock, 999.0, "无出库时可用天数应为哨兵值");
    assert_eq!(item.tier, PerformanceTier::Dead);
}

#[test]
fn test_days_of_stock() {
    let stock = vec![raw_stock("SKU-1", "tools", 60.0, 600.0, "normal")];
    let movements = vec![raw_movement("SKU-1", 90.0, 900.0, 90)];

    let result = classify(&stock, &movements, 90);
    // 日均出库 1 → 60 天
    assert!(approx_eq(result.items[0].days_of_stock, 60.0));
}

#[test]
fn test_category_summary_and_item_order() {
    let stock = vec![
        raw_stock("Z-1", "tools", 10.0, 100.0, "normal"),
        raw_stock("A-1", "parts", 10.0, 100.0, "normal"),
        raw_stock("M-1", "tools", 10.0, 100.0, "normal"),
    ];
    let movements = vec![raw_movement("Z-1", 90.0, 900.0, 90)];

    let result = classify(&stock, &movements, 90);

    let ids: Vec<&str> = result.items.iter().map(|i| i.item_id.as_str()).collect();
    assert_eq!(ids, vec!["A-1", "M-1", "Z-1"]);

    assert_eq!(result.category_summary.len(), 2);
    let tools = &result.category_summary[1];
    assert_eq!(tools.category, "tools");
    assert_eq!(tools.item_count, 2);
    assert_eq!(tools.fast_moving_count, 1);
    assert_eq!(tools.dead_stock_count, 1);
}

#[test]
fn test_classification_idempotent() {
    let stock = vec![
        raw_stock("SKU-1", "tools", 10.0, 100.0, "normal"),
        raw_stock("SKU-2", "parts", 30.0, 300.0, "low"),
    ];
    let movements = vec![raw_movement("SKU-1", 12.0, 120.0, 30)];

    let first = classify(&stock, &movements, 30);
    let second = classify(&stock, &movements, 30);
    assert_eq!(first, second, "同一输入应产出同一结果");
}

#[test]
fn test_invalid_period_rejected() {
    let api = InventoryInsightApi::default();
    for period_days in [0, 3651] {
        let err = api
            .turnover_classification(TEST_ORG, &[], &[], &TurnoverOptions { period_days })
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }
}
