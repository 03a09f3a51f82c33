// ==========================================
// 库存洞察引擎 - 补货计划引擎
// ==========================================
// 职责: 从预警中挑选补货订单，并在预算约束下确定性分配
// 输入: AlertSnapshot + 可选预算
// 输出: ReorderPlan（订单清单 + 预算状态 + 可选预算分配）
// ==========================================
// 红线: 订单不拆分；超预算时用贪心分配，不保证最优
// 红线: 同一输入必须产出同一计划
// ==========================================

mod plan;
mod planner;


pub use plan::{BudgetOptimization, Order, ReorderPlan};
pub use planner::ReorderPlanner;
