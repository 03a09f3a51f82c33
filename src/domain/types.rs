// ==========================================
// 库存洞察引擎 - 领域类型定义
// ==========================================
// 职责: 定义库存状态、紧急等级、周转分层、ABC 分类等枚举
// 序列化格式: snake_case (与外部数据层一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 库存状态 (Stock Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Normal,     // 正常
    Low,        // 低库存
    Critical,   // 临界
    OutOfStock, // 缺货
    Overstock,  // 积压
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Normal => "normal",
            StockStatus::Low => "low",
            StockStatus::Critical => "critical",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::Overstock => "overstock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(StockStatus::Normal),
            "low" | "low_stock" => Ok(StockStatus::Low),
            "critical" | "critical_stock" => Ok(StockStatus::Critical),
            "out_of_stock" | "out-of-stock" | "stockout" => Ok(StockStatus::OutOfStock),
            "overstock" | "over_stock" => Ok(StockStatus::Overstock),
            other => Err(format!("未知库存状态: {}", other)),
        }
    }
}

// ==========================================
// 预警紧急等级 (Urgency Level)
// ==========================================
// 顺序: Critical < High < Medium（越靠前越紧急）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Critical, // 紧急
    High,     // 高
    Medium,   // 中
}

impl UrgencyLevel {
    /// 排序秩（0 = 最紧急）
    pub fn rank(&self) -> u8 {
        match self {
            UrgencyLevel::Critical => 0,
            UrgencyLevel::High => 1,
            UrgencyLevel::Medium => 2,
        }
    }

    /// 是否进入优先订单（critical / high）
    pub fn is_priority(&self) -> bool {
        matches!(self, UrgencyLevel::Critical | UrgencyLevel::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "critical",
            UrgencyLevel::High => "high",
            UrgencyLevel::Medium => "medium",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(UrgencyLevel::Critical),
            "high" => Ok(UrgencyLevel::High),
            "medium" => Ok(UrgencyLevel::Medium),
            other => Err(format!("未知紧急等级: {}", other)),
        }
    }
}

// ==========================================
// 周转表现分层 (Performance Tier)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Fast, // 快周转
    Slow, // 慢周转
    Dead, // 呆滞
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceTier::Fast => write!(f, "fast"),
            PerformanceTier::Slow => write!(f, "slow"),
            PerformanceTier::Dead => write!(f, "dead"),
        }
    }
}

// ==========================================
// ABC 分类 (ABC Class)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbcClass::A => write!(f, "A"),
            AbcClass::B => write!(f, "B"),
            AbcClass::C => write!(f, "C"),
        }
    }
}

// ==========================================
// 分析焦点 (Focus Area)
// ==========================================
// 门控建议规则; Overall 包含全部规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusArea {
    Turnover,
    Valuation,
    Stockouts,
    Overall,
}

impl FocusArea {
    /// 当前焦点是否覆盖指定焦点的规则
    pub fn includes(&self, area: FocusArea) -> bool {
        *self == FocusArea::Overall || *self == area
    }
}

impl Default for FocusArea {
    fn default() -> Self {
        FocusArea::Overall
    }
}

impl FromStr for FocusArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "turnover" => Ok(FocusArea::Turnover),
            "valuation" => Ok(FocusArea::Valuation),
            "stockouts" | "stockout" => Ok(FocusArea::Stockouts),
            "overall" => Ok(FocusArea::Overall),
            other => Err(format!("未知分析焦点: {}", other)),
        }
    }
}

// ==========================================
// 预算状态 (Budget Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    WithinBudget,
    OverBudget,
}

// ==========================================
// 问题严重度 / 建议优先级
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

// ==========================================
// 计价方法 (Valuation Method)
// ==========================================
// 仅用于选择外部提供的估值快照，本引擎不做计价
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    Average,
    Fifo,
    Lifo,
}

impl ValuationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationMethod::Average => "average",
            ValuationMethod::Fifo => "fifo",
            ValuationMethod::Lifo => "lifo",
        }
    }
}

impl Default for ValuationMethod {
    fn default() -> Self {
        ValuationMethod::Average
    }
}

impl FromStr for ValuationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "average" | "avg" => Ok(ValuationMethod::Average),
            "fifo" => Ok(ValuationMethod::Fifo),
            "lifo" => Ok(ValuationMethod::Lifo),
            other => Err(format!("未知计价方法: {}", other)),
        }
    }
}

// ==========================================
// 预警过滤 (Urgency Filter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyFilter {
    All,      // 全部
    Critical, // 仅紧急
    Low,      // 库存低于再订货点
    Reorder,  // 建议立即补货
}

impl Default for UrgencyFilter {
    fn default() -> Self {
        UrgencyFilter::All
    }
}

impl FromStr for UrgencyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(UrgencyFilter::All),
            "critical" => Ok(UrgencyFilter::Critical),
            "low" => Ok(UrgencyFilter::Low),
            "reorder" => Ok(UrgencyFilter::Reorder),
            other => Err(format!("未知预警过滤: {}", other)),
        }
    }
}

// ==========================================
// 对标基准 (Benchmark Profile)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkProfile {
    Industry,    // 行业平均
    BestInClass, // 行业标杆
}

impl Default for BenchmarkProfile {
    fn default() -> Self {
        BenchmarkProfile::Industry
    }
}

impl FromStr for BenchmarkProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "industry" | "industry_average" => Ok(BenchmarkProfile::Industry),
            "best_in_class" | "best-in-class" => Ok(BenchmarkProfile::BestInClass),
            other => Err(format!("未知对标基准: {}", other)),
        }
    }
}

// ==========================================
// 健康等级 (Health Grade)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthGrade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => HealthGrade::Excellent,
            75..=89 => HealthGrade::Good,
            60..=74 => HealthGrade::Fair,
            _ => HealthGrade::Poor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_rank_order() {
        assert!(UrgencyLevel::Critical.rank() < UrgencyLevel::High.rank());
        assert!(UrgencyLevel::High.rank() < UrgencyLevel::Medium.rank());
        assert!(UrgencyLevel::High.is_priority());
        assert!(!UrgencyLevel::Medium.is_priority());
    }

    #[test]
    fn test_stock_status_parse_aliases() {
        assert_eq!("OUT_OF_STOCK".parse::<StockStatus>(), Ok(StockStatus::OutOfStock));
        assert_eq!("low_stock".parse::<StockStatus>(), Ok(StockStatus::Low));
        assert!("broken".parse::<StockStatus>().is_err());
    }

    #[test]
    fn test_focus_area_gating() {
        assert!(FocusArea::Overall.includes(FocusArea::Turnover));
        assert!(FocusArea::Stockouts.includes(FocusArea::Stockouts));
        assert!(!FocusArea::Stockouts.includes(FocusArea::Turnover));
    }

    #[test]
    fn test_health_grade_boundaries() {
        assert_eq!(HealthGrade::from_score(100), HealthGrade::Excellent);
        assert_eq!(HealthGrade::from_score(90), HealthGrade::Excellent);
        assert_eq!(HealthGrade::from_score(75), HealthGrade::Good);
        assert_eq!(HealthGrade::from_score(70), HealthGrade::Fair);
        assert_eq!(HealthGrade::from_score(0), HealthGrade::Poor);
    }
}
