// ==========================================
// 库存洞察引擎 - 操作选项 DTO
// ==========================================
// 职责: 各操作的可选参数（serde 缺省值）与边界校验
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::{BenchmarkProfile, FocusArea, UrgencyFilter, ValuationMethod};
use serde::{Deserialize, Serialize};

/// 观察窗口上限（天）
pub const MAX_PERIOD_DAYS: u32 = 3650;

/// analyze_health 默认窗口
pub const DEFAULT_HEALTH_PERIOD_DAYS: u32 = 30;

/// 周转 / 对标默认窗口
pub const DEFAULT_TURNOVER_PERIOD_DAYS: u32 = 90;

fn default_health_period() -> u32 {
    DEFAULT_HEALTH_PERIOD_DAYS
}

fn default_turnover_period() -> u32 {
    DEFAULT_TURNOVER_PERIOD_DAYS
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbcOptions {
    pub valuation_method: ValuationMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnoverOptions {
    #[serde(default = "default_turnover_period")]
    pub period_days: u32,
}

impl Default for TurnoverOptions {
    fn default() -> Self {
        Self {
            period_days: DEFAULT_TURNOVER_PERIOD_DAYS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderOptions {
    pub budget_limit: Option<f64>,
    pub urgency: UrgencyFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeHealthOptions {
    #[serde(default = "default_health_period")]
    pub period_days: u32,
    #[serde(default)]
    pub focus_area: FocusArea,
}

impl Default for AnalyzeHealthOptions {
    fn default() -> Self {
        Self {
            period_days: DEFAULT_HEALTH_PERIOD_DAYS,
            focus_area: FocusArea::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkOptions {
    #[serde(default = "default_turnover_period")]
    pub period_days: u32,
    #[serde(default)]
    pub benchmark_against: BenchmarkProfile,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            period_days: DEFAULT_TURNOVER_PERIOD_DAYS,
            benchmark_against: BenchmarkProfile::default(),
        }
    }
}

/// 完整报告选项（period_days 缺省时各操作取各自默认值）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub period_days: Option<u32>,
    pub valuation_method: ValuationMethod,
    pub focus_area: FocusArea,
    pub urgency: UrgencyFilter,
    pub budget_limit: Option<f64>,
    pub benchmark_against: BenchmarkProfile,
}

impl ReportOptions {
    pub fn abc(&self) -> AbcOptions {
        AbcOptions {
            valuation_method: self.valuation_method,
        }
    }

    pub fn turnover(&self) -> TurnoverOptions {
        TurnoverOptions {
            period_days: self.period_days.unwrap_or(DEFAULT_TURNOVER_PERIOD_DAYS),
        }
    }

    pub fn reorder(&self) -> ReorderOptions {
        ReorderOptions {
            budget_limit: self.budget_limit,
            urgency: self.urgency,
        }
    }

    pub fn analyze_health(&self) -> AnalyzeHealthOptions {
        AnalyzeHealthOptions {
            period_days: self.period_days.unwrap_or(DEFAULT_HEALTH_PERIOD_DAYS),
            focus_area: self.focus_area,
        }
    }

    pub fn benchmark(&self) -> BenchmarkOptions {
        BenchmarkOptions {
            period_days: self.period_days.unwrap_or(DEFAULT_TURNOVER_PERIOD_DAYS),
            benchmark_against: self.benchmark_against,
        }
    }
}

// ==========================================
// 边界校验
// ==========================================

pub fn validate_org_id(org_id: &str) -> ApiResult<()> {
    if org_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("org_id 不能为空".to_string()));
    }
    Ok(())
}

pub fn validate_period_days(period_days: u32) -> ApiResult<()> {
    if period_days == 0 || period_days > MAX_PERIOD_DAYS {
        return Err(ApiError::InvalidInput(format!(
            "period_days 应在 1..={} 内，实际 {}",
            MAX_PERIOD_DAYS, period_days
        )));
    }
    Ok(())
}

pub fn validate_budget(budget_limit: Option<f64>) -> ApiResult<()> {
    match budget_limit {
        Some(budget) if !budget.is_finite() || budget < 0.0 => Err(ApiError::InvalidInput(format!(
            "budget_limit 必须为非负有限数，实际 {}",
            budget
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_defaults_from_empty_json() {
        let health: AnalyzeHealthOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(health.period_days, 30);
        assert_eq!(health.focus_area, FocusArea::Overall);

        let bench: BenchmarkOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(bench.period_days, 90);
        assert_eq!(bench.benchmark_against, BenchmarkProfile::Industry);

        let reorder: ReorderOptions =
            serde_json::from_str(r#"{"budget_limit": 500, "urgency": "critical"}"#).unwrap();
        assert_eq!(reorder.budget_limit, Some(500.0));
        assert_eq!(reorder.urgency, UrgencyFilter::Critical);
    }

    #[test]
    fn test_report_options_period_fallbacks() {
        let options = ReportOptions::default();
        assert_eq!(options.analyze_health().period_days, 30);
        assert_eq!(options.turnover().period_days, 90);

        let options = ReportOptions {
            period_days: Some(60),
            ..ReportOptions::default()
        };
        assert_eq!(options.analyze_health().period_days, 60);
        assert_eq!(options.benchmark().period_days, 60);
    }

    #[test]
    fn test_boundary_validation() {
        assert!(validate_org_id("  ").is_err());
        assert!(validate_org_id("org-1").is_ok());
        assert!(validate_period_days(0).is_err());
        assert!(validate_period_days(3651).is_err());
        assert!(validate_period_days(365).is_ok());
        assert!(validate_budget(Some(-1.0)).is_err());
        assert!(validate_budget(Some(f64::NAN)).is_err());
        assert!(validate_budget(Some(0.0)).is_ok());
        assert!(validate_budget(None).is_ok());
    }
}
