// ==========================================
// 库存洞察引擎 - 策略配置读取 Trait
// ==========================================
// 职责: 定义分析所需的策略读取接口（不包含实现）
// 红线: 不包含业务逻辑
// ==========================================

use crate::config::error::ConfigError;
use crate::config::policy::{BenchmarkTable, PolicyConfig};
use crate::domain::types::BenchmarkProfile;
use async_trait::async_trait;

// ==========================================
// PolicyConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait PolicyConfigReader: Send + Sync {
    /// 获取完整策略配置（默认值 + 覆写，已校验）
    async fn get_policy_config(&self) -> Result<PolicyConfig, ConfigError>;

    /// 获取低周转阈值（次/年）
    ///
    /// # 默认值
    /// - 6.0
    async fn get_low_turnover_threshold(&self) -> Result<f64, ConfigError> {
        Ok(self.get_policy_config().await?.turnover.low_turnover_threshold)
    }

    /// 获取对标表
    async fn get_benchmark_table(
        &self,
        profile: BenchmarkProfile,
    ) -> Result<BenchmarkTable, ConfigError> {
        let policy = self.get_policy_config().await?;
        Ok(policy.benchmark.table(profile).clone())
    }
}
