// ==========================================
// 库存洞察引擎 - 配置管理器
// ==========================================
// 职责: 策略配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 口径: 默认值 → policy_json 整体覆写 → 单键覆写 → 校验
// ==========================================

use crate::config::error::ConfigError;
use crate::config::policy::PolicyConfig;
use crate::config::policy_reader::PolicyConfigReader;
use crate::db::{
    configure_sqlite_connection, ensure_config_schema, open_sqlite_connection, GLOBAL_SCOPE_ID,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, ConfigError> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_config_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, ConfigError> {
        {
            let conn_guard = conn.lock().map_err(|e| ConfigError::ConfigReadError {
                key: "*".to_string(),
                message: format!("锁获取失败: {}", e),
            })?;
            configure_sqlite_connection(&conn_guard)?;
            ensure_config_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self, key: &str) -> Result<std::sync::MutexGuard<'_, Connection>, ConfigError> {
        self.conn.lock().map_err(|e| ConfigError::ConfigReadError {
            key: key.to_string(),
            message: format!("锁获取失败: {}", e),
        })
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = self.lock(key)?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE_ID, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let conn = self.lock(key)?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE_ID, key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照（JSON格式，按 key 排序）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        let conn = self.lock("*")?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE_ID], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 加载策略配置
    ///
    /// 1) 默认值
    /// 2) policy_json（完整或部分 JSON）
    /// 3) 单键覆写（见 config_keys）
    /// 4) 校验，非法配置直接拒绝
    pub fn load_policy(&self) -> Result<PolicyConfig, ConfigError> {
        let mut policy = match self.get_global_config_value(config_keys::POLICY_JSON)? {
            Some(raw) => serde_json::from_str::<PolicyConfig>(&raw)?,
            None => PolicyConfig::default(),
        };

        let weights = &mut policy.health_weights;
        self.override_value(config_keys::WEIGHT_OUT_OF_STOCK, &mut weights.out_of_stock)?;
        self.override_value(config_keys::WEIGHT_CRITICAL_STOCK, &mut weights.critical_stock)?;
        self.override_value(config_keys::WEIGHT_LOW_STOCK, &mut weights.low_stock)?;
        self.override_value(config_keys::WEIGHT_OVERSTOCK, &mut weights.overstock)?;
        self.override_value(config_keys::WEIGHT_DEAD_STOCK, &mut weights.dead_stock)?;
        self.override_value(config_keys::WEIGHT_SLOW_MOVING, &mut weights.slow_moving)?;
        self.override_value(config_keys::WEIGHT_CRITICAL_ALERT, &mut weights.critical_alert)?;

        self.override_value(config_keys::ABC_A_MAX_PCT, &mut policy.abc_breakpoints.a_max_pct)?;
        self.override_value(config_keys::ABC_B_MAX_PCT, &mut policy.abc_breakpoints.b_max_pct)?;

        self.override_value(
            config_keys::LOW_TURNOVER_THRESHOLD,
            &mut policy.turnover.low_turnover_threshold,
        )?;
        self.override_value(
            config_keys::DAYS_OF_STOCK_SENTINEL,
            &mut policy.turnover.days_of_stock_sentinel,
        )?;

        self.override_value(
            config_keys::CRITICAL_ALERT_ISSUE_THRESHOLD,
            &mut policy.insight.critical_alert_issue_threshold,
        )?;
        self.override_value(
            config_keys::LOW_TURNOVER_RECOMMENDATION_THRESHOLD,
            &mut policy.insight.low_turnover_recommendation_threshold,
        )?;
        self.override_value(
            config_keys::SKU_RATIONALIZATION_RATIO,
            &mut policy.insight.sku_rationalization_ratio,
        )?;

        self.override_value(
            config_keys::ANNUAL_CARRYING_RATE,
            &mut policy.benchmark.annual_carrying_rate,
        )?;

        policy.validate()?;

        tracing::debug!(policy = ?policy, "策略配置加载完成");
        Ok(policy)
    }

    /// 若配置存在则解析并覆写目标字段；格式错误直接报错
    fn override_value<T>(&self, key: &str, target: &mut T) -> Result<(), ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        if let Some(raw) = self.get_global_config_value(key)? {
            *target = raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::ConfigValueError {
                    key: key.to_string(),
                    value: raw.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }
}

// ==========================================
// PolicyConfigReader Trait 实现
// ==========================================
#[async_trait]
impl PolicyConfigReader for ConfigManager {
    async fn get_policy_config(&self) -> Result<PolicyConfig, ConfigError> {
        self.load_policy()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 整体策略 JSON
    pub const POLICY_JSON: &str = "policy_json";

    // 健康分权重
    pub const WEIGHT_OUT_OF_STOCK: &str = "health_weight_out_of_stock";
    pub const WEIGHT_CRITICAL_STOCK: &str = "health_weight_critical_stock";
    pub const WEIGHT_LOW_STOCK: &str = "health_weight_low_stock";
    pub const WEIGHT_OVERSTOCK: &str = "health_weight_overstock";
    pub const WEIGHT_DEAD_STOCK: &str = "health_weight_dead_stock";
    pub const WEIGHT_SLOW_MOVING: &str = "health_weight_slow_moving";
    pub const WEIGHT_CRITICAL_ALERT: &str = "health_weight_critical_alert";

    // ABC 分界
    pub const ABC_A_MAX_PCT: &str = "abc_a_max_pct";
    pub const ABC_B_MAX_PCT: &str = "abc_b_max_pct";

    // 周转
    pub const LOW_TURNOVER_THRESHOLD: &str = "low_turnover_threshold";
    pub const DAYS_OF_STOCK_SENTINEL: &str = "days_of_stock_sentinel";

    // 问题/建议
    pub const CRITICAL_ALERT_ISSUE_THRESHOLD: &str = "critical_alert_issue_threshold";
    pub const LOW_TURNOVER_RECOMMENDATION_THRESHOLD: &str = "low_turnover_recommendation_threshold";
    pub const SKU_RATIONALIZATION_RATIO: &str = "sku_rationalization_ratio";

    // 对标
    pub const ANNUAL_CARRYING_RATE: &str = "annual_carrying_rate";
}
