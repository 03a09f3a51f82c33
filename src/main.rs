// ==========================================
// 库存洞察引擎 - 命令行入口
// ==========================================
// 用法:
//   inventory-insight <snapshot.json|stock.csv> [--org ID] [--focus AREA]
//       [--budget N] [--period DAYS] [--urgency FILTER] [--benchmark PROFILE]
//       [--valuation METHOD] [--config-db PATH] [--log-json]
// 输出: 完整洞察报告 JSON（stdout）
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use inventory_insight::config::ConfigManager;
use inventory_insight::db::get_default_config_db_path;
use inventory_insight::importer::SnapshotFileLoader;
use inventory_insight::{
    logging, InsightOrchestrator, InventoryInsightApi, PolicyConfig, ReportOptions,
    StaticSnapshotSource,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

const DEFAULT_ORG_ID: &str = "default";

struct CliArgs {
    snapshot_path: PathBuf,
    org_id: String,
    config_db: Option<String>,
    log_json: bool,
    options: ReportOptions,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);

    let mut snapshot_path = None;
    let mut org_id = DEFAULT_ORG_ID.to_string();
    let mut config_db = None;
    let mut log_json = false;
    let mut options = ReportOptions::default();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| anyhow!("参数 {} 缺少取值", flag))
        };

        match arg.as_str() {
            "--org" => org_id = value("--org")?,
            "--focus" => options.focus_area = parse_flag("--focus", &value("--focus")?)?,
            "--urgency" => options.urgency = parse_flag("--urgency", &value("--urgency")?)?,
            "--benchmark" => {
                options.benchmark_against = parse_flag("--benchmark", &value("--benchmark")?)?
            }
            "--valuation" => {
                options.valuation_method = parse_flag("--valuation", &value("--valuation")?)?
            }
            "--budget" => {
                let raw = value("--budget")?;
                let budget = raw
                    .parse::<f64>()
                    .with_context(|| format!("--budget 不是数字: {}", raw))?;
                options.budget_limit = Some(budget);
            }
            "--period" => {
                let raw = value("--period")?;
                let days = raw
                    .parse::<u32>()
                    .with_context(|| format!("--period 不是正整数: {}", raw))?;
                options.period_days = Some(days);
            }
            "--config-db" => config_db = Some(value("--config-db")?),
            "--log-json" => log_json = true,
            flag if flag.starts_with("--") => bail!("未知参数: {}", flag),
            path => {
                if snapshot_path.replace(PathBuf::from(path)).is_some() {
                    bail!("只能指定一个快照文件");
                }
            }
        }
    }

    let snapshot_path = snapshot_path.ok_or_else(|| {
        anyhow!("用法: inventory-insight <snapshot.json|stock.csv> [--org ID] [--focus AREA] [--budget N] [--period DAYS] [--config-db PATH]")
    })?;

    Ok(CliArgs {
        snapshot_path,
        org_id,
        config_db,
        log_json,
        options,
    })
}

fn parse_flag<T>(flag: &str, raw: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>().map_err(|e| anyhow!("{} 取值非法: {}", flag, e))
}

/// 加载策略配置：配置库存在时读取覆写，否则使用默认值
fn load_policy(config_db: Option<String>) -> Result<PolicyConfig> {
    let explicit = config_db.is_some();
    let db_path = config_db.unwrap_or_else(get_default_config_db_path);

    if !Path::new(&db_path).exists() {
        if explicit {
            bail!("配置库不存在: {}", db_path);
        }
        tracing::info!(db_path = %db_path, "未找到配置库，使用默认策略");
        return Ok(PolicyConfig::default());
    }

    let manager = ConfigManager::new(&db_path)
        .with_context(|| format!("无法打开配置库: {}", db_path))?;
    let policy = manager
        .load_policy()
        .with_context(|| format!("策略配置非法: {}", db_path))?;

    tracing::info!(db_path = %db_path, "策略配置已加载");
    Ok(policy)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    if args.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("{} v{}", inventory_insight::APP_NAME, inventory_insight::VERSION);

    let policy = load_policy(args.config_db)?;
    let bundle = SnapshotFileLoader::load(&args.snapshot_path)
        .with_context(|| format!("无法加载快照文件: {}", args.snapshot_path.display()))?;

    let orchestrator = InsightOrchestrator::new(
        Arc::new(StaticSnapshotSource::new(bundle)),
        InventoryInsightApi::new(policy),
    );
    let report = orchestrator.run_full_report(&args.org_id, &args.options).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
