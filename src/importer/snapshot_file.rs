// ==========================================
// 库存洞察引擎 - 快照文件加载
// ==========================================
// 职责: 从本地文件读取原始快照
// - .json: 完整 SnapshotBundle（stock/movements/turnover/valuation/alerts）
// - .csv:  仅库存快照（每行一个物料）
// 红线: 只做格式解析，缺省值交给规范化层
// ==========================================

use crate::domain::snapshot::SnapshotBundle;
use crate::domain::stock::RawStockRecord;
use crate::importer::error::ImportError;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ==========================================
// SnapshotFileLoader - 快照文件加载器
// ==========================================
pub struct SnapshotFileLoader;

impl SnapshotFileLoader {
    /// 按扩展名加载快照文件
    pub fn load(path: &Path) -> Result<SnapshotBundle, ImportError> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();

        let bundle = match ext.as_str() {
            "json" => Self::load_json(path)?,
            "csv" => SnapshotBundle {
                stock: Self::load_stock_csv(path)?,
                ..SnapshotBundle::default()
            },
            _ => return Err(ImportError::UnsupportedFormat(ext)),
        };

        tracing::info!(
            path = %path.display(),
            stock = bundle.stock.len(),
            movements = bundle.movements.len(),
            valuation = bundle.valuation.len(),
            alerts = bundle.alerts.len(),
            "快照文件加载完成"
        );
        Ok(bundle)
    }

    /// 读取 JSON 快照集合
    pub fn load_json(path: &Path) -> Result<SnapshotBundle, ImportError> {
        let raw = std::fs::read_to_string(path)?;
        Self::parse_json(&raw)
    }

    pub fn parse_json(raw: &str) -> Result<SnapshotBundle, ImportError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// 读取库存 CSV
    ///
    /// 表头不区分大小写，支持别名（sku / quantity / status）；空单元格视为缺失
    pub fn load_stock_csv(path: &Path) -> Result<Vec<RawStockRecord>, ImportError> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut records = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            // 行号按文件行计（表头为第 1 行）
            let row = row_idx + 2;

            let cells: HashMap<&str, &str> = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.as_str(), v.trim()))
                .filter(|(_, v)| !v.is_empty())
                .collect();

            if cells.is_empty() {
                continue;
            }

            records.push(RawStockRecord {
                item_id: text(&cells, &["item_id", "sku", "id"]),
                name: text(&cells, &["name", "item_name"]),
                category: text(&cells, &["category"]),
                location: text(&cells, &["location", "warehouse"]),
                current_stock: number(&cells, &["current_stock", "quantity", "qty"], row)?,
                unit_cost: number(&cells, &["unit_cost", "cost"], row)?,
                stock_value: number(&cells, &["stock_value", "value"], row)?,
                stock_status: text(&cells, &["stock_status", "status"]),
                reorder_point: number(&cells, &["reorder_point"], row)?,
            });
        }

        Ok(records)
    }
}

fn lookup<'a>(cells: &HashMap<&str, &'a str>, keys: &[&str]) -> Option<(&'static str, &'a str)> {
    keys.iter()
        .find_map(|key| cells.get(key).map(|v| (field_name(key), *v)))
}

fn field_name(key: &str) -> &'static str {
    match key {
        "current_stock" | "quantity" | "qty" => "current_stock",
        "unit_cost" | "cost" => "unit_cost",
        "stock_value" | "value" => "stock_value",
        "reorder_point" => "reorder_point",
        _ => "text",
    }
}

fn text(cells: &HashMap<&str, &str>, keys: &[&str]) -> Option<String> {
    lookup(cells, keys).map(|(_, v)| v.to_string())
}

fn number(cells: &HashMap<&str, &str>, keys: &[&str], row: usize) -> Result<Option<f64>, ImportError> {
    match lookup(cells, keys) {
        Some((field, raw)) => raw
            .replace(',', "")
            .parse::<f64>()
            .map(Some)
            .map_err(|e| ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("'{}' 不是数字: {}", raw, e),
            }),
        None => Ok(None),
    }
}
