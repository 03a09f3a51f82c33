// ==========================================
// 库存洞察引擎 - 导入层
// ==========================================
// 职责: 本地快照文件（JSON / CSV）→ 原始快照集合
// ==========================================

pub mod error;
pub mod snapshot_file;

pub use error::ImportError;
pub use snapshot_file::SnapshotFileLoader;
