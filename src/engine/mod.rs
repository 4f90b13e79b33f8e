// ==========================================
// 仓库货位网格系统 - 引擎层
// ==========================================
// 职责: 货位解码、网格索引、派生状态、查询、导出
// 红线: 引擎不读文件,输入一律为内存中的记录/快照
// ==========================================

pub mod analyzer;
pub mod export;
pub mod grid_builder;
pub mod location_decoder;
pub mod query;
pub mod snapshot_builder;

// 重导出核心引擎
pub use analyzer::DerivedStateAnalyzer;
pub use export::{ExportError, ExportFormatter, ExportKind, ExportTable};
pub use grid_builder::GridIndexBuilder;
pub use location_decoder::decode;
pub use query::QueryEngine;
pub use snapshot_builder::SnapshotBuilder;
