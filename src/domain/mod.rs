// ==========================================
// 仓库货位网格系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、判定规则
// 红线: 不含文件读取逻辑,不含引擎逻辑
// ==========================================

pub mod grid;
pub mod layout;
pub mod report;
pub mod scan;
pub mod snapshot;
pub mod state;
pub mod view;

// 重导出核心类型
pub use grid::{BinEntry, GridCoordinate, GridIndex};
pub use layout::GridLayout;
pub use report::{LoadReport, SkippedRow, UniquenessReport};
pub use scan::{is_empty_sku, CsvDialect, ScanRecord};
pub use snapshot::WarehouseSnapshot;
pub use state::{DerivedState, SkuLengthPolicy};
pub use view::{CellItem, CellState, GridSummary, OccupancyCell, OccupancyMatrix};
