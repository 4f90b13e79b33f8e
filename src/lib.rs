// ==========================================
// 仓库货位网格系统 - 核心库
// ==========================================
// 技术栈: Rust + CSV + JSON 配置
// 系统定位: 扫描数据 → 货位网格占用分析（重复 SKU / 空货位 / 搜索 / 导出）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 解码与分析规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态与会话视图
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    CellItem, CellState, CsvDialect, DerivedState, GridCoordinate, GridIndex, GridLayout,
    GridSummary, LoadReport, OccupancyMatrix, ScanRecord, SkuLengthPolicy, WarehouseSnapshot,
};

// 引擎
pub use engine::{
    decode, DerivedStateAnalyzer, ExportFormatter, ExportKind, ExportTable, GridIndexBuilder,
    QueryEngine, SnapshotBuilder,
};

// API
pub use api::{ApiError, ApiResult, WarehouseApi};

// 应用
pub use app::{AppState, ViewState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "仓库货位网格系统";
