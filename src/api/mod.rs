// ==========================================
// 仓库货位网格系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行与其他调用方使用
// ==========================================

pub mod error;
pub mod warehouse_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use warehouse_api::WarehouseApi;
