// ==========================================
// 仓库货位网格系统 - 配置层
// ==========================================
// 职责: 系统配置管理（重复判定策略 / 网格布局 / 导出格式）
// 存储: JSON 配置文件
// ==========================================

pub mod analysis_config_trait;
pub mod config_manager;
pub mod error;

// 重导出核心配置管理器
pub use analysis_config_trait::AnalysisConfigReader;
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
