// ==========================================
// 仓库货位网格系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::WarehouseApi;
use crate::config::{ConfigManager, ConfigResult};

/// 应用状态
///
/// 包含配置与API实例; 视图状态（ViewState）按会话另行持有
pub struct AppState {
    /// 配置文件路径
    pub config_path: PathBuf,

    /// 配置管理器
    pub config: Arc<ConfigManager>,

    /// 仓库API
    pub warehouse_api: Arc<WarehouseApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - config_path: 配置文件路径（不存在时使用默认配置）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(ConfigError): 配置文件无法读取或格式错误
    pub fn new(config_path: PathBuf) -> ConfigResult<Self> {
        tracing::info!("初始化AppState，配置路径: {}", config_path.display());

        let config = Arc::new(ConfigManager::new(&config_path)?);
        let warehouse_api = Arc::new(WarehouseApi::new(config.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            config_path,
            config,
            warehouse_api,
        })
    }

    /// 使用内存配置创建（不读写配置文件）
    pub fn in_memory() -> Self {
        let config = Arc::new(ConfigManager::in_memory());
        let warehouse_api = Arc::new(WarehouseApi::new(config.clone()));
        Self {
            config_path: PathBuf::new(),
            config,
            warehouse_api,
        }
    }
}

// ==========================================
// 默认配置路径辅助函数
// ==========================================

/// 获取默认配置文件路径
///
/// # 返回
/// - 环境变量 WAREHOUSE_GRID_CONFIG_PATH（非空时）
/// - 否则: 用户配置目录/warehouse-grid/config.json
/// - 无法获取用户配置目录时: ./warehouse_grid_config.json
pub fn get_default_config_path() -> PathBuf {
    // 允许通过环境变量显式指定配置路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("WAREHOUSE_GRID_CONFIG_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(config_dir) => config_dir.join("warehouse-grid").join("config.json"),
        None => PathBuf::from("./warehouse_grid_config.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_config_path() {
        let path = get_default_config_path();
        assert!(!path.as_os_str().is_empty());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }

    #[test]
    fn test_new_with_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path().join("config.json")).unwrap();
        assert!(state.warehouse_api.duplicates().unwrap().is_empty());
        assert!(!state.config_path.exists());
    }
}
