// ==========================================
// 仓库货位网格系统 - 配置模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读写失败: {0}")]
    IoError(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("锁获取失败: {0}")]
    LockError(String),

    #[error("未指定配置文件路径,无法保存")]
    PathNotSet,
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
