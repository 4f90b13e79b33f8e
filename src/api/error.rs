// ==========================================
// 仓库货位网格系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,把导入/配置/导出错误转换为调用方可读的错误消息
// 红线: 加载失败必须带显式原因,且不影响当前快照
// ==========================================

use crate::config::ConfigError;
use crate::engine::export::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式错误: {0}")]
    FileFormatError(String),

    // ==========================================
    // 配置 / 导出错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::FileNotFound(path),
            ImportError::UnsupportedFormat(_)
            | ImportError::MissingHeader
            | ImportError::MissingColumns { .. } => ApiError::FileFormatError(err.to_string()),
            ImportError::InternalError(msg) => ApiError::InternalError(msg),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;
