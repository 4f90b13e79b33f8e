// ==========================================
// 仓库货位网格系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 这里只放"整次加载失败"的错误; 单行格式错误记为 SkippedRow,不走错误通道
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 表头错误 =====
    #[error("CSV 文件为空: 缺少表头行")]
    MissingHeader,

    #[error("CSV 文件缺少必需列: 需要 'garment_sku' 与 'location_id' 列,或 'Timestamp'/'SKU'/'Location' 列（实际表头: {found}）")]
    MissingColumns { found: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
