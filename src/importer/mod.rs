// ==========================================
// 仓库货位网格系统 - 导入层
// ==========================================
// 职责: 外部扫描文件读取、方言识别、逐行解析、多文件合并
// 支持: CSV
// ==========================================

// 模块声明
pub mod combiner;
pub mod dialect;
pub mod error;
pub mod file_parser;

// 重导出核心类型
pub use combiner::{check_parsed_uniqueness, check_uniqueness, CombinedScans, ScanCombiner, SkippedFile};
pub use dialect::{detect_dialect, ColumnMapping};
pub use error::{ImportError, ImportResult};
pub use file_parser::{ParsedScans, ScanCsvParser};
