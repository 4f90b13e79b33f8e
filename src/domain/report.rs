// ==========================================
// 仓库货位网格系统 - 加载报告
// ==========================================
// 职责: 加载批次汇总 + 跳过行明细 + 唯一性检查结果
// ==========================================

use crate::domain::scan::CsvDialect;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// SkippedRow - 被跳过的数据行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub line: u64,      // 源文件行号（1 起,含表头）
    pub reason: String, // 跳过原因
}

// ==========================================
// LoadReport - 加载结果
// ==========================================
// 用途: load 接口返回值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub batch_id: String,                 // 批次 ID
    pub source: String,                   // 来源（文件路径或调用方给定的名称）
    pub dialect: CsvDialect,              // 识别出的文件方言
    pub loaded_at: DateTime<Utc>,         // 加载时间
    pub total_rows: usize,                // 数据行总数（不含表头）
    pub loaded_records: usize,            // 保留的记录数
    pub indexed_records: usize,           // 可解码并入网格的记录数
    pub unindexed_records: usize,         // 货位不可解码的记录数
    pub skipped_rows: Vec<SkippedRow>,    // 跳过的行
    pub elapsed_time: std::time::Duration, // 加载耗时
}

// ==========================================
// UniquenessReport - (SKU, 货位) 唯一性检查
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquenessReport {
    pub total_rows: usize,
    pub unique_pairs: usize,
    pub all_unique: bool,
}
