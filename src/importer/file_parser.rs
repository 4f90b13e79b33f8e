// ==========================================
// 仓库货位网格系统 - 扫描文件解析器
// ==========================================
// 阶段 0: 文件读取（仅 .csv）
// 阶段 1: 表头方言识别（失败则整次加载失败）
// 阶段 2: 逐行解析（字段不足/CSV 记录错误 → 跳过并记录,不中断）
// ==========================================

use crate::domain::report::SkippedRow;
use crate::domain::scan::{CsvDialect, ScanRecord};
use crate::importer::dialect::{detect_dialect, normalize_header, ColumnMapping};
use crate::importer::error::{ImportError, ImportResult};
use csv::{ReaderBuilder, StringRecord};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

// ==========================================
// ParsedScans - 解析结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ParsedScans {
    pub dialect: CsvDialect,
    pub records: Vec<ScanRecord>,
    pub total_rows: usize,             // 数据行数（不含表头,含被跳过的行）
    pub skipped_rows: Vec<SkippedRow>, // 跳过的行
}

// ==========================================
// ScanCsvParser - CSV 解析器
// ==========================================
pub struct ScanCsvParser;

impl ScanCsvParser {
    /// 读取并解析 CSV 文件
    ///
    /// # 参数
    /// - file_path: CSV 文件路径
    ///
    /// # 返回
    /// - Ok(ParsedScans): 解析结果
    /// - Err: 文件不存在 / 扩展名不支持 / 读取失败 / 缺少必需列
    pub fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedScans> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = file_path.extension() {
            let ext = ext.to_string_lossy();
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(ext.to_string()));
            }
        }

        // 按字节读取: 非 UTF-8 的行由 csv 逐行报错并跳过,不影响整个文件
        let content = fs::read(file_path)?;
        self.parse_bytes(&content)
    }

    /// 解析 CSV 文本内容
    pub fn parse_str(&self, content: &str) -> ImportResult<ParsedScans> {
        self.parse_bytes(content.as_bytes())
    }

    /// 解析 CSV 原始字节（按默认方言识别规则）
    pub fn parse_bytes(&self, content: &[u8]) -> ImportResult<ParsedScans> {
        self.parse_bytes_with(content, detect_dialect)
    }

    /// 解析 CSV 原始字节,表头识别规则由调用方指定
    ///
    /// # 参数
    /// - detect: 表头 → 列映射; 返回 None 视为缺少必需列
    pub fn parse_bytes_with(
        &self,
        content: &[u8],
        detect: fn(&[String]) -> Option<ColumnMapping>,
    ) -> ImportResult<ParsedScans> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(content);

        let mut rows = reader.records();

        // 读取表头
        let header = match rows.next() {
            Some(result) => result?,
            None => return Err(ImportError::MissingHeader),
        };
        let headers: Vec<String> = header.iter().map(normalize_header).collect();

        let mapping = detect(&headers).ok_or_else(|| ImportError::MissingColumns {
            found: headers.join(","),
        })?;
        debug!(dialect = %mapping.dialect, mapping = ?mapping, "识别到文件方言");

        // 读取数据行
        let mut records = Vec::new();
        let mut skipped_rows = Vec::new();
        let mut total_rows = 0usize;

        for result in rows {
            total_rows += 1;
            match result {
                Ok(row) => match map_row(&row, &mapping) {
                    Some(record) => records.push(record),
                    None => {
                        let skipped = SkippedRow {
                            line: line_of(&row),
                            reason: format!(
                                "字段数不足: 需要 {} 列,实际 {} 列",
                                mapping.required_fields(),
                                row.len()
                            ),
                        };
                        warn!(line = skipped.line, reason = %skipped.reason, "跳过格式错误的行");
                        skipped_rows.push(skipped);
                    }
                },
                Err(err) => {
                    let skipped = SkippedRow {
                        line: err.position().map(|p| p.line()).unwrap_or(0),
                        reason: format!("CSV 记录解析失败: {}", err),
                    };
                    warn!(line = skipped.line, reason = %skipped.reason, "跳过无法解析的行");
                    skipped_rows.push(skipped);
                }
            }
        }

        Ok(ParsedScans {
            dialect: mapping.dialect,
            records,
            total_rows,
            skipped_rows,
        })
    }
}

/// 单行映射（字段数不足返回 None; 字段值保持原样）
fn map_row(row: &StringRecord, mapping: &ColumnMapping) -> Option<ScanRecord> {
    if row.len() < mapping.required_fields() {
        return None;
    }

    let timestamp = match mapping.timestamp_idx {
        Some(idx) => Some(row.get(idx)?.to_string()),
        None => None,
    };

    Some(ScanRecord {
        timestamp,
        sku: row.get(mapping.sku_idx)?.to_string(),
        location: row.get(mapping.location_idx)?.to_string(),
    })
}

fn line_of(row: &StringRecord) -> u64 {
    row.position().map(|p| p.line()).unwrap_or(0)
}
