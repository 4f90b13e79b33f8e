// ==========================================
// 仓库货位网格系统 - 扫描文件合并
// ==========================================
// 职责: 多份扫描文件 → 去重后的单一扫描数据
// 规则: 仅接受带 Timestamp/SKU/Location 表头的文件,其余文件跳过并记录原因
// 规则: (SKU, 货位码) 唯一,保留首次出现的时间戳,保持首次出现顺序
// ==========================================

use crate::domain::report::UniquenessReport;
use crate::domain::scan::ScanRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::dialect::detect_timestamp_sku_location;
use crate::importer::file_parser::{ParsedScans, ScanCsvParser};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ==========================================
// SkippedFile - 被跳过的文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

// ==========================================
// CombinedScans - 合并结果
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombinedScans {
    pub records: Vec<ScanRecord>,
    pub files_processed: Vec<String>,
    pub files_skipped: Vec<SkippedFile>,
    pub duplicate_rows_dropped: usize,
}

impl CombinedScans {
    /// 写出为 `Timestamp,SKU,Location` CSV 文本
    pub fn to_csv_string(&self) -> ImportResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Timestamp", "SKU", "Location"])?;
        for record in &self.records {
            writer.write_record([
                record.timestamp.as_deref().unwrap_or(""),
                record.sku.as_str(),
                record.location.as_str(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ImportError::InternalError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ImportError::InternalError(e.to_string()))
    }
}

// ==========================================
// ScanCombiner - 合并器
// ==========================================
#[derive(Default)]
pub struct ScanCombiner {
    seen: HashSet<(String, String)>,
    combined: CombinedScans,
}

impl ScanCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并一份文件内容
    ///
    /// # 参数
    /// - content: 文件原始内容（文本或字节; 非 UTF-8 行单独跳过）
    ///
    /// # 返回
    /// - 新增的唯一记录数; 文件被跳过时返回 0（原因记入 files_skipped）
    pub fn add_source(&mut self, name: &str, content: impl AsRef<[u8]>) -> usize {
        let parsed =
            match ScanCsvParser.parse_bytes_with(content.as_ref(), detect_timestamp_sku_location) {
                Ok(parsed) => parsed,
                Err(ImportError::MissingColumns { found }) => {
                    self.skip(
                        name,
                        format!("表头结构不符: 需要 Timestamp/SKU/Location 列（实际表头: {}）", found),
                    );
                    return 0;
                }
                Err(err) => {
                    self.skip(name, err.to_string());
                    return 0;
                }
            };

        let mut added = 0;
        for record in parsed.records {
            let key = (record.sku.clone(), record.location.clone());
            if self.seen.insert(key) {
                self.combined.records.push(record);
                added += 1;
            } else {
                self.combined.duplicate_rows_dropped += 1;
            }
        }

        info!(
            file = name,
            added,
            skipped_rows = parsed.skipped_rows.len(),
            "扫描文件已合并"
        );
        self.combined.files_processed.push(name.to_string());
        added
    }

    /// 合并一个文件
    pub fn add_file(&mut self, path: &Path) -> usize {
        let name = path.display().to_string();
        match fs::read(path) {
            Ok(content) => self.add_source(&name, content),
            Err(err) => {
                self.skip(&name, format!("文件读取失败: {}", err));
                0
            }
        }
    }

    /// 合并目录下全部 .csv 文件（按文件名排序）
    pub fn add_directory(&mut self, dir: &Path) -> ImportResult<usize> {
        if !dir.is_dir() {
            return Err(ImportError::FileNotFound(dir.display().to_string()));
        }

        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
            })
            .collect();
        files.sort();

        info!(dir = %dir.display(), files = files.len(), "开始合并目录");
        Ok(files.iter().map(|path| self.add_file(path)).sum())
    }

    pub fn finish(self) -> CombinedScans {
        self.combined
    }

    fn skip(&mut self, name: &str, reason: String) {
        warn!(file = name, reason = %reason, "跳过扫描文件");
        self.combined.files_skipped.push(SkippedFile {
            name: name.to_string(),
            reason,
        });
    }
}

/// 按解析结果检查唯一性
///
/// # 说明
/// - total_rows 为文件全部数据行（含字段不足被跳过的行）
/// - unique_pairs / all_unique 只在成功解析的记录之间比较
pub fn check_parsed_uniqueness(parsed: &ParsedScans) -> UniquenessReport {
    UniquenessReport {
        total_rows: parsed.total_rows,
        ..check_uniqueness(&parsed.records)
    }
}

/// (SKU, 货位码) 唯一性检查
pub fn check_uniqueness(records: &[ScanRecord]) -> UniquenessReport {
    let unique_pairs = records
        .iter()
        .map(|r| (r.sku.as_str(), r.location.as_str()))
        .collect::<HashSet<_>>()
        .len();

    UniquenessReport {
        total_rows: records.len(),
        unique_pairs,
        all_unique: unique_pairs == records.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_keeps_first_timestamp_and_order() {
        let mut combiner = ScanCombiner::new();
        combiner.add_source(
            "a.csv",
            "Timestamp,SKU,Location\nT1,SKU1,R1A01-N-AT1\nT2,SKU2,R1A02-N-AT1\n",
        );
        combiner.add_source(
            "b.csv",
            "Timestamp,SKU,Location\nT9,SKU1,R1A01-N-AT1\nT3,SKU3,R1A03-N-AT1\n",
        );

        let combined = combiner.finish();

        assert_eq!(combined.records.len(), 3);
        assert_eq!(combined.records[0].timestamp.as_deref(), Some("T1"));
        assert_eq!(combined.records[2].sku, "SKU3");
        assert_eq!(combined.duplicate_rows_dropped, 1);
        assert_eq!(combined.files_processed, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_combine_skips_files_without_timestamp_header() {
        let mut combiner = ScanCombiner::new();
        let added = combiner.add_source("c.csv", "garment_sku,location_id\nSKU1,R1A01\n");
        assert_eq!(added, 0);
        let added = combiner.add_source("d.csv", "foo,bar\n1,2\n");
        assert_eq!(added, 0);

        let combined = combiner.finish();
        assert!(combined.records.is_empty());
        assert_eq!(combined.files_skipped.len(), 2);
        assert_eq!(combined.files_skipped[0].name, "c.csv");
    }

    #[test]
    fn test_combine_accepts_header_with_extra_garment_columns() {
        let mut combiner = ScanCombiner::new();
        let added = combiner.add_source(
            "m.csv",
            "Timestamp,SKU,Location,garment_sku,location_id\nT1,A,R1A01,G,R2B02\n",
        );
        assert_eq!(added, 1);

        let combined = combiner.finish();
        assert!(combined.files_skipped.is_empty());
        assert_eq!(
            combined.records[0],
            ScanRecord::new(Some("T1".into()), "A", "R1A01")
        );
    }

    #[test]
    fn test_combine_skips_non_utf8_rows_only() {
        let mut combiner = ScanCombiner::new();
        let added = combiner.add_source(
            "latin1.csv",
            &b"Timestamp,SKU,Location\nT1,CAF\xe9,R1A01\nT2,SKU2,R1A02\n"[..],
        );
        assert_eq!(added, 1);
        assert_eq!(combiner.finish().records[0].sku, "SKU2");
    }

    #[test]
    fn test_parsed_uniqueness_counts_every_data_row() {
        let parsed = ScanCsvParser
            .parse_str("Timestamp,SKU,Location\nT1,A,R1A01\nT2,B\nT3,A,R1A02\n")
            .unwrap();
        let report = check_parsed_uniqueness(&parsed);
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.unique_pairs, 2);
        assert!(report.all_unique);
    }

    #[test]
    fn test_combined_csv_output() {
        let mut combiner = ScanCombiner::new();
        combiner.add_source("a.csv", "Timestamp,SKU,Location\nT1,SKU1,R1A01-N-AT1\n");

        let csv_text = combiner.finish().to_csv_string().unwrap();
        assert_eq!(csv_text, "Timestamp,SKU,Location\nT1,SKU1,R1A01-N-AT1\n");
    }

    #[test]
    fn test_check_uniqueness() {
        let records = vec![
            ScanRecord::new(None, "A", "R1A01"),
            ScanRecord::new(None, "A", "R1A01"),
            ScanRecord::new(None, "B", "R1A01"),
        ];

        let report = check_uniqueness(&records);
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.unique_pairs, 2);
        assert!(!report.all_unique);

        assert!(check_uniqueness(&records[1..]).all_unique);
    }
}
