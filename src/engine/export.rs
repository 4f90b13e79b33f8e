// ==========================================
// 仓库货位网格系统 - 导出格式化器
// ==========================================
// 职责: 重复 SKU / 空货位 / 单元格明细 → 表格数据 → CSV 文本
// 红线: 外层按 key 升序,内层货位码升序,数据不变则导出字节级一致
// ==========================================

use crate::domain::grid::GridCoordinate;
use crate::domain::scan::is_empty_sku;
use crate::domain::snapshot::WarehouseSnapshot;
use crate::engine::location_decoder::{decode, is_decodable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

/// 默认货位码拼接分隔符
pub const DEFAULT_BIN_SEPARATOR: &str = ", ";

/// 导出错误
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写出失败: {0}")]
    CsvWriteError(#[from] csv::Error),

    #[error("缓冲区写出失败: {0}")]
    IoError(#[from] std::io::Error),

    #[error("导出内容编码错误: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),
}

// ==========================================
// ExportKind - 导出类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportKind {
    DuplicateSkus,
    EmptyBins,
    CellDetail(GridCoordinate),
}

impl ExportKind {
    /// 默认导出文件名
    pub fn default_file_name(&self) -> String {
        match self {
            ExportKind::DuplicateSkus => "duplicate_skus.csv".to_string(),
            ExportKind::EmptyBins => "empty_bins.csv".to_string(),
            ExportKind::CellDetail(coordinate) => format!("cell_{}.csv", coordinate.key()),
        }
    }
}

// ==========================================
// ExportTable - 表格数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 渲染为 CSV 文本（含表头）
    pub fn to_csv_string(&self) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }
}

// ==========================================
// ExportFormatter - 导出格式化器
// ==========================================
pub struct ExportFormatter {
    separator: String,
}

impl ExportFormatter {
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn export(&self, snapshot: &WarehouseSnapshot, kind: &ExportKind) -> ExportTable {
        let table = match kind {
            ExportKind::DuplicateSkus => self.duplicate_skus_table(snapshot),
            ExportKind::EmptyBins => self.empty_bins_table(snapshot),
            ExportKind::CellDetail(coordinate) => self.cell_detail_table(snapshot, coordinate),
        };
        info!(kind = ?kind, rows = table.rows.len(), "导出表格生成完成");
        table
    }

    /// 重复 SKU 导出: SKU → 该 SKU 全部可解码货位码
    pub fn duplicate_skus_table(&self, snapshot: &WarehouseSnapshot) -> ExportTable {
        let duplicates = &snapshot.derived.duplicate_skus;
        let mut grouped: BTreeMap<&str, Vec<&str>> = duplicates
            .iter()
            .map(|sku| (sku.as_str(), Vec::new()))
            .collect();

        for record in &snapshot.records {
            if !is_decodable(&record.location) {
                continue;
            }
            if let Some(bins) = grouped.get_mut(record.sku.as_str()) {
                bins.push(record.location.as_str());
            }
        }

        let mut table = ExportTable::new(&["SKU", "Bin Locations"]);
        table.rows = grouped
            .into_iter()
            .map(|(sku, bins)| vec![sku.to_string(), self.join_sorted(bins)])
            .collect();
        table
    }

    /// 空货位导出: 网格位置 → 该坐标下全部空货位码
    pub fn empty_bins_table(&self, snapshot: &WarehouseSnapshot) -> ExportTable {
        let mut grouped: BTreeMap<String, Vec<&str>> = BTreeMap::new();

        for record in &snapshot.records {
            if !is_empty_sku(&record.sku) {
                continue;
            }
            if let Some(coordinate) = decode(&record.location) {
                grouped
                    .entry(coordinate.key())
                    .or_default()
                    .push(record.location.as_str());
            }
        }

        let mut table = ExportTable::new(&["Grid Location", "Bin Locations"]);
        table.rows = grouped
            .into_iter()
            .map(|(key, bins)| vec![key, self.join_sorted(bins)])
            .collect();
        table
    }

    /// 单元格明细导出（索引顺序）
    pub fn cell_detail_table(
        &self,
        snapshot: &WarehouseSnapshot,
        coordinate: &GridCoordinate,
    ) -> ExportTable {
        let mut table = ExportTable::new(&["SKU", "Bin Location"]);
        table.rows = snapshot
            .index
            .entries(coordinate)
            .iter()
            .map(|entry| vec![entry.sku.clone(), entry.bin_code.clone()])
            .collect();
        table
    }

    fn join_sorted(&self, mut bins: Vec<&str>) -> String {
        bins.sort_unstable();
        bins.join(&self.separator)
    }
}

impl Default for ExportFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_BIN_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scan::ScanRecord;
    use crate::engine::analyzer::DerivedStateAnalyzer;
    use crate::engine::grid_builder::GridIndexBuilder;

    fn snapshot(records: Vec<ScanRecord>) -> WarehouseSnapshot {
        let builder = GridIndexBuilder::new();
        WarehouseSnapshot {
            index: builder.build(&records),
            derived: DerivedStateAnalyzer::default().analyze(&records),
            first_timestamps: builder.build_timestamp_lookup(&records),
            records,
            report: None,
        }
    }

    fn sample() -> WarehouseSnapshot {
        snapshot(vec![
            ScanRecord::new(None, "SKU000002", "R1S45-N-AT2"),
            ScanRecord::new(None, "SKU000002", "R1S32-N-AT1"),
            ScanRecord::new(None, "SKU000001", "R2B01-N-AT1"),
            ScanRecord::new(None, "SKU000001", "R2B02-N-AT1"),
            ScanRecord::new(None, "SKU000001", "X99"),
            ScanRecord::new(None, "SKU000003", "R3A01-N-AT1"),
            ScanRecord::new(None, "EMPTY", "R2A10-N-AT3"),
            ScanRecord::new(None, "", "R2A10-N-AT1"),
            ScanRecord::new(None, "empty", "R1A01-N-AT1"),
        ])
    }

    #[test]
    fn test_duplicate_export_sorted() {
        let table = ExportFormatter::default().duplicate_skus_table(&sample());

        assert_eq!(table.headers, vec!["SKU", "Bin Locations"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["SKU000001".to_string(), "R2B01-N-AT1, R2B02-N-AT1".to_string()],
                vec!["SKU000002".to_string(), "R1S32-N-AT1, R1S45-N-AT2".to_string()],
            ]
        );
    }

    #[test]
    fn test_empty_export_grouped_by_grid_location() {
        let snap = sample();
        let table = ExportFormatter::default().empty_bins_table(&snap);

        assert_eq!(table.headers, vec!["Grid Location", "Bin Locations"]);
        assert_eq!(table.rows.len(), snap.derived.empty_cells.len());
        assert_eq!(
            table.rows,
            vec![
                vec!["1A01".to_string(), "R1A01-N-AT1".to_string()],
                vec!["2A10".to_string(), "R2A10-N-AT1, R2A10-N-AT3".to_string()],
            ]
        );
    }

    #[test]
    fn test_cell_detail_export_keeps_index_order() {
        let snap = sample();
        let table = ExportFormatter::default()
            .cell_detail_table(&snap, &GridCoordinate::new("2A", "10"));

        assert_eq!(table.headers, vec!["SKU", "Bin Location"]);
        assert_eq!(table.rows[0], vec!["EMPTY", "R2A10-N-AT3"]);
        assert_eq!(table.rows[1], vec!["", "R2A10-N-AT1"]);
    }

    #[test]
    fn test_csv_rendering_is_stable() {
        let snap = sample();
        let formatter = ExportFormatter::default();
        let first = formatter.export(&snap, &ExportKind::DuplicateSkus).to_csv_string().unwrap();
        let second = formatter.export(&snap, &ExportKind::DuplicateSkus).to_csv_string().unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first,
            "SKU,Bin Locations\n\
             SKU000001,\"R2B01-N-AT1, R2B02-N-AT1\"\n\
             SKU000002,\"R1S32-N-AT1, R1S45-N-AT2\"\n"
        );
    }

    #[test]
    fn test_custom_separator() {
        let table = ExportFormatter::new("|").duplicate_skus_table(&sample());
        assert_eq!(table.rows[0][1], "R2B01-N-AT1|R2B02-N-AT1");
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(ExportKind::DuplicateSkus.default_file_name(), "duplicate_skus.csv");
        assert_eq!(ExportKind::EmptyBins.default_file_name(), "empty_bins.csv");
        assert_eq!(
            ExportKind::CellDetail(GridCoordinate::new("1S", "32")).default_file_name(),
            "cell_1S32.csv"
        );
    }
}
