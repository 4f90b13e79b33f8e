// ==========================================
// 仓库货位网格系统 - 网格索引构建器
// ==========================================
// 职责: 扫描记录 → 稀疏网格索引
// 输入: 原始顺序的记录列表
// 输出: GridIndex（不可解码的记录只跳过索引,不从记录列表中删除）
// ==========================================

use crate::domain::grid::{BinEntry, GridIndex};
use crate::domain::scan::ScanRecord;
use crate::engine::location_decoder::decode;
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// GridIndexBuilder - 网格索引构建器
// ==========================================
// 无状态,同一输入重复构建结果完全一致
pub struct GridIndexBuilder;

impl GridIndexBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 构建网格索引
    pub fn build(&self, records: &[ScanRecord]) -> GridIndex {
        let mut index = GridIndex::new();
        let mut unindexed = 0usize;

        for record in records {
            match decode(&record.location) {
                Some(coordinate) => index.push(
                    coordinate,
                    BinEntry {
                        sku: record.sku.clone(),
                        bin_code: record.location.clone(),
                    },
                ),
                None => unindexed += 1,
            }
        }

        debug!(
            records = records.len(),
            occupied_cells = index.occupied_cells(),
            unindexed,
            "网格索引构建完成"
        );

        index
    }

    /// 构建 (sku, bin_code) → 首条记录时间戳 的查找表
    pub fn build_timestamp_lookup(
        &self,
        records: &[ScanRecord],
    ) -> HashMap<(String, String), Option<String>> {
        let mut lookup = HashMap::new();
        for record in records {
            lookup
                .entry((record.sku.clone(), record.location.clone()))
                .or_insert_with(|| record.timestamp.clone());
        }
        lookup
    }
}

impl Default for GridIndexBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::GridCoordinate;

    fn record(ts: &str, sku: &str, location: &str) -> ScanRecord {
        ScanRecord::new(Some(ts.to_string()), sku, location)
    }

    #[test]
    fn test_build_groups_by_coordinate() {
        let records = vec![
            record("T1", "SKU000001", "R1S32-N-AT1"),
            record("T2", "SKU000002", "R1S32-N-AT2"),
            record("T3", "SKU000003", "R2A10-N-AT3"),
        ];

        let index = GridIndexBuilder::new().build(&records);

        assert_eq!(index.occupied_cells(), 2);
        let cell = index.entries(&GridCoordinate::new("1S", "32"));
        assert_eq!(cell.len(), 2);
        assert_eq!(cell[0].sku, "SKU000001");
        assert_eq!(cell[0].bin_code, "R1S32-N-AT1");
        assert_eq!(cell[1].sku, "SKU000002");
    }

    #[test]
    fn test_build_skips_undecodable_locations() {
        let records = vec![
            record("T1", "SKU000001", "X99"),
            record("T2", "SKU000002", "R1A01-N-AT1"),
        ];

        let index = GridIndexBuilder::new().build(&records);

        assert_eq!(index.entry_count(), 1);
        assert!(index.is_occupied(&GridCoordinate::new("1A", "01")));
    }

    #[test]
    fn test_build_is_deterministic() {
        let records = vec![
            record("T1", "B", "R3Z90-N-AT1"),
            record("T2", "A", "R1A01-N-AT1"),
            record("T3", "C", "R3Z90-N-AT2"),
        ];

        let builder = GridIndexBuilder::new();
        assert_eq!(builder.build(&records), builder.build(&records));
    }

    #[test]
    fn test_timestamp_lookup_keeps_first() {
        let records = vec![
            record("T1", "SKU000001", "R1A01-N-AT1"),
            record("T2", "SKU000001", "R1A01-N-AT1"),
        ];

        let lookup = GridIndexBuilder::new().build_timestamp_lookup(&records);
        assert_eq!(
            lookup.get(&("SKU000001".to_string(), "R1A01-N-AT1".to_string())),
            Some(&Some("T1".to_string()))
        );
    }
}
