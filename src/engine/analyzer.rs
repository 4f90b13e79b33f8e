// ==========================================
// 仓库货位网格系统 - 派生状态分析器
// ==========================================
// 职责: 计算重复 SKU 集合、重复单元格集合、空货位单元格集合
// 红线: 只统计货位可解码的记录
// 红线: 重复判定按"不同坐标数 >= 2",同一坐标多次扫描不算重复
// ==========================================

use crate::domain::grid::GridCoordinate;
use crate::domain::scan::{is_empty_sku, ScanRecord};
use crate::domain::state::{DerivedState, SkuLengthPolicy};
use crate::engine::location_decoder::decode;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// 判定为重复所需的最少不同坐标数
pub const MIN_DUPLICATE_CELLS: usize = 2;

// ==========================================
// DerivedStateAnalyzer - 派生状态分析器
// ==========================================
pub struct DerivedStateAnalyzer {
    length_policy: SkuLengthPolicy,
}

impl DerivedStateAnalyzer {
    /// 创建分析器
    ///
    /// # 参数
    /// - length_policy: 重复 SKU 的长度策略（默认 Any）
    pub fn new(length_policy: SkuLengthPolicy) -> Self {
        Self { length_policy }
    }

    /// SKU 是否可参与重复判定（非空 + 满足长度策略）
    pub fn is_duplicate_candidate(&self, sku: &str) -> bool {
        !is_empty_sku(sku) && self.length_policy.accepts(sku)
    }

    /// 全量分析
    pub fn analyze(&self, records: &[ScanRecord]) -> DerivedState {
        let mut sku_cells: HashMap<&str, BTreeSet<GridCoordinate>> = HashMap::new();
        let mut empty_cells = BTreeSet::new();

        for record in records {
            let Some(coordinate) = decode(&record.location) else {
                continue;
            };

            if is_empty_sku(&record.sku) {
                empty_cells.insert(coordinate);
                continue;
            }

            sku_cells
                .entry(record.sku.as_str())
                .or_default()
                .insert(coordinate);
        }

        let mut state = DerivedState {
            empty_cells,
            ..DerivedState::default()
        };

        for (sku, cells) in sku_cells {
            if cells.len() < MIN_DUPLICATE_CELLS || !self.is_duplicate_candidate(sku) {
                continue;
            }
            debug!(sku = %sku, cells = cells.len(), "发现重复 SKU");
            state.duplicate_skus.insert(sku.to_string());
            state.duplicate_cells.extend(cells);
        }

        info!(
            policy = %self.length_policy,
            duplicate_skus = state.duplicate_skus.len(),
            duplicate_cells = state.duplicate_cells.len(),
            empty_cells = state.empty_cells.len(),
            "派生状态分析完成"
        );

        state
    }
}

impl Default for DerivedStateAnalyzer {
    fn default() -> Self {
        Self::new(SkuLengthPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sku: &str, location: &str) -> ScanRecord {
        ScanRecord::new(None, sku, location)
    }

    fn coord(column: &str, row: &str) -> GridCoordinate {
        GridCoordinate::new(column, row)
    }

    #[test]
    fn test_duplicate_requires_distinct_cells() {
        let records = vec![
            record("SKU000001", "R1S32-N-AT1"),
            record("SKU000001", "R1S32-N-AT2"), // 同一坐标
            record("SKU000002", "R1S32-N-AT3"),
            record("SKU000002", "R1S45-N-AT1"),
        ];

        let state = DerivedStateAnalyzer::default().analyze(&records);

        assert!(!state.is_duplicate_sku("SKU000001"));
        assert!(state.is_duplicate_sku("SKU000002"));
        assert_eq!(
            state.duplicate_cells,
            BTreeSet::from([coord("1S", "32"), coord("1S", "45")])
        );
    }

    #[test]
    fn test_empty_skus_never_duplicate() {
        let records = vec![
            record("EMPTY", "R1A01-N-AT1"),
            record("empty", "R1A02-N-AT1"),
            record("", "R1A03-N-AT1"),
            record("  ", "R1A04-N-AT1"),
        ];

        let state = DerivedStateAnalyzer::default().analyze(&records);

        assert!(state.duplicate_skus.is_empty());
        assert!(state.duplicate_cells.is_empty());
        assert_eq!(state.empty_cells.len(), 4);
    }

    #[test]
    fn test_undecodable_records_excluded() {
        let records = vec![
            record("SKU000001", "X99"),
            record("SKU000001", "R1A01-N-AT1"),
            record("EMPTY", "Q1A02"),
        ];

        let state = DerivedStateAnalyzer::default().analyze(&records);

        assert!(state.duplicate_skus.is_empty());
        assert!(state.empty_cells.is_empty());
    }

    #[test]
    fn test_length_policy_gates_duplicates() {
        let records = vec![
            record("SKU01", "R1A01-N-AT1"),
            record("SKU01", "R1A02-N-AT1"),
            record("SKU000009", "R2B01-N-AT1"),
            record("SKU000009", "R2B02-N-AT1"),
        ];

        let any = DerivedStateAnalyzer::new(SkuLengthPolicy::Any).analyze(&records);
        assert_eq!(any.duplicate_skus.len(), 2);

        let fixed = DerivedStateAnalyzer::new(SkuLengthPolicy::fixed_width()).analyze(&records);
        assert_eq!(
            fixed.duplicate_skus,
            BTreeSet::from(["SKU000009".to_string()])
        );
        assert_eq!(
            fixed.duplicate_cells,
            BTreeSet::from([coord("2B", "01"), coord("2B", "02")])
        );
    }

    #[test]
    fn test_cell_can_be_duplicate_and_empty() {
        let records = vec![
            record("SKU000001", "R1A01-N-AT1"),
            record("EMPTY", "R1A01-N-AT2"),
            record("SKU000001", "R1A02-N-AT1"),
        ];

        let state = DerivedStateAnalyzer::default().analyze(&records);
        let shared = coord("1A", "01");

        assert!(state.duplicate_cells.contains(&shared));
        assert!(state.empty_cells.contains(&shared));
    }

    #[test]
    fn test_duplicate_cells_is_union_of_duplicate_sku_cells() {
        let records = vec![
            record("A", "R1A01-N-AT1"),
            record("A", "R1A02-N-AT1"),
            record("B", "R1A02-N-AT2"),
            record("B", "R1A03-N-AT1"),
            record("C", "R3Z90-N-AT1"),
        ];

        let state = DerivedStateAnalyzer::default().analyze(&records);

        let mut expected = BTreeSet::new();
        for r in &records {
            if state.is_duplicate_sku(&r.sku) {
                expected.insert(decode(&r.location).unwrap());
            }
        }
        assert_eq!(state.duplicate_cells, expected);
        assert!(!state.duplicate_cells.contains(&coord("3Z", "90")));
    }
}
