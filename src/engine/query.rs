// ==========================================
// 仓库货位网格系统 - 查询引擎
// ==========================================
// 职责: 对已构建的快照执行只读查询
// 查询: 搜索 / 单元格明细 / 重复 / 空货位 / 网格统计 / 占用矩阵
// 红线: "无匹配"不是错误,一律返回空结果
// ==========================================

use crate::domain::grid::GridCoordinate;
use crate::domain::layout::GridLayout;
use crate::domain::scan::is_empty_sku;
use crate::domain::snapshot::WarehouseSnapshot;
use crate::domain::view::{
    CellItem, CellState, GridSummary, OccupancyCell, OccupancyMatrix,
};
use crate::engine::location_decoder::decode;
use std::collections::BTreeSet;
use tracing::debug;

// ==========================================
// QueryEngine - 查询引擎
// ==========================================
pub struct QueryEngine<'a> {
    snapshot: &'a WarehouseSnapshot,
    layout: &'a GridLayout,
}

impl<'a> QueryEngine<'a> {
    pub fn new(snapshot: &'a WarehouseSnapshot, layout: &'a GridLayout) -> Self {
        Self { snapshot, layout }
    }

    /// 搜索
    ///
    /// # 参数
    /// - sku_query: SKU 子串（大小写不敏感）
    /// - location_query: 货位码子串（大小写不敏感）
    ///
    /// # 返回
    /// - 匹配记录的网格坐标集合; 两个条件为 OR 关系
    ///
    /// # 说明
    /// - 查询词先 TRIM,空白查询词不参与匹配
    /// - 两个查询词都为空时返回空集（不是"全部"）
    /// - 不可解码的记录跳过
    pub fn search(
        &self,
        sku_query: Option<&str>,
        location_query: Option<&str>,
    ) -> BTreeSet<GridCoordinate> {
        let sku_query = normalize_query(sku_query);
        let location_query = normalize_query(location_query);

        let mut matches = BTreeSet::new();
        if sku_query.is_none() && location_query.is_none() {
            return matches;
        }

        for record in &self.snapshot.records {
            let sku_match = sku_query
                .as_deref()
                .is_some_and(|q| record.sku.to_uppercase().contains(q));
            let location_match = location_query
                .as_deref()
                .is_some_and(|q| record.location.to_uppercase().contains(q));

            if !(sku_match || location_match) {
                continue;
            }
            if let Some(coordinate) = decode(&record.location) {
                matches.insert(coordinate);
            }
        }

        debug!(
            sku_query = ?sku_query,
            location_query = ?location_query,
            matches = matches.len(),
            "搜索完成"
        );

        matches
    }

    /// 单元格明细（按索引顺序,附带首条匹配记录的时间戳）
    pub fn cell_detail(&self, coordinate: &GridCoordinate) -> Vec<CellItem> {
        self.snapshot
            .index
            .entries(coordinate)
            .iter()
            .map(|entry| CellItem {
                sku: entry.sku.clone(),
                bin_code: entry.bin_code.clone(),
                timestamp: self
                    .snapshot
                    .timestamp_for(&entry.sku, &entry.bin_code)
                    .map(str::to_string),
                is_empty: is_empty_sku(&entry.sku),
                is_duplicate: self.snapshot.derived.is_duplicate_sku(&entry.sku),
            })
            .collect()
    }

    /// 含重复 SKU 的单元格
    pub fn duplicates(&self) -> BTreeSet<GridCoordinate> {
        self.snapshot.derived.duplicate_cells.clone()
    }

    /// 含空货位的单元格
    pub fn empties(&self) -> BTreeSet<GridCoordinate> {
        self.snapshot.derived.empty_cells.clone()
    }

    /// 重复 SKU 列表（升序）
    pub fn duplicate_skus(&self) -> Vec<String> {
        self.snapshot.derived.duplicate_skus.iter().cloned().collect()
    }

    /// 网格统计
    pub fn summary(&self) -> GridSummary {
        let index = &self.snapshot.index;
        let occupied_cells = index
            .coordinates()
            .filter(|c| self.layout.contains(c))
            .count();

        GridSummary {
            columns: self.layout.columns().len(),
            rows: self.layout.rows().len(),
            total_cells: self.layout.total_cells(),
            occupied_cells,
            off_grid_cells: index.occupied_cells() - occupied_cells,
            total_records: self.snapshot.records.len(),
            indexed_records: index.entry_count(),
            duplicate_skus: self.snapshot.derived.duplicate_skus.len(),
            duplicate_cells: self.snapshot.derived.duplicate_cells.len(),
            empty_cells: self.snapshot.derived.empty_cells.len(),
        }
    }

    /// 占用矩阵（仅覆盖布局内坐标; 高亮优先于占用）
    pub fn occupancy_matrix(&self, highlighted: &BTreeSet<GridCoordinate>) -> OccupancyMatrix {
        let cells = self
            .layout
            .columns()
            .iter()
            .map(|column| {
                self.layout
                    .rows()
                    .iter()
                    .map(|row| {
                        let coordinate = GridCoordinate::new(column.clone(), row.clone());
                        let item_count = self.snapshot.index.entries(&coordinate).len();
                        let state = if highlighted.contains(&coordinate) {
                            CellState::Highlighted
                        } else if item_count > 0 {
                            CellState::Occupied
                        } else {
                            CellState::Vacant
                        };
                        OccupancyCell {
                            coordinate,
                            state,
                            item_count,
                        }
                    })
                    .collect()
            })
            .collect();

        OccupancyMatrix {
            columns: self.layout.columns().to_vec(),
            rows: self.layout.rows().to_vec(),
            cells,
        }
    }
}

/// 查询词标准化: TRIM + 大写, 空白返回 None
fn normalize_query(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_uppercase)
}
