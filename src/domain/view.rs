// ==========================================
// 仓库货位网格系统 - 查询输出对象
// ==========================================
// 职责: 单元格明细 / 网格统计 / 占用矩阵
// 红线: 纯数据,不含绘制逻辑（像素映射/缩放由 UI 层负责）
// ==========================================

use crate::domain::grid::GridCoordinate;
use serde::{Deserialize, Serialize};

// ==========================================
// CellItem - 单元格明细行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellItem {
    pub sku: String,
    pub bin_code: String,
    pub timestamp: Option<String>, // 首条 (sku, bin_code) 完全匹配记录的时间
    pub is_empty: bool,            // 空货位
    pub is_duplicate: bool,        // 属于重复 SKU
}

// ==========================================
// GridSummary - 网格统计
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSummary {
    pub columns: usize,
    pub rows: usize,
    pub total_cells: usize,
    pub occupied_cells: usize, // 布局内已占用单元格
    pub off_grid_cells: usize, // 布局外的已占用坐标
    pub total_records: usize,
    pub indexed_records: usize,
    pub duplicate_skus: usize,
    pub duplicate_cells: usize,
    pub empty_cells: usize,
}

// ==========================================
// CellState - 单元格绘制状态
// ==========================================
// 高亮优先于占用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellState {
    Vacant,
    Occupied,
    Highlighted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyCell {
    pub coordinate: GridCoordinate,
    pub state: CellState,
    pub item_count: usize,
}

// ==========================================
// OccupancyMatrix - 占用矩阵
// ==========================================
// cells[列序号][行序号], 顺序与 GridLayout 一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<String>,
    pub cells: Vec<Vec<OccupancyCell>>,
}

impl OccupancyMatrix {
    pub fn cell(&self, column_idx: usize, row_idx: usize) -> Option<&OccupancyCell> {
        self.cells.get(column_idx).and_then(|col| col.get(row_idx))
    }

    /// 指定状态的单元格数量
    pub fn count(&self, state: CellState) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.state == state)
            .count()
    }
}
