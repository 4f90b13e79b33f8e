// ==========================================
// 仓库货位网格系统 - 网格布局
// ==========================================
// 职责: 已知列白名单 + 行枚举
// 说明: 布局之外的坐标仍保留在稀疏索引中,只是不参与绘制/占用统计
// ==========================================

use crate::domain::grid::GridCoordinate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 默认列白名单（1A-1Z, 2A-2S, 3A-3N, 3P-3Z; 无 3O）
pub const DEFAULT_COLUMNS: &[&str] = &[
    "1A", "1B", "1C", "1D", "1E", "1F", "1G", "1H", "1I", "1J", "1K", "1L", "1M", "1N", "1O",
    "1P", "1Q", "1R", "1S", "1T", "1U", "1V", "1W", "1X", "1Y", "1Z", "2A", "2B", "2C", "2D",
    "2E", "2F", "2G", "2H", "2I", "2J", "2K", "2L", "2M", "2N", "2O", "2P", "2Q", "2R", "2S",
    "3A", "3B", "3C", "3D", "3E", "3F", "3G", "3H", "3I", "3J", "3K", "3L", "3M", "3N", "3P",
    "3Q", "3R", "3S", "3T", "3U", "3V", "3W", "3X", "3Y", "3Z",
];

/// 默认行数（01-90）
pub const DEFAULT_ROW_COUNT: u32 = 90;

// ==========================================
// GridLayout - 网格布局
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    columns: Vec<String>,
    rows: Vec<String>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(
            DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            DEFAULT_ROW_COUNT,
        )
    }
}

impl GridLayout {
    /// 创建布局
    ///
    /// # 参数
    /// - columns: 列白名单（按给定顺序,重复项只保留首个）
    /// - row_count: 行数,行号为两位补零 "01"..
    pub fn new(columns: Vec<String>, row_count: u32) -> Self {
        let mut seen = HashSet::new();
        let columns = columns
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .collect();
        let rows = (1..=row_count).map(|r| format!("{:02}", r)).collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 行号（升序 "01".."90"; 渲染方向由 UI 决定）
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn total_cells(&self) -> usize {
        self.columns.len() * self.rows.len()
    }

    /// 坐标是否在已知布局内
    pub fn contains(&self, coordinate: &GridCoordinate) -> bool {
        self.columns.iter().any(|c| *c == coordinate.column)
            && self.rows.iter().any(|r| *r == coordinate.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_dimensions() {
        let layout = GridLayout::default();
        assert_eq!(layout.columns().len(), 70);
        assert_eq!(layout.rows().len(), 90);
        assert_eq!(layout.rows()[0], "01");
        assert_eq!(layout.rows()[89], "90");
        assert_eq!(layout.total_cells(), 6300);
    }

    #[test]
    fn test_layout_contains() {
        let layout = GridLayout::default();
        assert!(layout.contains(&GridCoordinate::new("1S", "32")));
        assert!(!layout.contains(&GridCoordinate::new("3O", "32")));
        assert!(!layout.contains(&GridCoordinate::new("1S", "91")));
        assert!(!layout.contains(&GridCoordinate::new("XY", "ZZ")));
    }

    #[test]
    fn test_layout_dedups_columns() {
        let layout = GridLayout::new(vec!["1A".into(), "1B".into(), "1A".into()], 2);
        assert_eq!(layout.columns(), &["1A".to_string(), "1B".to_string()]);
        assert_eq!(layout.rows(), &["01".to_string(), "02".to_string()]);
    }
}
