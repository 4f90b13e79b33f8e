// ==========================================
// 仓库货位网格系统 - 网格坐标与网格索引
// ==========================================
// 职责: GridCoordinate / BinEntry / GridIndex 定义
// 红线: 单元格内保持插入顺序（先扫先列）
// 红线: 迭代顺序确定（BTreeMap / BTreeSet）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// GridCoordinate - 网格坐标
// ==========================================
// column = 层号(1 位) + 列字母, 例如 "1S"
// row    = 两位行号, 例如 "32"
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCoordinate {
    pub column: String,
    pub row: String,
}

impl GridCoordinate {
    pub fn new(column: impl Into<String>, row: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            row: row.into(),
        }
    }

    /// 导出用的网格位置键: `<column><row>`,例如 "1S32"
    pub fn key(&self) -> String {
        format!("{}{}", self.column, self.row)
    }

    /// 从 `<column><row>` 形式解析（列固定 2 字符,行为剩余部分）
    ///
    /// # 示例
    /// - "1S32" → column="1S", row="32"
    /// - "1S"   → None（缺少行号）
    pub fn parse_key(key: &str) -> Option<Self> {
        let key = key.trim();
        let split = key.char_indices().nth(2).map(|(idx, _)| idx)?;
        let (column, row) = key.split_at(split);
        if row.is_empty() {
            return None;
        }
        Some(Self::new(column, row))
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

// ==========================================
// BinEntry - 单元格内的货位条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinEntry {
    pub sku: String,
    pub bin_code: String, // 原始货位码（未解码）
}

// ==========================================
// GridIndex - 稀疏网格索引
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridIndex {
    cells: BTreeMap<GridCoordinate, Vec<BinEntry>>,
}

impl GridIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加条目（单元格不存在则创建）
    pub fn push(&mut self, coordinate: GridCoordinate, entry: BinEntry) {
        self.cells.entry(coordinate).or_default().push(entry);
    }

    /// 单元格条目（未占用返回空切片）
    pub fn entries(&self, coordinate: &GridCoordinate) -> &[BinEntry] {
        self.cells
            .get(coordinate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_occupied(&self, coordinate: &GridCoordinate) -> bool {
        !self.entries(coordinate).is_empty()
    }

    /// 已占用单元格数量（含网格外坐标）
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// 已索引条目总数
    pub fn entry_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &GridCoordinate> {
        self.cells.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
