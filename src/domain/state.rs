// ==========================================
// 仓库货位网格系统 - 派生状态
// ==========================================
// 职责: 重复 SKU / 空货位派生结果 + SKU 长度策略
// 红线: 每次加载全量重算,不做局部失效
// ==========================================

use crate::domain::grid::GridCoordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// SkuLengthPolicy - 重复 SKU 长度策略
// ==========================================
// 定长 SKU（例如 9 位）是否为业务规则尚未确认,默认关闭
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkuLengthPolicy {
    #[default]
    Any,               // 不限长度
    ExactChars(usize), // 仅统计字符数恰好为 n 的 SKU
}

impl SkuLengthPolicy {
    /// 定长 SKU 的常见宽度
    pub const FIXED_WIDTH_CHARS: usize = 9;

    /// 定长 9 位策略
    pub fn fixed_width() -> Self {
        SkuLengthPolicy::ExactChars(Self::FIXED_WIDTH_CHARS)
    }

    pub fn accepts(&self, sku: &str) -> bool {
        match self {
            SkuLengthPolicy::Any => true,
            SkuLengthPolicy::ExactChars(n) => sku.chars().count() == *n,
        }
    }
}

impl fmt::Display for SkuLengthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkuLengthPolicy::Any => write!(f, "ANY"),
            SkuLengthPolicy::ExactChars(n) => write!(f, "EXACT_CHARS({})", n),
        }
    }
}

// ==========================================
// DerivedState - 派生状态
// ==========================================
// 不变式: duplicate_cells == 所有 duplicate_skus 出现过的坐标并集
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    pub duplicate_skus: BTreeSet<String>,
    pub duplicate_cells: BTreeSet<GridCoordinate>,
    pub empty_cells: BTreeSet<GridCoordinate>,
}

impl DerivedState {
    pub fn is_duplicate_sku(&self, sku: &str) -> bool {
        self.duplicate_skus.contains(sku)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_policy() {
        assert!(SkuLengthPolicy::Any.accepts("A"));
        assert!(SkuLengthPolicy::fixed_width().accepts("SKU000001"));
        assert!(!SkuLengthPolicy::fixed_width().accepts("SKU00001"));
        assert!(SkuLengthPolicy::ExactChars(3).accepts("货品码"));
        assert_eq!(SkuLengthPolicy::default(), SkuLengthPolicy::Any);
        assert_eq!(SkuLengthPolicy::fixed_width().to_string(), "EXACT_CHARS(9)");
    }
}
