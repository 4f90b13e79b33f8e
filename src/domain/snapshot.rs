// ==========================================
// 仓库货位网格系统 - 数据快照
// ==========================================
// 职责: 一次加载产生的 (记录列表, 网格索引, 派生状态) 三元组
// 红线: 快照构建完成后不可变,下一次加载整体替换
// ==========================================

use crate::domain::grid::GridIndex;
use crate::domain::report::LoadReport;
use crate::domain::scan::ScanRecord;
use crate::domain::state::DerivedState;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct WarehouseSnapshot {
    /// 全量记录（原始顺序,含不可解码货位）
    pub records: Vec<ScanRecord>,

    /// 稀疏网格索引
    pub index: GridIndex,

    /// 派生状态
    pub derived: DerivedState,

    /// (sku, bin_code) → 首条记录的时间戳
    pub first_timestamps: HashMap<(String, String), Option<String>>,

    /// 加载报告（空快照为 None）
    pub report: Option<LoadReport>,
}

impl WarehouseSnapshot {
    /// 首条 SKU 与货位码完全匹配记录的时间戳
    pub fn timestamp_for(&self, sku: &str, bin_code: &str) -> Option<&str> {
        self.first_timestamps
            .get(&(sku.to_string(), bin_code.to_string()))
            .and_then(|ts| ts.as_deref())
    }

    pub fn is_loaded(&self) -> bool {
        self.report.is_some()
    }
}
