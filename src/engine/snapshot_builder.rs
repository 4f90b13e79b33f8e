// ==========================================
// 仓库货位网格系统 - 快照构建
// ==========================================
// 职责: 记录列表 → (网格索引 + 派生状态 + 时间戳查找表) 完整快照
// 红线: 一次性构建新快照,不修改任何已有快照
// ==========================================

use crate::domain::report::LoadReport;
use crate::domain::scan::ScanRecord;
use crate::domain::snapshot::WarehouseSnapshot;
use crate::domain::state::SkuLengthPolicy;
use crate::engine::analyzer::DerivedStateAnalyzer;
use crate::engine::grid_builder::GridIndexBuilder;

pub struct SnapshotBuilder {
    index_builder: GridIndexBuilder,
    analyzer: DerivedStateAnalyzer,
}

impl SnapshotBuilder {
    pub fn new(length_policy: SkuLengthPolicy) -> Self {
        Self {
            index_builder: GridIndexBuilder::new(),
            analyzer: DerivedStateAnalyzer::new(length_policy),
        }
    }

    /// 构建快照
    ///
    /// # 参数
    /// - records: 全量记录（所有权转入快照）
    /// - report: 加载报告（测试或内存构建可为 None）
    pub fn build(&self, records: Vec<ScanRecord>, report: Option<LoadReport>) -> WarehouseSnapshot {
        let index = self.index_builder.build(&records);
        let derived = self.analyzer.analyze(&records);
        let first_timestamps = self.index_builder.build_timestamp_lookup(&records);

        WarehouseSnapshot {
            records,
            index,
            derived,
            first_timestamps,
            report,
        }
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new(SkuLengthPolicy::default())
    }
}
