// ==========================================
// 仓库货位网格系统 - 仓库API
// ==========================================
// 职责: 加载扫描数据、查询网格、导出报表的统一入口
// 红线: 新快照在锁外完整构建后再原子替换; 加载失败保留旧快照
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::AnalysisConfigReader;
use crate::domain::grid::GridCoordinate;
use crate::domain::report::LoadReport;
use crate::domain::snapshot::WarehouseSnapshot;
use crate::domain::view::{CellItem, GridSummary, OccupancyMatrix};
use crate::engine::export::{ExportFormatter, ExportKind, ExportTable};
use crate::engine::query::QueryEngine;
use crate::engine::snapshot_builder::SnapshotBuilder;
use crate::importer::{ParsedScans, ScanCsvParser};
use crate::perf::PerfGuard;
use chrono::Utc;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{error, info, instrument};
use uuid::Uuid;

/// 仓库API
pub struct WarehouseApi {
    config: Arc<dyn AnalysisConfigReader>,
    parser: ScanCsvParser,
    snapshot: Mutex<Arc<WarehouseSnapshot>>,
}

impl WarehouseApi {
    /// 创建新的WarehouseApi实例（初始为空快照）
    pub fn new(config: Arc<dyn AnalysisConfigReader>) -> Self {
        Self {
            config,
            parser: ScanCsvParser,
            snapshot: Mutex::new(Arc::new(WarehouseSnapshot::default())),
        }
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 从文件加载扫描数据
    ///
    /// # 参数
    /// - path: CSV 文件路径
    ///
    /// # 返回
    /// - Ok(LoadReport): 加载报告
    /// - Err(ApiError): 文件不存在 / 格式不支持 / 缺少必需列（当前快照不变）
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load_from_file(&self, path: &Path) -> ApiResult<LoadReport> {
        let _perf = PerfGuard::new("load_from_file");
        let start = Instant::now();

        let parsed = self.parser.parse_file(path).map_err(|e| {
            error!(error = %e, "扫描文件加载失败");
            ApiError::from(e)
        })?;
        self.install(parsed, path.display().to_string(), start)
    }

    /// 从 CSV 文本加载扫描数据
    ///
    /// # 参数
    /// - content: CSV 文本（含表头）
    /// - source: 来源名称（写入加载报告）
    pub fn load_from_str(&self, content: &str, source: &str) -> ApiResult<LoadReport> {
        let _perf = PerfGuard::new("load_from_str");
        let start = Instant::now();

        let parsed = self.parser.parse_str(content).map_err(|e| {
            error!(source, error = %e, "扫描数据加载失败");
            ApiError::from(e)
        })?;
        self.install(parsed, source.to_string(), start)
    }

    /// 构建新快照并替换当前快照
    fn install(&self, parsed: ParsedScans, source: String, start: Instant) -> ApiResult<LoadReport> {
        let policy = self.config.get_sku_length_policy()?;
        let builder = SnapshotBuilder::new(policy);

        let ParsedScans {
            dialect,
            records,
            total_rows,
            skipped_rows,
        } = parsed;
        let loaded_records = records.len();

        let mut snapshot = builder.build(records, None);
        let indexed_records = snapshot.index.entry_count();

        let report = LoadReport {
            batch_id: Uuid::new_v4().to_string(),
            source,
            dialect,
            loaded_at: Utc::now(),
            total_rows,
            loaded_records,
            indexed_records,
            unindexed_records: loaded_records - indexed_records,
            skipped_rows,
            elapsed_time: start.elapsed(),
        };
        snapshot.report = Some(report.clone());

        self.replace_snapshot(Arc::new(snapshot))?;

        info!(
            batch_id = %report.batch_id,
            source = %report.source,
            dialect = %report.dialect,
            policy = %policy,
            total_rows = report.total_rows,
            loaded_records = report.loaded_records,
            indexed_records = report.indexed_records,
            unindexed_records = report.unindexed_records,
            skipped_rows = report.skipped_rows.len(),
            elapsed_ms = report.elapsed_time.as_millis() as u64,
            "扫描数据加载完成"
        );
        Ok(report)
    }

    fn replace_snapshot(&self, next: Arc<WarehouseSnapshot>) -> ApiResult<()> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))?;
        *guard = next;
        Ok(())
    }

    /// 当前快照（调用方持有期间不受后续加载影响）
    pub fn snapshot(&self) -> ApiResult<Arc<WarehouseSnapshot>> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))?;
        Ok(Arc::clone(&guard))
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按 SKU / 货位子串搜索（大小写不敏感,OR 关系）
    pub fn search(
        &self,
        sku_query: Option<&str>,
        location_query: Option<&str>,
    ) -> ApiResult<BTreeSet<GridCoordinate>> {
        let snapshot = self.snapshot()?;
        let layout = self.config.get_grid_layout()?;
        Ok(QueryEngine::new(&snapshot, &layout).search(sku_query, location_query))
    }

    /// 单元格明细
    pub fn cell_detail(&self, coordinate: &GridCoordinate) -> ApiResult<Vec<CellItem>> {
        let snapshot = self.snapshot()?;
        let layout = self.config.get_grid_layout()?;
        Ok(QueryEngine::new(&snapshot, &layout).cell_detail(coordinate))
    }

    /// 按键（如 "1S32"）查询单元格明细
    pub fn cell_detail_by_key(&self, key: &str) -> ApiResult<Vec<CellItem>> {
        let coordinate = GridCoordinate::parse_key(key.trim())
            .ok_or_else(|| ApiError::InvalidInput(format!("无效的网格坐标: '{}'", key)))?;
        self.cell_detail(&coordinate)
    }

    /// 含重复 SKU 的单元格
    pub fn duplicates(&self) -> ApiResult<BTreeSet<GridCoordinate>> {
        Ok(self.snapshot()?.derived.duplicate_cells.clone())
    }

    /// 含空货位记录的单元格
    pub fn empties(&self) -> ApiResult<BTreeSet<GridCoordinate>> {
        Ok(self.snapshot()?.derived.empty_cells.clone())
    }

    /// 重复 SKU 列表（升序）
    pub fn duplicate_skus(&self) -> ApiResult<Vec<String>> {
        Ok(self.snapshot()?.derived.duplicate_skus.iter().cloned().collect())
    }

    /// 网格统计摘要
    pub fn summary(&self) -> ApiResult<GridSummary> {
        let snapshot = self.snapshot()?;
        let layout = self.config.get_grid_layout()?;
        Ok(QueryEngine::new(&snapshot, &layout).summary())
    }

    /// 占用矩阵（布局列 × 行; 高亮集合由调用方的视图状态提供）
    pub fn occupancy_matrix(
        &self,
        highlighted: &BTreeSet<GridCoordinate>,
    ) -> ApiResult<OccupancyMatrix> {
        let snapshot = self.snapshot()?;
        let layout = self.config.get_grid_layout()?;
        Ok(QueryEngine::new(&snapshot, &layout).occupancy_matrix(highlighted))
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出报表
    pub fn export(&self, kind: &ExportKind) -> ApiResult<ExportTable> {
        let _perf = PerfGuard::new("export");
        let snapshot = self.snapshot()?;
        let formatter = ExportFormatter::new(self.config.get_export_bin_separator()?);
        Ok(formatter.export(&snapshot, kind))
    }

    /// 导出报表为 CSV 文本
    pub fn export_csv(&self, kind: &ExportKind) -> ApiResult<String> {
        Ok(self.export(kind)?.to_csv_string()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigResult;
    use crate::domain::layout::GridLayout;
    use crate::domain::state::SkuLengthPolicy;
    use std::io;

    // ==========================================
    // Mock配置读取器
    // ==========================================
    struct MockConfigReader {
        policy: SkuLengthPolicy,
    }

    impl AnalysisConfigReader for MockConfigReader {
        fn get_sku_length_policy(&self) -> ConfigResult<SkuLengthPolicy> {
            Ok(self.policy)
        }

        fn get_grid_layout(&self) -> ConfigResult<GridLayout> {
            Ok(GridLayout::default())
        }

        fn get_export_bin_separator(&self) -> ConfigResult<String> {
            Ok(" | ".to_string())
        }
    }

    fn api(policy: SkuLengthPolicy) -> WarehouseApi {
        WarehouseApi::new(Arc::new(MockConfigReader { policy }))
    }

    const SAMPLE: &str = "Timestamp,SKU,Location\n\
        T1,SKU000001,R1S32-N-AT1\n\
        T2,SKU000001,R1S45-N-AT2\n\
        T3,EMPTY,R2A10-N-AT3\n";

    #[test]
    fn test_queries_before_load_are_empty() {
        let api = api(SkuLengthPolicy::Any);
        assert!(api.search(Some("SKU"), None).unwrap().is_empty());
        assert!(api.duplicates().unwrap().is_empty());
        assert!(api.empties().unwrap().is_empty());
        assert!(api.snapshot().unwrap().report.is_none());
    }

    #[test]
    fn test_load_report_counts() {
        let api = api(SkuLengthPolicy::Any);
        let report = api
            .load_from_str("Timestamp,SKU,Location\nT1,A,R1S32\nT2,B,X99\nT3,C\n", "mem")
            .unwrap();

        assert_eq!(report.source, "mem");
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.loaded_records, 2);
        assert_eq!(report.indexed_records, 1);
        assert_eq!(report.unindexed_records, 1);
        assert_eq!(report.skipped_rows.len(), 1);
        assert!(Uuid::parse_str(&report.batch_id).is_ok());
    }

    #[test]
    fn test_export_uses_configured_separator() {
        let api = api(SkuLengthPolicy::fixed_width());
        api.load_from_str(SAMPLE, "mem").unwrap();

        let table = api.export(&ExportKind::DuplicateSkus).unwrap();
        assert_eq!(
            table.rows,
            vec![vec![
                "SKU000001".to_string(),
                "R1S32-N-AT1 | R1S45-N-AT2".to_string()
            ]]
        );
    }

    #[test]
    fn test_failed_load_keeps_previous_snapshot() {
        let api = api(SkuLengthPolicy::Any);
        api.load_from_str(SAMPLE, "first").unwrap();
        let before = api.snapshot().unwrap();

        let err = api.load_from_str("foo,bar\n1,2\n", "second").unwrap_err();
        assert!(matches!(err, ApiError::FileFormatError(_)));

        let after = api.snapshot().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(after.report.as_ref().map(|r| r.source.as_str()), Some("first"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_search_and_export_log_once() {
        let api = api(SkuLengthPolicy::Any);
        api.load_from_str(SAMPLE, "mem").unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            api.search(Some("SKU"), None).unwrap();
            api.export(&ExportKind::EmptyBins).unwrap();
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("搜索完成").count(), 1);
        assert_eq!(text.matches("导出表格生成完成").count(), 1);
    }

    #[test]
    fn test_cell_detail_by_key() {
        let api = api(SkuLengthPolicy::Any);
        api.load_from_str(SAMPLE, "mem").unwrap();

        let items = api.cell_detail_by_key("1S32").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].timestamp.as_deref(), Some("T1"));
        assert!(items[0].is_duplicate);

        assert!(matches!(
            api.cell_detail_by_key("1"),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
