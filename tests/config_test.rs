// ==========================================
// 配置管理集成测试
// ==========================================
// 覆盖: JSON 配置文件读写、配置对分析结果的影响

use std::sync::Arc;
use warehouse_grid::app::{AppState, ViewState};
use warehouse_grid::config::{config_keys, AnalysisConfigReader, ConfigError, ConfigManager};
use warehouse_grid::domain::SkuLengthPolicy;
use warehouse_grid::engine::ExportKind;
use warehouse_grid::WarehouseApi;

use test_helpers::fixture_path;

#[test]
fn test_save_and_reload_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = ConfigManager::new(&path).unwrap();
    config
        .update_config(config_keys::DUPLICATE_SKU_LENGTH_FILTER, "true")
        .unwrap();
    config
        .update_config(config_keys::EXPORT_BIN_SEPARATOR, "; ")
        .unwrap();
    config.save().unwrap();
    assert!(path.exists());

    let reloaded = ConfigManager::new(&path).unwrap();
    assert_eq!(
        reloaded.get_sku_length_policy().unwrap(),
        SkuLengthPolicy::ExactChars(9)
    );
    assert_eq!(reloaded.get_export_bin_separator().unwrap(), "; ");
    assert_eq!(reloaded.path(), Some(path.as_path()));
}

#[test]
fn test_malformed_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(matches!(
        ConfigManager::new(&path),
        Err(ConfigError::JsonError(_))
    ));
    assert!(AppState::new(path).is_err());
}

#[test]
fn test_config_drives_analysis_and_export() {
    let config = Arc::new(ConfigManager::in_memory());
    config
        .update_config(config_keys::EXPORT_BIN_SEPARATOR, "|")
        .unwrap();
    let api = WarehouseApi::new(config.clone());
    api.load_from_file(&fixture_path("scans_sample.csv"))
        .unwrap();

    let table = api.export(&ExportKind::DuplicateSkus).unwrap();
    assert_eq!(table.rows[0][1], "R2B07-N-AT1|R2B08-N-AT1");
    assert_eq!(api.duplicate_skus().unwrap().len(), 2);

    // 策略在加载时生效
    config
        .update_config(config_keys::DUPLICATE_SKU_LENGTH_FILTER, "on")
        .unwrap();
    assert_eq!(api.duplicate_skus().unwrap().len(), 2);
    api.load_from_file(&fixture_path("scans_sample.csv"))
        .unwrap();
    assert_eq!(api.duplicate_skus().unwrap(), vec!["SKU000001".to_string()]);
}

#[test]
fn test_custom_layout_moves_cells_off_grid() {
    let config = Arc::new(ConfigManager::in_memory());
    config
        .update_config(config_keys::GRID_COLUMNS, "1S,2A")
        .unwrap();
    config
        .update_config(config_keys::GRID_ROW_COUNT, "50")
        .unwrap();
    let api = WarehouseApi::new(config);
    api.load_from_file(&fixture_path("scans_sample.csv"))
        .unwrap();

    let summary = api.summary().unwrap();
    assert_eq!(summary.total_cells, 100);
    // 1S32, 1S45, 2A10 在布局内; 其余坐标在布局外,但仍保留在索引中
    assert_eq!(summary.occupied_cells, 3);
    assert_eq!(summary.off_grid_cells, 5);

    let mut view = ViewState::new();
    view.apply_empties(&api).unwrap();
    let matrix = view.occupancy_matrix(&api).unwrap();
    assert_eq!(matrix.columns, vec!["1S".to_string(), "2A".to_string()]);
    assert_eq!(matrix.cells.len(), 2);
    assert_eq!(matrix.cells[0].len(), 50);
    assert_eq!(
        matrix.count(warehouse_grid::CellState::Highlighted),
        1,
        "只有 2A10 在布局内"
    );
}
