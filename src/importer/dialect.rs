// ==========================================
// 仓库货位网格系统 - 表头方言识别
// ==========================================
// 职责: 根据表头行识别输入方言并给出列位置
// 方言 B（优先）: garment_sku + location_id, 任意位置, 多余列忽略
// 方言 A: Timestamp + SKU + Location
// 规则: 表头 TRIM 后大小写不敏感比较; 首列去除 UTF-8 BOM
// ==========================================

use crate::domain::scan::CsvDialect;
use serde::{Deserialize, Serialize};

pub const HEADER_GARMENT_SKU: &str = "garment_sku";
pub const HEADER_LOCATION_ID: &str = "location_id";
pub const HEADER_TIMESTAMP: &str = "Timestamp";
pub const HEADER_SKU: &str = "SKU";
pub const HEADER_LOCATION: &str = "Location";

const UTF8_BOM: char = '\u{feff}';

// ==========================================
// ColumnMapping - 列位置映射
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub dialect: CsvDialect,
    pub timestamp_idx: Option<usize>,
    pub sku_idx: usize,
    pub location_idx: usize,
}

impl ColumnMapping {
    /// 数据行至少需要的字段数
    pub fn required_fields(&self) -> usize {
        let max_idx = self
            .timestamp_idx
            .unwrap_or(0)
            .max(self.sku_idx)
            .max(self.location_idx);
        max_idx + 1
    }
}

/// 标准化表头: 去 BOM + TRIM
pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches(UTF8_BOM).trim().to_string()
}

/// 识别方言
///
/// # 返回
/// - Some(ColumnMapping): 识别成功
/// - None: 缺少必需列（调用方应视为整个文件格式错误）
pub fn detect_dialect(headers: &[String]) -> Option<ColumnMapping> {
    let find = |name: &str| find_header(headers, name);

    if let (Some(sku_idx), Some(location_idx)) = (find(HEADER_GARMENT_SKU), find(HEADER_LOCATION_ID)) {
        return Some(ColumnMapping {
            dialect: CsvDialect::GarmentSkuLocationId,
            timestamp_idx: None,
            sku_idx,
            location_idx,
        });
    }

    detect_timestamp_sku_location(headers)
}

/// 仅按方言 A 识别（Timestamp + SKU + Location,忽略其他列）
///
/// # 说明
/// - 合并扫描文件时使用; 同时带有方言 B 列的表头也按方言 A 读取
pub fn detect_timestamp_sku_location(headers: &[String]) -> Option<ColumnMapping> {
    let find = |name: &str| find_header(headers, name);

    match (find(HEADER_TIMESTAMP), find(HEADER_SKU), find(HEADER_LOCATION)) {
        (Some(timestamp_idx), Some(sku_idx), Some(location_idx)) => Some(ColumnMapping {
            dialect: CsvDialect::TimestampSkuLocation,
            timestamp_idx: Some(timestamp_idx),
            sku_idx,
            location_idx,
        }),
        _ => None,
    }
}

fn find_header(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| normalize_header(h).eq_ignore_ascii_case(name))
}
