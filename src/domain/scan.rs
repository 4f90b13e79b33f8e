// ==========================================
// 仓库货位网格系统 - 扫描记录
// ==========================================
// 职责: 扫描记录实体 + 空货位判定规则
// 红线: 记录加载后不可变,字段保持原样（不做 TRIM）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 空货位的 SKU 占位符（大小写不敏感）
pub const EMPTY_SKU_TOKEN: &str = "EMPTY";

// ==========================================
// ScanRecord - 扫描记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub timestamp: Option<String>, // 扫描时间（方言 B 无此列）
    pub sku: String,               // 货品 SKU
    pub location: String,          // 原始货位码（bin code）
}

impl ScanRecord {
    pub fn new(timestamp: Option<String>, sku: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            timestamp,
            sku: sku.into(),
            location: location.into(),
        }
    }

    /// 是否为空货位记录
    pub fn is_empty_bin(&self) -> bool {
        is_empty_sku(&self.sku)
    }
}

/// 空货位判定
///
/// SKU 大小写不敏感等于 `EMPTY`,或 TRIM 后为空串。
/// 注意: `" EMPTY "` 不算空货位（只有空白判定做 TRIM）。
pub fn is_empty_sku(sku: &str) -> bool {
    sku.trim().is_empty() || sku.to_uppercase() == EMPTY_SKU_TOKEN
}

// ==========================================
// CsvDialect - 输入文件方言
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CsvDialect {
    TimestampSkuLocation, // 方言 A: Timestamp, SKU, Location
    GarmentSkuLocationId, // 方言 B: garment_sku + location_id（任意位置）
}

impl fmt::Display for CsvDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvDialect::TimestampSkuLocation => write!(f, "TIMESTAMP_SKU_LOCATION"),
            CsvDialect::GarmentSkuLocationId => write!(f, "GARMENT_SKU_LOCATION_ID"),
        }
    }
}
