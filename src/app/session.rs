// ==========================================
// 仓库货位网格系统 - 会话视图状态
// ==========================================
// 职责: 单个会话的高亮集合、当前过滤模式、缩放比例
// 红线: 视图状态由调用方持有,不放全局; 查询结果只读取 API
// ==========================================

use crate::api::{ApiResult, WarehouseApi};
use crate::domain::grid::GridCoordinate;
use crate::domain::view::OccupancyMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const ZOOM_STEP: f64 = 0.1;
pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 2.0;
pub const ZOOM_FIT: f64 = 1.0;

/// 当前高亮来源
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HighlightMode {
    #[default]
    None,
    Search {
        sku_query: Option<String>,
        location_query: Option<String>,
    },
    Duplicates,
    Empties,
}

// ==========================================
// ViewState - 视图状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub highlighted: BTreeSet<GridCoordinate>,
    pub current_filter: HighlightMode,
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            highlighted: BTreeSet::new(),
            current_filter: HighlightMode::None,
            zoom: ZOOM_FIT,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 应用搜索高亮
    ///
    /// # 返回
    /// - 高亮单元格数量
    ///
    /// # 说明
    /// - 先清空旧高亮; 两个查询词都为空白时保持清空状态
    pub fn apply_search(
        &mut self,
        api: &WarehouseApi,
        sku_query: Option<&str>,
        location_query: Option<&str>,
    ) -> ApiResult<usize> {
        self.clear();

        let sku_query = non_blank(sku_query);
        let location_query = non_blank(location_query);
        if sku_query.is_none() && location_query.is_none() {
            return Ok(0);
        }

        self.highlighted = api.search(sku_query.as_deref(), location_query.as_deref())?;
        self.current_filter = HighlightMode::Search {
            sku_query,
            location_query,
        };
        Ok(self.highlighted.len())
    }

    /// 高亮含重复 SKU 的单元格
    pub fn apply_duplicates(&mut self, api: &WarehouseApi) -> ApiResult<usize> {
        self.highlighted = api.duplicates()?;
        self.current_filter = HighlightMode::Duplicates;
        Ok(self.highlighted.len())
    }

    /// 高亮含空货位的单元格
    pub fn apply_empties(&mut self, api: &WarehouseApi) -> ApiResult<usize> {
        self.highlighted = api.empties()?;
        self.current_filter = HighlightMode::Empties;
        Ok(self.highlighted.len())
    }

    pub fn clear(&mut self) {
        self.highlighted.clear();
        self.current_filter = HighlightMode::None;
    }

    pub fn is_highlighted(&self, coordinate: &GridCoordinate) -> bool {
        self.highlighted.contains(coordinate)
    }

    /// 当前视图对应的占用矩阵
    pub fn occupancy_matrix(&self, api: &WarehouseApi) -> ApiResult<OccupancyMatrix> {
        api.occupancy_matrix(&self.highlighted)
    }

    // ===== 缩放 =====

    pub fn zoom_in(&mut self) -> f64 {
        self.set_zoom(self.zoom + ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set_zoom(self.zoom - ZOOM_STEP)
    }

    pub fn fit_to_window(&mut self) -> f64 {
        self.set_zoom(ZOOM_FIT)
    }

    // 保留一位小数,避免步进累积误差
    fn set_zoom(&mut self, value: f64) -> f64 {
        let rounded = (value * 10.0).round() / 10.0;
        self.zoom = rounded.clamp(ZOOM_MIN, ZOOM_MAX);
        self.zoom
    }
}

fn non_blank(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
}
