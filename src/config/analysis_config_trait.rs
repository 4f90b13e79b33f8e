// ==========================================
// 仓库货位网格系统 - 分析配置读取 Trait
// ==========================================
// 职责: 定义分析/导出所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::error::ConfigResult;
use crate::domain::layout::GridLayout;
use crate::domain::state::SkuLengthPolicy;

// ==========================================
// AnalysisConfigReader Trait
// ==========================================
// 用途: 分析引擎与导出所需的配置读取接口
// 实现者: ConfigManager（从 JSON 配置文件读取）
pub trait AnalysisConfigReader: Send + Sync {
    /// 获取重复 SKU 的长度策略
    ///
    /// # 默认值
    /// - SkuLengthPolicy::Any（定长过滤默认关闭）
    fn get_sku_length_policy(&self) -> ConfigResult<SkuLengthPolicy>;

    /// 获取网格布局（列白名单 + 行数）
    ///
    /// # 默认值
    /// - 70 列默认白名单, 90 行
    fn get_grid_layout(&self) -> ConfigResult<GridLayout>;

    /// 获取导出时货位码拼接分隔符
    ///
    /// # 默认值
    /// - ", "
    fn get_export_bin_separator(&self) -> ConfigResult<String>;
}
