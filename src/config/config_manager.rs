// ==========================================
// 仓库货位网格系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写、保存
// 存储: JSON 文件（扁平 key-value,值统一按字符串读取）
// ==========================================

use crate::config::analysis_config_trait::AnalysisConfigReader;
use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::layout::{GridLayout, DEFAULT_COLUMNS, DEFAULT_ROW_COUNT};
use crate::domain::state::SkuLengthPolicy;
use crate::engine::export::DEFAULT_BIN_SEPARATOR;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    path: Option<PathBuf>,
    values: Mutex<BTreeMap<String, String>>,
}

impl ConfigManager {
    /// 从配置文件创建 ConfigManager
    ///
    /// # 参数
    /// - path: 配置文件路径（文件不存在时以空配置启动,保存时创建）
    pub fn new<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            parse_config_json(&raw)?
        } else {
            tracing::debug!(path = %path.display(), "配置文件不存在,使用默认配置");
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path),
            values: Mutex::new(values),
        })
    }

    /// 内存配置（不关联文件,用于测试/临时会话）
    pub fn in_memory() -> Self {
        Self::from_values(BTreeMap::new())
    }

    pub fn from_values(values: BTreeMap<String, String>) -> Self {
        Self {
            path: None,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    /// 读取配置值,带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_global_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（仅内存,调用 save 落盘）
    pub fn update_config(&self, key: &str, value: &str) -> ConfigResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式,按 key 排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let values = self
            .values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(serde_json::to_string_pretty(&*values)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法覆盖同名配置,不删除快照中没有的配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let restored = parse_config_json(snapshot_json)?;
        let mut values = self
            .values
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        let count = restored.len();
        values.extend(restored);
        Ok(count)
    }

    /// 保存到配置文件（自动创建父目录）
    pub fn save(&self) -> ConfigResult<()> {
        let path = self.path.as_ref().ok_or(ConfigError::PathNotSet)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.get_config_snapshot()?)?;
        tracing::info!(path = %path.display(), "配置已保存");
        Ok(())
    }

    fn get_bool(&self, key: &str, default: bool) -> ConfigResult<bool> {
        let value = self.get_config_or_default(key, if default { "true" } else { "false" })?;
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => Ok(true),
            "0" | "false" | "no" | "n" | "off" => Ok(false),
            _ => {
                tracing::warn!(config_key = key, raw_value = %value, "布尔配置格式错误,使用默认值");
                Ok(default)
            }
        }
    }
}

/// 解析配置 JSON: 顶层必须是对象; 非字符串值转为其 JSON 文本
fn parse_config_json(raw: &str) -> ConfigResult<BTreeMap<String, String>> {
    let map: BTreeMap<String, Value> = serde_json::from_str(raw)?;
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

// ==========================================
// AnalysisConfigReader Trait 实现
// ==========================================
impl AnalysisConfigReader for ConfigManager {
    fn get_sku_length_policy(&self) -> ConfigResult<SkuLengthPolicy> {
        if !self.get_bool(config_keys::DUPLICATE_SKU_LENGTH_FILTER, false)? {
            return Ok(SkuLengthPolicy::Any);
        }

        let default_len = SkuLengthPolicy::FIXED_WIDTH_CHARS.to_string();
        let value = self.get_config_or_default(config_keys::DUPLICATE_SKU_LENGTH, &default_len)?;
        match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(SkuLengthPolicy::ExactChars(n)),
            _ => {
                tracing::warn!(
                    config_key = config_keys::DUPLICATE_SKU_LENGTH,
                    raw_value = %value,
                    "SKU 长度配置格式错误,使用默认值"
                );
                Ok(SkuLengthPolicy::fixed_width())
            }
        }
    }

    fn get_grid_layout(&self) -> ConfigResult<GridLayout> {
        let columns_raw = self.get_global_config_value(config_keys::GRID_COLUMNS)?;
        let columns: Vec<String> = columns_raw
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        let columns = if columns.is_empty() {
            DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect()
        } else {
            columns
        };

        let default_rows = DEFAULT_ROW_COUNT.to_string();
        let rows_raw = self.get_config_or_default(config_keys::GRID_ROW_COUNT, &default_rows)?;
        let row_count = match rows_raw.trim().parse::<u32>() {
            Ok(n) if (1..=99).contains(&n) => n,
            _ => {
                tracing::warn!(
                    config_key = config_keys::GRID_ROW_COUNT,
                    raw_value = %rows_raw,
                    "行数配置超出范围 [1, 99],使用默认值"
                );
                DEFAULT_ROW_COUNT
            }
        };

        Ok(GridLayout::new(columns, row_count))
    }

    fn get_export_bin_separator(&self) -> ConfigResult<String> {
        let value =
            self.get_config_or_default(config_keys::EXPORT_BIN_SEPARATOR, DEFAULT_BIN_SEPARATOR)?;
        if value.is_empty() {
            return Ok(DEFAULT_BIN_SEPARATOR.to_string());
        }
        Ok(value)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 重复 SKU 定长过滤
    pub const DUPLICATE_SKU_LENGTH_FILTER: &str = "duplicate_sku_length_filter";
    pub const DUPLICATE_SKU_LENGTH: &str = "duplicate_sku_length";

    // 网格布局
    pub const GRID_COLUMNS: &str = "grid_columns";
    pub const GRID_ROW_COUNT: &str = "grid_row_count";

    // 导出
    pub const EXPORT_BIN_SEPARATOR: &str = "export_bin_separator";

    pub const ALL: &[&str] = &[
        DUPLICATE_SKU_LENGTH_FILTER,
        DUPLICATE_SKU_LENGTH,
        GRID_COLUMNS,
        GRID_ROW_COUNT,
        EXPORT_BIN_SEPARATOR,
    ];
}
