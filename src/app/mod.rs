// ==========================================
// 仓库货位网格系统 - 应用层
// ==========================================
// 职责: 应用级共享状态 + 会话视图状态
// ==========================================

pub mod session;
pub mod state;

// 重导出
pub use session::{HighlightMode, ViewState};
pub use state::{get_default_config_path, AppState};
