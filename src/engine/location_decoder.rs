// ==========================================
// 仓库货位网格系统 - 货位码解码器
// ==========================================
// 职责: 原始货位码 → 网格坐标
// 格式: R<层号><列字母><两位行号>-<通道>-<槽位>, 例如 R1S32-N-AT1
// 红线: 按字符（非字节）取位,任意输入不得 panic
// ==========================================

use crate::domain::grid::GridCoordinate;

/// 最短可解码长度（字符数）
pub const MIN_LOCATION_CHARS: usize = 5;

/// 货位码前缀
pub const LOCATION_PREFIX: char = 'R';

/// 解码货位码
///
/// # 返回
/// - Some(GridCoordinate): column = 第 1 位 + 第 2 位, row = 第 3-4 位
/// - None: 长度不足 5 或首字符不是 'R'
///
/// # 说明
/// 不校验行号是否为数字、列是否在白名单内;
/// 满足长度与前缀的畸形货位码会解码为布局外坐标,由调用方决定是否绘制。
///
/// # 示例
/// ```
/// use warehouse_grid::engine::location_decoder::decode;
/// let coord = decode("R1S32-N-AT1").unwrap();
/// assert_eq!(coord.column, "1S");
/// assert_eq!(coord.row, "32");
/// assert!(decode("X99").is_none());
/// ```
pub fn decode(location: &str) -> Option<GridCoordinate> {
    let chars: Vec<char> = location.chars().take(MIN_LOCATION_CHARS).collect();
    if chars.len() < MIN_LOCATION_CHARS || chars[0] != LOCATION_PREFIX {
        return None;
    }

    let column: String = chars[1..3].iter().collect();
    let row: String = chars[3..5].iter().collect();
    Some(GridCoordinate { column, row })
}

/// 货位码是否可解码
pub fn is_decodable(location: &str) -> bool {
    decode(location).is_some()
}
