// ==========================================
// 供应商到货管控 - 持久化时间戳
// ==========================================
// 存储格式: "YYYY-MM-DD HH:MM:SS"（写入统一补零）
// 读取兼容: "YYYY-M-D H:MM:SS"（月/日/时不补零）、ISO 的 'T' 分隔、缺秒
// ==========================================

use crate::domain::types::non_blank;
use chrono::NaiveDateTime;

/// 写入格式
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 读取时依次尝试的格式（chrono 数字字段接受 1~2 位）
const READ_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// 解析存储中的时间戳，空值或无法解析返回 None
pub fn parse_instant(raw: Option<&str>) -> Option<NaiveDateTime> {
    let value = non_blank(raw)?;
    READ_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// 格式化为存储格式
pub fn format_instant(instant: &NaiveDateTime) -> String {
    instant.format(STORAGE_FORMAT).to_string()
}
