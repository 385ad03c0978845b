// ==========================================
// 供应商到货管控 - 时长计算
// ==========================================
// 规则: 分钟数 = (end - start) 秒数 / 60，向零截断（不是四舍五入）
// 任一端缺失时结果为 None
// 输入可为已解析时刻，也可为存储中的时间戳文本
// ==========================================

use crate::engine::timestamp::parse_instant;
use chrono::NaiveDateTime;

// ==========================================
// IntoInstant - 时刻输入的统一转换
// ==========================================
pub trait IntoInstant {
    fn into_instant(self) -> Option<NaiveDateTime>;
}

impl IntoInstant for NaiveDateTime {
    fn into_instant(self) -> Option<NaiveDateTime> {
        Some(self)
    }
}

impl IntoInstant for &NaiveDateTime {
    fn into_instant(self) -> Option<NaiveDateTime> {
        Some(*self)
    }
}

impl IntoInstant for Option<NaiveDateTime> {
    fn into_instant(self) -> Option<NaiveDateTime> {
        self
    }
}

impl IntoInstant for &str {
    fn into_instant(self) -> Option<NaiveDateTime> {
        parse_instant(Some(self))
    }
}

impl IntoInstant for Option<&str> {
    fn into_instant(self) -> Option<NaiveDateTime> {
        parse_instant(self)
    }
}

impl IntoInstant for &String {
    fn into_instant(self) -> Option<NaiveDateTime> {
        parse_instant(Some(self.as_str()))
    }
}

/// 两个时刻之间的整分钟数（向零截断）
///
/// # 示例
/// ```
/// use dock_control::engine::duration::minutes_between;
/// assert_eq!(minutes_between("2024-08-07 10:12:00", "2024-08-07 10:40:00"), Some(28));
/// assert_eq!(minutes_between("2024-08-07 10:12:00", None::<&str>), None);
/// ```
pub fn minutes_between<S: IntoInstant, E: IntoInstant>(start: S, end: E) -> Option<i64> {
    let start = start.into_instant()?;
    let end = end.into_instant()?;
    Some((end - start).num_seconds() / 60)
}
