// ==========================================
// 供应商到货管控 - 录入默认值
// ==========================================
// 到货: 取预约开始时刻，小时收敛到作业时间窗；
//       时段无法解析时取 max(开门小时, 当前小时) 收敛，分钟为 0
// 作业: 小时取到货小时并收敛，分钟沿用到货的分钟（不对齐网格）
// ==========================================

use crate::config::dock_config::OperatingHours;
use crate::engine::time_parser::resolve_slot_start;
use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// 到货录入的默认时刻
pub fn default_arrival_time(slot: &str, now: NaiveDateTime, hours: &OperatingHours) -> NaiveTime {
    let (hour, minute) = match resolve_slot_start(slot) {
        Some(resolved) => (resolved.start.hour(), resolved.start.minute()),
        None => (hours.open_hour.max(now.hour()), 0),
    };

    to_time(hours.clamp(hour), minute.min(59))
}

/// 作业录入（开始/结束）的默认时刻
pub fn default_service_time(arrival: NaiveDateTime, hours: &OperatingHours) -> NaiveTime {
    to_time(hours.clamp(arrival.hour()), arrival.minute())
}

fn to_time(hour: u32, minute: u32) -> NaiveTime {
    // hour 已收敛到 0..=23，minute 在 0..=59
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 7)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_arrival_default_from_slot() {
        let hours = OperatingHours::default();
        assert_eq!(default_arrival_time("10:30-11:00", at(8, 0), &hours), hm(10, 30));
        assert_eq!(default_arrival_time("10:45:00", at(8, 0), &hours), hm(10, 45));
    }

    #[test]
    fn test_arrival_default_clamped() {
        let hours = OperatingHours::default();
        assert_eq!(default_arrival_time("07:15", at(8, 0), &hours), hm(9, 15));
        assert_eq!(default_arrival_time("20:15", at(8, 0), &hours), hm(18, 15));
    }

    #[test]
    fn test_arrival_default_unparseable_uses_clock() {
        let hours = OperatingHours::default();
        assert_eq!(default_arrival_time("por confirmar", at(7, 40), &hours), hm(9, 0));
        assert_eq!(default_arrival_time("por confirmar", at(13, 40), &hours), hm(13, 0));
        assert_eq!(default_arrival_time("por confirmar", at(21, 5), &hours), hm(18, 0));
    }

    #[test]
    fn test_service_default_keeps_exact_minute() {
        let hours = OperatingHours::default();
        assert_eq!(default_service_time(at(10, 12), &hours), hm(10, 12));
        assert_eq!(default_service_time(at(8, 47), &hours), hm(9, 47));
        assert_eq!(default_service_time(at(19, 3), &hours), hm(18, 3));
    }
}
