// ==========================================
// 供应商到货管控 - 预约时段解析
// ==========================================
// 职责: 将自由文本的预约时段解析为开始时刻
// 红线: 解析失败不抛错，返回 None，由调用方走兜底链
// ==========================================
// 解析顺序（首个成功者胜出）:
// 1. 逗号分隔的合并时段 "09:00, 09:30"（首段可带秒）
// 2. 单一时刻 "09:00"
// 3. 时间范围 "09:00-09:30" / "09:00 - 09:30"
// 兜底: 冒号拆分 "HH" / "HH:MM" / "HH:MM:SS"，缺省分/秒补 0
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

// ==========================================
// SlotStrategy - 时段解析策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStrategy {
    CombinedSlots,
    SingleTime,
    Range,
}

/// 策略按固定顺序尝试
pub const SLOT_STRATEGIES: [SlotStrategy; 3] = [
    SlotStrategy::CombinedSlots,
    SlotStrategy::SingleTime,
    SlotStrategy::Range,
];

impl SlotStrategy {
    /// 按本策略解析开始时刻
    pub fn parse(&self, raw: &str) -> Option<NaiveTime> {
        match self {
            SlotStrategy::CombinedSlots => {
                if !raw.contains(',') {
                    return None;
                }
                let first = raw.split(',').next()?.trim();
                parse_hh_mm(strip_seconds(first))
            }
            SlotStrategy::SingleTime => parse_hh_mm(raw.trim()),
            SlotStrategy::Range => {
                if !raw.contains('-') {
                    return None;
                }
                parse_hh_mm(raw.split('-').next()?.trim())
            }
        }
    }
}

/// 时段开始时刻的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind", content = "strategy")]
pub enum SlotSource {
    Strategy(SlotStrategy),
    ColonFallback,
}

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotResolution {
    pub start: NaiveTime,
    pub source: SlotSource,
}

// ==========================================
// 对外入口
// ==========================================

/// 仅使用三种标准策略解析开始时刻
pub fn parse_slot_start(raw: &str) -> Option<NaiveTime> {
    SLOT_STRATEGIES.iter().find_map(|s| s.parse(raw))
}

/// 完整兜底链: 三种策略 → 冒号拆分
pub fn resolve_slot_start(raw: &str) -> Option<SlotResolution> {
    for strategy in SLOT_STRATEGIES {
        if let Some(start) = strategy.parse(raw) {
            return Some(SlotResolution {
                start,
                source: SlotSource::Strategy(strategy),
            });
        }
    }

    let resolved = parse_colon_components(raw).map(|start| SlotResolution {
        start,
        source: SlotSource::ColonFallback,
    });
    if resolved.is_none() {
        tracing::debug!(slot = raw, "预约时段无法解析");
    }
    resolved
}

/// 将时段开始时刻落到指定日期上
pub fn resolve_scheduled_instant(raw: &str, date: NaiveDate) -> Option<NaiveDateTime> {
    resolve_slot_start(raw).map(|r| date.and_time(r.start))
}

/// 冒号拆分兜底: 1~3 段数字，缺省补 0
pub fn parse_colon_components(raw: &str) -> Option<NaiveTime> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut hms = [0u32; 3];
    for (idx, part) in parts.iter().enumerate() {
        hms[idx] = part.trim().parse().ok()?;
    }

    NaiveTime::from_hms_opt(hms[0], hms[1], hms[2])
}

fn parse_hh_mm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// "09:00:00" → "09:00"
fn strip_seconds(s: &str) -> &str {
    if s.matches(':').count() == 2 {
        s.rfind(':').map(|idx| &s[..idx]).unwrap_or(s)
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_single_time_recovers_every_valid_hh_mm() {
        for h in 0..24 {
            for m in 0..60 {
                let raw = format!("{:02}:{:02}", h, m);
                assert_eq!(SlotStrategy::SingleTime.parse(&raw), Some(hm(h, m)), "{}", raw);
            }
        }
    }

    #[test]
    fn test_combined_slots() {
        assert_eq!(parse_slot_start("09:00,09:30"), Some(hm(9, 0)));
        assert_eq!(parse_slot_start("09:00:00,09:30:00"), Some(hm(9, 0)));
        assert_eq!(parse_slot_start("09:00, 09:30, 10:00"), Some(hm(9, 0)));
    }

    #[test]
    fn test_range_with_and_without_spaces() {
        assert_eq!(parse_slot_start("09:00-09:30"), Some(hm(9, 0)));
        assert_eq!(parse_slot_start("09:00 - 09:30"), Some(hm(9, 0)));
        assert_eq!(
            resolve_slot_start("10:00-10:30").map(|r| r.source),
            Some(SlotSource::Strategy(SlotStrategy::Range))
        );
    }

    #[test]
    fn test_strategy_order_combined_wins() {
        // 同时含逗号与横线时按合并时段处理
        let r = resolve_slot_start("08:30,09:00-09:30").unwrap();
        assert_eq!(r.start, hm(8, 30));
        assert_eq!(r.source, SlotSource::Strategy(SlotStrategy::CombinedSlots));
    }

    #[test]
    fn test_colon_fallback() {
        assert_eq!(parse_slot_start("10:00:00"), None);
        let r = resolve_slot_start("10:00:00").unwrap();
        assert_eq!(r.start, hm(10, 0));
        assert_eq!(r.source, SlotSource::ColonFallback);

        assert_eq!(
            parse_colon_components("10:15:30"),
            NaiveTime::from_hms_opt(10, 15, 30)
        );
        assert_eq!(parse_colon_components("14"), Some(hm(14, 0)));
        assert_eq!(parse_colon_components(" 7 : 5 "), Some(hm(7, 5)));
    }

    #[test]
    fn test_unparseable_slots() {
        assert_eq!(resolve_slot_start(""), None);
        assert_eq!(resolve_slot_start("mañana"), None);
        assert_eq!(resolve_slot_start("25:00"), None);
        assert_eq!(resolve_slot_start("1:2:3:4"), None);
        assert_eq!(resolve_slot_start("por confirmar - tarde"), None);
    }

    #[test]
    fn test_resolve_scheduled_instant() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 7).unwrap();
        assert_eq!(
            resolve_scheduled_instant("10:00-10:30", date),
            Some(date.and_hms_opt(10, 0, 0).unwrap())
        );
        assert_eq!(resolve_scheduled_instant("n/a", date), None);
    }
}
