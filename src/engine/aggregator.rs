// ==========================================
// 供应商到货管控 - 报表聚合
// ==========================================
// 职责: 按 ISO 周 / 预约小时聚合四项时间指标
// 选取规则:
// - 报表周 = 当前周之前的 weeks_back 个整周（当前周永远排除）
// - 仅统计 total_minutes 非空（作业已完成）的记录
// - 供应商过滤在分组之前执行
// 均值: 每项指标跳过空值，保留一位小数（银行家舍入，逢五取偶）
// 红线: 纯函数，不访问存储
// ==========================================

use crate::config::dock_config::MAX_WEEKS_BACK;
use crate::domain::management::ManagementRecord;
use crate::domain::metrics::{
    HourAggregate, MetricMeans, PeriodSummary, SupplierFilter, WeekAggregate,
};
use crate::domain::types::non_blank;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ==========================================
// MetricsAggregator
// ==========================================
pub struct MetricsAggregator;

impl MetricsAggregator {
    /// 报表周（由远到近）
    ///
    /// 按日历回推 7·i 天取 ISO 周号，跨年时自然回绕
    /// 超过 MAX_WEEKS_BACK 的回看不会带来新的周号，按上限截断
    pub fn reporting_weeks(today: NaiveDate, weeks_back: u32) -> Vec<u32> {
        let current = today.iso_week().week();
        let mut weeks: Vec<u32> = (1..=i64::from(weeks_back.min(MAX_WEEKS_BACK)))
            .rev()
            .map(|i| (today - Duration::days(7 * i)).iso_week().week())
            .filter(|w| *w != current)
            .collect();

        // 回推超过一年时周号会重复
        let mut seen = BTreeSet::new();
        weeks.retain(|w| seen.insert(*w));
        weeks
    }

    /// 报表记录集: 报表周内、作业已完成、匹配供应商
    pub fn select_reporting_records<'a>(
        records: &'a [ManagementRecord],
        today: NaiveDate,
        weeks_back: u32,
        filter: &SupplierFilter,
    ) -> Vec<&'a ManagementRecord> {
        let weeks: BTreeSet<u32> = Self::reporting_weeks(today, weeks_back).into_iter().collect();

        records
            .iter()
            .filter(|r| weeks.contains(&r.iso_week))
            .filter(|r| r.total_minutes.is_some())
            .filter(|r| filter.matches(&r.supplier))
            .collect()
    }

    /// 按 ISO 周聚合，按报表周时间顺序输出（无记录的周不输出）
    pub fn aggregate_by_week(
        records: &[ManagementRecord],
        today: NaiveDate,
        weeks_back: u32,
        filter: &SupplierFilter,
    ) -> Vec<WeekAggregate> {
        let selected = Self::select_reporting_records(records, today, weeks_back, filter);

        let mut groups: HashMap<u32, Vec<&ManagementRecord>> = HashMap::new();
        for record in selected {
            groups.entry(record.iso_week).or_default().push(record);
        }

        Self::reporting_weeks(today, weeks_back)
            .into_iter()
            .filter_map(|week| {
                groups.get(&week).map(|group| WeekAggregate {
                    iso_week: week,
                    record_count: group.len(),
                    means: mean_metrics(group),
                })
            })
            .collect()
    }

    /// 按预约小时聚合
    ///
    /// 输入为报表记录集；预约小时为空的记录不参与，小时升序输出
    pub fn aggregate_by_hour<'a, I>(records: I, filter: &SupplierFilter) -> Vec<HourAggregate>
    where
        I: IntoIterator<Item = &'a ManagementRecord>,
    {
        let mut groups: BTreeMap<u32, Vec<&ManagementRecord>> = BTreeMap::new();
        for record in records.into_iter().filter(|r| filter.matches(&r.supplier)) {
            if let Some(hour) = record.scheduled_hour {
                groups.entry(hour).or_default().push(record);
            }
        }

        groups
            .into_iter()
            .map(|(hour, group)| HourAggregate {
                scheduled_hour: hour,
                record_count: group.len(),
                means: mean_metrics(&group),
            })
            .collect()
    }

    /// 报表区间统计
    pub fn period_summary(
        records: &[ManagementRecord],
        today: NaiveDate,
        weeks_back: u32,
        filter: &SupplierFilter,
    ) -> PeriodSummary {
        let selected = Self::select_reporting_records(records, today, weeks_back, filter);
        PeriodSummary {
            record_count: selected.len(),
            means: mean_metrics(&selected),
        }
    }

    /// 供应商下拉选项（去重、排序、去空）
    pub fn supplier_options(records: &[ManagementRecord]) -> Vec<String> {
        records
            .iter()
            .filter_map(|r| non_blank(Some(r.supplier.as_str())))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn mean_metrics(group: &[&ManagementRecord]) -> MetricMeans {
    MetricMeans {
        wait_minutes: mean(group.iter().filter_map(|r| r.wait_minutes)),
        service_minutes: mean(group.iter().filter_map(|r| r.service_minutes)),
        total_minutes: mean(group.iter().filter_map(|r| r.total_minutes)),
        delay_minutes: mean(group.iter().map(|r| r.delay_minutes)),
    }
}

fn mean(values: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values.fold((0i64, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(round_one_decimal(sum as f64 / count as f64))
    }
}

/// 保留一位小数（逢五取偶，与 pandas `round(1)` 一致）
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-08-07 属于 ISO 第 32 周
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 7).unwrap()
    }

    fn record(
        order_id: &str,
        supplier: &str,
        week: u32,
        hour: Option<u32>,
        total: Option<i64>,
        delay: i64,
    ) -> ManagementRecord {
        ManagementRecord {
            order_id: order_id.to_string(),
            supplier: supplier.to_string(),
            package_count: "1".to_string(),
            arrival_at: Some("2024-07-25 10:00:00".to_string()),
            service_start_at: total.map(|_| "2024-07-25 10:05:00".to_string()),
            service_end_at: total.map(|_| "2024-07-25 10:30:00".to_string()),
            wait_minutes: total.map(|t| t / 4),
            service_minutes: total.map(|t| t - t / 4),
            total_minutes: total,
            delay_minutes: delay,
            iso_week: week,
            scheduled_hour: hour,
        }
    }

    #[test]
    fn test_reporting_weeks_exclude_current() {
        assert_eq!(MetricsAggregator::reporting_weeks(today(), 2), vec![30, 31]);
        assert_eq!(MetricsAggregator::reporting_weeks(today(), 1), vec![31]);
    }

    #[test]
    fn test_reporting_weeks_wrap_year() {
        // 2024-01-10 属于第 2 周；2023 年有 52 周
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(MetricsAggregator::reporting_weeks(day, 3), vec![51, 52, 1]);
    }

    #[test]
    fn test_week_window() {
        let records = vec![
            record("A", "Acme", 30, Some(9), Some(40), 5),
            record("B", "Acme", 31, Some(10), Some(20), -3),
            record("C", "Acme", 32, Some(10), Some(20), 0),
        ];

        let two = MetricsAggregator::aggregate_by_week(&records, today(), 2, &SupplierFilter::All);
        assert_eq!(two.iter().map(|w| w.iso_week).collect::<Vec<_>>(), vec![30, 31]);

        let one = MetricsAggregator::aggregate_by_week(&records, today(), 1, &SupplierFilter::All);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].iso_week, 31);
        assert_eq!(one[0].means.delay_minutes, Some(-3.0));
    }

    #[test]
    fn test_incomplete_records_skipped() {
        let records = vec![
            record("A", "Acme", 31, Some(9), Some(30), 2),
            record("B", "Acme", 31, Some(9), None, 8),
        ];
        let weeks = MetricsAggregator::aggregate_by_week(&records, today(), 1, &SupplierFilter::All);
        assert_eq!(weeks[0].record_count, 1);
        assert_eq!(weeks[0].means.total_minutes, Some(30.0));
        assert_eq!(weeks[0].means.delay_minutes, Some(2.0));
    }

    #[test]
    fn test_mean_rounded_to_one_decimal() {
        let records = vec![
            record("A", "Acme", 31, Some(9), Some(10), 1),
            record("B", "Acme", 31, Some(9), Some(11), 1),
            record("C", "Acme", 31, Some(9), Some(11), 2),
        ];
        let weeks = MetricsAggregator::aggregate_by_week(&records, today(), 1, &SupplierFilter::All);
        assert_eq!(weeks[0].means.total_minutes, Some(10.7));
        assert_eq!(weeks[0].means.delay_minutes, Some(1.3));
        assert_eq!(round_one_decimal(2.25), 2.2);
        assert_eq!(round_one_decimal(-2.25), -2.2);
        assert_eq!(round_one_decimal(0.25), 0.2);
        assert_eq!(round_one_decimal(0.35), 0.4);
    }

    #[test]
    fn test_half_mean_rounds_to_even() {
        let records = vec![
            record("A", "Acme", 31, Some(9), Some(10), 2),
            record("B", "Acme", 31, Some(9), Some(10), 3),
            record("C", "Acme", 31, Some(9), Some(10), 2),
            record("D", "Acme", 31, Some(9), Some(10), 2),
        ];
        let weeks = MetricsAggregator::aggregate_by_week(&records, today(), 1, &SupplierFilter::All);
        assert_eq!(weeks[0].means.delay_minutes, Some(2.2));
    }

    #[test]
    fn test_huge_weeks_back_is_capped() {
        let weeks = MetricsAggregator::reporting_weeks(today(), 200_000_000);
        assert_eq!(weeks, MetricsAggregator::reporting_weeks(today(), MAX_WEEKS_BACK));
        assert_eq!(weeks.len(), 51);
        assert!(!weeks.contains(&32));
        // 回看满一年: 2023 年第 31 周最早出现
        assert_eq!(weeks.first(), Some(&31));
        assert_eq!(weeks.last(), Some(&30));
    }

    #[test]
    fn test_hour_excludes_missing_scheduled_hour() {
        let records = vec![
            record("A", "Acme", 31, Some(11), Some(30), 0),
            record("B", "Acme", 31, None, Some(50), 0),
            record("C", "Acme", 31, Some(9), Some(20), 0),
        ];
        let selected =
            MetricsAggregator::select_reporting_records(&records, today(), 1, &SupplierFilter::All);
        let hours = MetricsAggregator::aggregate_by_hour(selected, &SupplierFilter::All);

        assert_eq!(hours.iter().map(|h| h.scheduled_hour).collect::<Vec<_>>(), vec![9, 11]);
        assert_eq!(hours.iter().map(|h| h.record_count).sum::<usize>(), 2);
    }

    #[test]
    fn test_supplier_filter_before_grouping() {
        let records = vec![
            record("A", "Acme", 31, Some(10), Some(20), 0),
            record("B", "Globex", 31, Some(10), Some(60), 0),
        ];
        let acme = SupplierFilter::Only("Acme".to_string());

        let weeks = MetricsAggregator::aggregate_by_week(&records, today(), 1, &acme);
        assert_eq!(weeks[0].record_count, 1);
        assert_eq!(weeks[0].means.total_minutes, Some(20.0));

        let hours = MetricsAggregator::aggregate_by_hour(&records, &acme);
        assert_eq!(hours[0].record_count, 1);
        assert_eq!(hours[0].means.total_minutes, Some(20.0));
    }

    #[test]
    fn test_period_summary_and_supplier_options() {
        let records = vec![
            record("A", "Globex", 31, Some(10), Some(20), 4),
            record("B", "Acme", 30, Some(10), Some(40), 0),
            record("C", " ", 30, Some(10), Some(40), 0),
            record("D", "Acme", 25, Some(10), Some(40), 0),
        ];
        let summary = MetricsAggregator::period_summary(&records, today(), 2, &SupplierFilter::All);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.means.delay_minutes, Some(1.3));

        assert_eq!(
            MetricsAggregator::supplier_options(&records),
            vec!["Acme".to_string(), "Globex".to_string()]
        );
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<ManagementRecord> = Vec::new();
        let summary = MetricsAggregator::period_summary(&records, today(), 4, &SupplierFilter::All);
        assert_eq!(summary.record_count, 0);
        assert_eq!(summary.means, MetricMeans::default());
        assert!(MetricsAggregator::aggregate_by_hour(&records, &SupplierFilter::All).is_empty());
    }
}
