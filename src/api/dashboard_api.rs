// ==========================================
// 供应商到货管控 - 看板 API
// ==========================================
// 职责: 时间指标报表（区间统计 / 按周 / 按预约小时）
// 架构: API 层 → MetricsAggregator（纯函数）
// 约束: weeks_back 必须在 1..=MAX_WEEKS_BACK；当前周不参与统计
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::dock_config::{DockConfig, MAX_WEEKS_BACK};
use crate::domain::metrics::{HourAggregate, PeriodSummary, SupplierFilter, WeekAggregate};
use crate::engine::aggregator::MetricsAggregator;
use crate::repository::gateway::PersistenceGateway;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

/// 看板报表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub today: NaiveDate,
    pub weeks_back: u32,
    pub reporting_weeks: Vec<u32>,
    pub supplier: SupplierFilter,
    pub summary: PeriodSummary,
    pub by_week: Vec<WeekAggregate>,
    pub by_hour: Vec<HourAggregate>,
}

// ==========================================
// DashboardApi
// ==========================================
pub struct DashboardApi {
    gateway: Arc<dyn PersistenceGateway>,
    config: DockConfig,
}

impl DashboardApi {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, config: DockConfig) -> Self {
        Self { gateway, config }
    }

    /// 看板周期选项
    pub fn week_options(&self) -> &[u32] {
        &self.config.week_options
    }

    pub fn default_weeks_back(&self) -> u32 {
        self.config.default_weeks_back
    }

    /// 供应商过滤选项
    pub fn supplier_options(&self) -> ApiResult<Vec<String>> {
        let records = self.gateway.fetch_management_records()?;
        Ok(MetricsAggregator::supplier_options(&records))
    }

    /// 按 ISO 周聚合
    pub fn aggregate_by_week(
        &self,
        today: NaiveDate,
        weeks_back: u32,
        supplier: &SupplierFilter,
    ) -> ApiResult<Vec<WeekAggregate>> {
        validate_weeks_back(weeks_back)?;
        let records = self.gateway.fetch_management_records()?;
        Ok(MetricsAggregator::aggregate_by_week(
            &records, today, weeks_back, supplier,
        ))
    }

    /// 按预约小时聚合（与周报表使用同一记录集）
    pub fn aggregate_by_hour(
        &self,
        today: NaiveDate,
        weeks_back: u32,
        supplier: &SupplierFilter,
    ) -> ApiResult<Vec<HourAggregate>> {
        validate_weeks_back(weeks_back)?;
        let records = self.gateway.fetch_management_records()?;
        let selected =
            MetricsAggregator::select_reporting_records(&records, today, weeks_back, supplier);
        Ok(MetricsAggregator::aggregate_by_hour(selected, supplier))
    }

    /// 完整看板报表
    pub fn get_report(
        &self,
        today: NaiveDate,
        weeks_back: u32,
        supplier: SupplierFilter,
    ) -> ApiResult<DashboardReport> {
        validate_weeks_back(weeks_back)?;
        let records = self.gateway.fetch_management_records()?;

        let selected =
            MetricsAggregator::select_reporting_records(&records, today, weeks_back, &supplier);
        let by_hour = MetricsAggregator::aggregate_by_hour(selected, &supplier);
        let by_week = MetricsAggregator::aggregate_by_week(&records, today, weeks_back, &supplier);
        let summary = MetricsAggregator::period_summary(&records, today, weeks_back, &supplier);

        tracing::debug!(
            %today,
            weeks_back,
            records = summary.record_count,
            "看板报表已生成"
        );

        Ok(DashboardReport {
            today,
            weeks_back,
            reporting_weeks: MetricsAggregator::reporting_weeks(today, weeks_back),
            supplier,
            summary,
            by_week,
            by_hour,
        })
    }
}

fn validate_weeks_back(weeks_back: u32) -> ApiResult<()> {
    if weeks_back == 0 || weeks_back > MAX_WEEKS_BACK {
        return Err(ApiError::InvalidInput(format!(
            "统计周数必须在 1..={} 之间: {}",
            MAX_WEEKS_BACK, weeks_back
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::management::ManagementRecord;
    use crate::repository::gateway::InMemoryGateway;

    fn completed(order_id: &str, supplier: &str, week: u32, hour: Option<u32>, total: i64) -> ManagementRecord {
        ManagementRecord {
            order_id: order_id.to_string(),
            supplier: supplier.to_string(),
            package_count: "1".to_string(),
            arrival_at: Some("2024-07-30 10:00:00".to_string()),
            service_start_at: Some("2024-07-30 10:05:00".to_string()),
            service_end_at: Some("2024-07-30 10:30:00".to_string()),
            wait_minutes: Some(5),
            service_minutes: Some(total - 5),
            total_minutes: Some(total),
            delay_minutes: 0,
            iso_week: week,
            scheduled_hour: hour,
        }
    }

    fn api() -> DashboardApi {
        let gateway = InMemoryGateway::new();
        for record in [
            completed("A", "Acme", 31, Some(10), 30),
            completed("B", "Globex", 31, Some(11), 50),
            completed("C", "Acme", 30, None, 20),
        ] {
            gateway.upsert_management_record(&record).unwrap();
        }
        DashboardApi::new(Arc::new(gateway), DockConfig::default())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 7).unwrap()
    }

    #[test]
    fn test_report_all_suppliers() {
        let report = api().get_report(today(), 2, SupplierFilter::All).unwrap();
        assert_eq!(report.reporting_weeks, vec![30, 31]);
        assert_eq!(report.summary.record_count, 3);
        assert_eq!(report.by_week.len(), 2);
        assert_eq!(report.by_hour.len(), 2);
    }

    #[test]
    fn test_report_single_supplier() {
        let report = api()
            .get_report(today(), 2, SupplierFilter::Only("Acme".to_string()))
            .unwrap();
        assert_eq!(report.summary.record_count, 2);
        assert_eq!(report.summary.means.total_minutes, Some(25.0));
        assert_eq!(report.by_hour.len(), 1);
        assert_eq!(report.by_hour[0].scheduled_hour, 10);
    }

    #[test]
    fn test_zero_weeks_rejected() {
        let err = api().get_report(today(), 0, SupplierFilter::All).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_weeks_back_upper_bound() {
        let api = api();
        assert!(api.get_report(today(), MAX_WEEKS_BACK, SupplierFilter::All).is_ok());

        let err = api
            .aggregate_by_week(today(), 200_000_000, &SupplierFilter::All)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        let err = api
            .get_report(today(), MAX_WEEKS_BACK + 1, SupplierFilter::All)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[test]
    fn test_options() {
        let api = api();
        assert_eq!(api.supplier_options().unwrap(), vec!["Acme", "Globex"]);
        assert_eq!(api.week_options(), &[1, 2, 4, 12, 24]);
        assert_eq!(api.default_weeks_back(), 1);
    }
}
