// ==========================================
// 供应商到货管控 - 报表指标类型
// ==========================================
// 职责: 周/小时聚合结果、区间统计、供应商过滤条件
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// SupplierFilter - 供应商过滤
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind", content = "supplier")]
pub enum SupplierFilter {
    #[default]
    All,
    Only(String),
}

impl SupplierFilter {
    /// 从界面选择值构造（空值视为全部供应商）
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection.map(str::trim) {
            Some(s) if !s.is_empty() => SupplierFilter::Only(s.to_string()),
            _ => SupplierFilter::All,
        }
    }

    pub fn matches(&self, supplier: &str) -> bool {
        match self {
            SupplierFilter::All => true,
            SupplierFilter::Only(expected) => expected == supplier,
        }
    }
}

// ==========================================
// MetricMeans - 四项时间指标均值（保留一位小数）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricMeans {
    pub wait_minutes: Option<f64>,
    pub service_minutes: Option<f64>,
    pub total_minutes: Option<f64>,
    pub delay_minutes: Option<f64>,
}

/// 按 ISO 周聚合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekAggregate {
    pub iso_week: u32,
    pub record_count: usize,
    #[serde(flatten)]
    pub means: MetricMeans,
}

/// 按预约小时聚合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourAggregate {
    pub scheduled_hour: u32,
    pub record_count: usize,
    #[serde(flatten)]
    pub means: MetricMeans,
}

/// 报表区间统计（看板顶部指标卡）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub record_count: usize,
    #[serde(flatten)]
    pub means: MetricMeans,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_filter_selection() {
        assert_eq!(SupplierFilter::from_selection(None), SupplierFilter::All);
        assert_eq!(SupplierFilter::from_selection(Some("  ")), SupplierFilter::All);
        assert_eq!(
            SupplierFilter::from_selection(Some("Acme")),
            SupplierFilter::Only("Acme".to_string())
        );
    }

    #[test]
    fn test_supplier_filter_matches() {
        let only = SupplierFilter::Only("Acme".to_string());
        assert!(only.matches("Acme"));
        assert!(!only.matches("Globex"));
        assert!(SupplierFilter::All.matches("Globex"));
    }
}
