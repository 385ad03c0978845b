// ==========================================
// 供应商到货管控 - 管理记录实体
// ==========================================
// 每个订单一条，先插入(到货)后更新(作业)，本系统从不删除
// 时间字段按外部存储原样保存为文本: "YYYY-MM-DD HH:MM:SS"
// 不变式:
// - service_start_at / service_end_at 同时存在或同时缺失
// - 两者存在时 end > start 且 start >= arrival
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ManagementRecord - 到货/作业管理记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementRecord {
    pub order_id: String,
    pub supplier: String,
    pub package_count: String,

    // ===== 时间戳（原始文本，可能为空/占位符） =====
    pub arrival_at: Option<String>,
    pub service_start_at: Option<String>,
    pub service_end_at: Option<String>,

    // ===== 时间指标（分钟，截断取整） =====
    pub wait_minutes: Option<i64>,    // 到货 → 开始作业
    pub service_minutes: Option<i64>, // 开始作业 → 结束作业
    pub total_minutes: Option<i64>,   // 到货 → 结束作业
    pub delay_minutes: i64,           // 到货 - 预约开始（负数表示提前）

    // ===== 报表维度 =====
    pub iso_week: u32,                // 到货时刻的 ISO 周
    pub scheduled_hour: Option<u32>,  // 预约开始小时（时段无法解析时为空）
}

// ==========================================
// ManagementColumn - 可部分更新的列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagementColumn {
    ArrivalAt,
    ServiceStartAt,
    ServiceEndAt,
    WaitMinutes,
    ServiceMinutes,
    TotalMinutes,
    DelayMinutes,
    IsoWeek,
    ScheduledHour,
}

impl ManagementColumn {
    /// 数据库列名
    pub fn column_name(&self) -> &'static str {
        match self {
            ManagementColumn::ArrivalAt => "arrival_at",
            ManagementColumn::ServiceStartAt => "service_start_at",
            ManagementColumn::ServiceEndAt => "service_end_at",
            ManagementColumn::WaitMinutes => "wait_minutes",
            ManagementColumn::ServiceMinutes => "service_minutes",
            ManagementColumn::TotalMinutes => "total_minutes",
            ManagementColumn::DelayMinutes => "delay_minutes",
            ManagementColumn::IsoWeek => "iso_week",
            ManagementColumn::ScheduledHour => "scheduled_hour",
        }
    }
}

/// 列值（文本或整数，均可为空）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Text(Option<String>),
    Integer(Option<i64>),
}

// ==========================================
// ManagementUpdate - 部分更新
// ==========================================
// 字段为 None 表示"不修改"
// 作业字段与 scheduled_hour 使用双层 Option: Some(None) 表示清空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagementUpdate {
    pub arrival_at: Option<String>,
    pub service_start_at: Option<Option<String>>,
    pub service_end_at: Option<Option<String>>,
    pub wait_minutes: Option<Option<i64>>,
    pub service_minutes: Option<Option<i64>>,
    pub total_minutes: Option<Option<i64>>,
    pub delay_minutes: Option<i64>,
    pub iso_week: Option<u32>,
    pub scheduled_hour: Option<Option<u32>>,
}

impl ManagementUpdate {
    /// 是否没有任何待更新字段
    pub fn is_empty(&self) -> bool {
        self.columns().is_empty()
    }

    /// 清空作业起止与三项时长（新一天重新到货时使用）
    pub fn clearing_service(mut self) -> Self {
        self.service_start_at = Some(None);
        self.service_end_at = Some(None);
        self.wait_minutes = Some(None);
        self.service_minutes = Some(None);
        self.total_minutes = Some(None);
        self
    }

    /// 按列展开待更新字段（顺序固定，便于拼装参数化 SQL）
    pub fn columns(&self) -> Vec<(ManagementColumn, ColumnValue)> {
        let mut cols = Vec::new();

        if let Some(v) = &self.arrival_at {
            cols.push((ManagementColumn::ArrivalAt, ColumnValue::Text(Some(v.clone()))));
        }
        if let Some(v) = &self.service_start_at {
            cols.push((ManagementColumn::ServiceStartAt, ColumnValue::Text(v.clone())));
        }
        if let Some(v) = &self.service_end_at {
            cols.push((ManagementColumn::ServiceEndAt, ColumnValue::Text(v.clone())));
        }
        if let Some(v) = self.wait_minutes {
            cols.push((ManagementColumn::WaitMinutes, ColumnValue::Integer(v)));
        }
        if let Some(v) = self.service_minutes {
            cols.push((ManagementColumn::ServiceMinutes, ColumnValue::Integer(v)));
        }
        if let Some(v) = self.total_minutes {
            cols.push((ManagementColumn::TotalMinutes, ColumnValue::Integer(v)));
        }
        if let Some(v) = self.delay_minutes {
            cols.push((ManagementColumn::DelayMinutes, ColumnValue::Integer(Some(v))));
        }
        if let Some(v) = self.iso_week {
            cols.push((ManagementColumn::IsoWeek, ColumnValue::Integer(Some(v as i64))));
        }
        if let Some(v) = self.scheduled_hour {
            cols.push((
                ManagementColumn::ScheduledHour,
                ColumnValue::Integer(v.map(i64::from)),
            ));
        }

        cols
    }

    /// 将更新应用到内存中的记录（不触碰未列出的字段）
    pub fn apply_to(&self, record: &mut ManagementRecord) {
        if let Some(v) = &self.arrival_at {
            record.arrival_at = Some(v.clone());
        }
        if let Some(v) = &self.service_start_at {
            record.service_start_at = v.clone();
        }
        if let Some(v) = &self.service_end_at {
            record.service_end_at = v.clone();
        }
        if let Some(v) = self.wait_minutes {
            record.wait_minutes = v;
        }
        if let Some(v) = self.service_minutes {
            record.service_minutes = v;
        }
        if let Some(v) = self.total_minutes {
            record.total_minutes = v;
        }
        if let Some(v) = self.delay_minutes {
            record.delay_minutes = v;
        }
        if let Some(v) = self.iso_week {
            record.iso_week = v;
        }
        if let Some(v) = self.scheduled_hour {
            record.scheduled_hour = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrived_record() -> ManagementRecord {
        ManagementRecord {
            order_id: "OC-1".to_string(),
            supplier: "Acme".to_string(),
            package_count: "4".to_string(),
            arrival_at: Some("2024-08-07 10:12:00".to_string()),
            service_start_at: None,
            service_end_at: None,
            wait_minutes: None,
            service_minutes: None,
            total_minutes: None,
            delay_minutes: 12,
            iso_week: 32,
            scheduled_hour: Some(10),
        }
    }

    #[test]
    fn test_empty_update() {
        assert!(ManagementUpdate::default().is_empty());
    }

    #[test]
    fn test_apply_only_touches_listed_fields() {
        let mut record = arrived_record();
        let update = ManagementUpdate {
            service_start_at: Some(Some("2024-08-07 10:15:00".to_string())),
            service_end_at: Some(Some("2024-08-07 10:40:00".to_string())),
            wait_minutes: Some(Some(3)),
            service_minutes: Some(Some(25)),
            total_minutes: Some(Some(28)),
            ..Default::default()
        };
        update.apply_to(&mut record);

        assert_eq!(record.arrival_at.as_deref(), Some("2024-08-07 10:12:00"));
        assert_eq!(record.delay_minutes, 12);
        assert_eq!(record.total_minutes, Some(28));
        assert_eq!(update.columns().len(), 5);
    }

    #[test]
    fn test_scheduled_hour_can_be_cleared() {
        let mut record = arrived_record();
        let update = ManagementUpdate {
            scheduled_hour: Some(None),
            ..Default::default()
        };
        assert_eq!(
            update.columns(),
            vec![(ManagementColumn::ScheduledHour, ColumnValue::Integer(None))]
        );
        update.apply_to(&mut record);
        assert_eq!(record.scheduled_hour, None);
    }

    #[test]
    fn test_clearing_service_resets_all_service_fields() {
        let mut record = arrived_record();
        record.service_start_at = Some("2024-08-07 10:15:00".to_string());
        record.service_end_at = Some("2024-08-07 10:40:00".to_string());
        record.wait_minutes = Some(3);
        record.service_minutes = Some(25);
        record.total_minutes = Some(28);

        let update = ManagementUpdate {
            arrival_at: Some("2024-08-08 11:00:00".to_string()),
            ..Default::default()
        }
        .clearing_service();
        update.apply_to(&mut record);

        assert_eq!(record.arrival_at.as_deref(), Some("2024-08-08 11:00:00"));
        assert_eq!(record.service_start_at, None);
        assert_eq!(record.service_end_at, None);
        assert_eq!(record.total_minutes, None);
        assert!(update
            .columns()
            .contains(&(ManagementColumn::ServiceStartAt, ColumnValue::Text(None))));
        assert_eq!(update.columns().len(), 6);
    }
}
