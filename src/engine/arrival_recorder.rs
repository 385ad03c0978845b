// ==========================================
// 供应商到货管控 - 到货登记
// ==========================================
// 职责: 由预约时段与实际到货时刻生成/更新管理记录
// 规则:
// - delay = minutes_between(预约开始, 到货)，时段无法解析时为 0（不阻塞登记）
// - scheduled_hour = 预约开始小时，无法解析时为空
// - iso_week = 到货时刻的 ISO 周
// 幂等: 先按 order_id 查找，已存在则更新而不重复插入
// - 同一天重复登记: 只更新到货相关字段
// - 已有记录的到货不在本次到货当天: 同时清空作业起止与三项时长
// ==========================================

use crate::domain::management::{ManagementRecord, ManagementUpdate};
use crate::domain::reservation::Reservation;
use crate::engine::duration::minutes_between;
use crate::engine::error::RecordingResult;
use crate::engine::time_parser::resolve_scheduled_instant;
use crate::engine::timestamp::{format_instant, parse_instant};
use crate::repository::gateway::PersistenceGateway;
use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;
use std::sync::Arc;

/// 到货派生指标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArrivalMetrics {
    pub scheduled_at: Option<NaiveDateTime>,
    pub delay_minutes: i64,
    pub scheduled_hour: Option<u32>,
    pub iso_week: u32,
}

/// 到货登记回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalReceipt {
    pub record: ManagementRecord,
    pub updated_existing: bool,
}

// ==========================================
// ArrivalRecorder
// ==========================================
pub struct ArrivalRecorder {
    gateway: Arc<dyn PersistenceGateway>,
}

impl ArrivalRecorder {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// 计算到货派生指标（纯函数）
    ///
    /// 预约时刻落在到货当天
    pub fn derive_metrics(scheduled_slot: &str, observed: NaiveDateTime) -> ArrivalMetrics {
        let scheduled_at = resolve_scheduled_instant(scheduled_slot, observed.date());

        ArrivalMetrics {
            scheduled_at,
            delay_minutes: scheduled_at
                .and_then(|s| minutes_between(s, observed))
                .unwrap_or(0),
            scheduled_hour: scheduled_at.map(|s| s.hour()),
            iso_week: observed.iso_week().week(),
        }
    }

    /// 构建新的管理记录（作业字段为空）
    pub fn build_record(reservation: &Reservation, observed: NaiveDateTime) -> ManagementRecord {
        let metrics = Self::derive_metrics(&reservation.scheduled_slot, observed);

        ManagementRecord {
            order_id: reservation.order_id.clone(),
            supplier: reservation.supplier.clone(),
            package_count: reservation.package_count.clone(),
            arrival_at: Some(format_instant(&observed)),
            service_start_at: None,
            service_end_at: None,
            wait_minutes: None,
            service_minutes: None,
            total_minutes: None,
            delay_minutes: metrics.delay_minutes,
            iso_week: metrics.iso_week,
            scheduled_hour: metrics.scheduled_hour,
        }
    }

    /// 登记到货
    ///
    /// # 返回
    /// - Ok(ArrivalReceipt): 写入后的记录，updated_existing 表示是否为更新
    /// - Err(Persistence): 存储失败（单次写入，无中间态）
    pub fn record_arrival(
        &self,
        reservation: &Reservation,
        observed: NaiveDateTime,
    ) -> RecordingResult<ArrivalReceipt> {
        let fresh = Self::build_record(reservation, observed);

        let records = self.gateway.fetch_management_records()?;
        let existing = records
            .into_iter()
            .find(|r| r.order_id == reservation.order_id);

        match existing {
            Some(mut record) => {
                let same_day = parse_instant(record.arrival_at.as_deref())
                    .map(|previous| previous.date() == observed.date())
                    .unwrap_or(false);

                let mut update = ManagementUpdate {
                    arrival_at: fresh.arrival_at.clone(),
                    delay_minutes: Some(fresh.delay_minutes),
                    iso_week: Some(fresh.iso_week),
                    scheduled_hour: Some(fresh.scheduled_hour),
                    ..Default::default()
                };
                if !same_day {
                    update = update.clearing_service();
                }
                self.gateway
                    .update_management_fields(&reservation.order_id, &update)?;
                update.apply_to(&mut record);

                tracing::info!(
                    order_id = %reservation.order_id,
                    arrival_at = ?record.arrival_at,
                    delay_minutes = record.delay_minutes,
                    service_cleared = !same_day,
                    "到货记录已更新"
                );
                Ok(ArrivalReceipt {
                    record,
                    updated_existing: true,
                })
            }
            None => {
                self.gateway.upsert_management_record(&fresh)?;

                tracing::info!(
                    order_id = %fresh.order_id,
                    arrival_at = ?fresh.arrival_at,
                    delay_minutes = fresh.delay_minutes,
                    scheduled_hour = ?fresh.scheduled_hour,
                    "到货已登记"
                );
                Ok(ArrivalReceipt {
                    record: fresh,
                    updated_existing: false,
                })
            }
        }
    }
}
