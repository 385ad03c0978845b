// ==========================================
// 供应商到货管控 - 作业登记
// ==========================================
// 职责: 为已到货订单登记作业起止，计算等待/作业/总时长
// 校验顺序（首个失败即中止，不落库）:
// 1. 结束 > 开始
// 2. 开始 >= 到货
// 写入: 仅部分更新作业相关字段，到货字段不动
// 展示延迟: 按到货日期重新解析预约时段，仅用于展示，失败时为 0
// ==========================================

use crate::domain::management::{ManagementRecord, ManagementUpdate};
use crate::domain::types::is_blank;
use crate::engine::duration::minutes_between;
use crate::engine::error::{OrderViolation, RecordingError, RecordingResult};
use crate::engine::time_parser::resolve_scheduled_instant;
use crate::engine::timestamp::{format_instant, parse_instant};
use crate::repository::gateway::PersistenceGateway;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;

/// 作业登记结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceOutcome {
    pub order_id: String,
    pub wait_minutes: i64,
    pub service_minutes: i64,
    pub total_minutes: i64,
    pub display_delay_minutes: i64,
}

// ==========================================
// ServiceRecorder
// ==========================================
pub struct ServiceRecorder {
    gateway: Arc<dyn PersistenceGateway>,
}

impl ServiceRecorder {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// 校验作业起止（纯函数）
    pub fn validate(
        arrival: NaiveDateTime,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(), OrderViolation> {
        if end <= start {
            return Err(OrderViolation::EndNotAfterStart);
        }
        if start < arrival {
            return Err(OrderViolation::StartBeforeArrival);
        }
        Ok(())
    }

    /// 展示用延迟: 预约时段落在到货当天，无法解析时为 0
    pub fn display_delay(scheduled_slot: Option<&str>, arrival: NaiveDateTime) -> i64 {
        scheduled_slot
            .and_then(|slot| resolve_scheduled_instant(slot, arrival.date()))
            .and_then(|scheduled| minutes_between(scheduled, arrival))
            .unwrap_or(0)
    }

    /// 登记作业
    ///
    /// # 返回
    /// - Err(RecordNotFound): 无记录或到货为空
    /// - Err(CorruptRecord): 存储的到货时刻无法解析
    /// - Err(InvalidOrder): 时间顺序非法
    /// - Err(Persistence): 存储失败
    pub fn record_service(
        &self,
        order_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> RecordingResult<ServiceOutcome> {
        let record = self.find_arrived_record(order_id)?;
        let arrival = Self::arrival_instant(&record)?;

        if let Err(violation) = Self::validate(arrival, start, end) {
            tracing::warn!(order_id, %violation, "作业登记被拒绝");
            return Err(RecordingError::InvalidOrder {
                order_id: order_id.to_string(),
                violation,
            });
        }

        // 校验已保证差值存在且非负
        let wait_minutes = minutes_between(arrival, start).unwrap_or(0);
        let service_minutes = minutes_between(start, end).unwrap_or(0);
        let total_minutes = minutes_between(arrival, end).unwrap_or(0);

        let update = ManagementUpdate {
            service_start_at: Some(Some(format_instant(&start))),
            service_end_at: Some(Some(format_instant(&end))),
            wait_minutes: Some(Some(wait_minutes)),
            service_minutes: Some(Some(service_minutes)),
            total_minutes: Some(Some(total_minutes)),
            ..Default::default()
        };
        self.gateway.update_management_fields(order_id, &update)?;

        tracing::info!(
            order_id,
            wait_minutes,
            service_minutes,
            total_minutes,
            "作业已登记"
        );

        Ok(ServiceOutcome {
            order_id: order_id.to_string(),
            wait_minutes,
            service_minutes,
            total_minutes,
            display_delay_minutes: self.lookup_display_delay(order_id, arrival),
        })
    }

    fn find_arrived_record(&self, order_id: &str) -> RecordingResult<ManagementRecord> {
        self.gateway
            .fetch_management_records()?
            .into_iter()
            .find(|r| r.order_id == order_id && !is_blank(r.arrival_at.as_deref()))
            .ok_or_else(|| RecordingError::RecordNotFound {
                order_id: order_id.to_string(),
            })
    }

    fn arrival_instant(record: &ManagementRecord) -> RecordingResult<NaiveDateTime> {
        parse_instant(record.arrival_at.as_deref()).ok_or_else(|| RecordingError::CorruptRecord {
            order_id: record.order_id.clone(),
            field: "arrival_at",
            value: record.arrival_at.clone().unwrap_or_default(),
        })
    }

    fn lookup_display_delay(&self, order_id: &str, arrival: NaiveDateTime) -> i64 {
        match self.gateway.fetch_reservations(arrival.date()) {
            Ok(reservations) => {
                let slot = reservations
                    .iter()
                    .find(|r| r.order_id == order_id)
                    .map(|r| r.scheduled_slot.as_str());
                Self::display_delay(slot, arrival)
            }
            Err(e) => {
                tracing::warn!(order_id, error = %e, "读取预约失败，展示延迟按 0 处理");
                0
            }
        }
    }
}
