// ==========================================
// 供应商到货管控 - 收货口 API
// ==========================================
// 职责: 操作员流程（待到货 → 已到货待作业 → 作业完成）
// 架构: API 层 → Engine 层 (Classifier / Recorder) → PersistenceGateway
// 约束: 每次调用重新拉取快照，状态不缓存
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::dock_config::OperatingHours;
use crate::domain::management::ManagementRecord;
use crate::domain::reservation::Reservation;
use crate::domain::types::OrderState;
use crate::engine::arrival_recorder::{ArrivalReceipt, ArrivalRecorder};
use crate::engine::classifier::{index_by_order, OrderClassifier};
use crate::engine::form_defaults::{default_arrival_time, default_service_time};
use crate::engine::service_recorder::{ServiceOutcome, ServiceRecorder};
use crate::engine::timestamp::parse_instant;
use crate::repository::gateway::PersistenceGateway;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;

// ==========================================
// DockApi
// ==========================================
pub struct DockApi {
    gateway: Arc<dyn PersistenceGateway>,
    arrival_recorder: ArrivalRecorder,
    service_recorder: ServiceRecorder,
    operating_hours: OperatingHours,
}

impl DockApi {
    pub fn new(gateway: Arc<dyn PersistenceGateway>, operating_hours: OperatingHours) -> Self {
        Self {
            arrival_recorder: ArrivalRecorder::new(gateway.clone()),
            service_recorder: ServiceRecorder::new(gateway.clone()),
            gateway,
            operating_hours,
        }
    }

    pub fn operating_hours(&self) -> &OperatingHours {
        &self.operating_hours
    }

    // ==========================================
    // 列表查询
    // ==========================================

    /// 指定日期待到货的订单（按预约开始时刻升序）
    pub fn list_pending_arrivals(&self, date: NaiveDate) -> ApiResult<Vec<String>> {
        let reservations = self.gateway.fetch_reservations(date)?;
        let records = self.gateway.fetch_management_records()?;
        Ok(OrderClassifier::pending_arrivals(&reservations, &records, date))
    }

    /// 当天已到货待作业的订单（按到货时刻升序）
    pub fn list_arrived_pending_service(&self, today: NaiveDate) -> ApiResult<Vec<String>> {
        let records = self.gateway.fetch_management_records()?;
        Ok(OrderClassifier::arrived_pending_service(&records, today))
    }

    /// 当天作业完成的订单
    pub fn list_completed(&self, today: NaiveDate) -> ApiResult<Vec<String>> {
        let records = self.gateway.fetch_management_records()?;
        Ok(OrderClassifier::completed(&records, today))
    }

    /// 查询单个预约订单的当前状态
    pub fn get_order_state(&self, order_id: &str, date: NaiveDate) -> ApiResult<OrderState> {
        let reservation = self.find_reservation(order_id, date)?;
        let records = self.gateway.fetch_management_records()?;
        let index = index_by_order(&records);
        Ok(OrderClassifier::classify(
            &reservation,
            index.get(order_id).copied(),
            date,
        ))
    }

    /// 查询预约
    pub fn find_reservation(&self, order_id: &str, date: NaiveDate) -> ApiResult<Reservation> {
        validate_order_id(order_id)?;
        self.gateway
            .fetch_reservations(date)?
            .into_iter()
            .find(|r| r.order_id == order_id)
            .ok_or_else(|| ApiError::NotFound(format!("{} 没有订单 {} 的预约", date, order_id)))
    }

    /// 查询管理记录（作业完成后的时长指标也从这里读取）
    pub fn get_management_record(&self, order_id: &str) -> ApiResult<ManagementRecord> {
        validate_order_id(order_id)?;
        self.gateway
            .fetch_management_records()?
            .into_iter()
            .find(|r| r.order_id == order_id)
            .ok_or_else(|| ApiError::NotFound(format!("订单 {} 没有管理记录", order_id)))
    }

    // ==========================================
    // 录入默认值
    // ==========================================

    /// 到货录入默认时刻
    pub fn arrival_form_defaults(
        &self,
        order_id: &str,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> ApiResult<NaiveTime> {
        let reservation = self.find_reservation(order_id, date)?;
        Ok(default_arrival_time(
            &reservation.scheduled_slot,
            now,
            &self.operating_hours,
        ))
    }

    /// 作业录入默认时刻（开始与结束共用）
    pub fn service_form_defaults(&self, order_id: &str) -> ApiResult<NaiveTime> {
        let record = self.get_management_record(order_id)?;
        let arrival = parse_instant(record.arrival_at.as_deref())
            .ok_or_else(|| ApiError::NotFound(format!("订单 {} 没有到货记录", order_id)))?;
        Ok(default_service_time(arrival, &self.operating_hours))
    }

    // ==========================================
    // 登记
    // ==========================================

    /// 登记到货
    ///
    /// 订单已有记录时按更新处理（重复点击不会产生重复行）
    /// 当天已作业完成的订单不再接受到货登记
    pub fn record_arrival(
        &self,
        order_id: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> ApiResult<ArrivalReceipt> {
        let reservation = self.find_reservation(order_id, date)?;
        let records = self.gateway.fetch_management_records()?;
        let index = index_by_order(&records);
        let state = OrderClassifier::classify(&reservation, index.get(order_id).copied(), date);
        if state == OrderState::ServiceCompleted {
            tracing::warn!(order_id, %date, "订单当天已作业完成，拒绝重复到货登记");
            return Err(ApiError::BusinessRuleViolation(format!(
                "订单 {} 在 {} 已作业完成，不能再登记到货",
                order_id, date
            )));
        }

        let observed = date.and_time(time);
        Ok(self.arrival_recorder.record_arrival(&reservation, observed)?)
    }

    /// 登记作业起止
    pub fn record_service(
        &self,
        order_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> ApiResult<ServiceOutcome> {
        validate_order_id(order_id)?;
        Ok(self.service_recorder.record_service(order_id, start, end)?)
    }
}

fn validate_order_id(order_id: &str) -> ApiResult<()> {
    if order_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("订单号不能为空".to_string()));
    }
    Ok(())
}
