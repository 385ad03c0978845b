// ==========================================
// 供应商到货管控 - 订单状态派生
// ==========================================
// 职责: 由 (预约, 管理记录|无, 当天) 纯函数派生订单状态
// 红线: 不缓存状态，每次读取重新计算；不访问存储
// ==========================================
// 状态规则:
// - 无记录 / 到货不在当天          → PENDING_ARRIVAL
// - 到货在当天，作业起止任一为空    → ARRIVED_PENDING_SERVICE
// - 到货在当天，作业起止均非空      → SERVICE_COMPLETED
// ==========================================

use crate::domain::management::ManagementRecord;
use crate::domain::reservation::Reservation;
use crate::domain::types::{is_blank, OrderState};
use crate::engine::time_parser::resolve_slot_start;
use crate::engine::timestamp::parse_instant;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

// ==========================================
// OrderClassifier
// ==========================================
pub struct OrderClassifier;

impl OrderClassifier {
    /// 派生预约订单的状态
    ///
    /// 预约与记录按 order_id 关联；记录属于其他订单时视为无记录
    pub fn classify(
        reservation: &Reservation,
        record: Option<&ManagementRecord>,
        today: NaiveDate,
    ) -> OrderState {
        let record = record.filter(|r| r.order_id == reservation.order_id);
        Self::classify_record(record, today)
    }

    /// 仅由管理记录派生状态
    pub fn classify_record(record: Option<&ManagementRecord>, today: NaiveDate) -> OrderState {
        match record {
            Some(r) if Self::arrived_on(r, today) => {
                if Self::service_registered(r) {
                    OrderState::ServiceCompleted
                } else {
                    OrderState::ArrivedPendingService
                }
            }
            _ => OrderState::PendingArrival,
        }
    }

    /// 到货时刻是否落在指定日期
    pub fn arrived_on(record: &ManagementRecord, day: NaiveDate) -> bool {
        parse_instant(record.arrival_at.as_deref())
            .map(|at| at.date() == day)
            .unwrap_or(false)
    }

    /// 作业起止是否都已登记
    pub fn service_registered(record: &ManagementRecord) -> bool {
        !is_blank(record.service_start_at.as_deref()) && !is_blank(record.service_end_at.as_deref())
    }

    // ==========================================
    // 列表视图
    // ==========================================

    /// 当天待到货订单，按预约开始时刻升序（时段无法解析的排在最后）
    pub fn pending_arrivals(
        reservations: &[Reservation],
        records: &[ManagementRecord],
        today: NaiveDate,
    ) -> Vec<String> {
        let index = index_by_order(records);

        let mut pending: Vec<(&Reservation, Option<chrono::NaiveTime>)> = reservations
            .iter()
            .filter(|r| r.service_date == today)
            .filter(|r| {
                Self::classify(r, index.get(r.order_id.as_str()).copied(), today)
                    == OrderState::PendingArrival
            })
            .map(|r| (r, resolve_slot_start(&r.scheduled_slot).map(|s| s.start)))
            .collect();

        pending.sort_by(|(a, a_start), (b, b_start)| {
            let by_start = match (a_start, b_start) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_start.then_with(|| a.order_id.cmp(&b.order_id))
        });

        let mut seen = std::collections::HashSet::new();
        pending
            .into_iter()
            .filter(|(r, _)| seen.insert(r.order_id.as_str()))
            .map(|(r, _)| r.order_id.clone())
            .collect()
    }

    /// 当天已到货、待作业的订单，按到货时刻升序
    pub fn arrived_pending_service(records: &[ManagementRecord], today: NaiveDate) -> Vec<String> {
        let mut arrived: Vec<(&ManagementRecord, chrono::NaiveDateTime)> = records
            .iter()
            .filter(|r| {
                Self::classify_record(Some(r), today) == OrderState::ArrivedPendingService
            })
            .filter_map(|r| parse_instant(r.arrival_at.as_deref()).map(|at| (r, at)))
            .collect();

        arrived.sort_by(|(a, a_at), (b, b_at)| {
            a_at.cmp(b_at).then_with(|| a.order_id.cmp(&b.order_id))
        });
        arrived.into_iter().map(|(r, _)| r.order_id.clone()).collect()
    }

    /// 当天作业完成的订单（保持存储顺序）
    pub fn completed(records: &[ManagementRecord], today: NaiveDate) -> Vec<String> {
        records
            .iter()
            .filter(|r| Self::classify_record(Some(r), today) == OrderState::ServiceCompleted)
            .map(|r| r.order_id.clone())
            .collect()
    }
}

/// 按 order_id 建索引（同号多行时取第一行）
pub fn index_by_order(records: &[ManagementRecord]) -> HashMap<&str, &ManagementRecord> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        index.entry(record.order_id.as_str()).or_insert(record);
    }
    index
}
