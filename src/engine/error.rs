// ==========================================
// 供应商到货管控 - 引擎层错误类型
// ==========================================
// 错误分类:
// - 时段解析失败: 不是错误，引擎内部按兜底链吸收
// - RecordNotFound: 无到货记录即登记作业
// - InvalidOrder: 作业时间顺序非法，整单中止，不落库
// - Persistence: 外部存储失败，原样上报，由调用方决定是否重试
// ==========================================

use crate::repository::error::RepositoryError;
use std::fmt;
use thiserror::Error;

/// 作业时间校验失败原因（按检查顺序）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderViolation {
    EndNotAfterStart,
    StartBeforeArrival,
}

impl fmt::Display for OrderViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderViolation::EndNotAfterStart => write!(f, "结束时间必须晚于开始时间"),
            OrderViolation::StartBeforeArrival => write!(f, "开始作业时间不能早于到货时间"),
        }
    }
}

/// 登记（到货/作业）错误
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("订单 {order_id} 没有到货记录")]
    RecordNotFound { order_id: String },

    #[error("订单 {order_id} 时间顺序非法: {violation}")]
    InvalidOrder {
        order_id: String,
        violation: OrderViolation,
    },

    #[error("订单 {order_id} 的字段 {field} 无法解析: {value}")]
    CorruptRecord {
        order_id: String,
        field: &'static str,
        value: String,
    },

    #[error("持久化失败: {0}")]
    Persistence(#[from] RepositoryError),
}

pub type RecordingResult<T> = Result<T, RecordingError>;
