// ==========================================
// 供应商到货管控 - 引擎层
// ==========================================
// 职责: 时段解析、状态派生、到货/作业登记、报表聚合
// 红线: 引擎不拼 SQL，只通过 PersistenceGateway 访问存储
// 红线: 解析失败不是错误，按兜底链吸收
// ==========================================

pub mod aggregator;
pub mod arrival_recorder;
pub mod classifier;
pub mod duration;
pub mod error;
pub mod form_defaults;
pub mod service_recorder;
pub mod time_parser;
pub mod timestamp;

// 重导出核心引擎
pub use aggregator::{round_one_decimal, MetricsAggregator};
pub use arrival_recorder::{ArrivalMetrics, ArrivalReceipt, ArrivalRecorder};
pub use classifier::{index_by_order, OrderClassifier};
pub use duration::{minutes_between, IntoInstant};
pub use error::{OrderViolation, RecordingError, RecordingResult};
pub use form_defaults::{default_arrival_time, default_service_time};
pub use service_recorder::{ServiceOutcome, ServiceRecorder};
pub use time_parser::{
    parse_colon_components, parse_slot_start, resolve_scheduled_instant, resolve_slot_start,
    SlotResolution, SlotSource, SlotStrategy, SLOT_STRATEGIES,
};
pub use timestamp::{format_instant, parse_instant, STORAGE_FORMAT};
