// ==========================================
// 供应商到货管控 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod management;
pub mod metrics;
pub mod reservation;
pub mod types;

// 重导出核心类型
pub use management::{ColumnValue, ManagementColumn, ManagementRecord, ManagementUpdate};
pub use metrics::{HourAggregate, MetricMeans, PeriodSummary, SupplierFilter, WeekAggregate};
pub use reservation::Reservation;
pub use types::{is_blank, non_blank, OrderState};
