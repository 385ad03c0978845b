// ==========================================
// 供应商到货管控 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行/界面调用
// ==========================================

pub mod dashboard_api;
pub mod dock_api;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{DashboardApi, DashboardReport};
pub use dock_api::DockApi;
pub use error::{ApiError, ApiResult};
