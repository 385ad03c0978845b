// ==========================================
// 供应商到货管控 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 收货口预约管控（到货 → 作业 → 时间指标）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部预约表
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    HourAggregate, ManagementRecord, ManagementUpdate, MetricMeans, OrderState, PeriodSummary,
    Reservation, SupplierFilter, WeekAggregate,
};

// 引擎
pub use engine::{
    minutes_between, ArrivalRecorder, MetricsAggregator, OrderClassifier, RecordingError,
    ServiceRecorder,
};

// 网关
pub use repository::{InMemoryGateway, PersistenceGateway, SqliteGateway};

// API
pub use api::{ApiError, ApiResult, DashboardApi, DockApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "供应商到货管控";
