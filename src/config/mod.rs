// ==========================================
// 供应商到货管控 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod dock_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use dock_config::{DockConfig, InvalidConfig, OperatingHours, MAX_WEEKS_BACK};
