// ==========================================
// 供应商到货管控 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接、配置和API实例
// ==========================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::api::{DashboardApi, DockApi};
use crate::config::config_manager::ConfigManager;
use crate::config::dock_config::DockConfig;
use crate::db::{init_schema, open_sqlite_connection};
use crate::importer::error::ImportResult;
use crate::importer::reservation_importer::{ImportSummary, ReservationImporter};
use crate::repository::gateway::{PersistenceGateway, SqliteGateway};
use crate::repository::reservation_repo::ReservationRepository;
use rusqlite::Connection;

/// 应用状态
///
/// 所有 API 共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 加载时的配置快照
    pub config: DockConfig,

    /// 收货口 API
    pub dock_api: Arc<DockApi>,

    /// 看板 API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并建表（已存在则跳过）
    /// 2. 从 config_kv 读取配置
    /// 3. 创建网关与 API 实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let config = config_manager
            .load_dock_config()
            .map_err(|e| format!("配置加载失败: {}", e))?;

        let gateway: Arc<dyn PersistenceGateway> = Arc::new(SqliteGateway::new(conn.clone()));
        let dock_api = Arc::new(DockApi::new(gateway.clone(), config.operating_hours));
        let dashboard_api = Arc::new(DashboardApi::new(gateway, config.clone()));

        tracing::info!(
            open_hour = config.operating_hours.open_hour,
            close_hour = config.operating_hours.close_hour,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            config,
            dock_api,
            dashboard_api,
            config_manager,
            conn,
        })
    }

    /// 导入预约文件
    pub fn import_reservations<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let importer = ReservationImporter::new(ReservationRepository::new(self.conn.clone()));
        importer.import_file(file_path)
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 设置了 DOCK_CONTROL_DB_PATH 时使用该值
/// - 否则: 用户数据目录/dock-control/dock_control.db
/// - 拿不到用户数据目录时: ./dock_control.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("DOCK_CONTROL_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./dock_control.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("dock-control");
        // 建目录失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("dock_control.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_on_fresh_database() {
        let temp = NamedTempFile::new().unwrap();
        let state = AppState::new(temp.path().to_string_lossy().to_string()).unwrap();
        assert_eq!(state.config, DockConfig::default());
        assert_eq!(state.get_db_path(), temp.path().to_string_lossy());
    }
}
