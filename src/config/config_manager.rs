// ==========================================
// 供应商到货管控 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::dock_config::{DockConfig, OperatingHours};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }
        Ok(config_map)
    }

    // ===== 作业时间窗 =====

    /// 获取作业时间窗（默认 9~18 点）
    pub fn get_operating_hours(&self) -> Result<OperatingHours, Box<dyn Error>> {
        let defaults = OperatingHours::default();
        let open = self.get_config_or_default(
            config_keys::OPEN_HOUR,
            &defaults.open_hour.to_string(),
        )?;
        let close = self.get_config_or_default(
            config_keys::CLOSE_HOUR,
            &defaults.close_hour.to_string(),
        )?;

        let open_hour = open
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("{} 不是合法小时: {}", config_keys::OPEN_HOUR, open))?;
        let close_hour = close
            .trim()
            .parse::<u32>()
            .map_err(|_| format!("{} 不是合法小时: {}", config_keys::CLOSE_HOUR, close))?;

        Ok(OperatingHours::new(open_hour, close_hour)?)
    }

    // ===== 看板配置 =====

    /// 获取看板周期选项（逗号分隔，默认 "1,2,4,12,24"）
    pub fn get_week_options(&self) -> Result<Vec<u32>, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::WEEK_OPTIONS, "1,2,4,12,24")?;

        let options: Vec<u32> = value
            .split(',')
            .filter_map(|s| s.trim().parse::<u32>().ok())
            .filter(|&w| w > 0)
            .collect();

        if options.is_empty() {
            tracing::warn!(
                config_key = config_keys::WEEK_OPTIONS,
                raw_value = %value,
                "看板周期选项格式错误，使用默认值"
            );
            Ok(DockConfig::default().week_options)
        } else {
            Ok(options)
        }
    }

    pub fn get_default_weeks_back(&self) -> Result<u32, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_WEEKS_BACK, "1")?;
        Ok(value.trim().parse::<u32>().ok().filter(|&w| w > 0).unwrap_or(1))
    }

    /// 加载完整配置快照并校验
    pub fn load_dock_config(&self) -> Result<DockConfig, Box<dyn Error>> {
        let config = DockConfig {
            operating_hours: self.get_operating_hours()?,
            week_options: self.get_week_options()?,
            default_weeks_back: self.get_default_weeks_back()?,
        };
        config.validate()?;
        Ok(config)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 作业时间窗
    pub const OPEN_HOUR: &str = "operating_hours.open_hour";
    pub const CLOSE_HOUR: &str = "operating_hours.close_hour";

    // 看板
    pub const WEEK_OPTIONS: &str = "dashboard.week_options";
    pub const DEFAULT_WEEKS_BACK: &str = "dashboard.default_weeks_back";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn setup() -> (NamedTempFile, ConfigManager) {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();
        let conn = open_sqlite_connection(&path).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let manager = ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap();
        (temp_file, manager)
    }

    #[test]
    fn test_defaults_without_rows() {
        let (_tmp, manager) = setup();
        let config = manager.load_dock_config().unwrap();
        assert_eq!(config, DockConfig::default());
    }

    #[test]
    fn test_overrides() {
        let (_tmp, manager) = setup();
        manager.set_global_value(config_keys::OPEN_HOUR, "7").unwrap();
        manager.set_global_value(config_keys::CLOSE_HOUR, "20").unwrap();
        manager.set_global_value(config_keys::WEEK_OPTIONS, "1, 3, x, 6").unwrap();

        let config = manager.load_dock_config().unwrap();
        assert_eq!(config.operating_hours, OperatingHours::new(7, 20).unwrap());
        assert_eq!(config.week_options, vec![1, 3, 6]);
        assert_eq!(manager.get_config_snapshot().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_hours_rejected() {
        let (_tmp, manager) = setup();
        manager.set_global_value(config_keys::OPEN_HOUR, "19").unwrap();
        assert!(manager.load_dock_config().is_err());

        manager.set_global_value(config_keys::OPEN_HOUR, "nueve").unwrap();
        assert!(manager.get_operating_hours().is_err());
    }
}
