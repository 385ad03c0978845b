// ==========================================
// 供应商到货管控 - 管理记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 每个订单一行（order_id 主键），只插入/更新，不删除
// ==========================================

use crate::domain::management::{ColumnValue, ManagementRecord, ManagementUpdate};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    order_id, supplier, package_count,
    arrival_at, service_start_at, service_end_at,
    wait_minutes, service_minutes, total_minutes, delay_minutes,
    iso_week, scheduled_hour
"#;

// ==========================================
// ManagementRecordRepository - 管理记录仓储
// ==========================================
pub struct ManagementRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ManagementRecordRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部记录（按写入顺序）
    pub fn find_all(&self) -> RepositoryResult<Vec<ManagementRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM management_record ORDER BY created_at ASC, rowid ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    /// 按订单号查询
    pub fn find_by_order_id(&self, order_id: &str) -> RepositoryResult<Option<ManagementRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM management_record WHERE order_id = ?1",
            SELECT_COLUMNS
        );
        let record = conn
            .query_row(&sql, params![order_id], map_row)
            .optional()?;
        Ok(record)
    }

    /// 整行写入（按 order_id 插入或覆盖）
    pub fn upsert(&self, record: &ManagementRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO management_record (
                order_id, supplier, package_count,
                arrival_at, service_start_at, service_end_at,
                wait_minutes, service_minutes, total_minutes, delay_minutes,
                iso_week, scheduled_hour
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(order_id) DO UPDATE SET
                supplier = excluded.supplier,
                package_count = excluded.package_count,
                arrival_at = excluded.arrival_at,
                service_start_at = excluded.service_start_at,
                service_end_at = excluded.service_end_at,
                wait_minutes = excluded.wait_minutes,
                service_minutes = excluded.service_minutes,
                total_minutes = excluded.total_minutes,
                delay_minutes = excluded.delay_minutes,
                iso_week = excluded.iso_week,
                scheduled_hour = excluded.scheduled_hour,
                updated_at = datetime('now')
            "#,
            params![
                record.order_id,
                record.supplier,
                record.package_count,
                record.arrival_at,
                record.service_start_at,
                record.service_end_at,
                record.wait_minutes,
                record.service_minutes,
                record.total_minutes,
                record.delay_minutes,
                record.iso_week,
                record.scheduled_hour,
            ],
        )?;
        Ok(())
    }

    /// 按列部分更新
    ///
    /// # 返回
    /// - Ok(()): 更新成功
    /// - Err(NotFound): 订单不存在
    pub fn update_fields(&self, order_id: &str, update: &ManagementUpdate) -> RepositoryResult<()> {
        let columns = update.columns();
        if columns.is_empty() {
            return Err(RepositoryError::ValidationError(
                "部分更新至少需要一个字段".to_string(),
            ));
        }

        let mut assignments = Vec::with_capacity(columns.len() + 1);
        let mut values: Vec<Value> = Vec::with_capacity(columns.len() + 1);
        for (idx, (column, value)) in columns.into_iter().enumerate() {
            assignments.push(format!("{} = ?{}", column.column_name(), idx + 1));
            values.push(match value {
                ColumnValue::Text(v) => v.map(Value::Text).unwrap_or(Value::Null),
                ColumnValue::Integer(v) => v.map(Value::Integer).unwrap_or(Value::Null),
            });
        }
        assignments.push("updated_at = datetime('now')".to_string());
        values.push(Value::Text(order_id.to_string()));

        let sql = format!(
            "UPDATE management_record SET {} WHERE order_id = ?{}",
            assignments.join(", "),
            values.len()
        );

        let conn = self.get_conn()?;
        let affected = conn.execute(&sql, params_from_iter(values))?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ManagementRecord".to_string(),
                id: order_id.to_string(),
            });
        }
        Ok(())
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<ManagementRecord> {
    Ok(ManagementRecord {
        order_id: row.get(0)?,
        supplier: row.get(1)?,
        package_count: row.get(2)?,
        arrival_at: row.get(3)?,
        service_start_at: row.get(4)?,
        service_end_at: row.get(5)?,
        wait_minutes: row.get(6)?,
        service_minutes: row.get(7)?,
        total_minutes: row.get(8)?,
        delay_minutes: row.get(9)?,
        iso_week: row.get(10)?,
        scheduled_hour: row.get(11)?,
    })
}
