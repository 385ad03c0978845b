// ==========================================
// 供应商到货管控 - 预约数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::reservation::Reservation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// ReservationRepository - 预约仓储
// ==========================================
/// 职责: 管理 reservation 表的读写
pub struct ReservationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReservationRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入预约（按 日期+订单号 覆盖）
    pub fn upsert(&self, reservation: &Reservation) -> RepositoryResult<()> {
        if reservation.order_id.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "order_id".to_string(),
                message: "订单号不能为空".to_string(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO reservation (service_date, order_id, scheduled_slot, supplier, package_count)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(service_date, order_id) DO UPDATE SET
                scheduled_slot = excluded.scheduled_slot,
                supplier = excluded.supplier,
                package_count = excluded.package_count
            "#,
            params![
                reservation.service_date.format(DATE_FORMAT).to_string(),
                reservation.order_id,
                reservation.scheduled_slot,
                reservation.supplier,
                reservation.package_count,
            ],
        )?;
        Ok(())
    }

    /// 批量写入（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 写入条数
    pub fn upsert_batch(&self, reservations: &[Reservation]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO reservation (service_date, order_id, scheduled_slot, supplier, package_count)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(service_date, order_id) DO UPDATE SET
                    scheduled_slot = excluded.scheduled_slot,
                    supplier = excluded.supplier,
                    package_count = excluded.package_count
                "#,
            )?;
            for r in reservations {
                stmt.execute(params![
                    r.service_date.format(DATE_FORMAT).to_string(),
                    r.order_id,
                    r.scheduled_slot,
                    r.supplier,
                    r.package_count,
                ])?;
            }
        }
        tx.commit()?;
        Ok(reservations.len())
    }

    /// 查询指定日期的预约
    pub fn find_by_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Reservation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT service_date, order_id, scheduled_slot, supplier, package_count
            FROM reservation
            WHERE service_date = ?1
            ORDER BY order_id ASC
            "#,
        )?;

        let reservations = stmt
            .query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
                let raw_date: String = row.get(0)?;
                Ok(Reservation {
                    service_date: NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
                        .unwrap_or(date),
                    order_id: row.get(1)?,
                    scheduled_slot: row.get(2)?,
                    supplier: row.get(3)?,
                    package_count: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(reservations)
    }
}
