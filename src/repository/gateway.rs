// ==========================================
// 供应商到货管控 - 持久化网关
// ==========================================
// 职责: 引擎与外部存储之间的唯一接口
// 约束:
// - 每次操作拉取新快照，不持有长期内存镜像
// - 单行原子: 一次 upsert 或一次单行部分更新
// - 网关不重试，失败直接上报
// ==========================================

use crate::domain::management::{ManagementRecord, ManagementUpdate};
use crate::domain::reservation::Reservation;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::management_repo::ManagementRecordRepository;
use crate::repository::reservation_repo::ReservationRepository;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// PersistenceGateway Trait
// ==========================================
pub trait PersistenceGateway: Send + Sync {
    /// 指定日期的预约
    fn fetch_reservations(&self, date: NaiveDate) -> RepositoryResult<Vec<Reservation>>;

    /// 全部管理记录
    fn fetch_management_records(&self) -> RepositoryResult<Vec<ManagementRecord>>;

    /// 按 order_id 插入或覆盖整行
    fn upsert_management_record(&self, record: &ManagementRecord) -> RepositoryResult<()>;

    /// 按 order_id 部分更新
    fn update_management_fields(
        &self,
        order_id: &str,
        update: &ManagementUpdate,
    ) -> RepositoryResult<()>;
}

// ==========================================
// SqliteGateway - SQLite 实现
// ==========================================
pub struct SqliteGateway {
    reservation_repo: ReservationRepository,
    management_repo: ManagementRecordRepository,
}

impl SqliteGateway {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            reservation_repo: ReservationRepository::new(conn.clone()),
            management_repo: ManagementRecordRepository::new(conn),
        }
    }

    pub fn reservations(&self) -> &ReservationRepository {
        &self.reservation_repo
    }

    pub fn management_records(&self) -> &ManagementRecordRepository {
        &self.management_repo
    }
}

impl PersistenceGateway for SqliteGateway {
    fn fetch_reservations(&self, date: NaiveDate) -> RepositoryResult<Vec<Reservation>> {
        self.reservation_repo.find_by_date(date)
    }

    fn fetch_management_records(&self) -> RepositoryResult<Vec<ManagementRecord>> {
        self.management_repo.find_all()
    }

    fn upsert_management_record(&self, record: &ManagementRecord) -> RepositoryResult<()> {
        self.management_repo.upsert(record)
    }

    fn update_management_fields(
        &self,
        order_id: &str,
        update: &ManagementUpdate,
    ) -> RepositoryResult<()> {
        self.management_repo.update_fields(order_id, update)
    }
}

// ==========================================
// InMemoryGateway - 内存实现（嵌入/测试）
// ==========================================
#[derive(Default)]
pub struct InMemoryGateway {
    reservations: Mutex<Vec<Reservation>>,
    records: Mutex<Vec<ManagementRecord>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以预约快照初始化
    pub fn with_reservations(reservations: Vec<Reservation>) -> Self {
        Self {
            reservations: Mutex::new(reservations),
            records: Mutex::new(Vec::new()),
        }
    }
}

impl PersistenceGateway for InMemoryGateway {
    fn fetch_reservations(&self, date: NaiveDate) -> RepositoryResult<Vec<Reservation>> {
        let reservations = self
            .reservations
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(reservations
            .iter()
            .filter(|r| r.service_date == date)
            .cloned()
            .collect())
    }

    fn fetch_management_records(&self) -> RepositoryResult<Vec<ManagementRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(records.clone())
    }

    fn upsert_management_record(&self, record: &ManagementRecord) -> RepositoryResult<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        match records.iter_mut().find(|r| r.order_id == record.order_id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    fn update_management_fields(
        &self,
        order_id: &str,
        update: &ManagementUpdate,
    ) -> RepositoryResult<()> {
        if update.is_empty() {
            return Err(RepositoryError::ValidationError(
                "部分更新至少需要一个字段".to_string(),
            ));
        }
        let mut records = self
            .records
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let record = records
            .iter_mut()
            .find(|r| r.order_id == order_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "ManagementRecord".to_string(),
                id: order_id.to_string(),
            })?;
        update.apply_to(record);
        Ok(())
    }
}
