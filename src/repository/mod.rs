// ==========================================
// 供应商到货管控 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod gateway;
pub mod management_repo;
pub mod reservation_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use gateway::{InMemoryGateway, PersistenceGateway, SqliteGateway};
pub use management_repo::ManagementRecordRepository;
pub use reservation_repo::ReservationRepository;
