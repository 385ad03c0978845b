// ==========================================
// 供应商到货管控 - 导入层
// ==========================================
// 职责: 外部预约表导入
// 支持: Excel (.xlsx), CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod reservation_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use reservation_importer::{
    parse_service_date, ImportSummary, RejectedRow, ReservationColumn, ReservationImporter,
};
