// ==========================================
// 供应商到货管控 - 预约导入器
// ==========================================
// 流程: 解析文件 → 列映射 → 行校验 → 批量落库
// 列名: 西语原表头与英文别名均可
// 行规则:
// - 订单号为空（含 nan/None 等占位）→ 拒绝
// - 日期无法解析 → 拒绝
// - 其余字段原样保留（时段为自由文本）
// ==========================================

use crate::domain::reservation::Reservation;
use crate::domain::types::{is_blank, non_blank};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use crate::repository::reservation_repo::ReservationRepository;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

// ==========================================
// 列定义
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationColumn {
    Date,
    Slot,
    Supplier,
    PackageCount,
    OrderId,
}

impl ReservationColumn {
    /// 可接受的表头（按优先级）
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ReservationColumn::Date => &["Fecha", "date"],
            ReservationColumn::Slot => &["Hora", "slot"],
            ReservationColumn::Supplier => &["Proveedor", "supplier"],
            ReservationColumn::PackageCount => &["Numero_de_bultos", "package_count"],
            ReservationColumn::OrderId => &["Orden_de_compra", "order_id"],
        }
    }

    fn value<'a>(&self, row: &'a RawRow) -> Option<&'a str> {
        self.aliases()
            .iter()
            .find_map(|alias| row.get(*alias))
            .map(String::as_str)
    }

    fn present_in(&self, row: &RawRow) -> bool {
        self.aliases().iter().any(|alias| row.contains_key(*alias))
    }
}

// ==========================================
// 导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub row_number: usize, // 数据行号（表头计为第 1 行，空白行不计）
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: Vec<RejectedRow>,
}

// ==========================================
// ReservationImporter
// ==========================================
pub struct ReservationImporter {
    repo: ReservationRepository,
}

impl ReservationImporter {
    pub fn new(repo: ReservationRepository) -> Self {
        Self { repo }
    }

    /// 导入预约文件
    ///
    /// # 返回
    /// - Ok(ImportSummary): 写入条数与被拒绝的行
    /// - Err: 文件无法读取、缺少必需列或落库失败
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let rows = UniversalFileParser.parse(file_path.as_ref())?;
        let (reservations, rejected) = Self::map_rows(&rows)?;

        let imported = self.repo.upsert_batch(&reservations)?;

        for row in &rejected {
            warn!(row = row.row_number, reason = %row.reason, "预约行被拒绝");
        }
        info!(imported, rejected = rejected.len(), "预约导入完成");

        Ok(ImportSummary { imported, rejected })
    }

    /// 映射全部行（纯函数）
    pub fn map_rows(rows: &[RawRow]) -> ImportResult<(Vec<Reservation>, Vec<RejectedRow>)> {
        if let Some(first) = rows.first() {
            for column in [ReservationColumn::Date, ReservationColumn::OrderId] {
                if !column.present_in(first) {
                    return Err(ImportError::MissingColumn(column.aliases().join("/")));
                }
            }
        }

        let mut reservations = Vec::with_capacity(rows.len());
        let mut rejected = Vec::new();
        for (idx, row) in rows.iter().enumerate() {
            // 表头占第 1 行
            let row_number = idx + 2;
            match Self::map_row(row) {
                Ok(reservation) => reservations.push(reservation),
                Err(reason) => rejected.push(RejectedRow { row_number, reason }),
            }
        }
        Ok((reservations, rejected))
    }

    /// 映射单行，失败时返回拒绝原因
    pub fn map_row(row: &RawRow) -> Result<Reservation, String> {
        let order_id = ReservationColumn::OrderId.value(row);
        if is_blank(order_id) {
            return Err("订单号为空".to_string());
        }

        let raw_date = ReservationColumn::Date.value(row).unwrap_or("");
        let service_date =
            parse_service_date(raw_date).ok_or_else(|| format!("日期无法解析: {}", raw_date))?;

        let text = |column: ReservationColumn| {
            non_blank(column.value(row)).unwrap_or("").to_string()
        };

        Ok(Reservation {
            service_date,
            order_id: order_id.unwrap_or("").trim().to_string(),
            scheduled_slot: text(ReservationColumn::Slot),
            supplier: text(ReservationColumn::Supplier),
            package_count: text(ReservationColumn::PackageCount),
        })
    }
}

/// 解析预约日期
///
/// 接受 YYYY-MM-DD（可带时间部分，可不补零）、DD/MM/YYYY、YYYY/MM/DD
pub fn parse_service_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(|c: char| c == ' ' || c == 'T').next()?;
    if date_part.is_empty() {
        return None;
    }

    ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
