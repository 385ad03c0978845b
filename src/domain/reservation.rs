// ==========================================
// 供应商到货管控 - 预约实体
// ==========================================
// 来源: 外部预约流程按日生成，本系统只读
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Reservation - 到货预约
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub service_date: NaiveDate,  // 预约日期
    pub order_id: String,         // 采购订单号（同一天内唯一）
    pub scheduled_slot: String,   // 预约时段（自由文本，如 "09:00-09:30"）
    pub supplier: String,         // 供应商
    pub package_count: String,    // 件数（原样保留）
}

impl Reservation {
    /// 件数的数值形式（无法解析时返回 None）
    pub fn package_count_value(&self) -> Option<u32> {
        let raw = self.package_count.trim();
        raw.parse::<u32>().ok().or_else(|| {
            // 表格导出常见 "12.0"
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                .map(|v| v as u32)
        })
    }
}
