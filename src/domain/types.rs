// ==========================================
// 供应商到货管控 - 领域类型定义
// ==========================================
// 职责: 订单生命周期状态、空值判定
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单生命周期状态 (Order State)
// ==========================================
// 每次读取时由 预约 ∪ 管理记录 重新派生，不单独持久化
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderState {
    PendingArrival,        // 待到货
    ArrivedPendingService, // 已到货,待作业
    ServiceCompleted,      // 作业完成
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::PendingArrival => "PENDING_ARRIVAL",
            OrderState::ArrivedPendingService => "ARRIVED_PENDING_SERVICE",
            OrderState::ServiceCompleted => "SERVICE_COMPLETED",
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 空值判定 (Blank)
// ==========================================
// 外部表格中的单元格可能是: 缺失 / 空串 / "nan" / "None" / "null"
// 三种形式必须一致处理，分类器与作业登记共用此判定

/// 被视为空值的文本占位符（比较时忽略大小写）
const NULL_PLACEHOLDERS: [&str; 5] = ["nan", "none", "null", "nat", "<na>"];

/// 判定单元格是否为空
///
/// # 示例
/// ```
/// use dock_control::domain::types::is_blank;
/// assert!(is_blank(None));
/// assert!(is_blank(Some("  ")));
/// assert!(is_blank(Some("None")));
/// assert!(!is_blank(Some("2024-08-07 10:12:00")));
/// ```
pub fn is_blank(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(raw) => {
            let trimmed = raw.trim();
            trimmed.is_empty()
                || NULL_PLACEHOLDERS
                    .iter()
                    .any(|p| trimmed.eq_ignore_ascii_case(p))
        }
    }
}

/// 将空值统一折叠为 None，非空值去除首尾空白
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    if is_blank(value) {
        None
    } else {
        value.map(str::trim)
    }
}
