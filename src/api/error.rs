// ==========================================
// 供应商到货管控 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把下层技术错误转换为可直接展示的消息
// 约束: 每个错误都带明确原因，界面据此提示操作员
// ==========================================

use crate::config::dock_config::InvalidConfig;
use crate::engine::error::{OrderViolation, RecordingError};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 作业时间顺序非法（结束不晚于开始 / 开始早于到货）
    #[error("时间顺序非法 (订单 {order_id}): {violation}")]
    InvalidTimeOrder {
        order_id: String,
        violation: OrderViolation,
    },

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("存储数据损坏: {0}")]
    DataCorruption(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导入与配置错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 RecordingError 转换
// ==========================================
impl From<RecordingError> for ApiError {
    fn from(err: RecordingError) -> Self {
        match err {
            RecordingError::RecordNotFound { order_id } => {
                ApiError::NotFound(format!("订单 {} 没有到货记录", order_id))
            }
            RecordingError::InvalidOrder {
                order_id,
                violation,
            } => ApiError::InvalidTimeOrder {
                order_id,
                violation,
            },
            err @ RecordingError::CorruptRecord { .. } => ApiError::DataCorruption(err.to_string()),
            RecordingError::Persistence(err) => err.into(),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Repository(err) => err.into(),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<InvalidConfig> for ApiError {
    fn from(err: InvalidConfig) -> Self {
        ApiError::ConfigError(err.0)
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "ManagementRecord".to_string(),
            id: "OC-1".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("ManagementRecord"));
                assert!(msg.contains("OC-1"));
            }
            _ => panic!("Expected NotFound"),
        }

        let api_err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert!(matches!(api_err, ApiError::DatabaseConnectionError(_)));
    }

    #[test]
    fn test_recording_error_conversion() {
        let api_err: ApiError = RecordingError::InvalidOrder {
            order_id: "OC-2".to_string(),
            violation: OrderViolation::StartBeforeArrival,
        }
        .into();
        match api_err {
            ApiError::InvalidTimeOrder {
                order_id,
                violation,
            } => {
                assert_eq!(order_id, "OC-2");
                assert_eq!(violation, OrderViolation::StartBeforeArrival);
            }
            _ => panic!("Expected InvalidTimeOrder"),
        }

        let api_err: ApiError = RecordingError::Persistence(RepositoryError::DatabaseQueryError(
            "disk I/O error".to_string(),
        ))
        .into();
        assert!(matches!(api_err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::MissingColumn("Fecha/date".to_string()).into();
        match api_err {
            ApiError::ImportError(msg) => assert!(msg.contains("Fecha")),
            _ => panic!("Expected ImportError"),
        }
    }
}
