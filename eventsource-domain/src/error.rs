//! 记录存储统一错误定义
//!
//! 覆盖标识解析、文档读写、解码、连接与配置等最小必要集合，
//! 便于各存储实现统一转换为 `StoreError`。
//!
use std::fmt;
use thiserror::Error;

/// 写入阶段，用于在 `WriteFailed` 中指明失败的具体操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Insert,
    Update,
    Upsert,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOperation::Insert => write!(f, "insert"),
            WriteOperation::Update => write!(f, "update"),
            WriteOperation::Upsert => write!(f, "upsert"),
        }
    }
}

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    // --- 标识 ---
    #[error("invalid aggregate id: id={id}, reason={reason}")]
    InvalidIdentifier { id: String, reason: String },

    // --- 读取 ---
    #[error("aggregate not found: {aggregate_id}")]
    NotFound { aggregate_id: String },
    #[error("could not fetch aggregate: aggregate_id={aggregate_id}, reason={reason}")]
    FetchFailed {
        aggregate_id: String,
        reason: String,
    },
    #[error("could not decode record history: aggregate_id={aggregate_id}, reason={reason}")]
    DecodeFailed {
        aggregate_id: String,
        reason: String,
    },

    // --- 写入 ---
    #[error("could not test for existing document: aggregate_id={aggregate_id}, reason={reason}")]
    ExistenceCheckFailed {
        aggregate_id: String,
        reason: String,
    },
    #[error("could not {operation} aggregate: aggregate_id={aggregate_id}, reason={reason}")]
    WriteFailed {
        operation: WriteOperation,
        aggregate_id: String,
        reason: String,
    },

    // --- 调用方截止时间 ---
    #[error("deadline exceeded: phase={phase}, aggregate_id={aggregate_id}")]
    DeadlineExceeded {
        phase: &'static str,
        aggregate_id: String,
    },

    // --- 基础设施 ---
    #[error("connection error: {reason}")]
    Connection { reason: String },
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl StoreError {
    /// 出错所涉及的聚合标识（连接/配置类错误没有）
    pub fn aggregate_id(&self) -> Option<&str> {
        match self {
            StoreError::InvalidIdentifier { id, .. } => Some(id),
            StoreError::NotFound { aggregate_id }
            | StoreError::FetchFailed { aggregate_id, .. }
            | StoreError::DecodeFailed { aggregate_id, .. }
            | StoreError::ExistenceCheckFailed { aggregate_id, .. }
            | StoreError::WriteFailed { aggregate_id, .. }
            | StoreError::DeadlineExceeded { aggregate_id, .. } => Some(aggregate_id),
            StoreError::Connection { .. } | StoreError::Config { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// 统一 Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failed_message_names_operation_and_id() {
        let err = StoreError::WriteFailed {
            operation: WriteOperation::Update,
            aggregate_id: "65f1c0ffee0000000000abcd".into(),
            reason: "boom".into(),
        };
        assert_eq!(
            err.to_string(),
            "could not update aggregate: aggregate_id=65f1c0ffee0000000000abcd, reason=boom"
        );
        assert_eq!(err.aggregate_id(), Some("65f1c0ffee0000000000abcd"));
    }

    #[test]
    fn connection_errors_carry_no_aggregate() {
        let err = StoreError::Connection {
            reason: "refused".into(),
        };
        assert_eq!(err.aggregate_id(), None);
        assert!(!err.is_not_found());
        assert!(
            StoreError::NotFound {
                aggregate_id: "x".into()
            }
            .is_not_found()
        );
    }
}
