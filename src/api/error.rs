// ==========================================
// 考试监考排班系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，把引擎/仓储错误转换为用户可读的消息
// 约束: 每个错误都带显式原因，调用方据此提示用户
// ==========================================

use crate::engine::error::AllocationError;
use crate::i18n::t_with_args;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 分配规则错误
    // ==========================================
    #[error("资源未找到: {entity}(id={id})")]
    NotFound { entity: String, id: String },

    #[error("考试已分配: exam_id={exam_id}")]
    AlreadyAssigned { exam_id: String },

    #[error("资源不足: teachers={teachers}, halls={halls}")]
    InsufficientResources { teachers: usize, halls: usize },

    #[error("不能与自己互换: teacher_id={teacher_id}")]
    SameTeacher { teacher_id: i64 },

    // ==========================================
    // 业务输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    /// 分配集合读写失败（会话集合保持不变）
    #[error("分配存储失败: {0}")]
    StoreError(String),

    #[error("目录数据读取失败: {0}")]
    DirectoryError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 按当前 locale 渲染的用户提示
    pub fn localized_message(&self) -> String {
        match self {
            ApiError::NotFound { entity, id } => {
                t_with_args("error.not_found", &[("entity", entity.as_str()), ("id", id.as_str())])
            }
            ApiError::AlreadyAssigned { exam_id } => {
                t_with_args("error.already_assigned", &[("exam_id", exam_id.as_str())])
            }
            ApiError::InsufficientResources { teachers, halls } => {
                let teachers = teachers.to_string();
                let halls = halls.to_string();
                t_with_args(
                    "error.insufficient_resources",
                    &[("teachers", teachers.as_str()), ("halls", halls.as_str())],
                )
            }
            ApiError::SameTeacher { teacher_id } => {
                let teacher_id = teacher_id.to_string();
                t_with_args("error.same_teacher", &[("teacher_id", teacher_id.as_str())])
            }
            ApiError::InvalidInput(msg) => t_with_args("error.invalid_input", &[("message", msg.as_str())]),
            ApiError::InvalidStateTransition { from, to } => {
                t_with_args("error.invalid_state_transition", &[("from", from.as_str()), ("to", to.as_str())])
            }
            ApiError::StoreError(msg) | ApiError::DatabaseError(msg) => {
                t_with_args("error.storage", &[("message", msg.as_str())])
            }
            ApiError::DirectoryError(msg) => t_with_args("error.directory", &[("message", msg.as_str())]),
            ApiError::InternalError(msg) => t_with_args("error.internal", &[("message", msg.as_str())]),
            ApiError::Other(err) => {
                let message = err.to_string();
                t_with_args("error.internal", &[("message", message.as_str())])
            }
        }
    }
}

// ==========================================
// 从 AllocationError 转换
// ==========================================
impl From<AllocationError> for ApiError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::NotFound { entity, id } => ApiError::NotFound { entity, id },
            AllocationError::AlreadyAssigned { exam_id } => ApiError::AlreadyAssigned { exam_id },
            AllocationError::InsufficientResources { teachers, halls } => {
                ApiError::InsufficientResources { teachers, halls }
            }
            AllocationError::SameTeacher { teacher_id } => ApiError::SameTeacher { teacher_id },
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => ApiError::NotFound { entity, id },
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::InvalidInput(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::Serialization(msg) => ApiError::StoreError(msg),

            // 目录来源
            RepositoryError::DirectorySource(msg) => ApiError::DirectoryError(msg),
            RepositoryError::FileNotFound(path) => {
                ApiError::DirectoryError(format!("文件不存在: {}", path))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DirectoryError(format!("字段{}错误: {}", field, message))
            }

            // 业务规则错误
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }

            // 通用错误
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
