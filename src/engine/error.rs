// ==========================================
// 考试监考排班系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约束: 引擎只报告，不重试；失败时原集合保持不变
// ==========================================

use thiserror::Error;

/// 分配引擎错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// 考试/考场/教师/分配 ID 无法解析
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    /// 考试已有分配
    #[error("考试已分配: exam_id={exam_id}")]
    AlreadyAssigned { exam_id: String },

    /// 自动分配缺少教师或考场
    #[error("资源不足: teachers={teachers}, halls={halls}")]
    InsufficientResources { teachers: usize, halls: usize },

    /// 互换双方为同一教师
    #[error("不能与自己互换: teacher_id={teacher_id}")]
    SameTeacher { teacher_id: i64 },
}

impl AllocationError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        AllocationError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// Result 类型别名
pub type AllocationResult<T> = Result<T, AllocationError>;
