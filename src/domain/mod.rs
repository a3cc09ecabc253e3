// ==========================================
// 考试监考排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 约束: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod directory;
pub mod exam;
pub mod hall;
pub mod portal;
pub mod teacher;
pub mod types;

// 重导出核心类型
pub use assignment::Assignment;
pub use directory::DirectorySnapshot;
pub use exam::{time_bucket, Exam, ExamId, UNSET_TIME_BUCKET};
pub use hall::Hall;
pub use portal::{AvailabilityEntry, ChangeRequest};
pub use teacher::{resolve_teacher_name, Teacher, UNNAMED_TEACHER};
pub use types::{AssignmentStatus, ChangeRequestStatus, DutyType, RequestType};
