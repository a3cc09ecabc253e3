// ==========================================
// 考试监考排班系统 - 引擎层
// ==========================================
// 职责: 分配规则与派生视图,不访问存储
// 约束: 引擎函数输入集合只读，输出新集合
// ==========================================

pub mod allocation;
pub mod conflict_policy;
pub mod error;
pub mod query_view;

// 重导出核心引擎
pub use allocation::{AllocationEngine, AutoAssignOutcome, AutoAssignSummary};
pub use conflict_policy::{ConflictPolicy, HallBookings, HallChoice, TeacherLoad};
pub use error::{AllocationError, AllocationResult};
pub use query_view::{QueryView, StatsSummary};
