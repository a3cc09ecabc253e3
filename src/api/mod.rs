// ==========================================
// 考试监考排班系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行/界面调用
// ==========================================

pub mod error;
pub mod assignment_api;
pub mod portal_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use assignment_api::{AssignmentApi, AutoAssignReport};
pub use portal_api::{ChangeRequestDraft, PortalApi};
