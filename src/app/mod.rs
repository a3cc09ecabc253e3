// ==========================================
// 考试监考排班系统 - 应用层
// ==========================================
// 职责: 装配配置、存储、目录与 API 实例
// ==========================================

pub mod state;

// 重导出
pub use state::{AppState, get_default_db_path, DB_PATH_ENV};
