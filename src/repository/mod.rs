// ==========================================
// 考试监考排班系统 - 数据仓储层
// ==========================================
// 职责: 分配存储、目录来源、门户数据访问
// 约束: Repository 不含业务逻辑; 所有查询使用参数化
// ==========================================

pub mod assignment_store;
pub mod directory_repo;
pub mod error;
pub mod portal_repo;

// 重导出核心仓储
pub use assignment_store::{AssignmentStore, InMemoryAssignmentStore, SqliteAssignmentStore};
pub use directory_repo::{fallback_halls, CsvDirectory, Directory, FallbackHallsDirectory, InMemoryDirectory};
pub use error::{RepositoryError, RepositoryResult};
pub use portal_repo::PortalRepository;
