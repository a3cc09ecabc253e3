// ==========================================
// 考试监考排班系统 - 核心库
// ==========================================
// 职责: 监考分配（人工/自动/互换）、冲突规避、统计视图、教师门户
// 技术栈: Rust + SQLite
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 存储与目录
pub mod repository;

// 引擎层 - 分配规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AssignmentStatus, ChangeRequestStatus, DutyType, RequestType};

// 领域实体
pub use domain::{Assignment, ChangeRequest, DirectorySnapshot, Exam, ExamId, Hall, Teacher};

// 引擎
pub use engine::{AllocationEngine, AllocationError, ConflictPolicy, QueryView};

// API
pub use api::{ApiError, AssignmentApi, PortalApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "考试监考排班系统";
