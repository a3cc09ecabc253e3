// ==========================================
// 考试监考排班系统 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod settings_reader_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, defaults, ConfigManager, SUPPORTED_LOCALES};
pub use settings_reader_trait::SettingsReader;
