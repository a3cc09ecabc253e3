// ==========================================
// 考试监考排班系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 约束: 所有仓储共用一条 SQLite 连接
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{AssignmentApi, PortalApi};
use crate::config::{ConfigManager, SettingsReader};
use crate::db::{open_sqlite_connection, stamp_schema_version};
use crate::repository::{Directory, PortalRepository, SqliteAssignmentStore};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "INVIGILATION_DUTY_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 分配API
    pub assignment_api: Arc<AssignmentApi>,

    /// 教师门户API
    pub portal_api: Arc<PortalApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - directory: 教师/考场/考试目录
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并记录 schema 版本
    /// 2. 读取配置（存储键、语言）
    /// 3. 加载分配集合并创建所有API实例
    pub fn new(db_path: String, directory: Arc<dyn Directory>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        stamp_schema_version(&conn)
            .map_err(|e| format!("schema 版本初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?
        );

        let locale = config_manager
            .get_locale()
            .map_err(|e| format!("读取语言配置失败: {}", e))?;
        crate::i18n::set_locale(&locale);

        let store_key = config_manager
            .get_assignment_store_key()
            .map_err(|e| format!("读取存储键配置失败: {}", e))?;

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let assignment_store = Arc::new(
            SqliteAssignmentStore::from_connection(conn.clone(), &store_key)
                .map_err(|e| format!("无法创建SqliteAssignmentStore: {}", e))?
        );
        let portal_repo = Arc::new(
            PortalRepository::from_connection(conn)
                .map_err(|e| format!("无法创建PortalRepository: {}", e))?
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let assignment_api = Arc::new(
            AssignmentApi::new(assignment_store, directory)
                .map_err(|e| format!("无法加载分配集合: {}", e))?
        );
        let portal_api = Arc::new(PortalApi::new(
            assignment_api.clone(),
            portal_repo,
            config_manager.clone(),
        ));

        tracing::info!(store_key = %store_key, locale = %locale, "AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            assignment_api,
            portal_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 INVIGILATION_DUTY_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./invigilation_duty.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("invigilation-duty");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("invigilation_duty.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Exam, Hall, Teacher};
    use crate::repository::InMemoryDirectory;
    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_state_reloads_persisted_assignments() {
        // AppState::new 会设置全局 locale
        let _guard = crate::i18n::LOCALE_TEST_LOCK.lock().unwrap();
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();
        let directory: Arc<dyn Directory> = Arc::new(InMemoryDirectory::new(
            vec![Teacher::new(1, "Alice", "Math")],
            vec![Hall::new(10, "Hall A", 100)],
            vec![Exam::new("E1", "Math", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), None)],
        ));

        let state = AppState::new(db_path.clone(), directory.clone()).unwrap();
        let created = state.assignment_api.create_assignment("E1", 10, 1).unwrap();
        drop(state);

        let reopened = AppState::new(db_path, directory).unwrap();
        assert_eq!(reopened.assignment_api.list_assignments().unwrap(), vec![created]);
    }
}
