// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用装配与故障注入
// ==========================================

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use invigilation_duty::api::{AssignmentApi, PortalApi};
use invigilation_duty::domain::Assignment;
use invigilation_duty::repository::{
    AssignmentStore, InMemoryDirectory, PortalRepository, RepositoryError, RepositoryResult,
    SqliteAssignmentStore,
};

use super::mock_config::MockConfig;

/// API测试环境
///
/// 基于临时 SQLite 数据库装配分配存储、门户仓储和两个 API
pub struct ApiTestEnv {
    pub _temp_file: NamedTempFile,
    pub db_path: String,
    pub directory: Arc<InMemoryDirectory>,
    pub assignment_api: Arc<AssignmentApi>,
    pub portal_api: PortalApi,
}

impl ApiTestEnv {
    pub fn new(directory: InMemoryDirectory) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(directory, MockConfig::default())
    }

    pub fn with_config(
        directory: InMemoryDirectory,
        config: MockConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or("临时文件路径不是 UTF-8")?
            .to_string();

        let directory = Arc::new(directory);
        let store = Arc::new(SqliteAssignmentStore::new(&db_path, &config.assignment_store_key)?);
        let assignment_api = Arc::new(AssignmentApi::new(store, directory.clone())?);
        let portal_repo = Arc::new(PortalRepository::new(&db_path)?);
        let portal_api = PortalApi::new(assignment_api.clone(), portal_repo, Arc::new(config));

        Ok(Self {
            _temp_file: temp_file,
            db_path,
            directory,
            assignment_api,
            portal_api,
        })
    }

    /// 以同一数据库重新打开分配存储（模拟新会话）
    pub fn reopen_store(&self, store_key: &str) -> RepositoryResult<Vec<Assignment>> {
        SqliteAssignmentStore::new(&self.db_path, store_key)?.load()
    }
}

// ==========================================
// FlakyStore - 可注入写失败的存储
// ==========================================
#[derive(Default)]
pub struct FlakyStore {
    saved: Mutex<Vec<Assignment>>,
    fail_saves: AtomicBool,
    save_attempts: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }

    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Vec<Assignment> {
        self.saved.lock().unwrap().clone()
    }
}

impl AssignmentStore for FlakyStore {
    fn load(&self) -> RepositoryResult<Vec<Assignment>> {
        Ok(self.saved())
    }

    fn save(&self, assignments: &[Assignment]) -> RepositoryResult<()> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseQueryError("disk full".to_string()));
        }
        *self.saved.lock().unwrap() = assignments.to_vec();
        Ok(())
    }
}
