// ==========================================
// 考试监考排班系统 - 分配集合存储
// ==========================================
// 职责: 分配集合的整体持久化 (key-value)
// 约束: save 为整体替换，不做部分更新
// 实现: SQLite (assignment_store 表) / 内存
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::assignment::Assignment;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ==========================================
// AssignmentStore Trait
// ==========================================
// 用途: 会话开始时 load 一次，每次变更后 save
pub trait AssignmentStore: Send + Sync {
    /// 读取全部分配（不存在时返回空集合）
    fn load(&self) -> RepositoryResult<Vec<Assignment>>;

    /// 以新集合整体替换已存内容
    fn save(&self, assignments: &[Assignment]) -> RepositoryResult<()>;
}

// ==========================================
// SqliteAssignmentStore - SQLite 实现
// ==========================================
pub struct SqliteAssignmentStore {
    conn: Arc<Mutex<Connection>>,
    store_key: String,
}

impl SqliteAssignmentStore {
    pub fn new(db_path: &str, store_key: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)), store_key)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>, store_key: &str) -> RepositoryResult<Self> {
        if store_key.trim().is_empty() {
            return Err(RepositoryError::ValidationError("存储键不能为空".to_string()));
        }
        let store = Self {
            conn,
            store_key: store_key.to_string(),
        };
        store.ensure_table()?;
        Ok(store)
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS assignment_store (
              store_key TEXT PRIMARY KEY,
              payload_json TEXT NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }
}

impl AssignmentStore for SqliteAssignmentStore {
    fn load(&self) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload_json FROM assignment_store WHERE store_key = ?1",
                params![self.store_key],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, assignments: &[Assignment]) -> RepositoryResult<()> {
        let payload = serde_json::to_string(assignments)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO assignment_store (store_key, payload_json, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(store_key) DO UPDATE SET
                payload_json = excluded.payload_json,
                updated_at = excluded.updated_at
            "#,
            params![self.store_key, payload],
        )?;
        tracing::debug!(store_key = %self.store_key, count = assignments.len(), "分配集合已保存");
        Ok(())
    }
}

// ==========================================
// InMemoryAssignmentStore - 内存实现
// ==========================================
#[derive(Default)]
pub struct InMemoryAssignmentStore {
    assignments: Mutex<Vec<Assignment>>,
    save_count: AtomicUsize,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assignments(assignments: Vec<Assignment>) -> Self {
        Self {
            assignments: Mutex::new(assignments),
            save_count: AtomicUsize::new(0),
        }
    }

    /// save 被调用的次数
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
    fn load(&self) -> RepositoryResult<Vec<Assignment>> {
        let guard = self
            .assignments
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, assignments: &[Assignment]) -> RepositoryResult<()> {
        let mut guard = self
            .assignments
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *guard = assignments.to_vec();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssignmentStatus, Exam, Hall, Teacher};
    use chrono::NaiveDate;

    fn sample(id: &str) -> Assignment {
        Assignment::from_records(
            id.to_string(),
            &Exam::new(id, "Math", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), Some("09:00")),
            &Hall::new(1, "Hall A", 100),
            &Teacher::new(1, "Alice", "Math"),
            AssignmentStatus::Assigned,
        )
    }

    fn memory_store(key: &str) -> SqliteAssignmentStore {
        let conn = Connection::open_in_memory().unwrap();
        SqliteAssignmentStore::from_connection(Arc::new(Mutex::new(conn)), key).unwrap()
    }

    #[test]
    fn test_sqlite_store_empty_load() {
        let store = memory_store("examAssignments");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_store_replaces_whole_collection() {
        let store = memory_store("examAssignments");
        store.save(&[sample("E1"), sample("E2")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);

        store.save(&[sample("E3")]).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "E3");
    }

    #[test]
    fn test_sqlite_store_keys_are_isolated() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        let first = SqliteAssignmentStore::from_connection(conn.clone(), "session-a").unwrap();
        let second = SqliteAssignmentStore::from_connection(conn, "session-b").unwrap();

        first.save(&[sample("E1")]).unwrap();
        assert_eq!(first.load().unwrap().len(), 1);
        assert!(second.load().unwrap().is_empty());
    }

    #[test]
    fn test_empty_store_key_rejected() {
        let conn = Arc::new(Mutex::new(Connection::open_in_memory().unwrap()));
        assert!(SqliteAssignmentStore::from_connection(conn, "  ").is_err());
    }

    #[test]
    fn test_in_memory_store_counts_saves() {
        let store = InMemoryAssignmentStore::new();
        store.save(&[sample("E1")]).unwrap();
        store.save(&[]).unwrap();
        assert_eq!(store.save_count(), 2);
        assert!(store.load().unwrap().is_empty());
    }
}
