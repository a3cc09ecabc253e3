// ==========================================
// 考试监考排班系统 - 教师门户仓储
// ==========================================
// 职责: 管理 teacher_availability / change_request 表
// 约束: 仅做数据 CRUD，状态流转校验在 API 层
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::portal::{AvailabilityEntry, ChangeRequest};
use crate::domain::types::{ChangeRequestStatus, RequestType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const CHANGE_REQUEST_COLUMNS: &str = r#"
    request_id,
    assignment_id,
    exam_id,
    exam_title,
    current_hall,
    requested_hall,
    reason,
    request_type,
    status,
    submitted_at,
    resolved_at,
    teacher_id,
    teacher_name
"#;

/// change_request 原始行（枚举列尚未解析）
struct ChangeRequestRow {
    request_id: String,
    assignment_id: String,
    exam_id: String,
    exam_title: String,
    current_hall: String,
    requested_hall: Option<String>,
    reason: String,
    request_type: String,
    status: String,
    submitted_at: NaiveDateTime,
    resolved_at: Option<NaiveDateTime>,
    teacher_id: i64,
    teacher_name: String,
}

impl ChangeRequestRow {
    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            request_id: row.get(0)?,
            assignment_id: row.get(1)?,
            exam_id: row.get(2)?,
            exam_title: row.get(3)?,
            current_hall: row.get(4)?,
            requested_hall: row.get(5)?,
            reason: row.get(6)?,
            request_type: row.get(7)?,
            status: row.get(8)?,
            submitted_at: row.get(9)?,
            resolved_at: row.get(10)?,
            teacher_id: row.get(11)?,
            teacher_name: row.get(12)?,
        })
    }

    fn into_domain(self) -> RepositoryResult<ChangeRequest> {
        let request_type = self
            .request_type
            .parse::<RequestType>()
            .map_err(|message| RepositoryError::FieldValueError {
                field: "request_type".to_string(),
                message,
            })?;
        let status = self
            .status
            .parse::<ChangeRequestStatus>()
            .map_err(|message| RepositoryError::FieldValueError {
                field: "status".to_string(),
                message,
            })?;

        Ok(ChangeRequest {
            request_id: self.request_id,
            assignment_id: self.assignment_id,
            exam_id: self.exam_id.into(),
            exam_title: self.exam_title,
            current_hall: self.current_hall,
            requested_hall: self.requested_hall,
            reason: self.reason,
            request_type,
            status,
            submitted_at: self.submitted_at,
            resolved_at: self.resolved_at,
            teacher_id: self.teacher_id,
            teacher_name: self.teacher_name,
        })
    }
}

pub struct PortalRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PortalRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_tables()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_tables(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS teacher_availability (
              teacher_id INTEGER NOT NULL,
              avail_date TEXT NOT NULL,
              is_available INTEGER NOT NULL,
              updated_at TEXT NOT NULL DEFAULT (datetime('now')),
              PRIMARY KEY (teacher_id, avail_date)
            );

            CREATE TABLE IF NOT EXISTS change_request (
              request_id TEXT PRIMARY KEY,
              assignment_id TEXT NOT NULL,
              exam_id TEXT NOT NULL,
              exam_title TEXT NOT NULL,
              current_hall TEXT NOT NULL,
              requested_hall TEXT,
              reason TEXT NOT NULL,
              request_type TEXT NOT NULL,
              status TEXT NOT NULL,
              submitted_at TEXT NOT NULL,
              resolved_at TEXT,
              teacher_id INTEGER NOT NULL,
              teacher_name TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_change_request_teacher
              ON change_request(teacher_id, submitted_at);
            CREATE INDEX IF NOT EXISTS idx_change_request_status
              ON change_request(status, submitted_at);
            "#,
        )?;
        Ok(())
    }

    // ===== 可用日期 =====

    pub fn upsert_availability(&self, entry: &AvailabilityEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO teacher_availability (teacher_id, avail_date, is_available, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(teacher_id, avail_date) DO UPDATE SET
                is_available = excluded.is_available,
                updated_at = excluded.updated_at
            "#,
            params![entry.teacher_id, entry.date, entry.is_available],
        )?;
        Ok(())
    }

    pub fn list_availability(&self, teacher_id: i64) -> RepositoryResult<Vec<AvailabilityEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT teacher_id, avail_date, is_available
            FROM teacher_availability
            WHERE teacher_id = ?1
            ORDER BY avail_date ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![teacher_id], |row| {
                Ok(AvailabilityEntry {
                    teacher_id: row.get(0)?,
                    date: row.get::<_, NaiveDate>(1)?,
                    is_available: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }

    // ===== 变更申请 =====

    pub fn insert_change_request(&self, request: &ChangeRequest) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            &format!(
                "INSERT INTO change_request ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                CHANGE_REQUEST_COLUMNS
            ),
            params![
                request.request_id,
                request.assignment_id,
                request.exam_id.as_str(),
                request.exam_title,
                request.current_hall,
                request.requested_hall,
                request.reason,
                request.request_type.to_string(),
                request.status.to_string(),
                request.submitted_at,
                request.resolved_at,
                request.teacher_id,
                request.teacher_name,
            ],
        )?;
        Ok(())
    }

    pub fn find_change_request(&self, request_id: &str) -> RepositoryResult<Option<ChangeRequest>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM change_request WHERE request_id = ?1",
            CHANGE_REQUEST_COLUMNS
        ))?;

        let result = stmt.query_row(params![request_id], ChangeRequestRow::from_row);
        match result {
            Ok(row) => Ok(Some(row.into_domain()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list_change_requests_by_teacher(&self, teacher_id: i64) -> RepositoryResult<Vec<ChangeRequest>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM change_request WHERE teacher_id = ?1 ORDER BY submitted_at ASC, request_id ASC",
            CHANGE_REQUEST_COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![teacher_id], ChangeRequestRow::from_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        rows.into_iter().map(ChangeRequestRow::into_domain).collect()
    }

    /// 按状态查询（None 表示全部）
    pub fn list_change_requests_by_status(
        &self,
        status: Option<ChangeRequestStatus>,
    ) -> RepositoryResult<Vec<ChangeRequest>> {
        let conn = self.get_conn()?;
        let rows = match status {
            Some(status) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM change_request WHERE status = ?1 ORDER BY submitted_at ASC, request_id ASC",
                    CHANGE_REQUEST_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![status.to_string()], ChangeRequestRow::from_row)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM change_request ORDER BY submitted_at ASC, request_id ASC",
                    CHANGE_REQUEST_COLUMNS
                ))?;
                let rows = stmt
                    .query_map([], ChangeRequestRow::from_row)?
                    .collect::<SqliteResult<Vec<_>>>()?;
                rows
            }
        };
        rows.into_iter().map(ChangeRequestRow::into_domain).collect()
    }

    pub fn update_change_request_status(
        &self,
        request_id: &str,
        status: ChangeRequestStatus,
        resolved_at: Option<NaiveDateTime>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE change_request SET status = ?1, resolved_at = ?2 WHERE request_id = ?3",
            params![status.to_string(), resolved_at, request_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ChangeRequest".to_string(),
                id: request_id.to_string(),
            });
        }
        Ok(())
    }
}
