// ==========================================
// 考试监考排班系统 - 目录数据来源
// ==========================================
// 职责: 提供教师/考场/考试的有序只读列表
// 约束: 同一次操作内列表顺序稳定（决定平局选择）
// 实现: 内存目录 / CSV 目录 / 考场兜底包装
// ==========================================

use crate::domain::directory::DirectorySnapshot;
use crate::domain::exam::Exam;
use crate::domain::hall::Hall;
use crate::domain::teacher::Teacher;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::warn;

// ==========================================
// Directory Trait
// ==========================================
pub trait Directory: Send + Sync {
    fn list_teachers(&self) -> RepositoryResult<Vec<Teacher>>;

    fn list_halls(&self) -> RepositoryResult<Vec<Hall>>;

    fn list_exams(&self) -> RepositoryResult<Vec<Exam>>;

    /// 一次性解析三类列表，供引擎单次调用使用
    fn snapshot(&self) -> RepositoryResult<DirectorySnapshot> {
        Ok(DirectorySnapshot::new(
            self.list_teachers()?,
            self.list_halls()?,
            self.list_exams()?,
        ))
    }
}

// ==========================================
// InMemoryDirectory - 内存目录
// ==========================================
#[derive(Default)]
pub struct InMemoryDirectory {
    teachers: RwLock<Vec<Teacher>>,
    halls: RwLock<Vec<Hall>>,
    exams: RwLock<Vec<Exam>>,
}

impl InMemoryDirectory {
    pub fn new(teachers: Vec<Teacher>, halls: Vec<Hall>, exams: Vec<Exam>) -> Self {
        Self {
            teachers: RwLock::new(teachers),
            halls: RwLock::new(halls),
            exams: RwLock::new(exams),
        }
    }

    pub fn set_teachers(&self, teachers: Vec<Teacher>) -> RepositoryResult<()> {
        *write(&self.teachers)? = teachers;
        Ok(())
    }

    pub fn set_halls(&self, halls: Vec<Hall>) -> RepositoryResult<()> {
        *write(&self.halls)? = halls;
        Ok(())
    }

    pub fn set_exams(&self, exams: Vec<Exam>) -> RepositoryResult<()> {
        *write(&self.exams)? = exams;
        Ok(())
    }

    /// 按ID 替换教师记录
    pub fn upsert_teacher(&self, teacher: Teacher) -> RepositoryResult<()> {
        let mut teachers = write(&self.teachers)?;
        match teachers.iter_mut().find(|t| t.id == teacher.id) {
            Some(existing) => *existing = teacher,
            None => teachers.push(teacher),
        }
        Ok(())
    }
}

fn read<T: Clone>(lock: &RwLock<Vec<T>>) -> RepositoryResult<Vec<T>> {
    lock.read()
        .map(|guard| guard.clone())
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

fn write<T>(lock: &RwLock<Vec<T>>) -> RepositoryResult<std::sync::RwLockWriteGuard<'_, Vec<T>>> {
    lock.write()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

impl Directory for InMemoryDirectory {
    fn list_teachers(&self) -> RepositoryResult<Vec<Teacher>> {
        read(&self.teachers)
    }

    fn list_halls(&self) -> RepositoryResult<Vec<Hall>> {
        read(&self.halls)
    }

    fn list_exams(&self) -> RepositoryResult<Vec<Exam>> {
        read(&self.exams)
    }
}

// ==========================================
// FallbackHallsDirectory - 考场兜底包装
// ==========================================
// 内层考场来源读取失败时改用默认考场 (Hall A/B/C)
// 教师/考试读取失败照常返回错误

/// 考场来源不可用时的默认考场
pub fn fallback_halls() -> Vec<Hall> {
    vec![
        Hall::new(1, "Hall A", 60),
        Hall::new(2, "Hall B", 60),
        Hall::new(3, "Hall C", 60),
    ]
}

pub struct FallbackHallsDirectory<D> {
    inner: D,
}

impl<D: Directory> FallbackHallsDirectory<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: Directory> Directory for FallbackHallsDirectory<D> {
    fn list_teachers(&self) -> RepositoryResult<Vec<Teacher>> {
        self.inner.list_teachers()
    }

    fn list_halls(&self) -> RepositoryResult<Vec<Hall>> {
        match self.inner.list_halls() {
            Ok(halls) => Ok(halls),
            Err(e) => {
                warn!(error = %e, "考场来源不可用，使用默认考场");
                Ok(fallback_halls())
            }
        }
    }

    fn list_exams(&self) -> RepositoryResult<Vec<Exam>> {
        self.inner.list_exams()
    }
}

// ==========================================
// CsvDirectory - CSV 目录
// ==========================================
// 目录下三个文件（均带表头）:
// - teachers.csv: id,display_name,login_name,subject
// - halls.csv:    id,label,capacity
// - exams.csv:    id,title,date,start_time   (date: YYYY-MM-DD)
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub const TEACHERS_FILE: &'static str = "teachers.csv";
    pub const HALLS_FILE: &'static str = "halls.csv";
    pub const EXAMS_FILE: &'static str = "exams.csv";

    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn read_rows(&self, file_name: &str) -> RepositoryResult<Vec<HashMap<String, String>>> {
        let path = self.root.join(file_name);
        if !path.exists() {
            return Err(RepositoryError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(&path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

fn optional(row: &HashMap<String, String>, field: &str) -> Option<String> {
    row.get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(row: &HashMap<String, String>, field: &str) -> RepositoryResult<String> {
    optional(row, field).ok_or_else(|| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: "字段缺失或为空".to_string(),
    })
}

fn parse_id(row: &HashMap<String, String>) -> RepositoryResult<i64> {
    let raw = required(row, "id")?;
    raw.parse::<i64>().map_err(|_| RepositoryError::FieldValueError {
        field: "id".to_string(),
        message: format!("不是整数: {}", raw),
    })
}

impl Directory for CsvDirectory {
    fn list_teachers(&self) -> RepositoryResult<Vec<Teacher>> {
        self.read_rows(Self::TEACHERS_FILE)?
            .iter()
            .map(|row| -> RepositoryResult<Teacher> {
                Ok(Teacher {
                    id: parse_id(row)?,
                    display_name: optional(row, "display_name"),
                    login_name: optional(row, "login_name"),
                    subject: optional(row, "subject").unwrap_or_default(),
                })
            })
            .collect()
    }

    fn list_halls(&self) -> RepositoryResult<Vec<Hall>> {
        self.read_rows(Self::HALLS_FILE)?
            .iter()
            .map(|row| -> RepositoryResult<Hall> {
                let raw_capacity = required(row, "capacity")?;
                let capacity = raw_capacity
                    .parse::<u32>()
                    .ok()
                    .filter(|c| *c > 0)
                    .ok_or_else(|| RepositoryError::FieldValueError {
                        field: "capacity".to_string(),
                        message: format!("容量必须为正整数: {}", raw_capacity),
                    })?;
                Ok(Hall {
                    id: parse_id(row)?,
                    label: required(row, "label")?,
                    capacity,
                })
            })
            .collect()
    }

    fn list_exams(&self) -> RepositoryResult<Vec<Exam>> {
        self.read_rows(Self::EXAMS_FILE)?
            .iter()
            .map(|row| -> RepositoryResult<Exam> {
                let raw_date = required(row, "date")?;
                let date = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d").map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: "date".to_string(),
                        message: format!("{} ({})", raw_date, e),
                    }
                })?;
                Ok(Exam {
                    id: required(row, "id")?.into(),
                    title: required(row, "title")?,
                    date,
                    start_time: optional(row, "start_time"),
                })
            })
            .collect()
    }
}
