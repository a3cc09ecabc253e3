// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use invigilation_duty::domain::{Exam, Hall, Teacher};
use invigilation_duty::repository::InMemoryDirectory;

// ==========================================
// Exam 构建器
// ==========================================

pub struct ExamBuilder {
    id: String,
    title: String,
    date: NaiveDate,
    start_time: Option<String>,
}

impl ExamBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Exam {}", id),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            start_time: None,
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn at(mut self, start_time: &str) -> Self {
        self.start_time = Some(start_time.to_string());
        self
    }

    pub fn build(self) -> Exam {
        Exam::new(self.id, &self.title, self.date, self.start_time.as_deref())
    }
}

// ==========================================
// Directory 构建器
// ==========================================

#[derive(Default)]
pub struct DirectoryBuilder {
    teachers: Vec<Teacher>,
    halls: Vec<Hall>,
    exams: Vec<Exam>,
}

impl DirectoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn teacher(mut self, id: i64, name: &str) -> Self {
        self.teachers.push(Teacher::new(id, name, "General"));
        self
    }

    /// 只有登录名的教师
    pub fn login_only_teacher(mut self, id: i64, login: &str) -> Self {
        self.teachers.push(Teacher {
            id,
            display_name: None,
            login_name: Some(login.to_string()),
            subject: "General".to_string(),
        });
        self
    }

    pub fn hall(mut self, id: i64, label: &str, capacity: u32) -> Self {
        self.halls.push(Hall::new(id, label, capacity));
        self
    }

    pub fn exam(mut self, exam: ExamBuilder) -> Self {
        self.exams.push(exam.build());
        self
    }

    pub fn build(self) -> InMemoryDirectory {
        InMemoryDirectory::new(self.teachers, self.halls, self.exams)
    }
}
