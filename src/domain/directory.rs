// ==========================================
// 考试监考排班系统 - 目录快照
// ==========================================
// 引擎每次调用消费一份已解析完成的目录数据
// 列表顺序有意义: 决定负载/容量平局时的选择
// ==========================================

use crate::domain::exam::{Exam, ExamId};
use crate::domain::hall::Hall;
use crate::domain::teacher::Teacher;

#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub teachers: Vec<Teacher>,
    pub halls: Vec<Hall>,
    pub exams: Vec<Exam>,
}

impl DirectorySnapshot {
    pub fn new(teachers: Vec<Teacher>, halls: Vec<Hall>, exams: Vec<Exam>) -> Self {
        Self {
            teachers,
            halls,
            exams,
        }
    }

    pub fn find_teacher(&self, teacher_id: i64) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == teacher_id)
    }

    pub fn find_hall(&self, hall_id: i64) -> Option<&Hall> {
        self.halls.iter().find(|h| h.id == hall_id)
    }

    pub fn find_exam(&self, exam_id: &ExamId) -> Option<&Exam> {
        self.exams.iter().find(|e| &e.id == exam_id)
    }
}
