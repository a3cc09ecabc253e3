// ==========================================
// 考试监考排班系统 - 只读查询视图
// ==========================================
// 职责: 基于 (分配集合, 目录快照) 的派生投影
// 约束: 无副作用，每次按需重新计算，不做缓存
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::directory::DirectorySnapshot;
use crate::domain::exam::{time_bucket, Exam, ExamId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// 统计摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total_exams: usize,
    pub assigned_exams: usize,
    pub unassigned_exams: usize,
    pub total_teachers: usize,
    pub total_halls: usize,
    pub total_assignments: usize,
}

// ==========================================
// QueryView - 查询视图
// ==========================================
pub struct QueryView<'a> {
    assignments: &'a [Assignment],
    directory: &'a DirectorySnapshot,
}

impl<'a> QueryView<'a> {
    pub fn new(assignments: &'a [Assignment], directory: &'a DirectorySnapshot) -> Self {
        Self {
            assignments,
            directory,
        }
    }

    fn assigned_exam_ids(&self) -> HashSet<&'a ExamId> {
        self.assignments.iter().map(|a| &a.exam_id).collect()
    }

    /// 未分配考试（保持目录顺序）
    pub fn unassigned_exams(&self) -> Vec<&'a Exam> {
        let assigned = self.assigned_exam_ids();
        self.directory
            .exams
            .iter()
            .filter(|e| !assigned.contains(&e.id))
            .collect()
    }

    /// 统计摘要
    pub fn stats_summary(&self) -> StatsSummary {
        let total_exams = self.directory.exams.len();
        let unassigned_exams = self.unassigned_exams().len();
        StatsSummary {
            total_exams,
            assigned_exams: total_exams - unassigned_exams,
            unassigned_exams,
            total_teachers: self.directory.teachers.len(),
            total_halls: self.directory.halls.len(),
            total_assignments: self.assignments.len(),
        }
    }

    /// 教师当前承担的分配数
    pub fn load_by_teacher(&self, teacher_id: i64) -> usize {
        load_by_teacher(self.assignments, teacher_id)
    }

    /// 考场被占用的分配数
    pub fn bookings_by_hall(&self, hall_id: i64) -> usize {
        bookings_by_hall(self.assignments, hall_id)
    }
}

// ==========================================
// 仅依赖分配集合的投影
// ==========================================
// 目录不可用时教师仍可查看本人已存储的监考

pub fn load_by_teacher(assignments: &[Assignment], teacher_id: i64) -> usize {
    assignments.iter().filter(|a| a.teacher_id == teacher_id).count()
}

pub fn bookings_by_hall(assignments: &[Assignment], hall_id: i64) -> usize {
    assignments.iter().filter(|a| a.hall_id == hall_id).count()
}

/// 某教师的全部分配（保持集合顺序）
pub fn assignments_for_teacher(assignments: &[Assignment], teacher_id: i64) -> Vec<&Assignment> {
    assignments.iter().filter(|a| a.teacher_id == teacher_id).collect()
}

/// 某教师即将到来的监考（日期 >= today，按日期、时间升序，取前 limit 条）
pub fn upcoming_for_teacher(
    assignments: &[Assignment],
    teacher_id: i64,
    today: NaiveDate,
    limit: usize,
) -> Vec<&Assignment> {
    let mut upcoming: Vec<&Assignment> = assignments_for_teacher(assignments, teacher_id)
        .into_iter()
        .filter(|a| a.exam_date >= today)
        .collect();
    upcoming.sort_by(|a, b| {
        a.exam_date
            .cmp(&b.exam_date)
            .then_with(|| time_bucket(a.exam_time.as_deref()).cmp(&time_bucket(b.exam_time.as_deref())))
    });
    upcoming.truncate(limit);
    upcoming
}

/// 某教师涉及的考场名（首次出现顺序去重，忽略空名）
pub fn halls_for_teacher(assignments: &[Assignment], teacher_id: i64) -> Vec<String> {
    let mut seen = HashSet::new();
    assignments_for_teacher(assignments, teacher_id)
        .into_iter()
        .map(|a| a.hall_name.trim())
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(name.to_string()))
        .map(str::to_string)
        .collect()
}

/// 某教师有监考的日期
pub fn duty_dates_for_teacher(assignments: &[Assignment], teacher_id: i64) -> BTreeSet<NaiveDate> {
    assignments_for_teacher(assignments, teacher_id)
        .into_iter()
        .map(|a| a.exam_date)
        .collect()
}
