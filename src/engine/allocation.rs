// ==========================================
// 考试监考排班系统 - 监考分配引擎
// ==========================================
// 职责: 分配集合上的纯函数操作
//   create / update / remove / auto_assign / swap
// 输入: 当前分配集合 + 目录快照
// 输出: 新的分配集合（原集合不被修改）
// 约束: 每个考试至多一条分配
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::directory::DirectorySnapshot;
use crate::domain::exam::{Exam, ExamId};
use crate::domain::types::AssignmentStatus;
use crate::engine::conflict_policy::{ConflictPolicy, HallBookings, HallChoice, TeacherLoad};
use crate::engine::error::{AllocationError, AllocationResult};
use serde::Serialize;
use std::collections::HashSet;
use tracing::instrument;

/// 自动分配摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutoAssignSummary {
    pub exams_assigned: usize,
    pub teachers_used: usize,
    pub halls_available: usize,
    /// 因考场全部冲突而走轮转回退的考试数
    pub round_robin_fallbacks: usize,
}

/// 自动分配结果
#[derive(Debug, Clone)]
pub struct AutoAssignOutcome {
    pub assignments: Vec<Assignment>,
    pub created: Vec<Assignment>,
    pub summary: AutoAssignSummary,
}

// ==========================================
// AllocationEngine - 分配引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct AllocationEngine {
    policy: ConflictPolicy,
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self {
            policy: ConflictPolicy::new(),
        }
    }

    pub fn with_policy(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    /// 人工创建分配
    ///
    /// # 返回
    /// (新集合, 新分配)
    ///
    /// # 错误
    /// - NotFound: 考试/考场/教师无法解析
    /// - AlreadyAssigned: 考试已有分配
    #[instrument(skip(self, assignments, directory), fields(exam_id = %exam_id))]
    pub fn create(
        &self,
        exam_id: &ExamId,
        hall_id: i64,
        teacher_id: i64,
        assignments: &[Assignment],
        directory: &DirectorySnapshot,
    ) -> AllocationResult<(Vec<Assignment>, Assignment)> {
        let exam = directory
            .find_exam(exam_id)
            .ok_or_else(|| AllocationError::not_found("Exam", exam_id))?;
        let hall = directory
            .find_hall(hall_id)
            .ok_or_else(|| AllocationError::not_found("Hall", hall_id))?;
        let teacher = directory
            .find_teacher(teacher_id)
            .ok_or_else(|| AllocationError::not_found("Teacher", teacher_id))?;

        if assignments.iter().any(|a| &a.exam_id == exam_id) {
            return Err(AllocationError::AlreadyAssigned {
                exam_id: exam_id.to_string(),
            });
        }

        let assignment = Assignment::from_records(
            next_assignment_id(assignments),
            exam,
            hall,
            teacher,
            AssignmentStatus::Assigned,
        );

        let mut updated = assignments.to_vec();
        updated.push(assignment.clone());
        Ok((updated, assignment))
    }

    /// 编辑分配的考场与教师
    ///
    /// 考试快照默认保留；目录仍列出该考试时以目录记录刷新标题/日期/时间。
    /// 状态不变。
    #[instrument(skip(self, assignments, directory))]
    pub fn update(
        &self,
        assignment_id: &str,
        hall_id: i64,
        teacher_id: i64,
        assignments: &[Assignment],
        directory: &DirectorySnapshot,
    ) -> AllocationResult<(Vec<Assignment>, Assignment)> {
        let position = assignments
            .iter()
            .position(|a| a.id == assignment_id)
            .ok_or_else(|| AllocationError::not_found("Assignment", assignment_id))?;
        let hall = directory
            .find_hall(hall_id)
            .ok_or_else(|| AllocationError::not_found("Hall", hall_id))?;
        let teacher = directory
            .find_teacher(teacher_id)
            .ok_or_else(|| AllocationError::not_found("Teacher", teacher_id))?;

        let mut updated = assignments.to_vec();
        let target = &mut updated[position];
        target.apply_hall(hall);
        target.apply_teacher(teacher);
        if let Some(exam) = directory.find_exam(&target.exam_id) {
            target.refresh_exam(exam);
        }

        let edited = target.clone();
        Ok((updated, edited))
    }

    /// 删除分配
    ///
    /// # 错误
    /// - NotFound: 分配不存在（原集合不变）
    pub fn remove(&self, assignment_id: &str, assignments: &[Assignment]) -> AllocationResult<Vec<Assignment>> {
        if !assignments.iter().any(|a| a.id == assignment_id) {
            return Err(AllocationError::not_found("Assignment", assignment_id));
        }

        Ok(assignments
            .iter()
            .filter(|a| a.id != assignment_id)
            .cloned()
            .collect())
    }

    /// 自动分配（贪心单遍）
    ///
    /// 规则:
    /// 1) 按目录顺序遍历未分配考试
    /// 2) 教师: 当前负载最小者（平局取目录顺序靠前）
    /// 3) 考场: 无冲突考场中容量最大者（平局取目录顺序靠前）；
    ///    全部冲突时按 序号 % 考场数 轮转
    /// 4) 新分配状态为 Auto-Assigned，并更新负载与占用
    ///
    /// # 错误
    /// - InsufficientResources: 教师或考场为空（不生成任何分配）
    #[instrument(skip(self, assignments, directory), fields(
        existing = assignments.len(),
        teachers = directory.teachers.len(),
        halls = directory.halls.len(),
        exams = directory.exams.len()
    ))]
    pub fn auto_assign(
        &self,
        assignments: &[Assignment],
        directory: &DirectorySnapshot,
    ) -> AllocationResult<AutoAssignOutcome> {
        if directory.teachers.is_empty() || directory.halls.is_empty() {
            return Err(AllocationError::InsufficientResources {
                teachers: directory.teachers.len(),
                halls: directory.halls.len(),
            });
        }

        let mut load = TeacherLoad::seed(assignments);
        let mut bookings = HallBookings::seed(assignments);
        let mut assigned: HashSet<ExamId> = assignments.iter().map(|a| a.exam_id.clone()).collect();

        // 目录中重复出现的考试ID 只取第一次
        let mut unassigned: Vec<&Exam> = Vec::new();
        for exam in &directory.exams {
            if assigned.insert(exam.id.clone()) {
                unassigned.push(exam);
            }
        }

        let mut updated = assignments.to_vec();
        let mut created = Vec::with_capacity(unassigned.len());
        let mut teachers_used = HashSet::new();
        let mut round_robin_fallbacks = 0;

        for (index, exam) in unassigned.into_iter().enumerate() {
            let (Some(teacher), Some(choice)) = (
                self.policy.pick_teacher(&directory.teachers, &load),
                self.policy.pick_hall(&directory.halls, exam, &bookings, index),
            ) else {
                // 非空校验已保证不会发生
                break;
            };

            if let HallChoice::RoundRobin(hall) = choice {
                round_robin_fallbacks += 1;
                tracing::debug!(
                    exam_id = %exam.id,
                    hall_id = hall.id,
                    "无冲突考场不可用，按轮转回退"
                );
            }
            let hall = choice.hall();

            let assignment = Assignment::from_records(
                next_assignment_id(&updated),
                exam,
                hall,
                teacher,
                AssignmentStatus::AutoAssigned,
            );

            load.increment(teacher.id);
            bookings.book(hall.id, exam.date, exam.time_bucket());
            teachers_used.insert(teacher.id);

            updated.push(assignment.clone());
            created.push(assignment);
        }

        let summary = AutoAssignSummary {
            exams_assigned: created.len(),
            teachers_used: teachers_used.len(),
            halls_available: directory.halls.len(),
            round_robin_fallbacks,
        };
        tracing::info!(
            exams_assigned = summary.exams_assigned,
            teachers_used = summary.teachers_used,
            round_robin_fallbacks = summary.round_robin_fallbacks,
            "自动分配完成"
        );

        Ok(AutoAssignOutcome {
            assignments: updated,
            created,
            summary,
        })
    }

    /// 两名教师互换全部分配
    ///
    /// A 的分配全部转给 B，B 的分配全部转给 A；
    /// 被触及的分配状态置为 Swapped，考场/考试/时间不变。
    /// 双方都没有分配时原样返回。
    ///
    /// # 错误
    /// - SameTeacher: 两个ID 相同
    /// - NotFound: 需要接收分配的教师在目录与现有分配中均无法解析姓名
    #[instrument(skip(self, assignments, directory))]
    pub fn swap(
        &self,
        teacher_a: i64,
        teacher_b: i64,
        assignments: &[Assignment],
        directory: &DirectorySnapshot,
    ) -> AllocationResult<Vec<Assignment>> {
        if teacher_a == teacher_b {
            return Err(AllocationError::SameTeacher { teacher_id: teacher_a });
        }

        let a_holds = assignments.iter().any(|a| a.teacher_id == teacher_a);
        let b_holds = assignments.iter().any(|a| a.teacher_id == teacher_b);
        if !a_holds && !b_holds {
            return Ok(assignments.to_vec());
        }

        // 仅解析实际会接收分配的一方
        let name_a = if b_holds {
            Some(resolve_holder_name(teacher_a, assignments, directory)?)
        } else {
            None
        };
        let name_b = if a_holds {
            Some(resolve_holder_name(teacher_b, assignments, directory)?)
        } else {
            None
        };

        let mut updated = assignments.to_vec();
        for assignment in updated.iter_mut() {
            let (new_id, new_name) = if assignment.teacher_id == teacher_a {
                (teacher_b, &name_b)
            } else if assignment.teacher_id == teacher_b {
                (teacher_a, &name_a)
            } else {
                continue;
            };

            if let Some(name) = new_name {
                assignment.teacher_id = new_id;
                assignment.teacher_name = name.clone();
                assignment.status = AssignmentStatus::Swapped;
            }
        }

        Ok(updated)
    }
}

/// 互换时新持有人的姓名: 目录优先，否则沿用其现有分配上的快照
fn resolve_holder_name(
    teacher_id: i64,
    assignments: &[Assignment],
    directory: &DirectorySnapshot,
) -> AllocationResult<String> {
    if let Some(teacher) = directory.find_teacher(teacher_id) {
        return Ok(teacher.resolved_name());
    }
    assignments
        .iter()
        .find(|a| a.teacher_id == teacher_id)
        .map(|a| a.teacher_name.clone())
        .ok_or_else(|| AllocationError::not_found("Teacher", teacher_id))
}

/// 生成在集合内唯一的分配ID
fn next_assignment_id(existing: &[Assignment]) -> String {
    loop {
        let id = uuid::Uuid::new_v4().to_string();
        if !existing.iter().any(|a| a.id == id) {
            return id;
        }
    }
}
