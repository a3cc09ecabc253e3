// ==========================================
// 考试监考排班系统 - 监考分配领域模型
// ==========================================
// 分配是唯一可变实体
// 考试/考场/教师字段为创建时快照，不随源记录变化
// 序列化字段名: camelCase (与浏览器端存储一致)
// ==========================================

use crate::domain::exam::{time_bucket, Exam, ExamId};
use crate::domain::hall::Hall;
use crate::domain::teacher::Teacher;
use crate::domain::types::{AssignmentStatus, DutyType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Assignment - 监考分配
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,

    // ===== 考试快照 =====
    pub exam_id: ExamId,
    pub exam_title: String,
    pub exam_date: NaiveDate,
    pub exam_time: Option<String>,

    // ===== 考场快照 =====
    pub hall_id: i64,
    pub hall_name: String,

    // ===== 教师快照 =====
    pub teacher_id: i64,
    pub teacher_name: String,

    #[serde(default)]
    pub duty_type: DutyType,
    pub status: AssignmentStatus,
}

impl Assignment {
    /// 从考试/考场/教师记录生成快照
    pub fn from_records(
        id: String,
        exam: &Exam,
        hall: &Hall,
        teacher: &Teacher,
        status: AssignmentStatus,
    ) -> Self {
        Self {
            id,
            exam_id: exam.id.clone(),
            exam_title: exam.title.clone(),
            exam_date: exam.date,
            exam_time: exam.start_time.clone(),
            hall_id: hall.id,
            hall_name: hall.label.clone(),
            teacher_id: teacher.id,
            teacher_name: teacher.resolved_name(),
            duty_type: DutyType::Invigilator,
            status,
        }
    }

    /// 覆盖考场快照
    pub fn apply_hall(&mut self, hall: &Hall) {
        self.hall_id = hall.id;
        self.hall_name = hall.label.clone();
    }

    /// 覆盖教师快照
    pub fn apply_teacher(&mut self, teacher: &Teacher) {
        self.teacher_id = teacher.id;
        self.teacher_name = teacher.resolved_name();
    }

    /// 用考试记录刷新考试快照（考试ID 不变）
    pub fn refresh_exam(&mut self, exam: &Exam) {
        self.exam_title = exam.title.clone();
        self.exam_date = exam.date;
        self.exam_time = exam.start_time.clone();
    }

    /// 考场占用键: (考场, 日期, 时间分桶)
    pub fn booking_key(&self) -> (i64, NaiveDate, String) {
        (
            self.hall_id,
            self.exam_date,
            time_bucket(self.exam_time.as_deref()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_browser_field_names() {
        let exam = Exam::new(
            "E1",
            "Mathematics",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            Some("09:00"),
        );
        let hall = Hall::new(1, "Hall A", 100);
        let teacher = Teacher::new(7, "Alice", "Math");
        let assignment =
            Assignment::from_records("A1".to_string(), &exam, &hall, &teacher, AssignmentStatus::AutoAssigned);

        let value = serde_json::to_value(&assignment).unwrap();
        assert_eq!(value["examId"], "E1");
        assert_eq!(value["examDate"], "2024-05-01");
        assert_eq!(value["hallName"], "Hall A");
        assert_eq!(value["teacherName"], "Alice");
        assert_eq!(value["dutyType"], "Invigilator");
        assert_eq!(value["status"], "Auto-Assigned");
    }

    #[test]
    fn test_booking_key_uses_unset_bucket() {
        let exam = Exam::new("E2", "Physics", NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), None);
        let assignment = Assignment::from_records(
            "A2".to_string(),
            &exam,
            &Hall::new(3, "Hall C", 40),
            &Teacher::new(1, "Bob", "Physics"),
            AssignmentStatus::Assigned,
        );
        let (hall_id, date, bucket) = assignment.booking_key();
        assert_eq!(hall_id, 3);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        assert_eq!(bucket, "unset");
    }
}
