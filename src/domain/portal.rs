// ==========================================
// 考试监考排班系统 - 教师自助门户领域模型
// ==========================================
// 包含: 可用日期登记、变更申请
// ==========================================

use crate::domain::exam::ExamId;
use crate::domain::types::{ChangeRequestStatus, RequestType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// AvailabilityEntry - 可用日期登记
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub teacher_id: i64,
    pub date: NaiveDate,
    pub is_available: bool,
}

// ==========================================
// ChangeRequest - 变更申请
// ==========================================
// 申请针对教师本人的一条分配，由管理员审核
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub request_id: String,
    pub assignment_id: String,
    pub exam_id: ExamId,
    pub exam_title: String,
    pub current_hall: String,
    pub requested_hall: Option<String>,
    pub reason: String,
    pub request_type: RequestType,
    pub status: ChangeRequestStatus,
    pub submitted_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
    pub teacher_id: i64,
    pub teacher_name: String,
}
