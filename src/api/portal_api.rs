// ==========================================
// 考试监考排班系统 - 教师门户 API
// ==========================================
// 职责: 教师本人视图、可用日期登记、变更申请与审核
// 约束: 审核申请不修改分配（由管理员通过分配 API 执行）
// ==========================================

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::assignment_api::AssignmentApi;
use crate::api::error::{ApiError, ApiResult};
use crate::config::SettingsReader;
use crate::domain::assignment::Assignment;
use crate::domain::portal::{AvailabilityEntry, ChangeRequest};
use crate::domain::types::{ChangeRequestStatus, RequestType};
use crate::engine::query_view;
use crate::repository::portal_repo::PortalRepository;

/// 提交变更申请的请求参数
#[derive(Debug, Clone)]
pub struct ChangeRequestDraft {
    pub assignment_id: String,
    pub requested_hall: Option<String>,
    pub reason: String,
    pub request_type: RequestType,
}

// ==========================================
// PortalApi - 教师门户 API
// ==========================================
pub struct PortalApi {
    assignment_api: Arc<AssignmentApi>,
    portal_repo: Arc<PortalRepository>,
    settings: Arc<dyn SettingsReader>,
}

impl PortalApi {
    pub fn new(
        assignment_api: Arc<AssignmentApi>,
        portal_repo: Arc<PortalRepository>,
        settings: Arc<dyn SettingsReader>,
    ) -> Self {
        Self {
            assignment_api,
            portal_repo,
            settings,
        }
    }

    // ==========================================
    // 教师本人视图
    // ==========================================

    // 只读取已存储的分配，不依赖目录

    pub fn my_assignments(&self, teacher_id: i64) -> ApiResult<Vec<Assignment>> {
        let assignments = self.assignment_api.list_assignments()?;
        Ok(query_view::assignments_for_teacher(&assignments, teacher_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// 即将到来的监考
    ///
    /// limit 为 None 时使用配置 portal.upcoming_limit
    pub fn upcoming_duties(
        &self,
        teacher_id: i64,
        today: NaiveDate,
        limit: Option<usize>,
    ) -> ApiResult<Vec<Assignment>> {
        let limit = match limit {
            Some(limit) => limit,
            None => self
                .settings
                .get_upcoming_limit()
                .map_err(|e| ApiError::InternalError(format!("读取配置失败: {}", e)))?,
        };

        let assignments = self.assignment_api.list_assignments()?;
        Ok(query_view::upcoming_for_teacher(&assignments, teacher_id, today, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn my_halls(&self, teacher_id: i64) -> ApiResult<Vec<String>> {
        let assignments = self.assignment_api.list_assignments()?;
        Ok(query_view::halls_for_teacher(&assignments, teacher_id))
    }

    pub fn duty_dates(&self, teacher_id: i64) -> ApiResult<BTreeSet<NaiveDate>> {
        let assignments = self.assignment_api.list_assignments()?;
        Ok(query_view::duty_dates_for_teacher(&assignments, teacher_id))
    }

    // ==========================================
    // 可用日期
    // ==========================================

    pub fn set_availability(&self, teacher_id: i64, date: NaiveDate, is_available: bool) -> ApiResult<()> {
        self.portal_repo.upsert_availability(&AvailabilityEntry {
            teacher_id,
            date,
            is_available,
        })?;
        info!(teacher_id, %date, is_available, "可用日期已登记");
        Ok(())
    }

    pub fn availability_for(&self, teacher_id: i64) -> ApiResult<Vec<AvailabilityEntry>> {
        Ok(self.portal_repo.list_availability(teacher_id)?)
    }

    // ==========================================
    // 变更申请
    // ==========================================

    /// 教师针对本人分配提交变更申请
    ///
    /// # 错误
    /// - NotFound: 分配不存在
    /// - InvalidInput: 分配不属于该教师 / 原因为空
    pub fn submit_change_request(&self, teacher_id: i64, draft: ChangeRequestDraft) -> ApiResult<ChangeRequest> {
        if draft.reason.trim().is_empty() {
            return Err(ApiError::InvalidInput("申请原因不能为空".to_string()));
        }

        let assignment = self.assignment_api.get_assignment(&draft.assignment_id)?;
        if assignment.teacher_id != teacher_id {
            warn!(
                teacher_id,
                assignment_id = %draft.assignment_id,
                owner = assignment.teacher_id,
                "拒绝为他人分配提交申请"
            );
            return Err(ApiError::InvalidInput(format!(
                "分配{}不属于教师{}",
                draft.assignment_id, teacher_id
            )));
        }

        let request = ChangeRequest {
            request_id: Uuid::new_v4().to_string(),
            assignment_id: assignment.id.clone(),
            exam_id: assignment.exam_id.clone(),
            exam_title: assignment.exam_title.clone(),
            current_hall: assignment.hall_name.clone(),
            requested_hall: draft
                .requested_hall
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty()),
            reason: draft.reason.trim().to_string(),
            request_type: draft.request_type,
            status: ChangeRequestStatus::Pending,
            submitted_at: Local::now().naive_local(),
            resolved_at: None,
            teacher_id,
            teacher_name: assignment.teacher_name.clone(),
        };
        self.portal_repo.insert_change_request(&request)?;

        info!(
            request_id = %request.request_id,
            assignment_id = %request.assignment_id,
            request_type = %request.request_type,
            "变更申请已提交"
        );
        Ok(request)
    }

    pub fn list_pending_requests(&self) -> ApiResult<Vec<ChangeRequest>> {
        Ok(self
            .portal_repo
            .list_change_requests_by_status(Some(ChangeRequestStatus::Pending))?)
    }

    pub fn requests_for_teacher(&self, teacher_id: i64) -> ApiResult<Vec<ChangeRequest>> {
        Ok(self.portal_repo.list_change_requests_by_teacher(teacher_id)?)
    }

    /// 审核变更申请（仅 PENDING 可流转到 APPROVED / REJECTED）
    pub fn resolve_change_request(
        &self,
        request_id: &str,
        decision: ChangeRequestStatus,
    ) -> ApiResult<ChangeRequest> {
        let mut request = self
            .portal_repo
            .find_change_request(request_id)?
            .ok_or_else(|| ApiError::NotFound {
                entity: "ChangeRequest".to_string(),
                id: request_id.to_string(),
            })?;

        if request.status.is_final() || !decision.is_final() {
            return Err(ApiError::InvalidStateTransition {
                from: request.status.to_string(),
                to: decision.to_string(),
            });
        }

        let resolved_at = Local::now().naive_local();
        self.portal_repo
            .update_change_request_status(request_id, decision, Some(resolved_at))?;
        request.status = decision;
        request.resolved_at = Some(resolved_at);

        info!(request_id, status = %decision, "变更申请已审核");
        Ok(request)
    }
}
