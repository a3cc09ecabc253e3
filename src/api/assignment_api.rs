// ==========================================
// 考试监考排班系统 - 分配 API
// ==========================================
// 职责: 持有会话内的分配集合，串联 目录快照 → 引擎 → 存储
// 约束: 引擎或存储失败时会话集合保持不变
// 约束: 变更串行执行（持有集合锁直到写回完成）
// ==========================================

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::assignment::Assignment;
use crate::domain::directory::DirectorySnapshot;
use crate::domain::exam::{Exam, ExamId};
use crate::engine::allocation::{AllocationEngine, AutoAssignSummary};
use crate::engine::query_view::{self, QueryView, StatsSummary};
use crate::i18n::{t, t_with_args};
use crate::repository::assignment_store::AssignmentStore;
use crate::repository::directory_repo::Directory;

// ==========================================
// AutoAssignReport - 自动分配报告
// ==========================================
/// 用于界面展示的自动分配结果
#[derive(Debug, Clone, Serialize)]
pub struct AutoAssignReport {
    pub created: Vec<Assignment>,
    pub summary: AutoAssignSummary,
    /// 按当前 locale 渲染的提示
    pub message: String,
}

// ==========================================
// AssignmentApi - 分配 API
// ==========================================

/// 分配API
///
/// 职责：
/// 1. 人工创建/编辑/删除分配
/// 2. 自动分配与教师互换
/// 3. 每次变更后整体写回 AssignmentStore
/// 4. 基于当前集合的只读统计
pub struct AssignmentApi {
    store: Arc<dyn AssignmentStore>,
    directory: Arc<dyn Directory>,
    engine: AllocationEngine,
    assignments: Mutex<Vec<Assignment>>,
}

impl AssignmentApi {
    /// 创建新的AssignmentApi实例（从存储加载一次分配集合）
    ///
    /// # 参数
    /// - store: 分配集合存储
    /// - directory: 教师/考场/考试目录
    pub fn new(store: Arc<dyn AssignmentStore>, directory: Arc<dyn Directory>) -> ApiResult<Self> {
        Self::with_engine(store, directory, AllocationEngine::new())
    }

    pub fn with_engine(
        store: Arc<dyn AssignmentStore>,
        directory: Arc<dyn Directory>,
        engine: AllocationEngine,
    ) -> ApiResult<Self> {
        let loaded = store
            .load()
            .map_err(|e| ApiError::StoreError(e.to_string()))?;
        info!(count = loaded.len(), "分配集合已加载");

        Ok(Self {
            store,
            directory,
            engine,
            assignments: Mutex::new(loaded),
        })
    }

    fn lock(&self) -> ApiResult<MutexGuard<'_, Vec<Assignment>>> {
        self.assignments
            .lock()
            .map_err(|e| ApiError::InternalError(format!("分配集合锁获取失败: {}", e)))
    }

    fn snapshot(&self) -> ApiResult<DirectorySnapshot> {
        Ok(self.directory.snapshot()?)
    }

    /// 写回存储成功后才替换会话集合
    fn commit(&self, session: &mut Vec<Assignment>, updated: Vec<Assignment>) -> ApiResult<()> {
        if let Err(e) = self.store.save(&updated) {
            error!(error = %e, "分配集合写回失败，会话集合保持不变");
            return Err(ApiError::StoreError(e.to_string()));
        }
        *session = updated;
        Ok(())
    }

    // ==========================================
    // 变更接口
    // ==========================================

    /// 人工创建分配
    ///
    /// # 返回
    /// - Ok(Assignment): 新分配（状态 Assigned）
    /// - Err(ApiError): NotFound / AlreadyAssigned / StoreError
    pub fn create_assignment(&self, exam_id: &str, hall_id: i64, teacher_id: i64) -> ApiResult<Assignment> {
        if exam_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("考试ID不能为空".to_string()));
        }

        let directory = self.snapshot()?;
        let mut session = self.lock()?;
        let (updated, created) = self
            .engine
            .create(&ExamId::new(exam_id.trim()), hall_id, teacher_id, &session, &directory)
            .map_err(|e| {
                warn!(exam_id, hall_id, teacher_id, error = %e, "创建分配失败");
                ApiError::from(e)
            })?;
        self.commit(&mut session, updated)?;

        info!(
            assignment_id = %created.id,
            exam_id = %created.exam_id,
            hall_id,
            teacher_id,
            "分配已创建"
        );
        Ok(created)
    }

    /// 编辑分配的考场与教师
    pub fn update_assignment(&self, assignment_id: &str, hall_id: i64, teacher_id: i64) -> ApiResult<Assignment> {
        if assignment_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("分配ID不能为空".to_string()));
        }

        let directory = self.snapshot()?;
        let mut session = self.lock()?;
        let (updated, edited) = self
            .engine
            .update(assignment_id, hall_id, teacher_id, &session, &directory)
            .map_err(|e| {
                warn!(assignment_id, hall_id, teacher_id, error = %e, "编辑分配失败");
                ApiError::from(e)
            })?;
        self.commit(&mut session, updated)?;

        info!(assignment_id, hall_id, teacher_id, "分配已更新");
        Ok(edited)
    }

    /// 删除分配
    pub fn remove_assignment(&self, assignment_id: &str) -> ApiResult<()> {
        if assignment_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("分配ID不能为空".to_string()));
        }

        let mut session = self.lock()?;
        let updated = self.engine.remove(assignment_id, &session).map_err(|e| {
            warn!(assignment_id, error = %e, "删除分配失败");
            ApiError::from(e)
        })?;
        self.commit(&mut session, updated)?;

        info!(assignment_id, "分配已删除");
        Ok(())
    }

    /// 自动分配全部未分配考试
    pub fn auto_assign(&self) -> ApiResult<AutoAssignReport> {
        let directory = self.snapshot()?;
        let mut session = self.lock()?;
        let outcome = self.engine.auto_assign(&session, &directory).map_err(|e| {
            warn!(error = %e, "自动分配失败");
            ApiError::from(e)
        })?;
        self.commit(&mut session, outcome.assignments)?;

        let message = if outcome.created.is_empty() {
            t("assignment.auto_assign_nothing")
        } else {
            let exams = outcome.summary.exams_assigned.to_string();
            let teachers = outcome.summary.teachers_used.to_string();
            let halls = outcome.summary.halls_available.to_string();
            t_with_args(
                "assignment.auto_assign_done",
                &[
                    ("exams", exams.as_str()),
                    ("teachers", teachers.as_str()),
                    ("halls", halls.as_str()),
                ],
            )
        };
        info!(
            exams_assigned = outcome.summary.exams_assigned,
            round_robin_fallbacks = outcome.summary.round_robin_fallbacks,
            "自动分配完成"
        );

        Ok(AutoAssignReport {
            created: outcome.created,
            summary: outcome.summary,
            message,
        })
    }

    /// 互换两名教师的全部分配
    pub fn swap_teachers(&self, teacher_a: i64, teacher_b: i64) -> ApiResult<Vec<Assignment>> {
        let directory = self.snapshot()?;
        let mut session = self.lock()?;
        let updated = self
            .engine
            .swap(teacher_a, teacher_b, &session, &directory)
            .map_err(|e| {
                warn!(teacher_a, teacher_b, error = %e, "教师互换失败");
                ApiError::from(e)
            })?;
        self.commit(&mut session, updated)?;

        info!(teacher_a, teacher_b, "教师已互换");
        Ok(session.clone())
    }

    /// 清空全部分配
    pub fn clear_all(&self) -> ApiResult<usize> {
        let mut session = self.lock()?;
        let cleared = session.len();
        self.commit(&mut session, Vec::new())?;

        info!(cleared, "已清空全部分配");
        Ok(cleared)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 当前分配集合（按集合顺序）
    pub fn list_assignments(&self) -> ApiResult<Vec<Assignment>> {
        Ok(self.lock()?.clone())
    }

    pub fn get_assignment(&self, assignment_id: &str) -> ApiResult<Assignment> {
        self.lock()?
            .iter()
            .find(|a| a.id == assignment_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                entity: "Assignment".to_string(),
                id: assignment_id.to_string(),
            })
    }

    pub fn unassigned_exams(&self) -> ApiResult<Vec<Exam>> {
        let directory = self.snapshot()?;
        let session = self.lock()?;
        let view = QueryView::new(&session, &directory);
        Ok(view.unassigned_exams().into_iter().cloned().collect())
    }

    pub fn stats_summary(&self) -> ApiResult<StatsSummary> {
        let directory = self.snapshot()?;
        let session = self.lock()?;
        let stats = QueryView::new(&session, &directory).stats_summary();
        debug!(?stats, "统计摘要");
        Ok(stats)
    }

    pub fn load_by_teacher(&self, teacher_id: i64) -> ApiResult<usize> {
        Ok(query_view::load_by_teacher(&self.lock()?, teacher_id))
    }

    pub fn bookings_by_hall(&self, hall_id: i64) -> ApiResult<usize> {
        Ok(query_view::bookings_by_hall(&self.lock()?, hall_id))
    }
}
