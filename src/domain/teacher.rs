// ==========================================
// 考试监考排班系统 - 教师领域模型
// ==========================================
// 来源: 目录服务 (Directory)，对分配引擎只读
// ==========================================

use serde::{Deserialize, Serialize};

/// 教师姓名缺失时的占位名
pub const UNNAMED_TEACHER: &str = "Unnamed Teacher";

// ==========================================
// Teacher - 教师
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: i64,
    pub display_name: Option<String>, // 显示名
    pub login_name: Option<String>,   // 登录名
    pub subject: String,              // 任教科目
}

impl Teacher {
    pub fn new(id: i64, display_name: &str, subject: &str) -> Self {
        Self {
            id,
            display_name: Some(display_name.to_string()),
            login_name: None,
            subject: subject.to_string(),
        }
    }

    /// 设置登录名（构建器风格）
    pub fn with_login_name(mut self, login_name: &str) -> Self {
        self.login_name = Some(login_name.to_string());
        self
    }

    /// 分配记录中使用的教师姓名
    pub fn resolved_name(&self) -> String {
        resolve_teacher_name(self.display_name.as_deref(), self.login_name.as_deref())
    }
}

/// 教师姓名回退链
///
/// 顺序: 显示名 -> 登录名 -> "Unnamed Teacher"
/// 空白字符串视为缺失
pub fn resolve_teacher_name(display_name: Option<&str>, login_name: Option<&str>) -> String {
    [display_name, login_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|name| !name.is_empty())
        .unwrap_or(UNNAMED_TEACHER)
        .to_string()
}
