// ==========================================
// 考试监考排班系统 - 配置读取 Trait
// ==========================================
// 职责: 定义 API/应用层所需的配置读取接口（不包含实现）
// 约束: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::error::Error;

// ==========================================
// SettingsReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
pub trait SettingsReader: Send + Sync {
    /// 分配集合的存储键
    ///
    /// # 默认值
    /// - "examAssignments"
    fn get_assignment_store_key(&self) -> Result<String, Box<dyn Error>>;

    /// 教师门户显示的近期监考条数
    ///
    /// # 默认值
    /// - 5
    fn get_upcoming_limit(&self) -> Result<usize, Box<dyn Error>>;

    /// 消息语言（"en" 或 "zh-CN"）
    ///
    /// # 默认值
    /// - "en"
    fn get_locale(&self) -> Result<String, Box<dyn Error>>;
}
