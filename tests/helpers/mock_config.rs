// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use invigilation_duty::config::SettingsReader;
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub assignment_store_key: String,
    pub upcoming_limit: usize,
    pub locale: String,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            assignment_store_key: "examAssignments".to_string(),
            upcoming_limit: 5,
            locale: "en".to_string(),
        }
    }

    /// 自定义近期监考条数
    pub fn with_upcoming_limit(limit: usize) -> Self {
        let mut config = Self::default();
        config.upcoming_limit = limit;
        config
    }
}

impl SettingsReader for MockConfig {
    fn get_assignment_store_key(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.assignment_store_key.clone())
    }

    fn get_upcoming_limit(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.upcoming_limit)
    }

    fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        Ok(self.locale.clone())
    }
}
