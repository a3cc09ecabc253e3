// ==========================================
// 考试监考排班系统 - 考场领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Hall - 考场
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hall {
    pub id: i64,
    pub label: String, // 考场名称 (如 "Hall A")
    pub capacity: u32, // 座位数 (正整数)
}

impl Hall {
    pub fn new(id: i64, label: &str, capacity: u32) -> Self {
        Self {
            id,
            label: label.to_string(),
            capacity,
        }
    }
}
