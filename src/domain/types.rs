// ==========================================
// 考试监考排班系统 - 领域类型定义
// ==========================================
// 序列化格式与浏览器端存储保持一致（"Auto-Assigned" 等）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 分配状态 (Assignment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentStatus {
    /// 人工创建
    Assigned,
    /// 自动分配生成
    #[serde(rename = "Auto-Assigned")]
    AutoAssigned,
    /// 经过互换
    Swapped,
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentStatus::Assigned => write!(f, "Assigned"),
            AssignmentStatus::AutoAssigned => write!(f, "Auto-Assigned"),
            AssignmentStatus::Swapped => write!(f, "Swapped"),
        }
    }
}

// ==========================================
// 职责类型 (Duty Type)
// ==========================================
// 当前只有监考一种职责
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DutyType {
    #[default]
    Invigilator,
}

impl fmt::Display for DutyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DutyType::Invigilator => write!(f, "Invigilator"),
        }
    }
}

// ==========================================
// 变更申请类型 (Change Request Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    HallChange, // 更换考场
    Swap,       // 与他人互换
    Leave,      // 请假
    Other,      // 其他
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestType::HallChange => write!(f, "HALL_CHANGE"),
            RequestType::Swap => write!(f, "SWAP"),
            RequestType::Leave => write!(f, "LEAVE"),
            RequestType::Other => write!(f, "OTHER"),
        }
    }
}

impl FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HALL_CHANGE" => Ok(RequestType::HallChange),
            "SWAP" => Ok(RequestType::Swap),
            "LEAVE" => Ok(RequestType::Leave),
            "OTHER" => Ok(RequestType::Other),
            other => Err(format!("未知的申请类型: {}", other)),
        }
    }
}

// ==========================================
// 变更申请状态 (Change Request Status)
// ==========================================
// 状态流转: PENDING -> APPROVED | REJECTED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl ChangeRequestStatus {
    /// 是否为终态
    pub fn is_final(&self) -> bool {
        !matches!(self, ChangeRequestStatus::Pending)
    }
}

impl fmt::Display for ChangeRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeRequestStatus::Pending => write!(f, "PENDING"),
            ChangeRequestStatus::Approved => write!(f, "APPROVED"),
            ChangeRequestStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl FromStr for ChangeRequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(ChangeRequestStatus::Pending),
            "APPROVED" => Ok(ChangeRequestStatus::Approved),
            "REJECTED" => Ok(ChangeRequestStatus::Rejected),
            other => Err(format!("未知的申请状态: {}", other)),
        }
    }
}
