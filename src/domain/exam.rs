// ==========================================
// 考试监考排班系统 - 考试领域模型
// ==========================================
// 考试ID 在上游可能是字符串或整数，统一收敛为 ExamId
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 未设置开考时间时的冲突分桶名
pub const UNSET_TIME_BUCKET: &str = "unset";

// ==========================================
// ExamId - 考试标识
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExamId(String);

impl ExamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExamId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExamId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for ExamId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ExamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ExamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawExamId {
            Int(i64),
            Str(String),
        }

        Ok(match RawExamId::deserialize(deserializer)? {
            RawExamId::Int(v) => ExamId::from(v),
            RawExamId::Str(v) => ExamId::from(v),
        })
    }
}

// ==========================================
// Exam - 考试
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: Option<String>, // 开考时间 (如 "09:00")，可缺失
}

impl Exam {
    pub fn new(id: impl Into<ExamId>, title: &str, date: NaiveDate, start_time: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.to_string(),
            date,
            start_time: start_time.map(str::to_string),
        }
    }

    /// 冲突判定使用的时间分桶
    pub fn time_bucket(&self) -> String {
        time_bucket(self.start_time.as_deref())
    }
}

/// 开考时间分桶: 缺失或空白统一归入 "unset"
pub fn time_bucket(start_time: Option<&str>) -> String {
    match start_time.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => UNSET_TIME_BUCKET.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exam_id_accepts_integer_and_string() {
        let from_int: ExamId = serde_json::from_str("42").unwrap();
        let from_str: ExamId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(serde_json::to_string(&from_int).unwrap(), "\"42\"");
    }

    #[test]
    fn test_exam_serializes_camel_case() {
        let exam = Exam::new("E1", "Math", NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), Some("09:00"));
        let value = serde_json::to_value(&exam).unwrap();
        assert_eq!(value["startTime"], "09:00");
        assert!(value.get("start_time").is_none());

        let back: Exam = serde_json::from_value(value).unwrap();
        assert_eq!(back, exam);
    }

    #[test]
    fn test_time_bucket() {
        assert_eq!(time_bucket(Some("09:00")), "09:00");
        assert_eq!(time_bucket(Some("  ")), UNSET_TIME_BUCKET);
        assert_eq!(time_bucket(None), UNSET_TIME_BUCKET);
    }
}
