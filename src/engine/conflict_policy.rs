// ==========================================
// 考试监考排班系统 - 冲突策略
// ==========================================
// 仅供自动分配使用的两类决策:
// 1) 考场适配: 同考场 + 同日期 + 同时间分桶 视为冲突
//    未设置时间的考试共享 "unset" 分桶
//    同考场同日期不同明确时间 不冲突
// 2) 平局规则: 负载相同取目录顺序靠前的教师
//             容量相同取目录顺序靠前的考场
// ==========================================

use crate::domain::assignment::Assignment;
use crate::domain::exam::Exam;
use crate::domain::hall::Hall;
use crate::domain::teacher::Teacher;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

// ==========================================
// TeacherLoad - 教师负载计数
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct TeacherLoad {
    counts: HashMap<i64, usize>,
}

impl TeacherLoad {
    /// 以现有分配数量为初值
    pub fn seed(assignments: &[Assignment]) -> Self {
        let mut counts = HashMap::new();
        for assignment in assignments {
            *counts.entry(assignment.teacher_id).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, teacher_id: i64) -> usize {
        self.counts.get(&teacher_id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, teacher_id: i64) {
        *self.counts.entry(teacher_id).or_insert(0) += 1;
    }
}

// ==========================================
// HallBookings - 考场占用表
// ==========================================
// (考场, 日期) -> 已占用的时间分桶集合
#[derive(Debug, Clone, Default)]
pub struct HallBookings {
    booked: HashMap<(i64, NaiveDate), HashSet<String>>,
}

impl HallBookings {
    /// 以现有分配为初值
    pub fn seed(assignments: &[Assignment]) -> Self {
        let mut bookings = Self::default();
        for assignment in assignments {
            let (hall_id, date, bucket) = assignment.booking_key();
            bookings.book(hall_id, date, bucket);
        }
        bookings
    }

    pub fn book(&mut self, hall_id: i64, date: NaiveDate, bucket: String) {
        self.booked.entry((hall_id, date)).or_default().insert(bucket);
    }

    pub fn is_booked(&self, hall_id: i64, date: NaiveDate, bucket: &str) -> bool {
        self.booked
            .get(&(hall_id, date))
            .map(|buckets| buckets.contains(bucket))
            .unwrap_or(false)
    }
}

/// 考场选择结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HallChoice<'a> {
    /// 无冲突考场中容量最大者
    ConflictFree(&'a Hall),
    /// 无可用考场时按序号轮转
    RoundRobin(&'a Hall),
}

impl<'a> HallChoice<'a> {
    pub fn hall(&self) -> &'a Hall {
        match self {
            HallChoice::ConflictFree(hall) | HallChoice::RoundRobin(hall) => hall,
        }
    }
}

// ==========================================
// ConflictPolicy - 冲突策略
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictPolicy;

impl ConflictPolicy {
    pub fn new() -> Self {
        Self
    }

    /// 考场是否可用于该考试
    pub fn is_hall_suitable(&self, bookings: &HallBookings, hall: &Hall, exam: &Exam) -> bool {
        !bookings.is_booked(hall.id, exam.date, &exam.time_bucket())
    }

    /// 选择当前负载最小的教师
    ///
    /// 只有严格更小才替换，保证平局取目录顺序第一位
    pub fn pick_teacher<'a>(&self, teachers: &'a [Teacher], load: &TeacherLoad) -> Option<&'a Teacher> {
        let mut best: Option<(&'a Teacher, usize)> = None;
        for teacher in teachers {
            let current = load.get(teacher.id);
            match best {
                Some((_, best_load)) if current >= best_load => {}
                _ => best = Some((teacher, current)),
            }
        }
        best.map(|(teacher, _)| teacher)
    }

    /// 选择考场
    ///
    /// # 参数
    /// - `exam_index`: 考试在本轮未分配列表中的序号（轮转回退使用）
    ///
    /// # 返回
    /// - None: 考场列表为空
    pub fn pick_hall<'a>(
        &self,
        halls: &'a [Hall],
        exam: &Exam,
        bookings: &HallBookings,
        exam_index: usize,
    ) -> Option<HallChoice<'a>> {
        if halls.is_empty() {
            return None;
        }

        let mut best: Option<&'a Hall> = None;
        for hall in halls.iter().filter(|h| self.is_hall_suitable(bookings, h, exam)) {
            match best {
                Some(current) if hall.capacity <= current.capacity => {}
                _ => best = Some(hall),
            }
        }

        Some(match best {
            Some(hall) => HallChoice::ConflictFree(hall),
            None => HallChoice::RoundRobin(&halls[exam_index % halls.len()]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_pick_teacher_breaks_ties_by_listing_order() {
        let policy = ConflictPolicy::new();
        let teachers = vec![
            Teacher::new(1, "T1", "Math"),
            Teacher::new(2, "T2", "Math"),
            Teacher::new(3, "T3", "Math"),
        ];
        let mut load = TeacherLoad::default();
        assert_eq!(policy.pick_teacher(&teachers, &load).unwrap().id, 1);

        load.increment(1);
        assert_eq!(policy.pick_teacher(&teachers, &load).unwrap().id, 2);

        load.increment(2);
        load.increment(3);
        assert_eq!(policy.pick_teacher(&teachers, &load).unwrap().id, 1);
    }

    #[test]
    fn test_pick_teacher_empty() {
        let policy = ConflictPolicy::new();
        assert!(policy.pick_teacher(&[], &TeacherLoad::default()).is_none());
    }

    #[test]
    fn test_pick_hall_prefers_largest_capacity_then_listing_order() {
        let policy = ConflictPolicy::new();
        let halls = vec![
            Hall::new(1, "Small", 30),
            Hall::new(2, "Big A", 120),
            Hall::new(3, "Big B", 120),
        ];
        let exam = Exam::new("E1", "Math", date(1), Some("09:00"));
        let choice = policy.pick_hall(&halls, &exam, &HallBookings::default(), 0).unwrap();
        assert_eq!(choice, HallChoice::ConflictFree(&halls[1]));
    }

    #[test]
    fn test_same_hall_different_time_is_allowed() {
        let policy = ConflictPolicy::new();
        let hall = Hall::new(1, "Hall A", 100);
        let mut bookings = HallBookings::default();
        bookings.book(1, date(1), "09:00".to_string());

        let morning = Exam::new("E1", "Math", date(1), Some("09:00"));
        let afternoon = Exam::new("E2", "Art", date(1), Some("14:00"));
        let next_day = Exam::new("E3", "Music", date(2), Some("09:00"));
        assert!(!policy.is_hall_suitable(&bookings, &hall, &morning));
        assert!(policy.is_hall_suitable(&bookings, &hall, &afternoon));
        assert!(policy.is_hall_suitable(&bookings, &hall, &next_day));
    }

    #[test]
    fn test_unset_times_conflict_with_each_other() {
        let policy = ConflictPolicy::new();
        let hall = Hall::new(1, "Hall A", 100);
        let mut bookings = HallBookings::default();
        bookings.book(1, date(1), "unset".to_string());

        let untimed = Exam::new("E1", "Math", date(1), None);
        let timed = Exam::new("E2", "Art", date(1), Some("09:00"));
        assert!(!policy.is_hall_suitable(&bookings, &hall, &untimed));
        assert!(policy.is_hall_suitable(&bookings, &hall, &timed));
    }

    #[test]
    fn test_round_robin_when_every_hall_is_booked() {
        let policy = ConflictPolicy::new();
        let halls = vec![Hall::new(1, "A", 10), Hall::new(2, "B", 20)];
        let mut bookings = HallBookings::default();
        bookings.book(1, date(1), "09:00".to_string());
        bookings.book(2, date(1), "09:00".to_string());
        let exam = Exam::new("E9", "Math", date(1), Some("09:00"));

        assert_eq!(
            policy.pick_hall(&halls, &exam, &bookings, 3),
            Some(HallChoice::RoundRobin(&halls[1]))
        );
        assert_eq!(
            policy.pick_hall(&halls, &exam, &bookings, 4),
            Some(HallChoice::RoundRobin(&halls[0]))
        );
        assert!(policy.pick_hall(&[], &exam, &bookings, 0).is_none());
    }
}
