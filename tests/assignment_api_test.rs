// ==========================================
// AssignmentApi 集成测试
// ==========================================
// 测试范围:
// 1. 写回: 每次变更后整体保存，新会话可重新加载
// 2. 失败: 引擎或存储失败时会话集合不变
// 3. 查询: 未分配考试、统计、负载、考场占用
// ==========================================

mod helpers;

use std::sync::Arc;

use helpers::api_test_helper::{ApiTestEnv, FlakyStore};
use helpers::test_data_builder::{DirectoryBuilder, ExamBuilder};
use invigilation_duty::api::{ApiError, AssignmentApi};
use invigilation_duty::domain::AssignmentStatus;
use invigilation_duty::repository::{
    CsvDirectory, FallbackHallsDirectory, InMemoryAssignmentStore, InMemoryDirectory,
};
use tempfile::TempDir;
use test_helpers::{day, scenario_a_directory, staggered_exams, teachers, two_halls, write_csv};

// ==========================================
// 写回测试
// ==========================================

#[test]
fn test_mutations_are_persisted_for_next_session() {
    let env = ApiTestEnv::new(scenario_a_directory()).expect("无法创建测试环境");

    let created = env.assignment_api.create_assignment("E1", 1, 1).unwrap();
    let report = env.assignment_api.auto_assign().unwrap();
    assert_eq!(report.created.len(), 1);

    let persisted = env.reopen_store("examAssignments").unwrap();
    assert_eq!(persisted, env.assignment_api.list_assignments().unwrap());
    assert_eq!(persisted[0], created);

    env.assignment_api.remove_assignment(&created.id).unwrap();
    assert_eq!(env.reopen_store("examAssignments").unwrap().len(), 1);
}

#[test]
fn test_store_failure_leaves_session_untouched() {
    let store = Arc::new(FlakyStore::new());
    let api = AssignmentApi::new(store.clone(), Arc::new(scenario_a_directory())).unwrap();
    let created = api.create_assignment("E1", 1, 1).unwrap();

    store.set_failing(true);
    let err = api.update_assignment(&created.id, 2, 2).unwrap_err();
    assert!(matches!(err, ApiError::StoreError(_)));
    assert!(matches!(api.auto_assign(), Err(ApiError::StoreError(_))));
    assert!(matches!(api.swap_teachers(1, 2), Err(ApiError::StoreError(_))));
    assert!(matches!(api.clear_all(), Err(ApiError::StoreError(_))));

    assert_eq!(api.list_assignments().unwrap(), vec![created.clone()]);
    assert_eq!(store.saved(), vec![created]);

    store.set_failing(false);
    assert_eq!(api.auto_assign().unwrap().created.len(), 1);
    assert_eq!(store.saved().len(), 2);
}

#[test]
fn test_engine_failure_does_not_touch_store() {
    let store = Arc::new(FlakyStore::new());
    let api = AssignmentApi::new(store.clone(), Arc::new(scenario_a_directory())).unwrap();
    api.create_assignment("E1", 1, 1).unwrap();
    let attempts = store.save_attempts();

    assert!(matches!(api.create_assignment("E1", 2, 2), Err(ApiError::AlreadyAssigned { .. })));
    assert!(matches!(api.create_assignment("E9", 1, 1), Err(ApiError::NotFound { .. })));
    assert!(matches!(api.update_assignment("nope", 1, 1), Err(ApiError::NotFound { .. })));
    assert!(matches!(api.remove_assignment("nope"), Err(ApiError::NotFound { .. })));
    assert!(matches!(api.swap_teachers(2, 2), Err(ApiError::SameTeacher { teacher_id: 2 })));

    assert_eq!(store.save_attempts(), attempts);
    assert_eq!(api.list_assignments().unwrap().len(), 1);
}

#[test]
fn test_store_keys_isolate_sessions() {
    let env = ApiTestEnv::new(scenario_a_directory()).expect("无法创建测试环境");
    env.assignment_api.auto_assign().unwrap();

    assert_eq!(env.reopen_store("examAssignments").unwrap().len(), 2);
    assert!(env.reopen_store("otherSession").unwrap().is_empty());
}

// ==========================================
// 变更接口测试
// ==========================================

#[test]
fn test_update_replaces_hall_and_teacher_snapshots() {
    let env = ApiTestEnv::new(scenario_a_directory()).expect("无法创建测试环境");
    let created = env.assignment_api.create_assignment("E1", 1, 1).unwrap();

    let edited = env.assignment_api.update_assignment(&created.id, 2, 2).unwrap();
    assert_eq!(edited.id, created.id);
    assert_eq!(edited.hall_name, "HallB");
    assert_eq!(edited.teacher_name, "T2");
    assert_eq!(edited.status, AssignmentStatus::Assigned);
    assert_eq!(edited.exam_title, created.exam_title);
}

#[test]
fn test_auto_assign_report_message() {
    let env = ApiTestEnv::new(scenario_a_directory()).expect("无法创建测试环境");

    let report = env.assignment_api.auto_assign().unwrap();
    assert_eq!(report.summary.exams_assigned, 2);
    assert_eq!(report.summary.teachers_used, 2);
    assert!(report.message.contains('2'));

    let again = env.assignment_api.auto_assign().unwrap();
    assert!(again.created.is_empty());
    assert_eq!(again.summary.exams_assigned, 0);
}

#[test]
fn test_auto_assign_insufficient_resources() {
    let directory = InMemoryDirectory::new(Vec::new(), two_halls(), staggered_exams(2));
    let env = ApiTestEnv::new(directory).expect("无法创建测试环境");

    let err = env.assignment_api.auto_assign().unwrap_err();
    assert!(matches!(err, ApiError::InsufficientResources { teachers: 0, halls: 2 }));
    assert!(env.assignment_api.list_assignments().unwrap().is_empty());
}

#[test]
fn test_swap_teachers_returns_new_collection() {
    let env = ApiTestEnv::new(scenario_a_directory()).expect("无法创建测试环境");
    env.assignment_api.create_assignment("E1", 1, 1).unwrap();
    env.assignment_api.create_assignment("E2", 2, 1).unwrap();

    let swapped = env.assignment_api.swap_teachers(1, 2).unwrap();
    assert!(swapped.iter().all(|a| a.teacher_id == 2 && a.status == AssignmentStatus::Swapped));
    assert_eq!(env.assignment_api.load_by_teacher(2).unwrap(), 2);
    assert_eq!(env.assignment_api.load_by_teacher(1).unwrap(), 0);
}

// ==========================================
// 查询接口测试
// ==========================================

#[test]
fn test_query_projections() {
    let directory = DirectoryBuilder::new()
        .teacher(1, "Alice")
        .teacher(2, "Bob")
        .hall(10, "Main Hall", 200)
        .hall(20, "Annex", 40)
        .exam(ExamBuilder::new("E1").title("Math").at("09:00"))
        .exam(ExamBuilder::new("E2").title("Art").date(day(2)))
        .exam(ExamBuilder::new("E3").title("Music").date(day(3)))
        .build();
    let env = ApiTestEnv::new(directory).expect("无法创建测试环境");
    env.assignment_api.create_assignment("E2", 20, 2).unwrap();

    let unassigned: Vec<String> = env
        .assignment_api
        .unassigned_exams()
        .unwrap()
        .iter()
        .map(|e| e.id.to_string())
        .collect();
    assert_eq!(unassigned, vec!["E1", "E3"]);

    let stats = env.assignment_api.stats_summary().unwrap();
    assert_eq!(stats.total_exams, 3);
    assert_eq!(stats.assigned_exams, 1);
    assert_eq!(stats.unassigned_exams, 2);
    assert_eq!(stats.total_teachers, 2);
    assert_eq!(stats.total_halls, 2);

    assert_eq!(env.assignment_api.bookings_by_hall(20).unwrap(), 1);
    assert_eq!(env.assignment_api.bookings_by_hall(10).unwrap(), 0);
}

#[test]
fn test_directory_changes_are_seen_by_next_operation() {
    let env = ApiTestEnv::new(InMemoryDirectory::new(teachers(1), Vec::new(), staggered_exams(1)))
        .expect("无法创建测试环境");
    assert!(env.assignment_api.auto_assign().is_err());

    env.directory.set_halls(two_halls()).unwrap();
    let report = env.assignment_api.auto_assign().unwrap();
    assert_eq!(report.created[0].hall_name, "HallA");
}

#[test]
fn test_auto_assign_uses_default_halls_when_hall_file_missing() {
    let csv_dir = TempDir::new().unwrap();
    write_csv(
        csv_dir.path(),
        CsvDirectory::TEACHERS_FILE,
        "id,display_name,login_name,subject\n1,Alice,,Math\n2,Bob,,Physics\n",
    );
    write_csv(
        csv_dir.path(),
        CsvDirectory::EXAMS_FILE,
        "id,title,date,start_time\nE1,Math,2024-05-01,09:00\nE2,Physics,2024-05-01,09:00\n",
    );

    let directory = FallbackHallsDirectory::new(CsvDirectory::new(csv_dir.path()));
    let api = AssignmentApi::new(Arc::new(InMemoryAssignmentStore::new()), Arc::new(directory)).unwrap();
    let report = api.auto_assign().unwrap();

    assert_eq!(report.created.len(), 2);
    assert_eq!(report.summary.halls_available, 3);
    let halls: Vec<&str> = report.created.iter().map(|a| a.hall_name.as_str()).collect();
    assert!(halls.iter().all(|h| ["Hall A", "Hall B", "Hall C"].contains(h)));
    assert_ne!(halls[0], halls[1]);
}

#[test]
fn test_missing_hall_file_without_fallback_is_directory_error() {
    let csv_dir = TempDir::new().unwrap();
    write_csv(
        csv_dir.path(),
        CsvDirectory::TEACHERS_FILE,
        "id,display_name,login_name,subject\n1,Alice,,Math\n",
    );
    write_csv(
        csv_dir.path(),
        CsvDirectory::EXAMS_FILE,
        "id,title,date,start_time\nE1,Math,2024-05-01,09:00\n",
    );

    let api = AssignmentApi::new(
        Arc::new(InMemoryAssignmentStore::new()),
        Arc::new(CsvDirectory::new(csv_dir.path())),
    )
    .unwrap();
    assert!(matches!(api.auto_assign(), Err(ApiError::DirectoryError(_))));
}

#[test]
fn test_get_assignment_not_found() {
    let env = ApiTestEnv::new(scenario_a_directory()).expect("无法创建测试环境");
    let err = env.assignment_api.get_assignment("missing").unwrap_err();
    assert!(matches!(err, ApiError::NotFound { ref entity, .. } if entity == "Assignment"));
}
