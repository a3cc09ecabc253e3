// ==========================================
// 考试监考排班系统 - 命令行入口
// ==========================================
// 用法:
//   invigilation-duty <csv_dir> [auto-assign|stats|list|unassigned] [db_path]
//
// csv_dir 下需要 teachers.csv / halls.csv / exams.csv
// db_path 缺省时使用 get_default_db_path()
// halls.csv 不可读时使用默认考场 Hall A/B/C
// ==========================================

use std::error::Error;
use std::sync::Arc;

use invigilation_duty::app::{get_default_db_path, AppState};
use invigilation_duty::repository::{CsvDirectory, FallbackHallsDirectory};

const USAGE: &str = "用法: invigilation-duty <csv_dir> [auto-assign|stats|list|unassigned] [db_path]";

fn main() -> Result<(), Box<dyn Error>> {
    invigilation_duty::logging::init();

    let mut args = std::env::args().skip(1);
    let csv_dir = args.next().ok_or(USAGE)?;
    let command = args.next().unwrap_or_else(|| "stats".to_string());
    let db_path = args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);

    tracing::info!("{} v{}", invigilation_duty::APP_NAME, invigilation_duty::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let directory = Arc::new(FallbackHallsDirectory::new(CsvDirectory::new(&csv_dir)));
    let state = AppState::new(db_path, directory)?;
    let api = &state.assignment_api;

    match command.as_str() {
        "auto-assign" => {
            let report = api.auto_assign().map_err(|e| e.localized_message())?;
            println!("{}", report.message);
            for assignment in &report.created {
                println!(
                    "{}\t{}\t{}\t{}",
                    assignment.exam_id, assignment.exam_date, assignment.hall_name, assignment.teacher_name
                );
            }
        }
        "stats" => {
            let stats = api.stats_summary().map_err(|e| e.localized_message())?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        "list" => {
            let assignments = api.list_assignments().map_err(|e| e.localized_message())?;
            println!("{}", serde_json::to_string_pretty(&assignments)?);
        }
        "unassigned" => {
            for exam in api.unassigned_exams().map_err(|e| e.localized_message())? {
                println!("{}\t{}\t{}", exam.id, exam.date, exam.title);
            }
        }
        other => {
            return Err(format!("未知命令: {}\n{}", other, USAGE).into());
        }
    }

    Ok(())
}
