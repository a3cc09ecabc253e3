// ==========================================
// 考试监考排班系统 - 消息本地化
// ==========================================
// 消息文件: locales/en.yml（默认）, locales/zh-CN.yml
// 消息域:
// - error.*      ApiError::localized_message 渲染的用户提示
// - assignment.* 自动分配报告 (AutoAssignReport.message)
// 当前语言由 AppState 启动时按配置 app.locale 设置
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言（"en" 或 "zh-CN"，见 config::SUPPORTED_LOCALES）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use invigilation_duty::i18n::t;
/// let msg = t("assignment.auto_assign_nothing");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息并替换 `%{name}` 占位符
///
/// 未出现在消息中的参数被忽略
///
/// # 示例
/// ```no_run
/// use invigilation_duty::i18n::t_with_args;
/// let msg = t_with_args("error.same_teacher", &[("teacher_id", "7")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |message, (name, value)| {
        message.replace(&format!("%{{{}}}", name), value)
    })
}

// rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
// 涉及 locale 的单元测试（包括 api::error）共用此锁串行化。
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
