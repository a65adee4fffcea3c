// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）和中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 已提供的语言
pub const AVAILABLE_LOCALES: [&str; 2] = ["en", "zh-CN"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）; 未提供的语言记录警告后忽略
pub fn set_locale(locale: &str) {
    if AVAILABLE_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        tracing::warn!(locale, available = ?AVAILABLE_LOCALES, "不支持的语言，保持当前设置");
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use modular_configurator::i18n::t;
/// let msg = t("hint.relax_primary");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use modular_configurator::i18n::t_with_args;
/// let msg = t_with_args("rule.soft.passed", &[("rule", "sr1")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
