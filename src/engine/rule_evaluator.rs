// ==========================================
// 模块化结构配置器 - 规则评估器
// ==========================================
// 职责: 结构校验 + 属性值域 + 三类规则 + 目录校验
// 输入: 原始配置输入
// 输出: 有序 ValidationResultItem 列表
// ==========================================

mod checks;
mod core;


pub use checks::{RuleChecks, SANITIZED_RULE_ID};
pub use self::core::{ValidateOptions, ValidationEngine};
