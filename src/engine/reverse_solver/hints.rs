// ==========================================
// 模块化结构配置器 - 放宽建议
// ==========================================
// 职责: 无精确匹配时, 依据全部已评估候选 (含被淘汰者) 上条件成立的规则生成建议
// 顺序: 硬约束建议 -> 自修正建议 -> 宽度步长建议 -> (均无时) 通用建议
// ==========================================

use crate::config::constraint_model::{ConditionValue, ConstraintModel, Rule, RuleKind};
use crate::domain::solution::{Candidate, RelaxationHint};
use crate::domain::types::{ConditionOperator, RuleClass};
use crate::i18n::{t, t_with_args};

use super::target::SolveTarget;

pub const RELAX_WIDTH_STEP: &str = "relax_width_step";
pub const RELAX_PRIMARY_DIMENSIONS: &str = "relax_primary_dimensions";

/// 生成放宽建议
pub fn relaxation_hints(
    model: &ConstraintModel,
    target: &SolveTarget,
    evaluated: &[Candidate],
) -> Vec<RelaxationHint> {
    let fired = |rule: &Rule| evaluated.iter().any(|c| c.fired(&rule.id));
    let mut hints: Vec<RelaxationHint> = Vec::new();
    let mut push = |hint: RelaxationHint| {
        if !hints.iter().any(|h| h.code == hint.code) {
            hints.push(hint);
        }
    };

    for rule in model.rules_of(RuleClass::Hard).filter(|&r| fired(r)) {
        if let Some(hint) = profile_hint(rule) {
            push(hint);
        }
    }

    for rule in model.rules_of(RuleClass::Auto).filter(|&r| fired(r)) {
        if let Some(hint) = raise_hint(rule) {
            push(hint);
        }
    }

    if target.dimensions.width.is_some() {
        if let Some(step) = model.attributes.width.step {
            let step_text = step.to_string();
            push(RelaxationHint {
                code: RELAX_WIDTH_STEP.to_string(),
                message: t_with_args(
                    "hint.relax_step",
                    &[("field", "width"), ("step", step_text.as_str())],
                ),
            });
        }
    }

    if hints.is_empty() {
        hints.push(RelaxationHint {
            code: RELAX_PRIMARY_DIMENSIONS.to_string(),
            message: t("hint.relax_primary"),
        });
    }

    hints
}

/// 硬约束触发: 建议切换到要求的型材
fn profile_hint(rule: &Rule) -> Option<RelaxationHint> {
    let RuleKind::Hard { required_profile } = &rule.kind else {
        return None;
    };
    let condition = rule.condition.to_string();
    Some(RelaxationHint {
        code: format!("select_{}", required_profile),
        message: t_with_args(
            "hint.select_profile",
            &[
                ("condition", condition.as_str()),
                ("profile", required_profile.as_str()),
            ],
        ),
    })
}

/// 自修正约束触发: 建议提高字段到下限
fn raise_hint(rule: &Rule) -> Option<RelaxationHint> {
    let RuleKind::Auto { field, min_value } = &rule.kind else {
        return None;
    };
    let min_text = min_value.to_string();

    // contains 条件以被包含的模块命名, 其余以规则 ID 命名
    let hint = match (&rule.condition.operator, &rule.condition.value) {
        (ConditionOperator::Contains, ConditionValue::Text(module)) => RelaxationHint {
            code: format!("raise_{}_for_{}", field, module),
            message: t_with_args(
                "hint.raise_for_module",
                &[
                    ("module", module.as_str()),
                    ("field", field.as_str()),
                    ("min", min_text.as_str()),
                ],
            ),
        },
        _ => {
            let condition = rule.condition.to_string();
            RelaxationHint {
                code: format!("raise_{}_for_{}", field, rule.id),
                message: t_with_args(
                    "hint.raise_for_condition",
                    &[
                        ("condition", condition.as_str()),
                        ("field", field.as_str()),
                        ("min", min_text.as_str()),
                    ],
                ),
            }
        }
    };
    Some(hint)
}
