// ==========================================
// 模块化结构配置器 - 校验项构造 (纯函数库)
// ==========================================
// 职责: 每一步校验的判定与结果项构造
// 红线: 无状态、无副作用、无 I/O
// ==========================================

use crate::config::constraint_model::{Catalog, EnumDomain, NumericDomain, Rule, RuleKind};
use crate::contracts::{SchemaViolation, SNAPSHOT_CONTRACT};
use crate::domain::request::EvaluationContext;
use crate::domain::snapshot::Snapshot;
use crate::domain::types::{AffectedKind, NumericAttribute, ValidationStatus};
use crate::domain::validation::{Affected, Explanation, SuggestedFix, ValidationResultItem};
use crate::i18n::{t, t_with_args};

/// 结果项合同违规时的兜底 ruleId
pub const SANITIZED_RULE_ID: &str = "internal.result_shape";

// ==========================================
// RuleChecks - 纯函数工具类
// ==========================================
pub struct RuleChecks;

impl RuleChecks {
    /// 结构违规 -> 错误项 (ruleId = schema.<序号>, 序号从 1 开始)
    pub fn schema_violation(seq: usize, violation: &SchemaViolation) -> ValidationResultItem {
        ValidationResultItem::new(
            format!("schema.{}", seq),
            ValidationStatus::Error,
            format!("{} {}", violation.display_path(), violation.message)
                .trim()
                .to_string(),
            Explanation {
                title: t("schema.title"),
                message: t_with_args("schema.detail", &[("contract", SNAPSHOT_CONTRACT)]),
                why: vec![t_with_args(
                    "schema.why",
                    &[
                        ("keyword", violation.keyword.as_str()),
                        ("schema_path", violation.schema_path.as_str()),
                    ],
                )],
            },
        )
        .with_fix(SuggestedFix::new("fix_snapshot_shape", t("schema.fix")))
    }

    /// 数值属性: min / max / step 三项独立判定, 可同时命中
    pub fn numeric_attribute(
        attr: NumericAttribute,
        value: f64,
        domain: &NumericDomain,
    ) -> Vec<ValidationResultItem> {
        let field = attr.as_str();
        let value_text = value.to_string();
        let min_text = domain.min.to_string();
        let max_text = domain.max.to_string();
        let affected = Affected::single(attr.affected_kind(), field);
        let mut out = Vec::new();

        if value < domain.min {
            let args = [("field", field), ("value", value_text.as_str()), ("min", min_text.as_str())];
            out.push(
                ValidationResultItem::new(
                    format!("attr.{}.min", field),
                    ValidationStatus::Error,
                    t_with_args("attr.below_min.message", &args),
                    Explanation {
                        title: t_with_args("attr.below_min.title", &args),
                        message: t_with_args("attr.below_min.detail", &args),
                        why: vec![t("attr.out_of_range_why")],
                    },
                )
                .with_affected(affected.clone())
                .with_fix(SuggestedFix::new(
                    format!("set_{}_{}", field, min_text),
                    t_with_args("attr.below_min.fix", &args),
                )),
            );
        }

        if value > domain.max {
            let args = [("field", field), ("value", value_text.as_str()), ("max", max_text.as_str())];
            out.push(
                ValidationResultItem::new(
                    format!("attr.{}.max", field),
                    ValidationStatus::Error,
                    t_with_args("attr.above_max.message", &args),
                    Explanation {
                        title: t_with_args("attr.above_max.title", &args),
                        message: t_with_args("attr.above_max.detail", &args),
                        why: vec![t("attr.out_of_range_why")],
                    },
                )
                .with_affected(affected.clone())
                .with_fix(SuggestedFix::new(
                    format!("set_{}_{}", field, max_text),
                    t_with_args("attr.above_max.fix", &args),
                )),
            );
        }

        if let Some(step) = domain.step {
            if !domain.is_step_aligned(value) {
                let step_text = step.to_string();
                let args = [
                    ("field", field),
                    ("value", value_text.as_str()),
                    ("min", min_text.as_str()),
                    ("step", step_text.as_str()),
                ];
                out.push(
                    ValidationResultItem::new(
                        format!("attr.{}.step", field),
                        ValidationStatus::Error,
                        t_with_args("attr.step.message", &args),
                        Explanation {
                            title: t_with_args("attr.step.title", &args),
                            message: t_with_args("attr.step.detail", &args),
                            why: vec![t("attr.step.why")],
                        },
                    )
                    .with_affected(affected)
                    .with_fix(SuggestedFix::new(
                        format!("snap_{}_step", field),
                        t_with_args("attr.step.fix", &args),
                    )),
                );
            }
        }

        out
    }

    /// 安装方式: 存在且不在枚举值域内时报错
    pub fn mounting_type(value: Option<&str>, domain: &EnumDomain) -> Option<ValidationResultItem> {
        let value = value?;
        if domain.contains(value) {
            return None;
        }
        let options = domain.options().join(", ");
        let args = [("value", value), ("options", options.as_str())];
        Some(
            ValidationResultItem::new(
                "attr.mountingType.enum",
                ValidationStatus::Error,
                t_with_args("attr.mounting_type.message", &args),
                Explanation {
                    title: t("attr.mounting_type.title"),
                    message: t_with_args("attr.mounting_type.detail", &args),
                    why: vec![t("attr.mounting_type.why")],
                },
            )
            .with_affected(Affected::single(AffectedKind::Attribute, "mountingType")),
        )
    }

    /// 设备模块: 每个不在值域内的条目各报一项
    pub fn equipment_modules(modules: &[String], domain: &EnumDomain) -> Vec<ValidationResultItem> {
        let options = domain.options().join(", ");
        modules
            .iter()
            .filter(|m| !domain.contains(m))
            .map(|m| {
                let args = [("value", m.as_str()), ("options", options.as_str())];
                ValidationResultItem::new(
                    "attr.equipmentModules.enumArray",
                    ValidationStatus::Error,
                    t_with_args("attr.equipment_module.message", &args),
                    Explanation {
                        title: t("attr.equipment_module.title"),
                        message: t_with_args("attr.equipment_module.detail", &args),
                        why: vec![t("attr.equipment_module.why")],
                    },
                )
                .with_affected(Affected::single(AffectedKind::Attribute, "equipmentModules"))
            })
            .collect()
    }

    /// 规则判定: 按规则类别单点分派
    pub fn rule(rule: &Rule, ctx: &EvaluationContext) -> ValidationResultItem {
        let triggered = rule.condition.evaluate(ctx);
        match &rule.kind {
            RuleKind::Hard { required_profile } => {
                Self::hard_rule(rule, required_profile, triggered, ctx)
            }
            RuleKind::Soft => Self::soft_rule(rule, triggered),
            RuleKind::Auto { field, min_value } => {
                Self::auto_rule(rule, field, *min_value, triggered, ctx)
            }
        }
    }

    fn hard_rule(
        rule: &Rule,
        required_profile: &str,
        triggered: bool,
        ctx: &EvaluationContext,
    ) -> ValidationResultItem {
        let condition = rule.condition.to_string();
        let explanation = |why: Vec<String>| Explanation {
            title: rule_title(rule),
            message: rule_detail(rule),
            why,
        };
        let affected = Affected::single(AffectedKind::Profile, required_profile);

        if !triggered {
            return ValidationResultItem::new(
                rule.id.as_str(),
                ValidationStatus::Pass,
                t_with_args("rule.hard.not_applicable", &[("rule", rule.id.as_str())]),
                explanation(vec![t_with_args(
                    "rule.condition_false",
                    &[("condition", condition.as_str())],
                )]),
            )
            .with_affected(affected);
        }

        let condition_true = t_with_args("rule.condition_true", &[("condition", condition.as_str())]);
        if ctx.selected_profile.as_deref() == Some(required_profile) {
            return ValidationResultItem::new(
                rule.id.as_str(),
                ValidationStatus::Pass,
                t_with_args("rule.hard.satisfied", &[("profile", required_profile)]),
                explanation(vec![condition_true, t("rule.hard.meets")]),
            )
            .with_affected(affected);
        }

        let selected = ctx.selected_profile.as_deref().unwrap_or("undefined");
        let title = rule_title(rule);
        ValidationResultItem::new(
            rule.id.as_str(),
            ValidationStatus::Error,
            t_with_args(
                "rule.hard.violated",
                &[
                    ("description", title.as_str()),
                    ("profile", required_profile),
                ],
            ),
            explanation(vec![
                condition_true,
                t_with_args("rule.hard.selected", &[("profile", selected)]),
            ]),
        )
        .with_affected(affected)
        .with_fix(SuggestedFix::new(
            "select_required_profile",
            t_with_args("rule.hard.fix", &[("profile", required_profile)]),
        ))
    }

    fn soft_rule(rule: &Rule, triggered: bool) -> ValidationResultItem {
        let (status, message, why) = if triggered {
            (ValidationStatus::Warning, rule_title(rule), t("rule.soft.met"))
        } else {
            (
                ValidationStatus::Pass,
                t_with_args("rule.soft.passed", &[("rule", rule.id.as_str())]),
                t("rule.soft.not_met"),
            )
        };

        ValidationResultItem::new(
            rule.id.as_str(),
            status,
            message,
            Explanation {
                title: rule_title(rule),
                message: rule_detail(rule),
                why: vec![why],
            },
        )
    }

    fn auto_rule(
        rule: &Rule,
        field: &str,
        min_value: f64,
        triggered: bool,
        ctx: &EvaluationContext,
    ) -> ValidationResultItem {
        let kind = field
            .parse::<NumericAttribute>()
            .map(|a| a.affected_kind())
            .unwrap_or(AffectedKind::Attribute);
        let affected = Affected::single(kind, field);
        let min_text = min_value.to_string();
        let satisfied = |why: String| {
            ValidationResultItem::new(
                rule.id.as_str(),
                ValidationStatus::Pass,
                t_with_args("rule.auto.satisfied", &[("rule", rule.id.as_str())]),
                Explanation {
                    title: rule_title(rule),
                    message: rule_detail(rule),
                    why: vec![why],
                },
            )
            .with_affected(affected.clone())
        };

        if !triggered {
            let condition = rule.condition.to_string();
            return satisfied(t_with_args(
                "rule.condition_false",
                &[("condition", condition.as_str())],
            ));
        }

        match ctx.number(field) {
            Some(current) if current < min_value => {
                let value_text = current.to_string();
                let args = [
                    ("field", field),
                    ("value", value_text.as_str()),
                    ("min", min_text.as_str()),
                ];
                ValidationResultItem::new(
                    rule.id.as_str(),
                    ValidationStatus::AutoCorrected,
                    t_with_args("rule.auto.corrected", &args),
                    Explanation {
                        title: rule_title(rule),
                        message: rule_detail(rule),
                        why: vec![t_with_args("rule.auto.raise", &args)],
                    },
                )
                .with_affected(affected.clone())
                .with_fix(SuggestedFix::new(
                    format!("set_{}_{}", field, min_text),
                    t_with_args("rule.auto.fix", &args),
                ))
            }
            _ => satisfied(t_with_args(
                "rule.auto.meets",
                &[("field", field), ("min", min_text.as_str())],
            )),
        }
    }

    /// 目录校验: BOM 中每条型材物料必须在目录中
    pub fn catalog_profiles(snapshot: &Snapshot, catalog: &Catalog) -> Vec<ValidationResultItem> {
        let Some(bom) = snapshot.bom.as_ref() else {
            return Vec::new();
        };

        bom.iter()
            .filter(|line| line.is_profile())
            .filter_map(|line| line.article.as_deref())
            .filter(|article| !catalog.has_profile(article))
            .map(|article| {
                ValidationResultItem::new(
                    "catalog.profile.exists",
                    ValidationStatus::Error,
                    t_with_args("catalog.unknown_profile.message", &[("article", article)]),
                    Explanation {
                        title: t("catalog.unknown_profile.title"),
                        message: t("catalog.unknown_profile.detail"),
                        why: vec![t("catalog.unknown_profile.why")],
                    },
                )
                .with_affected(Affected::single(AffectedKind::Bom, article))
            })
            .collect()
    }

    /// 兜底错误项 (原结果项不符合合同时替换)
    pub fn sanitized(rule_id: &str) -> ValidationResultItem {
        let rule_id = if rule_id.is_empty() {
            SANITIZED_RULE_ID
        } else {
            rule_id
        };
        ValidationResultItem::new(
            rule_id,
            ValidationStatus::Error,
            t("sanitized.message"),
            Explanation {
                title: t("sanitized.title"),
                message: t("sanitized.detail"),
                why: vec![t("sanitized.why")],
            },
        )
    }
}

/// 规则标题: 描述为空时退化为规则 ID
fn rule_title(rule: &Rule) -> String {
    if rule.description.is_empty() {
        rule.id.clone()
    } else {
        rule.description.clone()
    }
}

/// 规则说明: 说明为空时退化为标题
fn rule_detail(rule: &Rule) -> String {
    if rule.explanation.is_empty() {
        rule_title(rule)
    } else {
        rule.explanation.clone()
    }
}
