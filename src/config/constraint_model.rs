// ==========================================
// 模块化结构配置器 - 约束模型
// ==========================================
// 职责: 属性值域、型材目录、三类规则 (hard/soft/auto)
// 生命周期: 进程级静态只读, 无修改接口
// ==========================================
// 注: 模型版本切换属于配置问题, 由 ConstraintModelSource 负责
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::request::{ContextValue, EvaluationContext};
use crate::domain::types::{ConditionOperator, NumericAttribute, RuleClass};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// 对齐判定容差
pub const STEP_EPSILON: f64 = 1e-9;

// ==========================================
// NumericDomain - 数值值域
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl NumericDomain {
    pub fn new(min: f64, max: f64, step: Option<f64>) -> Self {
        Self { min, max, step }
    }

    /// 值是否落在以 min 为起点的步长网格上
    ///
    /// (value - min) mod step 与 0 或 step 的差在 1e-9 以内即视为对齐;
    /// 无步长的值域恒为对齐
    pub fn is_step_aligned(&self, value: f64) -> bool {
        match self.step {
            Some(step) if step > 0.0 => {
                let rem = ((value - self.min) % step).abs();
                rem < STEP_EPSILON || (rem - step).abs() < STEP_EPSILON
            }
            _ => true,
        }
    }

    pub fn midpoint(&self) -> f64 {
        self.min + (self.max - self.min) / 2.0
    }
}

// ==========================================
// EnumDomain - 枚举值域
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnumDomain(pub Vec<String>);

impl EnumDomain {
    pub fn from_slice(options: &[&str]) -> Self {
        Self(options.iter().map(|s| s.to_string()).collect())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|o| o == value)
    }

    pub fn options(&self) -> &[String] {
        &self.0
    }
}

// ==========================================
// AttributeDomains - 属性值域全集
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDomains {
    pub width: NumericDomain,
    pub height: NumericDomain,
    pub depth: NumericDomain,
    pub load: NumericDomain,
    pub mounting_type: EnumDomain,
    pub equipment_modules: EnumDomain,
}

impl AttributeDomains {
    pub fn numeric(&self, attr: NumericAttribute) -> &NumericDomain {
        match attr {
            NumericAttribute::Width => &self.width,
            NumericAttribute::Height => &self.height,
            NumericAttribute::Depth => &self.depth,
            NumericAttribute::Load => &self.load,
        }
    }
}

/// 型材目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub profiles: Vec<String>,
}

impl Catalog {
    pub fn has_profile(&self, profile_id: &str) -> bool {
        self.profiles.iter().any(|p| p == profile_id)
    }
}

// ==========================================
// Condition - 规则条件
// ==========================================

/// 条件右值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
}

impl Condition {
    pub fn new(field: &str, operator: ConditionOperator, value: ConditionValue) -> Self {
        Self {
            field: field.to_string(),
            operator,
            value,
        }
    }

    /// 在评估上下文上求值
    ///
    /// - 数值比较要求字段为有限数字
    /// - contains 要求字段为列表
    /// - 字段缺失时除 `!=` 外均为 false
    pub fn evaluate(&self, ctx: &EvaluationContext) -> bool {
        let left = ctx.field(&self.field);
        match self.operator {
            ConditionOperator::Gt => compare(&left, &self.value, |l, r| l > r),
            ConditionOperator::Gte => compare(&left, &self.value, |l, r| l >= r),
            ConditionOperator::Lt => compare(&left, &self.value, |l, r| l < r),
            ConditionOperator::Lte => compare(&left, &self.value, |l, r| l <= r),
            ConditionOperator::Eq => equals(&left, &self.value),
            ConditionOperator::Ne => !equals(&left, &self.value),
            ConditionOperator::Contains => match (&left, &self.value) {
                (ContextValue::List(items), ConditionValue::Text(wanted)) => {
                    items.iter().any(|i| i == wanted)
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

fn compare(left: &ContextValue<'_>, right: &ConditionValue, op: impl Fn(f64, f64) -> bool) -> bool {
    match (left, right) {
        (ContextValue::Number(l), ConditionValue::Number(r)) if l.is_finite() => op(*l, *r),
        _ => false,
    }
}

fn equals(left: &ContextValue<'_>, right: &ConditionValue) -> bool {
    match (left, right) {
        (ContextValue::Number(l), ConditionValue::Number(r)) => l == r,
        (ContextValue::Text(l), ConditionValue::Text(r)) => *l == r.as_str(),
        _ => false,
    }
}

// ==========================================
// Rule - 规则 (按类别携带动作)
// ==========================================

/// 规则类别及其专属动作
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// 硬约束: 条件成立时要求指定型材
    Hard { required_profile: String },
    /// 软约束: 条件成立时仅告警
    Soft,
    /// 自修正约束: 条件成立时字段不得低于下限
    Auto { field: String, min_value: f64 },
}

impl RuleKind {
    pub fn class(&self) -> RuleClass {
        match self {
            RuleKind::Hard { .. } => RuleClass::Hard,
            RuleKind::Soft => RuleClass::Soft,
            RuleKind::Auto { .. } => RuleClass::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RuleSpec", into = "RuleSpec")]
pub struct Rule {
    pub id: String,
    pub description: String,
    pub condition: Condition,
    pub kind: RuleKind,
    pub explanation: String,
}

/// 规则的 JSON 表示
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub id: String,
    pub kind: RuleClass,
    #[serde(default)]
    pub description: String,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<RuleActionSpec>,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RuleActionSpec {
    #[serde(rename = "requireProfile")]
    RequireProfile {
        #[serde(rename = "profileId")]
        profile_id: String,
    },
    #[serde(rename = "setMinOverride")]
    SetMinOverride {
        field: String,
        #[serde(rename = "minValue")]
        min_value: f64,
    },
}

impl TryFrom<RuleSpec> for Rule {
    type Error = String;

    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        let kind = match (spec.kind, spec.action) {
            (RuleClass::Hard, Some(RuleActionSpec::RequireProfile { profile_id })) => {
                RuleKind::Hard {
                    required_profile: profile_id,
                }
            }
            (RuleClass::Soft, None) => RuleKind::Soft,
            (RuleClass::Auto, Some(RuleActionSpec::SetMinOverride { field, min_value })) => {
                RuleKind::Auto { field, min_value }
            }
            (class, action) => {
                return Err(format!(
                    "规则 {} 的类别 {} 与动作 {:?} 不匹配",
                    spec.id, class, action
                ))
            }
        };

        Ok(Rule {
            id: spec.id,
            description: spec.description,
            condition: spec.condition,
            kind,
            explanation: spec.explanation,
        })
    }
}

impl From<Rule> for RuleSpec {
    fn from(rule: Rule) -> Self {
        let kind = rule.kind.class();
        let action = match rule.kind {
            RuleKind::Hard { required_profile } => Some(RuleActionSpec::RequireProfile {
                profile_id: required_profile,
            }),
            RuleKind::Soft => None,
            RuleKind::Auto { field, min_value } => {
                Some(RuleActionSpec::SetMinOverride { field, min_value })
            }
        };
        RuleSpec {
            id: rule.id,
            kind,
            description: rule.description,
            condition: rule.condition,
            action,
            explanation: rule.explanation,
        }
    }
}

// ==========================================
// ConstraintModel - 约束模型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintModel {
    pub attributes: AttributeDomains,
    pub catalog: Catalog,
    pub rules: Vec<Rule>,
}

impl ConstraintModel {
    /// 内置默认模型
    pub fn default_model() -> Self {
        Self {
            attributes: AttributeDomains {
                width: NumericDomain::new(200.0, 3000.0, Some(10.0)),
                height: NumericDomain::new(500.0, 4000.0, Some(10.0)),
                depth: NumericDomain::new(100.0, 1000.0, Some(10.0)),
                load: NumericDomain::new(0.0, 1500.0, None),
                mounting_type: EnumDomain::from_slice(&["floor-wall", "wall", "floor", "ceiling"]),
                equipment_modules: EnumDomain::from_slice(&["toilet", "bidet", "piping", "sink"]),
            },
            catalog: Catalog {
                profiles: vec!["profile_30x30".to_string(), "profile_40x40".to_string()],
            },
            rules: vec![
                Rule {
                    id: "hr1".to_string(),
                    description: "If load > 400kg, profile MUST be >= 40x40".to_string(),
                    condition: Condition::new(
                        "load",
                        ConditionOperator::Gt,
                        ConditionValue::Number(400.0),
                    ),
                    kind: RuleKind::Hard {
                        required_profile: "profile_40x40".to_string(),
                    },
                    explanation: "Heavy loads (>400kg) require a reinforced 40x40 profile."
                        .to_string(),
                },
                Rule {
                    id: "sr1".to_string(),
                    description: "Warn if width > 2000mm".to_string(),
                    condition: Condition::new(
                        "width",
                        ConditionOperator::Gt,
                        ConditionValue::Number(2000.0),
                    ),
                    kind: RuleKind::Soft,
                    explanation: "Widths over 2000mm may require additional intermediate supports that aren't auto-added."
                        .to_string(),
                },
                Rule {
                    id: "ar1".to_string(),
                    description: "If toilet included, depth must be at least 300mm".to_string(),
                    condition: Condition::new(
                        "equipmentModules",
                        ConditionOperator::Contains,
                        ConditionValue::Text("toilet".to_string()),
                    ),
                    kind: RuleKind::Auto {
                        field: "depth".to_string(),
                        min_value: 300.0,
                    },
                    explanation: "Toilet module requires minimum depth 300mm for plumbing clearance."
                        .to_string(),
                },
            ],
        }
    }

    /// 指定类别的规则 (保持声明顺序)
    pub fn rules_of(&self, class: RuleClass) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.kind.class() == class)
    }

    pub fn find_rule(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }

    /// 模型自检 (加载外部模型后、投入使用前调用)
    pub fn check(&self) -> ConfigResult<()> {
        for attr in NumericAttribute::ALL {
            let d = self.attributes.numeric(attr);
            if !d.min.is_finite() || !d.max.is_finite() || d.min > d.max {
                return Err(ConfigError::InvalidModel(format!(
                    "{} 值域无效: [{}, {}]",
                    attr, d.min, d.max
                )));
            }
            if let Some(step) = d.step {
                if !step.is_finite() || step <= 0.0 {
                    return Err(ConfigError::InvalidModel(format!(
                        "{} 步长必须为正数: {}",
                        attr, step
                    )));
                }
            }
        }

        if self.catalog.profiles.is_empty() {
            return Err(ConfigError::InvalidModel("型材目录为空".to_string()));
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(ConfigError::InvalidRule {
                    rule_id: rule.id.clone(),
                    message: "规则 ID 重复".to_string(),
                });
            }
            match &rule.kind {
                RuleKind::Hard { required_profile } => {
                    if !self.catalog.has_profile(required_profile) {
                        return Err(ConfigError::InvalidRule {
                            rule_id: rule.id.clone(),
                            message: format!("要求的型材不在目录中: {}", required_profile),
                        });
                    }
                }
                RuleKind::Soft => {}
                RuleKind::Auto { field, min_value } => {
                    if field.parse::<NumericAttribute>().is_err() {
                        return Err(ConfigError::InvalidRule {
                            rule_id: rule.id.clone(),
                            message: format!("自修正字段必须为数值属性: {}", field),
                        });
                    }
                    if !min_value.is_finite() {
                        return Err(ConfigError::InvalidRule {
                            rule_id: rule.id.clone(),
                            message: "自修正下限必须为有限数".to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for ConstraintModel {
    fn default() -> Self {
        Self::default_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::ConfigurationRequest;
    use serde_json::json;

    fn ctx(input: serde_json::Value) -> EvaluationContext {
        EvaluationContext::from_request(&ConfigurationRequest::from_value(&input))
    }

    #[test]
    fn test_default_model_is_consistent() {
        assert!(ConstraintModel::default_model().check().is_ok());
    }

    #[test]
    fn test_step_alignment() {
        let d = NumericDomain::new(200.0, 3000.0, Some(10.0));
        assert!(d.is_step_aligned(1000.0));
        assert!(d.is_step_aligned(200.0));
        assert!(!d.is_step_aligned(1005.0));
        // 浮点误差在容差内
        assert!(d.is_step_aligned(1000.0 + 1e-12));

        let no_step = NumericDomain::new(0.0, 1500.0, None);
        assert!(no_step.is_step_aligned(123.456));
    }

    #[test]
    fn test_condition_numeric_requires_number() {
        let cond = Condition::new("load", ConditionOperator::Gt, ConditionValue::Number(400.0));
        assert!(cond.evaluate(&ctx(json!({ "load": 500 }))));
        assert!(!cond.evaluate(&ctx(json!({ "load": 400 }))));
        assert!(!cond.evaluate(&ctx(json!({}))));

        let cond = Condition::new("load", ConditionOperator::Lte, ConditionValue::Number(400.0));
        assert!(cond.evaluate(&ctx(json!({ "load": 400 }))));
    }

    #[test]
    fn test_condition_contains_and_equality() {
        let cond = Condition::new(
            "equipmentModules",
            ConditionOperator::Contains,
            ConditionValue::Text("toilet".to_string()),
        );
        assert!(cond.evaluate(&ctx(json!({ "equipmentModules": ["sink", "toilet"] }))));
        assert!(!cond.evaluate(&ctx(json!({ "equipmentModules": ["sink"] }))));

        let eq = Condition::new(
            "mountingType",
            ConditionOperator::Eq,
            ConditionValue::Text("wall".to_string()),
        );
        assert!(eq.evaluate(&ctx(json!({ "mountingType": "wall" }))));
        let ne = Condition::new(
            "mountingType",
            ConditionOperator::Ne,
            ConditionValue::Text("wall".to_string()),
        );
        assert!(ne.evaluate(&ctx(json!({}))));
    }

    #[test]
    fn test_rule_json_shape() {
        let rule: Rule = serde_json::from_value(json!({
            "id": "hr9",
            "kind": "hard",
            "description": "d",
            "condition": { "field": "load", "operator": ">=", "value": 900 },
            "action": { "type": "requireProfile", "profileId": "profile_40x40" },
            "explanation": "e"
        }))
        .unwrap();
        assert_eq!(
            rule.kind,
            RuleKind::Hard {
                required_profile: "profile_40x40".to_string()
            }
        );

        // 软规则不得携带动作
        let bad = serde_json::from_value::<Rule>(json!({
            "id": "sr9",
            "kind": "soft",
            "condition": { "field": "width", "operator": ">", "value": 1 },
            "action": { "type": "requireProfile", "profileId": "profile_40x40" }
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_model_round_trips_through_json() {
        let model = ConstraintModel::default_model();
        let text = serde_json::to_string(&model).unwrap();
        let back: ConstraintModel = serde_json::from_str(&text).unwrap();
        assert_eq!(model, back);
    }

    #[test]
    fn test_check_rejects_duplicate_rule_ids() {
        let mut model = ConstraintModel::default_model();
        let dup = model.rules[0].clone();
        model.rules.push(dup);
        assert!(matches!(model.check(), Err(ConfigError::InvalidRule { .. })));
    }
}
