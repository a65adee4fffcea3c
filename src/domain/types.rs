// ==========================================
// 模块化结构配置器 - 领域类型定义
// ==========================================
// 职责: 校验状态、规则类别、条件运算符等枚举
// 序列化格式: 与对外 JSON 合同保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 校验状态 (Validation Status)
// ==========================================
// 红线: 结构错误 / 规则错误 / 建议 三类严重度不得混用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pass,          // 通过
    Warning,       // 软规则告警
    Error,         // 阻断
    AutoCorrected, // 自动修正
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pass => "pass",
            ValidationStatus::Warning => "warning",
            ValidationStatus::Error => "error",
            ValidationStatus::AutoCorrected => "auto_corrected",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, ValidationStatus::Pass)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 规则类别 (Rule Class)
// ==========================================
// 评估顺序固定: Hard -> Soft -> Auto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleClass {
    Hard, // 硬约束
    Soft, // 软约束
    Auto, // 自修正约束
}

impl RuleClass {
    pub const EVALUATION_ORDER: [RuleClass; 3] = [RuleClass::Hard, RuleClass::Soft, RuleClass::Auto];
}

impl fmt::Display for RuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleClass::Hard => write!(f, "hard"),
            RuleClass::Soft => write!(f, "soft"),
            RuleClass::Auto => write!(f, "auto"),
        }
    }
}

// ==========================================
// 条件运算符 (Condition Operator)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "contains")]
    Contains,
}

impl ConditionOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionOperator::Gt => ">",
            ConditionOperator::Gte => ">=",
            ConditionOperator::Lt => "<",
            ConditionOperator::Lte => "<=",
            ConditionOperator::Eq => "==",
            ConditionOperator::Ne => "!=",
            ConditionOperator::Contains => "contains",
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 影响对象类别 (Affected Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffectedKind {
    Dimension,
    Attribute,
    Profile,
    Bom,
}

impl fmt::Display for AffectedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AffectedKind::Dimension => write!(f, "dimension"),
            AffectedKind::Attribute => write!(f, "attribute"),
            AffectedKind::Profile => write!(f, "profile"),
            AffectedKind::Bom => write!(f, "bom"),
        }
    }
}

// ==========================================
// 数值属性 (Numeric Attribute)
// ==========================================
// 参与 min/max/step 校验的四个数值字段, 顺序即输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericAttribute {
    Width,
    Height,
    Depth,
    Load,
}

impl NumericAttribute {
    pub const ALL: [NumericAttribute; 4] = [
        NumericAttribute::Width,
        NumericAttribute::Height,
        NumericAttribute::Depth,
        NumericAttribute::Load,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumericAttribute::Width => "width",
            NumericAttribute::Height => "height",
            NumericAttribute::Depth => "depth",
            NumericAttribute::Load => "load",
        }
    }

    /// 尺寸类字段归入 dimension, 其余归入 attribute
    pub fn affected_kind(&self) -> AffectedKind {
        match self {
            NumericAttribute::Load => AffectedKind::Attribute,
            _ => AffectedKind::Dimension,
        }
    }
}

impl fmt::Display for NumericAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NumericAttribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "width" => Ok(NumericAttribute::Width),
            "height" => Ok(NumericAttribute::Height),
            "depth" => Ok(NumericAttribute::Depth),
            "load" => Ok(NumericAttribute::Load),
            other => Err(format!("未知数值属性: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ValidationStatus::AutoCorrected).unwrap();
        assert_eq!(json, "\"auto_corrected\"");
        assert_eq!(ValidationStatus::Warning.to_string(), "warning");
    }

    #[test]
    fn test_operator_round_trips_symbols() {
        let op: ConditionOperator = serde_json::from_str("\">=\"").unwrap();
        assert_eq!(op, ConditionOperator::Gte);
        let op: ConditionOperator = serde_json::from_str("\"contains\"").unwrap();
        assert_eq!(op, ConditionOperator::Contains);
        assert!(serde_json::from_str::<ConditionOperator>("\"~\"").is_err());
    }

    #[test]
    fn test_numeric_attribute_parse() {
        assert_eq!("depth".parse::<NumericAttribute>(), Ok(NumericAttribute::Depth));
        assert!("volume".parse::<NumericAttribute>().is_err());
        assert_eq!(NumericAttribute::Load.affected_kind(), AffectedKind::Attribute);
    }
}
