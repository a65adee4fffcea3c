// ==========================================
// 模块化结构配置器 - 校验结果项
// ==========================================
// 职责: 定义对外输出的 ValidationResultItem
// 红线: 输出必须符合结果项合同 (由 contracts 模块守卫)
// ==========================================

use crate::domain::types::{AffectedKind, ValidationStatus};
use serde::{Deserialize, Serialize};

/// 受影响对象
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affected {
    pub kind: AffectedKind,
    pub ids: Vec<String>,
}

impl Affected {
    pub fn single(kind: AffectedKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            ids: vec![id.into()],
        }
    }
}

/// 可解释性说明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub title: String,
    pub message: String,
    pub why: Vec<String>,
}

/// 修复建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedFix {
    pub code: String,
    pub message: String,
}

impl SuggestedFix {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ==========================================
// ValidationResultItem - 校验结果项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResultItem {
    pub rule_id: String,
    pub status: ValidationStatus,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected: Option<Affected>,

    pub explanation: Explanation,

    #[serde(default)]
    pub suggested_fixes: Vec<SuggestedFix>,
}

impl ValidationResultItem {
    pub fn new(
        rule_id: impl Into<String>,
        status: ValidationStatus,
        message: impl Into<String>,
        explanation: Explanation,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            status,
            message: message.into(),
            affected: None,
            explanation,
            suggested_fixes: Vec::new(),
        }
    }

    pub fn with_affected(mut self, affected: Affected) -> Self {
        self.affected = Some(affected);
        self
    }

    pub fn with_fix(mut self, fix: SuggestedFix) -> Self {
        self.suggested_fixes.push(fix);
        self
    }

    pub fn is_pass(&self) -> bool {
        self.status.is_pass()
    }

    pub fn is_error(&self) -> bool {
        self.status == ValidationStatus::Error
    }
}

/// 统计指定状态的条目数
pub fn count_status(items: &[ValidationResultItem], status: ValidationStatus) -> usize {
    items.iter().filter(|i| i.status == status).count()
}
