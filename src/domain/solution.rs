// ==========================================
// 模块化结构配置器 - 反向求解结果
// ==========================================
// 职责: 候选方案、排名方案、放宽建议、求解结果
// ==========================================

use crate::domain::snapshot::Snapshot;
use crate::domain::types::ValidationStatus;
use crate::domain::validation::ValidationResultItem;
use serde::{Deserialize, Serialize};

/// 候选方案 (内部评估对象, 包含全部 pass 条目)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub profile_id: String,
    pub snapshot: Snapshot,
    pub validation: Vec<ValidationResultItem>,
    pub score: f64,
    /// 条件成立的规则 ID (与条目状态无关)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggered: Vec<String>,
}

impl Candidate {
    pub fn has_error(&self) -> bool {
        self.validation.iter().any(|v| v.status == ValidationStatus::Error)
    }

    pub fn all_pass(&self) -> bool {
        self.validation.iter().all(|v| v.is_pass())
    }

    /// 规则是否在该候选上触发 (条件成立即触发, 即使条目为 pass)
    pub fn fired(&self, rule_id: &str) -> bool {
        self.triggered.iter().any(|id| id == rule_id)
    }
}

/// 排名方案 (对外输出, 校验列表不含 pass 条目)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub rank: usize,
    pub score: f64,
    pub profile_id: String,
    pub snapshot: Snapshot,
    pub validation: Vec<ValidationResultItem>,
}

/// 放宽建议
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaxationHint {
    pub code: String,
    pub message: String,
}

// ==========================================
// SolveResult - 反向求解结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResult {
    pub exact_match: bool,
    pub evaluated_candidates: usize,
    pub solutions: Vec<RankedCandidate>,
    pub relaxation_hints: Vec<RelaxationHint>,
}
