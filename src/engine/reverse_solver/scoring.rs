// ==========================================
// 模块化结构配置器 - 候选计分 (越低越好)
// ==========================================

use crate::domain::snapshot::Dimensions;
use crate::domain::solution::Candidate;
use crate::domain::types::{NumericAttribute, ValidationStatus};
use crate::domain::validation::ValidationResultItem;

use super::target::SolveTarget;

pub const ERROR_PENALTY: f64 = 100_000.0;
pub const WARNING_PENALTY: f64 = 300.0;
pub const AUTO_CORRECTED_PENALTY: f64 = 150.0;
pub const PROFILE_MISMATCH_PENALTY: f64 = 500.0;

const PRIMARY_DIMENSIONS: [NumericAttribute; 3] = [
    NumericAttribute::Width,
    NumericAttribute::Height,
    NumericAttribute::Depth,
];

fn candidate_dimension(dims: &Dimensions, attr: NumericAttribute) -> Option<f64> {
    match attr {
        NumericAttribute::Width => dims.width,
        NumericAttribute::Height => dims.height,
        NumericAttribute::Depth => dims.depth,
        NumericAttribute::Load => None,
    }
}

/// 计分
///
/// # 规则
/// - 每个显式指定的目标尺寸: |候选值 - 目标值|
/// - error +100000, warning +300, auto_corrected +150 (逐条累加)
/// - 显式指定型材且候选型材不同: +500
pub fn candidate_score(
    target: &SolveTarget,
    dimensions: &Dimensions,
    profile_id: &str,
    validation: &[ValidationResultItem],
) -> f64 {
    let mut score = 0.0;

    for attr in PRIMARY_DIMENSIONS {
        if let Some(wanted) = target.dimension(attr) {
            let actual = candidate_dimension(dimensions, attr).unwrap_or(0.0);
            score += (actual - wanted).abs();
        }
    }

    for item in validation {
        score += match item.status {
            ValidationStatus::Error => ERROR_PENALTY,
            ValidationStatus::Warning => WARNING_PENALTY,
            ValidationStatus::AutoCorrected => AUTO_CORRECTED_PENALTY,
            ValidationStatus::Pass => 0.0,
        };
    }

    if let Some(wanted) = target.profile.as_deref() {
        if wanted != profile_id {
            score += PROFILE_MISMATCH_PENALTY;
        }
    }

    score
}

/// 精确匹配: 全部 pass 且与每个显式目标值完全相等
pub fn is_exact(candidate: &Candidate, target: &SolveTarget) -> bool {
    if !candidate.all_pass() {
        return false;
    }

    let dims = &candidate.snapshot.dimensions;
    let dims_match = PRIMARY_DIMENSIONS.iter().all(|attr| match target.dimension(*attr) {
        Some(wanted) => candidate_dimension(dims, *attr) == Some(wanted),
        None => true,
    });

    let profile_match = target
        .profile
        .as_deref()
        .map(|p| p == candidate.profile_id)
        .unwrap_or(true);

    dims_match && profile_match
}
