// ==========================================
// 模块化结构配置器 - 反向求解
// ==========================================
// 职责: 由期望 (可能不完整) 的配置搜索可行方案
// 输入: 目标参数 + SolverOptions
// 输出: 排名方案 + 精确匹配标志 + 放宽建议
// ==========================================

mod core;
mod hints;
mod scoring;
mod target;

#[cfg(test)]
mod tests;

pub use self::core::ReverseSolver;
pub use hints::{relaxation_hints, RELAX_PRIMARY_DIMENSIONS, RELAX_WIDTH_STEP};
pub use scoring::{
    candidate_score, is_exact, AUTO_CORRECTED_PENALTY, ERROR_PENALTY, PROFILE_MISMATCH_PENALTY,
    WARNING_PENALTY,
};
pub use target::SolveTarget;
