// ==========================================
// 模块化结构配置器 - 引擎层
// ==========================================
// 职责: 规则评估、候选生成、反向求解
// 红线: 引擎不做 I/O, 不因输入问题返回失败
// 红线: 所有违规必须以 ValidationResultItem 输出并附带说明
// ==========================================

pub mod candidate_generator;
pub mod reverse_solver;
pub mod rule_evaluator;

// 重导出核心引擎
pub use candidate_generator::CandidateGenerator;
pub use reverse_solver::{ReverseSolver, SolveTarget};
pub use rule_evaluator::{RuleChecks, ValidateOptions, ValidationEngine};
