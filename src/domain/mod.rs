// ==========================================
// 模块化结构配置器 - 领域模型层
// ==========================================
// 职责: 定义快照、请求、校验结果、求解结果等领域对象
// 红线: 不含规则逻辑, 不含 I/O
// ==========================================

pub mod request;
pub mod snapshot;
pub mod solution;
pub mod types;
pub mod validation;

// 重导出核心类型
pub use request::{ConfigurationRequest, ContextValue, EvaluationContext};
pub use snapshot::{
    normalize_snapshot_like_input, BomLine, Dimensions, Snapshot, VersionTag,
    PROFILE_ARTICLE_PREFIX,
};
pub use solution::{Candidate, RankedCandidate, RelaxationHint, SolveResult};
pub use types::{AffectedKind, ConditionOperator, NumericAttribute, RuleClass, ValidationStatus};
pub use validation::{Affected, Explanation, SuggestedFix, ValidationResultItem};
