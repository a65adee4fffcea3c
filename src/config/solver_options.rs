use serde::{Deserialize, Serialize};

/// 反向求解调优参数
///
/// 缺失字段取默认值: maxSolutions=10, maxCandidates=200, dimensionBreadth=2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverOptions {
    /// 返回方案数上限
    #[serde(default = "default_max_solutions")]
    pub max_solutions: usize,

    /// 评估候选数上限（按枚举顺序截断）
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// 每个尺寸向两侧扩展的步数
    #[serde(default = "default_dimension_breadth")]
    pub dimension_breadth: usize,

    /// 是否并行评估已准入的候选
    #[serde(default)]
    pub parallel: bool,
}

pub const DEFAULT_MAX_SOLUTIONS: usize = 10;
pub const DEFAULT_MAX_CANDIDATES: usize = 200;
pub const DEFAULT_DIMENSION_BREADTH: usize = 2;

fn default_max_solutions() -> usize {
    DEFAULT_MAX_SOLUTIONS
}

fn default_max_candidates() -> usize {
    DEFAULT_MAX_CANDIDATES
}

fn default_dimension_breadth() -> usize {
    DEFAULT_DIMENSION_BREADTH
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_solutions: DEFAULT_MAX_SOLUTIONS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            dimension_breadth: DEFAULT_DIMENSION_BREADTH,
            parallel: false,
        }
    }
}

impl SolverOptions {
    pub fn with_max_solutions(mut self, n: usize) -> Self {
        self.max_solutions = n;
        self
    }

    pub fn with_max_candidates(mut self, n: usize) -> Self {
        self.max_candidates = n;
        self
    }

    pub fn with_dimension_breadth(mut self, n: usize) -> Self {
        self.dimension_breadth = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let opts: SolverOptions = serde_json::from_str(r#"{ "maxSolutions": 3 }"#).unwrap();
        assert_eq!(opts.max_solutions, 3);
        assert_eq!(opts.max_candidates, DEFAULT_MAX_CANDIDATES);
        assert_eq!(opts.dimension_breadth, DEFAULT_DIMENSION_BREADTH);
        assert!(!opts.parallel);
    }
}
