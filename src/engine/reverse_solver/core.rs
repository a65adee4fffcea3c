// ==========================================
// 模块化结构配置器 - 反向求解器
// ==========================================
// 职责: 由期望配置生成候选、逐一评估、计分排序、给出放宽建议
// 输入: 目标参数 (可不完整) + SolverOptions
// 输出: SolveResult
// ==========================================
// 红线: 枚举顺序固定为 宽 -> 高 -> 深 -> 型材, 达到 maxCandidates 立即停止
// 红线: 先淘汰含 error 的候选, 再按分数稳定排序
// 红线: 并行模式只改变执行方式, 准入集合与输出顺序与串行一致
// ==========================================

use crate::config::solver_options::SolverOptions;
use crate::domain::snapshot::Dimensions;
use crate::domain::solution::{Candidate, RankedCandidate, SolveResult};
use crate::domain::types::NumericAttribute;
use crate::engine::candidate_generator::CandidateGenerator;
use crate::engine::rule_evaluator::{ValidateOptions, ValidationEngine};
use crate::perf::{self, PerfGuard};
use rayon::prelude::*;
use serde_json::Value;
use tracing::instrument;

use super::hints::relaxation_hints;
use super::scoring::{candidate_score, is_exact};
use super::target::SolveTarget;

// ==========================================
// ReverseSolver - 反向求解器
// ==========================================
#[derive(Clone)]
pub struct ReverseSolver {
    engine: ValidationEngine,
}

impl ReverseSolver {
    pub fn new(engine: ValidationEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// 对原始目标参数求解
    pub fn solve(&self, input: &Value, options: SolverOptions) -> SolveResult {
        self.solve_target(&SolveTarget::from_value(input), options)
    }

    /// 对已解析目标求解
    ///
    /// # 流程
    /// 1. 生成宽/高/深候选序列与型材序列
    /// 2. 按固定嵌套顺序准入前 maxCandidates 个组合
    /// 3. 每个组合构造最小快照并完整校验 (含 pass 条目)
    /// 4. 淘汰含 error 的候选, 稳定排序, 截取前 maxSolutions 个
    /// 5. 判定精确匹配, 无精确匹配时生成放宽建议
    #[instrument(skip(self, target, options), fields(
        max_solutions = options.max_solutions,
        max_candidates = options.max_candidates,
        breadth = options.dimension_breadth,
        parallel = options.parallel
    ))]
    pub fn solve_target(&self, target: &SolveTarget, options: SolverOptions) -> SolveResult {
        let _perf = PerfGuard::new("solve_reverse");
        let model = self.engine.model();
        let breadth = options.dimension_breadth;

        let axis = |attr: NumericAttribute| {
            CandidateGenerator::dim_candidates(
                target.dimension(attr),
                model.attributes.numeric(attr),
                breadth,
            )
        };
        let widths = axis(NumericAttribute::Width);
        let heights = axis(NumericAttribute::Height);
        let depths = axis(NumericAttribute::Depth);
        let profiles: Vec<String> = match &target.profile {
            Some(p) => vec![p.clone()],
            None => model.catalog.profiles.clone(),
        };

        tracing::debug!(
            widths = ?widths,
            heights = ?heights,
            depths = ?depths,
            profiles = ?profiles,
            "候选轴已生成"
        );

        let admitted = admit(&widths, &heights, &depths, &profiles, options.max_candidates);
        let evaluated: Vec<Candidate> = if options.parallel {
            let out: Vec<Candidate> = admitted
                .par_iter()
                .map(|(dims, profile)| self.evaluate(target, *dims, profile))
                .collect();
            perf::record_validations(
                out.len() as u64,
                (out.len() * model.rules.len()) as u64,
            );
            out
        } else {
            admitted
                .iter()
                .map(|(dims, profile)| self.evaluate(target, *dims, profile))
                .collect()
        };

        let mut survivors: Vec<&Candidate> = evaluated.iter().filter(|c| !c.has_error()).collect();
        survivors.sort_by(|a, b| a.score.total_cmp(&b.score));

        let exact_match = survivors.iter().any(|c| is_exact(c, target));

        let solutions: Vec<RankedCandidate> = survivors
            .iter()
            .take(options.max_solutions)
            .enumerate()
            .map(|(i, c)| RankedCandidate {
                rank: i + 1,
                score: c.score,
                profile_id: c.profile_id.clone(),
                snapshot: c.snapshot.clone(),
                validation: c
                    .validation
                    .iter()
                    .filter(|v| !v.is_pass())
                    .cloned()
                    .collect(),
            })
            .collect();

        let relaxation_hints = if exact_match {
            Vec::new()
        } else {
            relaxation_hints(model, target, &evaluated)
        };

        tracing::info!(
            evaluated = evaluated.len(),
            survivors = survivors.len(),
            solutions = solutions.len(),
            exact_match,
            hints = relaxation_hints.len(),
            "反向求解完成"
        );

        SolveResult {
            exact_match,
            evaluated_candidates: evaluated.len(),
            solutions,
            relaxation_hints,
        }
    }

    /// 评估单个候选 (纯函数: 候选快照 + 只读模型)
    fn evaluate(&self, target: &SolveTarget, dimensions: Dimensions, profile_id: &str) -> Candidate {
        let request = target.candidate_request(dimensions, profile_id);
        let validation = self
            .engine
            .validate_request(&request, ValidateOptions::default());
        let score = candidate_score(target, &dimensions, profile_id, &validation);
        let triggered = self.engine.triggered_rules(&request);

        tracing::trace!(
            width = ?dimensions.width,
            height = ?dimensions.height,
            depth = ?dimensions.depth,
            profile_id,
            score,
            "候选已评估"
        );

        Candidate {
            profile_id: profile_id.to_string(),
            snapshot: request.snapshot,
            validation,
            score,
            triggered,
        }
    }
}

/// 按 宽 -> 高 -> 深 -> 型材 嵌套顺序准入前 limit 个组合
fn admit<'a>(
    widths: &'a [f64],
    heights: &'a [f64],
    depths: &'a [f64],
    profiles: &'a [String],
    limit: usize,
) -> Vec<(Dimensions, &'a str)> {
    widths
        .iter()
        .flat_map(move |w| {
            heights.iter().flat_map(move |h| {
                depths.iter().flat_map(move |d| {
                    profiles
                        .iter()
                        .map(move |p| (Dimensions::new(*w, *h, *d), p.as_str()))
                })
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admission_follows_nesting_order_and_cap() {
        let profiles = vec!["a".to_string(), "b".to_string()];
        let admitted = admit(&[1.0, 2.0], &[10.0], &[100.0, 200.0], &profiles, 5);
        let seen: Vec<(f64, f64, &str)> = admitted
            .iter()
            .map(|(d, p)| (d.width.unwrap_or_default(), d.depth.unwrap_or_default(), *p))
            .collect();
        assert_eq!(
            seen,
            vec![
                (1.0, 100.0, "a"),
                (1.0, 100.0, "b"),
                (1.0, 200.0, "a"),
                (1.0, 200.0, "b"),
                (2.0, 100.0, "a"),
            ]
        );

        assert!(admit(&[1.0], &[1.0], &[1.0], &profiles, 0).is_empty());
    }
}
