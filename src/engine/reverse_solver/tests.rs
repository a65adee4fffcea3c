use super::{ReverseSolver, SolveTarget, RELAX_PRIMARY_DIMENSIONS, RELAX_WIDTH_STEP};
use crate::config::constraint_model::ConstraintModel;
use crate::config::solver_options::SolverOptions;
use crate::domain::solution::SolveResult;
use crate::domain::types::ValidationStatus;
use crate::engine::rule_evaluator::ValidationEngine;
use serde_json::{json, Value};
use std::sync::Arc;

// ==========================================
// 测试辅助函数
// ==========================================

fn solver() -> ReverseSolver {
    let engine =
        ValidationEngine::with_global_contracts(Arc::new(ConstraintModel::default_model())).unwrap();
    ReverseSolver::new(engine)
}

fn solve(input: Value) -> SolveResult {
    solver().solve(&input, SolverOptions::default())
}

fn hint_codes(result: &SolveResult) -> Vec<&str> {
    result
        .relaxation_hints
        .iter()
        .map(|h| h.code.as_str())
        .collect()
}

/// 去除随机 stateId 后的可比较摘要
fn summary(result: &SolveResult) -> Vec<(usize, f64, String, Option<f64>, Option<f64>, Option<f64>)> {
    result
        .solutions
        .iter()
        .map(|s| {
            let d = s.snapshot.dimensions;
            (s.rank, s.score, s.profile_id.clone(), d.width, d.height, d.depth)
        })
        .collect()
}

// ==========================================
// 正常案例
// ==========================================

#[test]
fn test_feasible_target_is_exact() {
    let result = solve(json!({ "width": 1000, "height": 2000, "depth": 300 }));

    assert!(result.evaluated_candidates > 0);
    assert!(result.exact_match);
    assert!(result.relaxation_hints.is_empty());
    assert_eq!(result.solutions.len(), 10);

    for s in &result.solutions {
        assert!(s.validation.iter().all(|v| v.status != ValidationStatus::Error));
        assert!(s.validation.iter().all(|v| v.status != ValidationStatus::Pass));
    }
    for pair in result.solutions.windows(2) {
        assert!(pair[0].score <= pair[1].score);
    }
    let ranks: Vec<usize> = result.solutions.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, (1..=10).collect::<Vec<_>>());
    assert_eq!(result.solutions[0].score, 0.0);
}

#[test]
fn test_heavy_load_exact_only_with_reinforced_profile() {
    let result = solve(json!({ "width": 1000, "height": 2000, "depth": 300, "load": 500 }));
    assert!(result.exact_match);

    let best = &result.solutions[0];
    assert_eq!(best.profile_id, "profile_40x40");
    assert_eq!(best.score, 0.0);
    assert_eq!(best.snapshot.dimensions.width, Some(1000.0));
    assert_eq!(best.snapshot.dimensions.height, Some(2000.0));
    assert_eq!(best.snapshot.dimensions.depth, Some(300.0));

    // 淘汰含 error 的候选: 30x30 在重载下全部被排除
    assert!(result
        .solutions
        .iter()
        .all(|s| s.profile_id == "profile_40x40"));
}

#[test]
fn test_infeasible_profile_produces_hints() {
    let result = solve(json!({
        "dimensions": { "width": 1000, "height": 2000, "depth": 300 },
        "load": 500,
        "selectedProfile": "profile_30x30"
    }));

    assert!(!result.exact_match);
    assert!(result.solutions.is_empty());
    assert_eq!(result.evaluated_candidates, 200);
    assert_eq!(hint_codes(&result), vec!["select_profile_40x40", RELAX_WIDTH_STEP]);
}

#[test]
fn test_satisfied_hard_rule_still_yields_profile_hint() {
    // hr1 条件成立但已选 40x40, 条目为 pass; 仍视为触发
    let result = solve(json!({
        "width": 1005,
        "height": 2000,
        "depth": 300,
        "load": 500,
        "selectedProfile": "profile_40x40"
    }));

    assert!(!result.exact_match);
    assert!(!result.solutions.is_empty());
    assert_eq!(hint_codes(&result), vec!["select_profile_40x40", RELAX_WIDTH_STEP]);
}

#[test]
fn test_toilet_with_shallow_depth_suggests_raise() {
    let result = solve(json!({
        "width": 1000,
        "height": 2000,
        "depth": 200,
        "equipmentModules": ["toilet"]
    }));

    assert!(!result.exact_match);
    assert!(!result.solutions.is_empty());
    assert_eq!(
        hint_codes(&result),
        vec!["raise_depth_for_toilet", RELAX_WIDTH_STEP]
    );
}

#[test]
fn test_nested_and_top_level_dimensions_are_equivalent() {
    let nested = solve(json!({ "dimensions": { "width": 1200, "height": 2100, "depth": 400 } }));
    let flat = solve(json!({ "width": 1200, "height": 2100, "depth": 400 }));
    assert_eq!(summary(&nested), summary(&flat));
}

// ==========================================
// 求解参数
// ==========================================

#[test]
fn test_max_candidates_caps_evaluation() {
    let options = SolverOptions::default().with_max_candidates(5);
    let result = solver().solve(&json!({ "width": 1000 }), options);
    assert_eq!(result.evaluated_candidates, 5);

    let options = SolverOptions::default().with_max_candidates(0);
    let result = solver().solve(&json!({}), options);
    assert_eq!(result.evaluated_candidates, 0);
    assert!(!result.exact_match);
    assert_eq!(hint_codes(&result), vec![RELAX_PRIMARY_DIMENSIONS]);
}

#[test]
fn test_max_solutions_truncates() {
    let options = SolverOptions::default().with_max_solutions(3);
    let result = solver().solve(&json!({ "width": 1000, "height": 2000, "depth": 300 }), options);
    assert_eq!(result.solutions.len(), 3);
    assert_eq!(result.solutions[2].rank, 3);
}

#[test]
fn test_small_catalog_space_is_fully_enumerated() {
    // 宽度 breadth=0: {中心, min, max}; 3*3*3*2 = 54 < 200
    let options = SolverOptions::default().with_dimension_breadth(0);
    let result = solver().solve(&json!({ "width": 1000, "height": 2000, "depth": 300 }), options);
    assert_eq!(result.evaluated_candidates, 54);
}

#[test]
fn test_parallel_matches_sequential() {
    let input = json!({ "width": 1005, "height": 2000, "depth": 250, "load": 450 });
    let sequential = solver().solve(&input, SolverOptions::default());
    let parallel = solver().solve(&input, SolverOptions::default().with_parallel(true));

    assert_eq!(sequential.evaluated_candidates, parallel.evaluated_candidates);
    assert_eq!(sequential.exact_match, parallel.exact_match);
    assert_eq!(summary(&sequential), summary(&parallel));
    assert_eq!(sequential.relaxation_hints, parallel.relaxation_hints);
}

#[test]
fn test_target_profile_from_profile_id() {
    let target = SolveTarget::from_value(&json!({ "profileId": "profile_40x40", "load": "450" }));
    assert_eq!(target.profile.as_deref(), Some("profile_40x40"));
    assert_eq!(target.load, Some(450.0));

    let target = SolveTarget::from_value(&json!({
        "bom": [{ "article": "profile_40x40", "qty": 1, "uom": "pcs" }]
    }));
    // BOM 不视为显式目标型材
    assert_eq!(target.profile, None);
}
