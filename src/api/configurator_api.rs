// ==========================================
// 模块化结构配置器 - 配置器 API
// ==========================================
// 职责: 校验、反向求解、方案生成、健康检查的请求/响应门面
// 说明: 不含传输层, 调用方负责把请求体交给这里
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_manager::ConfiguratorConfig;
use crate::config::model_source::model_source_for;
use crate::config::solver_options::SolverOptions;
use crate::contracts;
use crate::domain::snapshot::BomLine;
use crate::domain::solution::{RelaxationHint, SolveResult};
use crate::domain::validation::ValidationResultItem;
use crate::engine::reverse_solver::ReverseSolver;
use crate::engine::rule_evaluator::{ValidateOptions, ValidationEngine};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use uuid::Uuid;

/// 方案生成固定的方案数量
pub const GENERATE_MAX_SOLUTIONS: usize = 3;

/// 方案生成固定的尺寸邻域宽度
pub const GENERATE_DIMENSION_BREADTH: usize = 2;

/// 按名次排列的方案标签
const SOLUTION_LABELS: [&str; 3] = ["economic", "balanced", "reinforced"];
const FALLBACK_LABEL: &str = "balanced";

// ==========================================
// 响应类型
// ==========================================

/// 校验响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateResponse {
    /// 不含 error 条目时为 true
    pub valid: bool,
    pub items: Vec<ValidationResultItem>,
}

/// 生成的单个方案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSolution {
    pub configuration_id: Uuid,

    #[serde(rename = "type")]
    pub solution_type: String,

    pub structure_graph: Map<String, Value>,

    pub bom: Vec<BomLine>,

    pub validation_state: Vec<ValidationResultItem>,
}

/// 方案生成响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSolutionsResponse {
    pub solutions: Vec<GeneratedSolution>,
    pub exact_match: bool,
    pub relaxation_hints: Vec<RelaxationHint>,
}

/// 健康检查响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

// ==========================================
// ConfiguratorApi - 配置器 API
// ==========================================

/// 配置器API
///
/// 职责：
/// 1. 配置校验 (只返回非 pass 条目)
/// 2. 反向求解 (返回完整 SolveResult)
/// 3. 方案生成 (带标签的 3 个方案)
/// 4. 健康检查
#[derive(Clone)]
pub struct ConfiguratorApi {
    solver: ReverseSolver,
    defaults: SolverOptions,
}

impl ConfiguratorApi {
    /// 创建新的ConfiguratorApi实例
    pub fn new(engine: ValidationEngine, defaults: SolverOptions) -> Self {
        Self {
            solver: ReverseSolver::new(engine),
            defaults,
        }
    }

    /// 按进程配置装配: 加载约束模型, 初始化合同
    ///
    /// # 返回
    /// - Err(ApiError::ModelUnavailable): 模型来源读取/自检失败
    /// - Err(ApiError::ContractUnavailable): 合同缺失或无法编译
    pub fn bootstrap(config: &ConfiguratorConfig) -> ApiResult<Self> {
        let source = model_source_for(config.model_path.as_deref());
        let model = source
            .load()
            .map_err(|e| ApiError::ModelUnavailable(e.to_string()))?;
        let contract_set = contracts::init(config.contracts_dir.as_deref())?;

        tracing::info!(
            model_source = %source.describe(),
            contracts = %contract_set.origin(),
            rules = model.rules.len(),
            profiles = model.catalog.profiles.len(),
            "配置器已装配"
        );

        let engine = ValidationEngine::new(Arc::new(model), contract_set);
        Ok(Self::new(engine, config.solver))
    }

    pub fn defaults(&self) -> SolverOptions {
        self.defaults
    }

    pub fn engine(&self) -> &ValidationEngine {
        self.solver.engine()
    }

    // ==========================================
    // 校验
    // ==========================================

    /// 校验配置
    pub fn validate(&self, body: &Value) -> ValidateResponse {
        let items = self
            .engine()
            .validate(body, ValidateOptions::without_pass());
        let valid = !items.iter().any(|i| i.is_error());
        ValidateResponse { valid, items }
    }

    pub fn validate_json(&self, raw: &str) -> ApiResult<ValidateResponse> {
        Ok(self.validate(&parse_body(raw)?))
    }

    // ==========================================
    // 反向求解
    // ==========================================

    /// 反向求解 (使用默认参数)
    pub fn solve(&self, body: &Value) -> SolveResult {
        self.solve_with(body, self.defaults)
    }

    pub fn solve_with(&self, body: &Value, options: SolverOptions) -> SolveResult {
        self.solver.solve(body, options)
    }

    pub fn solve_json(&self, raw: &str) -> ApiResult<SolveResult> {
        Ok(self.solve(&parse_body(raw)?))
    }

    // ==========================================
    // 方案生成
    // ==========================================

    /// 生成方案
    ///
    /// # 参数
    /// - body: `{requirements: {...}}` 或直接为类快照对象
    ///
    /// # 返回
    /// 至多 3 个方案, 依名次标记 economic / balanced / reinforced
    pub fn generate_solutions(&self, body: &Value) -> GenerateSolutionsResponse {
        let params = requirements_of(body);
        let options = self
            .defaults
            .with_max_solutions(GENERATE_MAX_SOLUTIONS)
            .with_dimension_breadth(GENERATE_DIMENSION_BREADTH);
        let result = self.solver.solve(params, options);

        let solutions = result
            .solutions
            .into_iter()
            .enumerate()
            .map(|(i, ranked)| GeneratedSolution {
                configuration_id: ranked.snapshot.state_id,
                solution_type: SOLUTION_LABELS
                    .get(i)
                    .copied()
                    .unwrap_or(FALLBACK_LABEL)
                    .to_string(),
                structure_graph: ranked.snapshot.graph.unwrap_or_default(),
                bom: ranked.snapshot.bom.unwrap_or_default(),
                validation_state: ranked.validation,
            })
            .collect();

        GenerateSolutionsResponse {
            solutions,
            exact_match: result.exact_match,
            relaxation_hints: result.relaxation_hints,
        }
    }

    pub fn generate_solutions_json(&self, raw: &str) -> ApiResult<GenerateSolutionsResponse> {
        Ok(self.generate_solutions(&parse_body(raw)?))
    }

    // ==========================================
    // 健康检查
    // ==========================================

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// 取出 requirements (缺失/null/false 时使用整个请求体)
fn requirements_of(body: &Value) -> &Value {
    match body.get("requirements") {
        Some(Value::Null) | Some(Value::Bool(false)) | None => body,
        Some(inner) => inner,
    }
}

fn parse_body(raw: &str) -> ApiResult<Value> {
    serde_json::from_str(raw).map_err(|e| ApiError::InvalidJson(e.to_string()))
}
