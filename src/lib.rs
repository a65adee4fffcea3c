// ==========================================
// 模块化结构配置器 - 核心库
// ==========================================
// 系统定位: 模块化结构产品的规则校验与反向求解
// 组成: 约束模型 + 合同校验 + 规则评估 + 候选生成 + 反向求解
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 快照、请求、结果项
pub mod domain;

// 配置层 - 约束模型与进程配置
pub mod config;

// 合同层 - JSON 合同校验
pub mod contracts;

// 引擎层 - 规则评估与反向求解
pub mod engine;

// API 层 - 请求/响应门面
pub mod api;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 性能观测
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AffectedKind, ConditionOperator, NumericAttribute, RuleClass, ValidationStatus,
};

// 领域实体
pub use domain::{
    Candidate, ConfigurationRequest, RankedCandidate, RelaxationHint, Snapshot, SolveResult,
    ValidationResultItem,
};

// 配置
pub use config::{ConfigManager, ConfiguratorConfig, ConstraintModel, SolverOptions};

// 引擎
pub use engine::{CandidateGenerator, ReverseSolver, SolveTarget, ValidateOptions, ValidationEngine};

// API
pub use api::{ApiError, ConfiguratorApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "modular-configurator";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
