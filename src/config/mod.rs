// ==========================================
// 模块化结构配置器 - 配置层
// ==========================================
// 职责: 约束模型、模型来源、求解参数、进程配置
// 红线: 约束模型进程级只读
// ==========================================

pub mod config_manager;
pub mod constraint_model;
pub mod error;
pub mod model_source;
pub mod solver_options;

// 重导出核心配置类型
pub use config_manager::{config_keys, ConfigManager, ConfiguratorConfig};
pub use constraint_model::{
    AttributeDomains, Catalog, Condition, ConditionValue, ConstraintModel, EnumDomain,
    NumericDomain, Rule, RuleKind,
};
pub use error::{ConfigError, ConfigResult};
pub use model_source::{
    model_source_for, ConstraintModelSource, JsonFileModelSource, StaticModelSource,
};
pub use solver_options::SolverOptions;
