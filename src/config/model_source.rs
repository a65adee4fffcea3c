// ==========================================
// 模块化结构配置器 - 目录/规则来源 Trait
// ==========================================
// 职责: 定义约束模型的读取接口（不包含评估逻辑）
// 红线: 模型加载失败即启动失败, 不静默降级
// ==========================================

use crate::config::constraint_model::ConstraintModel;
use crate::config::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

// ==========================================
// ConstraintModelSource Trait
// ==========================================
// 实现者: StaticModelSource（内置模型）、JsonFileModelSource（外部 JSON 文件）
pub trait ConstraintModelSource: Send + Sync {
    /// 来源描述（用于日志）
    fn describe(&self) -> String;

    /// 加载约束模型
    ///
    /// # 返回
    /// - Ok(ConstraintModel): 已通过自检的模型
    /// - Err(ConfigError): 读取/解析/自检失败
    fn load(&self) -> ConfigResult<ConstraintModel>;
}

// ==========================================
// StaticModelSource - 内置默认模型
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StaticModelSource;

impl ConstraintModelSource for StaticModelSource {
    fn describe(&self) -> String {
        "builtin".to_string()
    }

    fn load(&self) -> ConfigResult<ConstraintModel> {
        let model = ConstraintModel::default_model();
        model.check()?;
        Ok(model)
    }
}

// ==========================================
// JsonFileModelSource - JSON 文件模型
// ==========================================
#[derive(Debug, Clone)]
pub struct JsonFileModelSource {
    path: PathBuf,
}

impl JsonFileModelSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConstraintModelSource for JsonFileModelSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn load(&self) -> ConfigResult<ConstraintModel> {
        let path = self.path.display().to_string();
        let raw = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let model: ConstraintModel =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path,
                message: e.to_string(),
            })?;

        model.check()?;
        tracing::info!(
            source = %self.describe(),
            rules = model.rules.len(),
            profiles = model.catalog.profiles.len(),
            "约束模型已加载"
        );
        Ok(model)
    }
}

/// 根据可选路径选择模型来源
pub fn model_source_for(path: Option<&Path>) -> Box<dyn ConstraintModelSource> {
    match path {
        Some(p) => Box::new(JsonFileModelSource::new(p)),
        None => Box::new(StaticModelSource),
    }
}
