// ==========================================
// 模块化结构配置器 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、默认路径
// 存储: JSON 配置文件 (可选) + 环境变量
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::solver_options::SolverOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ==========================================
// 配置键 (环境变量名)
// ==========================================
pub mod config_keys {
    pub const CONFIG_PATH: &str = "CONFIGURATOR_CONFIG_PATH";
    pub const MODEL_PATH: &str = "CONFIGURATOR_MODEL_PATH";
    pub const CONTRACTS_DIR: &str = "CONFIGURATOR_CONTRACTS_DIR";
    pub const LOCALE: &str = "CONFIGURATOR_LOCALE";
    pub const MAX_SOLUTIONS: &str = "CONFIGURATOR_MAX_SOLUTIONS";
    pub const MAX_CANDIDATES: &str = "CONFIGURATOR_MAX_CANDIDATES";
    pub const DIMENSION_BREADTH: &str = "CONFIGURATOR_DIMENSION_BREADTH";
    pub const PARALLEL: &str = "CONFIGURATOR_PARALLEL";
}

pub const DEFAULT_LOCALE: &str = "en";

// ==========================================
// ConfiguratorConfig - 进程配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguratorConfig {
    /// 外部约束模型文件 (缺省使用内置模型)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// 外部合同目录 (缺省使用内置合同)
    #[serde(default)]
    pub contracts_dir: Option<PathBuf>,

    /// 消息语言
    #[serde(default = "default_locale")]
    pub locale: String,

    /// 求解器默认参数
    #[serde(default)]
    pub solver: SolverOptions,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for ConfiguratorConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            contracts_dir: None,
            locale: default_locale(),
            solver: SolverOptions::default(),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: ConfiguratorConfig,
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 加载配置
    ///
    /// # 参数
    /// - path: 显式配置文件路径; None 时使用默认路径（文件不存在则用默认值）
    ///
    /// # 顺序
    /// 1. 配置文件
    /// 2. 环境变量覆写
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let (mut config, source_path) = match path {
            Some(p) => (Self::read_file(p)?, Some(p.to_path_buf())),
            None => {
                let default_path = get_default_config_path();
                if default_path.exists() {
                    (Self::read_file(&default_path)?, Some(default_path))
                } else {
                    (ConfiguratorConfig::default(), None)
                }
            }
        };

        apply_overrides(&mut config, |key| std::env::var(key).ok());

        tracing::debug!(
            source = ?source_path,
            model_path = ?config.model_path,
            contracts_dir = ?config.contracts_dir,
            "配置已加载"
        );

        Ok(Self {
            config,
            source_path,
        })
    }

    /// 从已有配置创建（测试/嵌入使用）
    pub fn from_config(config: ConfiguratorConfig) -> Self {
        Self {
            config,
            source_path: None,
        }
    }

    pub fn config(&self) -> &ConfiguratorConfig {
        &self.config
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn solver_options(&self) -> SolverOptions {
        self.config.solver
    }

    fn read_file(path: &Path) -> ConfigResult<ConfiguratorConfig> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: display.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: display,
            message: e.to_string(),
        })
    }
}

/// 应用环境变量覆写
///
/// 无法解析的值记录警告后忽略
pub fn apply_overrides(config: &mut ConfiguratorConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(v) = get(config_keys::MODEL_PATH) {
        config.model_path = Some(PathBuf::from(v));
    }
    if let Some(v) = get(config_keys::CONTRACTS_DIR) {
        config.contracts_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = get(config_keys::LOCALE) {
        config.locale = v;
    }

    let parse_usize = |key: &str| -> Option<usize> {
        let raw = get(key)?;
        match raw.parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，忽略");
                None
            }
        }
    };

    if let Some(n) = parse_usize(config_keys::MAX_SOLUTIONS) {
        config.solver.max_solutions = n;
    }
    if let Some(n) = parse_usize(config_keys::MAX_CANDIDATES) {
        config.solver.max_candidates = n;
    }
    if let Some(n) = parse_usize(config_keys::DIMENSION_BREADTH) {
        config.solver.dimension_breadth = n;
    }
    if let Some(v) = get(config_keys::PARALLEL) {
        config.solver.parallel = is_true(&v);
    }
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 默认配置文件路径
///
/// 优先级: 环境变量 CONFIGURATOR_CONFIG_PATH > 用户配置目录 > 当前目录
pub fn get_default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(config_keys::CONFIG_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::config_dir() {
        Some(dir) => dir.join("modular-configurator").join("config.json"),
        None => PathBuf::from("./configurator.json"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "locale": "zh-CN", "solver": {{ "maxCandidates": 50, "parallel": true }} }}"#
        )
        .unwrap();

        let manager = ConfigManager::load(Some(file.path())).unwrap();
        assert_eq!(manager.config().solver.max_candidates, 50);
        assert_eq!(manager.config().solver.max_solutions, 10);
        assert!(manager.solver_options().parallel);
        assert_eq!(manager.source_path(), Some(file.path()));
    }

    #[test]
    fn test_load_unparsable_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            ConfigManager::load(Some(file.path())),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_overrides_apply_and_ignore_garbage() {
        let env: HashMap<&str, &str> = [
            (config_keys::MAX_SOLUTIONS, "4"),
            (config_keys::MAX_CANDIDATES, "many"),
            (config_keys::PARALLEL, "on"),
            (config_keys::MODEL_PATH, "  /tmp/model.json "),
            (config_keys::LOCALE, ""),
        ]
        .into_iter()
        .collect();

        let mut config = ConfiguratorConfig::default();
        apply_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.solver.max_solutions, 4);
        assert_eq!(config.solver.max_candidates, 200);
        assert!(config.solver.parallel);
        assert_eq!(config.model_path, Some(PathBuf::from("/tmp/model.json")));
        assert_eq!(config.locale, DEFAULT_LOCALE);
    }
}
