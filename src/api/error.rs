// ==========================================
// 模块化结构配置器 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 将启动期/解析期错误转换为可读消息
// 说明: 校验与求解本身不会失败, 这里只覆盖边界问题
// ==========================================

use crate::config::error::ConfigError;
use crate::contracts::ContractError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求体不是合法 JSON
    #[error("无效的 JSON 请求体: {0}")]
    InvalidJson(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 启动期错误 (进程不可对外服务)
    // ==========================================
    #[error("配置不可用: {0}")]
    ConfigUnavailable(String),

    #[error("合同不可用: {0}")]
    ContractUnavailable(String),

    #[error("约束模型不可用: {0}")]
    ModelUnavailable(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 对外错误码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ConfigUnavailable(_) => "CONFIG_UNAVAILABLE",
            ApiError::ContractUnavailable(_) => "CONTRACT_UNAVAILABLE",
            ApiError::ModelUnavailable(_) => "MODEL_UNAVAILABLE",
            ApiError::InternalError(_) | ApiError::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// 转换为对外错误体
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

// ==========================================
// 从下层错误转换
// ==========================================
impl From<ContractError> for ApiError {
    fn from(err: ContractError) -> Self {
        ApiError::ContractUnavailable(err.to_string())
    }
}

/// 配置文件/环境变量问题; 约束模型加载失败由 bootstrap 显式映射为 ModelUnavailable
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigUnavailable(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 对外错误体 `{code, message}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApiError::InvalidJson("x".to_string()).code(), "INVALID_JSON");
        let err: ApiError = ContractError::Missing("a.json".to_string()).into();
        assert_eq!(err.code(), "CONTRACT_UNAVAILABLE");
        assert!(err.to_body().message.contains("a.json"));

        let err: ApiError = ConfigError::ParseError {
            path: "configurator.json".to_string(),
            message: "expected value".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::ConfigUnavailable(_)));
        assert_eq!(err.code(), "CONFIG_UNAVAILABLE");
        assert!(err.to_body().message.contains("configurator.json"));

        let err: ApiError = anyhow::anyhow!("boom").into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_eq!(err.to_string(), "boom");
    }
}
