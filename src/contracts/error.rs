use thiserror::Error;

/// 合同 (JSON Schema) 加载错误
///
/// 全部为启动期致命错误: 合同不可用时进程不得对外服务
#[derive(Error, Debug, Clone)]
pub enum ContractError {
    #[error("合同文件缺失: {0}")]
    Missing(String),

    #[error("合同文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("合同解析失败 ({name}): {message}")]
    ParseError { name: String, message: String },

    #[error("合同缺少 $id: {0}")]
    MissingId(String),

    #[error("合同定义无效 ({name}): {message}")]
    InvalidSchema { name: String, message: String },
}

pub type ContractResult<T> = Result<T, ContractError>;
