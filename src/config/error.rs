// ==========================================
// 模块化结构配置器 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 配置错误只在启动期出现, 启动即失败, 不降级
// ==========================================

use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 文件相关错误 =====
    #[error("配置文件读取失败 ({path}): {message}")]
    FileReadError { path: String, message: String },

    #[error("配置文件解析失败 ({path}): {message}")]
    ParseError { path: String, message: String },

    // ===== 约束模型错误 =====
    #[error("约束模型无效: {0}")]
    InvalidModel(String),

    #[error("规则定义无效 (rule: {rule_id}): {message}")]
    InvalidRule { rule_id: String, message: String },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
