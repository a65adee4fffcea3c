// ==========================================
// 模块化结构配置器 - API 层
// ==========================================
// 职责: 提供请求/响应接口, 供命令行或宿主进程调用
// ==========================================

pub mod configurator_api;
pub mod error;

// 重导出核心类型
pub use configurator_api::{
    ConfiguratorApi, GenerateSolutionsResponse, GeneratedSolution, HealthResponse,
    ValidateResponse, GENERATE_DIMENSION_BREADTH, GENERATE_MAX_SOLUTIONS,
};
pub use error::{ApiError, ApiResult, ErrorBody};
