// ==========================================
// 模块化结构配置器 - 合同编译与校验
// ==========================================
// 职责: 将合同定义编译为 jsonschema 校验器, 输出结构违规列表
// 说明: 草案版本由合同的 $schema 决定; format 关键字参与校验
// ==========================================

use crate::contracts::error::{ContractError, ContractResult};
use crate::domain::snapshot::is_valid_uuid;
use jsonschema::{ValidationError, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

// ==========================================
// SchemaViolation - 结构违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaViolation {
    /// 实例路径 (JSON Pointer, 根为空串)
    pub path: String,
    pub message: String,
    pub keyword: String,
    /// 合同内路径 (如 `#/properties/dimensions/required`)
    pub schema_path: String,
}

impl SchemaViolation {
    /// 对外显示的路径, 根路径显示为 `/`
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() {
            "/"
        } else {
            &self.path
        }
    }

    fn from_error(error: &ValidationError<'_>) -> Self {
        let schema_path = error.schema_path.to_string();
        Self {
            path: error.instance_path.to_string(),
            message: error.to_string(),
            keyword: keyword_of(&schema_path),
            schema_path: format!("#{}", schema_path),
        }
    }
}

/// 合同路径中最后一个非下标段即为关键字
fn keyword_of(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .find(|seg| !seg.is_empty() && !seg.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or_default()
        .to_string()
}

// ==========================================
// CompiledSchema - 编译后的合同
// ==========================================
#[derive(Clone)]
pub struct CompiledSchema {
    name: String,
    id: String,
    validator: Arc<Validator>,
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}

impl CompiledSchema {
    /// 编译合同文本
    ///
    /// # 参数
    /// - name: 合同名 (文件名, 用于错误信息)
    /// - raw: 合同 JSON 文本
    ///
    /// # 返回
    /// - Err(ParseError): 不是合法 JSON
    /// - Err(MissingId): 缺少 `$id`
    /// - Err(InvalidSchema): 不符合其元模式
    pub fn compile(name: &str, raw: &str) -> ContractResult<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|e| ContractError::ParseError {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let id = value
            .get("$id")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ContractError::MissingId(name.to_string()))?
            .to_string();

        let validator = jsonschema::options()
            .should_validate_formats(true)
            .with_format("uuid", is_valid_uuid)
            .build(&value)
            .map_err(|e| ContractError::InvalidSchema {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            name: name.to_string(),
            id,
            validator: Arc::new(validator),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// 校验实例, 返回全部违规 (不在首个违规处停止)
    pub fn validate(&self, instance: &Value) -> Vec<SchemaViolation> {
        self.validator
            .iter_errors(instance)
            .map(|e| SchemaViolation::from_error(&e))
            .collect()
    }

    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}
