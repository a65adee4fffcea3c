// ==========================================
// 模块化结构配置器 - 请求解析与评估上下文
// ==========================================
// 职责: 在唯一边界将松散输入解析为强类型请求
// 红线: 引擎内部不再探测原始 JSON 字段
// ==========================================

use crate::domain::snapshot::{as_number, Snapshot};
use serde_json::Value;

// ==========================================
// ConfigurationRequest - 解析后的请求
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationRequest {
    /// 规范化快照
    pub snapshot: Snapshot,

    /// 载荷 (kg)
    pub load: Option<f64>,

    /// 安装方式 (原样保留, 非字符串值转为其 JSON 文本)
    pub mounting_type: Option<String>,

    /// 设备模块 (单值包装为列表, 非字符串条目丢弃)
    pub equipment_modules: Vec<String>,

    /// 显式选择的型材
    pub selected_profile: Option<String>,

    /// 兼容字段: 型材 ID
    pub profile_id: Option<String>,
}

impl ConfigurationRequest {
    /// 解析原始输入 (永不失败, 未知形状降级为空请求)
    pub fn from_value(input: &Value) -> Self {
        let snapshot = Snapshot::normalize(input);

        let (load, mounting_type, equipment_modules, selected_profile, profile_id) =
            match input.as_object() {
                Some(src) => (
                    src.get("load").and_then(as_number),
                    src.get("mountingType").and_then(mounting_type_text),
                    src.get("equipmentModules")
                        .map(string_list)
                        .unwrap_or_default(),
                    src.get("selectedProfile").and_then(non_empty_string),
                    src.get("profileId").and_then(non_empty_string),
                ),
                None => (None, None, Vec::new(), None, None),
            };

        Self {
            snapshot,
            load,
            mounting_type,
            equipment_modules,
            selected_profile,
            profile_id,
        }
    }

    /// 已选型材解析, 优先级: selectedProfile > profileId > BOM 第一条型材
    pub fn resolved_profile(&self) -> Option<String> {
        self.selected_profile
            .clone()
            .or_else(|| self.profile_id.clone())
            .or_else(|| self.snapshot.bom_profile().map(|s| s.to_string()))
    }
}

fn mounting_type_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn non_empty_string(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.to_string())
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

// ==========================================
// ContextValue - 条件求值时字段的取值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue<'a> {
    Number(f64),
    Text(&'a str),
    List(&'a [String]),
    Absent,
}

// ==========================================
// EvaluationContext - 只读评估视图
// ==========================================
// 合并快照尺寸与请求字段, 仅用于条件求值
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationContext {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub load: Option<f64>,
    pub mounting_type: Option<String>,
    pub equipment_modules: Vec<String>,
    pub selected_profile: Option<String>,
}

impl EvaluationContext {
    pub fn from_request(request: &ConfigurationRequest) -> Self {
        let dims = request.snapshot.dimensions;
        Self {
            width: dims.width,
            height: dims.height,
            depth: dims.depth,
            load: request.load,
            mounting_type: request.mounting_type.clone(),
            equipment_modules: request.equipment_modules.clone(),
            selected_profile: request.resolved_profile(),
        }
    }

    /// 按字段名取值 (规则条件与自修正动作通过字段名引用上下文)
    pub fn field(&self, name: &str) -> ContextValue<'_> {
        let number = |v: Option<f64>| v.map(ContextValue::Number).unwrap_or(ContextValue::Absent);
        match name {
            "width" => number(self.width),
            "height" => number(self.height),
            "depth" => number(self.depth),
            "load" => number(self.load),
            "mountingType" => self
                .mounting_type
                .as_deref()
                .map(ContextValue::Text)
                .unwrap_or(ContextValue::Absent),
            "selectedProfile" => self
                .selected_profile
                .as_deref()
                .map(ContextValue::Text)
                .unwrap_or(ContextValue::Absent),
            "equipmentModules" => ContextValue::List(&self.equipment_modules),
            _ => ContextValue::Absent,
        }
    }

    /// 字段的数值 (仅数值字段)
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.field(name) {
            ContextValue::Number(n) => Some(n),
            _ => None,
        }
    }
}
