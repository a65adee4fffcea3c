// ==========================================
// 模块化结构配置器 - 配置快照
// ==========================================
// 职责: 定义规范化快照 (Snapshot) 并提供输入规范化
// 红线: stateId 永远是合法 UUID; 非法/缺失时重新生成
// 红线: 规范化必须幂等 (对自身输出再次规范化结果不变)
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::{Uuid, Variant};

/// BOM 中表示型材的物料前缀
pub const PROFILE_ARTICLE_PREFIX: &str = "profile_";

// ==========================================
// Dimensions - 主尺寸 (mm)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
}

impl Dimensions {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            depth: Some(depth),
        }
    }
}

// ==========================================
// BomLine - 物料清单行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl BomLine {
    /// 物料是否为型材
    pub fn is_profile(&self) -> bool {
        self.article
            .as_deref()
            .map(|a| a.starts_with(PROFILE_ARTICLE_PREFIX))
            .unwrap_or(false)
    }
}

// ==========================================
// VersionTag - 模型版本标签 (预留, 核心不做版本匹配)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionTag {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_version: Option<String>,
}

// ==========================================
// Snapshot - 规范化配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state_id: Uuid,

    pub dimensions: Dimensions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bom: Option<Vec<BomLine>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_tag: Option<VersionTag>,
}

impl Snapshot {
    /// 求解器候选使用的最小快照: 三个尺寸 + 单行型材 BOM
    pub fn candidate(dimensions: Dimensions, profile_id: &str) -> Self {
        Self {
            state_id: Uuid::new_v4(),
            dimensions,
            bom: Some(vec![BomLine {
                article: Some(profile_id.to_string()),
                qty: Some(1.0),
                uom: Some("pcs".to_string()),
                comment: Some("candidate profile".to_string()),
            }]),
            graph: None,
            version_tag: None,
        }
    }

    /// 将任意形状的输入规范化为快照
    ///
    /// # 规则
    /// - 非对象输入按空对象处理
    /// - `dimensions` 为对象时取其字段, 否则取顶层 width/height/depth
    /// - 数值字段: 有限数字或可解析的数字字符串, 其余视为未指定
    /// - `bom` 中非对象条目被丢弃, 类型不符的字段视为未指定
    /// - `versionTag` 只保留字符串类型的四个版本字段
    pub fn normalize(input: &Value) -> Self {
        let empty = Map::new();
        let src = input.as_object().unwrap_or(&empty);

        let dims_src = match src.get("dimensions") {
            Some(Value::Object(d)) => d,
            _ => src,
        };

        let dimensions = Dimensions {
            width: dims_src.get("width").and_then(as_number),
            height: dims_src.get("height").and_then(as_number),
            depth: dims_src.get("depth").and_then(as_number),
        };

        let bom = match src.get("bom") {
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|item| BomLine {
                        article: item.get("article").and_then(as_string),
                        qty: item.get("qty").and_then(as_number),
                        uom: item.get("uom").and_then(as_string),
                        comment: item.get("comment").and_then(as_string),
                    })
                    .collect(),
            ),
            _ => None,
        };

        let graph = match src.get("graph") {
            Some(Value::Object(g)) => Some(g.clone()),
            _ => None,
        };

        let version_tag = match src.get("versionTag") {
            Some(Value::Object(tag)) => Some(VersionTag {
                catalog_version: tag.get("catalogVersion").and_then(as_string),
                rules_version: tag.get("rulesVersion").and_then(as_string),
                pricing_version: tag.get("pricingVersion").and_then(as_string),
                assets_version: tag.get("assetsVersion").and_then(as_string),
            }),
            _ => None,
        };

        Self {
            state_id: ensure_uuid(src.get("stateId")),
            dimensions,
            bom,
            graph,
            version_tag,
        }
    }

    /// BOM 中第一条型材物料
    pub fn bom_profile(&self) -> Option<&str> {
        self.bom
            .as_ref()?
            .iter()
            .find(|line| line.is_profile())
            .and_then(|line| line.article.as_deref())
    }

    /// 序列化为 JSON 值 (用于合同校验)
    pub fn to_value(&self) -> Value {
        // 所有字段都是可序列化的普通数据, 失败时退化为 Null 由合同校验报告
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// 对外暴露的规范化入口
pub fn normalize_snapshot_like_input(input: &Value) -> Snapshot {
    Snapshot::normalize(input)
}

// ==========================================
// 输入解析辅助函数
// ==========================================

/// 宽松数值解析: 有限数字或数字字符串
pub fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }?;

    if n.is_finite() {
        Some(n)
    } else {
        None
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

/// 校验 UUID 字符串: 连字符格式 + RFC 4122 变体 + 版本 1..8
pub fn is_valid_uuid(raw: &str) -> bool {
    if raw.len() != 36 {
        return false;
    }
    match Uuid::parse_str(raw) {
        Ok(id) => {
            (1..=8).contains(&id.get_version_num()) && id.get_variant() == Variant::RFC4122
        }
        Err(_) => false,
    }
}

/// 取合法 UUID, 否则生成新的 v4 UUID
pub fn ensure_uuid(value: Option<&Value>) -> Uuid {
    match value.and_then(Value::as_str) {
        Some(raw) if is_valid_uuid(raw) => Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::new_v4()),
        _ => Uuid::new_v4(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_nested_dimensions() {
        let s = Snapshot::normalize(&json!({
            "dimensions": { "width": 1000, "height": "2000", "depth": "abc" }
        }));
        assert_eq!(s.dimensions.width, Some(1000.0));
        assert_eq!(s.dimensions.height, Some(2000.0));
        assert_eq!(s.dimensions.depth, None);
    }

    #[test]
    fn test_normalize_top_level_dimensions() {
        let s = Snapshot::normalize(&json!({ "width": 1200, "height": 2100, "depth": 350 }));
        assert_eq!(s.dimensions, Dimensions::new(1200.0, 2100.0, 350.0));
    }

    #[test]
    fn test_non_object_input_degrades() {
        let s = Snapshot::normalize(&json!([1, 2, 3]));
        assert_eq!(s.dimensions, Dimensions::default());
        assert!(s.bom.is_none());
        assert!(s.graph.is_none());
    }

    #[test]
    fn test_state_id_kept_or_generated() {
        let id = "3f2b8c1e-9a4d-4e6b-8c2a-1d5e7f9a0b3c";
        let s = Snapshot::normalize(&json!({ "stateId": id }));
        assert_eq!(s.state_id.to_string(), id);

        // 版本位为 0, 不是合法 UUID
        let s = Snapshot::normalize(&json!({ "stateId": "a0000000-0000-0000-0000-000000000001" }));
        assert_ne!(s.state_id.to_string(), "a0000000-0000-0000-0000-000000000001");

        let s = Snapshot::normalize(&json!({ "stateId": 42 }));
        assert!(is_valid_uuid(&s.state_id.to_string()));
    }

    #[test]
    fn test_bom_filtering() {
        let s = Snapshot::normalize(&json!({
            "bom": [
                { "article": "profile_40x40", "qty": 2, "uom": "pcs", "comment": "main" },
                "garbage",
                null,
                { "article": 7, "qty": "x", "uom": "mm" }
            ]
        }));
        let bom = s.bom.as_ref().unwrap();
        assert_eq!(bom.len(), 2);
        assert_eq!(bom[0].article.as_deref(), Some("profile_40x40"));
        assert_eq!(bom[1].article, None);
        assert_eq!(bom[1].qty, None);
        assert_eq!(s.bom_profile(), Some("profile_40x40"));
    }

    #[test]
    fn test_version_tag_keeps_strings_only() {
        let s = Snapshot::normalize(&json!({
            "versionTag": { "catalogVersion": "c1", "rulesVersion": 3, "extra": "x" }
        }));
        let tag = s.version_tag.unwrap();
        assert_eq!(tag.catalog_version.as_deref(), Some("c1"));
        assert_eq!(tag.rules_version, None);
    }

    #[test]
    fn test_normalize_idempotent() {
        let first = Snapshot::normalize(&json!({
            "stateId": "not-a-uuid",
            "dimensions": { "width": 1000, "height": 2000 },
            "bom": [{ "article": "profile_30x30", "qty": 1 }],
            "graph": { "nodes": [] },
            "versionTag": {}
        }));
        let second = Snapshot::normalize(&first.to_value());
        assert_eq!(first, second);
    }
}
