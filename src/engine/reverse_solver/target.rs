use crate::domain::request::ConfigurationRequest;
use crate::domain::snapshot::{Dimensions, Snapshot};
use crate::domain::types::NumericAttribute;
use serde_json::Value;

// ==========================================
// SolveTarget - 求解目标 (期望的、可能不完整的配置)
// ==========================================
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolveTarget {
    /// 显式指定的尺寸 (未指定的维度不参与距离计分)
    pub dimensions: Dimensions,
    pub load: Option<f64>,
    pub mounting_type: Option<String>,
    pub equipment_modules: Vec<String>,
    /// 显式指定的型材 (selectedProfile > profileId), 缺省时搜索整个目录
    pub profile: Option<String>,
}

impl SolveTarget {
    /// 解析原始输入 (尺寸可嵌套在 dimensions 下, 也可位于顶层)
    pub fn from_value(input: &Value) -> Self {
        Self::from_request(&ConfigurationRequest::from_value(input))
    }

    pub fn from_request(request: &ConfigurationRequest) -> Self {
        Self {
            dimensions: request.snapshot.dimensions,
            load: request.load,
            mounting_type: request.mounting_type.clone(),
            equipment_modules: request.equipment_modules.clone(),
            profile: request
                .selected_profile
                .clone()
                .or_else(|| request.profile_id.clone()),
        }
    }

    pub fn dimension(&self, attr: NumericAttribute) -> Option<f64> {
        match attr {
            NumericAttribute::Width => self.dimensions.width,
            NumericAttribute::Height => self.dimensions.height,
            NumericAttribute::Depth => self.dimensions.depth,
            NumericAttribute::Load => self.load,
        }
    }

    /// 构造候选评估请求: 最小快照 + 目标的非尺寸字段
    pub fn candidate_request(&self, dimensions: Dimensions, profile_id: &str) -> ConfigurationRequest {
        ConfigurationRequest {
            snapshot: Snapshot::candidate(dimensions, profile_id),
            load: self.load,
            mounting_type: self.mounting_type.clone(),
            equipment_modules: self.equipment_modules.clone(),
            selected_profile: Some(profile_id.to_string()),
            profile_id: None,
        }
    }
}
