// ==========================================
// 模块化结构配置器 - 规则评估引擎
// ==========================================
// 职责: 按固定顺序产出 ValidationResultItem 列表
// 输入: 任意形状的配置输入 (在唯一边界解析为 ConfigurationRequest)
// 输出: 有序结果项列表, 每项均符合结果项合同
// 红线: 结构违规与规则违规合并输出, 不因结构违规短路
// 红线: 任何输入都不导致失败, 问题一律表示为结果项
// ==========================================

use crate::config::constraint_model::ConstraintModel;
use crate::contracts::{self, ContractResult, ContractSet};
use crate::domain::request::{ConfigurationRequest, EvaluationContext};
use crate::domain::types::{NumericAttribute, RuleClass, ValidationStatus};
use crate::domain::validation::{count_status, ValidationResultItem};
use crate::perf::{self, PerfGuard};
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use super::checks::RuleChecks;

// ==========================================
// ValidateOptions - 校验选项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// 是否保留 pass 条目 (默认 true)
    pub include_pass: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self { include_pass: true }
    }
}

impl ValidateOptions {
    pub fn without_pass() -> Self {
        Self {
            include_pass: false,
        }
    }
}

// ==========================================
// ValidationEngine - 规则评估引擎
// ==========================================
// 无可变状态: 模型与合同均为只读共享, 可跨线程并发调用
#[derive(Clone)]
pub struct ValidationEngine {
    model: Arc<ConstraintModel>,
    contracts: &'static ContractSet,
}

impl ValidationEngine {
    pub fn new(model: Arc<ConstraintModel>, contracts: &'static ContractSet) -> Self {
        Self { model, contracts }
    }

    /// 使用进程级合同创建引擎
    pub fn with_global_contracts(model: Arc<ConstraintModel>) -> ContractResult<Self> {
        Ok(Self::new(model, contracts::global()?))
    }

    pub fn model(&self) -> &ConstraintModel {
        &self.model
    }

    pub fn shared_model(&self) -> Arc<ConstraintModel> {
        Arc::clone(&self.model)
    }

    pub fn contracts(&self) -> &'static ContractSet {
        self.contracts
    }

    /// 校验原始输入
    ///
    /// # 参数
    /// - input: 任意 JSON 值 (非对象按空对象处理)
    /// - options: 是否保留 pass 条目
    ///
    /// # 返回
    /// 有序结果项列表
    #[instrument(skip(self, input), fields(include_pass = options.include_pass))]
    pub fn validate(&self, input: &Value, options: ValidateOptions) -> Vec<ValidationResultItem> {
        let _perf = PerfGuard::new("validate");
        let request = ConfigurationRequest::from_value(input);
        let items = self.validate_request(&request, options);

        tracing::debug!(
            items = items.len(),
            errors = count_status(&items, ValidationStatus::Error),
            warnings = count_status(&items, ValidationStatus::Warning),
            auto_corrected = count_status(&items, ValidationStatus::AutoCorrected),
            "校验完成"
        );
        items
    }

    /// 条件在该请求上成立的规则 ID (按求值顺序)
    pub fn triggered_rules(&self, request: &ConfigurationRequest) -> Vec<String> {
        let ctx = EvaluationContext::from_request(request);
        RuleClass::EVALUATION_ORDER
            .into_iter()
            .flat_map(|class| self.model.rules_of(class))
            .filter(|rule| rule.condition.evaluate(&ctx))
            .map(|rule| rule.id.clone())
            .collect()
    }

    /// 校验已解析的请求
    ///
    /// # 顺序
    /// 1. 快照合同校验 (schema.<n>)
    /// 2. 数值属性 min/max/step (width, height, depth, load)
    /// 3. 安装方式枚举
    /// 4. 设备模块枚举 (逐条)
    /// 5. 硬约束 -> 软约束 -> 自修正约束 (各自按声明顺序)
    /// 6. 目录校验 (BOM 型材)
    ///
    /// include_pass=false 时过滤 pass 条目, 其余条目相对顺序不变
    pub fn validate_request(
        &self,
        request: &ConfigurationRequest,
        options: ValidateOptions,
    ) -> Vec<ValidationResultItem> {
        let ctx = EvaluationContext::from_request(request);
        let attributes = &self.model.attributes;
        let mut items: Vec<ValidationResultItem> = Vec::new();

        // 1. 结构校验
        let violations = self.contracts.validate_snapshot(&request.snapshot.to_value());
        items.extend(
            violations
                .iter()
                .enumerate()
                .map(|(i, v)| RuleChecks::schema_violation(i + 1, v)),
        );

        // 2. 数值属性
        for attr in NumericAttribute::ALL {
            if let Some(value) = ctx.number(attr.as_str()) {
                items.extend(RuleChecks::numeric_attribute(
                    attr,
                    value,
                    attributes.numeric(attr),
                ));
            }
        }

        // 3-4. 枚举属性
        items.extend(RuleChecks::mounting_type(
            ctx.mounting_type.as_deref(),
            &attributes.mounting_type,
        ));
        items.extend(RuleChecks::equipment_modules(
            &ctx.equipment_modules,
            &attributes.equipment_modules,
        ));

        // 5. 规则
        let mut rules_evaluated = 0u64;
        for class in RuleClass::EVALUATION_ORDER {
            for rule in self.model.rules_of(class) {
                items.push(RuleChecks::rule(rule, &ctx));
                rules_evaluated += 1;
            }
        }

        // 6. 目录
        items.extend(RuleChecks::catalog_profiles(
            &request.snapshot,
            &self.model.catalog,
        ));

        perf::record_validation(rules_evaluated);

        items
            .into_iter()
            .map(|item| self.guard(item))
            .filter(|item| options.include_pass || !item.is_pass())
            .collect()
    }

    /// 结果项合同守卫: 不符合合同的条目替换为兜底错误项
    fn guard(&self, item: ValidationResultItem) -> ValidationResultItem {
        let violations = match serde_json::to_value(&item) {
            Ok(value) => self.contracts.validate_result_item(&value),
            Err(e) => {
                tracing::warn!(rule_id = %item.rule_id, error = %e, "结果项序列化失败");
                return RuleChecks::sanitized(&item.rule_id);
            }
        };

        if violations.is_empty() {
            return item;
        }

        tracing::warn!(
            rule_id = %item.rule_id,
            violations = ?violations.iter().map(|v| format!("{} {}", v.display_path(), v.message)).collect::<Vec<_>>(),
            "结果项不符合合同, 已替换"
        );
        RuleChecks::sanitized(&item.rule_id)
    }
}
