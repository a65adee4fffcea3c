// ==========================================
// 模块化结构配置器 - 合同 (Schema Validator)
// ==========================================
// 职责: 加载并编译快照合同与结果项合同, 提供结构校验
// 生命周期: 进程内至多编译一次 (OnceLock), 之后只读共享
// 红线: 合同加载失败为启动期致命错误
// ==========================================

pub mod error;
pub mod schema;

pub use error::{ContractError, ContractResult};
pub use schema::{CompiledSchema, SchemaViolation};

use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// 快照合同文件名
pub const SNAPSHOT_CONTRACT: &str = "configuration-snapshot.schema.json";
/// 结果项合同文件名
pub const RESULT_ITEM_CONTRACT: &str = "validation-result-item.schema.json";

const BUILTIN_SNAPSHOT: &str =
    include_str!("../../contracts/schemas/configuration-snapshot.schema.json");
const BUILTIN_RESULT_ITEM: &str =
    include_str!("../../contracts/schemas/validation-result-item.schema.json");

static CONTRACTS: OnceLock<ContractResult<ContractSet>> = OnceLock::new();

/// 进程内合同编译次数 (初始化守卫内计数)
static COMPILATIONS: AtomicUsize = AtomicUsize::new(0);

// ==========================================
// ContractSet - 已编译合同集合
// ==========================================
#[derive(Debug, Clone)]
pub struct ContractSet {
    origin: String,
    snapshot: CompiledSchema,
    result_item: CompiledSchema,
}

impl ContractSet {
    /// 使用随 crate 发布的内置合同
    pub fn builtin() -> ContractResult<Self> {
        Ok(Self {
            origin: "builtin".to_string(),
            snapshot: CompiledSchema::compile(SNAPSHOT_CONTRACT, BUILTIN_SNAPSHOT)?,
            result_item: CompiledSchema::compile(RESULT_ITEM_CONTRACT, BUILTIN_RESULT_ITEM)?,
        })
    }

    /// 从目录加载合同 (目录中必须同时存在两个合同文件)
    pub fn from_dir(dir: &Path) -> ContractResult<Self> {
        let read = |name: &str| -> ContractResult<CompiledSchema> {
            let path = dir.join(name);
            if !path.exists() {
                return Err(ContractError::Missing(path.display().to_string()));
            }
            let raw = std::fs::read_to_string(&path).map_err(|e| ContractError::ReadError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            CompiledSchema::compile(name, &raw)
        };

        Ok(Self {
            origin: dir.display().to_string(),
            snapshot: read(SNAPSHOT_CONTRACT)?,
            result_item: read(RESULT_ITEM_CONTRACT)?,
        })
    }

    /// 合同来源 ("builtin" 或目录路径)
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn snapshot_schema(&self) -> &CompiledSchema {
        &self.snapshot
    }

    pub fn result_item_schema(&self) -> &CompiledSchema {
        &self.result_item
    }

    /// 校验快照形状
    pub fn validate_snapshot(&self, snapshot: &Value) -> Vec<SchemaViolation> {
        self.snapshot.validate(snapshot)
    }

    /// 校验单个结果项
    pub fn validate_result_item(&self, item: &Value) -> Vec<SchemaViolation> {
        self.result_item.validate(item)
    }
}

/// 初始化进程级合同
///
/// # 参数
/// - dir: 外部合同目录; None 使用内置合同
///
/// # 说明
/// - 编译在初始化守卫内进行, 并发首次调用时只编译一次, 其余调用等待同一结果
/// - 编译失败同样被记住: 合同不可用是启动期致命错误, 不重试
/// - 已初始化后再指定不同目录只记录警告
pub fn init(dir: Option<&Path>) -> ContractResult<&'static ContractSet> {
    let stored = CONTRACTS.get_or_init(|| {
        COMPILATIONS.fetch_add(1, Ordering::SeqCst);
        let compiled = match dir {
            Some(d) => ContractSet::from_dir(d),
            None => ContractSet::builtin(),
        };
        match &compiled {
            Ok(set) => tracing::info!(
                origin = set.origin(),
                snapshot = set.snapshot_schema().id(),
                result_item = set.result_item_schema().id(),
                "合同已编译"
            ),
            Err(e) => tracing::error!(error = %e, "合同编译失败"),
        }
        compiled
    });

    let set = stored.as_ref().map_err(|e| e.clone())?;
    if let Some(d) = dir {
        if set.origin() != d.display().to_string() {
            tracing::warn!(
                loaded = set.origin(),
                requested = %d.display(),
                "合同已初始化, 忽略新的合同目录"
            );
        }
    }
    Ok(set)
}

/// 已执行的合同编译次数 (至多为 1)
pub fn compilations() -> usize {
    COMPILATIONS.load(Ordering::SeqCst)
}

/// 进程级合同 (未初始化时使用内置合同)
pub fn global() -> ContractResult<&'static ContractSet> {
    init(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builtin_contracts_compile() {
        let set = ContractSet::builtin().unwrap();
        assert_eq!(set.origin(), "builtin");
        assert!(set.snapshot_schema().id().ends_with(SNAPSHOT_CONTRACT));
    }

    #[test]
    fn test_snapshot_contract_reports_missing_dimensions() {
        let set = ContractSet::builtin().unwrap();
        let v = set.validate_snapshot(&json!({
            "stateId": "3b241101-e2bb-4255-8caf-4136c566a962",
            "dimensions": {}
        }));
        assert_eq!(v.len(), 3);
        assert!(v.iter().all(|x| x.keyword == "required" && x.path == "/dimensions"));
    }

    #[test]
    fn test_result_item_contract() {
        let set = ContractSet::builtin().unwrap();
        let ok = json!({
            "ruleId": "hr1",
            "status": "pass",
            "message": "ok",
            "explanation": { "title": "t", "message": "m", "why": [] },
            "suggestedFixes": []
        });
        assert!(set.validate_result_item(&ok).is_empty());

        let bad = json!({
            "ruleId": "",
            "status": "unknown",
            "message": "ok",
            "explanation": { "title": "t", "message": "m", "why": [] }
        });
        assert_eq!(set.validate_result_item(&bad).len(), 2);
    }

    #[test]
    fn test_global_is_memoized() {
        let a = global().unwrap() as *const ContractSet;
        let b = global().unwrap() as *const ContractSet;
        assert_eq!(a, b);
        assert_eq!(compilations(), 1);
    }

    #[test]
    fn test_from_dir_requires_both_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SNAPSHOT_CONTRACT), BUILTIN_SNAPSHOT).unwrap();
        assert!(matches!(
            ContractSet::from_dir(dir.path()),
            Err(ContractError::Missing(_))
        ));

        std::fs::write(dir.path().join(RESULT_ITEM_CONTRACT), BUILTIN_RESULT_ITEM).unwrap();
        let set = ContractSet::from_dir(dir.path()).unwrap();
        assert_eq!(set.origin(), dir.path().display().to_string());
    }
}
