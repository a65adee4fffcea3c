// ==========================================
// 合同 (Schema Validator) 集成测试
// ==========================================

use modular_configurator::contracts::{
    self, CompiledSchema, ContractError, ContractSet, RESULT_ITEM_CONTRACT, SNAPSHOT_CONTRACT,
};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

fn builtin_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("contracts").join("schemas")
}

#[test]
fn test_shipped_contract_files_match_builtin() {
    let from_disk = ContractSet::from_dir(&builtin_dir()).unwrap();
    let builtin = ContractSet::builtin().unwrap();
    assert_eq!(from_disk.snapshot_schema().id(), builtin.snapshot_schema().id());
    assert_eq!(
        from_disk.result_item_schema().id(),
        builtin.result_item_schema().id()
    );
}

#[test]
fn test_snapshot_contract_accepts_full_snapshot() {
    let set = contracts::global().unwrap();
    let snapshot = json!({
        "stateId": "3f2b8c1e-9d4a-4b6f-8e2d-1a5c7b9d0e3f",
        "dimensions": { "width": 1000, "height": 2000, "depth": 300 },
        "bom": [{ "article": "profile_30x30", "qty": 1, "uom": "pcs", "comment": "frame" }],
        "graph": { "nodes": [] },
        "versionTag": { "catalogVersion": "2024.1", "rulesVersion": "7" }
    });
    assert!(set.validate_snapshot(&snapshot).is_empty());
}

#[test]
fn test_snapshot_contract_reports_each_problem() {
    let set = contracts::global().unwrap();
    let snapshot = json!({
        "stateId": "not-a-uuid",
        "dimensions": { "width": 1000, "height": 2000, "depth": 300, "length": 5 },
        "bom": [{ "article": "", "qty": -1, "uom": "pcs" }],
        "extra": true
    });
    let violations = set.validate_snapshot(&snapshot);
    let keywords: Vec<&str> = violations.iter().map(|v| v.keyword.as_str()).collect();
    assert!(keywords.contains(&"format"));
    assert!(keywords.contains(&"additionalProperties"));
    assert!(keywords.contains(&"minLength"));
    assert!(keywords.contains(&"minimum"));
    assert!(violations
        .iter()
        .any(|v| v.path == "/bom/0/qty" && v.keyword == "minimum"));
}

#[test]
fn test_result_item_contract() {
    let set = contracts::global().unwrap();
    let ok = json!({
        "ruleId": "sr1",
        "status": "warning",
        "message": "wide",
        "affected": { "kind": "dimension", "ids": ["width"] },
        "explanation": { "title": "t", "message": "m", "why": [] },
        "suggestedFixes": [{ "code": "c", "message": "m" }]
    });
    assert!(set.validate_result_item(&ok).is_empty());

    let bad = json!({
        "ruleId": "x",
        "status": "fatal",
        "message": "m",
        "explanation": { "title": "t", "message": "m", "why": [] }
    });
    let violations = set.validate_result_item(&bad);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].keyword, "enum");
    assert_eq!(violations[0].path, "/status");
}

#[test]
fn test_contract_directory_must_hold_both_files() {
    let dir = tempdir().unwrap();
    fs::copy(
        builtin_dir().join(SNAPSHOT_CONTRACT),
        dir.path().join(SNAPSHOT_CONTRACT),
    )
    .unwrap();

    match ContractSet::from_dir(dir.path()) {
        Err(ContractError::Missing(path)) => assert!(path.ends_with(RESULT_ITEM_CONTRACT)),
        other => panic!("expected Missing, got {:?}", other.map(|s| s.origin().to_string())),
    }
}

#[test]
fn test_compile_failures() {
    assert!(matches!(
        CompiledSchema::compile("a.json", "{ oops"),
        Err(ContractError::ParseError { .. })
    ));
    assert!(matches!(
        CompiledSchema::compile("b.json", r#"{ "type": "object" }"#),
        Err(ContractError::MissingId(_))
    ));
    assert!(matches!(
        CompiledSchema::compile("c.json", r#"{ "$id": "c", "type": "string", "minLength": "one" }"#),
        Err(ContractError::InvalidSchema { .. })
    ));
}

#[test]
fn test_concurrent_first_access_compiles_once() {
    const THREADS: usize = 8;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                contracts::global().unwrap() as *const ContractSet as usize
            })
        })
        .collect();

    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(contracts::compilations(), 1);
}
