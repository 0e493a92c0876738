mod common;

use common::{seed_reviewed_round, TestEnv};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

fn load_schema(name: &str) -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = fs::read_to_string(root.join("docs/contracts").join(name)).expect("schema file");
    serde_json::from_str(&raw).expect("schema json")
}

fn validate(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let msgs: Vec<String> = match validator.validate(data) {
        Ok(()) => return,
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    panic!("schema validation failed: {}", msgs.join(" | "));
}

#[test]
fn contracts_check() {
    let env = TestEnv::new();
    seed_reviewed_round(&env);

    let status = env.run_json(&["round", "status"]);
    assert_eq!(status["ok"], true);
    validate("round-status.schema.json", &status["data"]);

    let options = env.run_json(&["options", "F1"]);
    assert_eq!(options["ok"], true);
    validate("options.schema.json", &options["data"]);

    let check = env.run_json(&["check"]);
    assert_eq!(check["ok"], true);
    validate("check.schema.json", &check["data"]);

    let eval = env.run_json(&["policy", "eval", "F1"]);
    assert_eq!(eval["ok"], true);
    validate("policy-eval.schema.json", &eval["data"]);

    // the status contract holds for closed rounds too
    env.run_json(&["action", "done", "F1"]);
    env.run_json(&["round", "close"]);
    let status = env.run_json(&["round", "status", "--round", "1"]);
    validate("round-status.schema.json", &status["data"]);
}
