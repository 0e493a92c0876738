use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub project: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let project = tmp.path().join("project");
        fs::create_dir_all(&project).expect("create isolated project");
        Self {
            _tmp: tmp,
            project,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("revet").expect("revet binary");
        cmd.arg("--project")
            .arg(self.project.to_str().expect("project path utf8"));
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_fail(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid error json output")
    }

    pub fn write_policy(&self, body: &str) {
        let path = self.project.join(".revet/policy.toml");
        fs::create_dir_all(path.parent().expect("policy parent")).expect("create policy dir");
        fs::write(path, body).expect("write policy file");
    }
}

/// A ledger one classified round away from terminal.
pub fn seed_reviewed_round(env: &TestEnv) {
    env.run_json(&["init"]);
    env.run_json(&["round", "start"]);
    env.run_json(&[
        "finding",
        "add",
        "F1",
        "--location",
        "section 2",
        "--description",
        "heading typo",
    ]);
    env.run_json(&["verdict", "set", "F1", "valid"]);
}
