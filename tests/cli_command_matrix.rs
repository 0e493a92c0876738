use assert_cmd::Command;

fn run_help(args: &[&str]) {
    let mut cmd = Command::cargo_bin("revet").expect("revet binary");
    cmd.args(args).arg("--help").assert().success();
}

#[test]
fn every_cli_command_has_help_path() {
    // top-level
    run_help(&[]);

    run_help(&["init"]);

    run_help(&["round"]);
    run_help(&["round", "start"]);
    run_help(&["round", "close"]);
    run_help(&["round", "status"]);
    run_help(&["round", "list"]);

    run_help(&["finding"]);
    run_help(&["finding", "add"]);
    run_help(&["finding", "list"]);
    run_help(&["finding", "show"]);

    run_help(&["verdict"]);
    run_help(&["verdict", "set"]);
    run_help(&["verdict", "summary"]);

    run_help(&["options"]);

    run_help(&["action"]);
    run_help(&["action", "list"]);
    run_help(&["action", "choose"]);
    run_help(&["action", "done"]);
    run_help(&["action", "defer"]);

    run_help(&["report"]);
    run_help(&["import"]);
    run_help(&["validate"]);
    run_help(&["check"]);

    run_help(&["policy"]);
    run_help(&["policy", "show"]);
    run_help(&["policy", "eval"]);
}
