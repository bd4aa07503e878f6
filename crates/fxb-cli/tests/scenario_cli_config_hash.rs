use predicates::prelude::*;

fn repo_config(name: &str) -> String {
    format!("{}/../../config/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[allow(deprecated)]
#[test]
fn config_hash_prints_hash_and_canonical_json() {
    let mut cmd = assert_cmd::Command::cargo_bin("fxb").unwrap();
    cmd.args(["config-hash", &repo_config("base.yaml"), &repo_config("audusd_1h.yaml")])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"config_hash=[0-9a-f]{64}\n").unwrap())
        .stdout(predicate::str::contains(r#""symbol":"AUDUSD""#));
}

#[allow(deprecated)]
#[test]
fn config_hash_requires_a_path() {
    let mut cmd = assert_cmd::Command::cargo_bin("fxb").unwrap();
    cmd.arg("config-hash").assert().failure();
}
