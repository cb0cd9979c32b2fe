mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;

use common::{calls_log, fake_pyenv_root, scratch_cwd};

fn parse_json(stdout: &[u8]) -> Value {
    serde_json::from_slice(stdout).expect("valid json")
}

#[test]
fn no_match_exits_with_user_error_and_lists_versions() {
    let root = fake_pyenv_root(&["3.9.0", "3.10.0"]);
    let (_scratch, cwd) = scratch_cwd("mkenv-nomatch");
    let assert = cargo_bin_cmd!("mkenv")
        .env("PYENV_ROOT", root.path())
        .current_dir(&cwd)
        .args(["2.7", "--json"])
        .assert()
        .code(1);
    let payload = parse_json(&assert.get_output().stdout);
    assert_eq!(payload["status"], "user-error");
    assert_eq!(payload["details"]["selector"], "2.7");
    assert_eq!(
        payload["details"]["installed"],
        serde_json::json!(["3.10.0", "3.9.0"])
    );
}

#[test]
fn missing_pyenv_root_is_reported_as_setup_problem() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let missing = scratch.path().join("nowhere");
    let assert = cargo_bin_cmd!("mkenv")
        .env("PYENV_ROOT", &missing)
        .args(["--json"])
        .assert()
        .code(1);
    let payload = parse_json(&assert.get_output().stdout);
    assert_eq!(payload["status"], "user-error");
    assert!(
        payload["message"]
            .as_str()
            .expect("message")
            .contains("pyenv"),
        "{payload}"
    );
}

#[test]
fn malformed_regex_selector_is_rejected() {
    let root = fake_pyenv_root(&["3.9.0"]);
    let assert = cargo_bin_cmd!("mkenv")
        .env("PYENV_ROOT", root.path())
        .args(["/3.(8", "--json"])
        .assert()
        .code(1);
    let payload = parse_json(&assert.get_output().stdout);
    assert_eq!(payload["status"], "user-error");
    assert_eq!(payload["details"]["pattern"], "/3.(8");
}

#[cfg(unix)]
#[test]
fn creates_the_environment_via_the_stub_pyenv() {
    let root = fake_pyenv_root(&["3.8.1", "3.9.0"]);
    let (_scratch, cwd) = scratch_cwd("mkenv-create");
    let assert = cargo_bin_cmd!("mkenv")
        .env("PYENV_ROOT", root.path())
        .current_dir(&cwd)
        .args(["3", "--name", "demo", "--json"])
        .assert()
        .success();
    let payload = parse_json(&assert.get_output().stdout);
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["details"]["version"], "3.9.0");
    assert_eq!(payload["details"]["name"], "demo");

    let calls = calls_log(root.path());
    assert_eq!(calls[0], "pyenv virtualenv 3.9.0 demo");
    assert_eq!(calls[1], "pyenv local demo");
    assert_eq!(calls[2], "pip install -U pip");
}

#[cfg(unix)]
#[test]
fn environment_name_defaults_to_the_directory_name() {
    let root = fake_pyenv_root(&["3.9.0"]);
    let (_scratch, cwd) = scratch_cwd("mkenv-name");
    cargo_bin_cmd!("mkenv")
        .env("PYENV_ROOT", root.path())
        .current_dir(&cwd)
        .args(["--quiet"])
        .assert()
        .success();
    let calls = calls_log(root.path());
    assert_eq!(calls[0], "pyenv virtualenv 3.9.0 sample_project");
}

#[cfg(unix)]
#[test]
fn requirements_files_are_installed_in_order() {
    let root = fake_pyenv_root(&["3.9.0"]);
    let (_scratch, cwd) = scratch_cwd("mkenv-reqs");
    std::fs::write(cwd.join("requirements.txt"), b"requests\n").expect("write");
    cargo_bin_cmd!("mkenv")
        .env("PYENV_ROOT", root.path())
        .current_dir(&cwd)
        .args(["--name", "demo", "-r", "requirements.txt", "--quiet"])
        .assert()
        .success();
    let calls = calls_log(root.path());
    assert_eq!(calls[2], "pip install -U pip");
    assert_eq!(calls[3], "pip install -r requirements.txt");
}

#[cfg(unix)]
#[test]
fn quiet_run_prints_nothing_on_stdout() {
    let root = fake_pyenv_root(&["3.9.0"]);
    let (_scratch, cwd) = scratch_cwd("mkenv-quiet");
    let assert = cargo_bin_cmd!("mkenv")
        .env("PYENV_ROOT", root.path())
        .current_dir(&cwd)
        .args(["--name", "demo", "--quiet"])
        .assert()
        .success();
    assert!(assert.get_output().stdout.is_empty());
}
