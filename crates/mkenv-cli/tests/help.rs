use assert_cmd::cargo::cargo_bin_cmd;

fn help_output(args: &[&str]) -> String {
    let assert = cargo_bin_cmd!("mkenv").args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 help")
}

#[test]
fn help_describes_the_selector_and_flags() {
    let output = help_output(&["--help"]);
    assert!(
        output.contains("pyenv virtualenv"),
        "about line missing: {output}"
    );
    assert!(
        output.contains("[PY_VERSION]"),
        "selector positional missing: {output}"
    );
    for flag in ["--pick", "--name", "--requirements", "--json", "--quiet"] {
        assert!(output.contains(flag), "{flag} missing from help: {output}");
    }
}

#[test]
fn version_flag_prints_the_crate_version() {
    let assert = cargo_bin_cmd!("mkenv").arg("--version").assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    assert!(
        output.contains(env!("CARGO_PKG_VERSION")),
        "version missing: {output}"
    );
}
