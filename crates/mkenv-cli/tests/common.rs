#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Lays out a fake pyenv root: a `versions/` directory with the given
/// installed versions and, on unix, a stub `bin/pyenv` that records its
/// invocations to `calls.log` and fabricates the environment's pip.
pub fn fake_pyenv_root(versions: &[&str]) -> TempDir {
    let root = tempfile::Builder::new()
        .prefix("mkenv-pyenv")
        .tempdir()
        .expect("tempdir");
    let versions_dir = root.path().join("versions");
    fs::create_dir_all(&versions_dir).expect("versions dir");
    for version in versions {
        fs::create_dir(versions_dir.join(version)).expect("version dir");
    }
    #[cfg(unix)]
    install_stub_pyenv(root.path());
    root
}

#[cfg(unix)]
fn install_stub_pyenv(root: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let bin = root.join("bin");
    fs::create_dir_all(&bin).expect("bin dir");
    let script = r#"#!/bin/sh
root="$(cd "$(dirname "$0")/.." && pwd)"
echo "pyenv $*" >> "$root/calls.log"
if [ "$1" = "virtualenv" ]; then
    envbin="$root/versions/$3/bin"
    mkdir -p "$envbin"
    cat > "$envbin/pip" <<'PIP'
#!/bin/sh
root="$(cd "$(dirname "$0")/../../.." && pwd)"
echo "pip $*" >> "$root/calls.log"
PIP
    chmod +x "$envbin/pip"
fi
"#;
    let pyenv = bin.join("pyenv");
    fs::write(&pyenv, script).expect("write stub");
    let mut perms = fs::metadata(&pyenv).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&pyenv, perms).expect("chmod");
}

pub fn calls_log(root: &Path) -> Vec<String> {
    let contents = fs::read_to_string(root.join("calls.log")).unwrap_or_default();
    contents.lines().map(ToString::to_string).collect()
}

pub fn scratch_cwd(prefix: &str) -> (TempDir, PathBuf) {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let cwd = temp.path().join("sample_project");
    fs::create_dir_all(&cwd).expect("cwd");
    (temp, cwd)
}
