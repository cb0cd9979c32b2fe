use std::collections::HashMap;
use std::env;

use anyhow::Context;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub json: bool,
    pub no_color: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug)]
pub struct Config {
    pyenv: PyenvConfig,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment.
    ///
    /// # Errors
    /// Returns an error if no pyenv root can be resolved.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_snapshot(&EnvSnapshot::capture())
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot) -> anyhow::Result<Self> {
        let root = match snapshot.var("PYENV_ROOT") {
            Some(value) if !value.is_empty() => Utf8PathBuf::from(value),
            // Pyenv's conventional location when the variable is unset.
            _ => {
                let home = dirs_next::home_dir()
                    .context("PYENV_ROOT is not set and no home directory was found")?;
                Utf8PathBuf::from_path_buf(home)
                    .map_err(|path| {
                        anyhow::anyhow!("home directory {} is not valid UTF-8", path.display())
                    })?
                    .join(".pyenv")
            }
        };
        Ok(Self {
            pyenv: PyenvConfig { root },
        })
    }

    #[must_use]
    pub fn pyenv(&self) -> &PyenvConfig {
        &self.pyenv
    }

    #[cfg(test)]
    pub(crate) fn testing(root: Utf8PathBuf) -> Self {
        Self {
            pyenv: PyenvConfig { root },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PyenvConfig {
    pub root: Utf8PathBuf,
}

impl PyenvConfig {
    #[must_use]
    pub fn versions_dir(&self) -> Utf8PathBuf {
        self.root.join("versions")
    }

    /// The pyenv executable to invoke: the one bundled under the root when
    /// present, otherwise whatever `pyenv` resolves to on PATH.
    #[must_use]
    pub fn executable(&self) -> String {
        let bundled = self.root.join("bin").join("pyenv");
        if bundled.is_file() {
            return bundled.into_string();
        }
        which::which("pyenv")
            .ok()
            .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
            .map_or_else(|| "pyenv".to_string(), Utf8PathBuf::into_string)
    }

    /// Path of the pip installed inside a named environment.
    #[must_use]
    pub fn env_pip(&self, env_name: &str) -> Utf8PathBuf {
        self.versions_dir().join(env_name).join("bin").join("pip")
    }
}
