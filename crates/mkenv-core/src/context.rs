use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use crate::config::{Config, EnvSnapshot, GlobalOptions};
use crate::effects::{self, SharedEffects};

pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    config: Config,
    cwd: Utf8PathBuf,
    effects: SharedEffects,
}

impl<'a> CommandContext<'a> {
    /// Creates a new command context with the provided global options.
    ///
    /// # Errors
    /// Returns an error if the environment or working directory cannot be
    /// inspected.
    pub fn new(global: &'a GlobalOptions, effects: SharedEffects) -> Result<Self> {
        let config = Config::from_snapshot(&EnvSnapshot::capture())?;
        let cwd = std::env::current_dir().context("could not read the working directory")?;
        let cwd = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|path| anyhow::anyhow!("working directory {} is not UTF-8", path.display()))?;
        Ok(Self {
            global,
            config,
            cwd,
            effects,
        })
    }

    #[cfg(test)]
    pub(crate) fn testing(
        global: &'a GlobalOptions,
        config: Config,
        cwd: Utf8PathBuf,
        effects: SharedEffects,
    ) -> Self {
        Self {
            global,
            config,
            cwd,
            effects,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cwd(&self) -> &Utf8PathBuf {
        &self.cwd
    }

    pub fn process(&self) -> &dyn effects::ProcessHost {
        self.effects.process()
    }

    pub fn prompter(&self) -> &dyn effects::Prompter {
        self.effects.prompter()
    }

    /// Environment name used when `--name` is absent: the working
    /// directory's file name.
    pub fn default_env_name(&self) -> String {
        self.cwd
            .file_name()
            .map_or_else(|| "env".to_string(), ToString::to_string)
    }
}
