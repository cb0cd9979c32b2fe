use anyhow::Result;
use camino::Utf8PathBuf;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use mkenv_domain::{discover_versions, ordered_list, select, CatalogError, Selector};

use crate::context::CommandContext;
use crate::outcome::{ExecutionOutcome, UserError};
use crate::process::RunOutput;
use crate::requirements::discover_requirements;

#[derive(Clone, Debug)]
pub struct EnvCreateRequest {
    /// Raw selector as typed: empty, a prefix, or `/regex`.
    pub selector: String,
    /// Prompt among the matches instead of taking the first.
    pub pick: bool,
    /// Environment name; defaults to the working directory's name.
    pub name: Option<String>,
    pub requirements: RequirementsSpec,
}

#[derive(Clone, Debug, Default)]
pub enum RequirementsSpec {
    /// Install nothing beyond pip itself.
    #[default]
    None,
    /// Install from these files, in order.
    Files(Vec<Utf8PathBuf>),
    /// Search the working tree and let the user multi-select.
    Discover,
}

/// An external tool (pyenv or pip) exited non-zero. Its own output has
/// already been streamed through; this records what failed.
#[derive(Debug, thiserror::Error)]
#[error("{program} exited with status {code}")]
pub struct ExternalCommandError {
    pub program: String,
    pub code: i32,
    pub stderr: String,
}

/// Creates a pyenv virtualenv for the best-matching installed version,
/// marks it as the local version, upgrades pip, and installs any
/// requirement files.
///
/// # Errors
/// Returns [`UserError`] for selector and setup problems,
/// [`ExternalCommandError`] when pyenv or pip fail, and plain errors for
/// anything unexpected.
pub fn env_create(ctx: &CommandContext, request: &EnvCreateRequest) -> Result<ExecutionOutcome> {
    let pyenv = ctx.config().pyenv();
    let versions_dir = pyenv.versions_dir();
    let installed = match discover_versions(versions_dir.as_std_path()) {
        Ok(names) => names,
        Err(err @ CatalogError::VersionsDirMissing(_)) => {
            return Err(UserError::new(
                err.to_string(),
                json!({
                    "versions_dir": versions_dir.as_str(),
                    "hint": "install pyenv, or point PYENV_ROOT at its home",
                }),
            )
            .into());
        }
        Err(err) => return Err(err.into()),
    };

    let ordered = ordered_list(&installed);
    let selector = Selector::parse(&request.selector).map_err(|err| {
        UserError::new(err.to_string(), json!({ "pattern": request.selector }))
    })?;
    let matching = select(&ordered, &selector);
    if matching.is_empty() {
        return Err(UserError::new(
            format!("no installed version matches '{}'", request.selector),
            json!({ "selector": request.selector, "installed": ordered }),
        )
        .into());
    }

    let version = if request.pick {
        match ctx.prompter().pick_one("Pick python version:", &matching)? {
            Some(index) => matching[index].clone(),
            None => {
                debug!("user quit the version picker");
                return Ok(ExecutionOutcome::success(
                    "nothing created",
                    json!({ "aborted": "version picker" }),
                ));
            }
        }
    } else {
        matching[0].clone()
    };

    let name = request
        .name
        .clone()
        .unwrap_or_else(|| ctx.default_env_name());
    let requirements = resolve_requirements(ctx, &request.requirements)?;

    info!("creating environment '{name}' for python {version}");
    let pyenv_bin = pyenv.executable();
    run_checked(ctx, &pyenv_bin, &["virtualenv", &version, &name])?;

    info!("setting '{name}' as the local version");
    run_checked(ctx, &pyenv_bin, &["local", &name])?;

    info!("upgrading pip");
    let pip = pyenv.env_pip(&name).into_string();
    run_checked(ctx, &pip, &["install", "-U", "pip"])?;

    let mut failed: Vec<Value> = Vec::new();
    for file in &requirements {
        info!("installing requirements from {file}");
        let output = ctx.process().run_streaming(
            &pip,
            &to_args(&["install", "-r", file.as_str()]),
            ctx.cwd().as_std_path(),
        )?;
        if output.code != 0 {
            warn!("could not install requirements from {file} (status {})", output.code);
            failed.push(json!({ "file": file.as_str(), "code": output.code }));
        }
    }

    let message = if failed.is_empty() {
        format!("created environment '{name}' with python {version}")
    } else {
        format!(
            "created environment '{name}' with python {version}; {} requirements file(s) failed",
            failed.len()
        )
    };
    let requirement_names: Vec<&str> = requirements.iter().map(|p| p.as_str()).collect();
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "name": name,
            "version": version,
            "requirements": requirement_names,
            "failed_requirements": failed,
        }),
    ))
}

fn resolve_requirements(
    ctx: &CommandContext,
    spec: &RequirementsSpec,
) -> Result<Vec<Utf8PathBuf>> {
    match spec {
        RequirementsSpec::None => Ok(Vec::new()),
        RequirementsSpec::Files(files) => Ok(files.clone()),
        RequirementsSpec::Discover => {
            let candidates = discover_requirements(ctx.cwd())?;
            if candidates.is_empty() {
                warn!("no requirements files found under {}", ctx.cwd());
                return Ok(Vec::new());
            }
            let options: Vec<String> = candidates.iter().map(ToString::to_string).collect();
            let picked = ctx
                .prompter()
                .pick_many("Select which requirements to install:", &options)?;
            Ok(picked.into_iter().map(|i| candidates[i].clone()).collect())
        }
    }
}

fn run_checked(ctx: &CommandContext, program: &str, args: &[&str]) -> Result<RunOutput> {
    let output = ctx
        .process()
        .run_streaming(program, &to_args(args), ctx.cwd().as_std_path())?;
    if output.code != 0 {
        return Err(ExternalCommandError {
            program: program.to_string(),
            code: output.code,
            stderr: output.stderr,
        }
        .into());
    }
    Ok(output)
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}
