#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

mod config;
mod context;
mod create;
mod effects;
mod outcome;
mod process;
mod requirements;

pub use config::{Config, GlobalOptions, PyenvConfig};
pub use context::CommandContext;
pub use create::{env_create, EnvCreateRequest, ExternalCommandError, RequirementsSpec};
pub use effects::{Effects, ProcessHost, Prompter, SharedEffects, SystemEffects};
pub use outcome::{CommandStatus, ExecutionOutcome, UserError};
pub use process::RunOutput;
pub use requirements::discover_requirements;

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};

pub const MKENV_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs the environment-creation workflow against the real system:
/// real processes, real prompts, the real environment.
pub fn execute(global: &GlobalOptions, request: &EnvCreateRequest) -> Result<ExecutionOutcome> {
    let effects: SharedEffects = Arc::new(SystemEffects::new());
    let ctx = CommandContext::new(global, effects)?;
    match env_create(&ctx, request) {
        Ok(outcome) => Ok(outcome),
        Err(err) => match err.downcast::<UserError>() {
            Ok(user) => Ok(ExecutionOutcome::user_error(
                user.message().to_string(),
                user.details().clone(),
            )),
            Err(other) => match other.downcast::<ExternalCommandError>() {
                Ok(external) => Ok(ExecutionOutcome::failure(
                    external.to_string(),
                    json!({
                        "program": external.program,
                        "code": external.code,
                        "stderr": external.stderr,
                    }),
                )),
                Err(other) => Err(other),
            },
        },
    }
}

#[must_use]
pub fn to_json_response(outcome: &ExecutionOutcome, code: i32) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": outcome.message,
        "details": details,
        "code": code,
    })
}
