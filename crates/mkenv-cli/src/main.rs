use atty::Stream;
use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use color_eyre::{eyre::eyre, Result};
use mkenv_core::{
    CommandStatus, EnvCreateRequest, ExecutionOutcome, GlobalOptions, RequirementsSpec,
};
use serde_json::Value;

mod style;

use style::Style;

const SELECTOR_HELP: &str = "Python version selector. A leading '/' makes the rest a regular \
expression searched anywhere in the version name; otherwise versions are matched by prefix. \
Empty matches everything. Without --pick, the highest-priority match is used.";

#[derive(Parser, Debug)]
#[command(
    name = "mkenv",
    version,
    about = "Create a pyenv virtualenv for the best-matching installed Python."
)]
struct MkenvCli {
    #[arg(value_name = "PY_VERSION", default_value = "", help = SELECTOR_HELP)]
    py_version: String,
    #[arg(short, long, help = "Prompt to select from matching versions")]
    pick: bool,
    #[arg(
        short,
        long,
        help = "Name for the environment (defaults to the directory name)"
    )]
    name: Option<String>,
    #[arg(
        short = 'r',
        long = "requirements",
        value_name = "FILE",
        num_args = 0..,
        help = "Requirements files to install from. With no path given, the working tree is \
searched and you will be prompted."
    )]
    requirements: Option<Vec<Utf8PathBuf>>,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches trace)")]
    verbose: u8,
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)"
    )]
    quiet: bool,
    #[arg(long, help = "Emit a {status,message,details} JSON envelope")]
    json: bool,
    #[arg(long, help = "Disable colored human output")]
    no_color: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = MkenvCli::parse();
    init_tracing(cli.verbose);

    let global = GlobalOptions {
        quiet: cli.quiet,
        verbose: cli.verbose,
        json: cli.json,
        no_color: cli.no_color,
    };
    let request = build_request(&cli);
    let outcome = mkenv_core::execute(&global, &request).map_err(|err| eyre!("{err:?}"))?;
    let code = emit_output(&cli, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn build_request(cli: &MkenvCli) -> EnvCreateRequest {
    let requirements = match &cli.requirements {
        None => RequirementsSpec::None,
        Some(files) if files.is_empty() => RequirementsSpec::Discover,
        Some(files) => RequirementsSpec::Files(files.clone()),
    };
    EnvCreateRequest {
        selector: cli.py_version.clone(),
        pick: cli.pick,
        name: cli.name.clone(),
        requirements,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = format!("mkenv={level},mkenv_cli={level},mkenv_core={level},mkenv_domain={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn emit_output(cli: &MkenvCli, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = match outcome.status {
        CommandStatus::Ok => 0,
        CommandStatus::UserError => 1,
        CommandStatus::Failure => 2,
    };

    let style = Style::new(cli.no_color, atty::is(Stream::Stdout));

    if cli.json {
        let payload = mkenv_core::to_json_response(outcome, code);
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if !cli.quiet {
        println!("{}", style.status(&outcome.status, &outcome.message));
        if let Some(hint) = hint_from_details(&outcome.details) {
            let hint_line = format!("Hint: {hint}");
            println!("{}", style.info(&hint_line));
        }
        if let Some(installed) = installed_from_details(&outcome.details) {
            println!("{}", style.info("Installed versions, best match first:"));
            for name in installed {
                println!("  {name}");
            }
        }
    }

    Ok(code)
}

fn hint_from_details(details: &Value) -> Option<&str> {
    details
        .as_object()
        .and_then(|map| map.get("hint"))
        .and_then(Value::as_str)
}

fn installed_from_details(details: &Value) -> Option<Vec<&str>> {
    let installed = details
        .as_object()
        .and_then(|map| map.get("installed"))
        .and_then(Value::as_array)?;
    Some(installed.iter().filter_map(Value::as_str).collect())
}
