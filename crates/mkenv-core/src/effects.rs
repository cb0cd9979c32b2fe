use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::process::{run_command, run_command_streaming, RunOutput};

pub trait ProcessHost: Send + Sync {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput>;
    fn run_streaming(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput>;
}

/// Interactive choice, injected so the workflow stays testable without a
/// terminal. Indices refer into `options`.
pub trait Prompter: Send + Sync {
    /// One choice, or `None` when the user quits.
    fn pick_one(&self, prompt: &str, options: &[String]) -> Result<Option<usize>>;
    /// Any number of choices; an empty answer selects nothing.
    fn pick_many(&self, prompt: &str, options: &[String]) -> Result<Vec<usize>>;
}

pub trait Effects: Send + Sync {
    fn process(&self) -> &dyn ProcessHost;
    fn prompter(&self) -> &dyn Prompter;
}

pub struct SystemEffects {
    process: Arc<SystemProcessHost>,
    prompter: Arc<SystemPrompter>,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            process: Arc::new(SystemProcessHost),
            prompter: Arc::new(SystemPrompter),
        }
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn process(&self) -> &dyn ProcessHost {
        self.process.as_ref()
    }

    fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }
}

struct SystemProcessHost;

impl ProcessHost for SystemProcessHost {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
        run_command(program, args, cwd)
    }

    fn run_streaming(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
        run_command_streaming(program, args, cwd)
    }
}

/// Numbered menu on stdout, answers read from stdin. Re-prompts until the
/// input parses; EOF behaves like quitting.
struct SystemPrompter;

impl SystemPrompter {
    fn render_menu(prompt: &str, options: &[String], footer: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{prompt}")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(stdout, "  {}. {option}", index + 1)?;
        }
        write!(stdout, "{footer}")?;
        stdout.flush()?;
        Ok(())
    }

    fn read_answer() -> Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn parse_index(answer: &str, len: usize) -> Option<usize> {
        answer
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=len).contains(n))
            .map(|n| n - 1)
    }
}

impl Prompter for SystemPrompter {
    fn pick_one(&self, prompt: &str, options: &[String]) -> Result<Option<usize>> {
        loop {
            Self::render_menu(
                prompt,
                options,
                "  q. quit\nType an option, and press enter: ",
            )?;
            let Some(answer) = Self::read_answer()? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            if let Some(index) = Self::parse_index(&answer, options.len()) {
                return Ok(Some(index));
            }
            println!("'{answer}' is not an option");
        }
    }

    fn pick_many(&self, prompt: &str, options: &[String]) -> Result<Vec<usize>> {
        'retry: loop {
            Self::render_menu(
                prompt,
                options,
                "Type any number of comma-separated options, and press enter: ",
            )?;
            let Some(answer) = Self::read_answer()? else {
                return Ok(Vec::new());
            };
            if answer.is_empty() {
                return Ok(Vec::new());
            }
            let mut picked = Vec::new();
            for part in answer.split(',') {
                match Self::parse_index(part.trim(), options.len()) {
                    Some(index) => picked.push(index),
                    None => {
                        println!("'{}' is not an option", part.trim());
                        continue 'retry;
                    }
                }
            }
            return Ok(picked);
        }
    }
}

pub type SharedEffects = Arc<dyn Effects>;
