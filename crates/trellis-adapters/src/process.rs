//! External process adapter.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, instrument};

use trellis_core::{
    application::{ApplicationError, ports::CommandRunner},
    error::TrellisResult,
};

/// Runs commands with inherited stdio, so package-manager output reaches the
/// terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    #[instrument(skip(self, args), fields(args = args.join(" ")))]
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> TrellisResult<()> {
        let command = std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|e| ApplicationError::CommandFailed {
                command: command.clone(),
                reason: format!("could not start: {e}"),
            })?;

        debug!(%status, "command finished");
        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::CommandFailed {
                command,
                reason: match status.code() {
                    Some(code) => format!("exited with status {code}"),
                    None => "terminated by signal".into(),
                },
            }
            .into())
        }
    }
}

/// `user.name <user.email>` from git config, or just the name.
///
/// `None` when git is missing or has no `user.name`.
pub fn git_identity() -> Option<String> {
    let name = git_config("user.name")?;
    Some(match git_config("user.email") {
        Some(email) => format!("{name} <{email}>"),
        None => name,
    })
}

fn git_config(key: &str) -> Option<String> {
    let output = Command::new("git")
        .args(["config", "--get", key])
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!value.is_empty()).then_some(value)
}
