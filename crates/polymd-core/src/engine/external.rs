use super::config::ConfigError;
use super::error::EngineError;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, trace, warn};

/// Environment variable holding the structure builder's setup command.
pub const EMC_SETUP_ENV: &str = "EMC_SETUP";
/// Environment variable holding the structure builder's executable.
pub const EMC_EXEC_ENV: &str = "EMC_EXEC";

/// A configured external command: a program followed by fixed leading arguments,
/// e.g. `perl /opt/emc/scripts/emc_setup.pl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Succeeded,
    /// The process ran but exited unsuccessfully. `None` if it was killed by a signal.
    Failed { exit_code: Option<i32> },
    /// The process could not be started at all.
    SpawnFailed { reason: String },
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Succeeded => "succeeded".to_string(),
            Self::Failed {
                exit_code: Some(code),
            } => format!("exited with status {}", code),
            Self::Failed { exit_code: None } => "terminated by a signal".to_string(),
            Self::SpawnFailed { reason } => format!("could not be started: {}", reason),
        }
    }
}

impl ToolCommand {
    /// Splits a command line on whitespace into program and leading arguments.
    pub fn parse(command_line: &str) -> Result<Self, ConfigError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| ConfigError::Invalid {
            parameter: "tool command",
            reason: "command line is empty".to_string(),
        })?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Reads and parses the command stored in environment variable `var`, if set.
    pub fn from_env(var: &str) -> Option<Result<Self, ConfigError>> {
        std::env::var(var).ok().map(|value| Self::parse(&value))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command with `extra_args` appended, inside `working_dir`, and waits
    /// for it to finish. Output is captured and forwarded to the log.
    pub fn run(&self, extra_args: &[&str], working_dir: &Path) -> ToolOutcome {
        debug!(
            "Running '{}' with args {:?} {:?} in {:?}",
            self.program, self.args, extra_args, working_dir
        );

        let output = Command::new(&self.program)
            .args(&self.args)
            .args(extra_args)
            .current_dir(working_dir)
            .output();

        match output {
            Ok(output) => {
                for line in String::from_utf8_lossy(&output.stdout).lines() {
                    trace!("[{}] {}", self.program, line);
                }
                if output.status.success() {
                    ToolOutcome::Succeeded
                } else {
                    for line in String::from_utf8_lossy(&output.stderr).lines() {
                        debug!("[{}] {}", self.program, line);
                    }
                    ToolOutcome::Failed {
                        exit_code: output.status.code(),
                    }
                }
            }
            Err(e) => ToolOutcome::SpawnFailed {
                reason: e.to_string(),
            },
        }
    }
}

/// Runs a tool under the configured failure policy.
///
/// With `strict` unset a failed tool is only logged and the caller carries on;
/// later steps then discover any missing output on their own. With `strict` set
/// the failure is returned as [`EngineError::ExternalTool`].
pub fn run_tool(
    name: &str,
    tool: &ToolCommand,
    extra_args: &[&str],
    working_dir: &Path,
    strict: bool,
) -> Result<ToolOutcome, EngineError> {
    let outcome = tool.run(extra_args, working_dir);
    if outcome.is_success() {
        info!("{} finished in {:?}.", name, working_dir);
        return Ok(outcome);
    }

    let reason = outcome.describe();
    if strict {
        return Err(EngineError::ExternalTool {
            tool: name.to_string(),
            reason,
        });
    }
    warn!("Problem running {} ({}); continuing.", name, reason);
    Ok(outcome)
}
