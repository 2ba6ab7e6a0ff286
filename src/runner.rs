//! Subprocess execution seam.
//!
//! The [`CliRunner`] trait separates argument construction from process
//! execution so that tests can substitute a fake runner and inspect the
//! argument vectors the library builds.

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Captured stdout and stderr of one successful invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliOut {
    /// Raw standard output.
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
}

impl CliOut {
    /// Standard output decoded as UTF-8, lossily.
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard output decoded and stripped of trailing whitespace.
    pub fn stdout_trimmed(&self) -> String {
        self.stdout_str().trim_end().to_string()
    }
}

/// Raw result of one process invocation, successful or not.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Raw standard output.
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
}

/// Executes an argument vector and captures its output.
#[async_trait]
pub trait CliRunner: Send + Sync {
    /// Run `args[0]` with the remaining arguments.
    async fn run(&self, args: &[String], timeout: Option<Duration>) -> Result<RunOutput>;
}

/// Production runner spawning the real binary found on `PATH`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CardanoCliRunner;

#[async_trait]
impl CliRunner for CardanoCliRunner {
    async fn run(&self, args: &[String], timeout: Option<Duration>) -> Result<RunOutput> {
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| Error::InvalidArguments("empty command line".to_string()))?;

        let mut command = tokio::process::Command::new(program);
        command
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| Error::CliTimeout {
                    command: format_cli_args(args),
                })??,
            None => command.output().await?,
        };

        Ok(RunOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty()
        || arg
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-')))
}

/// Format an argument vector for logging, quoting arguments with special
/// characters in them.
pub fn format_cli_args(cli_args: &[String]) -> String {
    cli_args
        .iter()
        .map(|arg| {
            if needs_quoting(arg) {
                format!("\"{arg}\"")
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn formats_plain_args_unquoted() {
        assert_eq!(
            format_cli_args(&args(&["cardano-cli", "query", "tip", "--testnet-magic", "42"])),
            "cardano-cli query tip --testnet-magic 42"
        );
    }

    #[test]
    fn quotes_special_args() {
        assert_eq!(
            format_cli_args(&args(&["--tx-out", "addr1+2000000 coin"])),
            "--tx-out \"addr1+2000000 coin\""
        );
        assert_eq!(format_cli_args(&args(&["a", ""])), "a \"\"");
    }
}
