use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while driving `cardano-cli` and parsing its output.
#[derive(Debug, Error)]
pub enum Error {
    /// The external command exited with a non-zero status.
    #[error("command `{command}` failed: {stderr}")]
    Cli {
        /// The formatted command line that was executed.
        command: String,
        /// Captured standard error of the failed invocation.
        stderr: String,
    },
    /// The external command did not finish within the requested timeout.
    #[error("command `{command}` timed out")]
    CliTimeout {
        /// The formatted command line that was executed.
        command: String,
    },
    /// An I/O failure while spawning the process or touching state files.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON in genesis files or command output.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A file that an operation was expected to produce does not exist.
    #[error("the expected file `{0}` doesn't exist")]
    MissingFile(PathBuf),
    /// An output file is already present and overwriting is disabled.
    #[error("the expected file `{0}` already exists")]
    OutFileExists(PathBuf),
    /// Invalid construction-time configuration (state dir, socket, era).
    #[error("configuration error: {0}")]
    Config(String),
    /// Command output that could not be interpreted.
    #[error("failed to parse command output: {0}")]
    Parse(String),
    /// Waiting for chain progress (block, slot or epoch) gave up.
    #[error("{0}")]
    WaitTimeout(String),
    /// An operation was called with an unusable combination of arguments.
    #[error("{0}")]
    InvalidArguments(String),
}
