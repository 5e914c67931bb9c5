use std::{io, path::PathBuf};

use thiserror::Error;

use crate::parse::CommandParseError;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] CommandParseError),
    #[error("cd: {}: {source}", path.display())]
    DirectoryChange {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("pwd: {0}")]
    CurrentDir(#[source] io::Error),
    #[error("failed to launch {program}: {source}")]
    ProcessCreation {
        program: String,
        #[source]
        source: nix::Error,
    },
    #[error("failed to create pipe: {0}")]
    Pipe(#[source] nix::Error),
    #[error("{}: cannot open for writing: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },
    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: nix::Error,
    },
    #[error("{0}: argument contains a NUL byte")]
    InvalidArgument(String),
}

pub type ShellResult<T> = Result<T, ShellError>;

impl ShellError {
    /// Whether the rest of the current line's plan must be abandoned.
    pub fn aborts_plan(&self) -> bool {
        match self {
            Self::ProcessCreation { .. } | Self::Pipe(_) | Self::FileOpen { .. } => true,
            Self::Parse(_)
            | Self::DirectoryChange { .. }
            | Self::CurrentDir(_)
            | Self::Wait { .. }
            | Self::InvalidArgument(_) => false,
        }
    }
}

/// The single place user-facing diagnostics are emitted.
pub fn report(err: &ShellError) {
    error!(%err, "command failed");
    eprintln!("forksh: {err}");
}
