use std::{fmt, path::PathBuf, str::FromStr};

use itertools::Itertools;

use crate::parse::{parse_command, CommandParseError};

/// A program name followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: Vec<String>,
}

impl Command {
    /// Returns `None` when there is no program name or it is empty.
    pub fn new<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = argv.into_iter().map(Into::into).collect::<Vec<String>>();

        match argv.first() {
            Some(program) if !program.is_empty() => Some(Self { argv }),
            _ => None,
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv.iter().join(" "))
    }
}

/// What a single input line asks for. Exactly one mode per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionPlan {
    NoOp,
    Simple(Command),
    Sequential(Vec<Command>),
    Concurrent(Vec<Command>),
    Redirected(Command, PathBuf),
    Piped(Vec<Command>, Option<PathBuf>),
}

impl ExecutionPlan {
    pub fn commands(&self) -> &[Command] {
        match self {
            Self::NoOp => &[],
            Self::Simple(cmd) | Self::Redirected(cmd, _) => std::slice::from_ref(cmd),
            Self::Sequential(cmds) | Self::Concurrent(cmds) | Self::Piped(cmds, _) => cmds,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

impl FromStr for ExecutionPlan {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_command(s)
    }
}
