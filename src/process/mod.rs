//! The boundary between plan execution and the operating system.
//!
//! Executors never fork or exec themselves. They describe each child as a
//! [`LaunchSpec`] and hand it to a [`Spawner`], which is the only code that
//! touches process creation. [`fork::ForkExec`] is the real implementation.

use std::path::Path;

use crate::{cmd::execution_plan::Command, error::ShellResult};

use self::status::ExitStatus;

pub mod child;
pub mod descriptor;
pub mod fork;
#[cfg(test)]
pub mod recording;
pub mod status;

/// Where one of a child's standard streams comes from.
#[derive(Debug)]
pub enum Binding<F> {
    /// Share the driver's stream.
    Inherit,
    /// Duplicate this descriptor onto the stream, then close it.
    Fd(F),
}

impl<F> Binding<F> {
    pub fn from_option(fd: Option<F>) -> Self {
        fd.map_or(Self::Inherit, Self::Fd)
    }
}

/// Everything needed to start one child. Owns the descriptors it binds, so
/// the driver's copies are closed once the spawner is done with it.
#[derive(Debug)]
pub struct LaunchSpec<F> {
    pub command: Command,
    pub stdin: Binding<F>,
    pub stdout: Binding<F>,
}

impl<F> LaunchSpec<F> {
    pub fn inherit(command: Command) -> Self {
        Self {
            command,
            stdin: Binding::Inherit,
            stdout: Binding::Inherit,
        }
    }
}

pub trait Spawner {
    type Fd;
    type Child;

    /// A fresh unidirectional pipe, `(read, write)`.
    fn pipe(&mut self) -> ShellResult<(Self::Fd, Self::Fd)>;

    /// Creates or truncates `path` for writing.
    fn open_sink(&mut self, path: &Path) -> ShellResult<Self::Fd>;

    fn spawn(&mut self, launch: LaunchSpec<Self::Fd>) -> ShellResult<Self::Child>;

    /// Blocks until `child` terminates.
    fn wait(&mut self, child: Self::Child) -> ShellResult<ExitStatus>;
}
