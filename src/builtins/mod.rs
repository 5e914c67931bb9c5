use std::io::Write;

use enum_dispatch::enum_dispatch;
use strum::{EnumIter, IntoEnumIterator};

use crate::{config::Config, error::ShellResult, process::status::BuiltinExitStatus};

pub mod cd;
pub mod pwd;

/// What a builtin may touch while running inside the driver.
pub struct BuiltinContext<'a> {
    pub config: &'a Config,
    pub stdout: &'a mut dyn Write,
}

#[enum_dispatch(BuiltinCommands)]
pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn execute(&self, args: &[String], ctx: &mut BuiltinContext<'_>) -> ShellResult<BuiltinExitStatus>;
}

#[enum_dispatch]
#[derive(EnumIter)]
pub enum BuiltinCommands {
    Cd(cd::Cd),
    Pwd(pwd::Pwd),
}

impl BuiltinCommands {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|cmd| cmd.name() == name)
    }
}
