use std::path::PathBuf;

use crate::{
    error::{ShellError, ShellResult},
    process::status::BuiltinExitStatus,
};

use super::{BuiltinCommand, BuiltinContext};

#[derive(Default)]
pub struct Cd;

impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn execute(&self, args: &[String], ctx: &mut BuiltinContext<'_>) -> ShellResult<BuiltinExitStatus> {
        trace!("executing cd builtin: {args:?}");

        let path = args
            .first()
            .map(PathBuf::from)
            .unwrap_or_else(|| ctx.config.home_dir());

        match std::env::set_current_dir(&path) {
            Ok(()) => Ok(BuiltinExitStatus::new_success()),
            Err(source) => Err(ShellError::DirectoryChange { path, source }),
        }
    }
}
