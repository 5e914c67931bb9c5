use crate::{
    error::{ShellError, ShellResult},
    process::status::BuiltinExitStatus,
};

use super::{BuiltinCommand, BuiltinContext};

#[derive(Default)]
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn execute(&self, _args: &[String], ctx: &mut BuiltinContext<'_>) -> ShellResult<BuiltinExitStatus> {
        let cwd = std::env::current_dir().map_err(ShellError::CurrentDir)?;

        writeln!(ctx.stdout, "{}", cwd.display()).map_err(ShellError::CurrentDir)?;

        Ok(BuiltinExitStatus::new_success())
    }
}
