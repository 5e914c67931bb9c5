use std::{io, path::Path};

use super::execution_plan::{Command, ExecutionPlan};
use crate::{
    builtins::{BuiltinCommand, BuiltinCommands, BuiltinContext},
    config::Config,
    error::report,
    prelude::*,
    process::status::CommandStatus,
};

impl ExecutionPlan {
    pub fn execute<S: Spawner>(&self, spawner: &mut S, config: &Config) -> ShellResult<()> {
        Executor::new(spawner, config).run(self)
    }
}

/// Runs plans against a [`Spawner`]. Every method returns only once every
/// child it started has been reaped.
pub struct Executor<'a, S> {
    spawner: &'a mut S,
    config: &'a Config,
}

impl<'a, S: Spawner> Executor<'a, S> {
    pub fn new(spawner: &'a mut S, config: &'a Config) -> Self {
        Self { spawner, config }
    }

    pub fn run(&mut self, plan: &ExecutionPlan) -> ShellResult<()> {
        match plan {
            ExecutionPlan::NoOp => Ok(()),
            ExecutionPlan::Simple(cmd) => self.run_simple(cmd).map(drop),
            ExecutionPlan::Sequential(cmds) => self.run_sequential(cmds),
            ExecutionPlan::Concurrent(cmds) => self.run_concurrent(cmds),
            ExecutionPlan::Redirected(cmd, target) => self.run_redirected(cmd, target),
            ExecutionPlan::Piped(stages, sink) => self.run_piped(stages, sink.as_deref()),
        }
    }

    /// Builtins run in the driver; anything else is one child, waited for.
    pub fn run_simple(&mut self, cmd: &Command) -> ShellResult<CommandStatus> {
        if let Some(builtin) = BuiltinCommands::from_name(cmd.program()) {
            let mut stdout = io::stdout();
            let mut ctx = BuiltinContext {
                config: self.config,
                stdout: &mut stdout,
            };

            return builtin.execute(cmd.args(), &mut ctx).map(Into::into);
        }

        let child = self.spawner.spawn(LaunchSpec::inherit(cmd.clone()))?;
        let status = self.spawner.wait(child)?;

        Ok(status.into())
    }

    /// One command at a time, in order. Failures of individual commands are
    /// reported and the chain moves on, unless a process could not be created.
    pub fn run_sequential(&mut self, cmds: &[Command]) -> ShellResult<()> {
        for cmd in cmds {
            trace!(%cmd, "sequential: running");

            match self.run_simple(cmd) {
                Ok(status) => trace!(%cmd, ?status, "sequential: finished"),
                Err(err) if err.aborts_plan() => return Err(err),
                Err(err) => report(&err),
            }
        }

        Ok(())
    }

    /// Starts every command, then reaps them all.
    pub fn run_concurrent(&mut self, cmds: &[Command]) -> ShellResult<()> {
        let mut children = Vec::with_capacity(cmds.len());

        for cmd in cmds {
            match self.spawner.spawn(LaunchSpec::inherit(cmd.clone())) {
                Ok(child) => children.push(child),
                Err(err) => report(&err),
            }
        }

        trace!(count = children.len(), "concurrent: all spawned");

        self.reap_all(children);

        Ok(())
    }

    pub fn run_redirected(&mut self, cmd: &Command, target: &Path) -> ShellResult<()> {
        if target.as_os_str().is_empty() {
            debug!(%cmd, "redirect: empty target, nothing to do");
            return Ok(());
        }

        // opened before spawning so a bad path never creates a process
        let file = self.spawner.open_sink(target)?;

        let child = self.spawner.spawn(LaunchSpec {
            command: cmd.clone(),
            stdin: Binding::Inherit,
            stdout: Binding::Fd(file),
        })?;
        self.spawner.wait(child)?;

        Ok(())
    }

    /// Launches every stage before waiting on any, so a stage that writes
    /// more than a pipe buffer holds never blocks on a reader that does not
    /// exist yet.
    pub fn run_piped(&mut self, stages: &[Command], sink: Option<&Path>) -> ShellResult<()> {
        let sink = match sink {
            Some(path) if path.as_os_str().is_empty() => {
                debug!("pipeline: empty sink, nothing to do");
                return Ok(());
            }
            Some(path) => Some(self.spawner.open_sink(path)?),
            None => None,
        };

        let mut children = Vec::with_capacity(stages.len());
        let spawned = self.spawn_stages(stages, sink, &mut children);

        // already running stages are reaped even when a later one failed
        self.reap_all(children);

        spawned
    }

    fn spawn_stages(
        &mut self,
        stages: &[Command],
        mut sink: Option<S::Fd>,
        children: &mut Vec<S::Child>,
    ) -> ShellResult<()> {
        let mut upstream = None;

        for (i, cmd) in stages.iter().enumerate() {
            let stdin = Binding::from_option(upstream.take());

            let (stdout, next) = if i + 1 == stages.len() {
                (Binding::from_option(sink.take()), None)
            } else {
                let (read, write) = self.spawner.pipe()?;
                (Binding::Fd(write), Some(read))
            };

            trace!(stage = i, %cmd, "pipeline: spawning");

            // the launch spec owns the previous read end and this write end,
            // both are closed in the driver as soon as the child exists
            children.push(self.spawner.spawn(LaunchSpec {
                command: cmd.clone(),
                stdin,
                stdout,
            })?);

            upstream = next;
        }

        Ok(())
    }

    fn reap_all(&mut self, children: Vec<S::Child>) {
        for child in children {
            match self.spawner.wait(child) {
                Ok(status) => trace!(?status, "reaped"),
                Err(err) => report(&err),
            }
        }
    }
}
