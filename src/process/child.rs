use nix::{
    errno::Errno,
    sys::wait::{waitpid, WaitStatus},
    unistd::Pid,
};

use crate::error::{ShellError, ShellResult};

use super::status::ExitStatus;

/// A running child. Not `Clone`: reaping consumes it, so each child is
/// waited on exactly once by whoever spawned it.
#[derive(Debug)]
pub struct ChildProcess {
    pid: Pid,
    program: String,
}

impl ChildProcess {
    pub(super) fn new(pid: Pid, program: String) -> Self {
        Self { pid, program }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn wait(self) -> ShellResult<ExitStatus> {
        loop {
            match waitpid(self.pid, None) {
                Ok(WaitStatus::Exited(_, code)) => break Ok(ExitStatus::Exited(code)),
                Ok(WaitStatus::Signaled(_, signal, _)) => break Ok(ExitStatus::Signaled(signal)),
                // only reachable with tracing flags we never pass
                Ok(other) => trace!(?other, pid = %self.pid, "ignoring wait status"),
                Err(Errno::EINTR) => continue,
                Err(source) => {
                    break Err(ShellError::Wait {
                        program: self.program,
                        source,
                    })
                }
            }
        }
    }
}
