use std::{
    ffi::CString,
    os::fd::{AsRawFd, RawFd},
    path::Path,
};

use nix::{
    errno::Errno,
    libc,
    unistd::{close, dup2, execvp, fork, write, ForkResult},
};

use crate::{
    error::{ShellError, ShellResult},
    signals,
};

use super::{
    child::ChildProcess, descriptor::Descriptor, status::ExitStatus, Binding, LaunchSpec, Spawner,
};

/// Status a child exits with when its program could not be executed.
pub const LAUNCH_FAILURE_STATUS: i32 = 127;

const STDIN: RawFd = libc::STDIN_FILENO;
const STDOUT: RawFd = libc::STDOUT_FILENO;
const STDERR: RawFd = libc::STDERR_FILENO;

/// Spawns real processes with `fork` + `execvp`.
#[derive(Debug, Default)]
pub struct ForkExec;

impl Spawner for ForkExec {
    type Fd = Descriptor;
    type Child = ChildProcess;

    fn pipe(&mut self) -> ShellResult<(Descriptor, Descriptor)> {
        Descriptor::pipe().map_err(ShellError::Pipe)
    }

    fn open_sink(&mut self, path: &Path) -> ShellResult<Descriptor> {
        Descriptor::create_truncate(path).map_err(|source| ShellError::FileOpen {
            path: path.to_owned(),
            source,
        })
    }

    fn spawn(&mut self, launch: LaunchSpec<Descriptor>) -> ShellResult<ChildProcess> {
        let program = launch.command.program().to_owned();

        // nothing may allocate between fork and exec, so prepare it all here
        let argv = launch
            .command
            .argv()
            .iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ShellError::InvalidArgument(program.clone()))?;
        let prefix = format!("forksh: {program}: ");
        let stdin = raw(&launch.stdin);
        let stdout = raw(&launch.stdout);

        // SAFETY: the child branch only makes async-signal-safe calls
        // before exec or _exit
        match unsafe { fork() } {
            Ok(ForkResult::Child) => exec_child(&argv, stdin, stdout, prefix.as_bytes()),
            Ok(ForkResult::Parent { child }) => {
                debug!(pid = %child, command = %launch.command, "spawned");
                // `launch` drops here, closing the driver's copies
                Ok(ChildProcess::new(child, program))
            }
            Err(source) => Err(ShellError::ProcessCreation { program, source }),
        }
    }

    fn wait(&mut self, child: ChildProcess) -> ShellResult<ExitStatus> {
        let pid = child.pid();
        trace!(%pid, program = child.program(), "waiting");

        let status = child.wait()?;

        debug!(%pid, ?status, "reaped");

        Ok(status)
    }
}

fn raw(binding: &Binding<Descriptor>) -> Option<RawFd> {
    match binding {
        Binding::Inherit => None,
        Binding::Fd(fd) => Some(fd.as_raw_fd()),
    }
}

/// Runs in the forked child. Never returns.
fn exec_child(argv: &[CString], stdin: Option<RawFd>, stdout: Option<RawFd>, prefix: &[u8]) -> ! {
    signals::restore_defaults();

    if bind(stdin, STDIN).and(bind(stdout, STDOUT)).is_err() {
        let _ = write(STDERR, prefix);
        let _ = write(STDERR, b"failed to set up standard streams\n");
        // SAFETY: terminates the forked child without running parent cleanup
        unsafe { libc::_exit(1) }
    }

    // every other descriptor the driver holds is close-on-exec
    let err = match execvp(&argv[0], argv) {
        Err(err) => err,
        Ok(never) => match never {},
    };

    let reason = match err {
        Errno::ENOENT => "command not found",
        other => other.desc(),
    };
    let _ = write(STDERR, prefix);
    let _ = write(STDERR, reason.as_bytes());
    let _ = write(STDERR, b"\n");

    // SAFETY: see above
    unsafe { libc::_exit(LAUNCH_FAILURE_STATUS) }
}

/// Moves `fd` onto `slot` and closes the original.
fn bind(fd: Option<RawFd>, slot: RawFd) -> nix::Result<()> {
    match fd {
        Some(fd) if fd != slot => {
            dup2(fd, slot)?;
            close(fd)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cmd::execution_plan::Command;

    fn spawn(argv: &[&str]) -> ChildProcess {
        ForkExec
            .spawn(LaunchSpec::inherit(Command::new(argv.iter().copied()).unwrap()))
            .unwrap()
    }

    #[test]
    fn child_remembers_its_program() {
        let child = spawn(&["sh", "-c", "exit 3"]);

        assert_eq!(child.program(), "sh");
        assert_eq!(ForkExec.wait(child).unwrap(), ExitStatus::Exited(3));
    }

    #[test]
    fn unlaunchable_program_exits_with_failure_status() {
        let child = spawn(&["forksh-no-such-program-here"]);

        assert_eq!(
            ForkExec.wait(child).unwrap(),
            ExitStatus::Exited(LAUNCH_FAILURE_STATUS)
        );
    }

    #[test]
    fn nul_byte_in_argument_is_rejected_before_fork() {
        let err = ForkExec
            .spawn(LaunchSpec::inherit(Command::new(["echo", "a\0b"]).unwrap()))
            .unwrap_err();

        assert!(matches!(err, ShellError::InvalidArgument(ref program) if program == "echo"));
    }
}
