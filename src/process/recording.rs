//! A [`Spawner`] that records what it was asked to do instead of creating
//! processes, for checking ordering and descriptor lifetimes.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    rc::Rc,
};

use nix::errno::Errno;

use crate::error::{ShellError, ShellResult};

use super::{status::ExitStatus, Binding, LaunchSpec, Spawner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pipe { read: usize, write: usize },
    OpenSink { fd: usize, path: PathBuf },
    Spawn {
        pid: usize,
        argv: Vec<String>,
        stdin: Option<usize>,
        stdout: Option<usize>,
    },
    Close(usize),
    Wait(usize),
}

type Log = Rc<RefCell<Vec<Event>>>;

/// Logs [`Event::Close`] when dropped.
#[derive(Debug)]
pub struct RecordedFd {
    id: usize,
    log: Log,
}

impl Drop for RecordedFd {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::Close(self.id));
    }
}

#[derive(Debug)]
pub struct RecordedChild {
    pid: usize,
    program: String,
}

#[derive(Debug, Default)]
pub struct RecordingSpawner {
    log: Log,
    next_fd: usize,
    next_pid: usize,
    failing_programs: HashSet<String>,
    exit_codes: HashMap<String, i32>,
    fail_pipes: bool,
    fail_sinks: bool,
}

impl RecordingSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawning `program` fails as if `fork` had.
    pub fn fail_spawn_of(mut self, program: &str) -> Self {
        self.failing_programs.insert(program.to_owned());
        self
    }

    pub fn exit_code(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_owned(), code);
        self
    }

    pub fn fail_pipes(mut self) -> Self {
        self.fail_pipes = true;
        self
    }

    pub fn fail_sinks(mut self) -> Self {
        self.fail_sinks = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    fn fd(&mut self) -> RecordedFd {
        self.next_fd += 1;
        RecordedFd {
            id: self.next_fd,
            log: self.log.clone(),
        }
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

fn id(binding: &Binding<RecordedFd>) -> Option<usize> {
    match binding {
        Binding::Inherit => None,
        Binding::Fd(fd) => Some(fd.id),
    }
}

impl Spawner for RecordingSpawner {
    type Fd = RecordedFd;
    type Child = RecordedChild;

    fn pipe(&mut self) -> ShellResult<(RecordedFd, RecordedFd)> {
        if self.fail_pipes {
            return Err(ShellError::Pipe(Errno::EMFILE));
        }

        let (read, write) = (self.fd(), self.fd());
        self.record(Event::Pipe {
            read: read.id,
            write: write.id,
        });

        Ok((read, write))
    }

    fn open_sink(&mut self, path: &Path) -> ShellResult<RecordedFd> {
        if self.fail_sinks {
            return Err(ShellError::FileOpen {
                path: path.to_owned(),
                source: Errno::EACCES,
            });
        }

        let fd = self.fd();
        self.record(Event::OpenSink {
            fd: fd.id,
            path: path.to_owned(),
        });

        Ok(fd)
    }

    fn spawn(&mut self, launch: LaunchSpec<RecordedFd>) -> ShellResult<RecordedChild> {
        let program = launch.command.program().to_owned();

        if self.failing_programs.contains(&program) {
            return Err(ShellError::ProcessCreation {
                program,
                source: Errno::EAGAIN,
            });
        }

        self.next_pid += 1;
        self.record(Event::Spawn {
            pid: self.next_pid,
            argv: launch.command.argv().to_vec(),
            stdin: id(&launch.stdin),
            stdout: id(&launch.stdout),
        });

        Ok(RecordedChild {
            pid: self.next_pid,
            program,
        })
    }

    fn wait(&mut self, child: RecordedChild) -> ShellResult<ExitStatus> {
        self.record(Event::Wait(child.pid));

        Ok(ExitStatus::Exited(
            self.exit_codes.get(&child.program).copied().unwrap_or(0),
        ))
    }
}
