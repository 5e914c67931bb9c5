use nix::sys::signal::Signal;

/// How a reaped child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(Signal),
}

impl ExitStatus {
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Exited(code) => Some(*code),
            Self::Signaled(_) => None,
        }
    }

    pub fn success(&self) -> bool {
        *self == Self::Exited(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Process(ExitStatus),
    Builtin(BuiltinExitStatus),
}

impl From<ExitStatus> for CommandStatus {
    fn from(value: ExitStatus) -> Self {
        Self::Process(value)
    }
}

impl From<BuiltinExitStatus> for CommandStatus {
    fn from(value: BuiltinExitStatus) -> Self {
        Self::Builtin(value)
    }
}

impl CommandStatus {
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Process(status) => status.code(),
            Self::Builtin(status) => status.code(),
        }
    }

    pub fn success(&self) -> bool {
        match self {
            Self::Process(status) => status.success(),
            Self::Builtin(status) => status.success(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinExitStatus(Option<i32>);

impl BuiltinExitStatus {
    pub fn new_success() -> Self {
        Self(Some(0))
    }

    pub fn success(&self) -> bool {
        self.0 == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.0
    }
}
