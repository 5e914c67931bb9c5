use std::{
    os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd},
    path::Path,
};

use nix::{
    fcntl::{open, OFlag},
    sys::stat::Mode,
    unistd::pipe2,
};

/// An owned, close-on-exec file descriptor. Closed on drop.
#[derive(Debug)]
pub struct Descriptor(OwnedFd);

impl Descriptor {
    /// Returns `(read, write)`.
    pub fn pipe() -> nix::Result<(Self, Self)> {
        let (read, write) = pipe2(OFlag::O_CLOEXEC)?;

        // SAFETY: both ends were just created and nothing else owns them
        Ok(unsafe { (Self::from_raw(read), Self::from_raw(write)) })
    }

    /// Opens `path` write-only, creating it with mode 0644 or truncating it.
    pub fn create_truncate(path: &Path) -> nix::Result<Self> {
        let fd = open(
            path,
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC | OFlag::O_CLOEXEC,
            Mode::from_bits_truncate(0o644),
        )?;

        // SAFETY: freshly opened, owned by nobody else
        Ok(unsafe { Self::from_raw(fd) })
    }

    unsafe fn from_raw(fd: RawFd) -> Self {
        Self(OwnedFd::from_raw_fd(fd))
    }
}

impl AsRawFd for Descriptor {
    fn as_raw_fd(&self) -> RawFd {
        self.0.as_raw_fd()
    }
}
