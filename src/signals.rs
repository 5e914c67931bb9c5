//! SIGINT and SIGTSTP handling.
//!
//! While the driver waits at the prompt both signals only raise a flag. The
//! read loop checks the flag once per iteration with [`take_interrupt`].
//! Children put both signals back to their default disposition right after
//! `fork`, so the same keypress that the driver shrugs off still stops or
//! kills whatever is running.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::{
    libc,
    sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal},
};

const INTERACTIVE: [Signal; 2] = [Signal::SIGINT, Signal::SIGTSTP];

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

extern "C" fn absorb(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Makes the driver absorb the interactive signals.
pub fn install() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(absorb),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );

    for signal in INTERACTIVE {
        // SAFETY: the handler only stores to an atomic
        unsafe { sigaction(signal, &action) }?;
    }

    trace!("installed interactive signal handlers");

    Ok(())
}

/// Puts the interactive signals back to their default disposition.
///
/// Called in forked children before exec, so it must stay
/// async-signal-safe: no allocation, no logging.
pub fn restore_defaults() {
    let action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());

    for signal in INTERACTIVE {
        // SAFETY: installing SIG_DFL has no handler to reason about
        let _ = unsafe { sigaction(signal, &action) };
    }
}

/// Returns whether an interrupt arrived since the last call, and clears it.
pub fn take_interrupt() -> bool {
    INTERRUPTED.swap(false, Ordering::SeqCst)
}
