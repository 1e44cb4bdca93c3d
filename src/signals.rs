//! Signal dispositions for the interactive run loop.
//!
//! The shell itself ignores the interactive interrupt and suspend signals so
//! the run loop survives Ctrl-C / Ctrl-Z at an empty prompt. Children are
//! detached into their own process groups by the launcher and keep their own
//! dispositions.

use anyhow::Result;

#[cfg(unix)]
use nix::sys::signal::{SigHandler, Signal, signal};

/// RAII guard for the run loop's signal mask. The previous dispositions are
/// restored when the guard is dropped.
pub struct SignalMask {
    #[cfg(unix)]
    saved: Vec<(Signal, SigHandler)>,
}

/// Ignore `SIGINT` and `SIGTSTP` for the lifetime of the returned guard.
#[cfg(unix)]
pub fn install() -> Result<SignalMask> {
    let mut saved = Vec::new();
    for sig in [Signal::SIGINT, Signal::SIGTSTP] {
        let old = unsafe { signal(sig, SigHandler::SigIgn) }?;
        saved.push((sig, old));
    }
    Ok(SignalMask { saved })
}

/// No interactive signal mask exists on this platform.
#[cfg(not(unix))]
pub fn install() -> Result<SignalMask> {
    Ok(SignalMask {})
}

#[cfg(unix)]
impl Drop for SignalMask {
    fn drop(&mut self) {
        for (sig, old) in self.saved.drain(..) {
            let _ = unsafe { signal(sig, old) };
        }
    }
}
