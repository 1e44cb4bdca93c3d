use crate::history::HistoryBuffer;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable session state shared by the interpreter and built-in commands.
///
/// The environment contains the two pieces of state a shell session mutates:
/// - `current_dir`: the working directory, changed only by `cd` and read by
///   the prompt and by every child spawn.
/// - `history`: the bounded log of entered command lines, appended by the
///   interpreter and read by `history` and `!n` replay.
///
/// Note: fields are public for simplicity to keep the crate small.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// Bounded log of entered command lines.
    pub history: HistoryBuffer,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            history: HistoryBuffer::new(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
