//! A minimal interactive command-line shell, split into a reusable core and
//! a thin line-oriented front end.
//!
//! The core interprets one command line at a time: it tokenizes the line
//! with shell-style quoting rules, handles the `cd` and `history` built-ins
//! in-process, and dispatches everything else to external programs with
//! support for a single pipe stage and stdout redirection. Entered lines
//! are kept in a bounded history buffer and can be replayed by index with
//! `!n`.
//!
//! The main entry point is [`Interpreter`]. Front ends drive it with
//! [`Interpreter::execute`] and render [`Interpreter::prompt`] and
//! [`Interpreter::history_lines`] however they like: the bundled binary
//! streams child output straight to the terminal ([`OutputMode::Inherit`]),
//! while an embedding front end collects it as text
//! ([`OutputMode::Capture`]).

mod builtin;
pub mod env;
pub mod history;
mod interpreter;
mod launcher;
mod lexer;
mod parser;
pub mod signals;

pub use interpreter::{ExecutionOutcome, Interpreter};
pub use launcher::OutputMode;
