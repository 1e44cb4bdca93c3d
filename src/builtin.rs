//! Built-in commands interpreted directly by the shell.

use crate::env::Environment;
use crate::parser::BuiltinKind;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Commands known to the shell at compile time.
///
/// Built-ins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// in-process; they never reach redirection, pipe, or launcher handling.
trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd".
    fn name() -> &'static str;

    /// Executes the command against the session state.
    ///
    /// Anything the command produces for display is written to `stdout`;
    /// failures come back as errors for the interpreter to surface.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<()>;
}

/// Parse and run the built-in selected by the classifier.
pub(crate) fn dispatch(
    kind: BuiltinKind,
    args: &[String],
    stdout: &mut dyn Write,
    env: &mut Environment,
) -> Result<()> {
    match kind {
        BuiltinKind::Cd => run::<Cd>(args, stdout, env),
        BuiltinKind::History => run::<History>(args, stdout, env),
    }
}

fn run<T: BuiltinCommand>(
    args: &[String],
    stdout: &mut dyn Write,
    env: &mut Environment,
) -> Result<()> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match T::from_args(&[T::name()], &args) {
        Ok(cmd) => cmd.execute(stdout, env),
        Err(EarlyExit { output, status }) => {
            if status.is_err() {
                Err(anyhow::anyhow!(output))
            } else {
                // --help and friends
                stdout.write_all(output.as_bytes())?;
                Ok(())
            }
        }
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<()> {
        let target = match self.target.as_deref() {
            Some(t) if !t.is_empty() => PathBuf::from(t),
            _ => anyhow::bail!("cd: expected argument"),
        };

        let new_dir = if target.is_absolute() {
            target.clone()
        } else {
            env.current_dir.join(&target)
        };

        let canonical = fs::canonicalize(&new_dir)
            .map_err(|e| anyhow::anyhow!("cd failed: {}: {}", e, target.display()))?;

        // Process-wide, so relative paths in later commands resolve here too.
        env::set_current_dir(&canonical)
            .map_err(|e| anyhow::anyhow!("cd failed: {}: {}", e, canonical.display()))?;
        env.current_dir = canonical;
        Ok(())
    }
}

#[derive(FromArgs)]
/// List the recorded command history with 1-based indices.
struct History {}

impl BuiltinCommand for History {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<()> {
        for (index, entry) in env.history.iter() {
            // entries keep their trailing newline, so none is added here
            write!(stdout, "[{index}] {entry}")?;
        }
        Ok(())
    }
}
