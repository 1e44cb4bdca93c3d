//! Launching external processes behind a platform-policy seam.

use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

/// How child process output reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Children share the shell's own standard streams; nothing is returned.
    Inherit,
    /// Standard output and error are collected and returned as text, for
    /// front ends that render output themselves.
    Capture,
}

/// Platform policy for turning a token list into a spawnable [`Command`].
///
/// Exactly one implementation is selected at startup by [`host_launcher`];
/// callers never branch on platform themselves.
pub trait Launcher {
    fn command(&self, argv: &[String]) -> Command;
}

/// Runs tokens directly as `argv[0], argv[1..]` (POSIX hosts).
///
/// Children are detached into their own process group so the shell's
/// ignored interactive signals stay its own; this is best-effort and absent
/// on platforms without the concept.
pub struct Direct;

impl Launcher for Direct {
    fn command(&self, argv: &[String]) -> Command {
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }
}

/// Wraps tokens through the platform command host (`cmd /c ...`), since
/// bare executable resolution works differently outside POSIX.
pub struct CmdHost;

impl Launcher for CmdHost {
    fn command(&self, argv: &[String]) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/c").args(argv);
        cmd
    }
}

/// The launcher matching the host platform.
pub fn host_launcher() -> Box<dyn Launcher> {
    if cfg!(unix) {
        Box::new(Direct)
    } else {
        Box::new(CmdHost)
    }
}

/// Run a single command to completion.
///
/// With a redirect target, stdout is written into the created (or
/// truncated) file. Captured mode returns the collected text: stderr alone
/// when redirected, stdout followed by stderr otherwise.
pub fn run_single(
    launcher: &dyn Launcher,
    argv: &[String],
    redirect: Option<&Path>,
    mode: OutputMode,
    cwd: &Path,
) -> Result<Option<String>> {
    if argv.is_empty() {
        anyhow::bail!("empty command");
    }
    let mut cmd = launcher.command(argv);
    cmd.current_dir(cwd);
    if let Some(target) = redirect {
        let file = File::create(target).map_err(|e| anyhow!("{}: {}", target.display(), e))?;
        cmd.stdout(file);
    }
    match mode {
        OutputMode::Inherit => {
            cmd.status().map_err(launch_error)?;
            Ok(None)
        }
        OutputMode::Capture => {
            // output() pipes whatever wasn't configured explicitly, so a
            // redirect file set above stays in effect
            let out = cmd.output().map_err(launch_error)?;
            let text = if redirect.is_some() {
                String::from_utf8_lossy(&out.stderr).into_owned()
            } else {
                let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&out.stderr));
                text
            };
            Ok(Some(text))
        }
    }
}

/// Run `left | right`, waiting on the right-hand process.
///
/// The left process is spawned with its stdout piped into the right one and
/// is never reaped here: when the right side fails to launch the left keeps
/// running detached, and even on success only the right side is waited on.
pub fn run_pipeline(
    launcher: &dyn Launcher,
    left: &[String],
    right: &[String],
    mode: OutputMode,
    cwd: &Path,
) -> Result<Option<String>> {
    if left.is_empty() || right.is_empty() {
        anyhow::bail!("empty command");
    }

    let mut first = launcher.command(left);
    first.current_dir(cwd).stdout(Stdio::piped());
    let mut first_child = first.spawn().map_err(launch_error)?;
    let first_out = first_child
        .stdout
        .take()
        .context("pipe stage is missing its stdout handle")?;

    let mut second = launcher.command(right);
    second.current_dir(cwd).stdin(Stdio::from(first_out));
    match mode {
        OutputMode::Inherit => {
            let mut child = second.spawn().map_err(launch_error)?;
            child.wait()?;
            Ok(None)
        }
        OutputMode::Capture => {
            second.stdout(Stdio::piped());
            let child = second.spawn().map_err(launch_error)?;
            let out = child.wait_with_output()?;
            Ok(Some(String::from_utf8_lossy(&out.stdout).into_owned()))
        }
    }
}

/// A spawn failure never ends the session; a missing executable gets the
/// conventional message and everything else surfaces its own text.
fn launch_error(err: std::io::Error) -> anyhow::Error {
    if err.kind() == ErrorKind::NotFound {
        anyhow!("Command not found")
    } else {
        anyhow!(err)
    }
}
