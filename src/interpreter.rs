use crate::builtin;
use crate::env::Environment;
use crate::launcher::{self, Launcher, OutputMode};
use crate::lexer;
use crate::parser::{self, BuiltinKind, ExecutionPlan};
use anyhow::Result;
use regex::Regex;
use std::io::Write;
use std::path::Path;

/// Result of interpreting one command line.
#[derive(Debug, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Nothing happened: blank input, or malformed input dropped silently.
    Silent,
    /// Text produced for the caller to display.
    Printed(String),
    /// A built-in ran and produced no output.
    BuiltinHandled,
    /// An external command ran with inherited streams; its output already
    /// went to the controlling terminal.
    ProcessRan,
    /// A user-visible error message. The session continues.
    Error(String),
}

impl ExecutionOutcome {
    /// Text the front end should display, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::Printed(text) | ExecutionOutcome::Error(text) => Some(text),
            _ => None,
        }
    }
}

/// A minimal shell interpreter owning one session's state.
///
/// Front ends drive it with [`execute`](Self::execute) and render state via
/// [`prompt`](Self::prompt) and [`history_lines`](Self::history_lines). The
/// interpreter makes no threading guarantees: call operations sequentially,
/// one in flight at a time.
///
/// Example
/// ```
/// use msh::{Interpreter, OutputMode};
/// let mut sh = Interpreter::new(OutputMode::Capture);
/// let outcome = sh.execute("echo hello");
/// assert_eq!(outcome.output(), Some("hello\n"));
/// ```
pub struct Interpreter {
    env: Environment,
    launcher: Box<dyn Launcher>,
    mode: OutputMode,
}

impl Interpreter {
    /// Create an interpreter for the given output mode, using the host
    /// platform's process launcher.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            env: Environment::new(),
            launcher: launcher::host_launcher(),
            mode,
        }
    }

    /// Interpret one command line.
    ///
    /// A `!n` history reference re-submits the referenced entry through this
    /// same path, so a replayed command is recorded again as a new entry.
    /// Every other successfully tokenized non-blank line is appended to
    /// history before dispatch; a command that then fails to launch is still
    /// recorded.
    pub fn execute(&mut self, line: &str) -> ExecutionOutcome {
        if line.starts_with('!') {
            return self.execute_history_reference(line);
        }

        let tokens = match lexer::tokenize(line) {
            Ok(tokens) => tokens,
            // malformed input is a no-op: no process, no history entry
            Err(_) => return ExecutionOutcome::Silent,
        };
        if tokens.is_empty() {
            return ExecutionOutcome::Silent;
        }

        self.env.history.append(line);

        let plan = match parser::plan(tokens) {
            Ok(plan) => plan,
            Err(e) => return ExecutionOutcome::Error(e.to_string()),
        };

        match plan {
            ExecutionPlan::Builtin { kind, args } => self.run_builtin(kind, &args),
            ExecutionPlan::Pipeline { left, right } => self.finish(launcher::run_pipeline(
                self.launcher.as_ref(),
                &left,
                &right,
                self.mode,
                &self.env.current_dir,
            )),
            ExecutionPlan::Exec { argv, redirect } => self.finish(launcher::run_single(
                self.launcher.as_ref(),
                &argv,
                redirect.as_deref().map(Path::new),
                self.mode,
                &self.env.current_dir,
            )),
        }
    }

    /// Prompt for the current working directory with its first path segment
    /// (root or drive letter) stripped.
    pub fn prompt(&self) -> String {
        let cwd = self.env.current_dir.to_string_lossy();
        let tail = match cwd.split_once(std::path::MAIN_SEPARATOR) {
            Some((_, rest)) => rest,
            None => "",
        };
        format!("PY:\\{tail}> ")
    }

    /// Display lines for the stored history, `[index] entry`, each ending
    /// with the entry's own stored newline.
    pub fn history_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.env
            .history
            .iter()
            .map(|(index, entry)| format!("[{index}] {entry}"))
    }

    fn run_builtin(&mut self, kind: BuiltinKind, args: &[String]) -> ExecutionOutcome {
        let mut out = Vec::new();
        match builtin::dispatch(kind, args, &mut out, &mut self.env) {
            Ok(()) if out.is_empty() => ExecutionOutcome::BuiltinHandled,
            Ok(()) => ExecutionOutcome::Printed(String::from_utf8_lossy(&out).into_owned()),
            Err(e) => ExecutionOutcome::Error(e.to_string()),
        }
    }

    fn finish(&self, result: Result<Option<String>>) -> ExecutionOutcome {
        match result {
            Ok(Some(text)) => ExecutionOutcome::Printed(text),
            Ok(None) => ExecutionOutcome::ProcessRan,
            Err(e) => ExecutionOutcome::Error(e.to_string()),
        }
    }

    fn execute_history_reference(&mut self, line: &str) -> ExecutionOutcome {
        let entry = parse_history_reference(line)
            .and_then(|n| self.env.history.get(n))
            .map(|text| text.trim().to_string());
        let Some(text) = entry else {
            return ExecutionOutcome::Error("Invalid history reference".to_string());
        };

        let preface = format!("Re-running command: {text}\n");
        if self.mode == OutputMode::Inherit {
            // streamed mode: announce before the child starts writing
            print!("{preface}");
            std::io::stdout().flush().ok();
            return self.execute(&text);
        }
        match self.execute(&text) {
            ExecutionOutcome::Printed(output) => {
                ExecutionOutcome::Printed(format!("{preface}{output}"))
            }
            ExecutionOutcome::Error(message) => {
                ExecutionOutcome::Error(format!("{preface}{message}"))
            }
            _ => ExecutionOutcome::Printed(preface),
        }
    }
}

/// Digits after `!`, or `None` when the directive is malformed.
fn parse_history_reference(line: &str) -> Option<usize> {
    let reference = Regex::new(r"^!\s*(\d+)\s*$").ok()?;
    reference.captures(line)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn capture_shell() -> Interpreter {
        Interpreter::new(OutputMode::Capture)
    }

    #[test]
    fn whitespace_only_input_is_a_no_op() {
        let mut sh = capture_shell();
        assert_eq!(sh.execute("   \t  "), ExecutionOutcome::Silent);
        assert!(sh.env.history.is_empty());
    }

    #[test]
    fn unterminated_quote_is_dropped_silently() {
        let mut sh = capture_shell();
        assert_eq!(sh.execute("echo \"oops"), ExecutionOutcome::Silent);
        assert!(sh.env.history.is_empty());
    }

    #[test]
    fn failed_launches_are_still_recorded() {
        let mut sh = capture_shell();
        sh.execute("a");
        sh.execute("b");
        sh.execute("c");
        let lines: Vec<_> = sh.history_lines().collect();
        assert_eq!(lines, vec!["[1] a\n", "[2] b\n", "[3] c\n"]);
    }

    #[test]
    #[cfg(unix)]
    fn history_builtin_lists_itself_as_its_latest_entry() {
        let mut sh = capture_shell();
        sh.execute("echo one");
        let outcome = sh.execute("history");
        assert_eq!(
            outcome,
            ExecutionOutcome::Printed("[1] echo one\n[2] history\n".to_string())
        );
    }

    #[test]
    fn missing_redirect_target_is_reported_and_recorded() {
        let mut sh = capture_shell();
        let outcome = sh.execute("echo hi >");
        assert_eq!(
            outcome,
            ExecutionOutcome::Error("No file specified for redirection".to_string())
        );
        assert_eq!(sh.env.history.len(), 1);
    }

    #[test]
    fn cd_without_argument_reports_the_expected_message() {
        let mut sh = capture_shell();
        assert_eq!(
            sh.execute("cd"),
            ExecutionOutcome::Error("cd: expected argument".to_string())
        );
    }

    #[test]
    fn cd_to_a_missing_directory_keeps_the_session_directory() {
        let mut sh = capture_shell();
        let before = sh.env.current_dir.clone();
        let outcome = sh.execute("cd /no/such/dir/anywhere");
        match outcome {
            ExecutionOutcome::Error(message) => {
                assert!(message.contains("/no/such/dir/anywhere"), "{message}");
            }
            other => panic!("expected an error, got {other:?}"),
        }
        assert_eq!(sh.env.current_dir, before);
    }

    #[test]
    #[cfg(unix)]
    fn captured_process_output_is_returned() {
        let mut sh = capture_shell();
        assert_eq!(
            sh.execute("echo hello"),
            ExecutionOutcome::Printed("hello\n".to_string())
        );
    }

    #[test]
    #[cfg(unix)]
    fn redirect_writes_the_file_and_returns_no_stdout_text() {
        let tmp = env::temp_dir().join(format!("interp_tests_{}_redir", std::process::id()));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let target = tmp.join("out.txt");

        let mut sh = capture_shell();
        let outcome = sh.execute(&format!("echo hello > {}", target.display()));
        assert_eq!(outcome, ExecutionOutcome::Printed(String::new()));
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");
        let _ = fs::remove_dir_all(tmp);
    }

    #[test]
    #[cfg(unix)]
    fn pipe_with_missing_right_stage_reports_not_found() {
        let mut sh = capture_shell();
        assert_eq!(
            sh.execute("echo hi | definitely_not_a_real_cmd_4921"),
            ExecutionOutcome::Error("Command not found".to_string())
        );
    }

    #[test]
    #[cfg(unix)]
    fn pipe_output_is_captured_from_the_right_stage() {
        let mut sh = capture_shell();
        assert_eq!(
            sh.execute("echo hello | cat"),
            ExecutionOutcome::Printed("hello\n".to_string())
        );
    }

    #[test]
    fn out_of_range_history_reference_is_invalid() {
        let mut sh = capture_shell();
        sh.execute("a");
        sh.execute("b");
        assert_eq!(
            sh.execute("!3"),
            ExecutionOutcome::Error("Invalid history reference".to_string())
        );
        // nothing executed, nothing appended
        assert_eq!(sh.env.history.len(), 2);
    }

    #[test]
    fn non_numeric_history_reference_is_invalid() {
        let mut sh = capture_shell();
        sh.execute("a");
        for directive in ["!x", "!1x", "!", "!-1", "!1 2"] {
            assert_eq!(
                sh.execute(directive),
                ExecutionOutcome::Error("Invalid history reference".to_string()),
                "directive {directive:?}"
            );
        }
        assert_eq!(sh.env.history.len(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn replay_re_executes_verbatim_and_appends_a_duplicate() {
        let mut sh = capture_shell();
        sh.execute("echo one");
        sh.execute("echo two");
        let outcome = sh.execute("!1");
        assert_eq!(
            outcome,
            ExecutionOutcome::Printed("Re-running command: echo one\none\n".to_string())
        );
        let lines: Vec<_> = sh.history_lines().collect();
        assert_eq!(
            lines,
            vec!["[1] echo one\n", "[2] echo two\n", "[3] echo one\n"]
        );
    }

    #[test]
    #[cfg(unix)]
    fn replay_of_a_failing_command_carries_the_preface() {
        let mut sh = capture_shell();
        sh.execute("definitely_not_a_real_cmd_4921");
        let outcome = sh.execute("!1");
        assert_eq!(
            outcome,
            ExecutionOutcome::Error(
                "Re-running command: definitely_not_a_real_cmd_4921\nCommand not found"
                    .to_string()
            )
        );
        assert_eq!(sh.env.history.len(), 2);
    }

    #[test]
    #[cfg(unix)]
    fn prompt_strips_the_first_path_segment() {
        let mut sh = capture_shell();
        sh.env.current_dir = "/home/user/project".into();
        assert_eq!(sh.prompt(), "PY:\\home/user/project> ");
    }

    #[test]
    #[cfg(unix)]
    fn prompt_at_the_root_shows_an_empty_path() {
        let mut sh = capture_shell();
        sh.env.current_dir = "/".into();
        assert_eq!(sh.prompt(), "PY:\\> ");
    }

    #[test]
    fn parse_history_reference_accepts_digits_only() {
        assert_eq!(parse_history_reference("!7"), Some(7));
        assert_eq!(parse_history_reference("! 7"), Some(7));
        assert_eq!(parse_history_reference("!7 "), Some(7));
        assert_eq!(parse_history_reference("!"), None);
        assert_eq!(parse_history_reference("!+7"), None);
        assert_eq!(parse_history_reference("!seven"), None);
    }
}
