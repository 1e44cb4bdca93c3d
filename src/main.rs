use anyhow::Result;
use msh::{ExecutionOutcome, Interpreter, OutputMode, signals};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

fn main() -> Result<()> {
    let _mask = signals::install()?;
    let mut rl = DefaultEditor::new()?;
    let mut shell = Interpreter::new(OutputMode::Inherit);

    loop {
        match rl.readline(&shell.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }
                rl.add_history_entry(line.as_str())?;
                match shell.execute(&line) {
                    ExecutionOutcome::Printed(text) => {
                        print!("{text}");
                        std::io::stdout().flush()?;
                    }
                    ExecutionOutcome::Error(message) => println!("{message}"),
                    _ => {}
                }
            }
            // the session ignores interrupt/suspend; only end-of-input or
            // the exit keywords leave the loop
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }

    Ok(())
}
