use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    diagnostics::{LantanaError, Result},
    runtime::Interpreter,
};

pub struct Repl {
    interpreter: Interpreter,
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

impl Repl {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()
            .map_err(|err| LantanaError::from(std::io::Error::other(err)))?;
        loop {
            match editor.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == ":quit" || trimmed == ":exit" {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    match self.interpreter.eval_source(trimmed) {
                        Ok(value) => {
                            println!("{value}");
                        }
                        Err(LantanaError::Diagnostic(diag)) => {
                            eprintln!("{diag}");
                        }
                        Err(other) => eprintln!("error: {other}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    return Err(LantanaError::from(std::io::Error::other(err)));
                }
            }
        }
        Ok(())
    }
}
