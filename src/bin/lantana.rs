use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};

use lantana::{Interpreter, LantanaError, Repl, lexer::Lexer};

#[derive(Parser)]
#[command(author, version, about = "Lantana language interpreter")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Lantana script file
    Run { script: PathBuf },
    /// Evaluate a snippet of Lantana code
    Eval { source: String },
    /// Print the token stream of a script file
    Tokens { script: PathBuf },
    /// Start an interactive REPL session
    Repl,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = match args.command.unwrap_or(Command::Repl) {
        Command::Run { script } => run_script(&script),
        Command::Eval { source } => eval_snippet(&source),
        Command::Tokens { script } => dump_tokens(&script),
        Command::Repl => {
            let mut repl = Repl::new();
            repl.run()
        }
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(LantanaError::Diagnostic(diag)) => {
            eprintln!("{diag}");
            ExitCode::from(65)
        }
        Err(LantanaError::Io(err)) => {
            eprintln!("error: {err}");
            ExitCode::from(74)
        }
    }
}

fn run_script(path: &PathBuf) -> Result<(), LantanaError> {
    let source = fs::read_to_string(path)?;
    let mut interpreter = Interpreter::new();
    interpreter.eval_source(&source)?;
    Ok(())
}

fn eval_snippet(source: &str) -> Result<(), LantanaError> {
    let mut interpreter = Interpreter::new();
    let value = interpreter.eval_source(source)?;
    println!("{value}");
    Ok(())
}

fn dump_tokens(path: &PathBuf) -> Result<(), LantanaError> {
    let source = fs::read_to_string(path)?;
    let tokens = Lexer::new(&source).tokenize()?;
    for token in tokens {
        println!("{:?} `{}` (line {})", token.kind, token.lexeme, token.line);
    }
    Ok(())
}
