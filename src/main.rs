use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use ingot::{asm_report, exec_report, AsmParser, Repl, RunState};

/// Ingot is a small register-machine bytecode VM with an assembly REPL.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide an assembly file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a source file and execute it to completion
    Run {
        /// Assembly file to run
        name: PathBuf,
    },
    /// Start an interactive session (the default)
    Repl,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Some(Command::Run { name }) => run(&name),
        Some(Command::Repl) => repl(),
        None => match args.path {
            Some(path) => run(&path),
            None => repl(),
        },
    }
}

fn repl() -> Result<()> {
    Repl::new().run().into_diagnostic()
}

/// Assemble a whole file, then run the machine until it halts.
fn run(path: &Path) -> Result<()> {
    let src = fs::read_to_string(path).into_diagnostic()?;

    let mut state = RunState::new();
    let mut parser = AsmParser::new(&src);
    loop {
        match parser.next_stmt() {
            Ok(Some(stmt)) => {
                let bytes = stmt.emit().map_err(|e| asm_report(e, src.clone()))?;
                state.append(&bytes);
            }
            Ok(None) => break,
            Err(err) => return Err(asm_report(err, src.clone())),
        }
    }

    state.run().map_err(|e| exec_report(e, state.pc()))?;

    println!("{}", "Halted".cyan());
    println!("{}", state.registers());
    Ok(())
}
