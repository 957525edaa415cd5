use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::error::{asm_report, exec_report};
use crate::parser::AsmParser;
use crate::runtime::RunState;

/// Interactive session: reads one line at a time, dispatches meta-commands,
/// and feeds everything else through the assembler into the machine.
///
/// Machine state is deliberately never reset between lines, so jump targets
/// refer to the cumulative program. `.reset` starts over explicitly.
pub struct Repl {
    history: Vec<String>,
    state: RunState,
}

impl Repl {
    pub fn new() -> Self {
        Repl {
            history: Vec::new(),
            state: RunState::new(),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        println!("{}", "ingot bytecode machine".bold());
        println!("Type assembly, or .help for commands.");

        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            print!("{} ", ">>>".cyan());
            io::stdout().flush()?;

            line.clear();
            if stdin.lock().read_line(&mut line)? == 0 {
                // Closed input ends the session.
                println!();
                break;
            }
            let input = line.trim_end_matches(['\n', '\r']).to_string();
            self.history.push(input.clone());

            match input.trim() {
                ".quit" => break,
                ".help" => self.help(),
                ".history" => {
                    for entry in &self.history {
                        println!("{entry}");
                    }
                }
                ".program" => self.list_program(),
                ".registers" => {
                    println!("{}", self.state.registers());
                }
                ".reset" => {
                    self.state.reset();
                    println!("{}", "Machine state cleared.".dimmed());
                }
                _ => self.eval(&input),
            }
        }
        Ok(())
    }

    /// Assemble one line and run the machine over the appended bytes.
    fn eval(&mut self, input: &str) {
        let mut parser = AsmParser::new(input);
        loop {
            match parser.next_stmt() {
                Ok(Some(stmt)) => match stmt.emit() {
                    Ok(bytes) => {
                        self.state.append(&bytes);
                        if let Err(err) = self.state.run() {
                            let pc = self.state.pc();
                            eprintln!("{:?}", exec_report(err, pc));
                            break;
                        }
                    }
                    Err(err) => {
                        eprintln!("{:?}", asm_report(err, input.to_string()));
                        break;
                    }
                },
                Ok(None) => break,
                Err(err) => {
                    eprintln!("{:?}", asm_report(err, input.to_string()));
                    break;
                }
            }
        }
    }

    fn list_program(&self) {
        let program = self.state.program();
        if program.is_empty() {
            println!("{}", "Program buffer is empty.".dimmed());
            return;
        }
        for (row, chunk) in program.chunks(8).enumerate() {
            let bytes = chunk
                .iter()
                .map(|b| format!("{b:02x}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{:04x}: {bytes}", row * 8);
        }
    }

    fn help(&self) {
        println!(".quit       end the session");
        println!(".help       show this listing");
        println!(".history    every line entered this session");
        println!(".program    hex dump of the program buffer");
        println!(".registers  contents of all 32 registers");
        println!(".reset      clear program, registers, and flags");
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}
