// Assembling
mod lexer;
pub use lexer::{LexError, Lexer, Token, TokenKind};
mod parser;
pub use parser::AsmParser;
mod air;
pub use air::{AsmError, AsmStmt};

// Running
mod runtime;
pub use runtime::{ExecError, RegFile, RunState};
mod repl;
pub use repl::Repl;

mod error;
pub use error::{asm_report, exec_report};

mod symbol;
pub use symbol::{Opcode, REG_COUNT};
