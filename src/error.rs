use miette::{miette, LabeledSpan, Report, Severity};

use crate::air::AsmError;
use crate::lexer::LexError;
use crate::runtime::ExecError;

/// Render an assembly fault against the source line it came from.
pub fn asm_report(err: AsmError, src: String) -> Report {
    match err {
        AsmError::Lex(lex) => lex_report(lex, src),
        AsmError::WrongArity { found } => miette!(
            severity = Severity::Error,
            code = "asm::arity",
            help = "an instruction is a mnemonic followed by zero to three operands",
            "Malformed instruction: expected 1 to 4 tokens, found {found}.",
        )
        .with_source_code(src),
        AsmError::MissingOpcode { span } => miette!(
            severity = Severity::Error,
            code = "asm::missing_opcode",
            help = "every instruction must start with a mnemonic like `load` or `add`",
            labels = vec![LabeledSpan::at(span, "not an opcode")],
            "Instruction does not start with an opcode.",
        )
        .with_source_code(src),
        AsmError::OpcodeInOperand { span } => miette!(
            severity = Severity::Error,
            code = "asm::opcode_operand",
            help = "operands are registers (`$N`) or immediates (`#N`)",
            labels = vec![LabeledSpan::at(span, "opcode in operand field")],
            "Opcode found in an operand field.",
        )
        .with_source_code(src),
    }
}

fn lex_report(err: LexError, src: String) -> Report {
    match err {
        LexError::UnknownChar { ch, span } => miette!(
            severity = Severity::Error,
            code = "lex::unknown_char",
            help = "tokens are mnemonics, `$N` registers, and `#N` immediates",
            labels = vec![LabeledSpan::at(span, "unrecognized character")],
            "Unknown character {ch:?}.",
        )
        .with_source_code(src),
        LexError::RegisterRange { span } => miette!(
            severity = Severity::Error,
            code = "lex::register_range",
            help = "register references must fit in a byte; the file has $0 through $31",
            labels = vec![LabeledSpan::at(span, "register out of range")],
            "Register reference out of range.",
        )
        .with_source_code(src),
        LexError::NumberRange { span } => miette!(
            severity = Severity::Error,
            code = "lex::number_range",
            help = "immediates are signed 32-bit values, truncated to 16 bits on encode",
            labels = vec![LabeledSpan::at(span, "literal out of range")],
            "Number literal out of range.",
        )
        .with_source_code(src),
    }
}

/// Render an execution fault. No source text exists for program bytes, so
/// these reports carry position context in the message instead of labels.
pub fn exec_report(err: ExecError, pc: usize) -> Report {
    match err {
        ExecError::UnknownOpcode { byte } => miette!(
            severity = Severity::Error,
            code = "exec::decode",
            help = "misspelled mnemonics assemble to the reserved illegal opcode and fault here",
            "Unrecognized opcode 0x{byte:02x} at byte offset {pc}.",
        ),
        ExecError::RegisterBound { index } => miette!(
            severity = Severity::Error,
            code = "exec::register",
            help = "valid registers are $0 through $31",
            "Illegal register number {index}.",
        ),
        ExecError::UnexpectedEnd => miette!(
            severity = Severity::Error,
            code = "exec::truncated",
            help = "the program ended in the middle of an instruction's operands",
            "Unexpected end of program at byte offset {pc}.",
        ),
        ExecError::DivisionByZero => miette!(
            severity = Severity::Error,
            code = "exec::div_zero",
            "Division by zero at byte offset {pc}.",
        ),
    }
}
