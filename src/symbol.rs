use std::fmt;
use std::ops::Range;

use miette::SourceSpan;

/// Location within a source line
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Span {
    offs: SrcOffset,
    len: usize,
}

impl Span {
    pub fn new(offs: SrcOffset, len: usize) -> Self {
        Span { offs, len }
    }

    pub fn dummy() -> Self {
        Span {
            offs: SrcOffset(0),
            len: 0,
        }
    }

    pub fn offs(&self) -> usize {
        self.offs.0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn end(&self) -> usize {
        self.offs.0 + self.len
    }
}

impl From<Span> for SourceSpan {
    fn from(value: Span) -> Self {
        SourceSpan::new(value.offs().into(), value.len())
    }
}

impl From<Span> for Range<usize> {
    fn from(value: Span) -> Self {
        value.offs()..value.end()
    }
}

/// Used to refer to offsets from the start of a source line.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SrcOffset(pub usize);

/// Number of general-purpose registers in the machine.
pub const REG_COUNT: usize = 32;

/// Operation codes of the machine.
///
/// Declaration order is significant: each opcode is encoded as its `u8`
/// discriminant, and `Igl` must stay the final, reserved value. Unknown bytes
/// decode to `Igl`, as do unknown mnemonics, so a bad spelling only faults
/// once the machine tries to execute it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Opcode {
    Load = 0,
    Add,
    Sub,
    Mul,
    Div,
    Hlt,
    Jmp,
    Jmpf,
    Eq,
    Neq,
    Gte,
    Lte,
    Lt,
    Gt,
    Jmpe,
    /// Reserved sentinel for unrecognized mnemonics and bytes.
    Igl,
}

impl Opcode {
    /// Stable one-byte encoding of this opcode.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a program byte. Unmapped bytes become `Igl`.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => Opcode::Load,
            1 => Opcode::Add,
            2 => Opcode::Sub,
            3 => Opcode::Mul,
            4 => Opcode::Div,
            5 => Opcode::Hlt,
            6 => Opcode::Jmp,
            7 => Opcode::Jmpf,
            8 => Opcode::Eq,
            9 => Opcode::Neq,
            10 => Opcode::Gte,
            11 => Opcode::Lte,
            12 => Opcode::Lt,
            13 => Opcode::Gt,
            14 => Opcode::Jmpe,
            _ => Opcode::Igl,
        }
    }

    /// Resolve a mnemonic case-insensitively. Unknown names become `Igl`.
    pub fn from_mnemonic(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "load" => Opcode::Load,
            "add" => Opcode::Add,
            "sub" => Opcode::Sub,
            "mul" => Opcode::Mul,
            "div" => Opcode::Div,
            "hlt" => Opcode::Hlt,
            "jmp" => Opcode::Jmp,
            "jmpf" => Opcode::Jmpf,
            "eq" => Opcode::Eq,
            "neq" => Opcode::Neq,
            "gte" => Opcode::Gte,
            "lte" => Opcode::Lte,
            "lt" => Opcode::Lt,
            "gt" => Opcode::Gt,
            "jmpe" => Opcode::Jmpe,
            _ => Opcode::Igl,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Load => "load",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Hlt => "hlt",
            Opcode::Jmp => "jmp",
            Opcode::Jmpf => "jmpf",
            Opcode::Eq => "eq",
            Opcode::Neq => "neq",
            Opcode::Gte => "gte",
            Opcode::Lte => "lte",
            Opcode::Lt => "lt",
            Opcode::Gt => "gt",
            Opcode::Jmpe => "jmpe",
            Opcode::Igl => "igl",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ALL: [Opcode; 16] = [
        Opcode::Load,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Hlt,
        Opcode::Jmp,
        Opcode::Jmpf,
        Opcode::Eq,
        Opcode::Neq,
        Opcode::Gte,
        Opcode::Lte,
        Opcode::Lt,
        Opcode::Gt,
        Opcode::Jmpe,
        Opcode::Igl,
    ];

    #[test]
    fn byte_encoding_is_inverse() {
        // Every opcode must have exactly one encode arm and one decode arm.
        for (i, op) in ALL.iter().enumerate() {
            assert_eq!(op.code(), i as u8);
            assert_eq!(Opcode::from_byte(op.code()), *op);
        }
    }

    #[test]
    fn mnemonic_resolution_is_inverse() {
        for op in ALL.iter().filter(|op| **op != Opcode::Igl) {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), *op);
        }
    }

    #[test]
    fn mnemonics_are_case_insensitive() {
        assert_eq!(Opcode::from_mnemonic("LOAD"), Opcode::Load);
        assert_eq!(Opcode::from_mnemonic("JmPf"), Opcode::Jmpf);
    }

    #[test]
    fn unknown_names_and_bytes_are_illegal() {
        assert_eq!(Opcode::from_mnemonic("laod"), Opcode::Igl);
        // "igl" is reserved, not a real mnemonic.
        assert_eq!(Opcode::from_mnemonic("igl"), Opcode::Igl);
        assert_eq!(Opcode::from_byte(15), Opcode::Igl);
        assert_eq!(Opcode::from_byte(200), Opcode::Igl);
    }
}
