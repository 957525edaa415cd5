use std::fmt;

use crate::symbol::{Opcode, REG_COUNT};

/// The machine's bank of general-purpose storage: 32 signed 32-bit cells,
/// zero-initialized, bounds-checked on every access.
pub struct RegFile {
    cells: [i32; REG_COUNT],
}

impl RegFile {
    pub fn new() -> Self {
        RegFile {
            cells: [0; REG_COUNT],
        }
    }

    pub fn get(&self, index: u8) -> Result<i32, ExecError> {
        self.cells
            .get(index as usize)
            .copied()
            .ok_or(ExecError::RegisterBound { index })
    }

    pub fn set(&mut self, index: u8, value: i32) -> Result<(), ExecError> {
        match self.cells.get_mut(index as usize) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(ExecError::RegisterBound { index }),
        }
    }
}

impl Default for RegFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegFile {
    /// Stable 32-line `$N = value` listing for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "${i:<2} = {value}")?;
        }
        Ok(())
    }
}

/// Represents complete machine state during runtime.
///
/// State persists across assemble/run cycles within one session: the program
/// buffer only ever grows, and the counter, registers, and flags carry over
/// between appended batches. Callers wanting per-program isolation must call
/// [`RunState::reset`] between them.
pub struct RunState {
    reg: RegFile,
    /// Program counter: byte offset of the next fetch.
    pc: usize,
    /// Append-only instruction stream.
    program: Vec<u8>,
    /// Remainder of the most recent division.
    remainder: u32,
    /// Result of the most recent comparison.
    equal_flag: bool,
}

impl RunState {
    pub fn new() -> Self {
        RunState {
            reg: RegFile::new(),
            pc: 0,
            program: Vec::new(),
            remainder: 0,
            equal_flag: false,
        }
    }

    /// Append freshly assembled bytes to the instruction stream.
    pub fn append(&mut self, bytes: &[u8]) {
        self.program.extend_from_slice(bytes);
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    pub fn registers(&self) -> &RegFile {
        &self.reg
    }

    pub fn registers_mut(&mut self) -> &mut RegFile {
        &mut self.reg
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn remainder(&self) -> u32 {
        self.remainder
    }

    pub fn equal_flag(&self) -> bool {
        self.equal_flag
    }

    /// Discard the program and restore every state cell to its initial value.
    pub fn reset(&mut self) {
        *self = RunState::new();
    }

    /// Execute a single instruction.
    ///
    /// Returns `Ok(false)` when nothing was or can be executed: on `hlt`, or
    /// when the counter sits at or past the end of the program. A counter
    /// left out of bounds by a jump is therefore not a fault.
    pub fn step(&mut self) -> Result<bool, ExecError> {
        if self.pc >= self.program.len() {
            return Ok(false);
        }

        let byte = self.program[self.pc];
        self.pc += 1;

        match Opcode::from_byte(byte) {
            Opcode::Load => {
                let reg = self.next_byte()?;
                let imm = self.next_wide()?;
                // Immediates are sign-extended from their 16-bit encoding.
                self.reg.set(reg, imm as i16 as i32)?;
            }
            Opcode::Add => self.arithmetic(i32::wrapping_add)?,
            Opcode::Sub => self.arithmetic(i32::wrapping_sub)?,
            Opcode::Mul => self.arithmetic(i32::wrapping_mul)?,
            Opcode::Div => {
                let lhs_idx = self.next_byte()?;
                let lhs = self.reg.get(lhs_idx)?;
                let rhs_idx = self.next_byte()?;
                let rhs = self.reg.get(rhs_idx)?;
                let dest = self.next_byte()?;
                if rhs == 0 {
                    return Err(ExecError::DivisionByZero);
                }
                self.reg.set(dest, lhs.wrapping_div(rhs))?;
                self.remainder = lhs.wrapping_rem(rhs) as u32;
            }
            Opcode::Eq => self.comparison(|a, b| a == b)?,
            Opcode::Neq => self.comparison(|a, b| a != b)?,
            Opcode::Gte => self.comparison(|a, b| a >= b)?,
            Opcode::Lte => self.comparison(|a, b| a <= b)?,
            Opcode::Lt => self.comparison(|a, b| a < b)?,
            Opcode::Gt => self.comparison(|a, b| a > b)?,
            Opcode::Jmpe => {
                // Operand byte is consumed whether or not the jump is taken.
                let target_idx = self.next_byte()?;
                let target = self.reg.get(target_idx)?;
                if self.equal_flag {
                    self.pc = target as usize;
                }
            }
            Opcode::Jmp => {
                let target_idx = self.next_byte()?;
                let target = self.reg.get(target_idx)?;
                self.pc = target as usize;
            }
            Opcode::Jmpf => {
                let offset_idx = self.next_byte()?;
                let offset = self.reg.get(offset_idx)?;
                self.pc = self.pc.wrapping_add_signed(offset as isize);
            }
            Opcode::Hlt => return Ok(false),
            Opcode::Igl => return Err(ExecError::UnknownOpcode { byte }),
        }

        Ok(true)
    }

    /// Repeatedly single-step until the machine halts or faults.
    pub fn run(&mut self) -> Result<(), ExecError> {
        while self.step()? {}
        Ok(())
    }

    // dst := f(src1, src2), three register operands.
    fn arithmetic(&mut self, f: fn(i32, i32) -> i32) -> Result<(), ExecError> {
        let lhs_idx = self.next_byte()?;
        let lhs = self.reg.get(lhs_idx)?;
        let rhs_idx = self.next_byte()?;
        let rhs = self.reg.get(rhs_idx)?;
        let dest = self.next_byte()?;
        self.reg.set(dest, f(lhs, rhs))
    }

    // Sets the comparison flag. The third operand byte is reserved: it is
    // consumed but neither written nor bounds-checked.
    fn comparison(&mut self, f: fn(i32, i32) -> bool) -> Result<(), ExecError> {
        let lhs_idx = self.next_byte()?;
        let lhs = self.reg.get(lhs_idx)?;
        let rhs_idx = self.next_byte()?;
        let rhs = self.reg.get(rhs_idx)?;
        self.equal_flag = f(lhs, rhs);
        let _ = self.next_byte()?;
        Ok(())
    }

    #[inline]
    fn next_byte(&mut self) -> Result<u8, ExecError> {
        match self.program.get(self.pc) {
            Some(byte) => {
                self.pc += 1;
                Ok(*byte)
            }
            None => Err(ExecError::UnexpectedEnd),
        }
    }

    #[inline]
    fn next_wide(&mut self) -> Result<u16, ExecError> {
        let high = self.next_byte()?;
        let low = self.next_byte()?;
        Ok(u16::from_be_bytes([high, low]))
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Execution faults. The machine stops at the faulting instruction; the
/// session owning it decides whether to report, reset, or continue.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExecError {
    /// Fetched byte maps to no opcode.
    UnknownOpcode { byte: u8 },
    /// Register operand outside the file.
    RegisterBound { index: u8 },
    /// Program ended in the middle of an instruction's operands.
    UnexpectedEnd,
    /// Division by zero.
    DivisionByZero,
}

impl std::error::Error for ExecError {}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::UnknownOpcode { byte } => {
                write!(f, "unrecognized opcode 0x{byte:02x}")
            }
            ExecError::RegisterBound { index } => {
                write!(f, "illegal register number {index}")
            }
            ExecError::UnexpectedEnd => write!(f, "unexpected end of program"),
            ExecError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}
