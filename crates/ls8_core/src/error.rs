use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while loading or running an LS-8 program.
///
/// Every variant is fatal: the run loop stops, the caller reports the
/// diagnostic, and the process exits non-zero. Nothing is retried or
/// recovered in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ls8Error {
    /// The program file could not be opened.
    ProgramNotFound(PathBuf),
    /// The program has more bytes than the machine has memory cells.
    ProgramTooLarge(usize),
    /// A memory access fell outside the 256-byte address space.
    AddressOutOfBounds(u16),
    /// The byte at `addr` does not encode any LS-8 instruction.
    UnknownInstruction { opcode: u8, addr: u16 },
    /// A non-arithmetic opcode was routed to the ALU.
    UnsupportedAluOp(u8),
    /// A push would grow the stack down into the loaded program.
    StackOverflow,
    /// A pop was attempted with nothing left on the stack.
    StackUnderflow,
}

impl fmt::Display for Ls8Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ls8Error::ProgramNotFound(path) => {
                write!(f, "program file not found: {}", path.display())
            }
            Ls8Error::ProgramTooLarge(len) => {
                write!(f, "program of {} bytes does not fit in 256 bytes of memory", len)
            }
            Ls8Error::AddressOutOfBounds(addr) => {
                write!(f, "memory access out of bounds: {:#04X}", addr)
            }
            Ls8Error::UnknownInstruction { opcode, addr } => {
                write!(f, "unknown instruction {:#010b} at {:#04X}", opcode, addr)
            }
            Ls8Error::UnsupportedAluOp(opcode) => {
                write!(f, "unsupported ALU operation {:#010b}", opcode)
            }
            Ls8Error::StackOverflow => {
                write!(f, "stack overflow: stack would grow into the loaded program")
            }
            Ls8Error::StackUnderflow => write!(f, "stack underflow: stack is empty"),
        }
    }
}

impl std::error::Error for Ls8Error {}
