pub mod cpu;
pub mod error;
pub mod loader;
pub mod opcode;

pub use cpu::Cpu;
pub use error::Ls8Error;
pub use opcode::Opcode;

/// Total addressable memory for the LS-8 (256 bytes).
pub const RAM_SIZE: usize = 256;
/// Number of general-purpose registers.
pub const NUM_REGS: usize = 8;

/// R7 doubles as the stack pointer.
pub const SP: usize = 7;
/// R5 holds the interrupt mask (IM).
pub const IM: usize = 5;
/// R6 holds the interrupt status (IS).
pub const IS: usize = 6;

/// Initial stack-pointer value; the stack grows downward from here.
pub const STACK_TOP: u8 = 0xF4;

/// Timer interrupt line in the IM/IS registers.
pub const TIMER_INTERRUPT: u8 = 0b1000_0000;

/// Flag bits in the FL register set by CMP.
///
/// Exactly one of these is set after a comparison; FL is 0 before the
/// first CMP executes.
pub const FL_LESS: u8 = 0b100;
pub const FL_GREATER: u8 = 0b010;
pub const FL_EQUAL: u8 = 0b001;
