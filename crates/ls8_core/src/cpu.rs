use std::time::{Duration, Instant};

use crate::error::Ls8Error;
use crate::opcode::Opcode;
use crate::{
    FL_EQUAL, FL_GREATER, FL_LESS, IM, IS, NUM_REGS, RAM_SIZE, SP, STACK_TOP, TIMER_INTERRUPT,
};

/// How often the timer line is raised in the interrupt status register.
const TIMER_INTERVAL: Duration = Duration::from_secs(1);

/// The LS-8 machine state.
///
/// Everything the CPU owns lives here: memory, the register file, PC, the
/// flags register, and the interrupt timer. Handlers mutate this struct
/// through `&mut self` rather than any ambient state, and a single `Cpu`
/// value is owned by the run loop for the lifetime of one program.
pub struct Cpu {
    ram: [u8; RAM_SIZE],
    reg: [u8; NUM_REGS],
    pc: u16,
    /// Flags register; holds one of `FL_LESS`/`FL_GREATER`/`FL_EQUAL`
    /// after a CMP, 0 before the first comparison.
    fl: u8,
    halted: bool,
    /// Address just past the last loaded program byte. The stack grows
    /// down from `STACK_TOP` and must not cross this boundary.
    end_of_stack: u16,
    last_timer_tick: Instant,
    /// Values emitted by PRN, in order. PRN also prints to stdout; the
    /// buffer exists so callers and tests can observe program output.
    output: Vec<u8>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        let mut cpu = Self {
            ram: [0; RAM_SIZE],
            reg: [0; NUM_REGS],
            pc: 0,
            fl: 0,
            halted: false,
            end_of_stack: 0,
            last_timer_tick: Instant::now(),
            output: Vec::new(),
        };
        cpu.reg[SP] = STACK_TOP;
        cpu
    }

    /// Reset the machine to its power-on state, clearing memory and any
    /// loaded program.
    pub fn reset(&mut self) {
        self.ram = [0; RAM_SIZE];
        self.reg = [0; NUM_REGS];
        self.reg[SP] = STACK_TOP;
        self.pc = 0;
        self.fl = 0;
        self.halted = false;
        self.end_of_stack = 0;
        self.last_timer_tick = Instant::now();
        self.output.clear();
    }

    /// Copy a program image into memory starting at address 0 and place
    /// the end-of-stack boundary just past it.
    pub fn load(&mut self, program: &[u8]) -> Result<(), Ls8Error> {
        if program.len() > RAM_SIZE {
            return Err(Ls8Error::ProgramTooLarge(program.len()));
        }
        self.ram[..program.len()].copy_from_slice(program);
        self.end_of_stack = program.len() as u16;
        Ok(())
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Values printed by PRN so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    fn ram_read(&self, addr: u16) -> Result<u8, Ls8Error> {
        self.ram
            .get(addr as usize)
            .copied()
            .ok_or(Ls8Error::AddressOutOfBounds(addr))
    }

    fn ram_write(&mut self, addr: u16, value: u8) -> Result<(), Ls8Error> {
        match self.ram.get_mut(addr as usize) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Ls8Error::AddressOutOfBounds(addr)),
        }
    }

    /// Run fetch-decode-execute cycles until the program halts or a fatal
    /// error occurs. Errors also leave the machine halted.
    pub fn run(&mut self) -> Result<(), Ls8Error> {
        while !self.halted {
            if let Err(err) = self.step() {
                self.halted = true;
                return Err(err);
            }
        }
        Ok(())
    }

    /// Execute a single fetch-decode-execute cycle.
    ///
    /// The interrupt controller is consulted after the instruction fetch
    /// and before the instruction's handler runs. When the handler does
    /// not set PC itself, PC advances past the instruction and its
    /// operands.
    pub fn step(&mut self) -> Result<(), Ls8Error> {
        let ir = self.ram_read(self.pc)?;

        self.check_interrupts();

        let op = Opcode::decode(ir).ok_or(Ls8Error::UnknownInstruction {
            opcode: ir,
            addr: self.pc,
        })?;

        let operand_a = if op.operand_count() >= 1 {
            self.ram_read(self.pc + 1)?
        } else {
            0
        };
        let operand_b = if op.operand_count() == 2 {
            self.ram_read(self.pc + 2)?
        } else {
            0
        };

        if log::log_enabled!(log::Level::Trace) {
            self.trace();
        }

        self.exec(op, operand_a, operand_b)?;

        if !op.sets_pc() {
            self.pc += op.operand_count() + 1;
        }
        Ok(())
    }

    fn exec(&mut self, op: Opcode, operand_a: u8, operand_b: u8) -> Result<(), Ls8Error> {
        let reg_a = reg_index(operand_a);
        match op {
            Opcode::Ldi => {
                self.reg[reg_a] = operand_b;
            }
            Opcode::Prn => {
                let value = self.reg[reg_a];
                println!("{}", value);
                self.output.push(value);
            }
            Opcode::Hlt => {
                self.halted = true;
            }
            Opcode::Add | Opcode::Mul | Opcode::Cmp => {
                self.alu(op, reg_a, reg_index(operand_b))?;
            }
            Opcode::Push => {
                self.push(self.reg[reg_a])?;
            }
            Opcode::Pop => {
                let value = self.pop()?;
                self.reg[reg_a] = value;
            }
            Opcode::Jmp => {
                self.pc = self.reg[reg_a] as u16;
            }
            Opcode::Call => {
                // Return address is the byte after this two-byte instruction.
                self.push((self.pc + 2) as u8)?;
                self.pc = self.reg[reg_a] as u16;
            }
            Opcode::Ret => {
                self.pc = self.pop()? as u16;
            }
            Opcode::St => {
                let addr = self.reg[reg_a] as u16;
                self.ram_write(addr, self.reg[reg_index(operand_b)])?;
            }
            Opcode::Jeq => {
                if self.fl == FL_EQUAL {
                    self.pc = self.reg[reg_a] as u16;
                } else {
                    self.pc += 2;
                }
            }
            Opcode::Jne => {
                if self.fl != FL_EQUAL {
                    self.pc = self.reg[reg_a] as u16;
                } else {
                    self.pc += 2;
                }
            }
        }
        Ok(())
    }

    /// ALU operations: arithmetic writes back to `reg_a` with modulo-256
    /// wraparound; CMP only updates the flags register.
    fn alu(&mut self, op: Opcode, reg_a: usize, reg_b: usize) -> Result<(), Ls8Error> {
        match op {
            Opcode::Add => {
                self.reg[reg_a] = self.reg[reg_a].wrapping_add(self.reg[reg_b]);
            }
            Opcode::Mul => {
                self.reg[reg_a] = self.reg[reg_a].wrapping_mul(self.reg[reg_b]);
            }
            Opcode::Cmp => {
                self.fl = if self.reg[reg_a] == self.reg[reg_b] {
                    FL_EQUAL
                } else if self.reg[reg_a] < self.reg[reg_b] {
                    FL_LESS
                } else {
                    FL_GREATER
                };
            }
            other => return Err(Ls8Error::UnsupportedAluOp(other.encode())),
        }
        Ok(())
    }

    /// Push a byte, refusing to grow the stack down into the program.
    /// On failure neither SP nor memory is touched.
    fn push(&mut self, value: u8) -> Result<(), Ls8Error> {
        let sp = self.reg[SP];
        if u16::from(sp) <= self.end_of_stack {
            return Err(Ls8Error::StackOverflow);
        }
        self.reg[SP] = sp - 1;
        self.ram[self.reg[SP] as usize] = value;
        Ok(())
    }

    /// Pop a byte, refusing to read past the initial stack top.
    /// On failure neither SP nor the destination is touched.
    fn pop(&mut self) -> Result<u8, Ls8Error> {
        let sp = self.reg[SP];
        if sp >= STACK_TOP {
            return Err(Ls8Error::StackUnderflow);
        }
        let value = self.ram[sp as usize];
        self.reg[SP] = sp + 1;
        Ok(value)
    }

    /// Direct stack write used by the interrupt state save. Unlike `push`
    /// this path performs no boundary check.
    fn push_unchecked(&mut self, value: u8) {
        self.reg[SP] = self.reg[SP].wrapping_sub(1);
        self.ram[self.reg[SP] as usize] = value;
    }

    /// Poll the interrupt controller.
    ///
    /// Raises the timer line in IS once per `TIMER_INTERVAL`, then scans
    /// the masked pending bits in ascending order. The first set bit
    /// clears both IM and IS and saves machine state to the stack: PC,
    /// FL, then R0 through R6. At most one interrupt is taken per cycle.
    ///
    /// The reference machine stops at the state save; control never
    /// transfers to a handler vector, so execution resumes with the
    /// instruction that was about to run.
    fn check_interrupts(&mut self) {
        if self.last_timer_tick.elapsed() >= TIMER_INTERVAL {
            self.last_timer_tick = Instant::now();
            self.reg[IS] |= TIMER_INTERRUPT;
        }

        let masked = self.reg[IM] & self.reg[IS];
        for bit in 0..8 {
            if (masked >> bit) & 1 == 1 {
                self.reg[IM] = 0;
                self.reg[IS] = 0;

                self.push_unchecked(self.pc as u8);
                self.push_unchecked(self.fl);
                for i in 0..=6 {
                    self.push_unchecked(self.reg[i]);
                }
                break;
            }
        }
    }

    /// Log the machine state in the classic LS-8 trace format:
    /// PC, the three bytes at PC, and the full register file.
    pub fn trace(&self) {
        log::trace!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} | {:02X} {:02X} {:02X} {:02X} {:02X} {:02X} {:02X} {:02X}",
            self.pc,
            self.peek(self.pc),
            self.peek(self.pc + 1),
            self.peek(self.pc + 2),
            self.reg[0],
            self.reg[1],
            self.reg[2],
            self.reg[3],
            self.reg[4],
            self.reg[5],
            self.reg[6],
            self.reg[7],
        );
    }

    fn peek(&self, addr: u16) -> u8 {
        self.ram.get(addr as usize).copied().unwrap_or(0)
    }
}

/// Register operands use only the low three bits; the upper bits of an
/// operand byte are ignored, as on the 8-register hardware.
#[inline]
fn reg_index(operand: u8) -> usize {
    (operand & 0x07) as usize
}
