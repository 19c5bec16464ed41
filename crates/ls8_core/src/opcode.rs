/// Encoded LS-8 instruction bytes.
///
/// The layout packs decode metadata into the opcode itself:
/// bits 7-6 are the operand count, bit 5 marks ALU instructions, and
/// bit 4 marks instructions that set PC themselves.
pub const LDI: u8 = 0b1000_0010;
pub const PRN: u8 = 0b0100_0111;
pub const HLT: u8 = 0b0000_0001;
pub const ADD: u8 = 0b1010_0000;
pub const MUL: u8 = 0b1010_0010;
pub const PUSH: u8 = 0b0100_0101;
pub const POP: u8 = 0b0100_0110;
pub const JMP: u8 = 0b0101_0100;
pub const CALL: u8 = 0b0101_0000;
pub const RET: u8 = 0b0001_0001;
pub const ST: u8 = 0b1000_0100;
pub const CMP: u8 = 0b1010_0111;
pub const JEQ: u8 = 0b0101_0101;
pub const JNE: u8 = 0b0101_0110;

/// The LS-8 instruction set.
///
/// A closed enum so that the dispatcher's `match` is exhaustive: adding an
/// opcode forces a handling decision at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    Ldi,
    Prn,
    Hlt,
    Add,
    Mul,
    Push,
    Pop,
    Jmp,
    Call,
    Ret,
    St,
    Cmp,
    Jeq,
    Jne,
}

impl Opcode {
    /// Decode an instruction byte, or `None` if it encodes nothing.
    pub fn decode(byte: u8) -> Option<Opcode> {
        match byte {
            LDI => Some(Opcode::Ldi),
            PRN => Some(Opcode::Prn),
            HLT => Some(Opcode::Hlt),
            ADD => Some(Opcode::Add),
            MUL => Some(Opcode::Mul),
            PUSH => Some(Opcode::Push),
            POP => Some(Opcode::Pop),
            JMP => Some(Opcode::Jmp),
            CALL => Some(Opcode::Call),
            RET => Some(Opcode::Ret),
            ST => Some(Opcode::St),
            CMP => Some(Opcode::Cmp),
            JEQ => Some(Opcode::Jeq),
            JNE => Some(Opcode::Jne),
            _ => None,
        }
    }

    /// The encoded instruction byte.
    pub const fn encode(self) -> u8 {
        match self {
            Opcode::Ldi => LDI,
            Opcode::Prn => PRN,
            Opcode::Hlt => HLT,
            Opcode::Add => ADD,
            Opcode::Mul => MUL,
            Opcode::Push => PUSH,
            Opcode::Pop => POP,
            Opcode::Jmp => JMP,
            Opcode::Call => CALL,
            Opcode::Ret => RET,
            Opcode::St => ST,
            Opcode::Cmp => CMP,
            Opcode::Jeq => JEQ,
            Opcode::Jne => JNE,
        }
    }

    /// Number of operand bytes following the instruction byte (0, 1, or 2).
    #[inline]
    pub const fn operand_count(self) -> u16 {
        ((self.encode() >> 6) & 0b11) as u16
    }

    /// Whether the instruction writes PC itself.
    ///
    /// When true the dispatcher leaves PC alone after the handler runs;
    /// otherwise it advances PC past the instruction and its operands.
    #[inline]
    pub const fn sets_pc(self) -> bool {
        (self.encode() >> 4) & 1 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_round_trips_every_instruction() {
        let all = [
            Opcode::Ldi,
            Opcode::Prn,
            Opcode::Hlt,
            Opcode::Add,
            Opcode::Mul,
            Opcode::Push,
            Opcode::Pop,
            Opcode::Jmp,
            Opcode::Call,
            Opcode::Ret,
            Opcode::St,
            Opcode::Cmp,
            Opcode::Jeq,
            Opcode::Jne,
        ];
        for op in all {
            assert_eq!(Opcode::decode(op.encode()), Some(op));
        }
    }

    #[test]
    fn decode_rejects_unused_bytes() {
        assert_eq!(Opcode::decode(0x00), None);
        assert_eq!(Opcode::decode(0xFF), None);
        assert_eq!(Opcode::decode(0b1010_0001), None);
    }

    #[test]
    fn operand_counts_follow_the_high_bits() {
        assert_eq!(Opcode::Hlt.operand_count(), 0);
        assert_eq!(Opcode::Ret.operand_count(), 0);
        assert_eq!(Opcode::Prn.operand_count(), 1);
        assert_eq!(Opcode::Jmp.operand_count(), 1);
        assert_eq!(Opcode::Ldi.operand_count(), 2);
        assert_eq!(Opcode::Cmp.operand_count(), 2);
    }

    #[test]
    fn only_flow_control_sets_pc() {
        for op in [Opcode::Jmp, Opcode::Call, Opcode::Ret, Opcode::Jeq, Opcode::Jne] {
            assert!(op.sets_pc(), "{:?} should set PC", op);
        }
        for op in [
            Opcode::Ldi,
            Opcode::Prn,
            Opcode::Hlt,
            Opcode::Add,
            Opcode::Mul,
            Opcode::Push,
            Opcode::Pop,
            Opcode::St,
            Opcode::Cmp,
        ] {
            assert!(!op.sets_pc(), "{:?} should not set PC", op);
        }
    }
}
