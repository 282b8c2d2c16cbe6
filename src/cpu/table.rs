/*!
table.rs - Immutable 256-entry opcode table.

Purpose
=======
Maps every opcode byte to an `Instruction` record:
  {mnemonic, operation tag, addressing-mode tag, base cycles}

`dispatch` matches exhaustively on the `Operation` tag and `addressing`
resolves the `AddressingMode` tag, so no handler pointers are stored here
and the table is plain `const` data shared by the whole process.

Coverage
========
- All 151 documented opcodes.
- Every undocumented slot is filled with its commonly documented mnemonic,
  addressing mode and base cycle count. Mnemonics carry a `*` prefix.
  Undocumented NOPs use `Operation::Nop` (they read their operand, and the
  abs,X forms pay the page-cross cycle). LAX and LAS are
  `Operation::UnofficialRead`, which also pays it. Everything else is
  `Operation::Unofficial`, which only skips the instruction bytes. JAM
  (KIL) is a 1-byte, 2-cycle no-op rather than a lock-up.

Instruction length is derived from the addressing mode; it is not stored.
*/

/// Operation tag: what an instruction does, independent of where its
/// operand comes from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    // Loads / stores
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    // Register transfers
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,
    // Stack
    Pha,
    Php,
    Pla,
    Plp,
    // Logical / arithmetic
    And,
    Ora,
    Eor,
    Bit,
    Adc,
    Sbc,
    Cmp,
    Cpx,
    Cpy,
    // Increments / decrements
    Inc,
    Inx,
    Iny,
    Dec,
    Dex,
    Dey,
    // Shifts / rotates
    Asl,
    Lsr,
    Rol,
    Ror,
    // Jumps / calls
    Jmp,
    Jsr,
    Rts,
    Brk,
    Rti,
    // Branches
    Bcc,
    Bcs,
    Beq,
    Bne,
    Bmi,
    Bpl,
    Bvc,
    Bvs,
    // Flag changes
    Clc,
    Cld,
    Cli,
    Clv,
    Sec,
    Sed,
    Sei,
    Nop,
    /// Undocumented opcode executed as a timed no-op.
    Unofficial,
    /// Undocumented read (LAX, LAS): a timed no-op that still pays the
    /// indexed page-cross cycle.
    UnofficialRead,
}

impl Operation {
    /// Read instructions that take +1 cycle when indexed addressing
    /// (abs,X / abs,Y / (zp),Y) crosses a page.
    pub fn has_page_penalty(self) -> bool {
        matches!(
            self,
            Operation::Lda
                | Operation::Ldx
                | Operation::Ldy
                | Operation::And
                | Operation::Ora
                | Operation::Eor
                | Operation::Adc
                | Operation::Sbc
                | Operation::Cmp
                | Operation::Nop
                | Operation::UnofficialRead
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP ($nnnn) only.
    Indirect,
    /// ($nn,X)
    IndirectX,
    /// ($nn),Y
    IndirectY,
    Relative,
}

impl AddressingMode {
    /// Total instruction length in bytes, opcode included.
    pub const fn len(self) -> u16 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 1,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 2,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub op: Operation,
    pub mode: AddressingMode,
    /// Base cycle count before page-cross and branch penalties.
    pub cycles: u8,
}

impl Instruction {
    #[inline]
    pub const fn len(&self) -> u16 {
        self.mode.len()
    }

    #[inline]
    pub fn is_official(&self) -> bool {
        !self.mnemonic.starts_with('*')
    }
}

/// Look up the record for `opcode`.
#[inline]
pub fn lookup(opcode: u8) -> &'static Instruction {
    &OPCODES[opcode as usize]
}

const fn i(mnemonic: &'static str, op: Operation, mode: AddressingMode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        op,
        mode,
        cycles,
    }
}

use AddressingMode::{
    Absolute as ABS, AbsoluteX as ABX, AbsoluteY as ABY, Accumulator as ACC, Immediate as IMM,
    Implied as IMP, Indirect as IND, IndirectX as IZX, IndirectY as IZY, Relative as REL,
    ZeroPage as ZP, ZeroPageX as ZPX, ZeroPageY as ZPY,
};
use Operation::*;

const X: Operation = Unofficial;
const R: Operation = UnofficialRead;

#[rustfmt::skip]
pub static OPCODES: [Instruction; 256] = [
    // 0x00
    i("BRK", Brk, IMP, 7), i("ORA", Ora, IZX, 6), i("*JAM", X, IMP, 2), i("*SLO", X, IZX, 8),
    i("*NOP", Nop, ZP, 3), i("ORA", Ora, ZP, 3),  i("ASL", Asl, ZP, 5), i("*SLO", X, ZP, 5),
    i("PHP", Php, IMP, 3), i("ORA", Ora, IMM, 2), i("ASL", Asl, ACC, 2), i("*ANC", X, IMM, 2),
    i("*NOP", Nop, ABS, 4), i("ORA", Ora, ABS, 4), i("ASL", Asl, ABS, 6), i("*SLO", X, ABS, 6),
    // 0x10
    i("BPL", Bpl, REL, 2), i("ORA", Ora, IZY, 5), i("*JAM", X, IMP, 2), i("*SLO", X, IZY, 8),
    i("*NOP", Nop, ZPX, 4), i("ORA", Ora, ZPX, 4), i("ASL", Asl, ZPX, 6), i("*SLO", X, ZPX, 6),
    i("CLC", Clc, IMP, 2), i("ORA", Ora, ABY, 4), i("*NOP", Nop, IMP, 2), i("*SLO", X, ABY, 7),
    i("*NOP", Nop, ABX, 4), i("ORA", Ora, ABX, 4), i("ASL", Asl, ABX, 7), i("*SLO", X, ABX, 7),
    // 0x20
    i("JSR", Jsr, ABS, 6), i("AND", And, IZX, 6), i("*JAM", X, IMP, 2), i("*RLA", X, IZX, 8),
    i("BIT", Bit, ZP, 3),  i("AND", And, ZP, 3),  i("ROL", Rol, ZP, 5), i("*RLA", X, ZP, 5),
    i("PLP", Plp, IMP, 4), i("AND", And, IMM, 2), i("ROL", Rol, ACC, 2), i("*ANC", X, IMM, 2),
    i("BIT", Bit, ABS, 4), i("AND", And, ABS, 4), i("ROL", Rol, ABS, 6), i("*RLA", X, ABS, 6),
    // 0x30
    i("BMI", Bmi, REL, 2), i("AND", And, IZY, 5), i("*JAM", X, IMP, 2), i("*RLA", X, IZY, 8),
    i("*NOP", Nop, ZPX, 4), i("AND", And, ZPX, 4), i("ROL", Rol, ZPX, 6), i("*RLA", X, ZPX, 6),
    i("SEC", Sec, IMP, 2), i("AND", And, ABY, 4), i("*NOP", Nop, IMP, 2), i("*RLA", X, ABY, 7),
    i("*NOP", Nop, ABX, 4), i("AND", And, ABX, 4), i("ROL", Rol, ABX, 7), i("*RLA", X, ABX, 7),
    // 0x40
    i("RTI", Rti, IMP, 6), i("EOR", Eor, IZX, 6), i("*JAM", X, IMP, 2), i("*SRE", X, IZX, 8),
    i("*NOP", Nop, ZP, 3), i("EOR", Eor, ZP, 3),  i("LSR", Lsr, ZP, 5), i("*SRE", X, ZP, 5),
    i("PHA", Pha, IMP, 3), i("EOR", Eor, IMM, 2), i("LSR", Lsr, ACC, 2), i("*ALR", X, IMM, 2),
    i("JMP", Jmp, ABS, 3), i("EOR", Eor, ABS, 4), i("LSR", Lsr, ABS, 6), i("*SRE", X, ABS, 6),
    // 0x50
    i("BVC", Bvc, REL, 2), i("EOR", Eor, IZY, 5), i("*JAM", X, IMP, 2), i("*SRE", X, IZY, 8),
    i("*NOP", Nop, ZPX, 4), i("EOR", Eor, ZPX, 4), i("LSR", Lsr, ZPX, 6), i("*SRE", X, ZPX, 6),
    i("CLI", Cli, IMP, 2), i("EOR", Eor, ABY, 4), i("*NOP", Nop, IMP, 2), i("*SRE", X, ABY, 7),
    i("*NOP", Nop, ABX, 4), i("EOR", Eor, ABX, 4), i("LSR", Lsr, ABX, 7), i("*SRE", X, ABX, 7),
    // 0x60
    i("RTS", Rts, IMP, 6), i("ADC", Adc, IZX, 6), i("*JAM", X, IMP, 2), i("*RRA", X, IZX, 8),
    i("*NOP", Nop, ZP, 3), i("ADC", Adc, ZP, 3),  i("ROR", Ror, ZP, 5), i("*RRA", X, ZP, 5),
    i("PLA", Pla, IMP, 4), i("ADC", Adc, IMM, 2), i("ROR", Ror, ACC, 2), i("*ARR", X, IMM, 2),
    i("JMP", Jmp, IND, 5), i("ADC", Adc, ABS, 4), i("ROR", Ror, ABS, 6), i("*RRA", X, ABS, 6),
    // 0x70
    i("BVS", Bvs, REL, 2), i("ADC", Adc, IZY, 5), i("*JAM", X, IMP, 2), i("*RRA", X, IZY, 8),
    i("*NOP", Nop, ZPX, 4), i("ADC", Adc, ZPX, 4), i("ROR", Ror, ZPX, 6), i("*RRA", X, ZPX, 6),
    i("SEI", Sei, IMP, 2), i("ADC", Adc, ABY, 4), i("*NOP", Nop, IMP, 2), i("*RRA", X, ABY, 7),
    i("*NOP", Nop, ABX, 4), i("ADC", Adc, ABX, 4), i("ROR", Ror, ABX, 7), i("*RRA", X, ABX, 7),
    // 0x80
    i("*NOP", Nop, IMM, 2), i("STA", Sta, IZX, 6), i("*NOP", Nop, IMM, 2), i("*SAX", X, IZX, 6),
    i("STY", Sty, ZP, 3),  i("STA", Sta, ZP, 3),  i("STX", Stx, ZP, 3), i("*SAX", X, ZP, 3),
    i("DEY", Dey, IMP, 2), i("*NOP", Nop, IMM, 2), i("TXA", Txa, IMP, 2), i("*ANE", X, IMM, 2),
    i("STY", Sty, ABS, 4), i("STA", Sta, ABS, 4), i("STX", Stx, ABS, 4), i("*SAX", X, ABS, 4),
    // 0x90
    i("BCC", Bcc, REL, 2), i("STA", Sta, IZY, 6), i("*JAM", X, IMP, 2), i("*SHA", X, IZY, 6),
    i("STY", Sty, ZPX, 4), i("STA", Sta, ZPX, 4), i("STX", Stx, ZPY, 4), i("*SAX", X, ZPY, 4),
    i("TYA", Tya, IMP, 2), i("STA", Sta, ABY, 5), i("TXS", Txs, IMP, 2), i("*TAS", X, ABY, 5),
    i("*SHY", X, ABX, 5), i("STA", Sta, ABX, 5), i("*SHX", X, ABY, 5), i("*SHA", X, ABY, 5),
    // 0xA0
    i("LDY", Ldy, IMM, 2), i("LDA", Lda, IZX, 6), i("LDX", Ldx, IMM, 2), i("*LAX", R, IZX, 6),
    i("LDY", Ldy, ZP, 3),  i("LDA", Lda, ZP, 3),  i("LDX", Ldx, ZP, 3), i("*LAX", R, ZP, 3),
    i("TAY", Tay, IMP, 2), i("LDA", Lda, IMM, 2), i("TAX", Tax, IMP, 2), i("*LXA", X, IMM, 2),
    i("LDY", Ldy, ABS, 4), i("LDA", Lda, ABS, 4), i("LDX", Ldx, ABS, 4), i("*LAX", R, ABS, 4),
    // 0xB0
    i("BCS", Bcs, REL, 2), i("LDA", Lda, IZY, 5), i("*JAM", X, IMP, 2), i("*LAX", R, IZY, 5),
    i("LDY", Ldy, ZPX, 4), i("LDA", Lda, ZPX, 4), i("LDX", Ldx, ZPY, 4), i("*LAX", R, ZPY, 4),
    i("CLV", Clv, IMP, 2), i("LDA", Lda, ABY, 4), i("TSX", Tsx, IMP, 2), i("*LAS", R, ABY, 4),
    i("LDY", Ldy, ABX, 4), i("LDA", Lda, ABX, 4), i("LDX", Ldx, ABY, 4), i("*LAX", R, ABY, 4),
    // 0xC0
    i("CPY", Cpy, IMM, 2), i("CMP", Cmp, IZX, 6), i("*NOP", Nop, IMM, 2), i("*DCP", X, IZX, 8),
    i("CPY", Cpy, ZP, 3),  i("CMP", Cmp, ZP, 3),  i("DEC", Dec, ZP, 5), i("*DCP", X, ZP, 5),
    i("INY", Iny, IMP, 2), i("CMP", Cmp, IMM, 2), i("DEX", Dex, IMP, 2), i("*SBX", X, IMM, 2),
    i("CPY", Cpy, ABS, 4), i("CMP", Cmp, ABS, 4), i("DEC", Dec, ABS, 6), i("*DCP", X, ABS, 6),
    // 0xD0
    i("BNE", Bne, REL, 2), i("CMP", Cmp, IZY, 5), i("*JAM", X, IMP, 2), i("*DCP", X, IZY, 8),
    i("*NOP", Nop, ZPX, 4), i("CMP", Cmp, ZPX, 4), i("DEC", Dec, ZPX, 6), i("*DCP", X, ZPX, 6),
    i("CLD", Cld, IMP, 2), i("CMP", Cmp, ABY, 4), i("*NOP", Nop, IMP, 2), i("*DCP", X, ABY, 7),
    i("*NOP", Nop, ABX, 4), i("CMP", Cmp, ABX, 4), i("DEC", Dec, ABX, 7), i("*DCP", X, ABX, 7),
    // 0xE0
    i("CPX", Cpx, IMM, 2), i("SBC", Sbc, IZX, 6), i("*NOP", Nop, IMM, 2), i("*ISC", X, IZX, 8),
    i("CPX", Cpx, ZP, 3),  i("SBC", Sbc, ZP, 3),  i("INC", Inc, ZP, 5), i("*ISC", X, ZP, 5),
    i("INX", Inx, IMP, 2), i("SBC", Sbc, IMM, 2), i("NOP", Nop, IMP, 2), i("*SBC", X, IMM, 2),
    i("CPX", Cpx, ABS, 4), i("SBC", Sbc, ABS, 4), i("INC", Inc, ABS, 6), i("*ISC", X, ABS, 6),
    // 0xF0
    i("BEQ", Beq, REL, 2), i("SBC", Sbc, IZY, 5), i("*JAM", X, IMP, 2), i("*ISC", X, IZY, 8),
    i("*NOP", Nop, ZPX, 4), i("SBC", Sbc, ZPX, 4), i("INC", Inc, ZPX, 6), i("*ISC", X, ZPX, 6),
    i("SED", Sed, IMP, 2), i("SBC", Sbc, ABY, 4), i("*NOP", Nop, IMP, 2), i("*ISC", X, ABY, 7),
    i("*NOP", Nop, ABX, 4), i("SBC", Sbc, ABX, 4), i("INC", Inc, ABX, 7), i("*ISC", X, ABX, 7),
];
