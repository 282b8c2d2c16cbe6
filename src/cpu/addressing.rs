/*!
addressing.rs - effective-address resolution for every 6502 addressing mode.

Overview
========
`resolve` looks at the operand bytes that follow the opcode at PC and returns
where the instruction's operand lives. It never moves PC; `dispatch` advances
PC by the instruction length once the operation has run.

Page-cross detection
====================
abs,X / abs,Y / (zp),Y report whether adding the index changed the high byte
of the base address. Only read instructions pay for it; `dispatch` decides
using `Operation::has_page_penalty`.

Quirks reproduced
=================
- Zero-page indexing wraps inside page zero ($FF + 1 = $00).
- The (zp,X) and (zp),Y pointer fetch wraps inside page zero.
- JMP ($xxFF) reads the high byte from $xx00, not from the next page.
*/

use crate::bus::Bus;
use crate::cpu::state::CpuState;
use crate::cpu::table::AddressingMode;

/// Where an instruction's operand lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Operand {
    /// Implied: no operand at all.
    None,
    /// Accumulator form of shifts / rotates.
    Accumulator,
    /// Memory operand (also used for immediates, which point into the
    /// instruction stream, and for jump / branch targets).
    Address(u16),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub operand: Operand,
    pub page_crossed: bool,
}

impl Resolved {
    fn at(addr: u16) -> Self {
        Self {
            operand: Operand::Address(addr),
            page_crossed: false,
        }
    }

    fn indexed(base: u16, index: u8) -> Self {
        let addr = base.wrapping_add(index as u16);
        Self {
            operand: Operand::Address(addr),
            page_crossed: page_crossed(base, addr),
        }
    }
}

#[inline]
pub(crate) fn page_crossed(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

/// Resolve the operand of the instruction whose opcode sits at `cpu.pc`.
pub(crate) fn resolve(cpu: &CpuState, bus: &Bus, mode: AddressingMode) -> Resolved {
    let operand_at = cpu.pc.wrapping_add(1);
    match mode {
        AddressingMode::Implied => Resolved {
            operand: Operand::None,
            page_crossed: false,
        },
        AddressingMode::Accumulator => Resolved {
            operand: Operand::Accumulator,
            page_crossed: false,
        },
        AddressingMode::Immediate => Resolved::at(operand_at),
        AddressingMode::ZeroPage => Resolved::at(bus.read(operand_at) as u16),
        AddressingMode::ZeroPageX => Resolved::at(bus.read(operand_at).wrapping_add(cpu.x) as u16),
        AddressingMode::ZeroPageY => Resolved::at(bus.read(operand_at).wrapping_add(cpu.y) as u16),
        AddressingMode::Absolute => Resolved::at(bus.read16(operand_at)),
        AddressingMode::AbsoluteX => Resolved::indexed(bus.read16(operand_at), cpu.x),
        AddressingMode::AbsoluteY => Resolved::indexed(bus.read16(operand_at), cpu.y),
        AddressingMode::Indirect => {
            let ptr = bus.read16(operand_at);
            Resolved::at(read_word_indirect_bug(bus, ptr))
        }
        AddressingMode::IndirectX => {
            let zp = bus.read(operand_at).wrapping_add(cpu.x);
            Resolved::at(read_word_zp(bus, zp))
        }
        AddressingMode::IndirectY => {
            let zp = bus.read(operand_at);
            Resolved::indexed(read_word_zp(bus, zp), cpu.y)
        }
        AddressingMode::Relative => {
            let offset = bus.read(operand_at) as i8;
            let next = cpu.pc.wrapping_add(2);
            Resolved::at(next.wrapping_add(offset as i16 as u16))
        }
    }
}

/// Little-endian word from page zero; the high byte wraps to $00.
#[inline]
pub(crate) fn read_word_zp(bus: &Bus, zp: u8) -> u16 {
    let lo = bus.read(zp as u16) as u16;
    let hi = bus.read(zp.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// JMP (indirect) pointer read: the high byte never crosses into the next page.
#[inline]
pub(crate) fn read_word_indirect_bug(bus: &Bus, ptr: u16) -> u16 {
    let lo = bus.read(ptr) as u16;
    let hi_addr = (ptr & 0xFF00) | (ptr.wrapping_add(1) & 0x00FF);
    let hi = bus.read(hi_addr) as u16;
    (hi << 8) | lo
}
