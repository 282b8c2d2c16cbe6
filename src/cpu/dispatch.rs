/*!
dispatch.rs - execute one decoded instruction.

Flow
====
1. Resolve the operand for the instruction's addressing mode (PC still at
   the opcode).
2. Add the +1 page-cross penalty for read instructions.
3. Move PC past the instruction (`len` derived from the mode).
4. Run the operation; jumps, calls, returns, BRK and taken branches
   overwrite PC.

Returns the dynamic cycles only; the base count comes from the table.

Branch timing
=============
Not taken: +0. Taken: +1, and +1 more when the target is on a different
page than the instruction following the branch.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Operand, page_crossed, resolve};
use crate::cpu::execute::{self as ex, read_operand};
use crate::cpu::state::{BREAK, CARRY, CpuState, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, ZERO};
use crate::cpu::table::{Instruction, Operation};

/// Vector BRK loads PC from.
pub const IRQ_BRK_VECTOR: u16 = 0xFFFE;

pub(crate) fn dispatch(cpu: &mut CpuState, bus: &mut Bus, ins: &Instruction) -> u8 {
    let resolved = resolve(cpu, bus, ins.mode);
    let operand = resolved.operand;
    let next_pc = cpu.pc.wrapping_add(ins.len());

    let mut extra = 0u8;
    if resolved.page_crossed && ins.op.has_page_penalty() {
        extra += 1;
    }
    cpu.pc = next_pc;

    match ins.op {
        // Loads / stores
        Operation::Lda => {
            let v = read_operand(cpu, bus, operand);
            ex::lda(cpu, v);
        }
        Operation::Ldx => {
            let v = read_operand(cpu, bus, operand);
            ex::ldx(cpu, v);
        }
        Operation::Ldy => {
            let v = read_operand(cpu, bus, operand);
            ex::ldy(cpu, v);
        }
        Operation::Sta => {
            let v = cpu.a;
            ex::write_operand(cpu, bus, operand, v);
        }
        Operation::Stx => {
            let v = cpu.x;
            ex::write_operand(cpu, bus, operand, v);
        }
        Operation::Sty => {
            let v = cpu.y;
            ex::write_operand(cpu, bus, operand, v);
        }

        // Transfers
        Operation::Tax => {
            let v = cpu.a;
            ex::ldx(cpu, v);
        }
        Operation::Tay => {
            let v = cpu.a;
            ex::ldy(cpu, v);
        }
        Operation::Txa => {
            let v = cpu.x;
            ex::lda(cpu, v);
        }
        Operation::Tya => {
            let v = cpu.y;
            ex::lda(cpu, v);
        }
        Operation::Tsx => {
            let v = cpu.sp;
            ex::ldx(cpu, v);
        }
        Operation::Txs => ex::txs(cpu),

        // Stack
        Operation::Pha => ex::pha(cpu, bus),
        Operation::Php => ex::php(cpu, bus),
        Operation::Pla => ex::pla(cpu, bus),
        Operation::Plp => ex::plp(cpu, bus),

        // Logical / arithmetic
        Operation::And => {
            let v = read_operand(cpu, bus, operand);
            ex::and(cpu, v);
        }
        Operation::Ora => {
            let v = read_operand(cpu, bus, operand);
            ex::ora(cpu, v);
        }
        Operation::Eor => {
            let v = read_operand(cpu, bus, operand);
            ex::eor(cpu, v);
        }
        Operation::Bit => {
            let v = read_operand(cpu, bus, operand);
            ex::bit(cpu, v);
        }
        Operation::Adc => {
            let v = read_operand(cpu, bus, operand);
            ex::adc(cpu, v);
        }
        Operation::Sbc => {
            let v = read_operand(cpu, bus, operand);
            ex::sbc(cpu, v);
        }
        Operation::Cmp => {
            let v = read_operand(cpu, bus, operand);
            let reg = cpu.a;
            ex::compare(cpu, reg, v);
        }
        Operation::Cpx => {
            let v = read_operand(cpu, bus, operand);
            let reg = cpu.x;
            ex::compare(cpu, reg, v);
        }
        Operation::Cpy => {
            let v = read_operand(cpu, bus, operand);
            let reg = cpu.y;
            ex::compare(cpu, reg, v);
        }

        // Increments / decrements
        Operation::Inc => ex::rmw(cpu, bus, operand, ex::inc),
        Operation::Dec => ex::rmw(cpu, bus, operand, ex::dec),
        Operation::Inx => {
            let v = cpu.x.wrapping_add(1);
            ex::ldx(cpu, v);
        }
        Operation::Iny => {
            let v = cpu.y.wrapping_add(1);
            ex::ldy(cpu, v);
        }
        Operation::Dex => {
            let v = cpu.x.wrapping_sub(1);
            ex::ldx(cpu, v);
        }
        Operation::Dey => {
            let v = cpu.y.wrapping_sub(1);
            ex::ldy(cpu, v);
        }

        // Shifts / rotates (accumulator or memory)
        Operation::Asl => ex::rmw(cpu, bus, operand, ex::asl),
        Operation::Lsr => ex::rmw(cpu, bus, operand, ex::lsr),
        Operation::Rol => ex::rmw(cpu, bus, operand, ex::rol),
        Operation::Ror => ex::rmw(cpu, bus, operand, ex::ror),

        // Jumps / calls
        Operation::Jmp => {
            if let Operand::Address(target) = operand {
                cpu.pc = target;
            }
        }
        Operation::Jsr => {
            if let Operand::Address(target) = operand {
                // Return address is the last byte of the JSR itself.
                cpu.push_u16(bus, next_pc.wrapping_sub(1));
                cpu.pc = target;
            }
        }
        Operation::Rts => {
            cpu.pc = cpu.pop_u16(bus).wrapping_add(1);
        }
        Operation::Brk => {
            // BRK skips a padding byte: the pushed PC is opcode + 2.
            cpu.push_u16(bus, next_pc.wrapping_add(1));
            let p = cpu.compose_status_for_push(true);
            cpu.push_u8(bus, p);
            cpu.assign_flag(IRQ_DISABLE, true);
            cpu.assign_flag(BREAK, true);
            cpu.pc = bus.read16(IRQ_BRK_VECTOR);
        }
        Operation::Rti => {
            let p = cpu.pop_u8(bus);
            cpu.restore_status(p);
            cpu.pc = cpu.pop_u16(bus);
        }

        // Branches
        Operation::Bcc => extra += branch(cpu, operand, next_pc, CARRY, false),
        Operation::Bcs => extra += branch(cpu, operand, next_pc, CARRY, true),
        Operation::Bne => extra += branch(cpu, operand, next_pc, ZERO, false),
        Operation::Beq => extra += branch(cpu, operand, next_pc, ZERO, true),
        Operation::Bpl => extra += branch(cpu, operand, next_pc, NEGATIVE, false),
        Operation::Bmi => extra += branch(cpu, operand, next_pc, NEGATIVE, true),
        Operation::Bvc => extra += branch(cpu, operand, next_pc, OVERFLOW, false),
        Operation::Bvs => extra += branch(cpu, operand, next_pc, OVERFLOW, true),

        // Flag changes
        Operation::Clc => cpu.assign_flag(CARRY, false),
        Operation::Sec => cpu.assign_flag(CARRY, true),
        Operation::Cld => cpu.assign_flag(DECIMAL, false),
        Operation::Sed => cpu.assign_flag(DECIMAL, true),
        Operation::Cli => cpu.assign_flag(IRQ_DISABLE, false),
        Operation::Sei => cpu.assign_flag(IRQ_DISABLE, true),
        Operation::Clv => cpu.assign_flag(OVERFLOW, false),

        Operation::Nop | Operation::Unofficial | Operation::UnofficialRead => {}
    }

    extra
}

/// Take the branch when flag `mask` equals `when_set`; returns the extra
/// cycles spent.
#[inline]
fn branch(cpu: &mut CpuState, operand: Operand, next_pc: u16, mask: u8, when_set: bool) -> u8 {
    let Operand::Address(target) = operand else {
        return 0;
    };
    if cpu.is_flag_set(mask) != when_set {
        return 0;
    }
    cpu.pc = target;
    if page_crossed(next_pc, target) { 2 } else { 1 }
}
