/*!
execute.rs - 6502 instruction semantic helpers (ALU, flags, stack, RMW).

Purpose
=======
Side-effect logic for instructions, shared by every arm of `dispatch`.
Helpers take the already-fetched operand value; `dispatch` owns operand
access and PC movement.

Flag rules
==========
- ADC: C = 9-bit sum > $FF; V = operands share a sign and the result does not.
- SBC: ADC of the one's complement (C acts as "not borrow").
- CMP/CPX/CPY: C = reg >= m, Z = reg == m, N = bit 7 of (reg - m).
- Shifts / rotates: C = bit shifted out; the shifted value is stored.
- No decimal mode: D is stored but ADC/SBC are always binary.
*/

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::state::{CARRY, CpuState, NEGATIVE, OVERFLOW, ZERO};

// ---------------------------------------------------------------------------
// Operand access
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn read_operand(cpu: &CpuState, bus: &Bus, operand: Operand) -> u8 {
    match operand {
        Operand::Address(addr) => bus.read(addr),
        Operand::Accumulator => cpu.a,
        Operand::None => 0,
    }
}

#[inline]
pub(crate) fn write_operand(cpu: &mut CpuState, bus: &mut Bus, operand: Operand, value: u8) {
    match operand {
        Operand::Address(addr) => bus.write(addr, value),
        Operand::Accumulator => cpu.a = value,
        Operand::None => {}
    }
}

/// Read-modify-write: fetch, transform, store back to the same place.
pub(crate) fn rmw(
    cpu: &mut CpuState,
    bus: &mut Bus,
    operand: Operand,
    f: impl FnOnce(&mut CpuState, u8) -> u8,
) {
    let old = read_operand(cpu, bus, operand);
    let new = f(cpu, old);
    write_operand(cpu, bus, operand, new);
}

// ---------------------------------------------------------------------------
// Loads / transfers
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn lda(cpu: &mut CpuState, v: u8) {
    cpu.a = v;
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldx(cpu: &mut CpuState, v: u8) {
    cpu.x = v;
    cpu.update_zn(v);
}

#[inline]
pub(crate) fn ldy(cpu: &mut CpuState, v: u8) {
    cpu.y = v;
    cpu.update_zn(v);
}

/// TXS is the only transfer that leaves the flags alone.
#[inline]
pub(crate) fn txs(cpu: &mut CpuState) {
    cpu.sp = cpu.x;
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn pha(cpu: &mut CpuState, bus: &mut Bus) {
    let a = cpu.a;
    cpu.push_u8(bus, a);
}

#[inline]
pub(crate) fn php(cpu: &mut CpuState, bus: &mut Bus) {
    let p = cpu.compose_status_for_push(true);
    cpu.push_u8(bus, p);
}

#[inline]
pub(crate) fn pla(cpu: &mut CpuState, bus: &mut Bus) {
    let v = cpu.pop_u8(bus);
    lda(cpu, v);
}

#[inline]
pub(crate) fn plp(cpu: &mut CpuState, bus: &mut Bus) {
    let v = cpu.pop_u8(bus);
    cpu.restore_status(v);
}

// ---------------------------------------------------------------------------
// Logical / arithmetic
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn and(cpu: &mut CpuState, v: u8) {
    let r = cpu.a & v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn ora(cpu: &mut CpuState, v: u8) {
    let r = cpu.a | v;
    lda(cpu, r);
}

#[inline]
pub(crate) fn eor(cpu: &mut CpuState, v: u8) {
    let r = cpu.a ^ v;
    lda(cpu, r);
}

/// Z from A & M; N and V copied from bits 7 and 6 of M.
#[inline]
pub(crate) fn bit(cpu: &mut CpuState, v: u8) {
    cpu.assign_flag(ZERO, (cpu.a & v) == 0);
    cpu.assign_flag(NEGATIVE, (v & 0x80) != 0);
    cpu.assign_flag(OVERFLOW, (v & 0x40) != 0);
}

pub(crate) fn adc(cpu: &mut CpuState, v: u8) {
    let a = cpu.a;
    let carry_in = cpu.is_flag_set(CARRY) as u16;
    let sum = a as u16 + v as u16 + carry_in;
    let result = sum as u8;
    cpu.assign_flag(CARRY, sum > 0xFF);
    cpu.assign_flag(OVERFLOW, (!(a ^ v) & (a ^ result) & 0x80) != 0);
    lda(cpu, result);
}

#[inline]
pub(crate) fn sbc(cpu: &mut CpuState, v: u8) {
    adc(cpu, !v);
}

/// Shared body of CMP / CPX / CPY.
#[inline]
pub(crate) fn compare(cpu: &mut CpuState, reg: u8, v: u8) {
    let diff = reg.wrapping_sub(v);
    cpu.assign_flag(CARRY, reg >= v);
    cpu.assign_flag(ZERO, reg == v);
    cpu.assign_flag(NEGATIVE, (diff & 0x80) != 0);
}

// ---------------------------------------------------------------------------
// Shifts / rotates / inc / dec (value in, value out)
// ---------------------------------------------------------------------------

pub(crate) fn asl(cpu: &mut CpuState, v: u8) -> u8 {
    let r = v << 1;
    cpu.assign_flag(CARRY, (v & 0x80) != 0);
    cpu.update_zn(r);
    r
}

pub(crate) fn lsr(cpu: &mut CpuState, v: u8) -> u8 {
    let r = v >> 1;
    cpu.assign_flag(CARRY, (v & 0x01) != 0);
    cpu.update_zn(r);
    r
}

pub(crate) fn rol(cpu: &mut CpuState, v: u8) -> u8 {
    let carry_in = cpu.is_flag_set(CARRY) as u8;
    let r = (v << 1) | carry_in;
    cpu.assign_flag(CARRY, (v & 0x80) != 0);
    cpu.update_zn(r);
    r
}

pub(crate) fn ror(cpu: &mut CpuState, v: u8) -> u8 {
    let carry_in = (cpu.is_flag_set(CARRY) as u8) << 7;
    let r = (v >> 1) | carry_in;
    cpu.assign_flag(CARRY, (v & 0x01) != 0);
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn inc(cpu: &mut CpuState, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    cpu.update_zn(r);
    r
}

#[inline]
pub(crate) fn dec(cpu: &mut CpuState, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    cpu.update_zn(r);
    r
}
