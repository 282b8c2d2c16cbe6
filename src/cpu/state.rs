/*!
state.rs - 6502 architectural state (registers + flags) and stack primitives.

Overview
========
`CpuState` owns every architecturally visible register. It has no notion of
decode, dispatch or timing; those live in `table`, `dispatch` and `core`.

Flags are only touched through the named-bit helpers below (`assign_flag`,
`update_zn`, ...). Whole-byte writes happen in exactly two places: reset and
pulling P from the stack, and both force the UNUSED bit.

6502 Status Register Bit Layout
===============================
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C
Where:
  N = NEGATIVE
  V = OVERFLOW
  1 = UNUSED (always reads as 1)
  B = BREAK (only exists in the copy pushed by PHP/BRK)
  D = DECIMAL (no BCD on the NES; the bit is still stored)
  I = IRQ_DISABLE
  Z = ZERO
  C = CARRY

Stack
=====
The stack lives in page $01. Push writes at $0100|SP then decrements SP; pull
increments SP then reads. Words are pushed high byte first so that the low
byte ends up at the lower address, the layout JSR/RTS and BRK/RTI rely on.
*/

use crate::bus::Bus;

/// Processor status flag bit masks.
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000;
pub const BREAK: u8 = 0b0001_0000;
pub const UNUSED: u8 = 0b0010_0000;
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

/// Base address of the hardware stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// Entry point used instead of the $FFFC reset vector.
pub const RESET_PC: u16 = 0xC000;
pub const RESET_SP: u8 = 0xFD;
pub const RESET_STATUS: u8 = UNUSED | IRQ_DISABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
}

impl Default for CpuState {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: RESET_SP,
            pc: RESET_PC,
            status: RESET_STATUS,
        }
    }
}

impl CpuState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// PC=$C000, SP=$FD, A=X=Y=0, P=$24.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------
    #[inline]
    pub fn a(&self) -> u8 {
        self.a
    }
    #[inline]
    pub fn x(&self) -> u8 {
        self.x
    }
    #[inline]
    pub fn y(&self) -> u8 {
        self.y
    }
    #[inline]
    pub fn sp(&self) -> u8 {
        self.sp
    }
    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    pub fn status(&self) -> u8 {
        self.status
    }

    // ---------------------------------------------------------------------
    // Flag Operations
    // ---------------------------------------------------------------------

    #[inline]
    pub fn is_flag_set(&self, mask: u8) -> bool {
        (self.status & mask) != 0
    }

    #[inline]
    pub fn assign_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.status |= mask;
        } else {
            self.status &= !mask;
        }
    }

    /// ZERO when `result == 0`, NEGATIVE from bit 7.
    #[inline]
    pub fn update_zn(&mut self, result: u8) {
        self.assign_flag(ZERO, result == 0);
        self.assign_flag(NEGATIVE, (result & 0x80) != 0);
    }

    /// Status byte as written to the stack by PHP/BRK (B and bit 5 set) or
    /// by a hardware interrupt (B clear).
    pub fn compose_status_for_push(&self, set_break_on_push: bool) -> u8 {
        let v = self.status | UNUSED;
        if set_break_on_push { v | BREAK } else { v & !BREAK }
    }

    /// Load P from a pulled byte: B is dropped and bit 5 forced on.
    #[inline]
    pub fn restore_status(&mut self, pulled: u8) {
        self.status = (pulled | UNUSED) & !BREAK;
    }

    // ---------------------------------------------------------------------
    // Stack Helpers
    // ---------------------------------------------------------------------

    #[inline]
    pub fn push_u8(&mut self, bus: &mut Bus, value: u8) {
        bus.write(STACK_PAGE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    #[inline]
    pub fn pop_u8(&mut self, bus: &mut Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_PAGE | self.sp as u16)
    }

    #[inline]
    pub fn push_u16(&mut self, bus: &mut Bus, value: u16) {
        self.push_u8(bus, (value >> 8) as u8);
        self.push_u8(bus, value as u8);
    }

    #[inline]
    pub fn pop_u16(&mut self, bus: &mut Bus) -> u16 {
        let lo = self.pop_u8(bus) as u16;
        let hi = self.pop_u8(bus) as u16;
        (hi << 8) | lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_power_up() {
        let s = CpuState::new();
        assert_eq!(s.a(), 0);
        assert_eq!(s.x(), 0);
        assert_eq!(s.y(), 0);
        assert_eq!(s.sp(), 0xFD);
        assert_eq!(s.pc(), 0xC000);
        assert_eq!(s.status(), 0x24);
    }

    #[test]
    fn flag_assignment() {
        let mut s = CpuState::new();
        s.assign_flag(IRQ_DISABLE, false);
        assert!(!s.is_flag_set(IRQ_DISABLE));
        s.assign_flag(DECIMAL, true);
        assert!(s.is_flag_set(DECIMAL));
        s.assign_flag(DECIMAL, false);
        assert!(!s.is_flag_set(DECIMAL));
        assert!(s.is_flag_set(UNUSED));
    }

    #[test]
    fn update_zn_behavior() {
        let mut s = CpuState::new();
        s.update_zn(0x00);
        assert!(s.is_flag_set(ZERO));
        assert!(!s.is_flag_set(NEGATIVE));
        s.update_zn(0x80);
        assert!(!s.is_flag_set(ZERO));
        assert!(s.is_flag_set(NEGATIVE));
        s.update_zn(0x7F);
        assert!(!s.is_flag_set(ZERO));
        assert!(!s.is_flag_set(NEGATIVE));
    }

    #[test]
    fn stack_word_layout() {
        let mut bus = Bus::new();
        let mut s = CpuState::new();
        s.push_u16(&mut bus, 0xBEEF);
        assert_eq!(s.sp(), 0xFB);
        // High byte at the higher address
        assert_eq!(bus.read(0x01FD), 0xBE);
        assert_eq!(bus.read(0x01FC), 0xEF);
        assert_eq!(s.pop_u16(&mut bus), 0xBEEF);
        assert_eq!(s.sp(), 0xFD);
    }

    #[test]
    fn stack_pointer_wraps_within_page() {
        let mut bus = Bus::new();
        let mut s = CpuState::new();
        s.sp = 0x00;
        s.push_u8(&mut bus, 0x11);
        assert_eq!(s.sp(), 0xFF);
        assert_eq!(bus.read(0x0100), 0x11);
        assert_eq!(s.pop_u8(&mut bus), 0x11);
        assert_eq!(s.sp(), 0x00);
    }

    #[test]
    fn compose_and_restore_status() {
        let mut s = CpuState::new();
        assert_eq!(s.compose_status_for_push(true) & (BREAK | UNUSED), BREAK | UNUSED);
        assert_eq!(s.compose_status_for_push(false) & BREAK, 0);
        s.restore_status(0xFF);
        assert_eq!(s.status(), 0xEF);
        s.restore_status(0x00);
        assert_eq!(s.status(), UNUSED);
    }
}
