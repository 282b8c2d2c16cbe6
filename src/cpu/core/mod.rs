/*!
core::Cpu - 6502 CPU façade wrapping `CpuState`.

Design
======
- `Cpu` owns the architectural `CpuState` plus the bookkeeping that belongs
  to the most recent instruction: the PC it started at, its opcode and
  mnemonic, and the dynamic cycles it added.
- The Bus is never stored. `execute` borrows it for the duration of one
  instruction; `connect_bus` packages that borrow as an `Attached` handle
  for callers that run several instructions against the same Bus.

Timing
======
`execute` returns `base + extra`: the table's base cycles plus any page-cross
or branch penalties. `extra` is cleared at the start of every call.
*/

use crate::bus::Bus;
use crate::cpu::dispatch::dispatch;
use crate::cpu::state::{CpuState, RESET_PC};
use crate::cpu::table::{Instruction, lookup};

#[derive(Debug, Clone)]
pub struct Cpu {
    state: CpuState,
    extra_cycles: u8,
    last_pc: u16,
    opcode: u8,
    mnemonic: &'static str,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Construct a CPU already in the reset state.
    pub fn new() -> Self {
        Self {
            state: CpuState::new(),
            extra_cycles: 0,
            last_pc: RESET_PC,
            opcode: 0,
            mnemonic: "",
        }
    }

    /// PC=$C000, SP=$FD, A=X=Y=0, P=$24, no pending extra cycles.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Bind this CPU to `bus` for a run of `execute` calls.
    pub fn connect_bus<'a>(&'a mut self, bus: &'a mut Bus) -> Attached<'a> {
        Attached { cpu: self, bus }
    }

    /// Fetch, decode and execute one instruction. Returns the cycles it took.
    pub fn execute(&mut self, bus: &mut Bus) -> u8 {
        self.extra_cycles = 0;
        let pc = self.state.pc;
        let opcode = bus.read(pc);
        let ins: &'static Instruction = lookup(opcode);

        self.last_pc = pc;
        self.opcode = opcode;
        self.mnemonic = ins.mnemonic;

        self.extra_cycles = dispatch(&mut self.state, bus, ins);
        ins.cycles + self.extra_cycles
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Direct register access for tests and debugger pokes.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    // ---------------------------------------------------------------------
    // Register accessors
    // ---------------------------------------------------------------------
    pub fn a(&self) -> u8 {
        self.state.a
    }
    pub fn x(&self) -> u8 {
        self.state.x
    }
    pub fn y(&self) -> u8 {
        self.state.y
    }
    pub fn sp(&self) -> u8 {
        self.state.sp
    }
    pub fn pc(&self) -> u16 {
        self.state.pc
    }
    pub fn status(&self) -> u8 {
        self.state.status
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.state.pc = pc;
    }

    pub fn get_flag(&self, mask: u8) -> bool {
        self.state.is_flag_set(mask)
    }

    // ---------------------------------------------------------------------
    // Last-instruction introspection
    // ---------------------------------------------------------------------

    /// PC at which the most recent instruction started ($C000 before the
    /// first one).
    pub fn last_pc(&self) -> u16 {
        self.last_pc
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Mnemonic of the most recent instruction ("" before the first one).
    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    pub fn extra_cycles(&self) -> u8 {
        self.extra_cycles
    }
}

/// A CPU bound to a Bus for the lifetime of the borrow.
pub struct Attached<'a> {
    cpu: &'a mut Cpu,
    bus: &'a mut Bus,
}

impl Attached<'_> {
    pub fn execute(&mut self) -> u8 {
        self.cpu.execute(self.bus)
    }

    pub fn cpu(&self) -> &Cpu {
        self.cpu
    }

    pub fn bus(&self) -> &Bus {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::state::{CARRY, NEGATIVE, OVERFLOW, ZERO};
    use crate::test_utils::setup;

    #[test]
    fn reset_values_exact() {
        let mut cpu = Cpu::new();
        cpu.state_mut().a = 0x12;
        cpu.state_mut().sp = 0x00;
        cpu.state_mut().status = 0xFF;
        cpu.reset();
        assert_eq!(cpu.pc(), 0xC000);
        assert_eq!(cpu.sp(), 0xFD);
        assert_eq!((cpu.a(), cpu.x(), cpu.y()), (0, 0, 0));
        assert_eq!(cpu.status(), 0x24);
        assert_eq!(cpu.extra_cycles(), 0);
        assert_eq!(cpu.last_pc(), 0xC000);
    }

    #[test]
    fn last_pc_tracks_previous_instruction_after_reset() {
        let (mut cpu, mut bus) = setup(&[0xEA, 0xEA]);
        cpu.execute(&mut bus);
        cpu.execute(&mut bus);
        assert_eq!(cpu.last_pc(), 0xC001);
        cpu.reset();
        assert_eq!(cpu.last_pc(), 0xC000);
    }

    #[test]
    fn lda_immediate_then_sta_zero_page() {
        let (mut cpu, mut bus) = setup(&[0xA9, 0x05, 0x85, 0x10]);
        {
            let mut attached = cpu.connect_bus(&mut bus);
            assert_eq!(attached.execute(), 2);
            assert_eq!(attached.execute(), 3);
        }
        assert_eq!(cpu.a(), 0x05);
        assert_eq!(bus.read(0x0010), 0x05);
        assert!(!cpu.get_flag(ZERO));
        assert!(!cpu.get_flag(NEGATIVE));
        assert_eq!(cpu.pc(), 0xC004);
        assert_eq!(cpu.last_pc(), 0xC002);
        assert_eq!(cpu.opcode(), 0x85);
        assert_eq!(cpu.mnemonic(), "STA");
    }

    #[test]
    fn pha_pla_restores_stack_pointer() {
        let (mut cpu, mut bus) = setup(&[0x48, 0xA9, 0x00, 0x68]);
        cpu.state_mut().a = 0x42;
        let sp0 = cpu.sp();
        assert_eq!(cpu.execute(&mut bus), 3);
        assert_eq!(cpu.sp(), sp0.wrapping_sub(1));
        cpu.execute(&mut bus); // LDA #0 clobbers A
        assert_eq!(cpu.a(), 0);
        assert_eq!(cpu.execute(&mut bus), 4);
        assert_eq!(cpu.sp(), sp0);
        assert_eq!(cpu.a(), 0x42);
        assert!(!cpu.get_flag(ZERO));
    }

    #[test]
    fn beq_not_taken() {
        let (mut cpu, mut bus) = setup(&[0xF0, 0x10]);
        assert!(!cpu.get_flag(ZERO));
        assert_eq!(cpu.execute(&mut bus), 2);
        assert_eq!(cpu.pc(), 0xC002);
        assert_eq!(cpu.extra_cycles(), 0);
    }

    #[test]
    fn beq_taken_same_page() {
        let (mut cpu, mut bus) = setup(&[0xF0, 0x10]);
        cpu.state_mut().assign_flag(ZERO, true);
        assert_eq!(cpu.execute(&mut bus), 3);
        assert_eq!(cpu.pc(), 0xC012);
        assert_eq!(cpu.extra_cycles(), 1);
    }

    #[test]
    fn beq_taken_across_page() {
        // BEQ at $C0F0 with +$20 lands on $C112
        let (mut cpu, mut bus) = setup(&[]);
        bus.write(0xC0F0, 0xF0);
        bus.write(0xC0F1, 0x20);
        cpu.set_pc(0xC0F0);
        cpu.state_mut().assign_flag(ZERO, true);
        assert_eq!(cpu.execute(&mut bus), 4);
        assert_eq!(cpu.pc(), 0xC112);
        assert_eq!(cpu.extra_cycles(), 2);
    }

    #[test]
    fn adc_ff_plus_one() {
        let (mut cpu, mut bus) = setup(&[0x69, 0xFF]);
        cpu.state_mut().a = 0x01;
        assert_eq!(cpu.execute(&mut bus), 2);
        assert_eq!(cpu.a(), 0x00);
        assert!(cpu.get_flag(CARRY));
        assert!(cpu.get_flag(ZERO));
        assert!(!cpu.get_flag(OVERFLOW));
    }

    #[test]
    fn extra_cycles_reset_each_call() {
        // LDA $00FF,X crossing, then NOP
        let (mut cpu, mut bus) = setup(&[0xBD, 0xFF, 0x00, 0xEA]);
        cpu.state_mut().x = 1;
        assert_eq!(cpu.execute(&mut bus), 5);
        assert_eq!(cpu.extra_cycles(), 1);
        assert_eq!(cpu.execute(&mut bus), 2);
        assert_eq!(cpu.extra_cycles(), 0);
    }

    #[test]
    fn every_opcode_executes_without_panicking() {
        for opcode in 0..=255u8 {
            let (mut cpu, mut bus) = setup(&[opcode, 0x10, 0x20]);
            let cycles = cpu.execute(&mut bus);
            assert!(cycles >= 2, "opcode {opcode:#04X}");
            assert_eq!(cpu.opcode(), opcode);
            assert!(!cpu.mnemonic().is_empty());
        }
    }
}
