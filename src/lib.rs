#![doc = r#"
famicore library crate.

A MOS 6502 core with an NES-style memory map, driven by a small run
controller.

Modules:
- bus: 64 KiB CPU address space (RAM, PPU/I/O stubs, PRG ROM) and cartridge install
- cartridge: iNES v1 header parsing and load errors
- console: run controller (Stopped/Paused/Running/Stepping) owning Bus, CPU and PPU
- cpu: 6502 core (state + opcode table + addressing + execute + dispatch + facade)
- inspect: read-only CPU snapshots, trace lines and memory dumps
- logger: injected logging interface and sinks
- ppu: output-surface stub
- display (feature `display`): winit/pixels host window

In tests, shared iNES builders are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod cartridge;
pub mod console;
pub mod cpu;
pub mod inspect;
pub mod logger;
pub mod ppu;

#[cfg(feature = "display")]
pub mod display;

// Re-export commonly used types at the crate root for convenience.
pub use bus::Bus;
pub use cartridge::{Cartridge, CartridgeInfo, LoadError, Mirroring};
pub use console::{Console, ConsoleConfig, EntryPoint, RunState};
pub use cpu::Cpu;
pub use inspect::CpuSnapshot;
pub use logger::{ConsoleLog, LogFacade, Logger, Severity};

#[cfg(test)]
pub mod test_utils;
