/*!
Run controller: owns the Bus, CPU and PPU and decides when instructions run.

State machine
=============
```text
            start (no pause latched)
  Stopped ───────────────────────────▶ Running ◀──┐
     │                                   │  ▲     │ pause
     │ start (pause latched)       pause │  │     │
     ▼                                   ▼  │     │
  Paused ◀───────────────────────────── Paused    │
                                                  │
  any state ── step ──▶ Stepping ─────────────────┘
```
- `tick` only executes while `Running`; everything else is a no-op tick.
- `step` executes exactly one instruction from any state and parks in
  `Stepping`, which ticks like `Paused`.
- `start` re-latches `Paused` if the console was `Paused`/`Stepping` or the
  config asks to start paused.

Ordering
========
`start` parses and validates the cartridge before touching anything. A
failed load is logged and returned; Bus, CPU, state and the remembered ROM
path are exactly as they were.

Policy
======
One host tick runs `instructions_per_tick` instructions (default 1), not a
frame's worth of CPU cycles.
*/

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::bus::Bus;
use crate::cartridge::{Cartridge, CartridgeInfo, LoadError};
use crate::cpu::Cpu;
use crate::inspect::CpuSnapshot;
use crate::logger::{LogFacade, Logger};
use crate::ppu::Ppu;

/// Hardware reset vector, used when `EntryPoint::ResetVector` is selected.
pub const RESET_VECTOR: u16 = 0xFFFC;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Paused,
    Running,
    Stepping,
}

impl RunState {
    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Stopped => "Stopped",
            RunState::Paused => "Paused",
            RunState::Running => "Running",
            RunState::Stepping => "Stepping",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where PC points after `start`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntryPoint {
    /// Fixed address (test-harness style, $C000 by default).
    Fixed(u16),
    /// Little-endian word at $FFFC/$FFFD of the installed cartridge.
    ResetVector,
}

impl Default for EntryPoint {
    fn default() -> Self {
        EntryPoint::Fixed(crate::cpu::state::RESET_PC)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub entry_point: EntryPoint,
    pub start_paused: bool,
    /// Instructions executed per `tick`; 0 is treated as 1.
    pub instructions_per_tick: u32,
    /// History size for an in-memory `ConsoleLog` built by front-ends.
    pub log_capacity: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            entry_point: EntryPoint::default(),
            start_paused: false,
            instructions_per_tick: 1,
            log_capacity: 256,
        }
    }
}

pub struct Console {
    bus: Bus,
    cpu: Cpu,
    ppu: Ppu,
    state: RunState,
    rom_path: Option<PathBuf>,
    exit_requested: bool,
    logger: Rc<dyn Logger>,
    config: ConsoleConfig,
    instructions: u64,
    cycles: u64,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("state", &self.state)
            .field("rom_path", &self.rom_path)
            .field("cpu", &self.cpu)
            .field("instructions", &self.instructions)
            .field("cycles", &self.cycles)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Default config, logging through the `log` crate.
    pub fn new() -> Self {
        Self::with_config(ConsoleConfig::default())
    }

    pub fn with_config(config: ConsoleConfig) -> Self {
        Self::with_logger(Rc::new(LogFacade), config)
    }

    pub fn with_logger(logger: Rc<dyn Logger>, config: ConsoleConfig) -> Self {
        Self {
            bus: Bus::new(),
            cpu: Cpu::new(),
            ppu: Ppu::new(),
            state: RunState::Stopped,
            rom_path: None,
            exit_requested: false,
            logger,
            config,
            instructions: 0,
            cycles: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------------

    /// Boot `rom_path`: validate, reset Bus/CPU/PPU, install, set PC.
    pub fn start<P: AsRef<Path>>(&mut self, rom_path: P) -> Result<CartridgeInfo, LoadError> {
        let path = rom_path.as_ref();
        let cart = match Cartridge::from_file(path) {
            Ok(cart) => cart,
            Err(err) => {
                self.logger.error(&format!("Failed to load cartridge: {err}"));
                return Err(err);
            }
        };

        self.logger.message("Starting boot sequence...");
        self.logger.message("Resetting bus");
        self.bus.reset();
        self.logger.message("Resetting CPU");
        self.cpu.reset();
        self.ppu.reset();

        let info = self.bus.install_cartridge(&cart);
        self.logger.message(&format!(
            "Loaded {} ({} bytes, {} KiB PRG / {} KiB CHR, mapper {}, {:?} mirroring)",
            info.path.display(),
            info.size,
            info.header.prg_len() / 1024,
            info.header.chr_len() / 1024,
            info.mapper(),
            info.mirroring(),
        ));
        if info.needs_bank_switching() {
            self.logger.warning(&format!(
                "Mapper {} is not supported; running with the fixed NROM layout",
                info.mapper()
            ));
        }

        let entry = match self.config.entry_point {
            EntryPoint::Fixed(pc) => pc,
            EntryPoint::ResetVector => self.bus.read16(RESET_VECTOR),
        };
        self.cpu.set_pc(entry);
        self.logger.message(&format!("Entry point ${entry:04X}"));

        self.rom_path = Some(path.to_path_buf());
        self.instructions = 0;
        self.cycles = 0;

        let pause_latched = self.config.start_paused
            || matches!(self.state, RunState::Paused | RunState::Stepping);
        self.set_state(if pause_latched {
            RunState::Paused
        } else {
            RunState::Running
        });
        Ok(info)
    }

    /// Running <-> Paused; Stepping resumes; Stopped is unaffected.
    pub fn pause(&mut self) {
        let next = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused | RunState::Stepping => RunState::Running,
            RunState::Stopped => RunState::Stopped,
        };
        self.set_state(next);
    }

    /// Execute exactly one instruction, whatever the state, then park in
    /// `Stepping`. Returns the cycles it took.
    pub fn step(&mut self) -> u8 {
        let cycles = self.run_one();
        self.set_state(RunState::Stepping);
        cycles
    }

    /// Host-frame hook. Returns the cycles executed (0 unless `Running`).
    pub fn tick(&mut self) -> u64 {
        if self.state != RunState::Running {
            return 0;
        }
        let n = self.config.instructions_per_tick.max(1);
        let mut total = 0u64;
        for _ in 0..n {
            total += self.run_one() as u64;
        }
        total
    }

    /// Start again from the remembered ROM path. `Ok(None)` when nothing has
    /// been loaded yet.
    pub fn restart(&mut self) -> Result<Option<CartridgeInfo>, LoadError> {
        match self.rom_path.clone() {
            Some(path) => self.start(path).map(Some),
            None => Ok(None),
        }
    }

    /// Ask the driving loop to stop after the current iteration.
    pub fn exit(&mut self) {
        if !self.exit_requested {
            self.logger.message("Exit requested");
        }
        self.exit_requested = true;
    }

    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }

    fn run_one(&mut self) -> u8 {
        let cycles = self.cpu.execute(&mut self.bus);
        self.instructions += 1;
        self.cycles += cycles as u64;
        cycles
    }

    fn set_state(&mut self, next: RunState) {
        if next != self.state {
            self.logger
                .message(&format!("State {} -> {}", self.state, next));
            self.state = next;
        }
    }

    // ---------------------------------------------------------------------
    // Read-only views
    // ---------------------------------------------------------------------

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Current state for display ("Stopped", "Paused", ...).
    pub fn state_name(&self) -> &'static str {
        self.state.as_str()
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn ppu(&self) -> &Ppu {
        &self.ppu
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn rom_path(&self) -> Option<&Path> {
        self.rom_path.as_deref()
    }

    pub fn cartridge(&self) -> Option<&CartridgeInfo> {
        self.bus.cartridge()
    }

    /// Instructions executed since the last `start`.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Cycles accumulated since the last `start`.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot::capture(&self.cpu)
    }

    pub fn logger(&self) -> &Rc<dyn Logger> {
        &self.logger
    }
}
