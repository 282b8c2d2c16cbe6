/*!
cpu::mod - Public façade for the 6502 CPU core.

```text
    state.rs        - Registers, flag masks, stack primitives.
    table.rs        - Immutable 256-entry opcode table (operation + mode tags).
    addressing.rs   - Effective-address resolution and page-cross detection.
    execute.rs      - Instruction semantic helpers (ALU, stack, RMW).
    dispatch.rs     - Exhaustive match from operation tag to helpers.
    core            - `Cpu` façade: reset, connect_bus, execute, introspection.
```

Usage:
```rust
use famicore::{Bus, Cpu};

let mut bus = Bus::new();
bus.write(0xC000, 0xA9); // LDA #$05
bus.write(0xC001, 0x05);

let mut cpu = Cpu::new();
cpu.reset();
let cycles = cpu.connect_bus(&mut bus).execute();
assert_eq!(cycles, 2);
assert_eq!(cpu.a(), 0x05);
```
*/

pub mod addressing;
pub mod core;
pub mod dispatch;
pub mod execute;
pub mod state;
pub mod table;

pub use self::core::{Attached, Cpu};
pub use state::{
    BREAK, CARRY, CpuState, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, UNUSED, ZERO,
};
pub use table::{AddressingMode, Instruction, OPCODES, Operation, lookup};
