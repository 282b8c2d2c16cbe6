/*!
Read-only views for debugger / UI collaborators.

- `CpuSnapshot`: a `Copy` of every register plus the last decoded
  instruction, taken between ticks. `Display` renders one trace line:

  ```text
  C000  A9 LDA   A:05 X:00 Y:00 P:24 SP:FD
  ```
  The address, opcode and mnemonic describe the instruction that just ran;
  the registers are the state it left behind.

- `dump_ram_png` / `dump_rom_png` (feature `screenshot`): write the 2 KiB RAM
  as a 64x32 and the 32 KiB PRG window as a 256x128 grayscale PNG, one pixel
  per byte.
*/

use std::fmt;

use crate::cpu::Cpu;
use crate::cpu::state::{BREAK, CARRY, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, UNUSED, ZERO};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub pc: u16,
    pub last_pc: u16,
    pub sp: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub status: u8,
    pub opcode: u8,
    pub mnemonic: &'static str,
}

impl CpuSnapshot {
    pub fn capture(cpu: &Cpu) -> Self {
        Self {
            pc: cpu.pc(),
            last_pc: cpu.last_pc(),
            sp: cpu.sp(),
            a: cpu.a(),
            x: cpu.x(),
            y: cpu.y(),
            status: cpu.status(),
            opcode: cpu.opcode(),
            mnemonic: cpu.mnemonic(),
        }
    }

    /// Status flags as `NV-BDIZC`, upper case when set.
    pub fn flags_string(&self) -> String {
        const BITS: [(u8, char); 8] = [
            (NEGATIVE, 'N'),
            (OVERFLOW, 'V'),
            (UNUSED, '-'),
            (BREAK, 'B'),
            (DECIMAL, 'D'),
            (IRQ_DISABLE, 'I'),
            (ZERO, 'Z'),
            (CARRY, 'C'),
        ];
        BITS.iter()
            .map(|&(mask, c)| {
                if self.status & mask != 0 {
                    c
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    }
}

impl fmt::Display for CpuSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X}  {:02X} {:<5} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
            self.last_pc, self.opcode, self.mnemonic, self.a, self.x, self.y, self.status, self.sp
        )
    }
}

#[cfg(feature = "screenshot")]
pub use png::{RAM_DUMP_SIZE, ROM_DUMP_SIZE, dump_ram_png, dump_rom_png};

#[cfg(feature = "screenshot")]
mod png {
    use std::path::Path;

    use image::{GrayImage, ImageError};

    use crate::bus::Bus;

    /// (width, height) of the RAM dump.
    pub const RAM_DUMP_SIZE: (u32, u32) = (64, 32);
    /// (width, height) of the PRG ROM dump.
    pub const ROM_DUMP_SIZE: (u32, u32) = (256, 128);

    pub fn dump_ram_png<P: AsRef<Path>>(bus: &Bus, path: P) -> Result<(), ImageError> {
        save_gray(bus.ram(), RAM_DUMP_SIZE, path.as_ref())
    }

    pub fn dump_rom_png<P: AsRef<Path>>(bus: &Bus, path: P) -> Result<(), ImageError> {
        save_gray(bus.prg_rom(), ROM_DUMP_SIZE, path.as_ref())
    }

    fn save_gray(bytes: &[u8], (w, h): (u32, u32), path: &Path) -> Result<(), ImageError> {
        // Sizes are fixed by the Bus buffers, so this only pads or trims if
        // those ever change.
        let mut buf = bytes.to_vec();
        buf.resize((w * h) as usize, 0);
        let mut img = GrayImage::new(w, h);
        img.copy_from_slice(&buf);
        img.save(path)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn ram_dump_round_trips_through_png() {
            let mut bus = Bus::new();
            bus.write(0x0000, 0xFF);
            bus.write(0x07FF, 0x80);
            let path = std::env::temp_dir().join(format!("famicore_ram_{}.png", std::process::id()));
            dump_ram_png(&bus, &path).expect("write png");
            let img = image::open(&path).expect("read png").to_luma8();
            assert_eq!(img.dimensions(), RAM_DUMP_SIZE);
            assert_eq!(img.get_pixel(0, 0).0[0], 0xFF);
            assert_eq!(img.get_pixel(63, 31).0[0], 0x80);
            let _ = std::fs::remove_file(path);
        }
    }
}
