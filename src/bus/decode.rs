/*!
CPU-visible address decoder.

Every 16-bit address resolves to exactly one `Region`. The checks run in a
fixed order and the first match wins:

| Range         | Region              | Index                |
|---------------|---------------------|----------------------|
| $8000-$FFFF   | PRG ROM buffer      | addr - $8000         |
| $0000-$1FFF   | RAM                 | addr & $07FF         |
| $2000-$3FFF   | PPU registers (RAM) | addr & $0007         |
| $4000-$4019   | General I/O (RAM)   | addr & $07FF         |
| $401A-$7FFF   | Unmapped            | reads 0, writes drop |

$3FFF belongs to the PPU window only; $4000 is the first I/O address.
The PPU and I/O windows are stubs that alias internal RAM until real
devices are attached.
*/

pub const PRG_ROM_START: u16 = 0x8000;
pub const RAM_END: u16 = 0x1FFF;
pub const PPU_START: u16 = 0x2000;
pub const PPU_END: u16 = 0x3FFF;
pub const IO_START: u16 = 0x4000;
pub const IO_END: u16 = 0x4019;

/// Number of PPU registers visible through the 8-byte mirrored window.
pub const PPU_REGISTER_COUNT: u16 = 8;

/// Backing store selected for one access, with the index already reduced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Region {
    Rom(usize),
    Ram(u16),
    PpuRegister(u16),
    GeneralIo(u16),
    Unmapped,
}

#[inline]
pub fn decode(addr: u16) -> Region {
    if addr >= PRG_ROM_START {
        Region::Rom((addr - PRG_ROM_START) as usize)
    } else if addr <= RAM_END {
        Region::Ram(addr & 0x07FF)
    } else if (PPU_START..=PPU_END).contains(&addr) {
        Region::PpuRegister(addr & (PPU_REGISTER_COUNT - 1))
    } else if (IO_START..=IO_END).contains(&addr) {
        Region::GeneralIo(addr & 0x07FF)
    } else {
        Region::Unmapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_resolve_to_one_region() {
        assert_eq!(decode(0x0000), Region::Ram(0));
        assert_eq!(decode(0x1FFF), Region::Ram(0x07FF));
        assert_eq!(decode(0x2000), Region::PpuRegister(0));
        assert_eq!(decode(0x3FFF), Region::PpuRegister(7));
        assert_eq!(decode(0x4000), Region::GeneralIo(0));
        assert_eq!(decode(0x4019), Region::GeneralIo(0x19));
        assert_eq!(decode(0x401A), Region::Unmapped);
        assert_eq!(decode(0x7FFF), Region::Unmapped);
        assert_eq!(decode(0x8000), Region::Rom(0));
        assert_eq!(decode(0xFFFF), Region::Rom(0x7FFF));
    }

    #[test]
    fn ppu_window_mirrors_every_8_bytes() {
        for base in (0x2000u16..0x4000).step_by(8) {
            for r in 0..8 {
                assert_eq!(decode(base + r), Region::PpuRegister(r));
            }
        }
    }
}
