//! Property-based tests for the CPU address map and cartridge install.

use famicore::{Bus, Cartridge};
use proptest::prelude::*;

const PRG_BANK: usize = 16 * 1024;

/// iNES image with one or two PRG banks filled from `seed`, no CHR.
fn ines(prg_banks: u8, seed: u8) -> Vec<u8> {
    let mut data = vec![b'N', b'E', b'S', 0x1A, prg_banks, 0, 0, 0];
    data.resize(16, 0);
    for i in 0..PRG_BANK * prg_banks as usize {
        data.push(seed.wrapping_add((i % 251) as u8) ^ (i >> 14) as u8);
    }
    data
}

proptest! {
    #[test]
    fn ram_is_mirrored_every_2k(addr in 0u16..0x2000, value in any::<u8>()) {
        let mut bus = Bus::new();
        bus.write(addr, value);
        let base = addr & 0x07FF;
        for mirror in [base, base | 0x0800, base | 0x1000, base | 0x1800] {
            prop_assert_eq!(bus.read(mirror), value);
        }
    }

    #[test]
    fn ppu_window_repeats_every_8_bytes(addr in 0x2000u16..0x4000, value in any::<u8>()) {
        let mut bus = Bus::new();
        bus.write(addr, value);
        prop_assert_eq!(bus.read(0x2000 + (addr & 7)), value);
        prop_assert_eq!(bus.read(0x3FF8 + (addr & 7)), value);
    }

    #[test]
    fn unmapped_space_reads_zero(addr in 0x401Au16..0x8000, value in any::<u8>()) {
        let mut bus = Bus::new();
        bus.write(addr, value);
        prop_assert_eq!(bus.read(addr), 0);
    }

    #[test]
    fn first_prg_bank_fills_both_halves(prg_banks in 1u8..=2, seed in any::<u8>(), offset in 0u16..0x4000) {
        let cart = Cartridge::from_bytes("prop.nes", &ines(prg_banks, seed)).expect("valid image");
        let mut bus = Bus::new();
        let info = bus.install_cartridge(&cart);

        prop_assert!(info.prg_loaded <= PRG_BANK);
        let expected = cart.prg()[offset as usize];
        prop_assert_eq!(bus.read(0x8000 + offset), expected);
        prop_assert_eq!(bus.read(0xC000 + offset), expected);
    }

    #[test]
    fn read16_is_little_endian(addr in 0u16..0x07FF, lo in any::<u8>(), hi in any::<u8>()) {
        let mut bus = Bus::new();
        bus.write(addr, lo);
        bus.write(addr + 1, hi);
        prop_assert_eq!(bus.read16(addr), u16::from_le_bytes([lo, hi]));
    }
}
