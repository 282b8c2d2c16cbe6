//! Shared builders for unit tests: iNES images, temp ROM files and a
//! ready-to-run Bus + CPU pair.
//!
//! Header layout written by `build_ines`:
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units
//! - byte 6 = Flags 6 (mirroring, battery, trainer, four-screen, mapper low nibble)
//! - byte 7 = Flags 7 (mapper high nibble)
//! - byte 8 = PRG RAM size in 8 KiB units
//! - bytes 9..15 = zero padding
//!
//! PRG is filled with 0xAA and CHR with 0xCC unless a program is injected.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bus::Bus;
use crate::cpu::Cpu;

/// Build a minimal iNES (v1) image.
///
/// - `prg_16k`: number of 16 KiB PRG units
/// - `chr_8k`: number of 8 KiB CHR units
/// - `flags6` / `flags7`: raw header flag bytes
/// - `prg_ram_8k`: header byte 8
/// - `trainer`: optional 512-byte trainer inserted after the header
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    prg_ram_8k: u8,
    trainer: Option<&[u8; 512]>,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(
        16 + trainer.map(|_| 512).unwrap_or(0) + prg_16k * 16 * 1024 + chr_8k * 8 * 1024,
    );

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.push(prg_ram_8k);
    bytes.extend_from_slice(&[0u8; 7]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }

    bytes.extend(std::iter::repeat_n(0xAA, prg_16k * 16 * 1024));
    bytes.extend(std::iter::repeat_n(0xCC, chr_8k * 8 * 1024));

    bytes
}

/// Build a one-bank NROM image with `prg` at the start of PRG (which the
/// Bus maps at both $8000 and $C000) and the CPU vectors at the bank end.
///
/// `vectors` is (reset, nmi, irq); defaults to $C000 for all three so the
/// fixed entry point and the reset vector agree.
pub fn build_nrom_with_prg(prg: &[u8], vectors: Option<(u16, u16, u16)>) -> Vec<u8> {
    assert!(
        prg.len() <= 16 * 1024 - 6,
        "program must leave room for the vectors in a 16 KiB bank"
    );

    let mut rom = build_ines(1, 0, 0, 0, 0, None);
    let prg_start = 16;
    let prg_end = prg_start + 16 * 1024;
    // Zero the pattern fill so unwritten bytes decode as BRK.
    rom[prg_start..prg_end].fill(0);
    rom[prg_start..prg_start + prg.len()].copy_from_slice(prg);

    let (reset, nmi, irq) = vectors.unwrap_or((0xC000, 0xC000, 0xC000));
    set_vectors_in_prg(&mut rom[prg_start..prg_end], reset, nmi, irq);
    rom
}

/// Write NMI/RESET/IRQ vectors at the tail of a 16 KiB or 32 KiB PRG slice.
pub fn set_vectors_in_prg(prg: &mut [u8], reset: u16, nmi: u16, irq: u16) {
    let base = match prg.len() {
        16384 => 0x3FFA,
        32768 => 0x7FFA,
        other => panic!("unsupported PRG length for vectors: {other} bytes"),
    };
    prg[base..base + 2].copy_from_slice(&nmi.to_le_bytes());
    prg[base + 2..base + 4].copy_from_slice(&reset.to_le_bytes());
    prg[base + 4..base + 6].copy_from_slice(&irq.to_le_bytes());
}

static TEMP_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Write `data` to a uniquely named file in the system temp directory.
/// Callers remove the file when done.
pub fn write_temp_rom(tag: &str, data: &[u8]) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!(
        "famicore_{tag}_{}_{seq}.nes",
        std::process::id()
    ));
    std::fs::write(&path, data).expect("write temp rom");
    path
}

/// Bus with `program` copied to $C000 (no cartridge file involved) and a
/// freshly reset CPU whose PC already points at it.
pub fn setup(program: &[u8]) -> (Cpu, Bus) {
    let mut bus = Bus::new();
    for (i, b) in program.iter().enumerate() {
        bus.write(0xC000u16.wrapping_add(i as u16), *b);
    }
    let mut cpu = Cpu::new();
    cpu.reset();
    (cpu, bus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_basic_ines() {
        let rom = build_ines(2, 1, 0x01, 0x00, 1, None);
        assert_eq!(&rom[0..4], b"NES\x1A");
        assert_eq!(rom[4], 2);
        assert_eq!(rom[5], 1);
        assert_eq!(rom[6], 0x01);
        assert_eq!(rom[8], 1);
        assert_eq!(rom.len(), 16 + 2 * 16 * 1024 + 8 * 1024);
    }

    #[test]
    fn writes_vectors_for_16k_prg() {
        let mut prg = vec![0u8; 16 * 1024];
        set_vectors_in_prg(&mut prg, 0x8123, 0x8456, 0x8ABC);
        assert_eq!(&prg[0x3FFA..0x4000], &[0x56, 0x84, 0x23, 0x81, 0xBC, 0x8A]);
    }

    #[test]
    fn nrom_program_lands_at_prg_start() {
        let rom = build_nrom_with_prg(&[0xA9, 0x01], None);
        assert_eq!(rom[16], 0xA9);
        assert_eq!(rom[17], 0x01);
        assert_eq!(rom[18], 0x00);
        // Reset vector low/high at PRG offset 0x3FFC
        assert_eq!(rom[16 + 0x3FFC], 0x00);
        assert_eq!(rom[16 + 0x3FFD], 0xC0);
    }

    #[test]
    fn temp_roms_get_distinct_paths() {
        let a = write_temp_rom("distinct", b"x");
        let b = write_temp_rom("distinct", b"y");
        assert_ne!(a, b);
        let _ = std::fs::remove_file(a);
        let _ = std::fs::remove_file(b);
    }
}
