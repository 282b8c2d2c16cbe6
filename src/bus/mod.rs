#![doc = r#"
Bus module: the CPU-visible 64 KiB address space.

Overview
- `Bus` owns the 2 KiB work RAM, a 32 KiB PRG ROM buffer and the metadata of
  the installed cartridge.
- Every access goes through `decode::decode`, which maps an address to a
  single backing store (see the table there).
- Cartridge images are parsed by `cartridge::Cartridge` before anything here
  is touched; `load_cartridge` only mutates the Bus once parsing succeeded.

Modules
- decode: address range table and the `Region` it resolves to.
- ram: 2 KiB RAM with mirrored access.
"#]

pub mod decode;
pub mod ram;


use std::path::Path;

use crate::cartridge::{Cartridge, CartridgeInfo, LoadError, PRG_BANK_LEN};
pub use decode::{Region, decode};
pub use ram::{CPU_RAM_SIZE, Ram};

/// Size of the PRG ROM window ($8000-$FFFF).
pub const PRG_ROM_SIZE: usize = 0x8000;

/// Start of the upper PRG mirror inside the ROM buffer ($C000 - $8000).
const UPPER_BANK_OFFSET: usize = 0x4000;

pub struct Bus {
    ram: Ram,
    prg_rom: Box<[u8; PRG_ROM_SIZE]>,
    cartridge: Option<CartridgeInfo>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("cartridge", &self.cartridge)
            .finish_non_exhaustive()
    }
}

impl Bus {
    pub fn new() -> Self {
        Self {
            ram: Ram::new(),
            prg_rom: Box::new([0; PRG_ROM_SIZE]),
            cartridge: None,
        }
    }

    /// Zero RAM and PRG ROM and forget the installed cartridge.
    pub fn reset(&mut self) {
        self.ram.reset();
        self.prg_rom.fill(0);
        self.cartridge = None;
    }

    pub fn read(&self, addr: u16) -> u8 {
        match decode(addr) {
            Region::Rom(i) => self.prg_rom[i],
            Region::Ram(i) | Region::PpuRegister(i) | Region::GeneralIo(i) => self.ram.read(i),
            Region::Unmapped => 0,
        }
    }

    /// Writes into $8000-$FFFF are stored; the ROM buffer doubles as RAM for
    /// test fixtures that patch code in place.
    pub fn write(&mut self, addr: u16, value: u8) {
        match decode(addr) {
            Region::Rom(i) => self.prg_rom[i] = value,
            Region::Ram(i) | Region::PpuRegister(i) | Region::GeneralIo(i) => {
                self.ram.write(i, value)
            }
            Region::Unmapped => {}
        }
    }

    /// Little-endian word: low byte at `addr`, high byte at `addr + 1`
    /// (wrapping at $FFFF).
    pub fn read16(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Read, validate and install an iNES file. On error nothing on the Bus
    /// has changed.
    pub fn load_cartridge<P: AsRef<Path>>(&mut self, path: P) -> Result<CartridgeInfo, LoadError> {
        let cart = Cartridge::from_file(path)?;
        Ok(self.install_cartridge(&cart))
    }

    /// Copy an already validated image into the PRG window.
    ///
    /// The first 16 KiB of PRG is placed at both $8000 and $C000 (NROM-128
    /// layout). Larger images are truncated; the mapper number is recorded
    /// but has no effect on decoding.
    pub fn install_cartridge(&mut self, cart: &Cartridge) -> CartridgeInfo {
        let prg = cart.prg();
        let n = prg.len().min(PRG_BANK_LEN);

        self.prg_rom.fill(0);
        self.prg_rom[..n].copy_from_slice(&prg[..n]);
        self.prg_rom[UPPER_BANK_OFFSET..UPPER_BANK_OFFSET + n].copy_from_slice(&prg[..n]);

        let info = CartridgeInfo {
            path: cart.path().to_path_buf(),
            size: cart.size(),
            header: *cart.header(),
            prg_loaded: n,
        };
        self.cartridge = Some(info.clone());
        info
    }

    pub fn cartridge(&self) -> Option<&CartridgeInfo> {
        self.cartridge.as_ref()
    }

    pub fn is_cartridge_loaded(&self) -> bool {
        self.cartridge.is_some()
    }

    /// Physical RAM contents (2 KiB).
    pub fn ram(&self) -> &[u8] {
        self.ram.as_slice()
    }

    /// PRG ROM buffer as mapped at $8000-$FFFF.
    pub fn prg_rom(&self) -> &[u8] {
        &self.prg_rom[..]
    }
}
