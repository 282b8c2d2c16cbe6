/*!
Cartridge image parsing for the iNES (v1) container.

Features:
- Validate the `NES<1A>` magic and parse the 16-byte header
- Extract mirroring, battery, trainer and four-screen flags
- Assemble the mapper number from the two header nibbles
- Capture the PRG payload (skipping the 512-byte trainer when present)

Notes:
- Parsing never touches the Bus. A `Cartridge` value only exists once the
  header has been validated, so callers can install it knowing the image is
  well formed; a failed load leaves every piece of emulator state as it was.
- Only the NROM layout is emulated. The mapper number is parsed and kept in
  the metadata but never changes address decoding.
- PRG data is capped at 16 KiB when installed on the Bus (see `bus`).
*/

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Size of the iNES header in bytes.
pub const HEADER_LEN: usize = 16;
/// Size of the optional trainer block that follows the header.
pub const TRAINER_LEN: usize = 512;
/// One PRG ROM bank (header byte 4 unit).
pub const PRG_BANK_LEN: usize = 16 * 1024;
/// One CHR ROM bank (header byte 5 unit).
pub const CHR_BANK_LEN: usize = 8 * 1024;

const MAGIC: &[u8; 4] = b"NES\x1A";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

/// Why a file was rejected as an iNES image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormatIssue {
    /// First four bytes are not `N`, `E`, `S`, `0x1A`.
    BadMagic,
    /// Magic present but the file ends before the 16-byte header does.
    TruncatedHeader,
}

impl fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatIssue::BadMagic => write!(f, "invalid iNES header magic (expected NES<1A>)"),
            FormatIssue::TruncatedHeader => write!(f, "file too small for a 16-byte iNES header"),
        }
    }
}

/// Cartridge load failures. Both are recoverable: nothing has been mutated
/// when one of these is returned.
#[derive(Debug)]
pub enum LoadError {
    Unreadable { path: PathBuf, source: io::Error },
    BadFormat { path: PathBuf, reason: FormatIssue },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Unreadable { path, source } => {
                write!(f, "failed to read cartridge {}: {source}", path.display())
            }
            LoadError::BadFormat { path, reason } => {
                write!(f, "cartridge {} is not an iNES image: {reason}", path.display())
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Unreadable { source, .. } => Some(source),
            LoadError::BadFormat { .. } => None,
        }
    }
}

/// Decoded iNES header fields.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InesHeader {
    pub prg_banks: u8,
    pub chr_banks: u8,
    pub mirroring: Mirroring,
    pub battery: bool,
    pub has_trainer: bool,
    pub mapper: u8,
    pub prg_ram_banks: u8,
}

impl InesHeader {
    /// Parse the first 16 bytes of an image. Only the magic and the header
    /// length are validated; bank counts are taken as-is.
    pub fn parse(data: &[u8]) -> Result<Self, FormatIssue> {
        if data.len() < MAGIC.len() || &data[0..4] != MAGIC {
            return Err(FormatIssue::BadMagic);
        }
        if data.len() < HEADER_LEN {
            return Err(FormatIssue::TruncatedHeader);
        }

        let flags6 = data[6];
        let flags7 = data[7];

        let four_screen = (flags6 & 0b0000_1000) != 0;
        let mirroring = if four_screen {
            Mirroring::FourScreen
        } else if (flags6 & 0b0000_0001) != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Ok(Self {
            prg_banks: data[4],
            chr_banks: data[5],
            mirroring,
            battery: (flags6 & 0b0000_0010) != 0,
            has_trainer: (flags6 & 0b0000_0100) != 0,
            // Low nibble from flags 6, high nibble from flags 7.
            mapper: (flags7 & 0xF0) | (flags6 >> 4),
            prg_ram_banks: data[8],
        })
    }

    /// PRG size declared by the header, in bytes.
    pub fn prg_len(&self) -> usize {
        self.prg_banks as usize * PRG_BANK_LEN
    }

    /// CHR size declared by the header, in bytes.
    pub fn chr_len(&self) -> usize {
        self.chr_banks as usize * CHR_BANK_LEN
    }

    /// Offset of the first PRG byte inside the file.
    pub fn prg_offset(&self) -> usize {
        if self.has_trainer {
            HEADER_LEN + TRAINER_LEN
        } else {
            HEADER_LEN
        }
    }
}

/// Metadata recorded by the Bus once a cartridge has been installed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeInfo {
    pub path: PathBuf,
    /// Size of the whole file in bytes.
    pub size: usize,
    pub header: InesHeader,
    /// Number of PRG bytes actually copied into the ROM window (≤ 16 KiB).
    pub prg_loaded: usize,
}

impl CartridgeInfo {
    pub fn mapper(&self) -> u8 {
        self.header.mapper
    }

    pub fn mirroring(&self) -> Mirroring {
        self.header.mirroring
    }

    /// True when the header asks for something other than NROM.
    pub fn needs_bank_switching(&self) -> bool {
        self.header.mapper != 0
    }
}

/// A validated iNES image ready to be installed on the Bus.
#[derive(Clone, Debug)]
pub struct Cartridge {
    path: PathBuf,
    header: InesHeader,
    size: usize,
    prg: Vec<u8>,
}

impl Cartridge {
    /// Parse an in-memory image. `path` is only recorded as metadata.
    pub fn from_bytes<P: Into<PathBuf>>(path: P, data: &[u8]) -> Result<Self, LoadError> {
        let path = path.into();
        let header = match InesHeader::parse(data) {
            Ok(h) => h,
            Err(reason) => return Err(LoadError::BadFormat { path, reason }),
        };

        // Short files are tolerated: whatever PRG bytes exist are kept.
        let start = header.prg_offset().min(data.len());
        let end = start.saturating_add(header.prg_len()).min(data.len());
        let prg = data[start..end].to_vec();

        Ok(Self {
            path,
            header,
            size: data.len(),
            prg,
        })
    }

    /// Read and parse an image from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path, &bytes)
    }

    pub fn header(&self) -> &InesHeader {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// PRG payload as found in the file (not yet truncated).
    pub fn prg(&self) -> &[u8] {
        &self.prg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_ines, write_temp_rom};

    #[test]
    fn parse_nrom_vertical() {
        let data = build_ines(1, 1, 0b0000_0001, 0, 1, None);
        let cart = Cartridge::from_bytes("mem.nes", &data).expect("parse");
        let h = cart.header();
        assert_eq!(h.prg_banks, 1);
        assert_eq!(h.chr_banks, 1);
        assert_eq!(h.mirroring, Mirroring::Vertical);
        assert_eq!(h.mapper, 0);
        assert_eq!(h.prg_ram_banks, 1);
        assert!(!h.battery);
        assert_eq!(cart.prg().len(), PRG_BANK_LEN);
        assert_eq!(cart.size(), data.len());
    }

    #[test]
    fn mapper_assembled_from_both_nibbles() {
        // Low nibble 0x1 in flags6, high nibble 0x4 in flags7 -> mapper 0x41
        let data = build_ines(1, 0, 0x10, 0x40, 0, None);
        let h = *Cartridge::from_bytes("m.nes", &data).unwrap().header();
        assert_eq!(h.mapper, 0x41);
    }

    #[test]
    fn four_screen_overrides_mirroring_bit() {
        let data = build_ines(1, 0, 0b0000_1001, 0, 0, None);
        let h = InesHeader::parse(&data).unwrap();
        assert_eq!(h.mirroring, Mirroring::FourScreen);
    }

    #[test]
    fn battery_and_trainer_flags() {
        let trainer = [0x5Au8; TRAINER_LEN];
        let data = build_ines(1, 0, 0b0000_0110, 0, 0, Some(&trainer));
        let cart = Cartridge::from_bytes("t.nes", &data).unwrap();
        assert!(cart.header().battery);
        assert!(cart.header().has_trainer);
        // Trainer bytes are skipped; PRG pattern starts right after them.
        assert_eq!(cart.prg()[0], 0xAA);
    }

    #[test]
    fn bad_magic_rejected() {
        let mut data = build_ines(1, 0, 0, 0, 0, None);
        data[3] = 0x1B;
        match Cartridge::from_bytes("bad.nes", &data) {
            Err(LoadError::BadFormat { reason, .. }) => assert_eq!(reason, FormatIssue::BadMagic),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn truncated_header_rejected() {
        let data = b"NES\x1A\x01\x00".to_vec();
        let err = Cartridge::from_bytes("short.nes", &data).unwrap_err();
        assert!(matches!(
            err,
            LoadError::BadFormat {
                reason: FormatIssue::TruncatedHeader,
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = Cartridge::from_file("/definitely/not/here.nes").unwrap_err();
        assert!(matches!(err, LoadError::Unreadable { .. }));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("not/here.nes"));
    }

    #[test]
    fn from_file_round_trip() {
        let data = build_ines(1, 1, 0, 0, 0, None);
        let path = write_temp_rom("cart_from_file", &data);
        let cart = Cartridge::from_file(&path).expect("load");
        assert_eq!(cart.path(), path.as_path());
        assert_eq!(cart.prg().len(), PRG_BANK_LEN);
        let _ = std::fs::remove_file(path);
    }
}
