/*!
Picture-processing stub.

The CPU-visible register window ($2000-$3FFF) is served by the Bus from work
RAM (see `bus::decode`). This type only owns the output surface so the
display front-end has something to present:

- a 256x240 buffer of 8-bit intensity values, cleared on reset
- `write_rgba` to expand it into the RGBA layout `pixels` expects

No rendering happens here.
*/

/// Screen width in pixels.
pub const SCREEN_WIDTH: usize = 256;
/// Screen height in pixels.
pub const SCREEN_HEIGHT: usize = 240;
/// RGBA bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Clone)]
pub struct Ppu {
    framebuffer: Vec<u8>,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ppu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ppu")
            .field("width", &SCREEN_WIDTH)
            .field("height", &SCREEN_HEIGHT)
            .finish()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            framebuffer: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT],
        }
    }

    /// Blank the output surface.
    pub fn reset(&mut self) {
        self.framebuffer.fill(0);
    }

    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    /// Expand the intensity buffer into `out` (RGBA8, row-major). `out` must
    /// hold `SCREEN_WIDTH * SCREEN_HEIGHT * BYTES_PER_PIXEL` bytes; extra
    /// bytes are left alone.
    pub fn write_rgba(&self, out: &mut [u8]) {
        for (px, &v) in out.chunks_exact_mut(BYTES_PER_PIXEL).zip(&self.framebuffer) {
            px.copy_from_slice(&[v, v, v, 0xFF]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_blanks_surface() {
        let mut ppu = Ppu::new();
        ppu.framebuffer[100] = 0x80;
        ppu.reset();
        assert!(ppu.framebuffer().iter().all(|&p| p == 0));
        assert_eq!(ppu.framebuffer().len(), SCREEN_WIDTH * SCREEN_HEIGHT);
    }

    #[test]
    fn rgba_expansion() {
        let mut ppu = Ppu::new();
        ppu.framebuffer[1] = 0x40;
        let mut out = vec![0u8; SCREEN_WIDTH * SCREEN_HEIGHT * BYTES_PER_PIXEL];
        ppu.write_rgba(&mut out);
        assert_eq!(&out[0..8], &[0, 0, 0, 0xFF, 0x40, 0x40, 0x40, 0xFF]);
    }
}
