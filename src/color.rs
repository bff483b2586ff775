//! Pixel formats understood by the panel's write path.

/// A pixel already converted to the panel's write format. The low `ColorDepth::bytes()` bytes
/// are put on the wire most significant first, so pure red in RGB565 is `0xF800`.
pub type RawColor = u32;

/// Color depths a rendering pipeline may ask for. Only the three formats the RM690B0 interface
/// pixel format register knows are accepted by `Panel::set_color_depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorDepth {
    Grayscale8,
    Rgb332,
    Rgb565,
    /// 18 significant bits carried in three bytes.
    Rgb666,
    Rgb888,
    Argb8888,
}

impl ColorDepth {
    /// Bits per pixel as transferred on the bus.
    pub fn bits(self) -> u8 {
        match self {
            ColorDepth::Grayscale8 | ColorDepth::Rgb332 => 8,
            ColorDepth::Rgb565 => 16,
            ColorDepth::Rgb666 | ColorDepth::Rgb888 => 24,
            ColorDepth::Argb8888 => 32,
        }
    }

    /// Bytes per pixel as transferred on the bus.
    pub fn bytes(self) -> usize {
        (self.bits() >> 3) as usize
    }

    /// The `0x3A` interface pixel format value, if the controller supports this depth.
    pub fn pixel_format(self) -> Option<u8> {
        match self {
            ColorDepth::Rgb565 => Some(0x55),
            ColorDepth::Rgb666 => Some(0x66),
            ColorDepth::Rgb888 => Some(0x77),
            _ => None,
        }
    }

    /// Serialize `raw` into wire order. Only the first `self.bytes()` bytes are meaningful.
    pub fn to_wire(self, raw: RawColor) -> [u8; 4] {
        let be = raw.to_be_bytes();
        let mut out = [0u8; 4];
        let n = self.bytes();
        out[..n].copy_from_slice(&be[4 - n..]);
        out
    }
}

impl Default for ColorDepth {
    fn default() -> Self {
        ColorDepth::Rgb565
    }
}
