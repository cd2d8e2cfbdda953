use core::fmt;

/// A four channel colour as it travels through the pixel pipeline.
///
/// Channels are held as `i32` because intermediate values are wider
/// than a byte: combiner outputs are 9 bits, blender inputs can be
/// negative after sign extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
}

impl Color {
    pub const ZERO: Color = Color::new(0, 0, 0, 0);

    #[must_use]
    pub const fn new(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self { r, g, b, a }
    }

    /// Same value in every channel.
    #[must_use]
    pub const fn splat(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Unpack an `RRGGBBAA` register value.
    #[must_use]
    pub const fn from_u32(v: u32) -> Self {
        Self::new(
            ((v >> 24) & 0xFF) as i32,
            ((v >> 16) & 0xFF) as i32,
            ((v >> 8) & 0xFF) as i32,
            (v & 0xFF) as i32,
        )
    }

    /// Pack the low byte of each channel as `RRGGBBAA`.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32 & 0xFF) << 24)
            | ((self.g as u32 & 0xFF) << 16)
            | ((self.b as u32 & 0xFF) << 8)
            | (self.a as u32 & 0xFF)
    }

    /// Expand a 5-5-5-1 framebuffer pixel. Channels keep the 5 bit value
    /// in the top of the byte; alpha is the raw coverage bit.
    #[must_use]
    pub const fn from_rgba5551(v: u16) -> Self {
        let v = v as i32;
        Self::new((v >> 8) & 0xF8, (v & 0x7C0) >> 3, (v & 0x3E) << 2, v & 1)
    }

    /// Set R, G and B to `v`, leaving alpha untouched.
    pub fn set_rgb(&mut self, v: i32) {
        self.r = v;
        self.g = v;
        self.b = v;
    }
}

impl From<u32> for Color {
    fn from(v: u32) -> Self {
        Self::from_u32(v)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}
