use rdp_registers::{ImageFormat, TexelSize};

/// Per-axis addressing parameters of a tile descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileAxis {
    pub clamp: bool,
    pub mirror: bool,
    pub mask: i32,
    pub shift: i32,
    /// 10.2 fixed point
    pub low: i32,
    /// 10.2 fixed point
    pub high: i32,

    // Derived fields, refreshed by `Tile::compute_clamp_diffs` and
    // `Tile::compute_derivs`.
    pub clamp_diff: i32,
    pub rdp_clamp: bool,
    pub clamped_mask: i32,
}

/// Wrap mask for a tile axis mask width. A zero mask leaves the full
/// 10-bit range.
#[inline]
#[must_use]
pub const fn mask_bits(mask: i32) -> i32 {
    if mask == 0 {
        0x3FF
    } else {
        (0xFFFF >> (16 - mask)) & 0x3FF
    }
}

impl TileAxis {
    fn wrap(&self, c: i32) -> i32 {
        if self.mask == 0 {
            return c;
        }
        let mut c = c;
        if self.mirror {
            let wrap = (c >> self.clamped_mask) & 1;
            c ^= -wrap;
        }
        c & mask_bits(self.mask)
    }
}

/// One of the eight tile descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile {
    pub format: ImageFormat,
    pub size: TexelSize,
    /// Row stride in 64-bit TMEM words.
    pub line: i32,
    /// Base address in 64-bit TMEM words.
    pub tmem: i32,
    pub palette: i32,
    pub s: TileAxis,
    pub t: TileAxis,
    pub non_tlut_switch: i32,
    pub tlut_switch: i32,
}

impl Tile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Recompute the clamp spans from the current coordinate bounds.
    /// Must run whenever `low`/`high` change on either axis.
    pub fn compute_clamp_diffs(&mut self) {
        self.s.clamp_diff = ((self.s.high >> 2) - (self.s.low >> 2)) & 0x3FF;
        self.t.clamp_diff = ((self.t.high >> 2) - (self.t.low >> 2)) & 0x3FF;
    }

    /// Recompute the clamp/mask derived flags and the texel format
    /// switches. Must run whenever format, size, mask or clamp change.
    pub fn compute_derivs(&mut self) {
        for axis in [&mut self.s, &mut self.t] {
            axis.rdp_clamp = axis.clamp || axis.mask == 0;
            axis.clamped_mask = axis.mask.min(10);
        }

        let format = i32::from(self.format.bits());
        let size = i32::from(self.size.bits());
        if format < 5 {
            self.non_tlut_switch = (format << 2) | size;
            self.tlut_switch = (size << 2) | ((format + 2) & 3);
        } else {
            self.non_tlut_switch = 0x10 | size;
            self.tlut_switch = (size << 2) | 2;
        }
    }

    /// Wrap and mirror a tile relative texel coordinate pair.
    #[must_use]
    pub fn mask(&self, s: i32, t: i32) -> (i32, i32) {
        (self.s.wrap(s), self.t.wrap(t))
    }
}
