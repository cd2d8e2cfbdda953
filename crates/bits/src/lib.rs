//! Bit-level helpers shared by every RDP pipeline stage.
//!
//! The display processor datapath is built from odd-width registers
//! (9, 13, 14, 17, 22, 28 and 30 bits).  The helpers here widen those
//! values into `i32` the same way the silicon does, including the
//! wrap-around behaviour when a field's top bit is set.


/// Sign-extend the low `width` bits of `value`.
///
/// Bits above `width` are discarded before extension.
#[inline]
#[must_use]
pub const fn sign(value: i32, width: u32) -> i32 {
    let mask = ((1u32 << width) - 1) as i32;
    (value & mask) | (value & (1i32 << (width - 1))).wrapping_neg()
}

/// Sign-extend `value` from bit `width - 1` without discarding the
/// bits above `width`.
///
/// Used where the datapath ORs the sign into an already wide value
/// (the combiner multiplier path).
#[inline]
#[must_use]
pub const fn sign_f(value: i32, width: u32) -> i32 {
    value | (value & (1i32 << (width - 1))).wrapping_neg()
}

/// Position a tile-space coordinate relative to a tile origin held in
/// 10.2 fixed point.
#[inline]
#[must_use]
pub const fn tile_relative(x: i32, origin: i32) -> i32 {
    x.wrapping_sub(origin << 3)
}

/// Convert a pixel count into a byte count for a texel size code
/// (0 = 4 bit, 1 = 8 bit, 2 = 16 bit, 3 = 32 bit).
#[inline]
#[must_use]
pub const fn pixels_to_bytes(pixels: i32, size: u32) -> i32 {
    (pixels << size) >> 1
}

/// Convert a pixel count into a byte count, treating 4-bit images as one
/// byte per pixel.
#[inline]
#[must_use]
pub const fn pixels_to_bytes_special4(pixels: i32, size: u32) -> i32 {
    if size != 0 {
        pixels_to_bytes(pixels, size)
    } else {
        pixels
    }
}

/// Linear congruential noise source used for dither noise, alpha
/// dither and the combiner NOISE input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Noise {
    seed: u32,
}

impl Noise {
    /// Seed used by the hardware model at reset.
    pub const RESET_SEED: u32 = 3;

    pub const fn new(seed: u32) -> Self {
        Self { seed }
    }

    /// Current generator state.
    #[must_use]
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Advance the generator and return the next 15-bit value.
    pub fn next(&mut self) -> i32 {
        self.seed = self.seed.wrapping_mul(0x343FD).wrapping_add(0x269EC3);
        ((self.seed >> 16) & 0x7FFF) as i32
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new(Self::RESET_SEED)
    }
}
