//! Dither stage.
//!
//! Before a colour is truncated to the 5-bit framebuffer channels the
//! blender rounds each channel up by one 5-bit step when the discarded
//! low three bits exceed a per-pixel threshold. The threshold comes from
//! a 4x4 ordered matrix (magic square or Bayer) indexed by the pixel
//! position, or from the noise generator. Alpha gets its own threshold,
//! used by the combiner to dither alpha and shade alpha.

use rdp_registers::RgbDitherSel;
use rdp_twin_core::{Color, PipelineState};

/// Bayer ordered dither, row major, indexed by `(y & 3) << 2 | (x & 3)`.
pub const BAYER: [i32; 16] = [0, 4, 1, 5, 4, 0, 5, 1, 3, 7, 2, 6, 7, 3, 6, 2];

/// Magic square ordered dither, same indexing as [`BAYER`].
pub const MAGIC: [i32; 16] = [0, 6, 1, 7, 4, 2, 5, 3, 3, 5, 2, 4, 7, 1, 6, 0];

/// Per-pixel thresholds for the colour and alpha channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DitherSeeds {
    pub color: i32,
    pub alpha: i32,
}

fn round_up(c: i32) -> i32 {
    if c > 247 {
        255
    } else {
        (c & 0xF8) + 8
    }
}

/// Round one channel up when `threshold` is below its low three bits.
fn dither_channel(c: i32, threshold: i32) -> i32 {
    let take = (threshold - (c & 7)) >> 31;
    c + ((round_up(c) - c) & take)
}

/// Apply the colour dither to the RGB channels of `c`.
///
/// With noise selected the threshold is nine random bits, three per
/// channel; otherwise every channel uses the whole value. Alpha passes
/// through.
#[must_use]
pub fn rgb_dither(sel: RgbDitherSel, c: Color, dither: i32) -> Color {
    let (tr, tg, tb) = if sel == RgbDitherSel::Noise {
        (dither & 7, (dither >> 3) & 7, (dither >> 6) & 7)
    } else {
        (dither, dither, dither)
    };
    Color::new(
        dither_channel(c.r, tr),
        dither_channel(c.g, tg),
        dither_channel(c.b, tb),
        c.a,
    )
}

/// Thresholds for the pixel at `(x, y)`.
///
/// Draws from the noise generator as the current dither modes require,
/// and refreshes the combiner NOISE input when any dither needs it.
pub fn dither_noise(state: &mut PipelineState, x: i32, y: i32) -> DitherSeeds {
    if state.flags.dither_level == 0 {
        state.noise = ((state.irand() & 7) << 6) | 0x20;
    }

    let field = i32::from(state.scissor.field);
    let index = ((((y >> field) & 3) << 2) | (x & 3)) as usize;
    let mode = state.flags.rgba_dither;

    let color = match mode >> 2 {
        0 => MAGIC[index],
        1 => BAYER[index],
        2 => state.irand(),
        _ => 7,
    };

    // Alpha follows the colour matrix, except that random colour dither
    // pairs with the magic square and no colour dither with Bayer.
    let pattern = match mode >> 2 {
        0 | 2 => MAGIC[index],
        _ => BAYER[index],
    };
    let alpha = match mode & 3 {
        0 => pattern,
        1 => !pattern & 7,
        2 => (state.noise >> 6) & 7,
        _ => 0,
    };

    DitherSeeds { color, alpha }
}
