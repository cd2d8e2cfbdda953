//! Texture coordinate stage.
//!
//! Turns interpolated S/T/W into tile-relative texel coordinates. The
//! perspective divide uses the hardware reciprocal table; the shift,
//! clamp and mask steps follow the tile descriptor of the texel being
//! fetched.

mod divide;

use rdp_bits::tile_relative;
use rdp_twin_core::{mask_bits, PipelineState, Tile, TileAxis};

pub use divide::{non_perspective_divide, perspective_divide};

/// Divide by W when perspective texturing is enabled, otherwise take S
/// and T as they are.
#[must_use]
pub fn divide(state: &PipelineState, s: i32, t: i32, w: i32) -> (i32, i32) {
    if state.other_modes.persp_tex_en() {
        perspective_divide(s, t, w)
    } else {
        non_perspective_divide(s, t, w)
    }
}

/// Result of [`shift_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shifted {
    pub s: i32,
    pub t: i32,
    /// Coordinate reached the tile's high bound.
    pub max_s: bool,
    pub max_t: bool,
}

/// Result of [`clamp_cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clamped {
    pub s: i32,
    pub t: i32,
    /// Fractions, zeroed when the coordinate was clamped.
    pub frac_s: i32,
    pub frac_t: i32,
}

/// Result of [`mask_coupled`]: wrapped coordinates and the step to the
/// neighbouring texel on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coupled {
    pub s: i32,
    pub s_diff: i32,
    pub t: i32,
    pub t_diff: i32,
}

fn mirror(axis: &TileAxis, c: i32) -> i32 {
    if axis.mirror {
        let wrap = (c >> axis.clamped_mask) & 1;
        c ^ -wrap
    } else {
        c
    }
}

/// Wrap and mirror four S lanes and one T coordinate.
#[must_use]
pub fn mask_copy(tile: &Tile, s: [i32; 4], t: i32) -> ([i32; 4], i32) {
    let s = if tile.s.mask != 0 {
        let bits = mask_bits(tile.s.mask);
        s.map(|c| mirror(&tile.s, c) & bits)
    } else {
        s
    };
    let t = if tile.t.mask != 0 {
        mirror(&tile.t, t) & mask_bits(tile.t.mask)
    } else {
        t
    };
    (s, t)
}

fn shift_axis(shift: i32, c: i32) -> i32 {
    if shift < 11 {
        i32::from(c as i16) >> shift
    } else {
        i32::from((c << (16 - shift)) as i16)
    }
}

/// Apply the tile shift to S and T. Shifts 11 to 15 shift left.
#[must_use]
pub fn shift_copy(tile: &Tile, s: i32, t: i32) -> (i32, i32) {
    (shift_axis(tile.s.shift, s), shift_axis(tile.t.shift, t))
}

/// Shift for the one and two cycle pipelines, flagging coordinates at
/// or past the tile's high bound.
#[must_use]
pub fn shift_cycle(tile: &Tile, s: i32, t: i32) -> Shifted {
    let (s, t) = shift_copy(tile, s, t);
    Shifted {
        s,
        t,
        max_s: (s >> 3) >= tile.s.high,
        max_t: (t >> 3) >= tile.t.high,
    }
}

fn clamp_axis(axis: &TileAxis, c: i32, max: bool, frac: &mut i32) -> i32 {
    if !axis.rdp_clamp {
        return c >> 5;
    }
    if max {
        *frac = 0;
        axis.clamp_diff
    } else if c & 0x10000 == 0 {
        c >> 5
    } else {
        *frac = 0;
        0
    }
}

/// Clamp tile-relative S.10.5 coordinates to texel indices.
///
/// Coordinates at the high bound become the tile's clamp span, negative
/// ones become zero, and either case zeroes the fraction.
#[must_use]
pub fn clamp_cycle(
    tile: &Tile,
    s: i32,
    t: i32,
    frac_s: i32,
    frac_t: i32,
    max_s: bool,
    max_t: bool,
) -> Clamped {
    let mut out = Clamped {
        s: 0,
        t: 0,
        frac_s,
        frac_t,
    };
    out.s = clamp_axis(&tile.s, s, max_s, &mut out.frac_s);
    out.t = clamp_axis(&tile.t, t, max_t, &mut out.frac_t);
    out
}

/// Copy-mode addressing: four consecutive S texels on one T row.
#[must_use]
pub fn pipeline_copy(tile: &Tile, s: i32, t: i32) -> ([i32; 4], i32) {
    let (s, t) = shift_copy(tile, s, t);
    let s = tile_relative(s, tile.s.low) >> 5;
    let t = tile_relative(t, tile.t.low) >> 5;
    mask_copy(tile, [s, s + 1, s + 2, s + 3], t)
}

/// Tile-relative load coordinates. Quad loads keep two more fraction
/// bits.
#[must_use]
pub fn pipeline_load(tile: &Tile, s: i32, t: i32, quad: bool) -> (i32, i32) {
    let shift = if quad { 3 } else { 5 };
    (
        tile_relative(i32::from(s as i16), tile.s.low) >> shift,
        tile_relative(i32::from(t as i16), tile.t.low) >> shift,
    )
}

fn couple(axis: &TileAxis, c: &mut i32, edge: i32) -> i32 {
    if axis.mask == 0 {
        return 1;
    }
    let bits = mask_bits(axis.mask);
    if axis.mirror {
        let wrap = (*c >> axis.clamped_mask) & 1;
        *c = (*c ^ -wrap) & bits;
        if ((*c - wrap) & bits) == bits {
            0
        } else {
            1 - (wrap << 1)
        }
    } else {
        *c &= bits;
        if *c == bits {
            -(*c & edge)
        } else {
            1
        }
    }
}

/// Wrap S and T and return the step to the neighbouring texel, used to
/// pair texels for filtering.
#[must_use]
pub fn mask_coupled(tile: &Tile, s: i32, t: i32) -> Coupled {
    let mut out = Coupled {
        s,
        s_diff: 0,
        t,
        t_diff: 0,
    };
    out.s_diff = couple(&tile.s, &mut out.s, 0);
    out.t_diff = couple(&tile.t, &mut out.t, 0xFF);
    out
}
