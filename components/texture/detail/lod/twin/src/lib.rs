//! Level of detail stage.
//!
//! Measures how far the texture coordinates move between neighbouring
//! pixels, turns the larger step into a 15-bit level and from that picks
//! the mip tile(s) to sample and the fraction to blend between them.
//!
//! The two cycle pipeline samples the current pixel against its right
//! and lower neighbours. The one cycle pipeline cannot look at the
//! current pixel again once it is in flight, so it measures between the
//! next two pixels along the span and uses [`SpanSigs`] to fall back to
//! the following scanline at the end of a line.

mod coord;

use rdp_bits::sign;
use rdp_tex_coord::divide;
use rdp_twin_core::PipelineState;

pub use coord::{SpanSigs, TexCoord};

/// Bits of a divided coordinate reporting under- or overflow.
const OUT_OF_RANGE: i32 = 0x60000;

const LOG2: [i32; 256] = {
    let mut table = [0; 256];
    let mut i = 2;
    while i < 256 {
        let mut k = 7;
        while k > 0 {
            if (i >> k) & 1 != 0 {
                table[i] = k as i32;
                break;
            }
            k -= 1;
        }
        i += 1;
    }
    table
};

/// Outcome of classifying a level against the min/max levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LodSignals {
    /// Mip index relative to the primitive tile.
    pub tile: i32,
    /// Level is below the first mip.
    pub magnify: bool,
    /// Level is at or past the last mip.
    pub distant: bool,
    pub fraction: i32,
}

/// Tiles and blend fraction chosen for a pixel.
///
/// The pass functions only overwrite what the current modes let them
/// select, so callers keep one of these alive across a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LodSelect {
    pub tile1: i32,
    pub tile2: i32,
    pub fraction: i32,
}

impl LodSelect {
    /// Start of a primitive: both tiles on `prim_tile` and its successor.
    #[must_use]
    pub const fn new(prim_tile: i32) -> Self {
        Self {
            tile1: prim_tile,
            tile2: (prim_tile + 1) & 7,
            fraction: 0,
        }
    }
}

/// Larger of the S and T steps between two divided coordinates, or
/// `previous` when that is larger still.
///
/// Coordinates are 17-bit signed. The result keeps 15 bits with bit 14
/// set on overflow.
#[must_use]
pub fn convert_4x17_to_15(s: i32, next_s: i32, t: i32, next_t: i32, previous: i32) -> i32 {
    let step = |c: i32, n: i32| {
        let d = sign(n, 17) - sign(c, 17);
        if d & 0x20000 != 0 {
            !d & 0x1FFFF
        } else {
            d
        }
    };

    let d = step(s, next_s).max(step(t, next_t)).max(previous);
    let mut level = d & 0x7FFF;
    if d & 0x1C000 != 0 {
        level |= 0x4000;
    }
    level
}

/// Saturate one divided coordinate into 16 bits.
///
/// Overflow goes to `0x7FFF`, underflow to `0x8000`.
#[must_use]
pub const fn clamp_coord(c: i32) -> i32 {
    if c & 0x40000 != 0 {
        0x7FFF
    } else if c & 0x20000 != 0 {
        0x8000
    } else {
        match c & 0x18000 {
            0x8000 => 0x7FFF,
            0x10000 => 0x8000,
            _ => c & 0xFFFF,
        }
    }
}

#[must_use]
pub const fn clamp(s: i32, t: i32) -> (i32, i32) {
    (clamp_coord(s), clamp_coord(t))
}

/// Classify `level` against the state's min and max levels.
#[must_use]
pub fn signals(state: &PipelineState, clamped: bool, level: i32) -> LodSignals {
    let sharpen = state.other_modes.sharpen_tex_en();
    let detail = state.other_modes.detail_tex_en();

    if level & 0x4000 != 0 || clamped {
        return LodSignals {
            tile: 0,
            magnify: false,
            distant: true,
            fraction: 0xFF,
        };
    }

    if level < state.min_level || level < 32 {
        let distant = state.max_level == 0;
        let fraction = if !sharpen && !detail {
            if distant {
                0xFF
            } else {
                0
            }
        } else {
            let base = if level < state.min_level { state.min_level } else { level };
            (base << 3) | if sharpen { 0x100 } else { 0 }
        };
        return LodSignals {
            tile: 0,
            magnify: true,
            distant,
            fraction,
        };
    }

    let tile = LOG2[((level >> 5) & 0xFF) as usize];
    let distant = state.max_level == 0 || level & 0x6000 != 0 || tile >= state.max_level;
    let fraction = if !sharpen && !detail && distant {
        0xFF
    } else {
        ((level << 3) >> tile) & 0xFF
    };
    LodSignals {
        tile,
        magnify: false,
        distant,
        fraction,
    }
}

fn divided(state: &PipelineState, c: TexCoord) -> (i32, i32) {
    divide(state, c.s >> 16, c.t >> 16, c.w >> 16)
}

fn out_of_range(coords: &[i32]) -> bool {
    coords.iter().any(|c| c & OUT_OF_RANGE != 0)
}

fn mip(state: &PipelineState, sig: &LodSignals) -> i32 {
    if sig.distant {
        state.max_level
    } else {
        sig.tile
    }
}

/// First tile: detail texturing shifts minified pixels one tile down so
/// the detail texture occupies the primitive tile.
fn primary_tile(state: &PipelineState, prim_tile: i32, mip: i32, magnify: bool) -> i32 {
    if state.other_modes.detail_tex_en() && !magnify {
        (prim_tile + mip + 1) & 7
    } else {
        (prim_tile + mip) & 7
    }
}

/// Level between `next` and `far`, both divided. Zero when either is
/// out of range.
fn level_between(next: (i32, i32), far: (i32, i32)) -> (bool, i32) {
    let clamped = out_of_range(&[far.1, next.1, far.0, next.0]);
    let level = if clamped {
        0
    } else {
        convert_4x17_to_15(next.0, far.0, next.1, far.1, 0)
    };
    (clamped, level)
}

fn line_below(state: &PipelineState, scanline: i32) -> TexCoord {
    state
        .spans
        .get(scanline + 1)
        .map(TexCoord::from_span)
        .unwrap_or_default()
}

fn dy(state: &PipelineState) -> TexCoord {
    TexCoord::new(state.deltas.dsdy, state.deltas.dtdy, state.deltas.dwdy)
}

/// Level from the current pixel against its right and lower neighbours.
fn two_cycle_level(state: &PipelineState, init: (i32, i32), coord: TexCoord, inc: TexCoord) -> (bool, i32) {
    let next = divided(state, coord + inc);
    let next_y = divided(state, coord + dy(state));

    let clamped = out_of_range(&[init.1, next.1, init.0, next.0, next_y.0, next_y.1]);
    if clamped {
        return (true, 0);
    }
    let level = convert_4x17_to_15(init.0, next.0, init.1, next.1, 0);
    (false, convert_4x17_to_15(init.0, next_y.0, init.1, next_y.1, level))
}

// ============================================================================
// Two cycle
// ============================================================================

/// Two cycle LOD for the current pixel, selecting both texel tiles.
///
/// `sss`/`sst` are the divided coordinates of the pixel and come back
/// clamped.
pub fn pass(
    state: &PipelineState,
    sss: &mut i32,
    sst: &mut i32,
    coord: TexCoord,
    inc: TexCoord,
    prim_tile: i32,
    sel: &mut LodSelect,
) {
    let init = (*sss, *sst);
    (*sss, *sst) = clamp(*sss, *sst);

    if !state.flags.use_lod {
        return;
    }

    let (clamped, level) = two_cycle_level(state, init, coord, inc);
    let sig = signals(state, clamped, level);
    sel.fraction = sig.fraction;

    if !state.other_modes.tex_lod_en() {
        return;
    }

    let mip = mip(state, &sig);
    sel.tile1 = primary_tile(state, prim_tile, mip, sig.magnify);
    sel.tile2 = if state.other_modes.detail_tex_en() {
        if !sig.distant && !sig.magnify {
            (prim_tile + mip + 2) & 7
        } else {
            (prim_tile + mip + 1) & 7
        }
    } else if !sig.distant || (!state.other_modes.sharpen_tex_en() && sig.magnify) {
        (sel.tile1 + 1) & 7
    } else {
        sel.tile1
    };
}

/// Two cycle LOD for the last pixel of a span, measured on the first
/// pixel of the following scanline.
///
/// `sss2`/`sst2` are the divided coordinates at the start of that line.
#[allow(clippy::too_many_arguments)]
pub fn pass_with_next(
    state: &PipelineState,
    sss: &mut i32,
    sst: &mut i32,
    sss2: &mut i32,
    sst2: &mut i32,
    inc: TexCoord,
    prim_tile: i32,
    scanline: i32,
    sel: &mut LodSelect,
) {
    let init = (*sss2, *sst2);
    (*sss, *sst) = clamp(*sss, *sst);
    (*sss2, *sst2) = clamp(*sss2, *sst2);

    if !state.flags.use_lod {
        return;
    }

    let below = line_below(state, scanline);
    let next_y = divided(state, below + dy(state));

    let mut clamped = out_of_range(&[init.0, init.1, next_y.0, next_y.1]);
    let mut level = if clamped {
        0
    } else {
        convert_4x17_to_15(init.0, next_y.0, init.1, next_y.1, 0)
    };

    let sig = signals(state, clamped, level);
    sel.fraction = sig.fraction;

    if !state.other_modes.tex_lod_en() {
        return;
    }
    sel.tile1 = primary_tile(state, prim_tile, mip(state, &sig), sig.magnify);

    let next = divided(state, below + inc);
    clamped = clamped || out_of_range(&[next.1, next.0]);
    if !clamped {
        level = convert_4x17_to_15(init.0, next.0, init.1, next.1, level);
    }

    let sig = signals(state, clamped, level);
    sel.tile2 = primary_tile(state, prim_tile, mip(state, &sig), sig.magnify);
}

/// Two cycle LOD when only texel 0 is sampled. Updates `tile1` and the
/// fraction.
pub fn pass_no_texel1(
    state: &PipelineState,
    sss: &mut i32,
    sst: &mut i32,
    coord: TexCoord,
    inc: TexCoord,
    prim_tile: i32,
    sel: &mut LodSelect,
) {
    let init = (*sss, *sst);
    (*sss, *sst) = clamp(*sss, *sst);

    if !state.flags.use_lod {
        return;
    }

    let (clamped, level) = two_cycle_level(state, init, coord, inc);
    let sig = signals(state, clamped, level);
    sel.fraction = sig.fraction;

    if state.other_modes.tex_lod_en() {
        sel.tile1 = primary_tile(state, prim_tile, mip(state, &sig), sig.magnify);
    }
}

// ============================================================================
// One cycle
// ============================================================================

/// Next and far coordinates for the pixel being sampled in the one
/// cycle pipeline.
fn lookahead_current(
    state: &PipelineState,
    coord: TexCoord,
    inc: TexCoord,
    scanline: i32,
    sigs: &SpanSigs,
) -> (TexCoord, TexCoord) {
    if !state.spans.is_valid(scanline + 1) {
        return (coord + inc, coord.skip(inc));
    }

    if sigs.end_span && sigs.long_span {
        let below = line_below(state, scanline);
        return (below, below + inc);
    }

    let far = if !(sigs.pre_end_span && sigs.long_span) && !(sigs.end_span && sigs.mid_span) {
        coord.skip(inc)
    } else {
        coord.back(inc)
    };
    (coord + inc, far)
}

/// Next and far coordinates for the pixel after the one being sampled.
fn lookahead_next(
    state: &PipelineState,
    coord: TexCoord,
    inc: TexCoord,
    scanline: i32,
    sigs: &SpanSigs,
) -> (TexCoord, TexCoord) {
    if !state.spans.is_valid(scanline + 1) || !sigs.next_span {
        return lookahead_current(state, coord, inc, scanline, sigs);
    }

    let below = line_below(state, scanline);
    if sigs.long_span {
        (below + inc, below.skip(inc))
    } else if sigs.mid_span {
        (below, below + inc)
    } else if sigs.one_less_than_mid {
        (below + inc, below.back(inc))
    } else {
        (coord + inc, coord.skip(inc))
    }
}

/// One cycle LOD for the current pixel when texel 1 is also sampled.
///
/// `next` is the already divided coordinate of the following pixel,
/// computed by the texel 1 lookahead.
#[allow(clippy::too_many_arguments)]
pub fn pass_current_1cycle(
    state: &PipelineState,
    sss: &mut i32,
    sst: &mut i32,
    next: (i32, i32),
    coord: TexCoord,
    inc: TexCoord,
    scanline: i32,
    prim_tile: i32,
    sigs: &SpanSigs,
    sel: &mut LodSelect,
) {
    (*sss, *sst) = clamp(*sss, *sst);

    if !state.flags.use_lod {
        return;
    }

    let (_, far) = lookahead_current(state, coord, inc, scanline, sigs);
    let (clamped, level) = level_between(next, divided(state, far));
    let sig = signals(state, clamped, level);
    sel.fraction = sig.fraction;

    if state.other_modes.tex_lod_en() {
        sel.tile1 = primary_tile(state, prim_tile, mip(state, &sig), sig.magnify);
    }
}

/// One cycle LOD for the current pixel when only texel 0 is sampled.
#[allow(clippy::too_many_arguments)]
pub fn pass_current_1cycle_simple(
    state: &PipelineState,
    sss: &mut i32,
    sst: &mut i32,
    coord: TexCoord,
    inc: TexCoord,
    scanline: i32,
    prim_tile: i32,
    sigs: &SpanSigs,
    sel: &mut LodSelect,
) {
    (*sss, *sst) = clamp(*sss, *sst);

    if !state.flags.use_lod {
        return;
    }

    let (next, far) = lookahead_current(state, coord, inc, scanline, sigs);
    let (clamped, level) = level_between(divided(state, next), divided(state, far));
    let sig = signals(state, clamped, level);
    sel.fraction = sig.fraction;

    if state.other_modes.tex_lod_en() {
        sel.tile1 = primary_tile(state, prim_tile, mip(state, &sig), sig.magnify);
    }
}

/// One cycle LOD for the pixel after the current one, whose texel is
/// fetched a cycle early. The fraction is held back in `sel` until that
/// pixel is combined.
#[allow(clippy::too_many_arguments)]
pub fn pass_with_next_1cycle(
    state: &PipelineState,
    sss: &mut i32,
    sst: &mut i32,
    coord: TexCoord,
    inc: TexCoord,
    scanline: i32,
    prim_tile: i32,
    sigs: &SpanSigs,
    sel: &mut LodSelect,
) {
    (*sss, *sst) = clamp(*sss, *sst);

    if !state.flags.use_lod {
        return;
    }

    let (next, far) = lookahead_next(state, coord, inc, scanline, sigs);
    let (clamped, level) = level_between(divided(state, next), divided(state, far));
    let sig = signals(state, clamped, level);
    sel.fraction = sig.fraction;

    if state.other_modes.tex_lod_en() {
        sel.tile1 = primary_tile(state, prim_tile, mip(state, &sig), sig.magnify);
    }
}

// ============================================================================
// Copy
// ============================================================================

/// Tile selection for texture rectangles in copy mode. No fraction is
/// produced.
pub fn copy(
    state: &PipelineState,
    sss: &mut i32,
    sst: &mut i32,
    coord: TexCoord,
    inc: TexCoord,
    prim_tile: i32,
    tile1: &mut i32,
) {
    (*sss, *sst) = clamp(*sss, *sst);

    if !state.other_modes.tex_lod_en() {
        return;
    }

    let next = divided(state, coord + inc);
    let far = divided(state, coord.skip(inc));
    let (clamped, level) = level_between(next, far);

    let (mip, magnify) = if level & 0x4000 != 0 || clamped {
        (state.max_level, false)
    } else if level < 32 {
        (0, true)
    } else {
        let tile = LOG2[((level >> 5) & 0xFF) as usize];
        let distant = state.max_level == 0 || level & 0x6000 != 0 || tile >= state.max_level;
        (if distant { state.max_level } else { tile }, false)
    };

    *tile1 = primary_tile(state, prim_tile, mip, magnify);
}
