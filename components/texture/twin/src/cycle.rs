use rdp_bits::{sign, tile_relative};
use rdp_lod::{SpanSigs, TexCoord};
use rdp_memory::Tmem;
use rdp_registers::ImageFormat;
use rdp_tex_coord::{clamp_cycle, divide, mask_coupled, shift_cycle};
use rdp_twin_core::{Color, PipelineState, Tile};

use crate::fetch::{fetch_row, fetch_texel, index_row, row_base, tlut_entry};

/// Filter weights for one channel pair.
#[derive(Debug, Clone, Copy)]
struct Weights {
    frac_s: i32,
    frac_t: i32,
    upper: bool,
    center: bool,
}

/// The four texels of a filter quad: top left, top right, bottom left,
/// bottom right.
type Quad = [Color; 4];

fn channel(c: Color, i: usize) -> i32 {
    match i {
        0 => c.r,
        1 => c.g,
        2 => c.b,
        _ => c.a,
    }
}

fn gather(
    state: &PipelineState,
    tmem: &Tmem,
    tile: &Tile,
    s: i32,
    s_diff: i32,
    t: i32,
    t_diff: i32,
) -> Quad {
    let tlut = state.other_modes.en_tlut();
    let ia = state.other_modes.tlut_type();
    let texel = |tbase: i32, s: i32, t: i32| {
        if tlut {
            tlut_entry(tmem, index_row(tmem, tile, tbase, s, t), ia)
        } else {
            fetch_row(tmem, tile, tbase, s, t)
        }
    };

    if !state.other_modes.sample_type() {
        return [texel(row_base(tile, t), s, t); 4];
    }

    let t1 = (t & 0xFF) + t_diff;
    let s1 = s + s_diff;
    let top = row_base(tile, t);
    let bottom = tile.line * t1 + tile.tmem;
    [
        texel(top, s, t),
        texel(top, s1, t),
        texel(bottom, s, t1),
        texel(bottom, s1, t1),
    ]
}

fn bilerp(q: &Quad, i: usize, w: Weights) -> i32 {
    let [t0, t1, t2, t3] = q.map(|c| channel(c, i));
    if w.center {
        t3 + ((((t1 + t2) << 6) - (t3 << 7) + ((!t3 + t0) << 6) + 0xC0) >> 8)
    } else if w.upper {
        t3 + (((0x20 - w.frac_s) * (t2 - t3) + (0x20 - w.frac_t) * (t1 - t3) + 0x10) >> 5)
    } else {
        t0 + ((w.frac_s * (t1 - t0) + w.frac_t * (t2 - t0) + 0x10) >> 5)
    }
}

/// Second-cycle filter reusing the first cycle's output as weights.
fn bilerp_convert(q: &Quad, i: usize, w: Weights, prev: Color) -> i32 {
    let [t0, t1, t2, t3] = q.map(|c| channel(c, i));
    let (pr, pg, pb) = (sign(prev.r, 9), sign(prev.g, 9), sign(prev.b, 9));
    if w.center {
        pb + ((pr * (t2 - t3) + pg * (t1 - t3) + ((!t3 + t0) << 6) + 0xC0) >> 8)
    } else if w.upper {
        pb + ((pr * (t2 - t3) + pg * (t1 - t3) + 0x80) >> 8)
    } else {
        pb + ((pr * (t1 - t0) + pg * (t2 - t0) + 0x80) >> 8)
    }
}

/// Colour space conversion with K0..K3: `y` supplies luma, `uv`
/// supplies chroma in its red and green channels.
fn convert(state: &PipelineState, y: i32, uv: Color) -> Color {
    Color::new(
        y + ((state.k0 * uv.g + 0x80) >> 8),
        y + ((state.k1 * uv.r + state.k2 * uv.g + 0x80) >> 8),
        y + ((state.k3 * uv.r + 0x80) >> 8),
        y,
    )
}

fn sign9(c: Color) -> Color {
    Color::new(sign(c.r, 9), sign(c.g, 9), sign(c.b, 9), c.a)
}

fn wrap9(c: Color) -> Color {
    Color::new(c.r & 0x1FF, c.g & 0x1FF, c.b & 0x1FF, c.a & 0x1FF)
}

/// One texture cycle: address, fetch and filter a texel of `tile_idx` at
/// S.10.5 coordinates `(sss, sst)`.
///
/// `prev` is the first cycle's texel, used by the second cycle when
/// `convert_one` turns the filter into a YUV conversion stage.
#[must_use]
pub fn pipeline_cycle(
    state: &PipelineState,
    tmem: &Tmem,
    prev: Color,
    sss: i32,
    sst: i32,
    tile_idx: usize,
    cycle: u32,
) -> Color {
    let modes = &state.other_modes;
    let tile = &state.tiles[tile_idx & 7];
    let bilinear = if cycle != 0 {
        modes.bi_lerp_1()
    } else {
        modes.bi_lerp_0()
    };
    let second_convert = modes.convert_one() && cycle != 0;

    let shifted = shift_cycle(tile, sss, sst);
    let s = tile_relative(shifted.s, tile.s.low);
    let t = tile_relative(shifted.t, tile.t.low);

    if !(modes.sample_type() || modes.en_tlut()) {
        let clamped = clamp_cycle(tile, s, t, 0, 0, shifted.max_s, shifted.max_t);
        let (s, t) = tile.mask(clamped.s, clamped.t);

        if bilinear {
            if second_convert {
                return Color::splat(prev.b);
            }
            let t0 = fetch_texel(tmem, tile, s, t);
            return Color::new(t0.r & 0x1FF, t0.g & 0x1FF, t0.b, t0.a);
        }

        let t0 = if second_convert {
            sign9(prev)
        } else {
            fetch_texel(tmem, tile, s, t)
        };
        return wrap9(convert(state, t0.b, t0));
    }

    let clamped = clamp_cycle(tile, s, t, s & 0x1F, t & 0x1F, shifted.max_s, shifted.max_t);
    let mut coupled = mask_coupled(tile, clamped.s, clamped.t);
    let (frac_s, frac_t) = (clamped.frac_s, clamped.frac_t);
    let upper = (frac_s + frac_t) & 0x20 != 0;

    let (frac_s_rg, upper_rg) = if tile.format == ImageFormat::Yuv {
        if tile.s.mask == 0 {
            coupled.s_diff = 0;
        }
        if tile.t.mask == 0 {
            coupled.t_diff = 0;
        }
        let frac = (frac_s >> 1) | ((coupled.s & 1) << 4);
        (frac, (frac + frac_t) & 0x20 != 0)
    } else {
        (frac_s, upper)
    };

    let (center, center_rg) = if modes.mid_texel() {
        (
            frac_s == 0x10 && frac_t == 0x10,
            frac_s_rg == 0x10 && frac_t == 0x10,
        )
    } else {
        (false, false)
    };
    let rg = Weights {
        frac_s: frac_s_rg,
        frac_t,
        upper: upper_rg,
        center: center_rg,
    };
    let ba = Weights {
        frac_s,
        frac_t,
        upper,
        center,
    };

    let fetch = || {
        gather(
            state,
            tmem,
            tile,
            coupled.s,
            coupled.s_diff,
            coupled.t,
            coupled.t_diff,
        )
    };

    if bilinear {
        let q = fetch();
        let out = if second_convert {
            Color::new(
                bilerp_convert(&q, 0, rg, prev),
                bilerp_convert(&q, 1, rg, prev),
                bilerp_convert(&q, 2, ba, prev),
                bilerp_convert(&q, 3, ba, prev),
            )
        } else {
            Color::new(
                bilerp(&q, 0, rg),
                bilerp(&q, 1, rg),
                bilerp(&q, 2, ba),
                bilerp(&q, 3, ba),
            )
        };
        return wrap9(out);
    }

    let [t0, _, _, t3] = if second_convert {
        let p = sign9(prev);
        [p, p, p, p]
    } else {
        fetch()
    };
    let y = if upper { t3.b } else { t0.b };
    let uv = if upper_rg { t3 } else { t0 };
    wrap9(convert(state, y, uv))
}

/// Divided S/T of the pixel after `coord`, for the one cycle pipeline's
/// texel 1. At the end of a long span the next line's start is used.
#[must_use]
pub fn texel1_coord_1cycle(
    state: &PipelineState,
    coord: TexCoord,
    inc: TexCoord,
    scanline: i32,
    sigs: &SpanSigs,
) -> (i32, i32) {
    let next = match state.spans.get(scanline + 1) {
        Some(below) if sigs.end_span && sigs.long_span && below.valid_line => {
            TexCoord::from_span(below)
        }
        _ => coord + inc,
    };
    divide(state, next.s >> 16, next.t >> 16, next.w >> 16)
}
