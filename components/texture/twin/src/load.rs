//! Texture loads from RDRAM into TMEM.
//!
//! A load is rasterised like a primitive: the load command is turned into
//! edge coefficients, walked into the span table, and each span is then
//! streamed 64 bits at a time through the TMEM write port.

use log::{trace, warn};
use rdp_bits::{pixels_to_bytes, sign};
use rdp_memory::{Rdram, Tmem};
use rdp_registers::{ImageFormat, TexelSize};
use rdp_tex_coord::pipeline_load;
use rdp_twin_core::{PipelineState, Tile};

/// Which load command started the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Block,
    Tile,
    Tlut,
}

/// Decoded load command. Coordinates are 10.2 fixed point; for
/// `LoadKind::Block` the `th` field carries `dxt` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    pub kind: LoadKind,
    pub tile: usize,
    pub sl: i32,
    pub tl: i32,
    pub sh: i32,
    pub th: i32,
}

/// Edge coefficients of the synthetic load primitive.
#[derive(Debug, Clone, Copy, Default)]
struct LoadEdges {
    yl: i32,
    ym: i32,
    yh: i32,
    xl: i32,
    xm: i32,
    xh: i32,
    s: i32,
    t: i32,
    dsdx: i32,
    dtdx: i32,
    dtde: i32,
}

/// How 64-bit words are laid out once they reach TMEM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TmemLayout {
    /// Chroma in the low half, luma in the high half.
    Yuv,
    /// Red/green in the low half, blue/alpha in the high half.
    Rgba32,
    Direct,
}

/// TMEM halfword addresses for one 64-bit write, sorted by bank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TmemIndex {
    idx: [usize; 4],
    bit3_flip: bool,
    hi_bit: bool,
}

/// Run a texture load to completion.
pub fn load(state: &mut PipelineState, rdram: &Rdram, tmem: &mut Tmem, req: LoadRequest) {
    let tile_idx = req.tile & 7;
    {
        let tile = &mut state.tiles[tile_idx];
        tile.s.low = req.sl;
        tile.s.high = req.sh;
        tile.t.low = req.tl;
        tile.t.high = req.th;
        tile.compute_clamp_diffs();
    }

    let size = state.texture_image.size.bits() as u32;
    let mut edges = LoadEdges {
        dtde: 0x20 << 16,
        ..LoadEdges::default()
    };

    match req.kind {
        LoadKind::Block => {
            let tlc = req.tl & 0x3FF;
            edges.yl = (tlc << 2) | 3;
            edges.ym = edges.yl;
            edges.yh = tlc << 2;
            edges.xl = sign(req.sh << 16, 28);
            edges.xm = edges.xl;
            edges.xh = sign(req.sl << 16, 28);
            edges.s = req.sl << 19;
            edges.t = req.tl << 19;
            edges.dsdx = (0x80 >> size) << 16;
            let dxt = req.th;
            edges.dtdx = ((dxt >> 8) << 16) | ((dxt & 0xFF) << 8);
        }
        LoadKind::Tile | LoadKind::Tlut => {
            let column = |c: i32| sign(((c >> 2) << 16) | ((c & 3) << 14), 28);
            edges.yl = sign(req.th | 3, 14);
            edges.ym = edges.yl;
            edges.yh = sign(req.tl, 14);
            edges.xl = column(req.sh);
            edges.xm = edges.xl;
            edges.xh = column(req.sl);
            edges.s = req.sl << 19;
            edges.t = req.tl << 19;
            edges.dsdx = (0x200 >> size) << 16;
        }
    }

    trace!(
        "{:?} tile {} s {:#x}..{:#x} t {:#x}..{:#x}",
        req.kind,
        tile_idx,
        req.sl,
        req.sh,
        req.tl,
        req.th
    );

    let quad = req.kind != LoadKind::Tile;
    walk(state, &edges);
    stream(
        state,
        rdram,
        tmem,
        edges.yh >> 2,
        edges.yl >> 2,
        tile_idx,
        quad,
        req.kind == LoadKind::Tlut,
    );
}

/// Fill the span table for a load. Only the left/right extent, the start
/// column and the S/T origin of each line are needed.
fn walk(state: &mut PipelineState, e: &LoadEdges) {
    state.max_level = 0;
    state.deltas.ds = e.dsdx & !0x1F;
    state.deltas.dt = e.dtdx & !0x1F;
    state.deltas.dw = 0;

    let xright = e.xh & !1;
    let mut xleft = e.xm & !1;
    let xend = xright >> 16;
    let mut t = e.t;
    let mut maxxmx = 0;
    let mut minxhx = 0;

    for k in (e.yh & !3)..=(e.yl | 3) {
        if k == e.ym {
            xleft = e.xl & !1;
        }
        let spix = k & 3;

        if k & !0xFFF == 0 {
            let valid_y = k >= e.yh && k < e.yl;
            if spix == 0 {
                maxxmx = 0;
                minxhx = 0xFFF;
            }

            let xrsc = (xright >> 13) & 0x7FFE;
            let xlsc = (xleft >> 13) & 0x7FFE;
            if valid_y {
                maxxmx = maxxmx.max((xlsc >> 3) & 0xFFF);
                minxhx = minxhx.min((xrsc >> 3) & 0xFFF);
            }

            if let Some(span) = state.spans.get_mut(k >> 2) {
                if spix == 0 {
                    span.unscrx = xend;
                    span.s = e.s & !0x3FF;
                    span.t = t & !0x3FF;
                }
                if spix == 3 {
                    span.lx = maxxmx;
                    span.rx = minxhx;
                }
            }
        }

        if spix == 3 {
            t = t.wrapping_add(e.dtde);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn stream(
    state: &mut PipelineState,
    rdram: &Rdram,
    tmem: &mut Tmem,
    start: i32,
    end: i32,
    tile_idx: usize,
    quad: bool,
    tlut: bool,
) {
    if end > start && tlut {
        warn!("Load_TLUT spanning {} lines crashes the pipeline", end - start + 1);
        state.pipeline_crashed = true;
        return;
    }

    let image = state.texture_image;
    let (ti_advance, span_advance) = match image.size {
        TexelSize::Bits4 => {
            warn!("texture load from a 4-bit image crashes the pipeline");
            state.pipeline_crashed = true;
            return;
        }
        TexelSize::Bits8 => (8, 8),
        TexelSize::Bits16 if tlut => (2, 1),
        TexelSize::Bits16 => (8, 4),
        TexelSize::Bits32 => (8, 2),
    };

    let tile = state.tiles[tile_idx];
    let layout = match (tile.format, tile.size) {
        (ImageFormat::Yuv, _) => TmemLayout::Yuv,
        (ImageFormat::Rgba, TexelSize::Bits32) => TmemLayout::Rgba32,
        _ => TmemLayout::Direct,
    };
    let size = image.size.bits() as u32;
    let (ds, dt) = (state.deltas.ds, state.deltas.dt);

    for i in start..=end {
        let Some(span) = state.spans.get(i) else {
            continue;
        };
        let xstart = span.unscrx;
        let length = (span.lx - xstart + 1) & 0xFFF;
        let (mut s, mut t) = (span.s, span.t);
        let mut tiptr = (image.address as i32)
            .wrapping_add(pixels_to_bytes(image.width.wrapping_mul(i) + xstart, size));

        let mut j = 0;
        while j < length {
            let (sss, sst) = pipeline_load(&tile, (s >> 16) & 0xFFFF, (t >> 16) & 0xFFFF, quad);
            let dswap = sst & 1 != 0;
            let index = tmem_index(&tile, sss, sst);

            let base = ((tiptr >> 2) & !1) as u32;
            let words = [0, 1, 2, 3].map(|n| rdram.read_idx32(base.wrapping_add(n)));
            let qword = load_qword(tiptr, tlut, words);

            write_qword(tmem, layout, &index, dswap, qword);

            s = s.wrapping_add(ds) & !0x1F;
            t = t.wrapping_add(dt) & !0x1F;
            tiptr = tiptr.wrapping_add(ti_advance);
            j += span_advance;
        }
    }
}

fn tmem_index(tile: &Tile, s: i32, t: i32) -> TmemIndex {
    let tbase = ((tile.line * t) & 0x1FF) + tile.tmem;

    let sshorts = if tile.size == TexelSize::Bits8 || tile.format == ImageFormat::Yuv {
        s >> 1
    } else if tile.size == TexelSize::Bits4 {
        s >> 2
    } else {
        s
    } & 0x7FF;

    let odd = t & 1 != 0;
    let a = ((tbase << 2) + sshorts) & 0x7FD;
    let hi_bit = a & 0x400 != 0;
    let mut lanes = [a, (a + 1) & 0x7FF, (a + 2) & 0x7FF, (a + 3) & 0x7FF];
    if odd {
        for lane in &mut lanes {
            *lane ^= 2;
        }
    }

    let mut idx = [0; 4];
    for (bank, slot) in idx.iter_mut().enumerate() {
        *slot = lanes
            .iter()
            .find(|&&l| (l & 3) as usize == bank)
            .map_or(0, |&l| (l & 0x3FF) as usize);
    }

    TmemIndex {
        idx,
        bit3_flip: (sshorts & 2 != 0) ^ odd,
        hi_bit,
    }
}

/// Assemble the 64 bits starting at byte `tiptr & 7` of the four words
/// read. Palette loads repeat one 16-bit entry four times.
fn load_qword(tiptr: i32, tlut: bool, w: [u32; 4]) -> u64 {
    let [w0, w1, w2, w3] = w.map(u64::from);
    let repeat = |h: u64| {
        let h = h & 0xFFFF;
        (h << 48) | (h << 32) | (h << 16) | h
    };

    match tiptr & 7 {
        0 if tlut => repeat(w0 >> 16),
        0 => (w0 << 32) | w1,
        1 => (w0 << 40) | (w1 << 8) | (w2 >> 24),
        2 if tlut => repeat(w0),
        2 => (w0 << 48) | (w1 << 16) | (w2 >> 16),
        3 => (w0 << 56) | (w1 << 24) | (w2 >> 8),
        4 if tlut => repeat(w1 >> 16),
        4 => (w1 << 32) | w2,
        5 => (w1 << 40) | (w2 << 8) | (w3 >> 24),
        6 if tlut => repeat(w1),
        6 => (w1 << 48) | (w2 << 16) | (w3 >> 16),
        _ => (w1 << 56) | (w2 << 24) | (w3 >> 8),
    }
}

fn write_qword(tmem: &mut Tmem, layout: TmemLayout, index: &TmemIndex, dswap: bool, q: u64) {
    let [i0, i1, i2, i3] = index.idx;
    let byte = |shift: u32| (q >> shift) & 0xFF;
    let half = |shift: u32| ((q >> shift) & 0xFFFF) as u16;

    match layout {
        TmemLayout::Yuv | TmemLayout::Rgba32 => {
            let (lo, hi) = if layout == TmemLayout::Yuv {
                (
                    (byte(56) << 24) | (byte(40) << 16) | (byte(24) << 8) | byte(8),
                    (byte(48) << 24) | (byte(32) << 16) | (byte(16) << 8) | byte(0),
                )
            } else {
                (
                    ((q >> 48) << 16) | ((q >> 16) & 0xFFFF),
                    (((q >> 32) & 0xFFFF) << 16) | (q & 0xFFFF),
                )
            };
            let (a, b) = if index.bit3_flip { (i2, i3) } else { (i0, i1) };
            tmem.write16_idx(a, (lo >> 16) as u16);
            tmem.write16_idx(b, lo as u16);
            tmem.write16_idx(a | 0x400, (hi >> 16) as u16);
            tmem.write16_idx(b | 0x400, hi as u16);
        }
        TmemLayout::Direct => {
            let hi = if index.hi_bit { 0x400 } else { 0 };
            let shifts = if dswap { [16, 0, 48, 32] } else { [48, 32, 16, 0] };
            for (i, shift) in [i0, i1, i2, i3].into_iter().zip(shifts) {
                tmem.write16_idx(i | hi, half(shift));
            }
        }
    }
}
