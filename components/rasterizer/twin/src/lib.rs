//! Edge walker.
//!
//! A triangle arrives as three edges: the major edge H running from the
//! top vertex to the bottom one, and the minor edges M (top half) and L
//! (bottom half). The walker steps all of them down the screen a quarter
//! scanline at a time, scissors every sub-scanline and records, per
//! scanline, the sub-scanline edge positions, the span bounds and the
//! attribute values at the major edge. The span renderers and the
//! coverage stage take it from there.
//!
//! `flip` is the command's right-major bit. When set, spans start at the
//! H edge and run toward increasing x; otherwise they run from the H
//! edge toward decreasing x.

mod attr;

pub use attr::{rgba_correct, z_correct};

use log::trace;
use rdp_bits::sign;
use rdp_commands::Triangle;
use rdp_registers::CycleType;
use rdp_twin_core::{PipelineState, Scissor, Span, SpanDeltas};
use rdp_zbuf::normalize_dzpix;

/// Attribute slots in [`Gradients`] arrays.
const R: usize = 0;
const G: usize = 1;
const B: usize = 2;
const A: usize = 3;
const S: usize = 4;
const T: usize = 5;
const W: usize = 6;
const Z: usize = 7;

/// Start values and gradients of every interpolated attribute, s15.16.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Gradients {
    start: [i32; 8],
    dx: [i32; 8],
    de: [i32; 8],
    dy: [i32; 8],
}

impl Gradients {
    fn from_triangle(tri: &Triangle<'_>) -> Self {
        let mut g = Self::default();
        if let Some(shade) = tri.shade() {
            g.start[R..=A].copy_from_slice(&shade.color());
            g.dx[R..=A].copy_from_slice(&shade.d_dx());
            g.de[R..=A].copy_from_slice(&shade.d_de());
            g.dy[R..=A].copy_from_slice(&shade.d_dy());
        }
        if let Some(tex) = tri.texture() {
            g.start[S..=W].copy_from_slice(&tex.coord());
            g.dx[S..=W].copy_from_slice(&tex.d_dx());
            g.de[S..=W].copy_from_slice(&tex.d_de());
            g.dy[S..=W].copy_from_slice(&tex.d_dy());
        }
        if let Some(depth) = tri.depth() {
            g.start[Z] = depth.z();
            g.dx[Z] = depth.dzdx();
            g.de[Z] = depth.dzde();
            g.dy[Z] = depth.dzdy();
        }
        g
    }
}

/// Magnitude of the integer half of a depth gradient.
fn dz_magnitude(v: i32) -> i32 {
    let hi = (v >> 16) & 0xFFFF;
    if hi & 0x8000 != 0 {
        !hi & 0x7FFF
    } else {
        hi
    }
}

/// Per-pixel steps and coverage correction slopes shared by every span.
fn span_deltas(g: &Gradients) -> SpanDeltas {
    let step = |i: usize| g.dx[i] & !0x1F;
    let colour_dy = |i: usize| sign(g.dy[i] >> 14, 13);
    let colour_cd = |i: usize| sign(step(i) >> 14, 13);
    let dz_sum = dz_magnitude(g.dy[Z]) + dz_magnitude(g.dx[Z]);

    SpanDeltas {
        ds: step(S),
        dt: step(T),
        dw: step(W),
        dr: step(R),
        dg: step(G),
        db: step(B),
        da: step(A),
        dz: g.dx[Z],
        dzpix: i32::from(normalize_dzpix(dz_sum & 0xFFFF)),

        drdy: colour_dy(R),
        dgdy: colour_dy(G),
        dbdy: colour_dy(B),
        dady: colour_dy(A),
        dzdy: sign(g.dy[Z] >> 10, 22),
        cdr: colour_cd(R),
        cdg: colour_cd(G),
        cdb: colour_cd(B),
        cda: colour_cd(A),
        cdz: sign(g.dx[Z] >> 10, 22),

        dsdy: g.dy[S] & !0x7FFF,
        dtdy: g.dy[T] & !0x7FFF,
        dwdy: g.dy[W] & !0x7FFF,
    }
}

/// One edge position scissored to the clip box.
#[derive(Debug, Clone, Copy)]
struct Clipped {
    /// 10.3 fixed point, before the 13-bit store mask.
    x: i32,
    under: bool,
    over: bool,
}

/// Scissor an edge x (s.16 with the pixel in bits 16 and up) against
/// `clip_xh..clip_xl`, both already in 10.3.
fn clip_edge(x: i32, clip_xh: i32, clip_xl: i32) -> Clipped {
    let sticky = i32::from((x >> 1) & 0x1FFF != 0);
    let sc = ((x >> 13) & 0x1FFE) | sticky;
    let under = x & 0x0800_0000 != 0 || (sc < clip_xh && x & 0x0400_0000 == 0);
    let sc = if under {
        clip_xh
    } else {
        ((x >> 13) & 0x3FFE) | sticky
    };
    let over = sc & 0x2000 != 0 || (sc & 0x1FFF) >= clip_xl;
    Clipped {
        x: if over { clip_xl } else { sc },
        under,
        over,
    }
}

/// Edge x compared for crossing: pixel bits with the sign flipped.
const fn cross_key(x: i32) -> i32 {
    (x ^ (1 << 27)) & (0x3FFF << 14)
}

/// Last sub-scanline to walk: the bottom vertex or the scissor, which
/// ever comes first.
fn bottom_limit(yl: i32, scissor: &Scissor) -> i32 {
    let inside = if yl & 0x2000 != 0 {
        true
    } else if yl & 0x1000 != 0 {
        false
    } else {
        (yl & 0xFFF) < scissor.yl
    };
    if inside {
        yl
    } else {
        scissor.yl
    }
}

/// First sub-scanline to walk: the top vertex or the scissor.
fn top_limit(yh: i32, scissor: &Scissor) -> i32 {
    let inside = if yh & 0x2000 != 0 {
        false
    } else if yh & 0x1000 != 0 {
        true
    } else {
        yh >= scissor.yh
    };
    if inside {
        yh
    } else {
        scissor.yh
    }
}

/// What the span renderers need after a walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Walk {
    /// Spans run left to right.
    pub flip: bool,
    /// Primitive tile.
    pub tile: i32,
    /// First and last scanline that may hold pixels.
    pub first_line: i32,
    pub last_line: i32,
}

impl Walk {
    /// Scanlines to render, top to bottom.
    pub fn lines(&self) -> core::ops::RangeInclusive<i32> {
        self.first_line..=self.last_line
    }
}

/// Corrections turning the edge-walked attributes into span start
/// values at the major edge.
struct AttrSetup {
    diff: [i32; 8],
    dxh: [i32; 8],
}

impl AttrSetup {
    fn new(g: &Gradients, offset: bool, copy: bool) -> Self {
        let mut diff = [0; 8];
        let mut dxh = [0; 8];
        for i in 0..8 {
            if offset {
                let deh = g.de[i] & !0x1FF;
                let dyh = g.dy[i] & !0x1FF;
                diff[i] = deh
                    .wrapping_sub(deh >> 2)
                    .wrapping_sub(dyh)
                    .wrapping_add(dyh >> 2);
            }
            if !copy {
                dxh[i] = (g.dx[i] >> 8) & !1;
            }
        }
        Self { diff, dxh }
    }

    /// `xfrac` is the sub-pixel x of the major edge.
    fn apply(&self, span: &mut Span, values: &[i32; 8], xfrac: i32) {
        let at = |i: usize| {
            (values[i] & !0x1FF)
                .wrapping_add(self.diff[i])
                .wrapping_sub(xfrac.wrapping_mul(self.dxh[i]))
                & !0x3FF
        };
        span.r = at(R);
        span.g = at(G);
        span.b = at(B);
        span.a = at(A);
        span.s = at(S);
        span.t = at(T);
        span.w = at(W);
        span.z = at(Z);
    }
}

/// Running span bounds of one scanline.
#[derive(Debug, Clone, Copy)]
struct LineBounds {
    minor: i32,
    major: i32,
    all_over: bool,
    all_under: bool,
    all_invalid: bool,
}

impl LineBounds {
    /// Bounds grow outward from an empty span: in flipped spans the
    /// minor edge is the larger x, otherwise the major edge is.
    fn new(flip: bool) -> Self {
        Self {
            minor: if flip { 0 } else { 0xFFF },
            major: if flip { 0xFFF } else { 0 },
            all_over: true,
            all_under: true,
            all_invalid: true,
        }
    }

    fn include(&mut self, flip: bool, minor: i32, major: i32) {
        let (minor, major) = ((minor >> 3) & 0xFFF, (major >> 3) & 0xFFF);
        if flip {
            self.minor = self.minor.max(minor);
            self.major = self.major.min(major);
        } else {
            self.minor = self.minor.min(minor);
            self.major = self.major.max(major);
        }
    }
}

/// Walk the edges of `tri`, filling the span table and the span
/// deltas.
///
/// The derived mode flags must be current. The span table is cleared
/// first, so nothing from the previous primitive survives.
pub fn walk_edges(state: &mut PipelineState, tri: &Triangle<'_>) -> Walk {
    let flip = tri.right_major();
    state.max_level = tri.levels();
    state.spans.clear();

    let yl = sign(tri.yl(), 14);
    let ym = sign(tri.ym(), 14);
    let yh = sign(tri.yh(), 14);
    let xl = sign(tri.xl(), 28);
    let xh = sign(tri.xh(), 28);
    let xm = sign(tri.xm(), 28);
    let dxldy = sign(tri.dxldy(), 30);
    let dxhdy = sign(tri.dxhdy(), 30);
    let dxmdy = sign(tri.dxmdy(), 30);

    let grads = Gradients::from_triangle(tri);
    state.deltas = span_deltas(&grads);

    let sign_dxhdy = tri.dxhdy() < 0;
    let copy = state.other_modes.cycle_type() == CycleType::Copy;
    let setup = AttrSetup::new(&grads, sign_dxhdy == flip, copy);
    let mut values = grads.start;

    let mut xleft_inc = (dxmdy >> 2) & !1;
    let xright_inc = (dxhdy >> 2) & !1;
    let mut xright = xh & !1;
    let mut xleft = xm & !1;

    let scissor = state.scissor;
    let yllimit = bottom_limit(yl, &scissor);
    let yhlimit = top_limit(yh, &scissor);
    // The line after the last one stays invalid from the clear above.
    let mut ylfar = yllimit | 3;
    if (yl >> 2) > (ylfar >> 2) {
        ylfar += 4;
    }
    let yhclose = yhlimit & !3;
    let clip_xl = scissor.xl << 1;
    let clip_xh = scissor.xh << 1;

    // Attribute values are latched on the sub-scanline nearest the
    // major edge's leading vertex.
    let latch = if sign_dxhdy != flip { 0 } else { 3 };
    let mut bounds = LineBounds::new(flip);

    trace!(
        "walk y {yh:#x}..{yl:#x} (mid {ym:#x}) rows {}..={} flip {flip}",
        yhlimit >> 2,
        yllimit >> 2
    );

    for k in (yh & !3)..=ylfar {
        if k == ym {
            xleft = xl & !1;
            xleft_inc = (dxldy >> 2) & !1;
        }

        let spix = (k & 3) as usize;
        if k >= yhclose {
            let line = k >> 2;
            if spix == 0 {
                bounds = LineBounds::new(flip);
            }

            let major = clip_edge(xright, clip_xh, clip_xl);
            let minor = clip_edge(xleft, clip_xh, clip_xl);
            bounds.all_over &= major.over && minor.over;
            bounds.all_under &= major.under && minor.under;

            let crossed = if flip {
                cross_key(xleft) < cross_key(xright)
            } else {
                cross_key(xright) < cross_key(xleft)
            };
            let invalid = k < yhlimit || k >= yllimit || crossed;
            bounds.all_invalid &= invalid;
            if !invalid {
                bounds.include(flip, minor.x, major.x);
            }

            if let Some(span) = state.spans.get_mut(line) {
                span.majorx[spix] = major.x & 0x1FFF;
                span.minorx[spix] = minor.x & 0x1FFF;
                span.invalid_y_scan[spix] = invalid;

                if spix == latch {
                    span.unscrx = sign(xright >> 16, 12);
                    setup.apply(span, &values, (xright >> 8) & 0xFF);
                }

                if spix == 3 {
                    span.lx = bounds.minor;
                    span.rx = bounds.major;
                    let field_ok = !scissor.field || scissor.keep_odd == (line & 1 != 0);
                    span.valid_line =
                        !bounds.all_invalid && !bounds.all_over && !bounds.all_under && field_ok;
                }
            }
        }

        if spix == 3 {
            for (v, de) in values.iter_mut().zip(grads.de) {
                *v = v.wrapping_add(de);
            }
        }

        xleft = xleft.wrapping_add(xleft_inc);
        xright = xright.wrapping_add(xright_inc);
    }

    Walk {
        flip,
        tile: tri.tile(),
        first_line: yhlimit >> 2,
        last_line: yllimit >> 2,
    }
}
