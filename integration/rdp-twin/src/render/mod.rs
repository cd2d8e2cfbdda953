//! Span renderers.
//!
//! After the edge walker has filled the span table, one of four
//! renderers walks every valid scanline pixel by pixel and drives the
//! stage crates in hardware order. The one and two cycle renderers come
//! in texture/texel variants picked by the derived render modes.

mod copy;
mod cycle1;
mod cycle2;
mod fill;

use log::trace;
use rdp_blender::Blender;
use rdp_color_combiner::Combiner;
use rdp_lod::TexCoord;
use rdp_memory::{Rdram, Tmem};
use rdp_rasterizer::Walk;
use rdp_registers::CycleType;
use rdp_twin_core::{PipelineState, SpanDeltas};
use rdp_zbuf::dz_compress;

use crate::Rdp;

/// The parts of [`Rdp`] a span renderer works on, borrowed apart.
struct Stages<'a> {
    state: &'a mut PipelineState,
    rdram: &'a mut Rdram,
    tmem: &'a Tmem,
    combiner: &'a Combiner,
    blender: &'a Blender,
}

/// Per-pixel attribute steps along the span direction.
#[derive(Debug, Clone, Copy)]
struct Steps {
    rgba: [i32; 4],
    z: i32,
    tex: TexCoord,
    /// +1 when spans run right, -1 when they run left.
    x: i32,
}

impl Steps {
    fn new(d: &SpanDeltas, flip: bool) -> Self {
        let sign = if flip { 1 } else { -1 };
        Self {
            rgba: [d.dr, d.dg, d.db, d.da].map(|v| v.wrapping_mul(sign)),
            z: d.dz.wrapping_mul(sign),
            tex: TexCoord::new(
                d.ds.wrapping_mul(sign),
                d.dt.wrapping_mul(sign),
                d.dw.wrapping_mul(sign),
            ),
            x: sign,
        }
    }
}

/// Depth slope shared by every pixel of the primitive.
#[derive(Debug, Clone, Copy)]
struct Depth {
    dzpix: u16,
    dz_enc: i32,
}

/// Running values for the pixel being rendered on one scanline.
#[derive(Debug, Clone, Copy)]
struct Line {
    rgba: [i32; 4],
    z: i32,
    coord: TexCoord,
    x: i32,
    /// Pixels after the first.
    length: i32,
    /// Pixels cut off by the scissor before the first rendered one.
    scdiff: i32,
    curpixel: i32,
    zbcur: i32,
}

impl Line {
    /// Shade values with the 14 fraction bits dropped.
    fn shade(&self) -> [i32; 4] {
        self.rgba.map(|v| v >> 14)
    }

    /// Depth with the 10 fraction bits dropped.
    fn depth(&self) -> i32 {
        (self.z >> 10) & 0x3F_FFFF
    }

    fn step_shade(&mut self, steps: &Steps) {
        for (v, d) in self.rgba.iter_mut().zip(steps.rgba) {
            *v = v.wrapping_add(d);
        }
    }

    fn step_pixel(&mut self, steps: &Steps) {
        self.x += steps.x;
        self.curpixel += steps.x;
        self.zbcur += steps.x;
    }
}

impl Stages<'_> {
    /// Fix the depth slope for the primitive. With primitive depth the
    /// interpolated depth stops moving.
    fn depth_setup(&mut self, steps: &mut Steps) -> Depth {
        let dzpix = if self.state.other_modes.z_source_sel() {
            steps.z = 0;
            self.state.deltas.cdz = 0;
            self.state.deltas.dzdy = 0;
            self.state.prim_delta_z
        } else {
            self.state.deltas.dzpix as u16
        };
        Depth {
            dzpix,
            dz_enc: dz_compress(u32::from(dzpix)) as i32,
        }
    }

    /// Start a scanline: compute its coverage and move every attribute
    /// past the pixels the scissor removed. `None` for invalid lines.
    fn line_start(&mut self, i: i32, flip: bool, steps: &Steps) -> Option<Line> {
        let span = self.state.spans.get(i).copied().filter(|s| s.valid_line)?;

        let (length, scdiff) = if flip {
            (span.lx - span.rx, span.rx - span.unscrx)
        } else {
            (span.rx - span.lx, span.unscrx - span.rx)
        };
        rdp_coverage::compute(self.state, i, flip);

        let z = if self.state.other_modes.z_source_sel() {
            self.state.prim_z as i32
        } else {
            span.z
        };
        let curpixel = self.state.fb_width().wrapping_mul(i).wrapping_add(span.rx);
        let mut line = Line {
            rgba: [span.r, span.g, span.b, span.a],
            z,
            coord: TexCoord::from_span(&span),
            x: span.rx,
            length,
            scdiff: 0,
            curpixel,
            zbcur: ((self.state.z_image_address >> 1) as i32).wrapping_add(curpixel),
        };

        if scdiff != 0 {
            let scdiff = scdiff & 0xFFF;
            for (v, d) in line.rgba.iter_mut().zip(steps.rgba) {
                *v = v.wrapping_add(d.wrapping_mul(scdiff));
            }
            line.z = line.z.wrapping_add(steps.z.wrapping_mul(scdiff));
            line.coord += TexCoord::new(
                steps.tex.s.wrapping_mul(scdiff),
                steps.tex.t.wrapping_mul(scdiff),
                steps.tex.w.wrapping_mul(scdiff),
            );
            line.scdiff = scdiff;
        }
        Some(line)
    }

    /// Coverage mask of column `x` on the current scanline.
    fn coverage_at(&self, x: i32) -> u8 {
        usize::try_from(x)
            .ok()
            .and_then(|x| self.state.coverage.get(x))
            .copied()
            .unwrap_or(0)
    }

    /// Perspective (or plain) divide of a span coordinate.
    fn divide(&self, coord: TexCoord) -> (i32, i32) {
        rdp_tex_coord::divide(self.state, coord.s >> 16, coord.t >> 16, coord.w >> 16)
    }
}

impl Rdp {
    /// Render the spans left by the edge walker.
    pub(crate) fn render(&mut self, walk: &Walk) {
        let cycle_type = self.state.other_modes.cycle_type();
        let flags = self.state.flags;
        let mut stages = Stages {
            state: &mut self.state,
            rdram: &mut self.rdram,
            tmem: &self.tmem,
            combiner: &self.combiner,
            blender: &self.blender,
        };

        trace!(
            "render {:?} lines {}..={} flip {}",
            cycle_type,
            walk.first_line,
            walk.last_line,
            walk.flip
        );

        match cycle_type {
            CycleType::One => match flags.cycle1_render_mode {
                0 => stages.cycle1(walk, true, true),
                1 => stages.cycle1(walk, true, false),
                _ => stages.cycle1(walk, false, false),
            },
            CycleType::Two => match flags.cycle2_render_mode {
                0 => stages.cycle2(walk, true, true, true),
                1 => stages.cycle2(walk, true, true, false),
                2 => stages.cycle2(walk, true, false, true),
                _ => stages.cycle2(walk, false, false, false),
            },
            CycleType::Copy => stages.copy(walk),
            CycleType::Fill => stages.fill(walk),
        }
    }
}
