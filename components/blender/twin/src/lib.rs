//! Blender stage.
//!
//! Each cycle mixes two terms, `(P * A + M * B) / (A + B)`, where P and M
//! are colours picked by the `Set_Other_Modes` blend selectors and A and
//! B are alphas. When the second alpha reads memory the weights are
//! adjusted by the depth comparator's shifts. The hardware divider is a
//! bit-serial unit; its quotient is tabulated once at first use.

use std::sync::LazyLock;

use rdp_dither::rgb_dither;
use rdp_registers::{OtherModesReg, RgbDitherSel};
use rdp_twin_core::{BlendGate, Color, PipelineState};

/// The blender's constant one.
pub const BLENDER_ONE: i32 = 0xFF;

/// Quotient table indexed by `(divisor << 11) | dividend`.
static DIVIDE: LazyLock<Vec<u8>> = LazyLock::new(|| (0..0x8000).map(divide_entry).collect());

/// One step-by-step run of the hardware divider.
fn divide_entry(i: usize) -> u8 {
    let d = ((i >> 11) & 0xF) as i32;
    let n = (i & 0x7FF) as i32;
    let invd = !d & 0xF;

    let mut res = 0i32;
    let mut partial = (invd + (n >> 8) + 1) & 7;
    for k in 0..8 {
        let nbit = (n >> (7 - k)) & 1;
        let temp = if res & (0x100 >> k) != 0 {
            invd + (partial << 1) + nbit + 1
        } else {
            d + (partial << 1) + nbit
        };
        partial = temp & 7;
        if temp & 0x10 != 0 {
            res |= 1 << (7 - k);
        }
    }
    res as u8
}

/// Hardware quotient for a packed divisor/dividend index.
#[must_use]
pub fn divide(index: usize) -> i32 {
    i32::from(DIVIDE[index & 0x7FFF])
}

/// Colour term of a blender input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendRgb {
    /// Combiner output; only selectable in cycle 0.
    Pixel,
    /// Cycle 0 blender output; replaces `Pixel` in cycle 1.
    Blended,
    Memory,
    BlendColor,
    Fog,
}

/// Alpha term of a blender input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendAlpha {
    Pixel,
    Fog,
    Shade,
    InvPixel,
    Memory,
    One,
    Zero,
}

impl BlendRgb {
    const fn decode(cycle: usize, code: u8) -> Self {
        match code & 3 {
            0 if cycle == 0 => Self::Pixel,
            0 => Self::Blended,
            1 => Self::Memory,
            2 => Self::BlendColor,
            _ => Self::Fog,
        }
    }
}

impl BlendAlpha {
    const fn first(code: u8) -> Self {
        match code & 3 {
            0 => Self::Pixel,
            1 => Self::Fog,
            2 => Self::Shade,
            _ => Self::Zero,
        }
    }

    const fn second(code: u8) -> Self {
        match code & 3 {
            0 => Self::InvPixel,
            1 => Self::Memory,
            2 => Self::One,
            _ => Self::Zero,
        }
    }
}

/// One side of the blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendTerm {
    pub rgb: BlendRgb,
    pub alpha: BlendAlpha,
}

impl BlendTerm {
    fn rgb(&self, state: &PipelineState) -> [i32; 3] {
        let c = match self.rgb {
            BlendRgb::Pixel => state.pixel,
            BlendRgb::Blended => state.blended,
            BlendRgb::Memory => state.memory,
            BlendRgb::BlendColor => state.blend_color,
            BlendRgb::Fog => state.fog_color,
        };
        [c.r, c.g, c.b]
    }

    fn alpha(&self, state: &PipelineState) -> i32 {
        match self.alpha {
            BlendAlpha::Pixel => state.pixel.a,
            BlendAlpha::Fog => state.fog_color.a,
            BlendAlpha::Shade => state.shade_alpha,
            BlendAlpha::InvPixel => state.inv_pixel.a,
            BlendAlpha::Memory => state.memory.a,
            BlendAlpha::One => BLENDER_ONE,
            BlendAlpha::Zero => 0,
        }
    }
}

/// Both terms of one blender cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendCycle {
    pub first: BlendTerm,
    pub second: BlendTerm,
}

impl BlendCycle {
    /// Opaque pixels may skip the blend: `A` is pixel alpha and `B` its
    /// inverse.
    #[must_use]
    pub fn partial_reject(&self) -> bool {
        self.second.alpha == BlendAlpha::InvPixel && self.first.alpha == BlendAlpha::Pixel
    }

    /// `B` reads memory alpha, which engages the depth-based shifts.
    #[must_use]
    pub fn reads_memory_alpha(&self) -> bool {
        self.second.alpha == BlendAlpha::Memory
    }
}

/// The blender and its decoded selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blender {
    pub cycles: [BlendCycle; 2],
}

impl Default for Blender {
    fn default() -> Self {
        Self::new(OtherModesReg::default())
    }
}

impl Blender {
    #[must_use]
    pub fn new(modes: OtherModesReg) -> Self {
        let cycle = |c: usize, m1a: u8, m1b: u8, m2a: u8, m2b: u8| BlendCycle {
            first: BlendTerm {
                rgb: BlendRgb::decode(c, m1a),
                alpha: BlendAlpha::first(m1b),
            },
            second: BlendTerm {
                rgb: BlendRgb::decode(c, m2a),
                alpha: BlendAlpha::second(m2b),
            },
        };
        Self {
            cycles: [
                cycle(
                    0,
                    modes.blend_m1a_0(),
                    modes.blend_m1b_0(),
                    modes.blend_m2a_0(),
                    modes.blend_m2b_0(),
                ),
                cycle(
                    1,
                    modes.blend_m1a_1(),
                    modes.blend_m1b_1(),
                    modes.blend_m2a_1(),
                    modes.blend_m2b_1(),
                ),
            ],
        }
    }

    /// Re-decode the selectors after `Set_Other_Modes`.
    pub fn update_other_modes(&mut self, modes: OtherModesReg) {
        *self = Self::new(modes);
    }

    #[must_use]
    pub fn cycle(&self, index: usize) -> &BlendCycle {
        &self.cycles[index & 1]
    }

    /// Alpha compare against the blend colour alpha, or against a random
    /// threshold when alpha dither is on.
    pub fn alpha_compare(state: &mut PipelineState, alpha: i32) -> bool {
        if !state.other_modes.alpha_compare_en() {
            return true;
        }
        let threshold = if state.other_modes.dither_alpha_en() {
            state.irand() & 0xFF
        } else {
            state.blend_color.a
        };
        alpha >= threshold
    }

    /// The blend equation for `cycle`.
    ///
    /// `past` selects the shifts of the previous pixel and the unnormalised
    /// path, as used by the first of two cycles.
    #[must_use]
    pub fn equation(&self, state: &PipelineState, cycle: usize, past: bool) -> [i32; 3] {
        let c = self.cycle(cycle);
        let mut blend1a = c.first.alpha(state) >> 3;
        let mut blend2a = c.second.alpha(state) >> 3;

        if c.reads_memory_alpha() {
            let (shift_a, shift_b) = if past {
                (state.shifts.past_shift_a, state.shifts.past_shift_b)
            } else {
                (state.shifts.shift_a, state.shifts.shift_b)
            };
            blend1a = (blend1a >> shift_a) & 0x3C;
            blend2a = (blend2a >> shift_b) | 3;
        }

        let mulb = blend2a + 1;
        let p = c.first.rgb(state);
        let m = c.second.rgb(state);
        let weighted = [0, 1, 2].map(|i| p[i] * blend1a + m[i] * mulb);

        if !state.other_modes.force_blend() && !past {
            let sum = (((blend1a & !3) + (blend2a & !3) + 4) << 9) as usize;
            weighted.map(|v| divide(sum | ((v >> 2) & 0x7FF) as usize))
        } else {
            weighted.map(|v| (v >> 5) & 0xFF)
        }
    }

    /// Blend the current pixel against memory.
    ///
    /// Returns the colour to write, or `None` when the pixel is discarded
    /// by alpha compare or coverage (cycle 0 only). `cvg` is the
    /// antialiased coverage count and `cvbit` the point-sampled one.
    pub fn framebuffer_pass(
        &self,
        state: &mut PipelineState,
        cycle: usize,
        dither: i32,
        gate: BlendGate,
        cvg: u32,
        cvbit: bool,
    ) -> Option<[i32; 3]> {
        let c = *self.cycle(cycle);
        let modes = state.other_modes;

        if cycle == 0 {
            if !Self::alpha_compare(state, state.pixel.a) {
                return None;
            }
            let covered = if modes.antialias_en() { cvg != 0 } else { cvbit };
            if !covered {
                return None;
            }
        }

        let [r, g, b] = if !modes.color_on_cvg() || gate.prewrap {
            let reject = if cycle == 0 {
                state.flags.partial_reject_1
            } else {
                state.flags.partial_reject_2
            };
            if !gate.enable_blend || (reject && state.pixel.a >= 0xFF) {
                c.first.rgb(state)
            } else {
                state.inv_pixel.a = !c.first.alpha(state) & 0xFF;
                self.equation(state, cycle, false)
            }
        } else {
            c.second.rgb(state)
        };

        let sel = modes.rgb_dither_sel();
        if sel == RgbDitherSel::None {
            return Some([r, g, b]);
        }
        let out = rgb_dither(sel, Color::new(r, g, b, 0), dither);
        Some([out.r, out.g, out.b])
    }

    /// First cycle of a two cycle pixel: blend into `state.blended` when
    /// covered, then promote the prefetched memory colour.
    pub fn pass_2cycle_cycle0(&self, state: &mut PipelineState, has_cvg: bool, cvbit: bool) -> bool {
        let covered = if state.other_modes.antialias_en() {
            has_cvg
        } else {
            cvbit
        };

        if covered {
            state.inv_pixel.a = !self.cycle(0).first.alpha(state) & 0xFF;
            let [r, g, b] = self.equation(state, 0, true);
            state.blended.r = r;
            state.blended.g = g;
            state.blended.b = b;
        }

        state.memory = state.pre_memory;
        covered
    }
}
