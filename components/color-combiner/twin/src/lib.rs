//! Colour combiner stage.
//!
//! Each cycle evaluates `(A - B) * C + D` once for RGB and once for
//! alpha. Operands are 9-bit values; A, B and D are sign extended only
//! when their top two bits are both set, C is sign extended from bit 8.
//! RGB results are kept with eight fraction bits (17 bits total) until
//! the chroma key has seen them, then shifted down.
//!
//! In one cycle mode only the cycle 1 selectors are used. In two cycle
//! mode cycle 0 runs first and its result is available to cycle 1 as
//! the COMBINED input; cycle 1 sees TEXEL0 and TEXEL1 one tile ahead.

mod input;

use rdp_bits::{sign, sign_f};
use rdp_registers::CombineModeReg;
use rdp_twin_core::{Color, PipelineState};

pub use input::{AlphaInput, CombinerInputs, CycleInputs, Operand, RgbInput, Source, ONE};

/// 9-bit operand to signed: values with both top bits set are negative.
#[inline]
#[must_use]
pub const fn lookup_ext(v: i32) -> i32 {
    let v = v & 0x1FF;
    if v & 0x180 == 0x180 {
        v | !0x1FF
    } else {
        v
    }
}

/// 9-bit result to an unsigned byte: 0x100..0x17F saturate high,
/// 0x180..0x1FF saturate to zero.
#[inline]
#[must_use]
pub const fn lookup_clamp(v: i32) -> i32 {
    let v = v & 0x1FF;
    match (v >> 7) & 3 {
        0 | 1 => v & 0xFF,
        2 => 0xFF,
        _ => 0,
    }
}

/// RGB equation with eight fraction bits, rounded, as a 17-bit value.
#[must_use]
pub fn color_equation(a: i32, b: i32, c: i32, d: i32) -> i32 {
    let (a, b, d) = (lookup_ext(a), lookup_ext(b), lookup_ext(d));
    let c = sign_f(c, 9);
    ((a - b) * c + (d << 8) + 0x80) & 0x1FFFF
}

/// Alpha equation, rounded to a 9-bit value.
#[must_use]
pub fn alpha_equation(a: i32, b: i32, c: i32, d: i32) -> i32 {
    let (a, b, d) = (lookup_ext(a), lookup_ext(b), lookup_ext(d));
    let c = sign_f(c, 9);
    (((a - b) * c + (d << 8) + 0x80) >> 8) & 0x1FF
}

/// Smallest chroma key distance over R, G and B, clamped to a byte.
///
/// `c` holds 17-bit combiner RGB before the fraction is shifted out.
#[must_use]
pub fn chroma_key_min(key_width: Color, c: Color) -> i32 {
    let key = |channel: i32, width: i32| {
        let mut k = sign(channel, 17);
        if k > 0 {
            k = if k & 0xF == 8 { -k + 0x10 } else { -k };
        }
        (width << 4) + k
    };
    key(c.r, key_width.r)
        .min(key(c.g, key_width.g))
        .min(key(c.b, key_width.b))
        .clamp(0, 0xFF)
}

/// Byte alpha with full opacity promoted to 0x100.
const fn promote(a: i32) -> i32 {
    if a == 0xFF {
        0x100
    } else {
        a
    }
}

/// Add the alpha dither, saturating at 0xFF.
const fn dither_alpha(a: i32, seed: i32) -> i32 {
    let a = a + seed;
    if a & 0x100 != 0 {
        0xFF
    } else {
        a
    }
}

/// The combiner and its decoded selectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Combiner {
    pub inputs: CombinerInputs,
}

impl Combiner {
    #[must_use]
    pub fn new(mode: CombineModeReg) -> Self {
        Self {
            inputs: CombinerInputs::new(mode),
        }
    }

    /// Re-decode the selectors after `Set_Combine_Mode`.
    pub fn update_combine_mode(&mut self, mode: CombineModeReg) {
        self.inputs = CombinerInputs::new(mode);
    }

    #[must_use]
    pub fn cycle(&self, index: usize) -> &CycleInputs {
        &self.inputs.cycles[index & 1]
    }

    /// Run one cycle's equations into `state.combined`.
    fn compute(&self, state: &mut PipelineState, index: usize) {
        let cycle = *self.cycle(index);
        let a = cycle.sub_a.color(state);
        let b = cycle.sub_b.color(state);
        let c = cycle.mul.color(state);
        let d = cycle.add.color(state);

        let (r, g, bl) = if cycle.mul.rgb == RgbInput::Zero {
            let pass = |d: i32| ((lookup_ext(d) << 8) + 0x80) & 0x1FFFF;
            (pass(d.r), pass(d.g), pass(d.b))
        } else {
            (
                color_equation(a.r, b.r, c.r, d.r),
                color_equation(a.g, b.g, c.g, d.g),
                color_equation(a.b, b.b, c.b, d.b),
            )
        };
        let alpha = if cycle.mul.alpha == AlphaInput::Zero {
            lookup_ext(d.a) & 0x1FF
        } else {
            alpha_equation(a.a, b.a, c.a, d.a)
        };
        state.combined = Color::new(r, g, bl, alpha);
    }

    fn shift_combined(state: &mut PipelineState) {
        state.combined.r >>= 8;
        state.combined.g >>= 8;
        state.combined.b >>= 8;
    }

    fn update_shade_alpha(state: &mut PipelineState, seed: i32) {
        state.shade_alpha = dither_alpha(state.shade.a, seed);
    }

    /// The last combiner cycle: produces `state.pixel` for the blender.
    fn final_cycle(&self, state: &mut PipelineState, seed: i32, cvg: &mut u32, two_cycle: bool) {
        let modes = state.other_modes;

        if two_cycle {
            state.texel0 = state.texel1;
            state.texel1 = state.next_texel;
        }

        let bypass = modes.key_en().then(|| self.cycle(1).sub_a.color(state));

        self.compute(state, 1);

        if !two_cycle {
            state.pixel.a = promote(lookup_clamp(state.combined.a));
        }

        let key_alpha = match bypass {
            None => {
                Self::shift_combined(state);
                let c = state.combined;
                state.pixel.r = lookup_clamp(c.r);
                state.pixel.g = lookup_clamp(c.g);
                state.pixel.b = lookup_clamp(c.b);
                0
            }
            Some(bypass) => {
                let key_alpha = chroma_key_min(state.key_width, state.combined);
                state.pixel.r = lookup_clamp(bypass.r);
                state.pixel.g = lookup_clamp(bypass.g);
                state.pixel.b = lookup_clamp(bypass.b);
                Self::shift_combined(state);
                key_alpha
            }
        };

        if two_cycle {
            state.pixel.a = promote(lookup_clamp(state.combined.a));
        }

        let mut alpha_times_cvg = 0;
        if modes.cvg_times_alpha() {
            alpha_times_cvg = (state.pixel.a * *cvg as i32 + 4) >> 3;
            *cvg = ((alpha_times_cvg >> 5) & 0xF) as u32;
        }

        state.pixel.a = if !modes.alpha_cvg_select() {
            if modes.key_en() {
                key_alpha
            } else {
                dither_alpha(state.pixel.a, seed)
            }
        } else if modes.cvg_times_alpha() {
            alpha_times_cvg
        } else {
            ((*cvg as i32) << 5).min(0xFF)
        };

        Self::update_shade_alpha(state, seed);
    }

    /// One cycle mode: evaluate cycle 1 for the current pixel.
    ///
    /// `seed` is the alpha dither; `cvg` is replaced by the
    /// coverage-times-alpha count when that mode is on.
    pub fn pass_1cycle(&self, state: &mut PipelineState, seed: i32, cvg: &mut u32) {
        self.final_cycle(state, seed, cvg, false);
    }

    /// Two cycle mode, first cycle.
    ///
    /// Returns the alpha the blender compares against when alpha compare
    /// is on. Leaves the cycle 0 result in `state.combined` for cycle 1.
    pub fn pass_2cycle_cycle0(&self, state: &mut PipelineState, seed: i32, cvg: u32) -> Option<i32> {
        let modes = state.other_modes;
        self.compute(state, 0);

        let compare_alpha = modes.alpha_compare_en().then(|| {
            let a = promote(lookup_clamp(state.combined.a));
            if !modes.alpha_cvg_select() {
                dither_alpha(a, seed)
            } else {
                let a = if modes.cvg_times_alpha() {
                    (a * cvg as i32 + 4) >> 3
                } else {
                    (cvg as i32) << 5
                };
                a.min(0xFF)
            }
        });

        Self::shift_combined(state);
        Self::update_shade_alpha(state, seed);
        compare_alpha
    }

    /// Two cycle mode, second cycle. Texel inputs advance to the next
    /// tile pair before evaluation.
    pub fn pass_2cycle_cycle1(&self, state: &mut PipelineState, seed: i32, cvg: &mut u32) {
        self.final_cycle(state, seed, cvg, true);
    }
}
