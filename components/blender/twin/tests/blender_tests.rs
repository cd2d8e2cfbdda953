//! Blend selectors, the blend equation and the framebuffer pass.

use rdp_blender::*;
use rdp_registers::{OtherModesReg, RgbDitherSel};
use rdp_twin_core::{BlendGate, Color, PipelineState};

/// Both cycles blend memory colour weighted by fog alpha against memory
/// colour weighted by memory alpha.
fn memory_modes() -> OtherModesReg {
    let mut modes = OtherModesReg::default();
    modes.set_blend_m1a_0(1);
    modes.set_blend_m1b_0(1);
    modes.set_blend_m2a_0(1);
    modes.set_blend_m2b_0(1);
    modes.set_blend_m1a_1(1);
    modes.set_blend_m1b_1(1);
    modes.set_blend_m2a_1(1);
    modes.set_blend_m2b_1(1);
    modes
}

fn fixture() -> (PipelineState, Blender) {
    let mut state = PipelineState::default();
    state.fog_color = Color::from_u32(0xD440_4020);
    state.prim_color = Color::from_u32(0xD4AF_40FF);
    state.env_color = Color::from_u32(0xB4D4_40F0);
    state.memory = Color::from_u32(0x9BF2_4A00);
    state.other_modes = memory_modes();
    let blender = Blender::new(state.other_modes);
    (state, blender)
}

const BLEND: BlendGate = BlendGate {
    enable_blend: true,
    prewrap: false,
};

// ============================================================================
// Selector decoding
// ============================================================================

mod select_tests {
    use super::*;

    #[test]
    fn zero_selectors() {
        let blender = Blender::default();
        let c0 = blender.cycle(0);
        assert_eq!(c0.first.rgb, BlendRgb::Pixel);
        assert_eq!(c0.first.alpha, BlendAlpha::Pixel);
        assert_eq!(c0.second.alpha, BlendAlpha::InvPixel);
        assert!(c0.partial_reject());
        assert!(!c0.reads_memory_alpha());

        // The pixel input of cycle 1 is the cycle 0 result.
        assert_eq!(blender.cycle(1).first.rgb, BlendRgb::Blended);
    }

    #[test]
    fn memory_selectors() {
        let blender = Blender::new(memory_modes());
        let c1 = blender.cycle(1);
        assert_eq!(c1.first.rgb, BlendRgb::Memory);
        assert_eq!(c1.first.alpha, BlendAlpha::Fog);
        assert_eq!(c1.second.alpha, BlendAlpha::Memory);
        assert!(c1.reads_memory_alpha());
        assert!(!c1.partial_reject());
    }

    #[test]
    fn remaining_codes() {
        let mut modes = OtherModesReg::default();
        modes.set_blend_m1a_0(3);
        modes.set_blend_m1b_0(2);
        modes.set_blend_m2a_0(2);
        modes.set_blend_m2b_0(2);
        let mut blender = Blender::default();
        blender.update_other_modes(modes);

        let c0 = blender.cycle(0);
        assert_eq!(c0.first.rgb, BlendRgb::Fog);
        assert_eq!(c0.first.alpha, BlendAlpha::Shade);
        assert_eq!(c0.second.rgb, BlendRgb::BlendColor);
        assert_eq!(c0.second.alpha, BlendAlpha::One);
    }
}

// ============================================================================
// Equation
// ============================================================================

mod equation_tests {
    use super::*;

    #[test]
    fn divider_normalises() {
        let (state, blender) = fixture();
        let out = blender.equation(&state, 0, false);
        assert_eq!(out, [0x9B, 0xF2, 0x4A], "{out:02X?}");
    }

    #[test]
    fn force_blend_skips_divider() {
        let (mut state, blender) = fixture();
        state.other_modes.set_force_blend(true);
        let out = blender.equation(&state, 0, false);
        assert_eq!(out, [0x26, 0x3C, 0x12], "{out:02X?}");
    }

    #[test]
    fn past_shifts_skip_divider() {
        let (state, blender) = fixture();
        let out = blender.equation(&state, 0, true);
        assert_eq!(out, [0x26, 0x3C, 0x12], "{out:02X?}");
    }

    #[test]
    fn memory_alpha_shifts_weights() {
        let (mut state, _) = fixture();
        state.other_modes.set_blend_m1a_0(3);
        state.fog_color.a = 0xFF;
        let blender = Blender::new(state.other_modes);

        // Fog weight 0x1C against memory weight 4.
        let out = blender.equation(&state, 0, false);
        assert_eq!(out, [0xCC, 0x56, 0x41], "{out:02X?}");

        // A nearer memory sample shifts the fog weight down to 4.
        state.shifts.shift_a = 2;
        let out = blender.equation(&state, 0, false);
        assert_eq!(out, [0xB7, 0x99, 0x45], "{out:02X?}");
    }

    #[test]
    fn divider_table_entries() {
        // Weights 4 + 4 over a sum of 8.
        assert_eq!(divide((8 << 9) | ((0x9B * 8) >> 2)), 0x9B);
        assert_eq!(divide((8 << 9) | ((0x4A * 8) >> 2)), 0x4A);
    }
}

// ============================================================================
// Alpha compare
// ============================================================================

mod compare_tests {
    use super::*;

    #[test]
    fn disabled_always_passes() {
        let mut state = PipelineState::default();
        state.blend_color.a = 0xFF;
        assert!(Blender::alpha_compare(&mut state, 0));
    }

    #[test]
    fn against_blend_alpha() {
        let mut state = PipelineState::default();
        state.other_modes.set_alpha_compare_en(true);
        state.blend_color.a = 0x80;
        assert!(!Blender::alpha_compare(&mut state, 0x7F));
        assert!(Blender::alpha_compare(&mut state, 0x80));
    }

    #[test]
    fn dithered_threshold_draws_noise() {
        let mut state = PipelineState::default();
        state.other_modes.set_alpha_compare_en(true);
        state.other_modes.set_dither_alpha_en(true);
        state.blend_color.a = 0xFF;

        let mut same_seed = PipelineState::default();
        let threshold = same_seed.irand() & 0xFF;
        assert!(Blender::alpha_compare(&mut state, threshold));
        // The generator advanced.
        assert_eq!(state.irand(), same_seed.irand());
    }
}

// ============================================================================
// Framebuffer pass
// ============================================================================

mod pass_tests {
    use super::*;

    #[test]
    fn uncovered_pixel_discarded() {
        let (mut state, blender) = fixture();
        let gate = BlendGate::default();
        assert_eq!(blender.framebuffer_pass(&mut state, 0, 1, gate, 0xAA, false), None);
    }

    #[test]
    fn blended_and_dithered() {
        let (mut state, blender) = fixture();
        let out = blender.framebuffer_pass(&mut state, 0, 1, BLEND, 0xAA, true);
        assert_eq!(out, Some([0xA0, 0xF8, 0x50]), "{out:02X?}");
        assert_eq!(state.inv_pixel.a, 0xDF, "inv {:#x}", state.inv_pixel.a);
    }

    #[test]
    fn antialias_uses_coverage_count() {
        let (mut state, blender) = fixture();
        state.other_modes.set_antialias_en(true);
        assert_eq!(blender.framebuffer_pass(&mut state, 0, 1, BLEND, 0, true), None);
        assert!(blender.framebuffer_pass(&mut state, 0, 1, BLEND, 3, false).is_some());
    }

    #[test]
    fn opaque_pixel_partial_reject() {
        let mut state = PipelineState::default();
        state.other_modes.set_rgb_dither_sel(RgbDitherSel::None);
        state.flags.partial_reject_1 = true;
        state.pixel = Color::new(0x12, 0x34, 0x56, 0xFF);
        state.memory = Color::new(0x80, 0x80, 0x80, 0xE0);
        let blender = Blender::new(state.other_modes);

        let out = blender.framebuffer_pass(&mut state, 0, 0, BLEND, 8, true);
        assert_eq!(out, Some([0x12, 0x34, 0x56]));
    }

    #[test]
    fn color_on_coverage_keeps_memory() {
        let (mut state, blender) = fixture();
        state.other_modes.set_color_on_cvg(true);
        state.other_modes.set_rgb_dither_sel(RgbDitherSel::None);
        state.memory = Color::new(0x11, 0x22, 0x33, 0);
        let out = blender.framebuffer_pass(&mut state, 1, 0, BLEND, 0, false);
        assert_eq!(out, Some([0x11, 0x22, 0x33]));

        // An overflowing coverage sum without blending takes the first term.
        let gate = BlendGate {
            enable_blend: false,
            prewrap: true,
        };
        let out = blender.framebuffer_pass(&mut state, 1, 0, gate, 0, false);
        assert_eq!(out, Some([0x11, 0x22, 0x33]));
    }

    #[test]
    fn two_cycle_first_pass() {
        let (mut state, blender) = fixture();
        assert!(!blender.pass_2cycle_cycle0(&mut state, false, false));
        assert_eq!(state.blended, Color::ZERO);
        assert_eq!(state.inv_pixel.a, 0);
        // Memory is replaced by the prefetched read either way.
        assert_eq!(state.memory, state.pre_memory);

        let (mut state, blender) = fixture();
        assert!(blender.pass_2cycle_cycle0(&mut state, false, true));
        let b = state.blended;
        assert_eq!([b.r, b.g, b.b], [0x26, 0x3C, 0x12], "{b}");
        assert_eq!(state.inv_pixel.a, 0xDF);
    }
}
