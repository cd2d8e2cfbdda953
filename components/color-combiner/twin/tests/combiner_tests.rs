//! Combiner equations, input decoding and per-pixel passes.

use rdp_color_combiner::*;
use rdp_registers::CombineModeReg;
use rdp_twin_core::{Color, PipelineState};

/// Cycle 0 selectors all `c0`, cycle 1 selectors all `c1`.
fn split_mode(c0: u8, c1: u8) -> CombineModeReg {
    let mut mode = CombineModeReg::uniform(c0);
    mode.set_sub_a_rgb_1(c1);
    mode.set_sub_a_alpha_1(c1);
    mode.set_sub_b_rgb_1(c1);
    mode.set_sub_b_alpha_1(c1);
    mode.set_mul_rgb_1(c1);
    mode.set_mul_alpha_1(c1);
    mode.set_add_rgb_1(c1);
    mode.set_add_alpha_1(c1);
    mode
}

/// Register file with distinct colours; environment for cycle 0,
/// primitive for cycle 1.
fn fixture() -> (PipelineState, Combiner) {
    let mut state = PipelineState::default();
    state.fog_color = Color::from_u32(0xD440_4020);
    state.prim_color = Color::from_u32(0xD4AF_40FF);
    state.env_color = Color::from_u32(0xB4D4_40F0);
    state.memory = Color::from_u32(0x9BF2_4A00);
    state.key_center = Color::from_u32(0xADAD_AD00);
    state.key_scale = Color::from_u32(0xF7F7_F700);
    state.key_width = Color::from_u32(0xCFCF_CF00);
    (state, Combiner::new(split_mode(5, 3)))
}

// ============================================================================
// Arithmetic
// ============================================================================

mod equation_tests {
    use super::*;

    #[test]
    fn color_keeps_fraction() {
        let v = color_equation(0xDE, 0xAD, 0xBA, 0xBE);
        assert_eq!(v, 0xE21A, "got {v:#010x}");
    }

    #[test]
    fn alpha_drops_fraction() {
        let v = alpha_equation(0xDE, 0xAD, 0xBA, 0xBE);
        assert_eq!(v, 0xE2, "got {v:#010x}");
    }

    #[test]
    fn negative_multiplier() {
        // C = 0x1F0 is -16: 0x20 * -16 pulls 0x80 down by two.
        assert_eq!(alpha_equation(0x40, 0x20, 0x1F0, 0x80), 0x7E);
    }

    #[test]
    fn ext_table() {
        assert_eq!(lookup_ext(0xDE), 0xDE);
        assert_eq!(lookup_ext(0x17F), 0x17F);
        assert_eq!(lookup_ext(0x180), -0x80);
        assert_eq!(lookup_ext(0x1FF), -1);
    }

    #[test]
    fn clamp_table() {
        assert_eq!(lookup_clamp(0xDE), 0xDE);
        assert_eq!(lookup_clamp(0x100), 0xFF);
        assert_eq!(lookup_clamp(0x17F), 0xFF);
        assert_eq!(lookup_clamp(0x180), 0);
    }

    #[test]
    fn chroma_key_saturates() {
        let width = Color::new(0xDE, 0xAD, 0xBA, 0);
        let v = chroma_key_min(width, Color::new(0xEF, 0xAA, 0xFF, 0));
        assert_eq!(v, 0xFF, "got {v:#010x}");
    }

    #[test]
    fn chroma_key_picks_nearest_channel() {
        let width = Color::new(0x10, 0x10, 0x10, 0);
        let c = Color::new(0x0F8, 0x100, 0x0C0, 0);
        // G: 0x100 - 0x100 = 0 is the smallest distance.
        assert_eq!(chroma_key_min(width, c), 0);
        let c = Color::new(0x0F8, 0x0F8, 0x0F8, 0);
        // Half steps round towards the key: -0xF8 + 0x10 + 0x100 = 0x18.
        assert_eq!(chroma_key_min(width, c), 0x18);
    }
}

// ============================================================================
// Input decoding
// ============================================================================

mod input_tests {
    use super::*;

    #[test]
    fn environment_everywhere() {
        let mut state = PipelineState::default();
        state.env_color = Color::new(0xDE, 0xAD, 0xBA, 0xBE);

        let combiner = Combiner::new(CombineModeReg::uniform(5));
        let sub_a = combiner.cycle(0).sub_a;
        assert_eq!(sub_a.color(&state).to_string(), "DEADBABE");
        assert_eq!(combiner.cycle(1).sub_a.color(&state).to_string(), "DEADBABE");
    }

    #[test]
    fn selector_tables_differ_per_operand() {
        let combiner = Combiner::new(CombineModeReg::uniform(6));
        let c = combiner.cycle(0);
        assert_eq!(c.sub_a.rgb, RgbInput::One);
        assert_eq!(c.sub_b.rgb, RgbInput::KeyCenter);
        assert_eq!(c.mul.rgb, RgbInput::KeyScale);
        assert_eq!(c.add.rgb, RgbInput::One);
        assert_eq!(c.mul.alpha, AlphaInput::PrimLodFrac);
        assert_eq!(c.add.alpha, AlphaInput::One);

        let combiner = Combiner::new(CombineModeReg::uniform(7));
        let c = combiner.cycle(1);
        assert_eq!(c.sub_a.rgb, RgbInput::Noise);
        assert_eq!(c.sub_b.rgb, RgbInput::K4);
        assert_eq!(c.mul.rgb, RgbInput::AlphaOf(Source::Combined));
        assert_eq!(c.add.rgb, RgbInput::Zero);
        assert_eq!(c.sub_a.alpha, AlphaInput::Zero);
        assert!(c.uses_noise());
    }

    #[test]
    fn multiplier_alpha_counts_as_texel_use() {
        let mut mode = CombineModeReg::uniform(31);
        mode.set_mul_rgb_0(8);
        let combiner = Combiner::new(mode);
        assert_eq!(combiner.cycle(0).mul.rgb, RgbInput::AlphaOf(Source::Texel0));
        assert!(combiner.cycle(0).rgb_uses(Source::Texel0));
        assert!(!combiner.cycle(0).alpha_uses(Source::Texel0));
        assert!(!combiner.cycle(1).uses(Source::Texel0));
    }

    #[test]
    fn lod_fraction_multiplier() {
        let mut mode = CombineModeReg::uniform(7);
        mode.set_mul_alpha_1(0);
        let combiner = Combiner::new(mode);
        assert!(combiner.cycle(1).uses_lod_frac());
        assert!(!combiner.cycle(0).uses_lod_frac());

        mode.set_mul_rgb_0(13);
        assert!(Combiner::new(mode).cycle(0).uses_lod_frac());
    }

    #[test]
    fn alpha_of_broadcasts() {
        let mut state = PipelineState::default();
        state.prim_color = Color::new(1, 2, 3, 0x44);
        let mut mode = CombineModeReg::uniform(0);
        mode.set_mul_rgb_0(10);
        let combiner = Combiner::new(mode);
        assert_eq!(combiner.cycle(0).mul.color(&state).r, 0x44);
        assert_eq!(combiner.cycle(0).mul.color(&state).b, 0x44);
    }
}

// ============================================================================
// Per-pixel passes
// ============================================================================

mod pass_tests {
    use super::*;

    #[test]
    fn first_cycle_without_compare() {
        let (mut state, combiner) = fixture();
        assert_eq!(combiner.pass_2cycle_cycle0(&mut state, 0, 0), None);
        assert_eq!(state.combined.to_string(), "B4D440F0");
    }

    #[test]
    fn first_cycle_compare_alpha() {
        let (mut state, combiner) = fixture();
        state.other_modes.set_alpha_compare_en(true);
        assert_eq!(combiner.pass_2cycle_cycle0(&mut state, 1, 0), Some(0xF1));
        assert_eq!(state.combined.to_string(), "B4D440F0");

        let (mut state, combiner) = fixture();
        state.other_modes.set_alpha_compare_en(true);
        state.other_modes.set_alpha_cvg_select(true);
        assert_eq!(combiner.pass_2cycle_cycle0(&mut state, 1, 2), Some(0x40));

        state.other_modes.set_cvg_times_alpha(true);
        assert_eq!(combiner.pass_2cycle_cycle0(&mut state, 1, 2), Some(0x3C));
    }

    #[test]
    fn second_cycle_dithers_alpha() {
        let (mut state, combiner) = fixture();
        let mut cvg = 0;
        combiner.pass_2cycle_cycle1(&mut state, 1, &mut cvg);
        assert_eq!(cvg, 0);
        assert_eq!(state.combined.to_string(), "D4AF40FF");
        assert_eq!(state.pixel.to_string(), "D4AF40FF");
    }

    #[test]
    fn second_cycle_chroma_key() {
        let (mut state, combiner) = fixture();
        state.other_modes.set_key_en(true);
        let mut cvg = 0;
        combiner.pass_2cycle_cycle1(&mut state, 1, &mut cvg);
        assert_eq!(state.combined.to_string(), "D4AF40FF");
        assert_eq!(state.pixel.to_string(), "D4AF4000");
    }

    #[test]
    fn second_cycle_reads_next_texels() {
        let mut state = PipelineState::default();
        state.texel0 = Color::splat(0x11);
        state.texel1 = Color::splat(0x22);
        state.next_texel = Color::splat(0x33);
        // D = TEXEL0 with a zero multiplier
        let mut mode = CombineModeReg::uniform(31);
        mode.set_add_rgb_1(1);
        mode.set_add_alpha_1(1);
        mode.set_mul_alpha_1(7);
        let combiner = Combiner::new(mode);

        let mut cvg = 8;
        combiner.pass_2cycle_cycle1(&mut state, 0, &mut cvg);
        assert_eq!(state.texel0, Color::splat(0x22));
        assert_eq!(state.texel1, Color::splat(0x33));
        assert_eq!(state.pixel, Color::splat(0x22), "{}", state.pixel);
    }

    #[test]
    fn one_cycle_coverage_times_alpha() {
        let (mut state, combiner) = fixture();
        state.other_modes.set_cvg_times_alpha(true);
        state.other_modes.set_alpha_cvg_select(true);
        let mut cvg = 4;
        combiner.pass_1cycle(&mut state, 0, &mut cvg);
        // Alpha 0xFF promotes to 0x100: (0x100 * 4 + 4) >> 3 = 0x80
        assert_eq!(state.pixel.a, 0x80, "alpha {:#x}", state.pixel.a);
        assert_eq!(cvg, 4);
    }

    #[test]
    fn shade_alpha_takes_dither() {
        let (mut state, combiner) = fixture();
        state.shade.a = 0x80;
        combiner.pass_2cycle_cycle0(&mut state, 3, 0);
        assert_eq!(state.shade_alpha, 0x83);

        state.shade.a = 0xFE;
        combiner.pass_2cycle_cycle0(&mut state, 3, 0);
        assert_eq!(state.shade_alpha, 0xFF);
    }
}
