//! Dither thresholds and channel rounding.

use rdp_dither::*;
use rdp_registers::RgbDitherSel;
use rdp_twin_core::{Color, PipelineState};

const INPUT: Color = Color::new(0xFF, 0xEE, 0xAA, 0x12);

fn ordered_state(rgba_dither: u8) -> PipelineState {
    let mut state = PipelineState::default();
    state.flags.dither_level = 1;
    state.flags.rgba_dither = rgba_dither;
    state
}

// ============================================================================
// Channel rounding
// ============================================================================

mod rgb_tests {
    use super::*;

    #[test]
    fn zero_threshold_rounds_every_channel() {
        let out = rgb_dither(RgbDitherSel::MagicSquare, INPUT, 0);
        assert_eq!(out, Color::new(0xFF, 0xF0, 0xB0, 0x12), "{out}");
    }

    #[test]
    fn threshold_at_low_bits_keeps_channel() {
        let out = rgb_dither(RgbDitherSel::MagicSquare, INPUT, 2);
        assert_eq!(out, Color::new(0xFF, 0xF0, 0xAA, 0x12), "{out}");
    }

    #[test]
    fn noise_splits_threshold_per_channel() {
        // Red gets 2, green and blue get 0.
        let out = rgb_dither(RgbDitherSel::Noise, INPUT, 2);
        assert_eq!(out, Color::new(0xFF, 0xF0, 0xB0, 0x12), "{out}");
    }

    #[test]
    fn large_threshold_never_rounds() {
        let out = rgb_dither(RgbDitherSel::MagicSquare, INPUT, 0x20);
        assert_eq!(out, INPUT, "{out}");
    }

    #[test]
    fn rounding_saturates_at_255() {
        let out = rgb_dither(RgbDitherSel::Bayer, Color::new(0xF9, 0xF8, 0xF7, 0), 0);
        assert_eq!(out, Color::new(0xFF, 0xF8, 0xF8, 0), "{out}");
    }
}

// ============================================================================
// Threshold selection
// ============================================================================

mod seed_tests {
    use super::*;

    #[test]
    fn magic_square_for_both() {
        let mut state = ordered_state(0);
        let seeds = dither_noise(&mut state, 1, 0);
        assert_eq!(seeds, DitherSeeds { color: 6, alpha: 6 });
    }

    #[test]
    fn bayer_with_inverted_alpha() {
        let mut state = ordered_state((1 << 2) | 1);
        let seeds = dither_noise(&mut state, 2, 1);
        assert_eq!(seeds, DitherSeeds { color: 5, alpha: 2 });
    }

    #[test]
    fn no_colour_dither_pairs_with_bayer_alpha() {
        let mut state = ordered_state(3 << 2);
        let seeds = dither_noise(&mut state, 3, 3);
        assert_eq!(seeds, DitherSeeds { color: 7, alpha: 2 });

        let mut state = ordered_state(0xF);
        assert_eq!(dither_noise(&mut state, 3, 3), DitherSeeds { color: 7, alpha: 0 });
    }

    #[test]
    fn alpha_noise_reads_noise_register() {
        let mut state = ordered_state(2);
        state.noise = 0x1A0;
        let seeds = dither_noise(&mut state, 0, 0);
        assert_eq!(seeds.alpha, 6);
        assert_eq!(state.noise, 0x1A0, "noise {:#x}", state.noise);
    }

    #[test]
    fn interlaced_field_halves_row() {
        let mut state = ordered_state(0);
        state.scissor.field = true;
        // Row 2 in field mode reads matrix row 1.
        assert_eq!(dither_noise(&mut state, 0, 2).color, MAGIC[4]);
    }

    #[test]
    fn noise_level_refreshes_noise_first() {
        let mut state = PipelineState::default();
        state.flags.dither_level = 0;
        state.flags.rgba_dither = (2 << 2) | 2;

        let seeds = dither_noise(&mut state, 0, 0);
        assert_eq!(state.noise, 0x20, "noise {:#x}", state.noise);
        assert_eq!(seeds.color, 0x1C1C, "color {:#x}", seeds.color);
        assert_eq!(seeds.alpha, 0);
    }
}
