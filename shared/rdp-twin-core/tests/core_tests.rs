//! Colour packing, tile derived fields and span table scratch behaviour.

use rdp_registers::{ImageFormat, TexelSize};
use rdp_twin_core::{mask_bits, Color, PipelineState, SpanTable, Tile, SPAN_LINES};

// ============================================================================
// Colour
// ============================================================================

mod color_tests {
    use super::*;

    #[test]
    fn display_is_eight_hex_digits() {
        let c = Color::from_u32(0xDEAD_BABE);
        assert_eq!(c.to_string(), "DEADBABE");
        assert_eq!(Color::ZERO.to_string(), "00000000");
    }

    #[test]
    fn u32_round_trip_keeps_low_bytes() {
        let c = Color::new(0x1DE, 0xAD, 0xBA, 0xBE);
        assert_eq!(c.to_u32(), 0xDEAD_BABE, "got {:#010x}", c.to_u32());
    }

    #[test]
    fn rgba5551_expands_to_top_of_byte() {
        let white = Color::from_rgba5551(0xFFFF);
        assert_eq!(white, Color::new(0xF8, 0xF8, 0xF8, 1));

        let red = Color::from_rgba5551(0xF800);
        assert_eq!(red, Color::new(0xF8, 0, 0, 0));

        let blue_cvg = Color::from_rgba5551(0x003F);
        assert_eq!(blue_cvg, Color::new(0, 0, 0xF8, 1));
    }

    #[test]
    fn set_rgb_leaves_alpha() {
        let mut c = Color::from_u32(0x1122_3344);
        c.set_rgb(0x80);
        assert_eq!(c.to_u32(), 0x8080_8044);
    }
}

// ============================================================================
// Tile descriptors
// ============================================================================

mod tile_tests {
    use super::*;

    #[test]
    fn mask_bits_table() {
        assert_eq!(mask_bits(0), 0x3FF);
        assert_eq!(mask_bits(1), 0x1);
        assert_eq!(mask_bits(5), 0x1F);
        assert_eq!(mask_bits(10), 0x3FF);
        assert_eq!(mask_bits(15), 0x3FF, "masks beyond 10 saturate");
    }

    #[test]
    fn clamp_diff_follows_new_bounds() {
        let mut tile = Tile::default();
        tile.s.low = 1 << 2;
        tile.s.high = 100 << 2;
        tile.t.low = 2 << 2;
        tile.t.high = 70 << 2;
        tile.compute_clamp_diffs();
        assert_eq!(tile.s.clamp_diff, 99);
        assert_eq!(tile.t.clamp_diff, 68);

        tile.s.high = 20 << 2;
        tile.compute_clamp_diffs();
        assert_eq!(tile.s.clamp_diff, 19, "stale clamp diff after bounds change");
    }

    #[test]
    fn derivs_select_clamp_and_switches() {
        let mut tile = Tile {
            format: ImageFormat::ColorIndex,
            size: TexelSize::Bits8,
            ..Tile::default()
        };
        tile.s.mask = 12;
        tile.t.mask = 0;
        tile.compute_derivs();

        assert!(!tile.s.rdp_clamp);
        assert!(tile.t.rdp_clamp, "zero mask forces clamping");
        assert_eq!(tile.s.clamped_mask, 10);
        assert_eq!(tile.non_tlut_switch, (2 << 2) | 1);
        assert_eq!(tile.tlut_switch, (1 << 2) | 0);
    }

    #[test]
    fn reserved_formats_use_fallback_switch() {
        let mut tile = Tile {
            format: ImageFormat::Reserved6,
            size: TexelSize::Bits16,
            ..Tile::default()
        };
        tile.compute_derivs();
        assert_eq!(tile.non_tlut_switch, 0x12);
        assert_eq!(tile.tlut_switch, 0xA);
    }

    #[test]
    fn mirror_reflects_odd_repeats() {
        let mut tile = Tile::default();
        tile.s.mask = 5;
        tile.s.mirror = true;
        tile.t.mask = 5;
        tile.compute_derivs();

        assert_eq!(tile.mask(3, 3), (3, 3));
        assert_eq!(tile.mask(0x23, 0x23), (0x1C, 0x03));
    }
}

// ============================================================================
// Scratch state
// ============================================================================

mod scratch_tests {
    use super::*;

    #[test]
    fn span_table_clear_drops_previous_primitive() {
        let mut spans = SpanTable::default();
        if let Some(span) = spans.get_mut(12) {
            span.valid_line = true;
            span.lx = 40;
        }
        assert!(spans.is_valid(12));

        spans.clear();
        assert!(!spans.is_valid(12));
        assert_eq!(spans.get(12).map(|s| s.lx), Some(0));
    }

    #[test]
    fn span_table_bounds() {
        let spans = SpanTable::default();
        assert!(spans.get(-1).is_none());
        assert!(spans.get(SPAN_LINES as i32).is_none());
        assert!(spans.get(SPAN_LINES as i32 - 1).is_some());
    }

    #[test]
    fn power_on_state() {
        let state = PipelineState::default();
        assert_eq!(state.scissor.xh, 0x2000);
        assert_eq!(state.scissor.yh, 0x2000);
        assert!(state.flags.stale);
        assert!(state.pipeline_crashed);
        assert_eq!(state.random.seed(), 3);
    }
}
