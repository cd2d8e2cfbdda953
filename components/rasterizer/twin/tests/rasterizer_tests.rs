//! Edge walking, scissoring and the per-pixel attribute corrections.

use rdp_commands::{decode, triangle_from_bytes, CommandKind};
use rdp_rasterizer::*;
use rdp_twin_core::{Color, PipelineState, Scissor, SpanDeltas};
use rdp_zbuf::Z_MAX;

fn list(words: &[u64]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// 320x240 scissor in 10.2.
fn screen() -> Scissor {
    Scissor {
        xh: 0,
        yh: 0,
        xl: 320 << 2,
        yl: 240 << 2,
        field: false,
        keep_odd: false,
    }
}

fn state_with(scissor: Scissor) -> PipelineState {
    let mut state = PipelineState::default();
    state.scissor = scissor;
    state
}

/// Right-major fill triangle covering x 2..6 over y 1.0..3.75.
fn box_edges(opcode: u64, flip: bool) -> Vec<u64> {
    let head = (opcode << 56) | (u64::from(flip) << 55) | (15 << 32) | (15 << 16) | 4;
    let (major, minor) = if flip { (2u64, 6u64) } else { (6, 2) };
    vec![head, minor << 48, major << 48, minor << 48]
}

fn walk_words(state: &mut PipelineState, words: &[u64]) -> Walk {
    let bytes = list(words);
    let (cmd, _) = decode(&bytes, 0).expect("decode");
    let CommandKind::Triangle(tri) = cmd.kind() else {
        panic!("not a triangle");
    };
    walk_edges(state, &tri)
}

// ============================================================================
// Span bounds
// ============================================================================

mod bounds_tests {
    use super::*;

    #[test]
    fn flipped_box() {
        let mut state = state_with(screen());
        let walk = walk_words(&mut state, &box_edges(0x08, true));
        assert!(walk.flip);
        assert_eq!(walk.lines(), 1..=3);

        for line in 1..=3 {
            let span = state.spans.get(line).expect("span");
            assert!(span.valid_line, "line {line}");
            assert_eq!((span.lx, span.rx), (6, 2), "line {line}");
            assert_eq!(span.unscrx, 2);
            assert_eq!(span.majorx, [16; 4], "10.3 major edge");
            assert_eq!(span.minorx, [48; 4], "10.3 minor edge");
        }
        assert!(!state.spans.is_valid(0));
        assert!(!state.spans.is_valid(4));
    }

    #[test]
    fn last_sub_scanline_excluded() {
        let mut state = state_with(screen());
        walk_words(&mut state, &box_edges(0x08, true));
        let span = state.spans.get(3).expect("span");
        assert_eq!(span.invalid_y_scan, [false, false, false, true]);
        let span = state.spans.get(1).expect("span");
        assert_eq!(span.invalid_y_scan, [false; 4]);
    }

    #[test]
    fn unflipped_box() {
        let mut state = state_with(screen());
        let walk = walk_words(&mut state, &box_edges(0x08, false));
        assert!(!walk.flip);
        let span = state.spans.get(2).expect("span");
        assert!(span.valid_line);
        assert_eq!((span.lx, span.rx), (2, 6));
        assert_eq!(span.unscrx, 6);
        assert_eq!(span.majorx, [48; 4]);
        assert_eq!(span.minorx, [16; 4]);
    }

    #[test]
    fn crossed_edges_are_empty() {
        // Major edge on the wrong side for the flip bit.
        let mut words = box_edges(0x08, false);
        words[0] |= 1 << 55;
        let mut state = state_with(screen());
        walk_words(&mut state, &words);
        for line in 1..=3 {
            assert!(!state.spans.is_valid(line), "line {line}");
        }
    }

    #[test]
    fn previous_primitive_cleared() {
        let mut state = state_with(screen());
        if let Some(span) = state.spans.get_mut(10) {
            span.valid_line = true;
        }
        walk_words(&mut state, &box_edges(0x08, true));
        assert!(!state.spans.is_valid(10));
    }

    #[test]
    fn fill_rectangle_rows() {
        // 320x240 fill: xl 319.0, yl 239.0 in 10.2.
        let bytes = list(&[0x364F_C3BC_0000_0000]);
        let (cmd, _) = decode(&bytes, 0).expect("decode");
        let CommandKind::FillRectangle(rect) = cmd.kind() else {
            panic!("not a fill rectangle");
        };
        let edges = rect.to_triangle(true);
        let tri = triangle_from_bytes(&edges, false);

        let mut state = state_with(screen());
        let walk = walk_edges(&mut state, &tri);
        assert_eq!(walk.lines(), 0..=239);
        let span = state.spans.get(239).expect("span");
        assert!(span.valid_line);
        assert_eq!((span.lx, span.rx), (319, 0));
        assert!(!state.spans.is_valid(240));
    }
}

// ============================================================================
// Scissor
// ============================================================================

mod scissor_tests {
    use super::*;

    #[test]
    fn right_edge_clamped() {
        let mut state = state_with(Scissor {
            xl: 4 << 2,
            ..screen()
        });
        walk_words(&mut state, &box_edges(0x08, true));
        let span = state.spans.get(1).expect("span");
        assert!(span.valid_line);
        assert_eq!((span.lx, span.rx), (4, 2));
        assert_eq!(span.minorx, [32; 4]);
        assert_eq!(span.unscrx, 2, "unscissored edge unchanged");
    }

    #[test]
    fn box_left_of_scissor() {
        let mut state = state_with(Scissor {
            xh: 8 << 2,
            ..screen()
        });
        walk_words(&mut state, &box_edges(0x08, true));
        for line in 1..=3 {
            assert!(!state.spans.is_valid(line), "line {line}");
        }
    }

    #[test]
    fn vertical_limits() {
        let mut state = state_with(Scissor {
            yh: 2 << 2,
            yl: 3 << 2,
            ..screen()
        });
        let walk = walk_words(&mut state, &box_edges(0x08, true));
        assert_eq!(walk.lines(), 2..=3);
        assert!(!state.spans.is_valid(1));
        assert!(state.spans.is_valid(2));
        assert!(!state.spans.is_valid(3));
    }

    #[test]
    fn field_keeps_even_lines() {
        let mut state = state_with(Scissor {
            field: true,
            keep_odd: false,
            ..screen()
        });
        walk_words(&mut state, &box_edges(0x08, true));
        assert!(!state.spans.is_valid(1));
        assert!(state.spans.is_valid(2));
        assert!(!state.spans.is_valid(3));

        let mut state = state_with(Scissor {
            field: true,
            keep_odd: true,
            ..screen()
        });
        walk_words(&mut state, &box_edges(0x08, true));
        assert!(state.spans.is_valid(1));
        assert!(!state.spans.is_valid(2));
        assert!(state.spans.is_valid(3));
    }

    #[test]
    fn reset_scissor_rejects_everything() {
        let mut state = PipelineState::default();
        walk_words(&mut state, &box_edges(0x08, true));
        for line in 0..=4 {
            assert!(!state.spans.is_valid(line), "line {line}");
        }
    }
}

// ============================================================================
// Attribute setup
// ============================================================================

mod attribute_tests {
    use super::*;

    /// Texture rectangle from (0.5, 0) to (10, 5) on tile 3, s 1.0 t 2.0
    /// with dsdx 1.0 and dtdy 0.5.
    fn texture_rect(state: &mut PipelineState) -> Walk {
        let bytes = list(&[0x2402_8014_0300_2000, 0x0020_0040_0400_0200]);
        let (cmd, _) = decode(&bytes, 0).expect("decode");
        let CommandKind::TextureRectangle(rect) = cmd.kind() else {
            panic!("not a texture rectangle");
        };
        let edges = rect.to_triangle(false);
        let tri = triangle_from_bytes(&edges, true);
        walk_edges(state, &tri)
    }

    #[test]
    fn texture_rectangle_steps_t_per_line() {
        let mut state = state_with(screen());
        let walk = texture_rect(&mut state);
        assert_eq!(walk.tile, 3);
        assert_eq!(walk.lines(), 0..=5);

        for line in 0..5 {
            let span = state.spans.get(line).expect("span");
            assert!(span.valid_line, "line {line}");
            assert_eq!((span.lx, span.rx), (10, 0));
            let t = 0x40_0000 + line * 0x10_0000;
            assert_eq!(span.t, t, "line {line}: {:#x}", span.t);
        }
        assert!(!state.spans.is_valid(5));
        assert_eq!(state.deltas.ds, 0x20_0000);
        assert_eq!(state.deltas.dt, 0);
        assert_eq!(state.deltas.dtdy, 0x10_0000);
    }

    #[test]
    fn subpixel_edge_pulls_start_back() {
        // The major edge sits half a pixel in, so s starts half a texel
        // before 1.0.
        let mut state = state_with(screen());
        texture_rect(&mut state);
        let span = state.spans.get(0).expect("span");
        assert_eq!(span.s, 0x10_0000, "{:#x}", span.s);
        assert_eq!(span.majorx, [4; 4]);
    }

    #[test]
    fn depth_deltas() {
        let mut words = box_edges(0x09, true);
        words.push(0x0100_0000_0002_0000);
        words.push(0x0000_0000_FFFD_0000);
        let mut state = state_with(screen());
        walk_words(&mut state, &words);

        let d = &state.deltas;
        assert_eq!(d.dz, 0x2_0000);
        assert_eq!(d.cdz, 0x80);
        assert_eq!(d.dzdy, -0xC0);
        // |2| + |-3| rounds up to the next power of two.
        assert_eq!(d.dzpix, 8);
        let span = state.spans.get(1).expect("span");
        assert_eq!(span.z, 0x0100_0000, "{:#x}", span.z);
    }

    #[test]
    fn mip_levels_latched() {
        let mut words = box_edges(0x08, true);
        words[0] |= 5 << 51;
        let mut state = state_with(screen());
        walk_words(&mut state, &words);
        assert_eq!(state.max_level, 5);
    }
}

// ============================================================================
// Per-pixel corrections
// ============================================================================

mod correct_tests {
    use super::*;

    #[test]
    fn full_coverage_shade_clamps() {
        let mut state = PipelineState::default();
        rgba_correct(&mut state, 0, 0, [0x3FC, 0x200, 0x400, 0x7FC], 8);
        assert_eq!(state.shade, Color::new(0xFF, 0x80, 0xFF, 0x00), "{}", state.shade);
    }

    #[test]
    fn partial_coverage_moves_shade() {
        let mut state = PipelineState::default();
        state.deltas.cdr = 8;
        state.deltas.drdy = -4;
        rgba_correct(&mut state, 1, 2, [0x100, 0x200, 0, 0], 4);
        assert_eq!(state.shade.r, 0x40, "{:#x}", state.shade.r);
        assert_eq!(state.shade.g, 0x80, "{:#x}", state.shade.g);
    }

    #[test]
    fn depth_at_full_coverage() {
        let d = SpanDeltas::default();
        assert_eq!(z_correct(&d, 0, 0, 0x1000, 8), 0x200);
    }

    #[test]
    fn depth_moves_to_sample() {
        let d = SpanDeltas {
            cdz: 4,
            dzdy: 2,
            ..SpanDeltas::default()
        };
        assert_eq!(z_correct(&d, 3, 1, 0x100, 5), 0x20);
    }

    #[test]
    fn depth_clamps() {
        let d = SpanDeltas::default();
        assert_eq!(z_correct(&d, 0, 0, 0x2_0000 << 3, 8), 0x2_0000);
        assert_eq!(z_correct(&d, 0, 0, 0x4_0000 << 3, 8), Z_MAX);
        assert_eq!(z_correct(&d, 0, 0, -8, 8), 0);
    }
}
