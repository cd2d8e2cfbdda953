//! TMEM loads, texel decode and filtering.

use rdp_lod::{SpanSigs, TexCoord};
use rdp_memory::{Rdram, Tmem};
use rdp_registers::{ImageFormat, TexelSize};
use rdp_texture::*;
use rdp_twin_core::{Color, ImageDesc, PipelineState, Tile, TileAxis};

fn rdram_with(address: u32, halves: &[u16]) -> Rdram {
    let mut rdram = Rdram::new(0x10000);
    let bytes: Vec<u8> = halves.iter().flat_map(|h| h.to_be_bytes()).collect();
    rdram.load(address, &bytes).expect("load fits");
    rdram
}

fn tile(format: ImageFormat, size: TexelSize, line: i32, tmem: i32) -> Tile {
    let mut tile = Tile {
        format,
        size,
        line,
        tmem,
        ..Tile::default()
    };
    tile.compute_derivs();
    tile
}

fn texture_state(width: i32, address: u32) -> PipelineState {
    let mut state = PipelineState::default();
    state.pipeline_crashed = false;
    state.texture_image = ImageDesc {
        format: ImageFormat::Rgba,
        size: TexelSize::Bits16,
        width,
        address,
    };
    state
}

// ============================================================================
// Loads
// ============================================================================

mod load_tests {
    use super::*;

    const TEXELS: [u16; 8] = [0x1111, 0x2222, 0x3333, 0x4444, 0x5555, 0x6666, 0x7777, 0x8888];

    #[test]
    fn load_block_copies_words_in_order() {
        let rdram = rdram_with(0x1000, &TEXELS);
        let mut tmem = Tmem::new();
        let mut state = texture_state(8, 0x1000);
        state.tiles[7] = tile(ImageFormat::Rgba, TexelSize::Bits16, 0, 0);

        load(
            &mut state,
            &rdram,
            &mut tmem,
            LoadRequest {
                kind: LoadKind::Block,
                tile: 7,
                sl: 0,
                tl: 0,
                sh: 7,
                th: 0,
            },
        );

        for (i, &want) in TEXELS.iter().enumerate() {
            let got = tmem.read16_idx(i);
            assert_eq!(got, want, "halfword {i}: {got:#06x}");
        }
        assert_eq!(state.tiles[7].s.high, 7);
        assert_eq!(state.max_level, 0);
    }

    #[test]
    fn load_tile_swaps_odd_rows() {
        // 4x2 image, one TMEM word per row.
        let rdram = rdram_with(0x2000, &TEXELS);
        let mut tmem = Tmem::new();
        let mut state = texture_state(4, 0x2000);
        state.tiles[0] = tile(ImageFormat::Rgba, TexelSize::Bits16, 1, 0);

        load(
            &mut state,
            &rdram,
            &mut tmem,
            LoadRequest {
                kind: LoadKind::Tile,
                tile: 0,
                sl: 0,
                tl: 0,
                sh: 3 << 2,
                th: 1 << 2,
            },
        );

        let row0: Vec<u16> = (0..4).map(|i| tmem.read16_idx(i)).collect();
        let row1: Vec<u16> = (4..8).map(|i| tmem.read16_idx(i)).collect();
        assert_eq!(row0, [0x1111, 0x2222, 0x3333, 0x4444]);
        assert_eq!(row1, [0x7777, 0x8888, 0x5555, 0x6666]);

        // Fetch undoes the swap.
        let t = state.tiles[0];
        assert_eq!(fetch_texel(&tmem, &t, 0, 1), rgba16(0x5555));
        assert_eq!(fetch_texel(&tmem, &t, 3, 1), rgba16(0x8888));
        assert_eq!(state.tiles[0].t.clamp_diff, 1);
    }

    #[test]
    fn load_tlut_quadricates_entries() {
        let palette = [0xF801, 0x07C1, 0x003F, 0xFFFF];
        let rdram = rdram_with(0x3000, &palette);
        let mut tmem = Tmem::new();
        let mut state = texture_state(4, 0x3000);
        state.tiles[7] = tile(ImageFormat::Rgba, TexelSize::Bits4, 0, 256);

        load(
            &mut state,
            &rdram,
            &mut tmem,
            LoadRequest {
                kind: LoadKind::Tlut,
                tile: 7,
                sl: 0,
                tl: 0,
                sh: 3 << 2,
                th: 0,
            },
        );

        for (j, &entry) in palette.iter().enumerate() {
            for copy in 0..4 {
                let got = tmem.read16_idx(0x400 + 4 * j + copy);
                assert_eq!(got, entry, "entry {j} copy {copy}: {got:#06x}");
            }
            assert_eq!(tlut_entry(&tmem, j as i32, false), rgba16(entry));
        }
        assert!(!state.pipeline_crashed);
    }

    #[test]
    fn multi_line_tlut_crashes() {
        let rdram = rdram_with(0x3000, &[0; 8]);
        let mut tmem = Tmem::new();
        let mut state = texture_state(4, 0x3000);
        state.tiles[7] = tile(ImageFormat::Rgba, TexelSize::Bits4, 0, 256);

        load(
            &mut state,
            &rdram,
            &mut tmem,
            LoadRequest {
                kind: LoadKind::Tlut,
                tile: 7,
                sl: 0,
                tl: 0,
                sh: 3 << 2,
                th: 1 << 2,
            },
        );
        assert!(state.pipeline_crashed);
        assert!(tmem.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn four_bit_source_crashes() {
        let rdram = rdram_with(0x1000, &TEXELS);
        let mut tmem = Tmem::new();
        let mut state = texture_state(8, 0x1000);
        state.texture_image.size = TexelSize::Bits4;

        load(
            &mut state,
            &rdram,
            &mut tmem,
            LoadRequest {
                kind: LoadKind::Block,
                tile: 0,
                sl: 0,
                tl: 0,
                sh: 7,
                th: 0,
            },
        );
        assert!(state.pipeline_crashed);
    }
}

// ============================================================================
// Texel decode
// ============================================================================

mod fetch_tests {
    use super::*;

    #[test]
    fn rgba16_widens_channels() {
        assert_eq!(rgba16(0xF801), Color::new(0xFF, 0, 0, 0xFF));
        assert_eq!(rgba16(0x07C0), Color::new(0, 0xFF, 0, 0));
        assert_eq!(rgba16(0x0842), Color::new(8, 8, 8, 0));
    }

    #[test]
    fn ia8_splits_nibbles() {
        let mut tmem = Tmem::new();
        tmem.write8(0, 0xA5);
        let t = tile(ImageFormat::IntensityAlpha, TexelSize::Bits8, 1, 0);
        assert_eq!(fetch_texel(&tmem, &t, 0, 0), Color::new(0xAA, 0xAA, 0xAA, 0x55));
    }

    #[test]
    fn ia4_expands_three_bit_intensity() {
        let mut tmem = Tmem::new();
        tmem.write8(0, 0xB3);
        let t = tile(ImageFormat::IntensityAlpha, TexelSize::Bits4, 1, 0);
        assert_eq!(fetch_texel(&tmem, &t, 0, 0), Color::new(0xB6, 0xB6, 0xB6, 0xFF));
        assert_eq!(fetch_texel(&tmem, &t, 1, 0), Color::new(0x24, 0x24, 0x24, 0xFF));
    }

    #[test]
    fn i4_on_odd_row() {
        let mut tmem = Tmem::new();
        // Row 1 starts at byte 8; the odd-row swap moves it to 12.
        tmem.write8(12, 0x7C);
        let t = tile(ImageFormat::Intensity, TexelSize::Bits4, 1, 0);
        assert_eq!(fetch_texel(&tmem, &t, 0, 1), Color::splat(0x77));
        assert_eq!(fetch_texel(&tmem, &t, 1, 1), Color::splat(0xCC));
    }

    #[test]
    fn rgba32_reads_both_planes() {
        let mut tmem = Tmem::new();
        tmem.write16_idx(1, 0x1234);
        tmem.write16_idx(0x401, 0x5678);
        let t = tile(ImageFormat::Rgba, TexelSize::Bits32, 2, 0);
        assert_eq!(fetch_texel(&tmem, &t, 1, 0), Color::new(0x12, 0x34, 0x56, 0x78));
    }

    #[test]
    fn ci4_prefixes_palette() {
        let mut tmem = Tmem::new();
        tmem.write8(0, 0x90);
        let mut t = tile(ImageFormat::ColorIndex, TexelSize::Bits4, 1, 0);
        t.palette = 5;
        assert_eq!(fetch_texel(&tmem, &t, 0, 0), Color::splat(0x59));
        assert_eq!(fetch_index(&tmem, &t, 0, 0), 0x59);
        assert_eq!(fetch_index(&tmem, &t, 1, 0), 0x50);
    }

    #[test]
    fn ci16_index_is_high_byte() {
        let mut tmem = Tmem::new();
        tmem.write16_idx(2, 0xAB12);
        let t = tile(ImageFormat::ColorIndex, TexelSize::Bits16, 1, 0);
        assert_eq!(fetch_index(&tmem, &t, 2, 0), 0xAB);
    }

    #[test]
    fn ia_palette_entry() {
        let mut tmem = Tmem::new();
        tmem.write16_idx(0x400 + (9 << 2), 0x80C0);
        assert_eq!(tlut_entry(&tmem, 9, true), Color::new(0x80, 0x80, 0x80, 0xC0));
    }
}

// ============================================================================
// Texture cycle
// ============================================================================

mod cycle_tests {
    use super::*;

    /// 4x2 texel tile of the given format, rows 0 and 1 in bounds.
    fn cycle_state(format: ImageFormat, size: TexelSize) -> PipelineState {
        let mut state = PipelineState::default();
        let mut t = Tile {
            format,
            size,
            line: 1,
            tmem: 0,
            s: TileAxis {
                high: 3 << 2,
                ..TileAxis::default()
            },
            t: TileAxis {
                high: 1 << 2,
                ..TileAxis::default()
            },
            ..Tile::default()
        };
        t.compute_clamp_diffs();
        t.compute_derivs();
        state.tiles[0] = t;
        state
    }

    #[test]
    fn point_sample_without_filter() {
        let mut state = cycle_state(ImageFormat::Rgba, TexelSize::Bits16);
        state.other_modes.set_bi_lerp_0(true);
        let mut tmem = Tmem::new();
        tmem.write16_idx(2, 0xF801);
        tmem.write16_idx(3, 0x07C0);

        let c = pipeline_cycle(&state, &tmem, Color::ZERO, 2 << 5, 0, 0, 0);
        assert_eq!(c, Color::new(0xFF, 0, 0, 0xFF));

        // Past the high bound S clamps to the last texel.
        let c = pipeline_cycle(&state, &tmem, Color::ZERO, 10 << 5, 0, 0, 0);
        assert_eq!(c, Color::new(0, 0xFF, 0, 0));
    }

    fn bilinear_tmem() -> Tmem {
        let mut tmem = Tmem::new();
        tmem.write16_idx(0, 0x0000);
        tmem.write16_idx(1, 0x4040);
        // Row 1 is word swapped.
        tmem.write16_idx(6, 0x8080);
        tmem.write16_idx(7, 0xC0C0);
        tmem
    }

    #[test]
    fn bilinear_lower_triangle() {
        let mut state = cycle_state(ImageFormat::IntensityAlpha, TexelSize::Bits16);
        state.other_modes.set_sample_type(true);
        state.other_modes.set_bi_lerp_0(true);
        let tmem = bilinear_tmem();

        let c = pipeline_cycle(&state, &tmem, Color::ZERO, 0x08, 0x10, 0, 0);
        assert_eq!(c, Color::splat(0x50), "{c:x?}");
    }

    #[test]
    fn bilinear_upper_triangle() {
        let mut state = cycle_state(ImageFormat::IntensityAlpha, TexelSize::Bits16);
        state.other_modes.set_sample_type(true);
        state.other_modes.set_bi_lerp_0(true);
        let tmem = bilinear_tmem();

        let c = pipeline_cycle(&state, &tmem, Color::ZERO, 0x18, 0x10, 0, 0);
        assert_eq!(c, Color::splat(0x70), "{c:x?}");
    }

    #[test]
    fn nearest_palette_lookup() {
        let mut state = cycle_state(ImageFormat::ColorIndex, TexelSize::Bits8);
        state.other_modes.set_en_tlut(true);
        state.other_modes.set_bi_lerp_0(true);
        let mut tmem = Tmem::new();
        tmem.write8(0, 3);
        tmem.write16_idx(0x400 + (3 << 2), 0xF801);

        let c = pipeline_cycle(&state, &tmem, Color::ZERO, 0x08, 0x08, 0, 0);
        assert_eq!(c, Color::new(0xFF, 0, 0, 0xFF));
    }

    #[test]
    fn conversion_takes_luma_from_blue() {
        // Zero coefficients leave only the luma term.
        let state = cycle_state(ImageFormat::IntensityAlpha, TexelSize::Bits16);
        let mut tmem = Tmem::new();
        tmem.write16_idx(0, 0x8040);

        let c = pipeline_cycle(&state, &tmem, Color::ZERO, 0, 0, 0, 0);
        assert_eq!(c, Color::splat(0x80));
    }

    #[test]
    fn second_cycle_convert_passes_previous_blue() {
        let mut state = cycle_state(ImageFormat::Rgba, TexelSize::Bits16);
        state.other_modes.set_convert_one(true);
        state.other_modes.set_bi_lerp_1(true);
        let tmem = Tmem::new();

        let prev = Color::new(1, 2, 0x33, 4);
        assert_eq!(pipeline_cycle(&state, &tmem, prev, 0, 0, 0, 1), Color::splat(0x33));
    }

    #[test]
    fn texel1_coordinate_steps_or_drops_a_line() {
        let mut state = PipelineState::default();
        let coord = TexCoord::new(0x100 << 16, 0x20 << 16, 0);
        let inc = TexCoord::new(0x20 << 16, 0, 0);

        let plain = texel1_coord_1cycle(&state, coord, inc, 0, &SpanSigs::default());
        assert_eq!(plain, (0x120, 0x20));

        if let Some(below) = state.spans.get_mut(1) {
            below.valid_line = true;
            below.s = 0x400 << 16;
            below.t = 0x21 << 16;
        }
        let sigs = SpanSigs {
            end_span: true,
            long_span: true,
            ..SpanSigs::default()
        };
        assert_eq!(texel1_coord_1cycle(&state, coord, inc, 0, &sigs), (0x400, 0x21));
    }
}

// ============================================================================
// Copy mode
// ============================================================================

mod copy_tests {
    use super::*;

    fn copy_state(tile0: Tile) -> PipelineState {
        let mut state = PipelineState::default();
        state.tiles[0] = tile0;
        state
    }

    fn halves(tmem: &mut Tmem, values: &[u16]) {
        for (i, &v) in values.iter().enumerate() {
            tmem.write16_idx(i, v);
        }
    }

    #[test]
    fn rgba16_four_halfwords() {
        let state = copy_state(tile(ImageFormat::Rgba, TexelSize::Bits16, 0, 0));
        let mut tmem = Tmem::new();
        halves(&mut tmem, &[0x1111, 0x2222, 0x3333, 0x4444, 0x5555, 0x6666]);

        let q = fetch_qword_copy(&state, &tmem, 0, 0, 0);
        assert_eq!(q, 0x1111_2222_3333_4444, "{q:#018x}");
        let q = fetch_qword_copy(&state, &tmem, 2 << 5, 0, 0);
        assert_eq!(q, 0x3333_4444_5555_6666, "{q:#018x}");
    }

    #[test]
    fn mask_wraps_lanes() {
        let mut t = tile(ImageFormat::Rgba, TexelSize::Bits16, 0, 0);
        t.s.mask = 2;
        t.compute_derivs();
        let state = copy_state(t);
        let mut tmem = Tmem::new();
        halves(&mut tmem, &[0x1111, 0x2222, 0x3333, 0x4444]);

        let q = fetch_qword_copy(&state, &tmem, 2 << 5, 0, 0);
        assert_eq!(q, 0x3333_4444_1111_2222, "{q:#018x}");
    }

    #[test]
    fn i8_eight_texels() {
        let state = copy_state(tile(ImageFormat::Intensity, TexelSize::Bits8, 0, 0));
        let mut tmem = Tmem::new();
        for i in 0..8 {
            tmem.write8(i, 0x10 + i as u8);
        }
        let q = fetch_qword_copy(&state, &tmem, 0, 0, 0);
        assert_eq!(q, 0x1011_1213_1415_1617, "{q:#018x}");
    }

    #[test]
    fn ci4_takes_palette() {
        let mut t = tile(ImageFormat::ColorIndex, TexelSize::Bits4, 0, 0);
        t.palette = 2;
        let state = copy_state(t);
        let mut tmem = Tmem::new();
        tmem.write8(0, 0x9F);

        let q = fetch_qword_copy(&state, &tmem, 0, 0, 0);
        assert_eq!(q >> 48, 0x292F, "{q:#018x}");
    }

    #[test]
    fn tlut_replaces_indices() {
        let mut state = copy_state(tile(ImageFormat::ColorIndex, TexelSize::Bits8, 0, 0));
        state.other_modes.set_en_tlut(true);
        let mut tmem = Tmem::new();
        tmem.write8(0, 3);
        tmem.write8(1, 5);
        tmem.write16_idx(0x400 + (3 << 2), 0xF801);
        tmem.write16_idx(0x400 + (5 << 2), 0x07C0);

        let q = fetch_qword_copy(&state, &tmem, 0, 0, 0);
        assert_eq!(q, 0xF801_07C0_0000_0000, "{q:#018x}");
    }

    #[test]
    fn rgba32_reads_as_ones() {
        let state = copy_state(tile(ImageFormat::Rgba, TexelSize::Bits32, 0, 0));
        assert_eq!(fetch_qword_copy(&state, &Tmem::new(), 0, 0, 0), u64::MAX);
    }

    #[test]
    fn replicate_widens_small_texels() {
        let ia4 = tile(ImageFormat::IntensityAlpha, TexelSize::Bits4, 0, 0);
        assert_eq!(replicate_for_copy(&ia4, 0xB), 0xB6);
        let i4 = tile(ImageFormat::Intensity, TexelSize::Bits4, 0, 0);
        assert_eq!(replicate_for_copy(&i4, 0x7), 0x77);
        let ia8 = tile(ImageFormat::IntensityAlpha, TexelSize::Bits8, 0, 0);
        assert_eq!(replicate_for_copy(&ia8, 0xA5), 0xAA);
        let i8 = tile(ImageFormat::Intensity, TexelSize::Bits8, 0, 0);
        assert_eq!(replicate_for_copy(&i8, 0xA5), 0xA5);
    }
}
