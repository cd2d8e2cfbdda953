use rdp_bits::tile_relative;
use rdp_memory::Tmem;
use rdp_registers::{ImageFormat, TexelSize};
use rdp_tex_coord::{mask_copy, shift_copy};
use rdp_twin_core::{PipelineState, Tile};

use crate::fetch::{byte, half, index_row, nibble, row_base, tlut_raw};

/// Widen a 4 or 8-bit texel to the byte copy mode writes.
///
/// `texel` is the raw nibble or byte. Colour-index nibbles take the tile
/// palette as their high bits. 32-bit texels have no byte form and read
/// as 0xFF.
#[must_use]
pub fn replicate_for_copy(tile: &Tile, texel: i32) -> u8 {
    let out = match tile.size {
        TexelSize::Bits4 => {
            let n = texel & 0xF;
            match tile.format {
                ImageFormat::ColorIndex => (tile.palette << 4) | n,
                ImageFormat::IntensityAlpha => {
                    let b = (n << 4) | n;
                    (b & 0xE0) | ((b & 0xE0) >> 3) | ((b & 0xC0) >> 6)
                }
                _ => (n << 4) | n,
            }
        }
        TexelSize::Bits8 => {
            if tile.format == ImageFormat::IntensityAlpha {
                (texel & 0xF0) | ((texel >> 4) & 0xF)
            } else {
                texel
            }
        }
        TexelSize::Bits16 | TexelSize::Bits32 => 0xFF,
    };
    out as u8
}

fn pack16(shorts: [i32; 4]) -> u64 {
    shorts
        .iter()
        .fold(0, |q, &h| (q << 16) | u64::from(h as u16))
}

/// Fetch the 64 bits copy mode moves per step, starting at texel `(s,
/// t)` of tile `tile_idx`.
///
/// 16-bit texels and palette entries fill the word as four halfwords.
/// Smaller texels are widened to one byte each, eight texels per word.
#[must_use]
pub fn fetch_qword_copy(state: &PipelineState, tmem: &Tmem, s: i32, t: i32, tile_idx: usize) -> u64 {
    let tile = &state.tiles[tile_idx & 7];
    let (s, t) = shift_copy(tile, s, t);
    let s = tile_relative(s, tile.s.low) >> 5;
    let t = tile_relative(t, tile.t.low) >> 5;
    let (near, t) = mask_copy(tile, [s, s + 1, s + 2, s + 3], t);
    let tbase = row_base(tile, t);

    if state.other_modes.en_tlut() {
        return pack16(near.map(|s| tlut_raw(tmem, index_row(tmem, tile, tbase, s, t))));
    }

    match tile.size {
        TexelSize::Bits16 => pack16(near.map(|s| half(tmem, tbase, s, t, 0x7FF))),
        TexelSize::Bits32 => u64::MAX,
        TexelSize::Bits4 | TexelSize::Bits8 => {
            let (far, _) = mask_copy(tile, [s + 4, s + 5, s + 6, s + 7], t);
            let texel = |s: i32| {
                let raw = if tile.size == TexelSize::Bits4 {
                    nibble(tmem, tbase, s, t, 0xFFF)
                } else {
                    byte(tmem, tbase, s, t, 0xFFF)
                };
                replicate_for_copy(tile, raw)
            };
            near.iter()
                .chain(far.iter())
                .fold(0, |q, &s| (q << 8) | u64::from(texel(s)))
        }
    }
}
