use log::warn;
use rdp_bits::pixels_to_bytes_special4;
use rdp_lod::TexCoord;
use rdp_rasterizer::Walk;
use rdp_registers::TexelSize;
use rdp_texture::fetch_qword_copy;
use rdp_twin_core::PipelineState;

use super::{Stages, Steps};

/// Bit pairs of the copy write mask, most significant byte first.
const PAIRS: [u8; 4] = [0xC0, 0x30, 0x0C, 0x03];

fn mask_from(values: [i32; 4], thresholds: [i32; 4]) -> u8 {
    (0..4)
        .filter(|&k| values[k] >= thresholds[k])
        .fold(0, |m, k| m | PAIRS[k])
}

/// Which of the eight bytes of a copied word pass alpha compare.
///
/// 16-bit images test the alpha bit of each texel. 8-bit images compare
/// four of the bytes against the blend alpha, or against a random
/// threshold rotated per byte when alpha dither is on.
fn copy_alpha_mask(state: &mut PipelineState, size: TexelSize, qword: u64) -> u8 {
    let modes = state.other_modes;
    if !modes.alpha_compare_en() {
        return 0xFF;
    }

    match size {
        TexelSize::Bits16 => {
            let bits = [48, 32, 16, 0].map(|shift| ((qword >> shift) & 1) as i32);
            mask_from(bits, [1; 4])
        }
        TexelSize::Bits8 => {
            let bytes = [24, 16, 8, 0].map(|shift| ((qword >> shift) & 0xFF) as i32);
            if modes.dither_alpha_en() {
                let t = state.irand() & 0xFF;
                let thresholds = [
                    t,
                    ((t & 0x3) << 6) | (t >> 2),
                    ((t & 0xF) << 4) | (t >> 4),
                    ((t & 0x3F) << 2) | (t >> 6),
                ];
                mask_from(bytes, thresholds)
            } else if qword != 0 {
                mask_from(bytes, [state.blend_color.a; 4])
            } else {
                0
            }
        }
        _ => 0,
    }
}

impl Stages<'_> {
    /// Copy mode: texels move to the colour image 64 bits at a time.
    ///
    /// 32-bit colour images cannot be copied to and hang the pipeline.
    pub(super) fn copy(&mut self, walk: &Walk) {
        let size = self.state.color_image.size;
        if size == TexelSize::Bits32 {
            warn!("copy into a 32-bit colour image");
            self.state.pipeline_crashed = true;
            return;
        }

        let steps = Steps::new(&self.state.deltas, walk.flip);
        let xinc = steps.x;
        let prim_tile = walk.tile;
        let mut tile1 = prim_tile;

        let (fb_advance, bytes_per_pixel): (usize, i32) = match size {
            TexelSize::Bits4 => (8, 1),
            _ => (16 >> size.bits(), 1 << (size.bits() - 1)),
        };
        let size_code = u32::from(size.bits());
        let address = self.state.color_image.address as i32;

        for i in walk.lines() {
            let Some(span) = self.state.spans.get(i).copied().filter(|s| s.valid_line) else {
                continue;
            };
            let row = self.state.fb_width().wrapping_mul(i);
            let mut fbptr = address + pixels_to_bytes_special4(row + span.rx, size_code);
            let fbend = address + pixels_to_bytes_special4(row + span.lx, size_code);
            let length = if walk.flip {
                span.lx - span.rx
            } else {
                span.rx - span.lx
            };

            let mut coord = TexCoord::from_span(&span);
            for _ in (0..=length).step_by(fb_advance) {
                let (mut sss, mut sst) = self.divide(coord);
                rdp_lod::copy(self.state, &mut sss, &mut sst, coord, steps.tex, prim_tile, &mut tile1);

                let fetched = fetch_qword_copy(self.state, self.tmem, sss, sst, tile1 as usize);
                let qword = match size {
                    TexelSize::Bits8 | TexelSize::Bits16 => fetched,
                    _ => 0,
                };
                let alpha_mask = copy_alpha_mask(self.state, size, qword);

                let remaining = if walk.flip {
                    fbend - fbptr + bytes_per_pixel
                } else {
                    fbptr - fbend + bytes_per_pixel
                };
                let mut addr = fbptr;
                for k in (0..8).rev().take(remaining.clamp(0, 8) as usize) {
                    let byte = (qword >> (k * 8)) as u8;
                    if alpha_mask & (1 << k) != 0 {
                        let hidden = if byte & 1 != 0 { 3 } else { 0 };
                        self.rdram.write_pair8(addr as u32, byte, hidden);
                    }
                    addr += xinc;
                }

                coord += steps.tex;
                fbptr += 8 * xinc;
            }
        }
    }
}
