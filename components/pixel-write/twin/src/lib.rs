//! Colour image access.
//!
//! The blender reads the stored colour and coverage of each pixel before
//! blending, and the final colour is committed back with the coverage
//! value chosen by the coverage destination mode. Fill mode bypasses the
//! pipeline and replicates the fill colour register.
//!
//! Pixels are addressed by index from the colour image origin. 16-bit
//! pixels keep three bits of coverage: one in the low bit of the word and
//! two in the RDRAM hidden bits. 32-bit pixels keep it in bits 5..7.

use log::warn;
use rdp_memory::Rdram;
use rdp_registers::{ImageFormat, TexelSize};
use rdp_twin_core::{Color, PipelineState};

/// Memory alpha when the image read is disabled: full coverage.
const FULL_ALPHA: i32 = 0xE0;

/// Stored colour and coverage of the pixel at `curpixel`.
#[must_use]
pub fn read(state: &PipelineState, rdram: &Rdram, curpixel: u32) -> (Color, u32) {
    let image = &state.color_image;
    let image_read = state.other_modes.image_read_en();

    match image.size {
        TexelSize::Bits4 => (Color::new(0, 0, 0, FULL_ALPHA), 7),
        TexelSize::Bits8 => {
            let v = i32::from(rdram.read_idx8(image.address.wrapping_add(curpixel)));
            (Color::new(v, v, v, FULL_ALPHA), 7)
        }
        TexelSize::Bits16 => {
            let index = (image.address >> 1).wrapping_add(curpixel);
            let rgb = |word: u16| {
                if image.format == ImageFormat::Rgba {
                    Color::from_rgba5551(word)
                } else {
                    let v = i32::from(word >> 8);
                    Color::new(v, v, v, 0)
                }
            };
            if image_read {
                let (word, hidden) = rdram.read_pair16(index);
                let cvg = if image.format == ImageFormat::Rgba {
                    (u32::from(word & 1) << 2) | u32::from(hidden)
                } else {
                    u32::from(word >> 5) & 7
                };
                let mut c = rgb(word);
                c.a = (cvg << 5) as i32;
                (c, cvg)
            } else {
                let mut c = rgb(rdram.read_idx16(index));
                c.a = FULL_ALPHA;
                (c, 7)
            }
        }
        TexelSize::Bits32 => {
            let index = (image.address >> 2).wrapping_add(curpixel);
            let word = rdram.read_idx32(index);
            let mut c = Color::from_u32(word);
            if image_read {
                c.a = (word & 0xE0) as i32;
                (c, (word >> 5) & 7)
            } else {
                c.a = FULL_ALPHA;
                (c, 7)
            }
        }
    }
}

/// One cycle mode read into the memory colour. Returns memory coverage.
pub fn read_cycle1(state: &mut PipelineState, rdram: &Rdram, curpixel: u32) -> u32 {
    let (c, cvg) = read(state, rdram, curpixel);
    state.memory = c;
    cvg
}

/// Two cycle mode read, one pixel ahead, into the prefetched memory
/// colour. Returns memory coverage.
pub fn read_cycle2(state: &mut PipelineState, rdram: &Rdram, curpixel: u32) -> u32 {
    let (c, cvg) = read(state, rdram, curpixel);
    state.pre_memory = c;
    cvg
}

/// Commit a blended colour with its final coverage.
pub fn write(
    state: &PipelineState,
    rdram: &mut Rdram,
    curpixel: u32,
    [r, g, b]: [i32; 3],
    enable_blend: bool,
    cvg: u32,
    memcvg: u32,
) {
    let image = &state.color_image;
    let dest = state.other_modes.cvg_dest();

    match image.size {
        TexelSize::Bits4 => rdram.write_idx8(image.address.wrapping_add(curpixel), 0),
        TexelSize::Bits8 => {
            let hidden = if r & 1 != 0 { 3 } else { 0 };
            rdram.write_pair8(image.address.wrapping_add(curpixel), r as u8, hidden);
        }
        TexelSize::Bits16 => {
            let index = (image.address >> 1).wrapping_add(curpixel);
            let mut final_cvg = rdp_coverage::finalize(dest, enable_blend, cvg, memcvg);
            let color = if image.format == ImageFormat::Rgba {
                (((r & !7) << 8) | ((g & !7) << 3) | ((b & !7) >> 2)) as u32
            } else {
                let color = ((r as u32) << 8) | (final_cvg << 5);
                final_cvg = 0;
                color
            };
            rdram.write_pair16(index, (color | (final_cvg >> 2)) as u16, (final_cvg & 3) as u8);
        }
        TexelSize::Bits32 => {
            let index = (image.address >> 2).wrapping_add(curpixel);
            let final_cvg = rdp_coverage::finalize(dest, enable_blend, cvg, memcvg);
            let color = ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (final_cvg << 5);
            let hidden = if g & 1 != 0 { 3 } else { 0 };
            rdram.write_pair32(index, color, hidden, 0);
        }
    }
}

/// Fill one pixel from the fill colour register.
///
/// The register holds one 32-bit pixel, two 16-bit pixels or four 8-bit
/// pixels; each pixel takes the part matching its address. 4-bit images
/// cannot be filled and crash the pipeline.
pub fn fill(state: &mut PipelineState, rdram: &mut Rdram, curpixel: u32) {
    let fill = state.fill_color;
    let address = state.color_image.address;

    match state.color_image.size {
        TexelSize::Bits4 => {
            warn!("fill into a 4-bit colour image");
            state.pipeline_crashed = true;
        }
        TexelSize::Bits8 => {
            let fb = address.wrapping_add(curpixel);
            let v = (fill >> (((fb & 3) ^ 3) << 3)) & 0xFF;
            let bit = (v & 1) as u8;
            rdram.write_pair8(fb, v as u8, (bit << 1) | bit);
        }
        TexelSize::Bits16 => {
            let index = (address >> 1).wrapping_add(curpixel);
            let v = (if index & 1 != 0 { fill } else { fill >> 16 }) as u16;
            let bit = (v & 1) as u8;
            rdram.write_pair16(index, v, (bit << 1) | bit);
        }
        TexelSize::Bits32 => {
            let index = (address >> 2).wrapping_add(curpixel);
            let hi = if fill & 0x10000 != 0 { 3 } else { 0 };
            let lo = if fill & 1 != 0 { 3 } else { 0 };
            rdram.write_pair32(index, fill, hi, lo);
        }
    }
}
