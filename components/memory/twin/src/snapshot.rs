//! Colour image export.

use image::{Rgba, RgbaImage};
use rdp_registers::TexelSize;

use crate::Rdram;

/// Copy a colour image out of RDRAM.
///
/// 16-bit pixels are RGBA 5551 expanded to eight bits per channel, with
/// alpha taken from the coverage bit. 32-bit pixels are RGBA 8888. Other
/// sizes produce a black image.
#[must_use]
pub fn snapshot(rdram: &Rdram, address: u32, width: u32, height: u32, size: TexelSize) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    match size {
        TexelSize::Bits16 => {
            let base = address >> 1;
            for (x, y, px) in img.enumerate_pixels_mut() {
                let v = rdram.read_idx16(base + y * width + x);
                let expand = |c: u16| {
                    let c = (c & 0x1F) as u8;
                    (c << 3) | (c >> 2)
                };
                let a = if v & 1 != 0 { 0xFF } else { 0 };
                *px = Rgba([expand(v >> 11), expand(v >> 6), expand(v >> 1), a]);
            }
        }
        TexelSize::Bits32 => {
            let base = address >> 2;
            for (x, y, px) in img.enumerate_pixels_mut() {
                let v = rdram.read_idx32(base + y * width + x);
                *px = Rgba(v.to_be_bytes());
            }
        }
        TexelSize::Bits4 | TexelSize::Bits8 => {
            log::warn!("colour image snapshot of {} pixels is not supported", size.mnemonic());
        }
    }
    img
}
