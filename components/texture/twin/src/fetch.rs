use rdp_memory::Tmem;
use rdp_registers::{ImageFormat, TexelSize};
use rdp_twin_core::{Color, Tile};

/// Odd rows are stored with their 32-bit halves swapped.
const fn row_swap(t: i32, bytes: i32) -> i32 {
    if t & 1 != 0 {
        bytes
    } else {
        0
    }
}

/// 5 bit channel widened to 8 bits.
const fn widen5(c: i32) -> i32 {
    (c << 3) | ((c >> 2) & 7)
}

/// Expand a 5-5-5-1 texel.
#[must_use]
pub const fn rgba16(c: u16) -> Color {
    let c = c as i32;
    Color::new(
        widen5(c >> 11),
        widen5((c >> 6) & 0x1F),
        widen5((c >> 1) & 0x1F),
        if c & 1 != 0 { 0xFF } else { 0 },
    )
}

fn byte_at(tmem: &Tmem, address: i32) -> i32 {
    i32::from(tmem.read8(address as usize))
}

fn half_at(tmem: &Tmem, index: i32) -> i32 {
    i32::from(tmem.read16_idx(index as usize))
}

/// Nibble `s` of a 4-bit row starting at `tbase`.
pub(crate) fn nibble(tmem: &Tmem, tbase: i32, s: i32, t: i32, mask: i32) -> i32 {
    let address = ((((tbase << 4) + s) >> 1) ^ row_swap(t, 4)) & mask;
    let b = byte_at(tmem, address);
    if s & 1 != 0 {
        b & 0xF
    } else {
        b >> 4
    }
}

pub(crate) fn byte(tmem: &Tmem, tbase: i32, s: i32, t: i32, mask: i32) -> i32 {
    byte_at(tmem, (((tbase << 3) + s) ^ row_swap(t, 4)) & mask)
}

pub(crate) fn half(tmem: &Tmem, tbase: i32, s: i32, t: i32, mask: i32) -> i32 {
    half_at(tmem, (((tbase << 2) + s) ^ row_swap(t, 2)) & mask)
}

pub(crate) fn row_base(tile: &Tile, t: i32) -> i32 {
    tile.line * (t & 0xFF) + tile.tmem
}

fn yuv(tmem: &Tmem, tbase: i32, s: i32, t: i32, size: TexelSize) -> Color {
    match size {
        TexelSize::Bits4 | TexelSize::Bits8 => {
            let y = if size == TexelSize::Bits4 {
                let y = byte_at(tmem, (((tbase << 2) + s) ^ row_swap(t, 4)) & 0x7FF) & 0xF0;
                y | (y >> 4)
            } else {
                byte(tmem, tbase, s, t, 0x7FF)
            };
            Color::new(y - 0x80, y - 0x80, y, y)
        }
        TexelSize::Bits16 | TexelSize::Bits32 => {
            let address = (tbase << 3) + s;
            let uv = half_at(tmem, ((address >> 1) ^ row_swap(t, 2)) & 0x3FF);
            let y_address = (address ^ row_swap(t, 4)) & 0x7FF;
            let (u, v) = ((uv >> 8) - 0x80, (uv & 0xFF) - 0x80);

            if size == TexelSize::Bits32 && s & 1 == 0 {
                let ba = half_at(tmem, (((address >> 1) ^ row_swap(t, 2)) & 0x3FF) | 0x400);
                Color::new(u, v, ba >> 8, ((ba >> 8) & 0xF) | (ba & 0xF0))
            } else {
                let y = byte_at(tmem, y_address | 0x800);
                Color::new(u, v, y, y)
            }
        }
    }
}

/// Read one texel of `tile` at tile-relative `(s, t)`, without palette
/// lookup.
///
/// Colour-index texels come back as the raw index in every channel so
/// that a texture can be sampled as intensity when TLUT is off.
#[must_use]
pub fn fetch_texel(tmem: &Tmem, tile: &Tile, s: i32, t: i32) -> Color {
    fetch_row(tmem, tile, row_base(tile, t), s, t)
}

/// [`fetch_texel`] with the row's TMEM base already computed. The lower
/// rows of a filter quad are addressed without re-wrapping T.
pub(crate) fn fetch_row(tmem: &Tmem, tile: &Tile, tbase: i32, s: i32, t: i32) -> Color {
    match (tile.format, tile.size) {
        (ImageFormat::Rgba, TexelSize::Bits4) | (ImageFormat::Intensity, TexelSize::Bits4) => {
            let n = nibble(tmem, tbase, s, t, 0xFFF);
            Color::splat(n | (n << 4))
        }
        (ImageFormat::Rgba, TexelSize::Bits8)
        | (ImageFormat::ColorIndex, TexelSize::Bits8)
        | (ImageFormat::Intensity, TexelSize::Bits8) => Color::splat(byte(tmem, tbase, s, t, 0xFFF)),
        (ImageFormat::Rgba, TexelSize::Bits16) => rgba16(half(tmem, tbase, s, t, 0x7FF) as u16),
        (ImageFormat::Rgba, TexelSize::Bits32) => {
            let index = (((tbase << 2) + s) ^ row_swap(t, 2)) & 0x3FF;
            let rg = half_at(tmem, index);
            let ba = half_at(tmem, index | 0x400);
            Color::new(rg >> 8, rg & 0xFF, ba >> 8, ba & 0xFF)
        }
        (ImageFormat::Yuv, size) => yuv(tmem, tbase, s, t, size),
        (ImageFormat::ColorIndex, TexelSize::Bits4) => {
            let n = nibble(tmem, tbase, s, t, 0xFFF);
            Color::splat((tile.palette << 4) | n)
        }
        (ImageFormat::IntensityAlpha, TexelSize::Bits4) => {
            let n = nibble(tmem, tbase, s, t, 0xFFF);
            let i = n & 0xE;
            let i = (i << 4) | (i << 1) | (i >> 2);
            Color::new(i, i, i, if n & 1 != 0 { 0xFF } else { 0 })
        }
        (ImageFormat::IntensityAlpha, TexelSize::Bits8) => {
            let b = byte(tmem, tbase, s, t, 0xFFF);
            let i = (b & 0xF0) | ((b & 0xF0) >> 4);
            Color::new(i, i, i, ((b & 0xF) << 4) | (b & 0xF))
        }
        (ImageFormat::IntensityAlpha, TexelSize::Bits16) => {
            let c = half(tmem, tbase, s, t, 0x7FF);
            Color::new(c >> 8, c >> 8, c >> 8, c & 0xFF)
        }
        (_, TexelSize::Bits4) => {
            let n = nibble(tmem, tbase, s, t, 0xFFF);
            Color::splat(n | (n << 4))
        }
        (_, TexelSize::Bits8) => Color::splat(byte(tmem, tbase, s, t, 0xFFF)),
        (_, TexelSize::Bits16 | TexelSize::Bits32) => {
            let c = half(tmem, tbase, s, t, 0x7FF);
            Color::new(c >> 8, c & 0xFF, c >> 8, c & 0xFF)
        }
    }
}

/// Palette index of the texel at `(s, t)`. Texels are read from the
/// lower half of TMEM only, the upper half being the palette.
#[must_use]
pub fn fetch_index(tmem: &Tmem, tile: &Tile, s: i32, t: i32) -> i32 {
    index_row(tmem, tile, row_base(tile, t), s, t)
}

pub(crate) fn index_row(tmem: &Tmem, tile: &Tile, tbase: i32, s: i32, t: i32) -> i32 {
    match tile.size {
        TexelSize::Bits4 => (tile.palette << 4) | nibble(tmem, tbase, s, t, 0x7FF),
        TexelSize::Bits8 => byte(tmem, tbase, s, t, 0x7FF),
        TexelSize::Bits16 | TexelSize::Bits32 => half(tmem, tbase, s, t, 0x3FF) >> 8,
    }
}

/// Palette entry `index`, either RGBA 5-5-5-1 or IA 8-8.
#[must_use]
pub fn tlut_entry(tmem: &Tmem, index: i32, ia: bool) -> Color {
    let c = tlut_raw(tmem, index);
    if ia {
        Color::new(c >> 8, c >> 8, c >> 8, c & 0xFF)
    } else {
        rgba16(c as u16)
    }
}

/// Raw 16-bit palette entry `index`.
pub(crate) fn tlut_raw(tmem: &Tmem, index: i32) -> i32 {
    half_at(tmem, 0x400 + ((index & 0xFF) << 2))
}
