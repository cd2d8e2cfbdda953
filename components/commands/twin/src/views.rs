//! Typed, zero-copy views over command payloads.

use rdp_registers::{CombineModeReg, ImageFormat, OtherModesReg, TexelSize};
use rdp_twin_core::Color;

use crate::opcode::TriangleShape;
use crate::raw::Raw;

/// Word 0 without the command id.
const PAYLOAD_MASK: u64 = 0x00FF_FFFF_FFFF_FFFF;

/// `(integer << 16) | fraction` from two 16-bit lanes.
#[inline]
fn combine(int: i32, frac: i32) -> i32 {
    (int << 16) | frac
}

// ============================================================================
// Triangles
// ============================================================================

/// Edge block plus optional shade, texture and depth coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle<'a> {
    raw: Raw<'a>,
    shape: TriangleShape,
}

impl<'a> Triangle<'a> {
    #[must_use]
    pub const fn new(raw: Raw<'a>, shape: TriangleShape) -> Self {
        Self { raw, shape }
    }

    #[must_use]
    pub const fn raw(&self) -> Raw<'a> {
        self.raw
    }

    #[must_use]
    pub const fn shape(&self) -> TriangleShape {
        self.shape
    }

    /// Right-major bit: spans run from the H edge toward increasing x.
    #[must_use]
    pub fn right_major(&self) -> bool {
        self.raw.flag(0, 55)
    }

    /// Number of mip levels minus one.
    #[must_use]
    pub fn levels(&self) -> i32 {
        self.raw.field(0, 51, 0x7)
    }

    #[must_use]
    pub fn tile(&self) -> i32 {
        self.raw.field(0, 48, 0x7)
    }

    #[must_use]
    pub fn yl(&self) -> i32 {
        self.raw.field(0, 32, 0x3FFF)
    }

    #[must_use]
    pub fn ym(&self) -> i32 {
        self.raw.field(0, 16, 0x3FFF)
    }

    #[must_use]
    pub fn yh(&self) -> i32 {
        self.raw.field(0, 0, 0x3FFF)
    }

    fn edge_x(&self, word: usize) -> i32 {
        combine(self.raw.lane(word, 3), self.raw.lane(word, 2))
    }

    fn edge_slope(&self, word: usize) -> i32 {
        combine(self.raw.lane(word, 1), self.raw.lane(word, 0))
    }

    #[must_use]
    pub fn xl(&self) -> i32 {
        self.edge_x(1)
    }

    #[must_use]
    pub fn dxldy(&self) -> i32 {
        self.edge_slope(1)
    }

    #[must_use]
    pub fn xh(&self) -> i32 {
        self.edge_x(2)
    }

    #[must_use]
    pub fn dxhdy(&self) -> i32 {
        self.edge_slope(2)
    }

    #[must_use]
    pub fn xm(&self) -> i32 {
        self.edge_x(3)
    }

    #[must_use]
    pub fn dxmdy(&self) -> i32 {
        self.edge_slope(3)
    }

    #[must_use]
    pub fn shade(&self) -> Option<ShadeCoeff<'a>> {
        self.shape.shade.then_some(ShadeCoeff {
            raw: self.raw,
            base: 4,
        })
    }

    #[must_use]
    pub fn texture(&self) -> Option<TextureCoeff<'a>> {
        let base = if self.shape.shade { 12 } else { 4 };
        self.shape.texture.then_some(TextureCoeff {
            raw: self.raw,
            base,
        })
    }

    #[must_use]
    pub fn depth(&self) -> Option<ZCoeff<'a>> {
        let mut base = 4;
        if self.shape.shade {
            base += 8;
        }
        if self.shape.texture {
            base += 8;
        }
        self.shape.zbuffer.then_some(ZCoeff {
            raw: self.raw,
            base,
        })
    }
}

/// Shade coefficients: RGBA start value and x/edge/y gradients, each
/// in s15.16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadeCoeff<'a> {
    raw: Raw<'a>,
    base: usize,
}

impl ShadeCoeff<'_> {
    fn rgba(&self, int_word: usize, frac_word: usize) -> [i32; 4] {
        let int = self.base + int_word;
        let frac = self.base + frac_word;
        [3, 2, 1, 0].map(|lane| combine(self.raw.lane(int, lane), self.raw.lane(frac, lane)))
    }

    /// Halves as stored, for disassembly.
    pub(crate) fn halves(&self, word: usize) -> [i16; 4] {
        [3, 2, 1, 0].map(|lane| self.raw.lane(self.base + word, lane) as i16)
    }

    #[must_use]
    pub fn color(&self) -> [i32; 4] {
        self.rgba(0, 2)
    }

    #[must_use]
    pub fn d_dx(&self) -> [i32; 4] {
        self.rgba(1, 3)
    }

    #[must_use]
    pub fn d_de(&self) -> [i32; 4] {
        self.rgba(4, 6)
    }

    #[must_use]
    pub fn d_dy(&self) -> [i32; 4] {
        self.rgba(5, 7)
    }
}

/// Texture coefficients: S, T, W start values and gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureCoeff<'a> {
    raw: Raw<'a>,
    base: usize,
}

impl TextureCoeff<'_> {
    fn stw(&self, int_word: usize, frac_word: usize) -> [i32; 3] {
        let int = self.base + int_word;
        let frac = self.base + frac_word;
        [3, 2, 1].map(|lane| combine(self.raw.lane(int, lane), self.raw.lane(frac, lane)))
    }

    pub(crate) fn halves(&self, word: usize) -> [i16; 3] {
        [3, 2, 1].map(|lane| self.raw.lane(self.base + word, lane) as i16)
    }

    #[must_use]
    pub fn coord(&self) -> [i32; 3] {
        self.stw(0, 2)
    }

    #[must_use]
    pub fn d_dx(&self) -> [i32; 3] {
        self.stw(1, 3)
    }

    #[must_use]
    pub fn d_de(&self) -> [i32; 3] {
        self.stw(4, 6)
    }

    #[must_use]
    pub fn d_dy(&self) -> [i32; 3] {
        self.stw(5, 7)
    }
}

/// Depth coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZCoeff<'a> {
    raw: Raw<'a>,
    base: usize,
}

impl ZCoeff<'_> {
    pub(crate) fn halves(&self) -> [i16; 8] {
        let w0 = self.base;
        let w1 = self.base + 1;
        [
            (w0, 3),
            (w0, 2),
            (w0, 1),
            (w0, 0),
            (w1, 3),
            (w1, 2),
            (w1, 1),
            (w1, 0),
        ]
        .map(|(w, lane)| self.raw.lane(w, lane) as i16)
    }

    #[must_use]
    pub fn z(&self) -> i32 {
        self.raw.field(self.base, 32, 0xFFFF_FFFF)
    }

    #[must_use]
    pub fn dzdx(&self) -> i32 {
        self.raw.field(self.base, 0, 0xFFFF_FFFF)
    }

    #[must_use]
    pub fn dzde(&self) -> i32 {
        self.raw.field(self.base + 1, 32, 0xFFFF_FFFF)
    }

    #[must_use]
    pub fn dzdy(&self) -> i32 {
        self.raw.field(self.base + 1, 0, 0xFFFF_FFFF)
    }
}

// ============================================================================
// Rectangles
// ============================================================================

/// `Fill_Rectangle`: corners in 10.2 fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRectangle<'a>(pub(crate) Raw<'a>);

impl FillRectangle<'_> {
    #[must_use]
    pub fn xl(&self) -> i32 {
        self.0.field(0, 44, 0xFFF)
    }

    #[must_use]
    pub fn yl(&self) -> i32 {
        self.0.field(0, 32, 0xFFF)
    }

    #[must_use]
    pub fn xh(&self) -> i32 {
        self.0.field(0, 12, 0xFFF)
    }

    #[must_use]
    pub fn yh(&self) -> i32 {
        self.0.field(0, 0, 0xFFF)
    }
}

/// `Texture_Rectangle` and `Texture_Rectangle_Flip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRectangle<'a> {
    pub(crate) raw: Raw<'a>,
    pub(crate) flip: bool,
}

impl TextureRectangle<'_> {
    /// S and T swapped.
    #[must_use]
    pub const fn flip(&self) -> bool {
        self.flip
    }

    #[must_use]
    pub fn xl(&self) -> i32 {
        self.raw.field(0, 44, 0xFFF)
    }

    #[must_use]
    pub fn yl(&self) -> i32 {
        self.raw.field(0, 32, 0xFFF)
    }

    #[must_use]
    pub fn tile(&self) -> i32 {
        self.raw.field(0, 24, 0x7)
    }

    #[must_use]
    pub fn xh(&self) -> i32 {
        self.raw.field(0, 12, 0xFFF)
    }

    #[must_use]
    pub fn yh(&self) -> i32 {
        self.raw.field(0, 0, 0xFFF)
    }

    /// S10.5
    #[must_use]
    pub fn s(&self) -> i32 {
        self.raw.field(1, 48, 0xFFFF)
    }

    /// S10.5
    #[must_use]
    pub fn t(&self) -> i32 {
        self.raw.field(1, 32, 0xFFFF)
    }

    /// S5.10
    #[must_use]
    pub fn dsdx(&self) -> i32 {
        self.raw.field(1, 16, 0xFFFF)
    }

    /// S5.10
    #[must_use]
    pub fn dtdy(&self) -> i32 {
        self.raw.field(1, 0, 0xFFFF)
    }
}

// ============================================================================
// State commands
// ============================================================================

/// `Set_Fill_Color`, `Set_Fog_Color`, `Set_Blend_Color`,
/// `Set_Prim_Color` and `Set_Env_Color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetColor<'a>(pub(crate) Raw<'a>);

impl SetColor<'_> {
    #[must_use]
    pub fn packed(&self) -> u32 {
        self.0.field(0, 0, 0xFFFF_FFFF) as u32
    }

    #[must_use]
    pub fn color(&self) -> Color {
        Color::from_u32(self.packed())
    }

    /// Primitive colour only.
    #[must_use]
    pub fn min_level(&self) -> i32 {
        self.0.field(0, 40, 0x1F)
    }

    /// Primitive colour only.
    #[must_use]
    pub fn level_frac(&self) -> i32 {
        self.0.field(0, 32, 0xFF)
    }
}

/// `Set_Color_Image` and `Set_Texture_Image`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetImage<'a>(pub(crate) Raw<'a>);

impl SetImage<'_> {
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        ImageFormat::from_bits(self.0.field(0, 53, 0x7) as u8)
    }

    #[must_use]
    pub fn size(&self) -> TexelSize {
        TexelSize::from_bits(self.0.field(0, 51, 0x3) as u8)
    }

    /// Width minus one.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.0.field(0, 32, 0x3FF)
    }

    #[must_use]
    pub fn address(&self) -> u32 {
        self.0.field(0, 0, 0x3FF_FFFF) as u32
    }
}

/// `Set_Z_Image`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetZImage<'a>(pub(crate) Raw<'a>);

impl SetZImage<'_> {
    #[must_use]
    pub fn address(&self) -> u32 {
        self.0.field(0, 0, 0x3FF_FFFF) as u32
    }
}

/// `Set_Tile`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetTile<'a>(pub(crate) Raw<'a>);

impl SetTile<'_> {
    #[must_use]
    pub fn format(&self) -> ImageFormat {
        ImageFormat::from_bits(self.0.field(0, 53, 0x7) as u8)
    }

    #[must_use]
    pub fn size(&self) -> TexelSize {
        TexelSize::from_bits(self.0.field(0, 51, 0x3) as u8)
    }

    /// Row stride in 64-bit words.
    #[must_use]
    pub fn line(&self) -> i32 {
        self.0.field(0, 41, 0x1FF)
    }

    /// TMEM address in 64-bit words.
    #[must_use]
    pub fn tmem(&self) -> i32 {
        self.0.field(0, 32, 0x1FF)
    }

    #[must_use]
    pub fn tile(&self) -> i32 {
        self.0.field(0, 24, 0x7)
    }

    #[must_use]
    pub fn palette(&self) -> i32 {
        self.0.field(0, 20, 0xF)
    }

    #[must_use]
    pub fn clamp_t(&self) -> bool {
        self.0.flag(0, 19)
    }

    #[must_use]
    pub fn mirror_t(&self) -> bool {
        self.0.flag(0, 18)
    }

    #[must_use]
    pub fn mask_t(&self) -> i32 {
        self.0.field(0, 14, 0xF)
    }

    #[must_use]
    pub fn shift_t(&self) -> i32 {
        self.0.field(0, 10, 0xF)
    }

    #[must_use]
    pub fn clamp_s(&self) -> bool {
        self.0.flag(0, 9)
    }

    #[must_use]
    pub fn mirror_s(&self) -> bool {
        self.0.flag(0, 8)
    }

    #[must_use]
    pub fn mask_s(&self) -> i32 {
        self.0.field(0, 4, 0xF)
    }

    #[must_use]
    pub fn shift_s(&self) -> i32 {
        self.0.field(0, 0, 0xF)
    }
}

/// Tile coordinate box shared by `Set_Tile_Size`, `Load_Tile` and
/// `Load_Tlut`. Coordinates are 10.2 fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange<'a>(pub(crate) Raw<'a>);

impl TileRange<'_> {
    #[must_use]
    pub fn sl(&self) -> i32 {
        self.0.field(0, 44, 0xFFF)
    }

    #[must_use]
    pub fn tl(&self) -> i32 {
        self.0.field(0, 32, 0xFFF)
    }

    #[must_use]
    pub fn tile(&self) -> i32 {
        self.0.field(0, 24, 0x7)
    }

    #[must_use]
    pub fn sh(&self) -> i32 {
        self.0.field(0, 12, 0xFFF)
    }

    #[must_use]
    pub fn th(&self) -> i32 {
        self.0.field(0, 0, 0xFFF)
    }
}

/// `Load_Block`: like [`TileRange`] but the last field is the T step
/// per 64-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadBlock<'a>(pub(crate) Raw<'a>);

impl LoadBlock<'_> {
    #[must_use]
    pub fn sl(&self) -> i32 {
        self.0.field(0, 44, 0xFFF)
    }

    #[must_use]
    pub fn tl(&self) -> i32 {
        self.0.field(0, 32, 0xFFF)
    }

    #[must_use]
    pub fn tile(&self) -> i32 {
        self.0.field(0, 24, 0x7)
    }

    /// Last texel index.
    #[must_use]
    pub fn sh(&self) -> i32 {
        self.0.field(0, 12, 0xFFF)
    }

    /// 1.11 fixed point.
    #[must_use]
    pub fn dxt(&self) -> i32 {
        self.0.field(0, 0, 0xFFF)
    }
}

/// `Set_Scissor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScissor<'a>(pub(crate) Raw<'a>);

impl SetScissor<'_> {
    #[must_use]
    pub fn xh(&self) -> i32 {
        self.0.field(0, 44, 0xFFF)
    }

    #[must_use]
    pub fn yh(&self) -> i32 {
        self.0.field(0, 32, 0xFFF)
    }

    #[must_use]
    pub fn field_enable(&self) -> bool {
        self.0.flag(0, 25)
    }

    #[must_use]
    pub fn keep_odd(&self) -> bool {
        self.0.flag(0, 24)
    }

    #[must_use]
    pub fn xl(&self) -> i32 {
        self.0.field(0, 12, 0xFFF)
    }

    #[must_use]
    pub fn yl(&self) -> i32 {
        self.0.field(0, 0, 0xFFF)
    }
}

/// `Set_Prim_Depth`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPrimDepth<'a>(pub(crate) Raw<'a>);

impl SetPrimDepth<'_> {
    #[must_use]
    pub fn z(&self) -> i32 {
        self.0.field(0, 16, 0xFFFF)
    }

    #[must_use]
    pub fn delta_z(&self) -> i32 {
        self.0.field(0, 0, 0xFFFF)
    }
}

/// `Set_Convert`: six 9-bit signed coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetConvert<'a>(pub(crate) Raw<'a>);

impl SetConvert<'_> {
    fn term(&self, index: u32) -> i32 {
        let v = self.0.field(0, index * 9, 0x1FF);
        if v >= 0x100 {
            v - 0x200
        } else {
            v
        }
    }

    /// `[K0, K1, K2, K3, K4, K5]`
    #[must_use]
    pub fn coefficients(&self) -> [i32; 6] {
        [5, 4, 3, 2, 1, 0].map(|i| self.term(i))
    }
}

/// `Set_Key_R`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetKeyR<'a>(pub(crate) Raw<'a>);

impl SetKeyR<'_> {
    #[must_use]
    pub fn width(&self) -> i32 {
        self.0.field(0, 16, 0xFFF)
    }

    #[must_use]
    pub fn center(&self) -> i32 {
        self.0.field(0, 8, 0xFF)
    }

    #[must_use]
    pub fn scale(&self) -> i32 {
        self.0.field(0, 0, 0xFF)
    }
}

/// `Set_Key_GB`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetKeyGb<'a>(pub(crate) Raw<'a>);

impl SetKeyGb<'_> {
    #[must_use]
    pub fn width_g(&self) -> i32 {
        self.0.field(0, 44, 0xFFF)
    }

    #[must_use]
    pub fn width_b(&self) -> i32 {
        self.0.field(0, 32, 0xFFF)
    }

    #[must_use]
    pub fn center_g(&self) -> i32 {
        self.0.field(0, 24, 0xFF)
    }

    #[must_use]
    pub fn scale_g(&self) -> i32 {
        self.0.field(0, 16, 0xFF)
    }

    #[must_use]
    pub fn center_b(&self) -> i32 {
        self.0.field(0, 8, 0xFF)
    }

    #[must_use]
    pub fn scale_b(&self) -> i32 {
        self.0.field(0, 0, 0xFF)
    }
}

/// `Set_Other_Modes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOtherModes<'a>(pub(crate) Raw<'a>);

impl SetOtherModes<'_> {
    #[must_use]
    pub fn modes(&self) -> OtherModesReg {
        OtherModesReg::from_raw(self.0.word(0) & PAYLOAD_MASK)
    }
}

/// `Set_Combine_Mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetCombineMode<'a>(pub(crate) Raw<'a>);

impl SetCombineMode<'_> {
    #[must_use]
    pub fn mode(&self) -> CombineModeReg {
        CombineModeReg::from_raw(self.0.word(0) & PAYLOAD_MASK)
    }
}
