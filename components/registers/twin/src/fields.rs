//! Field enums shared by the mode registers and command views.
//!
//! Every enum here covers its field's full bit range, so `from_bits`
//! is infallible: out-of-range bits are masked off first.

/// Pipeline cycle type (`Set_Other_Modes` bits 52..53).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleType {
    /// One combiner and one blender pass per pixel
    #[default]
    One = 0,
    /// Two combiner and two blender passes per pixel
    Two = 1,
    /// Texel copy, four pixels per clock
    Copy = 2,
    /// Solid fill from the fill colour register
    Fill = 3,
}

impl CycleType {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::One,
            1 => Self::Two,
            2 => Self::Copy,
            _ => Self::Fill,
        }
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

/// Depth comparison mode (`Set_Other_Modes` bits 10..11).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZMode {
    #[default]
    Opaque = 0,
    Interpenetrating = 1,
    Transparent = 2,
    Decal = 3,
}

impl ZMode {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::Opaque,
            1 => Self::Interpenetrating,
            2 => Self::Transparent,
            _ => Self::Decal,
        }
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

/// Coverage destination policy (`Set_Other_Modes` bits 8..9).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverageDest {
    /// Saturate accumulated coverage at 7
    #[default]
    Clamp = 0,
    /// Let accumulated coverage roll over
    Wrap = 1,
    /// Force full coverage
    Zap = 2,
    /// Keep the coverage already in memory
    Save = 3,
}

impl CoverageDest {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::Clamp,
            1 => Self::Wrap,
            2 => Self::Zap,
            _ => Self::Save,
        }
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

/// RGB dither selection (`Set_Other_Modes` bits 38..39).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RgbDitherSel {
    #[default]
    MagicSquare = 0,
    Bayer = 1,
    Noise = 2,
    None = 3,
}

impl RgbDitherSel {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::MagicSquare,
            1 => Self::Bayer,
            2 => Self::Noise,
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

/// Alpha dither selection (`Set_Other_Modes` bits 36..37).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaDitherSel {
    /// Same pattern as the RGB dither
    #[default]
    Pattern = 0,
    /// Inverted RGB dither pattern
    InvPattern = 1,
    Noise = 2,
    None = 3,
}

impl AlphaDitherSel {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::Pattern,
            1 => Self::InvPattern,
            2 => Self::Noise,
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }
}

/// Image data format used by colour, texture and tile descriptors.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Rgba = 0,
    Yuv = 1,
    ColorIndex = 2,
    IntensityAlpha = 3,
    Intensity = 4,
    Reserved5 = 5,
    Reserved6 = 6,
    Reserved7 = 7,
}

impl ImageFormat {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => Self::Rgba,
            1 => Self::Yuv,
            2 => Self::ColorIndex,
            3 => Self::IntensityAlpha,
            4 => Self::Intensity,
            5 => Self::Reserved5,
            6 => Self::Reserved6,
            _ => Self::Reserved7,
        }
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Rgba => "IMAGE_DATA_FORMAT_RGBA",
            Self::Yuv => "IMAGE_DATA_FORMAT_YUV",
            Self::ColorIndex => "IMAGE_DATA_FORMAT_COLOR_INDX",
            Self::IntensityAlpha => "IMAGE_DATA_FORMAT_IA",
            Self::Intensity => "IMAGE_DATA_FORMAT_I",
            Self::Reserved5 | Self::Reserved6 | Self::Reserved7 => "IMAGE_DATA_FORMAT_RSVD",
        }
    }
}

/// Pixel or texel size code.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TexelSize {
    #[default]
    Bits4 = 0,
    Bits8 = 1,
    Bits16 = 2,
    Bits32 = 3,
}

impl TexelSize {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x3 {
            0 => Self::Bits4,
            1 => Self::Bits8,
            2 => Self::Bits16,
            _ => Self::Bits32,
        }
    }

    #[must_use]
    pub const fn bits(&self) -> u8 {
        *self as u8
    }

    /// Assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Self::Bits4 => "SIZE_OF_PIXEL_4B",
            Self::Bits8 => "SIZE_OF_PIXEL_8B",
            Self::Bits16 => "SIZE_OF_PIXEL_16B",
            Self::Bits32 => "SIZE_OF_PIXEL_32B",
        }
    }
}
