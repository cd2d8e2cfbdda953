use rdp_bits::Noise;
use rdp_registers::{CombineModeReg, ImageFormat, OtherModesReg, TexelSize};

use crate::color::Color;
use crate::span::{SpanDeltas, SpanTable};
use crate::tile::Tile;

/// Flags derived from the mode registers before each primitive.
///
/// Recomputed lazily: mode-changing commands set `stale` and the edge
/// walker refreshes everything before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeFlags {
    pub stale: bool,
    pub partial_reject_1: bool,
    pub partial_reject_2: bool,
    /// `(rgb_dither_sel << 2) | alpha_dither_sel`
    pub rgba_dither: u8,
    /// 0: noise needed, 1: pattern dither only, 2: no dither at all
    pub dither_level: u8,
    /// 0: texel0 and texel1, 1: texel0 only, 2: no texture
    pub cycle1_render_mode: u8,
    /// 0: both texels with lookahead, 1: both texels, 2: texel0 with
    /// lookahead, 3: no texture
    pub cycle2_render_mode: u8,
    pub real_shifter_needed: bool,
    pub inter_shifter_needed: bool,
    pub use_lod: bool,
}

impl Default for ModeFlags {
    fn default() -> Self {
        Self {
            stale: true,
            partial_reject_1: false,
            partial_reject_2: false,
            rgba_dither: 0,
            dither_level: 0,
            cycle1_render_mode: 0,
            cycle2_render_mode: 0,
            real_shifter_needed: false,
            inter_shifter_needed: false,
            use_lod: false,
        }
    }
}

/// Blender alpha shifts produced by the depth comparator when the
/// second blender term reads memory alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlendShifts {
    pub shift_a: i32,
    pub shift_b: i32,
    pub past_shift_a: i32,
    pub past_shift_b: i32,
}

/// Depth test side outputs consumed by the blender and the colour write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlendGate {
    /// Blend with memory instead of overwriting it.
    pub enable_blend: bool,
    /// Pixel and memory coverage together overflow eight samples.
    pub prewrap: bool,
}

/// Scissor box in 10.2 fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scissor {
    pub xh: i32,
    pub yh: i32,
    pub xl: i32,
    pub yl: i32,
    /// Interlaced field mode
    pub field: bool,
    pub keep_odd: bool,
}

impl Default for Scissor {
    fn default() -> Self {
        Self {
            xh: 0x2000,
            yh: 0x2000,
            xl: 0,
            yl: 0,
            field: false,
            keep_odd: false,
        }
    }
}

/// An image in RDRAM: colour image or texture source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageDesc {
    pub format: ImageFormat,
    pub size: TexelSize,
    /// Width in pixels (command field plus one).
    pub width: i32,
    pub address: u32,
}

/// The display processor's single pipeline state.
///
/// Every stage receives this explicitly. Fields fall in three groups:
/// registers written by commands, values derived from them, and
/// per-pixel working colours that stages hand to each other.
#[derive(Debug, Clone)]
pub struct PipelineState {
    // ==== registers ====
    pub other_modes: OtherModesReg,
    pub combine_mode: CombineModeReg,
    pub tiles: [Tile; 8],

    pub fill_color: u32,
    pub fog_color: Color,
    pub blend_color: Color,
    pub prim_color: Color,
    pub env_color: Color,
    pub key_center: Color,
    pub key_scale: Color,
    pub key_width: Color,

    /// Texture filter / YUV conversion coefficients. K0..K3 are stored
    /// as `(k << 1) + 1`.
    pub k0: i32,
    pub k1: i32,
    pub k2: i32,
    pub k3: i32,
    pub k4: i32,
    pub k5: i32,

    pub prim_lod_frac: i32,
    pub min_level: i32,
    pub max_level: i32,

    pub prim_z: u32,
    pub prim_delta_z: u16,
    pub scissor: Scissor,

    pub color_image: ImageDesc,
    pub texture_image: ImageDesc,
    pub z_image_address: u32,

    // ==== derived ====
    pub flags: ModeFlags,
    pub shifts: BlendShifts,

    // ==== per-pixel working set ====
    pub combined: Color,
    pub texel0: Color,
    pub texel1: Color,
    pub next_texel: Color,
    pub next_texel1: Color,
    pub shade: Color,
    pub pixel: Color,
    pub memory: Color,
    pub pre_memory: Color,
    pub inv_pixel: Color,
    pub blended: Color,
    pub shade_alpha: i32,
    pub lod_frac: i32,
    pub noise: i32,
    pub random: Noise,

    // ==== per-primitive scratch ====
    pub spans: SpanTable,
    pub deltas: SpanDeltas,
    pub coverage: Vec<u8>,
    pub past_raw_dzmem: i32,
    pub pipeline_crashed: bool,
}

/// Width of the coverage scratch buffer in pixels.
pub const COVERAGE_WIDTH: usize = 1024;

impl Default for PipelineState {
    fn default() -> Self {
        Self::new(Noise::RESET_SEED)
    }
}

impl PipelineState {
    /// Power-on state with the given noise seed.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            other_modes: OtherModesReg::default(),
            combine_mode: CombineModeReg::default(),
            tiles: [Tile::default(); 8],
            fill_color: 0,
            fog_color: Color::ZERO,
            blend_color: Color::ZERO,
            prim_color: Color::ZERO,
            env_color: Color::ZERO,
            key_center: Color::ZERO,
            key_scale: Color::ZERO,
            key_width: Color::ZERO,
            k0: 0,
            k1: 0,
            k2: 0,
            k3: 0,
            k4: 0,
            k5: 0,
            prim_lod_frac: 0,
            min_level: 0,
            max_level: 0,
            prim_z: 0,
            prim_delta_z: 0,
            scissor: Scissor::default(),
            color_image: ImageDesc::default(),
            texture_image: ImageDesc::default(),
            z_image_address: 0,
            flags: ModeFlags::default(),
            shifts: BlendShifts::default(),
            combined: Color::ZERO,
            texel0: Color::ZERO,
            texel1: Color::ZERO,
            next_texel: Color::ZERO,
            next_texel1: Color::ZERO,
            shade: Color::ZERO,
            pixel: Color::ZERO,
            memory: Color::ZERO,
            pre_memory: Color::ZERO,
            inv_pixel: Color::ZERO,
            blended: Color::ZERO,
            shade_alpha: 0,
            lod_frac: 0,
            noise: 0,
            random: Noise::new(seed),
            spans: SpanTable::default(),
            deltas: SpanDeltas::default(),
            coverage: vec![0; COVERAGE_WIDTH],
            past_raw_dzmem: 0,
            pipeline_crashed: true,
        }
    }

    /// Mark the derived mode flags for recomputation.
    pub fn invalidate_derivatives(&mut self) {
        self.flags.stale = true;
    }

    /// Next value from the pipeline noise generator.
    pub fn irand(&mut self) -> i32 {
        self.random.next()
    }

    /// Colour image width in pixels.
    #[must_use]
    pub fn fb_width(&self) -> i32 {
        self.color_image.width
    }
}
