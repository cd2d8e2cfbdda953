//! Register: OTHER_MODES

use crate::fields::{AlphaDitherSel, CoverageDest, CycleType, RgbDitherSel, ZMode};

/// OTHER_MODES
///
/// Pipeline configuration written by `Set_Other_Modes`: cycle type,
/// texture sampling controls, dither selection, blender input
/// selectors, depth and coverage policy.  Bits 56..63 carry the command
/// id and are ignored.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct OtherModesReg(u64);

impl OtherModesReg {
    #[must_use]
    pub const fn from_raw(val: u64) -> Self {
        Self(val & 0x00FF_FFFF_FFFF_FFFF)
    }

    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    flag_field!(
        /// Reject pixels whose alpha fails against the blend colour alpha
        alpha_compare_en, set_alpha_compare_en, ALPHA_COMPARE_EN, 0
    );
    flag_field!(
        /// Compare against noise instead of the blend colour alpha
        dither_alpha_en, set_dither_alpha_en, DITHER_ALPHA_EN, 1
    );
    flag_field!(
        /// Use the primitive depth instead of the interpolated depth
        z_source_sel, set_z_source_sel, Z_SOURCE_SEL, 2
    );
    flag_field!(antialias_en, set_antialias_en, ANTIALIAS_EN, 3);
    flag_field!(z_compare_en, set_z_compare_en, Z_COMPARE_EN, 4);
    flag_field!(z_update_en, set_z_update_en, Z_UPDATE_EN, 5);
    flag_field!(image_read_en, set_image_read_en, IMAGE_READ_EN, 6);
    flag_field!(
        /// Only update colour when coverage wraps
        color_on_cvg, set_color_on_cvg, COLOR_ON_CVG, 7
    );
    enum_field!(cvg_dest, set_cvg_dest, CVG_DEST, 8, 2, CoverageDest);
    enum_field!(z_mode, set_z_mode, Z_MODE, 10, 2, ZMode);
    flag_field!(cvg_times_alpha, set_cvg_times_alpha, CVG_TIMES_ALPHA, 12);
    flag_field!(alpha_cvg_select, set_alpha_cvg_select, ALPHA_CVG_SELECT, 13);
    flag_field!(force_blend, set_force_blend, FORCE_BLEND, 14);

    uint_field!(
        /// Blender cycle 1, B input of the second term
        blend_m2b_1, set_blend_m2b_1, BLEND_M2B_1, 16, 2
    );
    uint_field!(blend_m2b_0, set_blend_m2b_0, BLEND_M2B_0, 18, 2);
    uint_field!(blend_m2a_1, set_blend_m2a_1, BLEND_M2A_1, 20, 2);
    uint_field!(blend_m2a_0, set_blend_m2a_0, BLEND_M2A_0, 22, 2);
    uint_field!(blend_m1b_1, set_blend_m1b_1, BLEND_M1B_1, 24, 2);
    uint_field!(blend_m1b_0, set_blend_m1b_0, BLEND_M1B_0, 26, 2);
    uint_field!(blend_m1a_1, set_blend_m1a_1, BLEND_M1A_1, 28, 2);
    uint_field!(
        /// Blender cycle 0, A input of the first term
        blend_m1a_0, set_blend_m1a_0, BLEND_M1A_0, 30, 2
    );

    enum_field!(alpha_dither_sel, set_alpha_dither_sel, ALPHA_DITHER_SEL, 36, 2, AlphaDitherSel);
    enum_field!(rgb_dither_sel, set_rgb_dither_sel, RGB_DITHER_SEL, 38, 2, RgbDitherSel);

    flag_field!(
        /// Chroma key enable
        key_en, set_key_en, KEY_EN, 40
    );
    flag_field!(convert_one, set_convert_one, CONVERT_ONE, 41);
    flag_field!(bi_lerp_1, set_bi_lerp_1, BI_LERP_1, 42);
    flag_field!(bi_lerp_0, set_bi_lerp_0, BI_LERP_0, 43);
    flag_field!(mid_texel, set_mid_texel, MID_TEXEL, 44);
    flag_field!(
        /// 2x2 sampling when set, point sampling when clear
        sample_type, set_sample_type, SAMPLE_TYPE, 45
    );
    flag_field!(
        /// IA16 palette entries when set, RGBA16 when clear
        tlut_type, set_tlut_type, TLUT_TYPE, 46
    );
    flag_field!(en_tlut, set_en_tlut, EN_TLUT, 47);
    flag_field!(tex_lod_en, set_tex_lod_en, TEX_LOD_EN, 48);
    flag_field!(sharpen_tex_en, set_sharpen_tex_en, SHARPEN_TEX_EN, 49);
    flag_field!(detail_tex_en, set_detail_tex_en, DETAIL_TEX_EN, 50);
    flag_field!(persp_tex_en, set_persp_tex_en, PERSP_TEX_EN, 51);
    enum_field!(cycle_type, set_cycle_type, CYCLE_TYPE, 52, 2, CycleType);
    flag_field!(atomic_prim, set_atomic_prim, ATOMIC_PRIM, 54);

    /// Combined RGB/alpha dither selector, `(rgb << 2) | alpha`.
    #[inline(always)]
    #[must_use]
    pub const fn rgba_dither(&self) -> u8 {
        (self.rgb_dither_sel().bits() << 2) | self.alpha_dither_sel().bits()
    }
}
