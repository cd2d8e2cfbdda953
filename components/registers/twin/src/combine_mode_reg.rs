//! Register: COMBINE_MODE

/// COMBINE_MODE
///
/// Colour combiner input selectors written by `Set_Combine_Mode`.  The
/// combiner evaluates `(A - B) * C + D` independently for RGB and alpha,
/// once per cycle.  Suffix `_0` selects cycle 0, `_1` cycle 1.  The raw
/// selector codes are resolved into inputs by the combiner stage; this
/// type only carries bit positions.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct CombineModeReg(u64);

impl CombineModeReg {
    #[must_use]
    pub const fn from_raw(val: u64) -> Self {
        Self(val & 0x00FF_FFFF_FFFF_FFFF)
    }

    #[must_use]
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    uint_field!(add_alpha_1, set_add_alpha_1, ADD_ALPHA_1, 0, 3);
    uint_field!(sub_b_alpha_1, set_sub_b_alpha_1, SUB_B_ALPHA_1, 3, 3);
    uint_field!(add_rgb_1, set_add_rgb_1, ADD_RGB_1, 6, 3);
    uint_field!(add_alpha_0, set_add_alpha_0, ADD_ALPHA_0, 9, 3);
    uint_field!(sub_b_alpha_0, set_sub_b_alpha_0, SUB_B_ALPHA_0, 12, 3);
    uint_field!(add_rgb_0, set_add_rgb_0, ADD_RGB_0, 15, 3);
    uint_field!(mul_alpha_1, set_mul_alpha_1, MUL_ALPHA_1, 18, 3);
    uint_field!(sub_a_alpha_1, set_sub_a_alpha_1, SUB_A_ALPHA_1, 21, 3);
    uint_field!(sub_b_rgb_1, set_sub_b_rgb_1, SUB_B_RGB_1, 24, 4);
    uint_field!(sub_b_rgb_0, set_sub_b_rgb_0, SUB_B_RGB_0, 28, 4);
    uint_field!(mul_rgb_1, set_mul_rgb_1, MUL_RGB_1, 32, 5);
    uint_field!(sub_a_rgb_1, set_sub_a_rgb_1, SUB_A_RGB_1, 37, 4);
    uint_field!(mul_alpha_0, set_mul_alpha_0, MUL_ALPHA_0, 41, 3);
    uint_field!(sub_a_alpha_0, set_sub_a_alpha_0, SUB_A_ALPHA_0, 44, 3);
    uint_field!(mul_rgb_0, set_mul_rgb_0, MUL_RGB_0, 47, 5);
    uint_field!(sub_a_rgb_0, set_sub_a_rgb_0, SUB_A_RGB_0, 52, 4);

    /// Register with every selector of both cycles set to `sel`
    /// (truncated to each field's width).
    #[must_use]
    pub fn uniform(sel: u8) -> Self {
        let mut reg = Self::default();
        for layout in Self::ALL_FIELDS {
            reg.0 = layout.insert(reg.0, sel as u64);
        }
        reg
    }

    const ALL_FIELDS: [crate::FieldLayout; 16] = [
        Self::ADD_ALPHA_1,
        Self::SUB_B_ALPHA_1,
        Self::ADD_RGB_1,
        Self::ADD_ALPHA_0,
        Self::SUB_B_ALPHA_0,
        Self::ADD_RGB_0,
        Self::MUL_ALPHA_1,
        Self::SUB_A_ALPHA_1,
        Self::SUB_B_RGB_1,
        Self::SUB_B_RGB_0,
        Self::MUL_RGB_1,
        Self::SUB_A_RGB_1,
        Self::MUL_ALPHA_0,
        Self::SUB_A_ALPHA_0,
        Self::MUL_RGB_0,
        Self::SUB_A_RGB_0,
    ];
}
