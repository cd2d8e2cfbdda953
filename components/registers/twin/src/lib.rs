//! RDP mode registers.
//!
//! The two wide mode words of the display processor (`Set_Other_Modes`
//! and `Set_Combine_Mode`) are modelled as transparent `u64` newtypes
//! with per-field layout constants and typed accessors.
#![no_std]
#![allow(clippy::inline_always)]
#![allow(clippy::identity_op)]

/// Bit position and width of a register field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub offset: usize,
    pub width: usize,
    pub mask: u64,
}

impl FieldLayout {
    pub const fn new(offset: usize, width: usize) -> Self {
        Self {
            offset,
            width,
            mask: (1u64 << width) - 1,
        }
    }

    /// Place `val` at this field's position, discarding bits outside the field.
    #[inline(always)]
    #[must_use]
    pub const fn place(&self, val: u64) -> u64 {
        (val & self.mask) << self.offset
    }

    #[inline(always)]
    #[must_use]
    pub const fn extract(&self, raw: u64) -> u64 {
        (raw >> self.offset) & self.mask
    }

    #[inline(always)]
    #[must_use]
    pub const fn insert(&self, raw: u64, val: u64) -> u64 {
        (raw & !(self.mask << self.offset)) | self.place(val)
    }
}

// Field accessor generators. Each emits a layout constant plus getter/setter.

macro_rules! flag_field {
    ($(#[$doc:meta])* $get:ident, $set:ident, $konst:ident, $offset:expr) => {
        pub const $konst: $crate::FieldLayout = $crate::FieldLayout::new($offset, 1);

        $(#[$doc])*
        #[inline(always)]
        #[must_use]
        pub const fn $get(&self) -> bool {
            Self::$konst.extract(self.0) != 0
        }

        $(#[$doc])*
        #[inline(always)]
        pub fn $set(&mut self, val: bool) {
            self.0 = Self::$konst.insert(self.0, val as u64);
        }
    };
}

macro_rules! uint_field {
    ($(#[$doc:meta])* $get:ident, $set:ident, $konst:ident, $offset:expr, $width:expr) => {
        pub const $konst: $crate::FieldLayout = $crate::FieldLayout::new($offset, $width);

        $(#[$doc])*
        #[inline(always)]
        #[must_use]
        pub const fn $get(&self) -> u8 {
            Self::$konst.extract(self.0) as u8
        }

        $(#[$doc])*
        #[inline(always)]
        pub fn $set(&mut self, val: u8) {
            self.0 = Self::$konst.insert(self.0, val as u64);
        }
    };
}

macro_rules! enum_field {
    ($(#[$doc:meta])* $get:ident, $set:ident, $konst:ident, $offset:expr, $width:expr, $ty:ty) => {
        pub const $konst: $crate::FieldLayout = $crate::FieldLayout::new($offset, $width);

        $(#[$doc])*
        #[inline(always)]
        #[must_use]
        pub const fn $get(&self) -> $ty {
            <$ty>::from_bits(Self::$konst.extract(self.0) as u8)
        }

        $(#[$doc])*
        #[inline(always)]
        pub fn $set(&mut self, val: $ty) {
            self.0 = Self::$konst.insert(self.0, val.bits() as u64);
        }
    };
}

pub mod combine_mode_reg;
pub mod fields;
pub mod other_modes_reg;

pub use combine_mode_reg::CombineModeReg;
pub use fields::{
    AlphaDitherSel, CoverageDest, CycleType, ImageFormat, RgbDitherSel, TexelSize, ZMode,
};
pub use other_modes_reg::OtherModesReg;
