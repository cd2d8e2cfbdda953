//! DPC command registers.
//!
//! The command interface lives at physical 0x0410_0000: START and END
//! bound the display list in RDRAM, CURRENT tracks progress through it,
//! and STATUS reports pipeline activity. Writes to STATUS are set/clear
//! bit pairs, not plain stores.

/// DPC_STATUS
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct DpcStatus(u32);

impl DpcStatus {
    /// Command list is fetched from RSP DMEM instead of RDRAM.
    pub const XBUS_DMEM_DMA: Self = Self(0x001);
    pub const FREEZE: Self = Self(0x002);
    pub const FLUSH: Self = Self(0x004);
    pub const START_GCLK: Self = Self(0x008);
    pub const TMEM_BUSY: Self = Self(0x010);
    pub const PIPE_BUSY: Self = Self(0x020);
    pub const CMD_BUSY: Self = Self(0x040);
    pub const CBUF_READY: Self = Self(0x080);
    pub const DMA_BUSY: Self = Self(0x100);
    pub const END_VALID: Self = Self(0x200);
    pub const START_VALID: Self = Self(0x400);

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & 0x7FF)
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl core::ops::BitOr for DpcStatus {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Register offsets within the DPC block.
pub mod reg {
    pub const START: u32 = 0x00;
    pub const END: u32 = 0x04;
    pub const CURRENT: u32 = 0x08;
    pub const STATUS: u32 = 0x0C;
}

/// Display list addresses are 24-bit and 8-byte aligned.
pub const ADDRESS_MASK: u32 = 0x00FF_FFF8;

/// START, END, CURRENT and STATUS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpcRegs {
    pub start: u32,
    pub end: u32,
    pub current: u32,
    pub status: DpcStatus,
}

impl DpcRegs {
    /// Apply a write to STATUS.
    pub fn write_status(&mut self, val: u32) {
        let pairs = [
            (0x01, 0x02, DpcStatus::XBUS_DMEM_DMA),
            (0x04, 0x08, DpcStatus::FREEZE),
            (0x10, 0x20, DpcStatus::FLUSH),
        ];
        for (clear, set, flag) in pairs {
            if val & clear != 0 {
                self.status.remove(flag);
            }
            if val & set != 0 {
                self.status.insert(flag);
            }
        }
    }
}
