use rdp_twin_core::{RdpError, Result};

/// Addresses wrap at 16 MiB.
pub const RDRAM_MASK: u32 = 0x00FF_FFFF;

/// Main memory with its hidden-bit plane.
///
/// The `*_idx16` and `*_idx32` accessors take element indices rather than
/// byte addresses. Out-of-range reads return zero and out-of-range writes
/// are dropped.
#[derive(Debug, Clone)]
pub struct Rdram {
    bytes: Vec<u8>,
    /// Two bits per 16-bit word.
    hidden: Vec<u8>,
}

impl Rdram {
    /// Zeroed memory of `size` bytes with the hidden plane cleared.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
            hidden: vec![0; size / 2],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Power-on state of the hidden plane: every pair set.
    pub fn init(&mut self) {
        self.hidden.fill(3);
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Copy `data` into memory at byte address `address`.
    pub fn load(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let start = address as usize;
        let dst = self
            .bytes
            .get_mut(start..start + data.len())
            .ok_or(RdpError::AddressOutOfRange { address })?;
        dst.copy_from_slice(data);
        Ok(())
    }

    /// Borrow `len` bytes at `address`.
    pub fn slice(&self, address: u32, len: usize) -> Result<&[u8]> {
        let start = address as usize;
        self.bytes
            .get(start..start + len)
            .ok_or(RdpError::AddressOutOfRange { address })
    }

    fn range<const N: usize>(&self, byte: usize) -> Option<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes.get(byte..byte + N)?);
        Some(out)
    }

    fn store<const N: usize>(&mut self, byte: usize, value: [u8; N]) -> bool {
        match self.bytes.get_mut(byte..byte + N) {
            Some(dst) => {
                dst.copy_from_slice(&value);
                true
            }
            None => false,
        }
    }

    // -- 8-bit ---------------------------------------------------------------

    #[must_use]
    pub fn read_idx8(&self, address: u32) -> u8 {
        let address = (address & RDRAM_MASK) as usize;
        self.bytes.get(address).copied().unwrap_or(0)
    }

    pub fn write_idx8(&mut self, address: u32, value: u8) {
        let address = (address & RDRAM_MASK) as usize;
        if let Some(b) = self.bytes.get_mut(address) {
            *b = value;
        }
    }

    // -- 16-bit --------------------------------------------------------------

    #[must_use]
    pub fn read_idx16(&self, index: u32) -> u16 {
        let index = (index & (RDRAM_MASK >> 1)) as usize;
        self.range(index << 1).map_or(0, u16::from_be_bytes)
    }

    pub fn write_idx16(&mut self, index: u32, value: u16) {
        let index = (index & (RDRAM_MASK >> 1)) as usize;
        self.store(index << 1, value.to_be_bytes());
    }

    // -- 32-bit --------------------------------------------------------------

    #[must_use]
    pub fn read_idx32(&self, index: u32) -> u32 {
        let index = (index & (RDRAM_MASK >> 2)) as usize;
        self.range(index << 2).map_or(0, u32::from_be_bytes)
    }

    pub fn write_idx32(&mut self, index: u32, value: u32) {
        let index = (index & (RDRAM_MASK >> 2)) as usize;
        self.store(index << 2, value.to_be_bytes());
    }

    // -- Hidden bits ---------------------------------------------------------

    /// Hidden pair of the 16-bit word at `index`.
    #[must_use]
    pub fn hidden(&self, index: u32) -> u8 {
        self.hidden.get(index as usize).copied().unwrap_or(0)
    }

    fn set_hidden(&mut self, index: usize, value: u8) {
        if let Some(h) = self.hidden.get_mut(index) {
            *h = value & 3;
        }
    }

    /// 16-bit word and its hidden pair.
    #[must_use]
    pub fn read_pair16(&self, index: u32) -> (u16, u8) {
        let index = (index & (RDRAM_MASK >> 1)) as usize;
        match self.range(index << 1) {
            Some(b) => (u16::from_be_bytes(b), self.hidden(index as u32)),
            None => (0, 0),
        }
    }

    /// Byte write. Odd addresses also set the hidden pair of their word.
    pub fn write_pair8(&mut self, address: u32, value: u8, hidden: u8) {
        let address = (address & RDRAM_MASK) as usize;
        if let Some(b) = self.bytes.get_mut(address) {
            *b = value;
            if address & 1 != 0 {
                self.set_hidden(address >> 1, hidden);
            }
        }
    }

    pub fn write_pair16(&mut self, index: u32, value: u16, hidden: u8) {
        let index = (index & (RDRAM_MASK >> 1)) as usize;
        if self.store(index << 1, value.to_be_bytes()) {
            self.set_hidden(index, hidden);
        }
    }

    /// 32-bit write covering two 16-bit words and their hidden pairs.
    pub fn write_pair32(&mut self, index: u32, value: u32, hidden0: u8, hidden1: u8) {
        let index = (index & (RDRAM_MASK >> 2)) as usize;
        if self.store(index << 2, value.to_be_bytes()) {
            self.set_hidden(index * 2, hidden0);
            self.set_hidden(index * 2 + 1, hidden1);
        }
    }
}

impl Default for Rdram {
    /// 8 MiB, the expanded-memory size.
    fn default() -> Self {
        Self::new(0x80_0000)
    }
}
