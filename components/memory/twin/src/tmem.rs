/// Texture memory size in bytes.
pub const TMEM_SIZE: usize = 0x1000;

/// On-chip texture memory.
///
/// Addresses wrap at 4 KiB. The upper half doubles as palette storage
/// and as the blue/alpha plane of 32-bit textures.
#[derive(Debug, Clone)]
pub struct Tmem {
    bytes: Box<[u8; TMEM_SIZE]>,
}

impl Default for Tmem {
    fn default() -> Self {
        Self {
            bytes: Box::new([0; TMEM_SIZE]),
        }
    }
}

impl Tmem {
    const MASK: usize = TMEM_SIZE - 1;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }

    #[must_use]
    pub fn read8(&self, address: usize) -> u8 {
        self.bytes[address & Self::MASK]
    }

    pub fn write8(&mut self, address: usize, value: u8) {
        self.bytes[address & Self::MASK] = value;
    }

    /// Big-endian halfword. `address` is aligned down to 2.
    #[must_use]
    pub fn read16(&self, address: usize) -> u16 {
        let a = address & Self::MASK & !1;
        u16::from_be_bytes([self.bytes[a], self.bytes[a + 1]])
    }

    pub fn write16(&mut self, address: usize, value: u16) {
        let a = address & Self::MASK & !1;
        self.bytes[a..a + 2].copy_from_slice(&value.to_be_bytes());
    }

    /// Halfword by 16-bit index.
    #[must_use]
    pub fn read16_idx(&self, index: usize) -> u16 {
        self.read16(index << 1)
    }

    pub fn write16_idx(&mut self, index: usize, value: u16) {
        self.write16(index << 1, value);
    }
}
