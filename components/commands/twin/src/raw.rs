/// Borrowed command payload.
///
/// Display lists are big-endian. Field offsets are counted from bit 0 of
/// each 64-bit word, so word 0 holds the command id in bits 56..61 and
/// coefficient blocks follow in later words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Raw<'a> {
    bytes: &'a [u8],
}

impl<'a> Raw<'a> {
    /// Wrap a payload. `bytes` should be a whole number of 64-bit words.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.bytes.len() / 8
    }

    /// Word `index`, zero when past the end of the payload. The two
    /// unused bits at the top of the first word are masked off.
    #[must_use]
    pub fn word(&self, index: usize) -> u64 {
        let start = index * 8;
        let Some(chunk) = self.bytes.get(start..start + 8) else {
            return 0;
        };
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        let word = u64::from_be_bytes(buf);
        if index == 0 {
            word & 0x3FFF_FFFF_FFFF_FFFF
        } else {
            word
        }
    }

    /// `(word >> offset) & mask`
    #[inline]
    #[must_use]
    pub fn field(&self, index: usize, offset: u32, mask: u32) -> i32 {
        ((self.word(index) >> offset) as u32 & mask) as i32
    }

    #[inline]
    #[must_use]
    pub fn flag(&self, index: usize, offset: u32) -> bool {
        self.field(index, offset, 1) != 0
    }

    /// Sixteen-bit lane `lane` (0 = least significant) of word `index`.
    #[inline]
    #[must_use]
    pub fn lane(&self, index: usize, lane: u32) -> i32 {
        self.field(index, lane * 16, 0xFFFF)
    }
}
