/// Errors raised while decoding or executing a display list.
#[derive(Debug, thiserror::Error)]
pub enum RdpError {
    /// The command id does not name a command the display processor knows.
    #[error("invalid opcode {id:#04x} at offset {offset:#x}")]
    InvalidOpcode { id: u8, offset: usize },

    /// The display list ends part way through a command.
    #[error("truncated command at offset {offset:#x}: needs {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A memory access fell outside RDRAM.
    #[error("address {address:#010x} is outside RDRAM")]
    AddressOutOfRange { address: u32 },

    /// I/O error reading a display list or writing an image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
