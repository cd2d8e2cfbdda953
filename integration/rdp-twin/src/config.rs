use rdp_bits::Noise;

/// Construction parameters for an [`Rdp`](crate::Rdp).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdpConfig {
    /// RDRAM size in bytes.
    pub rdram_size: usize,
    /// Log every decoded command at debug level.
    pub trace_commands: bool,
    /// Initial state of the pipeline noise generator.
    pub noise_seed: u32,
}

impl RdpConfig {
    /// 8 MiB, the expansion pak configuration.
    pub const DEFAULT_RDRAM_SIZE: usize = 0x80_0000;
}

impl Default for RdpConfig {
    fn default() -> Self {
        Self {
            rdram_size: Self::DEFAULT_RDRAM_SIZE,
            trace_commands: false,
            noise_seed: Noise::RESET_SEED,
        }
    }
}
