//! Memory model for the RDP digital twin.
//!
//! [`Rdram`] is main memory as the display processor sees it: big-endian
//! bytes plus the hidden ninth-bit plane that holds two bits per 16-bit
//! word. [`Tmem`] is the 4 KiB on-chip texture memory.

pub mod rdram;
pub mod snapshot;
pub mod tmem;

pub use rdram::{Rdram, RDRAM_MASK};
pub use snapshot::snapshot;
pub use tmem::{Tmem, TMEM_SIZE};
