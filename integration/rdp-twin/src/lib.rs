//! Bit-accurate digital twin of the N64 Reality Display Processor.
//!
//! [`Rdp`] owns the pipeline register file, RDRAM and TMEM. Display lists
//! are submitted through the DPC registers (or [`Rdp::submit`]) and run to
//! completion synchronously: every command is decoded, dispatched to its
//! handler, and primitives are walked and rendered span by span through
//! the stage crates.
//!
//! A list submitted while the pipeline is frozen is held until the freeze
//! is released and [`Rdp::step`] is called.

mod config;
mod dispatch;
mod render;
pub mod status;

pub use config::RdpConfig;
pub use status::{DpcRegs, DpcStatus};

use std::path::Path;

use image::RgbaImage;
use log::{debug, info, warn};
use rdp_blender::Blender;
use rdp_color_combiner::Combiner;
use rdp_commands::DisplayList;
use rdp_memory::{Rdram, Tmem};
use rdp_twin_core::{PipelineState, Result};

use crate::status::{reg, ADDRESS_MASK};

/// The display processor.
#[derive(Debug, Clone)]
pub struct Rdp {
    pub state: PipelineState,
    pub rdram: Rdram,
    pub tmem: Tmem,
    combiner: Combiner,
    blender: Blender,
    regs: DpcRegs,
    /// A list arrived while frozen and waits in `[current, end)`.
    pending: bool,
    interrupt: bool,
    trace: bool,
}

impl Default for Rdp {
    fn default() -> Self {
        Self::new(RdpConfig::default())
    }
}

impl Rdp {
    /// Power-on state. Call [`Rdp::init`] before submitting work.
    #[must_use]
    pub fn new(config: RdpConfig) -> Self {
        let state = PipelineState::new(config.noise_seed);
        Self {
            combiner: Combiner::new(state.combine_mode),
            blender: Blender::new(state.other_modes),
            state,
            rdram: Rdram::new(config.rdram_size),
            tmem: Tmem::new(),
            regs: DpcRegs::default(),
            pending: false,
            interrupt: false,
            trace: config.trace_commands,
        }
    }

    /// Reset the command interface and bring the pipeline up.
    pub fn init(&mut self) {
        self.regs = DpcRegs {
            status: DpcStatus::CBUF_READY | DpcStatus::START_GCLK | DpcStatus::PIPE_BUSY,
            ..DpcRegs::default()
        };
        self.rdram.init();
        self.state.pipeline_crashed = false;
        self.state.invalidate_derivatives();
        self.pending = false;
        self.interrupt = false;
    }

    #[must_use]
    pub fn status(&self) -> DpcStatus {
        self.regs.status
    }

    #[must_use]
    pub fn regs(&self) -> &DpcRegs {
        &self.regs
    }

    #[must_use]
    pub fn combiner(&self) -> &Combiner {
        &self.combiner
    }

    #[must_use]
    pub fn blender(&self) -> &Blender {
        &self.blender
    }

    /// The pipeline hung on an unsupported configuration and ignores
    /// primitives until the next [`Rdp::init`].
    #[must_use]
    pub fn pipeline_crashed(&self) -> bool {
        self.state.pipeline_crashed
    }

    /// A list is waiting for the freeze to be released.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Read a DPC register by offset.
    #[must_use]
    pub fn read_reg(&self, offset: u32) -> u32 {
        match offset & 0x1F {
            reg::START => self.regs.start,
            reg::END => self.regs.end,
            reg::CURRENT => self.regs.current,
            reg::STATUS => self.regs.status.bits(),
            _ => 0,
        }
    }

    /// Write a DPC register by offset. Writing END submits `[START, END)`.
    pub fn write_reg(&mut self, offset: u32, val: u32) -> Result<()> {
        match offset & 0x1F {
            reg::START => {
                self.regs.start = val & ADDRESS_MASK;
                self.regs.status.insert(DpcStatus::START_VALID);
            }
            reg::END => {
                self.regs.status.insert(DpcStatus::END_VALID);
                return self.submit(self.regs.start, val);
            }
            reg::STATUS => self.write_status(val),
            _ => {}
        }
        Ok(())
    }

    /// Apply a STATUS write. Releasing the freeze does not resume a
    /// pending list by itself; see [`Rdp::step`].
    pub fn write_status(&mut self, val: u32) {
        self.regs.write_status(val);
    }

    /// Submit the display list in RDRAM between `start` and `end`.
    ///
    /// Runs the list to completion unless the pipeline is frozen, in which
    /// case it is held for [`Rdp::step`]. A decode error stops the list at
    /// the offending command, leaves CURRENT pointing at it and is
    /// returned.
    pub fn submit(&mut self, start: u32, end: u32) -> Result<()> {
        let start = start & ADDRESS_MASK;
        let end = end & ADDRESS_MASK;
        self.regs.start = start;
        self.regs.end = end;
        self.regs.current = start;

        if end <= start {
            return Ok(());
        }

        if self.regs.status.contains(DpcStatus::FREEZE) {
            info!("display list {start:#08x}..{end:#08x} held while frozen");
            self.pending = true;
            return Ok(());
        }

        self.process()
    }

    /// Resume a held list once the freeze is released.
    ///
    /// Returns whether a list ran.
    pub fn step(&mut self) -> Result<bool> {
        if !self.pending || self.regs.status.contains(DpcStatus::FREEZE) {
            return Ok(false);
        }
        self.process().map(|()| true)
    }

    /// Whether a `Sync_Full` raised the DP interrupt since the last call.
    pub fn take_interrupt(&mut self) -> bool {
        core::mem::take(&mut self.interrupt)
    }

    /// Execute a display list held outside RDRAM.
    pub fn run(&mut self, bytes: &[u8]) -> Result<()> {
        let mut count = 0usize;
        for item in DisplayList::new(bytes) {
            let (offset, cmd) = item?;
            if self.trace {
                debug!("{offset:#06x}: {cmd}");
            }
            self.execute(&cmd);
            count += 1;
        }
        debug!("{count} commands executed");
        Ok(())
    }

    fn process(&mut self) -> Result<()> {
        let base = self.regs.current;
        let end = self.regs.end;
        self.pending = false;

        self.regs.status.insert(DpcStatus::CMD_BUSY);
        self.regs.status.remove(DpcStatus::FREEZE);

        let bytes = match self.rdram.slice(base, (end - base) as usize) {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                self.regs.status.remove(DpcStatus::CMD_BUSY);
                return Err(e);
            }
        };
        info!("display list {base:#08x}..{end:#08x}, {} bytes", bytes.len());

        let mut list = DisplayList::new(&bytes);
        let mut result = Ok(());
        for item in list.by_ref() {
            match item {
                Ok((offset, cmd)) => {
                    if self.trace {
                        debug!("{:#08x}: {cmd}", base as usize + offset);
                    }
                    self.execute(&cmd);
                }
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        self.regs.current = base + list.offset() as u32;
        self.regs.status.remove(DpcStatus::CMD_BUSY);
        result
    }

    /// Copy `height` rows of the current colour image out of RDRAM.
    #[must_use]
    pub fn snapshot(&self, height: u32) -> RgbaImage {
        let image = &self.state.color_image;
        if image.width <= 0 {
            warn!("no colour image set");
        }
        rdp_memory::snapshot(
            &self.rdram,
            image.address,
            image.width.max(0) as u32,
            height,
            image.size,
        )
    }
}

/// Read a raw big-endian display list from disk.
pub fn load_display_list(path: &Path) -> Result<Vec<u8>> {
    let bytes = std::fs::read(path)?;
    if bytes.len() % 8 != 0 {
        warn!(
            "{}: {} bytes is not a whole number of command words",
            path.display(),
            bytes.len()
        );
    }
    Ok(bytes)
}
