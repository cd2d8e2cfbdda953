use rdp_twin_core::{RdpError, Result};

use crate::opcode::{Opcode, TriangleShape};
use crate::raw::Raw;
use crate::views::*;

/// Which sync flags a sync command requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncKind {
    pub load: bool,
    pub pipe: bool,
    pub tile: bool,
}

impl SyncKind {
    /// All three flags together raise the DP interrupt.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.load && self.pipe && self.tile
    }
}

/// One decoded command: its opcode and a view of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command<'a> {
    opcode: Opcode,
    raw: Raw<'a>,
}

/// Typed form of a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind<'a> {
    Noop,
    Triangle(Triangle<'a>),
    TextureRectangle(TextureRectangle<'a>),
    Sync(SyncKind),
    SetKeyGb(SetKeyGb<'a>),
    SetKeyR(SetKeyR<'a>),
    SetConvert(SetConvert<'a>),
    SetScissor(SetScissor<'a>),
    SetPrimDepth(SetPrimDepth<'a>),
    SetOtherModes(SetOtherModes<'a>),
    LoadTlut(TileRange<'a>),
    SetTileSize(TileRange<'a>),
    LoadBlock(LoadBlock<'a>),
    LoadTile(TileRange<'a>),
    SetTile(SetTile<'a>),
    FillRectangle(FillRectangle<'a>),
    SetFillColor(SetColor<'a>),
    SetFogColor(SetColor<'a>),
    SetBlendColor(SetColor<'a>),
    SetPrimColor(SetColor<'a>),
    SetEnvColor(SetColor<'a>),
    SetCombineMode(SetCombineMode<'a>),
    SetTextureImage(SetImage<'a>),
    SetZImage(SetZImage<'a>),
    SetColorImage(SetImage<'a>),
}

impl<'a> Command<'a> {
    /// Wrap a payload already known to belong to `opcode`.
    #[must_use]
    pub const fn new(opcode: Opcode, raw: Raw<'a>) -> Self {
        Self { opcode, raw }
    }

    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        self.opcode
    }

    #[must_use]
    pub const fn raw(&self) -> Raw<'a> {
        self.raw
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.bytes().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.bytes().is_empty()
    }

    /// Resolve the opcode to its typed view.
    #[must_use]
    pub fn kind(&self) -> CommandKind<'a> {
        let raw = self.raw;
        let sync = |load, pipe, tile| CommandKind::Sync(SyncKind { load, pipe, tile });
        match self.opcode {
            Opcode::Noop => CommandKind::Noop,
            Opcode::FillTriangle
            | Opcode::FillZTriangle
            | Opcode::TextureTriangle
            | Opcode::TextureZTriangle
            | Opcode::ShadeTriangle
            | Opcode::ShadeZTriangle
            | Opcode::ShadeTextureTriangle
            | Opcode::ShadeTextureZTriangle => {
                let shape = self.opcode.triangle_shape().unwrap_or_default();
                CommandKind::Triangle(Triangle::new(raw, shape))
            }
            Opcode::TextureRectangle => {
                CommandKind::TextureRectangle(TextureRectangle { raw, flip: false })
            }
            Opcode::TextureRectangleFlip => {
                CommandKind::TextureRectangle(TextureRectangle { raw, flip: true })
            }
            Opcode::SyncLoad => sync(true, false, false),
            Opcode::SyncPipe => sync(false, true, false),
            Opcode::SyncTile => sync(false, false, true),
            Opcode::SyncFull => sync(true, true, true),
            Opcode::SetKeyGb => CommandKind::SetKeyGb(SetKeyGb(raw)),
            Opcode::SetKeyR => CommandKind::SetKeyR(SetKeyR(raw)),
            Opcode::SetConvert => CommandKind::SetConvert(SetConvert(raw)),
            Opcode::SetScissor => CommandKind::SetScissor(SetScissor(raw)),
            Opcode::SetPrimDepth => CommandKind::SetPrimDepth(SetPrimDepth(raw)),
            Opcode::SetOtherModes => CommandKind::SetOtherModes(SetOtherModes(raw)),
            Opcode::LoadTlut => CommandKind::LoadTlut(TileRange(raw)),
            Opcode::SetTileSize => CommandKind::SetTileSize(TileRange(raw)),
            Opcode::LoadBlock => CommandKind::LoadBlock(LoadBlock(raw)),
            Opcode::LoadTile => CommandKind::LoadTile(TileRange(raw)),
            Opcode::SetTile => CommandKind::SetTile(SetTile(raw)),
            Opcode::FillRectangle => CommandKind::FillRectangle(FillRectangle(raw)),
            Opcode::SetFillColor => CommandKind::SetFillColor(SetColor(raw)),
            Opcode::SetFogColor => CommandKind::SetFogColor(SetColor(raw)),
            Opcode::SetBlendColor => CommandKind::SetBlendColor(SetColor(raw)),
            Opcode::SetPrimColor => CommandKind::SetPrimColor(SetColor(raw)),
            Opcode::SetEnvColor => CommandKind::SetEnvColor(SetColor(raw)),
            Opcode::SetCombineMode => CommandKind::SetCombineMode(SetCombineMode(raw)),
            Opcode::SetTextureImage => CommandKind::SetTextureImage(SetImage(raw)),
            Opcode::SetZImage => CommandKind::SetZImage(SetZImage(raw)),
            Opcode::SetColorImage => CommandKind::SetColorImage(SetImage(raw)),
        }
    }
}

/// Decode the command starting at `offset`.
///
/// Returns the command and the offset of the next one.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(Command<'_>, usize)> {
    let available = bytes.len().saturating_sub(offset);
    let Some(&first) = bytes.get(offset) else {
        return Err(RdpError::Truncated {
            offset,
            needed: 8,
            available,
        });
    };

    let id = first & 0x3F;
    let opcode = Opcode::from_id(id).ok_or(RdpError::InvalidOpcode { id, offset })?;
    let needed = opcode.size();
    let payload = bytes
        .get(offset..offset + needed)
        .ok_or(RdpError::Truncated {
            offset,
            needed,
            available,
        })?;

    Ok((Command::new(opcode, Raw::new(payload)), offset + needed))
}

/// Iterator over the commands of a display list.
///
/// Stops after the first decode error.
#[derive(Debug, Clone)]
pub struct DisplayList<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> DisplayList<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            failed: false,
        }
    }

    /// Byte offset of the next command.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for DisplayList<'a> {
    type Item = Result<(usize, Command<'a>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.bytes.len() {
            return None;
        }
        let start = self.offset;
        match decode(self.bytes, start) {
            Ok((cmd, next)) => {
                self.offset = next;
                Some(Ok((start, cmd)))
            }
            Err(e) => {
                log::warn!("display list stopped at {start:#x}: {e}");
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Build a triangle view over a synthesized edge/texture block.
#[must_use]
pub fn triangle_from_bytes(bytes: &[u8], texture: bool) -> Triangle<'_> {
    Triangle::new(Raw::new(bytes), TriangleShape::new(false, texture, false))
}
