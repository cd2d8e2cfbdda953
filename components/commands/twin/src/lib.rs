//! RDP display-list decoding.
//!
//! Commands are decoded in place from a big-endian byte buffer. Each
//! [`Command`] borrows its payload and exposes a typed view through
//! [`Command::kind`]. Rectangles can be re-expressed as triangle payloads
//! so that one edge walker rasterizes every primitive.

pub mod command;
pub mod disasm;
pub mod opcode;
pub mod raw;
pub mod rect;
pub mod views;

pub use command::{decode, triangle_from_bytes, Command, CommandKind, DisplayList, SyncKind};
pub use opcode::{Opcode, TriangleShape};
pub use raw::Raw;
pub use views::{
    FillRectangle, LoadBlock, SetColor, SetCombineMode, SetConvert, SetImage, SetKeyGb, SetKeyR,
    SetOtherModes, SetPrimDepth, SetScissor, SetTile, SetZImage, ShadeCoeff, TextureCoeff,
    TextureRectangle, TileRange, Triangle, ZCoeff,
};
