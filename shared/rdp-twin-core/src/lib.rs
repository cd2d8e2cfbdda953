//! Shared types for the RDP digital twin.
//!
//! Every pipeline stage crate works on a [`PipelineState`] passed in by
//! the caller. This crate holds that state together with the small value
//! types it is built from.

pub mod color;
pub mod error;
pub mod span;
pub mod state;
pub mod tile;

pub use color::Color;
pub use error::RdpError;
pub use span::{Span, SpanDeltas, SpanTable, SPAN_LINES};
pub use state::{BlendGate, BlendShifts, ImageDesc, ModeFlags, PipelineState, Scissor, COVERAGE_WIDTH};
pub use tile::{mask_bits, Tile, TileAxis};

pub type Result<T> = std::result::Result<T, RdpError>;
