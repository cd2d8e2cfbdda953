//! Texture unit.
//!
//! Copies texture images from RDRAM into TMEM through the load
//! pipeline, reads texels back out of TMEM in each tile format and turns
//! one or four texels into the filtered colour the combiner sees. Copy
//! mode bypasses filtering and fetches raw 64-bit runs of texels.

mod copy;
mod cycle;
mod fetch;
mod load;

pub use copy::{fetch_qword_copy, replicate_for_copy};
pub use cycle::{pipeline_cycle, texel1_coord_1cycle};
pub use fetch::{fetch_index, fetch_texel, rgba16, tlut_entry};
pub use load::{load, LoadKind, LoadRequest};
