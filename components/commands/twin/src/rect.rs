//! Rectangle commands re-expressed as right-major triangles so the edge
//! walker handles every primitive.

use crate::views::{FillRectangle, TextureRectangle};

fn push(out: &mut Vec<u8>, hi: u32, lo: u32) {
    out.extend_from_slice(&((u64::from(hi) << 32) | u64::from(lo)).to_be_bytes());
}

/// Edge block for a rectangle. Copy and fill modes cover the whole last
/// scanline, so `yl` is rounded down to its last sub-scanline.
fn edges(out: &mut Vec<u8>, head: u32, xl: i32, yl: i32, xh: i32, yh: i32, whole_lines: bool) {
    let yl = if whole_lines { yl | 3 } else { yl };
    let xlint = ((xl >> 2) & 0x3FF) as u32;
    let xhint = ((xh >> 2) & 0x3FF) as u32;
    let xl_word = (xlint << 16) | (((xl & 3) as u32) << 14);
    let xh_word = (xhint << 16) | (((xh & 3) as u32) << 14);

    push(out, head | yl as u32, ((yl as u32) << 16) | yh as u32);
    push(out, xl_word, 0);
    push(out, xh_word, 0);
    push(out, xl_word, 0);
}

impl FillRectangle<'_> {
    /// Big-endian `Fill_Triangle` payload covering this rectangle.
    #[must_use]
    pub fn to_triangle(&self, whole_lines: bool) -> Vec<u8> {
        let mut out = Vec::with_capacity(32);
        edges(
            &mut out,
            0x3680 << 16,
            self.xl(),
            self.yl(),
            self.xh(),
            self.yh(),
            whole_lines,
        );
        out
    }
}

impl TextureRectangle<'_> {
    /// Big-endian `Texture_Triangle` payload covering this rectangle.
    #[must_use]
    pub fn to_triangle(&self, whole_lines: bool) -> Vec<u8> {
        let mut out = Vec::with_capacity(96);
        let id: u32 = if self.flip() { 0x25 } else { 0x24 };
        let head = (id << 24) | ((0x80 | self.tile() as u32) << 16);
        edges(
            &mut out,
            head,
            self.xl(),
            self.yl(),
            self.xh(),
            self.yh(),
            whole_lines,
        );

        let dsdx = i32::from(self.dsdx() as u16 as i16);
        let dtdy = i32::from(self.dtdy() as u16 as i16);
        let st = ((self.s() as u32) << 16) | self.t() as u32;

        // Integer part of a gradient in the S lane or the T lane.
        let s_int = ((dsdx >> 5) << 16) as u32;
        let t_int = ((dtdy >> 5) & 0xFFFF) as u32;

        push(&mut out, st, 0);
        if self.flip() {
            let s_frac = ((dsdx & 0x1F) << 27) as u32;
            let t_frac = ((dtdy & 0x1F) << 11) as u32;
            push(&mut out, t_int, 0);
            push(&mut out, 0, 0);
            push(&mut out, t_frac, 0);
            push(&mut out, s_int, 0);
            push(&mut out, s_int, 0);
            push(&mut out, s_frac, 0);
            push(&mut out, s_frac, 0);
        } else {
            let s_frac = (((dsdx & 0x1F) << 11) << 16) as u32;
            let t_frac = ((dtdy & 0x1F) << 11) as u32;
            push(&mut out, s_int, 0);
            push(&mut out, 0, 0);
            push(&mut out, s_frac, 0);
            push(&mut out, t_int, 0);
            push(&mut out, t_int, 0);
            push(&mut out, t_frac, 0);
            push(&mut out, t_frac, 0);
        }
        out
    }
}
