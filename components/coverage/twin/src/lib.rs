//! Coverage stage.
//!
//! Each pixel carries eight antialiasing samples, two per sub-scanline,
//! packed into one byte of the coverage buffer:
//!
//! ```text
//!   bit  7 6 5 4 3 2 1 0
//!   y0   x . x . . . . .
//!   y1   . x . x . . . .
//!   y2   . . . . x . x .
//!   y3   . . . . . x . x
//! ```
//!
//! [`compute`] fills the buffer for one scanline from the span's
//! sub-scanline edges. [`lookup`] turns a mask into the sample count,
//! the full-coverage bit and the offset of the first covered sample.

use rdp_registers::CoverageDest;
use rdp_twin_core::PipelineState;

/// What a coverage mask means to the rest of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskInfo {
    /// Covered samples, 0..=8.
    pub count: u8,
    /// Sample 7 is covered.
    pub bit: bool,
    /// Sub-pixel offset of the first covered sample, used to pick the
    /// Z and attribute sample point.
    pub x: u8,
    pub y: u8,
}

const Y_OFFSET: [u8; 16] = [0, 0, 1, 0, 2, 0, 1, 0, 3, 0, 1, 0, 2, 0, 1, 0];
const X_OFFSET: [u8; 16] = [0, 3, 2, 2, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0];

/// Spread an 8-sample mask over the 4x4 sub-pixel grid, one nibble per
/// sub-scanline, top row in the high nibble.
#[must_use]
pub const fn decompress_mask(mask: u8) -> u16 {
    let x = mask as u16;
    (x & 0x5) | ((x & 0x5A) << 4) | ((x & 0xA0) << 8)
}

const fn mask_info(i: usize) -> MaskInfo {
    let mask = decompress_mask(i as u8);

    let mut rows = 0;
    let mut k = 0;
    while k < 4 {
        if mask & (0xF000 >> (k << 2)) != 0 {
            rows |= 1 << k;
        }
        k += 1;
    }
    let y = Y_OFFSET[rows];
    let row = (mask & (0xF000 >> (y << 2))) >> ((y ^ 3) << 2);

    MaskInfo {
        count: (i as u8).count_ones() as u8,
        bit: i & 0x80 != 0,
        x: X_OFFSET[row as usize],
        y,
    }
}

const fn build_lut() -> [MaskInfo; 256] {
    let mut lut = [MaskInfo {
        count: 0,
        bit: false,
        x: 0,
        y: 0,
    }; 256];
    let mut i = 0;
    while i < 256 {
        lut[i] = mask_info(i);
        i += 1;
    }
    lut
}

static MASK_LUT: [MaskInfo; 256] = build_lut();

/// Count, full bit and sample offset of `mask`.
#[must_use]
pub fn lookup(mask: u8) -> MaskInfo {
    MASK_LUT[usize::from(mask)]
}

/// Samples covered to the right of a left edge at `x` (13.3).
const fn right_samples(x: i32, fmask: u8) -> u8 {
    let covered = ((x & 7) + 1) >> 1;
    (0xF0u8 >> covered) & fmask
}

/// Samples covered to the left of a right edge at `x` (13.3).
const fn left_samples(x: i32, fmask: u8) -> u8 {
    let covered = ((x & 7) + 1) >> 1;
    (0x0Fu8 >> covered) & fmask
}

fn and_range(buf: &mut [u8], from: i32, to: i32, keep: u8) {
    for k in from.max(0)..=to {
        match buf.get_mut(k as usize) {
            Some(b) => *b &= keep,
            None => break,
        }
    }
}

fn or_at(buf: &mut [u8], at: i32, bits: u8) {
    if let Some(b) = usize::try_from(at).ok().and_then(|i| buf.get_mut(i)) {
        *b |= bits;
    }
}

/// Fill the coverage buffer for `scanline`.
///
/// Every pixel between the span's outer bounds starts fully covered;
/// each sub-scanline then clears the samples outside its minor/major
/// edges and sets the partial samples of the two edge pixels. With
/// `flip` the major edge is on the left.
pub fn compute(state: &mut PipelineState, scanline: i32, flip: bool) {
    let Some(span) = state.spans.get(scanline).copied() else {
        return;
    };
    let buf = &mut state.coverage[..];

    let (minor_hex, major_hex): (fn(i32, u8) -> u8, fn(i32, u8) -> u8) = if flip {
        (right_samples, left_samples)
    } else {
        (left_samples, right_samples)
    };
    let (start, end) = if flip {
        (span.rx, span.lx)
    } else {
        (span.lx, span.rx)
    };
    if end < start {
        return;
    }

    for k in start.max(0)..=end {
        match buf.get_mut(k as usize) {
            Some(b) => *b = 0xFF,
            None => break,
        }
    }

    for i in 0..4 {
        let fmask: u8 = 0xA >> (i & 1);
        let shift = (i as i32 - 2) & 4;
        let keep = !(fmask << shift);

        if span.invalid_y_scan[i] {
            and_range(buf, start, end, keep);
            continue;
        }

        let minor = span.minorx[i];
        let major = span.majorx[i];
        let (minor_px, major_px) = (minor >> 3, major >> 3);
        let (a, b) = if flip {
            (major_px, minor_px)
        } else {
            (minor_px, major_px)
        };

        and_range(buf, start, a, keep);
        and_range(buf, b, end, keep);

        if b > a {
            or_at(buf, minor_px, minor_hex(minor, fmask) << shift);
            or_at(buf, major_px, major_hex(major, fmask) << shift);
        }
        if minor_px == major_px {
            let both = minor_hex(minor, fmask) & major_hex(major, fmask);
            or_at(buf, major_px, both << shift);
        }
    }
}

/// Coverage value stored back to memory with a pixel.
///
/// `pixel` is the primitive's sample count, `memory` the stored value.
#[must_use]
pub fn finalize(dest: CoverageDest, blend_en: bool, pixel: u32, memory: u32) -> u32 {
    match dest {
        CoverageDest::Clamp => {
            let cvg = if blend_en {
                pixel.wrapping_add(memory)
            } else {
                pixel.wrapping_sub(1)
            };
            if cvg & 8 == 0 {
                cvg & 7
            } else {
                7
            }
        }
        CoverageDest::Wrap => pixel.wrapping_add(memory) & 7,
        CoverageDest::Zap => 7,
        CoverageDest::Save => memory,
    }
}
