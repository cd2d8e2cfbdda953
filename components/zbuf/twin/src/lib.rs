//! Depth buffer.
//!
//! Depth is kept per pixel as an 18-bit value compressed into 14 bits
//! (3-bit exponent, 11-bit mantissa) in the top of a 16-bit word. The
//! pixel's depth slope is stored alongside as a 4-bit log2: two bits in
//! the bottom of the word, two in the RDRAM hidden bits.

use rdp_memory::Rdram;
use rdp_registers::ZMode;
use rdp_twin_core::{BlendGate, PipelineState};

/// Largest 18-bit depth; a cleared buffer.
pub const Z_MAX: u32 = 0x3FFFF;

/// Mantissa shift and exponent base for each compressed exponent.
const Z_DEC: [(u32, u32); 8] = [
    (6, 0x00000),
    (5, 0x20000),
    (4, 0x30000),
    (3, 0x38000),
    (2, 0x3C000),
    (1, 0x3E000),
    (0, 0x3F000),
    (0, 0x3F800),
];

/// Compress an 18-bit depth into the top 14 bits of a word.
#[must_use]
pub const fn z_compress(z: u32) -> u16 {
    let z = z & Z_MAX;
    let v = match (z >> 11) & 0x7F {
        0x00..=0x3F => (z >> 4) & 0x1FFC,
        0x40..=0x5F => ((z >> 3) & 0x1FFC) | 0x2000,
        0x60..=0x6F => ((z >> 2) & 0x1FFC) | 0x4000,
        0x70..=0x77 => ((z >> 1) & 0x1FFC) | 0x6000,
        0x78..=0x7B => (z & 0x1FFC) | 0x8000,
        0x7C..=0x7D => ((z << 1) & 0x1FFC) | 0xA000,
        0x7E => ((z << 2) & 0x1FFC) | 0xC000,
        _ => ((z << 2) & 0x1FFC) | 0xE000,
    };
    v as u16
}

/// Expand the depth held in a stored word.
#[must_use]
pub const fn z_decompress(word: u16) -> u32 {
    let i = (word >> 2) as u32 & 0x3FFF;
    let (shift, add) = Z_DEC[((i >> 11) & 7) as usize];
    (((i & 0x7FF) << shift) + add) & Z_MAX
}

/// Log2 of a one-hot depth slope.
#[must_use]
pub const fn dz_compress(value: u32) -> u32 {
    let mut j = 0;
    if value & 0xFF00 != 0 {
        j |= 8;
    }
    if value & 0xF0F0 != 0 {
        j |= 4;
    }
    if value & 0xCCCC != 0 {
        j |= 2;
    }
    if value & 0xAAAA != 0 {
        j |= 1;
    }
    j
}

#[must_use]
pub const fn dz_decompress(encoded: u32) -> u32 {
    1 << (encoded & 0xF)
}

/// Highest set bit of a 16-bit slope, or zero.
#[must_use]
pub const fn delta_z_comparator(v: u32) -> u32 {
    let v = v & 0xFFFF;
    if v == 0 {
        0
    } else {
        1 << (31 - v.leading_zeros())
    }
}

/// Round a summed depth slope up to a power of two.
#[must_use]
pub const fn normalize_dzpix(sum: i32) -> u16 {
    if sum & 0xC000 != 0 {
        return 0x8000;
    }
    if sum & 0xFFFF == 0 {
        return 1;
    }
    if sum == 1 {
        return 3;
    }
    // Some bit of 0x3FFF is set here.
    let low = (sum & 0x3FFF) as u32;
    (1u32 << (32 - low.leading_zeros())) as u16
}

/// One pixel's depth as it reaches the depth test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZSample {
    /// 16-bit word index of the pixel in the depth image.
    pub index: u32,
    pub z: u32,
    /// Normalised depth slope, a power of two.
    pub dz: u16,
    /// `dz_compress(dz)`
    pub dz_enc: i32,
}

/// Shifts applied to the blender weights when depth compare is off.
fn uncompared_shift_b(dz_enc: i32) -> i32 {
    if dz_enc < 0xB {
        4
    } else {
        0xF - dz_enc
    }
}

/// Run the depth test for one pixel.
///
/// Returns whether the pixel passes, together with the blend enable and
/// coverage overflow derived from it. Interpenetrating surfaces scale
/// `cvg` by how far the pixel pokes through the stored surface. Updates
/// the blender shifts when the current modes read memory alpha.
pub fn z_compare(
    state: &mut PipelineState,
    rdram: &Rdram,
    px: ZSample,
    cvg: &mut u32,
    memcvg: u32,
) -> (bool, BlendGate) {
    let modes = state.other_modes;
    let flags = state.flags;
    let overflow = (memcvg + *cvg) & 8 != 0;

    if !modes.z_compare_en() {
        if flags.real_shifter_needed {
            state.shifts.shift_a = 0;
            state.shifts.shift_b = uncompared_shift_b(px.dz_enc);
        }
        if flags.inter_shifter_needed {
            state.shifts.past_shift_a = 0;
            state.shifts.past_shift_b = uncompared_shift_b(px.dz_enc);
        }
        state.past_raw_dzmem = 0xF;
        let gate = BlendGate {
            enable_blend: modes.force_blend() || (!overflow && modes.antialias_en()),
            prewrap: overflow,
        };
        return (true, gate);
    }

    let sz = px.z & Z_MAX;
    let (zval, hval) = rdram.read_pair16(px.index);
    let oz = z_decompress(zval);
    let raw_dzmem = (i32::from(zval & 3) << 2) | i32::from(hval);
    let mut dzmem = dz_decompress(raw_dzmem as u32);

    if flags.real_shifter_needed {
        state.shifts.shift_a = (px.dz_enc - raw_dzmem).clamp(0, 4);
        state.shifts.shift_b = (raw_dzmem - px.dz_enc).clamp(0, 4);
    }
    if flags.inter_shifter_needed {
        state.shifts.past_shift_a = (px.dz_enc - state.past_raw_dzmem).clamp(0, 4);
        state.shifts.past_shift_b = (state.past_raw_dzmem - px.dz_enc).clamp(0, 4);
    }
    state.past_raw_dzmem = raw_dzmem;

    // Low exponents have more precision than the stored slope suggests.
    let mut coplanar = false;
    let precision = u32::from(zval >> 13);
    if precision < 3 {
        if dzmem == 0x8000 {
            coplanar = true;
            dzmem = 0xFFFF;
        } else {
            dzmem = (dzmem << 1).max(16 >> precision);
        }
    }

    let dz_unshifted = delta_z_comparator(u32::from(px.dz) | dzmem);
    let dznew = dz_unshifted << 3;
    let farther = coplanar || sz + dznew >= oz;

    let gate = BlendGate {
        enable_blend: modes.force_blend() || (!overflow && modes.antialias_en() && farther),
        prewrap: overflow,
    };

    let nearer = coplanar || (sz as i32 - dznew as i32) <= oz as i32;
    let max = oz == Z_MAX;
    let infront = sz < oz;
    let standard = max || if overflow { infront } else { nearer };

    let pass = match modes.z_mode() {
        ZMode::Opaque => standard,
        ZMode::Interpenetrating => {
            if infront && farther && overflow {
                let enc = dz_compress(dz_unshifted);
                let coeff = (oz >> enc).wrapping_sub(sz >> enc) & 0xF;
                *cvg = ((coeff * *cvg) >> 3) & 0xF;
                true
            } else {
                standard
            }
        }
        ZMode::Transparent => infront || max,
        ZMode::Decal => farther && nearer && !max,
    };

    (pass, gate)
}

/// Write compressed depth and slope for one pixel.
pub fn z_store(rdram: &mut Rdram, index: u32, z: u32, dz_enc: i32) {
    let word = z_compress(z) | (dz_enc >> 2) as u16;
    rdram.write_pair16(index, word, (dz_enc & 3) as u8);
}
