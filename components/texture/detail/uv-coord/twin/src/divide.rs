use std::sync::LazyLock;

const NORMAL_POINT: [i32; 64] = [
    0x4000, 0x3F04, 0x3E10, 0x3D22, 0x3C3C, 0x3B5D, 0x3A83, 0x39B1, 0x38E4, 0x381C, 0x375A, 0x369D,
    0x35E5, 0x3532, 0x3483, 0x33D9, 0x3333, 0x3291, 0x31F4, 0x3159, 0x30C3, 0x3030, 0x2FA1, 0x2F15,
    0x2E8C, 0x2E06, 0x2D83, 0x2D03, 0x2C86, 0x2C0B, 0x2B93, 0x2B1E, 0x2AAB, 0x2A3A, 0x29CC, 0x2960,
    0x28F6, 0x288E, 0x2828, 0x27C4, 0x2762, 0x2702, 0x26A4, 0x2648, 0x25ED, 0x2594, 0x253D, 0x24E7,
    0x2492, 0x243F, 0x23EE, 0x239E, 0x234F, 0x2302, 0x22B6, 0x226C, 0x2222, 0x21DA, 0x2193, 0x214D,
    0x2108, 0x20C5, 0x2082, 0x2041,
];

const NORMAL_SLOPE: [i32; 64] = [
    0xF03, 0xF0B, 0xF11, 0xF19, 0xF20, 0xF25, 0xF2D, 0xF32, 0xF37, 0xF3D, 0xF42, 0xF47, 0xF4C, 0xF50,
    0xF55, 0xF59, 0xF5D, 0xF62, 0xF64, 0xF69, 0xF6C, 0xF70, 0xF73, 0xF76, 0xF79, 0xF7C, 0xF7F, 0xF82,
    0xF84, 0xF87, 0xF8A, 0xF8C, 0xF8E, 0xF91, 0xF93, 0xF95, 0xF97, 0xF99, 0xF9B, 0xF9D, 0xF9F, 0xFA1,
    0xFA3, 0xFA4, 0xFA6, 0xFA8, 0xFA9, 0xFAA, 0xFAC, 0xFAE, 0xFAF, 0xFB0, 0xFB2, 0xFB3, 0xFB5, 0xFB5,
    0xFB7, 0xFB8, 0xFB9, 0xFBA, 0xFBC, 0xFBC, 0xFBE, 0xFBE,
];

/// `shift | (reciprocal << 4)` for every 15-bit W.
static DIV_TABLE: LazyLock<Vec<i32>> = LazyLock::new(|| (0..0x8000).map(div_entry).collect());

fn div_entry(w: i32) -> i32 {
    // Normalize so bit 15 would be set, at most 14 places.
    let mut k = 1;
    while k <= 14 && (w << k) & 0x8000 == 0 {
        k += 1;
    }
    let shift = k - 1;

    let norm = (w << shift) & 0x3FFF;
    let wnorm = (norm & 0xFF) << 2;
    let norm = (norm >> 8) as usize;

    let slope = (NORMAL_SLOPE[norm] | !0x3FF) + 1;
    let rcp = (((slope * wnorm) >> 10) + NORMAL_POINT[norm]) & 0x7FFF;
    shift | (rcp << 4)
}

/// Divide S and T by W.
///
/// Results are 17-bit texel coordinates with overflow in bit 18 and
/// underflow in bit 17. `W <= 0` always reports overflow.
#[must_use]
pub fn perspective_divide(s: i32, t: i32, w: i32) -> (i32, i32) {
    let w_carry = (w as i16) <= 0;
    let entry = DIV_TABLE[(w & 0x7FFF) as usize];
    let rcp = entry >> 4;
    let shift = entry & 0xF;

    let mut sprod = i32::from(s as i16) * rcp;
    let mut tprod = i32::from(t as i16) * rcp;

    let range_mask = ((1 << 30) - 1) & -((1 << 29) >> shift);
    let out_s = sprod & range_mask;
    let out_t = tprod & range_mask;

    let (temp_s, temp_t) = if shift == 0xE {
        (sprod << 1, tprod << 1)
    } else {
        sprod >>= 13 - shift;
        tprod >>= 13 - shift;
        (sprod, tprod)
    };

    let over_under = |out: i32, prod: i32| {
        if out != range_mask && out != 0 {
            if prod & (1 << 29) == 0 {
                2 << 17
            } else {
                1 << 17
            }
        } else {
            0
        }
    };
    let mut ou_s = over_under(out_s, sprod);
    let mut ou_t = over_under(out_t, tprod);
    if w_carry {
        ou_s |= 2 << 17;
        ou_t |= 2 << 17;
    }

    ((temp_s & 0x1FFFF) | ou_s, (temp_t & 0x1FFFF) | ou_t)
}

/// S and T taken as already divided.
#[must_use]
pub fn non_perspective_divide(s: i32, t: i32, _w: i32) -> (i32, i32) {
    (i32::from(s as i16) & 0x1FFFF, i32::from(t as i16) & 0x1FFFF)
}
