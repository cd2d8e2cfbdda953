use rdp_color_combiner::lookup_clamp;
use rdp_twin_core::{Color, PipelineState, SpanDeltas};
use rdp_zbuf::Z_MAX;

/// Shade colour of a pixel, moved to its first covered sample when the
/// pixel is only partly covered.
///
/// `rgba` holds the span values with 14 fraction bits dropped; the
/// result is clamped into `state.shade`.
pub fn rgba_correct(state: &mut PipelineState, offx: i32, offy: i32, rgba: [i32; 4], cvg: u32) {
    let d = &state.deltas;
    let slopes = [
        (d.cdr, d.drdy),
        (d.cdg, d.dgdy),
        (d.cdb, d.dbdy),
        (d.cda, d.dady),
    ];
    let [r, g, b, a] = core::array::from_fn(|i| {
        let v = if cvg == 8 {
            rgba[i] >> 2
        } else {
            let (cd, dy) = slopes[i];
            ((rgba[i] << 2) + offx * cd + offy * dy) >> 4
        };
        lookup_clamp(v & 0x1FF)
    });
    state.shade = Color::new(r, g, b, a);
}

/// Depth of a pixel at its first covered sample, clamped to 18 bits.
///
/// `z` is the span depth with 10 fraction bits dropped.
#[must_use]
pub fn z_correct(deltas: &SpanDeltas, offx: i32, offy: i32, z: i32, cvg: u32) -> u32 {
    let sz = if cvg == 8 {
        z >> 3
    } else {
        ((z << 2) + offx * deltas.cdz + offy * deltas.dzdy) >> 5
    };
    match (sz & 0x60000) >> 17 {
        0 | 1 => (sz & 0x3FFFF) as u32,
        2 => Z_MAX,
        _ => 0,
    }
}
