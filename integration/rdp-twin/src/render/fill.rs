use log::warn;
use rdp_rasterizer::Walk;
use rdp_registers::TexelSize;

use super::Stages;

impl Stages<'_> {
    /// Fill mode: every covered pixel takes the fill colour.
    ///
    /// Fill mode has no depth or memory read path. Asking for one hangs
    /// the pipeline on the first non-empty span, and so does asking for a
    /// depth update.
    pub(super) fn fill(&mut self, walk: &Walk) {
        let state = &mut *self.state;
        if state.color_image.size == TexelSize::Bits4 {
            warn!("fill into a 4-bit colour image");
            state.pipeline_crashed = true;
            return;
        }

        let modes = state.other_modes;
        let fast_kill = modes.image_read_en() || modes.z_compare_en();
        let slow_kill = modes.z_update_en() && !modes.z_source_sel() && !fast_kill;
        let xinc = if walk.flip { 1 } else { -1 };

        for i in walk.lines() {
            let Some(span) = state.spans.get(i).copied().filter(|s| s.valid_line) else {
                continue;
            };
            let length = if walk.flip {
                span.lx - span.rx
            } else {
                span.rx - span.lx
            };

            if fast_kill && length >= 0 {
                warn!("fill with image read or depth compare enabled");
                state.pipeline_crashed = true;
                return;
            }

            let mut curpixel = state.fb_width().wrapping_mul(i).wrapping_add(span.rx);
            for _ in 0..=length {
                rdp_pixel_write::fill(state, self.rdram, curpixel as u32);
                curpixel += xinc;
            }

            if slow_kill && length >= 0 {
                warn!("fill with depth update enabled");
                state.pipeline_crashed = true;
                return;
            }
        }
    }
}
