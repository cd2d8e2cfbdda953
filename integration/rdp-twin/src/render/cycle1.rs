use rdp_coverage::lookup;
use rdp_dither::dither_noise;
use rdp_lod::{pass_current_1cycle, pass_current_1cycle_simple, pass_with_next_1cycle, LodSelect, SpanSigs};
use rdp_pixel_write::{read_cycle1, write};
use rdp_rasterizer::{rgba_correct, z_correct, Walk};
use rdp_texture::{pipeline_cycle, texel1_coord_1cycle};
use rdp_zbuf::{z_compare, z_store, ZSample};

use super::{Stages, Steps};

impl Stages<'_> {
    /// One cycle renderer.
    ///
    /// With `texel1` the texel of the next pixel is fetched one cycle
    /// early into texel 1 and becomes texel 0 of that pixel, so only the
    /// first pixel of a line samples texel 0 directly.
    pub(super) fn cycle1(&mut self, walk: &Walk, texture: bool, texel1: bool) {
        let mut steps = Steps::new(&self.state.deltas, walk.flip);
        let depth = self.depth_setup(&mut steps);
        let prim_tile = walk.tile;

        let mut sel = LodSelect::new(prim_tile);
        let mut next_sel = LodSelect::new(prim_tile);
        let mut sigs = SpanSigs::default();
        let mut preload_frac = 0;
        let (mut cdith, mut adith) = (7, 0);

        for i in walk.lines() {
            let Some(mut line) = self.line_start(i, walk.flip, &steps) else {
                continue;
            };
            let length = line.length;

            if texture {
                let lod_length = length + line.scdiff;
                sigs.long_span = lod_length > 7;
                sigs.mid_span = lod_length == 7;
                if texel1 {
                    sigs.one_less_than_mid = lod_length == 6;
                }
            }

            for j in 0..=length {
                let shade = line.shade();
                let sz = line.depth();

                if texture {
                    sigs.end_span = j == length;
                    sigs.pre_end_span = j == length - 1;
                }

                let mask = lookup(self.coverage_at(line.x));
                let (offx, offy) = (i32::from(mask.x), i32::from(mask.y));
                let mut cvg = u32::from(mask.count);

                let (mut news, mut newt) = if texel1 {
                    texel1_coord_1cycle(self.state, line.coord, steps.tex, i, &sigs)
                } else {
                    (0, 0)
                };

                if texture {
                    if j > 0 && texel1 {
                        self.state.texel0 = self.state.texel1;
                        self.state.lod_frac = preload_frac;
                    } else {
                        let (mut sss, mut sst) = self.divide(line.coord);
                        sel.fraction = self.state.lod_frac;
                        if texel1 {
                            pass_current_1cycle(
                                self.state,
                                &mut sss,
                                &mut sst,
                                (news, newt),
                                line.coord,
                                steps.tex,
                                i,
                                prim_tile,
                                &sigs,
                                &mut sel,
                            );
                        } else {
                            pass_current_1cycle_simple(
                                self.state,
                                &mut sss,
                                &mut sst,
                                line.coord,
                                steps.tex,
                                i,
                                prim_tile,
                                &sigs,
                                &mut sel,
                            );
                        }
                        self.state.lod_frac = sel.fraction;
                        self.state.texel0 = pipeline_cycle(
                            self.state,
                            self.tmem,
                            self.state.texel0,
                            sss,
                            sst,
                            sel.tile1 as usize,
                            0,
                        );
                    }

                    if texel1 {
                        line.coord += steps.tex;

                        sigs.next_span = sigs.end_span;
                        sigs.end_span = sigs.pre_end_span;
                        sigs.pre_end_span = j == length - 2;

                        next_sel.fraction = preload_frac;
                        pass_with_next_1cycle(
                            self.state,
                            &mut news,
                            &mut newt,
                            line.coord,
                            steps.tex,
                            i,
                            prim_tile,
                            &sigs,
                            &mut next_sel,
                        );
                        preload_frac = next_sel.fraction;
                        self.state.texel1 = pipeline_cycle(
                            self.state,
                            self.tmem,
                            self.state.texel1,
                            news,
                            newt,
                            next_sel.tile1 as usize,
                            0,
                        );
                    }
                }

                rgba_correct(self.state, offx, offy, shade, cvg);
                let z = z_correct(&self.state.deltas, offx, offy, sz, cvg);

                if self.state.flags.dither_level < 2 {
                    let seeds = dither_noise(self.state, line.x, i);
                    cdith = seeds.color;
                    adith = seeds.alpha;
                }

                self.combiner.pass_1cycle(self.state, adith, &mut cvg);

                let curpixel = line.curpixel as u32;
                let memcvg = read_cycle1(self.state, self.rdram, curpixel);
                let px = ZSample {
                    index: line.zbcur as u32,
                    z,
                    dz: depth.dzpix,
                    dz_enc: depth.dz_enc,
                };
                let (visible, gate) = z_compare(self.state, self.rdram, px, &mut cvg, memcvg);
                if visible {
                    if let Some(rgb) =
                        self.blender.framebuffer_pass(self.state, 0, cdith, gate, cvg, mask.bit)
                    {
                        write(self.state, self.rdram, curpixel, rgb, gate.enable_blend, cvg, memcvg);
                        if self.state.other_modes.z_update_en() {
                            z_store(self.rdram, px.index, z, depth.dz_enc);
                        }
                    }
                }

                if texture && !texel1 {
                    line.coord += steps.tex;
                }

                line.step_shade(&steps);
                line.z = line.z.wrapping_add(steps.z);
                line.step_pixel(&steps);
            }
        }
    }
}
