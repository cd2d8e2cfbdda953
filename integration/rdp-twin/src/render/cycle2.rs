use rdp_blender::Blender;
use rdp_coverage::{lookup, MaskInfo};
use rdp_dither::dither_noise;
use rdp_lod::{pass, pass_no_texel1, pass_with_next, LodSelect, TexCoord};
use rdp_pixel_write::{read_cycle2, write};
use rdp_rasterizer::{rgba_correct, z_correct, Walk};
use rdp_texture::pipeline_cycle;
use rdp_zbuf::{z_compare, z_store, ZSample};

use super::{Line, Stages, Steps};

impl Stages<'_> {
    /// Two cycle renderer.
    ///
    /// The combiner's first cycle and the blender's first cycle run one
    /// pixel ahead of the rest of the pipeline. With `next` the texels of
    /// the following pixel are fetched during the current one; at the end
    /// of a line that lookahead is measured against the next scanline.
    pub(super) fn cycle2(&mut self, walk: &Walk, texture: bool, texel1: bool, next: bool) {
        let mut steps = Steps::new(&self.state.deltas, walk.flip);
        let depth = self.depth_setup(&mut steps);
        let prim_tile = walk.tile;
        let lookahead = texture && texel1 && next;

        let mut sel = LodSelect::new(prim_tile);
        let mut tile3 = prim_tile;
        let mut preload_frac = 0;
        let (mut cdith, mut adith) = (0, 0);
        let mut acalpha = 0;
        let mut mask = MaskInfo::default();
        let mut cvg = 0u32;

        for i in walk.lines() {
            let Some(mut line) = self.line_start(i, walk.flip, &steps) else {
                continue;
            };
            let length = line.length;
            let lod_length = length + line.scdiff;

            for j in 0..=length {
                let sz = line.depth();

                if j == 0 {
                    if texture {
                        self.sample_current(&line, steps.tex, prim_tile, texel1, &mut sel);
                    }
                    mask = lookup(self.coverage_at(line.x));
                    cvg = u32::from(mask.count);
                    rgba_correct(
                        self.state,
                        i32::from(mask.x),
                        i32::from(mask.y),
                        line.shade(),
                        cvg,
                    );
                    if self.state.flags.dither_level < 2 {
                        let seeds = dither_noise(self.state, line.x, i);
                        cdith = seeds.color;
                        adith = seeds.alpha;
                    }
                    if let Some(a) = self.combiner.pass_2cycle_cycle0(self.state, adith, cvg) {
                        acalpha = a;
                    }
                }

                if lookahead {
                    line.coord += steps.tex;
                    let (mut sss, mut sst) = self.divide(line.coord);
                    let below = if j == length && lod_length >= 3 {
                        self.state
                            .spans
                            .get(i + 1)
                            .filter(|s| s.valid_line)
                            .map(TexCoord::from_span)
                    } else {
                        None
                    };

                    let mut pre = LodSelect {
                        fraction: preload_frac,
                        ..sel
                    };
                    match below {
                        None => {
                            pass(
                                self.state,
                                &mut sss,
                                &mut sst,
                                line.coord,
                                steps.tex,
                                prim_tile,
                                &mut pre,
                            );
                            sel.tile1 = pre.tile1;
                            sel.tile2 = pre.tile2;
                            self.state.next_texel = pipeline_cycle(
                                self.state,
                                self.tmem,
                                self.state.next_texel,
                                sss,
                                sst,
                                sel.tile1 as usize,
                                0,
                            );
                            self.state.next_texel1 = pipeline_cycle(
                                self.state,
                                self.tmem,
                                self.state.next_texel,
                                sss,
                                sst,
                                sel.tile2 as usize,
                                1,
                            );
                        }
                        Some(below) => {
                            let (mut sss2, mut sst2) = self.divide(below);
                            pre.tile2 = tile3;
                            pass_with_next(
                                self.state,
                                &mut sss,
                                &mut sst,
                                &mut sss2,
                                &mut sst2,
                                steps.tex,
                                prim_tile,
                                i,
                                &mut pre,
                            );
                            sel.tile1 = pre.tile1;
                            tile3 = pre.tile2;
                            self.state.next_texel = pipeline_cycle(
                                self.state,
                                self.tmem,
                                self.state.next_texel,
                                sss,
                                sst,
                                sel.tile1 as usize,
                                0,
                            );
                            self.state.next_texel1 = pipeline_cycle(
                                self.state,
                                self.tmem,
                                self.state.next_texel,
                                sss2,
                                sst2,
                                tile3 as usize,
                                1,
                            );
                        }
                    }
                    preload_frac = pre.fraction;
                }

                let z = z_correct(
                    &self.state.deltas,
                    i32::from(mask.x),
                    i32::from(mask.y),
                    sz,
                    cvg,
                );
                self.combiner.pass_2cycle_cycle1(self.state, adith, &mut cvg);

                let curpixel = line.curpixel as u32;
                let memcvg = read_cycle2(self.state, self.rdram, curpixel);
                let px = ZSample {
                    index: line.zbcur as u32,
                    z,
                    dz: depth.dzpix,
                    dz_enc: depth.dz_enc,
                };
                let (visible, gate) = z_compare(self.state, self.rdram, px, &mut cvg, memcvg);
                let mut write_enable = visible;
                if write_enable {
                    write_enable &= self.blender.pass_2cycle_cycle0(self.state, cvg != 0, mask.bit);
                } else {
                    self.state.memory = self.state.pre_memory;
                }

                line.x += steps.x;
                line.step_shade(&steps);

                // Coverage and shade of the following pixel for the next
                // first cycle.
                let ahead = if j < length { self.coverage_at(line.x) } else { 0 };
                mask = lookup(ahead);
                let next_cvg = u32::from(mask.count);
                rgba_correct(
                    self.state,
                    i32::from(mask.x),
                    i32::from(mask.y),
                    line.shade(),
                    next_cvg,
                );

                if texture {
                    if lookahead {
                        self.state.lod_frac = preload_frac;
                        self.state.texel0 = self.state.next_texel;
                        self.state.texel1 = self.state.next_texel1;
                    } else {
                        line.coord += steps.tex;
                        self.sample_current(&line, steps.tex, prim_tile, texel1, &mut sel);
                    }
                }

                if let Some(a) = self.combiner.pass_2cycle_cycle0(self.state, adith, next_cvg) {
                    acalpha = a;
                }

                if write_enable && Blender::alpha_compare(self.state, acalpha) {
                    if let Some(rgb) =
                        self.blender.framebuffer_pass(self.state, 1, cdith, gate, cvg, mask.bit)
                    {
                        write(self.state, self.rdram, curpixel, rgb, gate.enable_blend, cvg, memcvg);
                        if self.state.other_modes.z_update_en() {
                            z_store(self.rdram, px.index, z, depth.dz_enc);
                        }
                    }
                }

                if self.state.flags.dither_level < 2 {
                    let seeds = dither_noise(self.state, line.x, i);
                    cdith = seeds.color;
                    adith = seeds.alpha;
                }

                cvg = next_cvg;
                line.z = line.z.wrapping_add(steps.z);
                line.curpixel += steps.x;
                line.zbcur += steps.x;
            }
        }
    }

    /// Sample the texels of the pixel at `line.coord` without lookahead:
    /// texel 0 always, texel 1 when the combiner reads it.
    fn sample_current(
        &mut self,
        line: &Line,
        inc: TexCoord,
        prim_tile: i32,
        texel1: bool,
        sel: &mut LodSelect,
    ) {
        let (mut sss, mut sst) = self.divide(line.coord);
        sel.fraction = self.state.lod_frac;
        if texel1 {
            pass(self.state, &mut sss, &mut sst, line.coord, inc, prim_tile, sel);
        } else {
            pass_no_texel1(self.state, &mut sss, &mut sst, line.coord, inc, prim_tile, sel);
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
        if texel1 {
            self.state.texel1 = pipeline_cycle(
                self.state,
                self.tmem,
                self.state.texel0,
                sss,
                sst,
                sel.tile2 as usize,
                1,
            );
        }
    }
}
