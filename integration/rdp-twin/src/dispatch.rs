//! Command handlers.
//!
//! Most commands only write the register file. Primitives are walked into
//! the span table and handed to the span renderer for the current cycle
//! type.

use log::trace;
use rdp_color_combiner::Source;
use rdp_commands::{
    triangle_from_bytes, Command, CommandKind, LoadBlock, SetColor, SetImage, SetKeyGb, SetKeyR,
    SetScissor, SetTile, TileRange, Triangle,
};
use rdp_memory::RDRAM_MASK;
use rdp_rasterizer::walk_edges;
use rdp_registers::{AlphaDitherSel, CycleType};
use rdp_texture::{load, LoadKind, LoadRequest};
use rdp_twin_core::{ImageDesc, Scissor};

use crate::Rdp;

fn image_desc(cmd: &SetImage<'_>) -> ImageDesc {
    ImageDesc {
        format: cmd.format(),
        size: cmd.size(),
        width: cmd.width() + 1,
        address: cmd.address() & RDRAM_MASK,
    }
}

impl Rdp {
    /// Apply one decoded command.
    pub(crate) fn execute(&mut self, cmd: &Command<'_>) {
        match cmd.kind() {
            CommandKind::Noop => {}
            CommandKind::Triangle(tri) => self.draw(&tri),
            CommandKind::TextureRectangle(rect) => {
                let edges = rect.to_triangle(self.whole_lines());
                self.draw(&triangle_from_bytes(&edges, true));
            }
            CommandKind::FillRectangle(rect) => {
                let edges = rect.to_triangle(self.whole_lines());
                self.draw(&triangle_from_bytes(&edges, false));
            }
            CommandKind::Sync(kind) => {
                if kind.is_full() {
                    trace!("Sync_Full: DP interrupt");
                    self.interrupt = true;
                }
            }
            CommandKind::SetKeyGb(key) => self.set_key_gb(&key),
            CommandKind::SetKeyR(key) => self.set_key_r(&key),
            CommandKind::SetConvert(convert) => {
                let [k0, k1, k2, k3, k4, k5] = convert.coefficients();
                let s = &mut self.state;
                s.k0 = (k0 << 1) + 1;
                s.k1 = (k1 << 1) + 1;
                s.k2 = (k2 << 1) + 1;
                s.k3 = (k3 << 1) + 1;
                s.k4 = k4;
                s.k5 = k5;
            }
            CommandKind::SetScissor(scissor) => self.set_scissor(&scissor),
            CommandKind::SetPrimDepth(depth) => {
                self.state.prim_z = ((depth.z() as u32) << 16) & 0x7FFF_0000;
                self.state.prim_delta_z = depth.delta_z() as u16;
            }
            CommandKind::SetOtherModes(cmd) => {
                let modes = cmd.modes();
                self.state.other_modes = modes;
                self.blender.update_other_modes(modes);
                self.state.invalidate_derivatives();
            }
            CommandKind::SetCombineMode(cmd) => {
                let mode = cmd.mode();
                self.state.combine_mode = mode;
                self.combiner.update_combine_mode(mode);
                self.state.invalidate_derivatives();
            }
            CommandKind::LoadTlut(range) => self.load_range(LoadKind::Tlut, &range),
            CommandKind::LoadTile(range) => self.load_range(LoadKind::Tile, &range),
            CommandKind::LoadBlock(block) => self.load_block(&block),
            CommandKind::SetTileSize(range) => {
                let tile = &mut self.state.tiles[(range.tile() & 7) as usize];
                tile.s.low = range.sl();
                tile.s.high = range.sh();
                tile.t.low = range.tl();
                tile.t.high = range.th();
                tile.compute_clamp_diffs();
            }
            CommandKind::SetTile(cmd) => self.set_tile(&cmd),
            CommandKind::SetFillColor(c) => self.state.fill_color = c.packed(),
            CommandKind::SetFogColor(c) => self.state.fog_color = c.color(),
            CommandKind::SetBlendColor(c) => self.state.blend_color = c.color(),
            CommandKind::SetPrimColor(c) => self.set_prim_color(&c),
            CommandKind::SetEnvColor(c) => self.state.env_color = c.color(),
            CommandKind::SetTextureImage(cmd) => self.state.texture_image = image_desc(&cmd),
            CommandKind::SetColorImage(cmd) => self.state.color_image = image_desc(&cmd),
            CommandKind::SetZImage(cmd) => self.state.z_image_address = cmd.address() & RDRAM_MASK,
        }
    }

    /// Fill and copy modes cover the last scanline of a rectangle.
    fn whole_lines(&self) -> bool {
        matches!(
            self.state.other_modes.cycle_type(),
            CycleType::Fill | CycleType::Copy
        )
    }

    fn draw(&mut self, tri: &Triangle<'_>) {
        if self.state.pipeline_crashed {
            trace!("primitive dropped: pipeline crashed");
            return;
        }
        if self.state.flags.stale {
            self.deduce_derivatives();
            self.state.flags.stale = false;
        }
        let walk = walk_edges(&mut self.state, tri);
        self.render(&walk);
    }

    fn set_key_r(&mut self, key: &SetKeyR<'_>) {
        self.state.key_width.r = key.width();
        self.state.key_center.r = key.center();
        self.state.key_scale.r = key.scale();
    }

    fn set_key_gb(&mut self, key: &SetKeyGb<'_>) {
        let s = &mut self.state;
        s.key_width.g = key.width_g();
        s.key_width.b = key.width_b();
        s.key_center.g = key.center_g();
        s.key_scale.g = key.scale_g();
        s.key_center.b = key.center_b();
        s.key_scale.b = key.scale_b();
    }

    fn set_scissor(&mut self, cmd: &SetScissor<'_>) {
        self.state.scissor = Scissor {
            xh: cmd.xh(),
            yh: cmd.yh(),
            xl: cmd.xl(),
            yl: cmd.yl(),
            field: cmd.field_enable(),
            keep_odd: cmd.keep_odd(),
        };
    }

    fn set_prim_color(&mut self, cmd: &SetColor<'_>) {
        self.state.min_level = cmd.min_level();
        self.state.prim_lod_frac = cmd.level_frac();
        self.state.prim_color = cmd.color();
    }

    fn set_tile(&mut self, cmd: &SetTile<'_>) {
        let tile = &mut self.state.tiles[(cmd.tile() & 7) as usize];
        tile.format = cmd.format();
        tile.size = cmd.size();
        tile.line = cmd.line();
        tile.tmem = cmd.tmem();
        tile.palette = cmd.palette();
        tile.t.clamp = cmd.clamp_t();
        tile.t.mirror = cmd.mirror_t();
        tile.t.mask = cmd.mask_t();
        tile.t.shift = cmd.shift_t();
        tile.s.clamp = cmd.clamp_s();
        tile.s.mirror = cmd.mirror_s();
        tile.s.mask = cmd.mask_s();
        tile.s.shift = cmd.shift_s();
        tile.compute_derivs();
    }

    fn load_range(&mut self, kind: LoadKind, range: &TileRange<'_>) {
        let req = LoadRequest {
            kind,
            tile: (range.tile() & 7) as usize,
            sl: range.sl(),
            tl: range.tl(),
            sh: range.sh(),
            th: range.th(),
        };
        load(&mut self.state, &self.rdram, &mut self.tmem, req);
    }

    fn load_block(&mut self, block: &LoadBlock<'_>) {
        let req = LoadRequest {
            kind: LoadKind::Block,
            tile: (block.tile() & 7) as usize,
            sl: block.sl(),
            tl: block.tl(),
            sh: block.sh(),
            th: block.dxt(),
        };
        load(&mut self.state, &self.rdram, &mut self.tmem, req);
    }

    /// Recompute the mode flags that depend on both the other modes and
    /// the combiner and blender selectors.
    pub(crate) fn deduce_derivatives(&mut self) {
        let modes = self.state.other_modes;
        let cycle_type = modes.cycle_type();
        let one = cycle_type == CycleType::One;
        let two = cycle_type == CycleType::Two;

        let b0 = *self.blender.cycle(0);
        let b1 = *self.blender.cycle(1);
        let cc0 = *self.combiner.cycle(0);
        let cc1 = *self.combiner.cycle(1);

        let flags = &mut self.state.flags;
        flags.partial_reject_1 = b0.partial_reject();
        flags.partial_reject_2 = b1.partial_reject();
        flags.real_shifter_needed =
            (b0.reads_memory_alpha() && one) || (b1.reads_memory_alpha() && two);
        flags.inter_shifter_needed = b0.reads_memory_alpha() && two;
        flags.rgba_dither = modes.rgba_dither();

        let lod_frac_cc0 = cc0.uses_lod_frac();
        let lod_frac_cc1 = cc1.uses_lod_frac();

        let texel1_cc1 = cc1.uses(Source::Texel1);
        let texel0_cc1 = cc1.uses(Source::Texel0);
        let texel1_ac0 = cc0.alpha_uses(Source::Texel1);
        let texel0_ac0 = cc0.alpha_uses(Source::Texel0);
        let texel1_cc0 = cc0.uses(Source::Texel1);
        let texel0_cc0 = cc0.uses(Source::Texel0);
        let texels_or_lf_ac0 = texel0_ac0 || texel1_ac0 || cc0.alpha_uses_lod_frac();

        flags.cycle1_render_mode = if texel1_cc1 {
            0
        } else if texel0_cc1 || lod_frac_cc1 {
            1
        } else {
            2
        };

        flags.cycle2_render_mode = if texel1_cc1 || (modes.alpha_compare_en() && texels_or_lf_ac0) {
            0
        } else if texel1_cc0 || texel0_cc1 {
            1
        } else if texel0_cc0 || lod_frac_cc0 || lod_frac_cc1 {
            2
        } else {
            3
        };

        let lod_frac_used = (two && (lod_frac_cc0 || lod_frac_cc1)) || (one && lod_frac_cc1);
        flags.use_lod = modes.tex_lod_en() || lod_frac_used;

        let noise = (one && cc1.uses_noise()) || (two && (cc0.uses_noise() || cc1.uses_noise()));
        flags.dither_level = if noise || modes.alpha_dither_sel() == AlphaDitherSel::Noise {
            0
        } else if flags.rgba_dither != 0xF {
            1
        } else {
            2
        };

        trace!(
            "derived modes: {:?} cycle1 {} cycle2 {} dither {} lod {}",
            cycle_type,
            flags.cycle1_render_mode,
            flags.cycle2_render_mode,
            flags.dither_level,
            flags.use_lod
        );
    }
}
