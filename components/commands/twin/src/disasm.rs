//! Assembler-style formatting of decoded commands.

use core::fmt::{self, Write};

use rdp_registers::{AlphaDitherSel, CoverageDest, CycleType, RgbDitherSel, ZMode};

use crate::command::{Command, CommandKind};
use crate::views::*;

/// `|`-separated flag names.
#[derive(Default)]
struct Flags(String);

impl Flags {
    fn add(&mut self, on: bool, name: &str) {
        if !on {
            return;
        }
        if !self.0.is_empty() {
            self.0.push('|');
        }
        self.0.push_str(name);
    }
}

fn other_modes(cmd: &SetOtherModes<'_>) -> String {
    let m = cmd.modes();
    let mut out = Flags::default();

    out.add(m.alpha_compare_en(), "ALPHA_COMPARE_EN");
    out.add(m.dither_alpha_en(), "DITHER_ALPHA_EN");
    out.add(m.z_source_sel(), "Z_SOURCE_SEL");
    out.add(m.antialias_en(), "ANTIALIAS_EN");
    out.add(m.z_compare_en(), "Z_COMPARE_EN");
    out.add(m.z_update_en(), "Z_UPDATE_EN");
    out.add(m.image_read_en(), "IMAGE_READ_EN");
    out.add(m.color_on_cvg(), "COLOR_ON_CVG");
    match m.cvg_dest() {
        CoverageDest::Clamp => {}
        CoverageDest::Wrap => out.add(true, "CVG_DEST_WRAP"),
        CoverageDest::Zap => out.add(true, "CVG_DEST_ZAP"),
        CoverageDest::Save => out.add(true, "CVG_DEST_SAVE"),
    }
    match m.z_mode() {
        ZMode::Opaque => {}
        ZMode::Interpenetrating => out.add(true, "Z_MODE_INTERPENETRATING"),
        ZMode::Transparent => out.add(true, "Z_MODE_TRANSPARENT"),
        ZMode::Decal => out.add(true, "Z_MODE_DECAL"),
    }
    out.add(m.cvg_times_alpha(), "CVG_TIMES_ALPHA");
    out.add(m.alpha_cvg_select(), "ALPHA_CVG_SELECT");
    out.add(m.force_blend(), "FORCE_BLEND");

    let blend = [
        ("B_M2B_1_", m.blend_m2b_1()),
        ("B_M2B_0_", m.blend_m2b_0()),
        ("B_M2A_1_", m.blend_m2a_1()),
        ("B_M2A_0_", m.blend_m2a_0()),
        ("B_M1B_1_", m.blend_m1b_1()),
        ("B_M1B_0_", m.blend_m1b_0()),
        ("B_M1A_1_", m.blend_m1a_1()),
        ("B_M1A_0_", m.blend_m1a_0()),
    ];
    for (prefix, sel) in blend {
        if sel != 0 {
            out.add(true, &format!("{prefix}{sel}"));
        }
    }

    match m.alpha_dither_sel() {
        AlphaDitherSel::Pattern => {}
        AlphaDitherSel::InvPattern => out.add(true, "ALPHA_DITHER_SEL_PATTERNB"),
        AlphaDitherSel::Noise => out.add(true, "ALPHA_DITHER_SEL_NOISE"),
        AlphaDitherSel::None => out.add(true, "ALPHA_DITHER_SEL_NO_DITHER"),
    }
    match m.rgb_dither_sel() {
        RgbDitherSel::MagicSquare => {}
        RgbDitherSel::Bayer => out.add(true, "RGB_DITHER_SEL_STANDARD_BAYER_MATRIX"),
        RgbDitherSel::Noise => out.add(true, "RGB_DITHER_SEL_NOISE"),
        RgbDitherSel::None => out.add(true, "RGB_DITHER_SEL_NO_DITHER"),
    }
    out.add(m.key_en(), "KEY_EN");
    out.add(m.convert_one(), "CONVERT_ONE");
    out.add(m.bi_lerp_1(), "BI_LERP_1");
    out.add(m.bi_lerp_0(), "BI_LERP_0");
    out.add(m.mid_texel(), "MID_TEXEL");
    out.add(m.sample_type(), "SAMPLE_TYPE");
    out.add(m.tlut_type(), "TLUT_TYPE");
    out.add(m.en_tlut(), "EN_TLUT");
    out.add(m.tex_lod_en(), "TEX_LOD_EN");
    out.add(m.sharpen_tex_en(), "SHARPEN_TEX_EN");
    out.add(m.detail_tex_en(), "DETAIL_TEX_EN");
    out.add(m.persp_tex_en(), "PERSP_TEX_EN");
    match m.cycle_type() {
        CycleType::One => {}
        CycleType::Two => out.add(true, "CYCLE_TYPE_2_CYCLE"),
        CycleType::Copy => out.add(true, "CYCLE_TYPE_COPY"),
        CycleType::Fill => out.add(true, "CYCLE_TYPE_FILL"),
    }
    out.add(m.atomic_prim(), "ATOMIC_PRIM");
    out.0
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        write!(f, "{v}")?;
    }
    Ok(())
}

fn triangle(f: &mut fmt::Formatter<'_>, tri: &Triangle<'_>) -> fmt::Result {
    let raw = tri.raw();
    let h = |word: usize, lane: u32| raw.lane(word, lane) as i16;
    write!(
        f,
        " {},{},{}, {},{},{}, {},{},{},{}, {},{},{},{}, {},{},{},{}",
        i32::from(tri.right_major()),
        tri.levels(),
        tri.tile(),
        tri.yl() as i16,
        tri.ym() as i16,
        tri.yh() as i16,
        h(1, 3),
        h(1, 2),
        h(1, 1),
        h(1, 0),
        h(2, 3),
        h(2, 2),
        h(2, 1),
        h(2, 0),
        h(3, 3),
        h(3, 2),
        h(3, 1),
        h(3, 0),
    )?;

    if let Some(shade) = tri.shade() {
        f.write_str("\nShade_Coefficients ")?;
        for word in 0..8 {
            if word > 0 {
                f.write_str(", ")?;
            }
            join(f, &shade.halves(word))?;
        }
    }
    if let Some(tex) = tri.texture() {
        f.write_str("\nTexture_Coefficients ")?;
        for word in 0..8 {
            if word > 0 {
                f.write_str(", ")?;
            }
            join(f, &tex.halves(word))?;
        }
    }
    if let Some(z) = tri.depth() {
        let v = z.halves();
        f.write_str("\nZBuffer_Coefficients ")?;
        join(f, &v[..4])?;
        f.write_str(", ")?;
        join(f, &v[4..])?;
    }
    Ok(())
}

fn image(f: &mut fmt::Formatter<'_>, img: &SetImage<'_>) -> fmt::Result {
    write!(
        f,
        " {}, {}, {}, ${:08X}",
        img.format().mnemonic(),
        img.size().mnemonic(),
        img.width(),
        img.address()
    )
}

fn set_tile(f: &mut fmt::Formatter<'_>, t: &SetTile<'_>) -> fmt::Result {
    let or0 = |on: bool, name: &'static str| if on { name } else { "0" };
    write!(
        f,
        " {}, {}, {}, ${:03X}, {}, PALETTE_{:X}, {}, {}, MASK_T_{:X}, SHIFT_T_{:X}, {}, {}, MASK_S_{:X}, SHIFT_S_{:X}",
        t.format().mnemonic(),
        t.size().mnemonic(),
        t.line(),
        t.tmem(),
        t.tile(),
        t.palette(),
        or0(t.clamp_t(), "CLAMP_T"),
        or0(t.mirror_t(), "MIRROR_T"),
        t.mask_t(),
        t.shift_t(),
        or0(t.clamp_s(), "CLAMP_S"),
        or0(t.mirror_s(), "MIRROR_S"),
        t.mask_s(),
        t.shift_s(),
    )
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.opcode().name())?;
        match self.kind() {
            CommandKind::Noop | CommandKind::Sync(_) => Ok(()),
            CommandKind::Triangle(tri) => triangle(f, &tri),
            CommandKind::TextureRectangle(r) => write!(
                f,
                " {},{}, {}, {},{}, {},{}, {},{}",
                r.xl(),
                r.yl(),
                r.tile(),
                r.xh(),
                r.yh(),
                r.s(),
                r.t(),
                r.dsdx(),
                r.dtdy()
            ),
            CommandKind::SetKeyGb(k) => write!(
                f,
                " {}, {}, {}, {}, {}, {}",
                k.width_g(),
                k.width_b(),
                k.center_g(),
                k.scale_g(),
                k.center_b(),
                k.scale_b()
            ),
            CommandKind::SetKeyR(k) => {
                write!(f, " {}, {}, {}", k.width(), k.center(), k.scale())
            }
            CommandKind::SetConvert(c) => {
                let [k0, k1, k2, k3, k4, k5] = c.coefficients();
                write!(f, " {k0}, {k1}, {k2}, {k3}, {k4}, {k5}")
            }
            CommandKind::SetScissor(s) => write!(
                f,
                " {},{}, {},{}, {},{}",
                s.xh(),
                s.yh(),
                if s.field_enable() { "SCISSOR_FIELD" } else { "0" },
                if s.keep_odd() { "SCISSOR_ODD" } else { "0" },
                s.xl(),
                s.yl()
            ),
            CommandKind::SetPrimDepth(d) => write!(f, " {}, {}", d.z(), d.delta_z()),
            CommandKind::SetOtherModes(m) => {
                let flags = other_modes(&m);
                if flags.is_empty() {
                    Ok(())
                } else {
                    write!(f, " {flags}")
                }
            }
            CommandKind::LoadTlut(r) | CommandKind::SetTileSize(r) | CommandKind::LoadTile(r) => {
                write!(f, " {},{}, {}, {},{}", r.sl(), r.tl(), r.tile(), r.sh(), r.th())
            }
            CommandKind::LoadBlock(b) => {
                write!(f, " {},{}, {}, {},{}", b.sl(), b.tl(), b.tile(), b.sh(), b.dxt())
            }
            CommandKind::SetTile(t) => set_tile(f, &t),
            CommandKind::FillRectangle(r) => {
                write!(f, " {},{}, {},{}", r.xl(), r.yl(), r.xh(), r.yh())
            }
            CommandKind::SetPrimColor(c) => write!(
                f,
                " {}, {}, ${:08X}",
                c.min_level(),
                c.level_frac(),
                c.packed()
            ),
            CommandKind::SetFillColor(c)
            | CommandKind::SetFogColor(c)
            | CommandKind::SetBlendColor(c)
            | CommandKind::SetEnvColor(c) => write!(f, " ${:08X}", c.packed()),
            CommandKind::SetCombineMode(c) => {
                let m = c.mode();
                write!(
                    f,
                    " {},{}, {},{}, {},{}, {},{}, {},{}, {},{},{}, {},{},{}",
                    m.sub_a_rgb_0(),
                    m.mul_rgb_0(),
                    m.sub_a_alpha_0(),
                    m.mul_alpha_0(),
                    m.sub_a_rgb_1(),
                    m.mul_rgb_1(),
                    m.sub_b_rgb_0(),
                    m.sub_b_rgb_1(),
                    m.sub_a_alpha_1(),
                    m.mul_alpha_1(),
                    m.add_rgb_0(),
                    m.sub_b_alpha_0(),
                    m.add_alpha_0(),
                    m.add_rgb_1(),
                    m.sub_b_alpha_1(),
                    m.add_alpha_1()
                )
            }
            CommandKind::SetTextureImage(img) | CommandKind::SetColorImage(img) => image(f, &img),
            CommandKind::SetZImage(z) => write!(f, " ${:08X}", z.address()),
        }
    }
}
