use rdp_registers::CombineModeReg;
use rdp_twin_core::{Color, PipelineState};

/// The combiner's constant one, a 9-bit 1.0.
pub const ONE: i32 = 0x100;

/// Pipeline colours a selector can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Combined,
    Texel0,
    Texel1,
    Prim,
    Shade,
    Env,
}

impl Source {
    const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Combined,
            1 => Self::Texel0,
            2 => Self::Texel1,
            3 => Self::Prim,
            4 => Self::Shade,
            5 => Self::Env,
            _ => return None,
        })
    }

    #[must_use]
    pub fn read(self, state: &PipelineState) -> Color {
        match self {
            Self::Combined => state.combined,
            Self::Texel0 => state.texel0,
            Self::Texel1 => state.texel1,
            Self::Prim => state.prim_color,
            Self::Shade => state.shade,
            Self::Env => state.env_color,
        }
    }
}

/// What an RGB selector feeds into all three colour channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbInput {
    Color(Source),
    /// Alpha of a source broadcast to R, G and B.
    AlphaOf(Source),
    One,
    Zero,
    Noise,
    KeyCenter,
    KeyScale,
    K4,
    K5,
    LodFrac,
    PrimLodFrac,
}

/// What an alpha selector feeds into the alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaInput {
    Alpha(Source),
    One,
    Zero,
    LodFrac,
    PrimLodFrac,
}

impl RgbInput {
    fn sub_a(code: u8) -> Self {
        match code & 0xF {
            c @ 0..=5 => Source::from_code(c).map_or(Self::Zero, Self::Color),
            6 => Self::One,
            7 => Self::Noise,
            _ => Self::Zero,
        }
    }

    fn sub_b(code: u8) -> Self {
        match code & 0xF {
            c @ 0..=5 => Source::from_code(c).map_or(Self::Zero, Self::Color),
            6 => Self::KeyCenter,
            7 => Self::K4,
            _ => Self::Zero,
        }
    }

    fn mul(code: u8) -> Self {
        match code & 0x1F {
            c @ 0..=5 => Source::from_code(c).map_or(Self::Zero, Self::Color),
            6 => Self::KeyScale,
            c @ 7..=12 => Source::from_code(c - 7).map_or(Self::Zero, Self::AlphaOf),
            13 => Self::LodFrac,
            14 => Self::PrimLodFrac,
            15 => Self::K5,
            _ => Self::Zero,
        }
    }

    fn add(code: u8) -> Self {
        match code & 0x7 {
            c @ 0..=5 => Source::from_code(c).map_or(Self::Zero, Self::Color),
            6 => Self::One,
            _ => Self::Zero,
        }
    }

    /// Pipeline colour this input reads, if any.
    #[must_use]
    pub const fn source(self) -> Option<Source> {
        match self {
            Self::Color(s) | Self::AlphaOf(s) => Some(s),
            _ => None,
        }
    }

    fn read(self, state: &PipelineState) -> [i32; 3] {
        let v = match self {
            Self::Color(s) => {
                let c = s.read(state);
                return [c.r, c.g, c.b];
            }
            Self::KeyCenter => {
                let c = state.key_center;
                return [c.r, c.g, c.b];
            }
            Self::KeyScale => {
                let c = state.key_scale;
                return [c.r, c.g, c.b];
            }
            Self::AlphaOf(s) => s.read(state).a,
            Self::One => ONE,
            Self::Zero => 0,
            Self::Noise => state.noise,
            Self::K4 => state.k4,
            Self::K5 => state.k5,
            Self::LodFrac => state.lod_frac,
            Self::PrimLodFrac => state.prim_lod_frac,
        };
        [v; 3]
    }
}

impl AlphaInput {
    /// Subtract A, subtract B and add share one decoding.
    fn sub_add(code: u8) -> Self {
        match code & 7 {
            c @ 0..=5 => Source::from_code(c).map_or(Self::Zero, Self::Alpha),
            6 => Self::One,
            _ => Self::Zero,
        }
    }

    fn mul(code: u8) -> Self {
        match code & 7 {
            0 => Self::LodFrac,
            c @ 1..=5 => Source::from_code(c).map_or(Self::Zero, Self::Alpha),
            6 => Self::PrimLodFrac,
            _ => Self::Zero,
        }
    }

    #[must_use]
    pub const fn source(self) -> Option<Source> {
        match self {
            Self::Alpha(s) => Some(s),
            _ => None,
        }
    }

    fn read(self, state: &PipelineState) -> i32 {
        match self {
            Self::Alpha(s) => s.read(state).a,
            Self::One => ONE,
            Self::Zero => 0,
            Self::LodFrac => state.lod_frac,
            Self::PrimLodFrac => state.prim_lod_frac,
        }
    }
}

/// One operand of the combiner equation: an RGB input and an alpha input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub rgb: RgbInput,
    pub alpha: AlphaInput,
}

impl Operand {
    /// Current value of the operand.
    #[must_use]
    pub fn color(&self, state: &PipelineState) -> Color {
        let [r, g, b] = self.rgb.read(state);
        Color::new(r, g, b, self.alpha.read(state))
    }
}

/// The four operands of one combiner cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleInputs {
    pub sub_a: Operand,
    pub sub_b: Operand,
    pub mul: Operand,
    pub add: Operand,
}

impl CycleInputs {
    fn operands(&self) -> [&Operand; 4] {
        [&self.sub_a, &self.sub_b, &self.mul, &self.add]
    }

    /// `src` feeds an RGB operand.
    #[must_use]
    pub fn rgb_uses(&self, src: Source) -> bool {
        self.operands().iter().any(|o| o.rgb.source() == Some(src))
    }

    /// `src` feeds an alpha operand.
    #[must_use]
    pub fn alpha_uses(&self, src: Source) -> bool {
        self.operands().iter().any(|o| o.alpha.source() == Some(src))
    }

    #[must_use]
    pub fn uses(&self, src: Source) -> bool {
        self.rgb_uses(src) || self.alpha_uses(src)
    }

    /// The LOD fraction is a multiplier.
    #[must_use]
    pub fn uses_lod_frac(&self) -> bool {
        self.mul.rgb == RgbInput::LodFrac || self.alpha_uses_lod_frac()
    }

    #[must_use]
    pub fn alpha_uses_lod_frac(&self) -> bool {
        self.mul.alpha == AlphaInput::LodFrac
    }

    /// Noise is the RGB minuend.
    #[must_use]
    pub fn uses_noise(&self) -> bool {
        self.sub_a.rgb == RgbInput::Noise
    }
}

/// Decoded selectors for both cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinerInputs {
    pub cycles: [CycleInputs; 2],
}

impl CombinerInputs {
    #[must_use]
    pub fn new(mode: CombineModeReg) -> Self {
        Self {
            cycles: [
                CycleInputs {
                    sub_a: Operand {
                        rgb: RgbInput::sub_a(mode.sub_a_rgb_0()),
                        alpha: AlphaInput::sub_add(mode.sub_a_alpha_0()),
                    },
                    sub_b: Operand {
                        rgb: RgbInput::sub_b(mode.sub_b_rgb_0()),
                        alpha: AlphaInput::sub_add(mode.sub_b_alpha_0()),
                    },
                    mul: Operand {
                        rgb: RgbInput::mul(mode.mul_rgb_0()),
                        alpha: AlphaInput::mul(mode.mul_alpha_0()),
                    },
                    add: Operand {
                        rgb: RgbInput::add(mode.add_rgb_0()),
                        alpha: AlphaInput::sub_add(mode.add_alpha_0()),
                    },
                },
                CycleInputs {
                    sub_a: Operand {
                        rgb: RgbInput::sub_a(mode.sub_a_rgb_1()),
                        alpha: AlphaInput::sub_add(mode.sub_a_alpha_1()),
                    },
                    sub_b: Operand {
                        rgb: RgbInput::sub_b(mode.sub_b_rgb_1()),
                        alpha: AlphaInput::sub_add(mode.sub_b_alpha_1()),
                    },
                    mul: Operand {
                        rgb: RgbInput::mul(mode.mul_rgb_1()),
                        alpha: AlphaInput::mul(mode.mul_alpha_1()),
                    },
                    add: Operand {
                        rgb: RgbInput::add(mode.add_rgb_1()),
                        alpha: AlphaInput::sub_add(mode.add_alpha_1()),
                    },
                },
            ],
        }
    }
}

impl Default for CombinerInputs {
    fn default() -> Self {
        Self::new(CombineModeReg::default())
    }
}
