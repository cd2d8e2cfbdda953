use core::ops::{Add, AddAssign};

use rdp_twin_core::Span;

/// Interpolated S, T and W in the span walker's 16.16 format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TexCoord {
    pub s: i32,
    pub t: i32,
    pub w: i32,
}

impl TexCoord {
    #[must_use]
    pub const fn new(s: i32, t: i32, w: i32) -> Self {
        Self { s, t, w }
    }

    /// Start coordinates of a span.
    #[must_use]
    pub const fn from_span(span: &Span) -> Self {
        Self::new(span.s, span.t, span.w)
    }

    /// `self - step`
    #[must_use]
    pub fn back(self, step: TexCoord) -> Self {
        Self::new(
            self.s.wrapping_sub(step.s),
            self.t.wrapping_sub(step.t),
            self.w.wrapping_sub(step.w),
        )
    }

    /// `self + 2 * step`
    #[must_use]
    pub fn skip(self, step: TexCoord) -> Self {
        self + TexCoord::new(step.s << 1, step.t << 1, step.w << 1)
    }
}

impl Add for TexCoord {
    type Output = TexCoord;

    fn add(self, rhs: TexCoord) -> TexCoord {
        TexCoord::new(
            self.s.wrapping_add(rhs.s),
            self.t.wrapping_add(rhs.t),
            self.w.wrapping_add(rhs.w),
        )
    }
}

impl AddAssign for TexCoord {
    fn add_assign(&mut self, rhs: TexCoord) {
        *self = *self + rhs;
    }
}

/// Position of the current pixel within its span, used by the one
/// cycle pipeline to decide which neighbours to measure against near
/// the end of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanSigs {
    pub end_span: bool,
    pub pre_end_span: bool,
    /// The pixel after the current one ends the span.
    pub next_span: bool,
    /// Span is longer than 7 pixels.
    pub long_span: bool,
    /// Span is exactly 7 pixels.
    pub mid_span: bool,
    /// Span is exactly 6 pixels.
    pub one_less_than_mid: bool,
}
