/// Number of scanlines the span table can hold.
pub const SPAN_LINES: usize = 1024;

/// Per-scanline output of the edge walker.
///
/// `majorx`/`minorx` hold the four sub-scanline edge positions in
/// 10.3 fixed point after scissoring. Attribute values are the
/// interpolated start values at the major edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub lx: i32,
    pub rx: i32,
    /// Unscissored major edge x, whole pixels.
    pub unscrx: i32,
    pub valid_line: bool,

    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub a: i32,
    pub s: i32,
    pub t: i32,
    pub w: i32,
    pub z: i32,

    pub majorx: [i32; 4],
    pub minorx: [i32; 4],
    pub invalid_y_scan: [bool; 4],
}

/// Scratch storage for one primitive's spans.
#[derive(Debug, Clone)]
pub struct SpanTable {
    lines: Vec<Span>,
}

impl Default for SpanTable {
    fn default() -> Self {
        Self {
            lines: vec![Span::default(); SPAN_LINES],
        }
    }
}

impl SpanTable {
    /// Overwrite every entry so nothing leaks from the previous primitive.
    pub fn clear(&mut self) {
        self.lines.fill(Span::default());
    }

    /// Span for scanline `y`, or `None` outside the table.
    #[must_use]
    pub fn get(&self, y: i32) -> Option<&Span> {
        usize::try_from(y).ok().and_then(|i| self.lines.get(i))
    }

    pub fn get_mut(&mut self, y: i32) -> Option<&mut Span> {
        usize::try_from(y).ok().and_then(move |i| self.lines.get_mut(i))
    }

    /// Whether scanline `y` exists and produced pixels.
    #[must_use]
    pub fn is_valid(&self, y: i32) -> bool {
        self.get(y).is_some_and(|s| s.valid_line)
    }
}

/// Attribute gradients shared by every span of a primitive.
///
/// `d*` are per-pixel steps along x, `d*dy` per-scanline steps, and
/// `cd*` the coverage-correction slopes used for partially covered
/// pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanDeltas {
    pub ds: i32,
    pub dt: i32,
    pub dw: i32,
    pub dr: i32,
    pub dg: i32,
    pub db: i32,
    pub da: i32,
    pub dz: i32,
    pub dzpix: i32,

    pub drdy: i32,
    pub dgdy: i32,
    pub dbdy: i32,
    pub dady: i32,
    pub dzdy: i32,
    pub cdr: i32,
    pub cdg: i32,
    pub cdb: i32,
    pub cda: i32,
    pub cdz: i32,

    pub dsdy: i32,
    pub dtdy: i32,
    pub dwdy: i32,
}
