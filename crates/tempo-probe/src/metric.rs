use std::fmt;

/// The two startup metrics a probe reports.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Metric {
    /// Time to first paint.
    FirstPaint,
    /// Time to interactive.
    Interactive,
}

impl Metric {
    /// Short label used in diagnostic lines and on the display surface.
    pub const fn label(self) -> &'static str {
        match self {
            Metric::FirstPaint => "TTFP",
            Metric::Interactive => "TTI",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A non-negative whole number of milliseconds.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Millis(pub u64);

impl Millis {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Millis {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
