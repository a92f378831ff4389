//! Half-open command identifier ranges
//!
//! Range = [start, end) over the global command identifier space.
//! Splitting is by identifier count, never by position.

use std::fmt;

/// Opaque ordinal naming one recorded command.
pub type CmdId = u64;

/// Half-open interval `[start, end)` of command identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CmdRange {
    /// First identifier in the range (inclusive).
    pub start: CmdId,

    /// One past the last identifier in the range (exclusive).
    pub end: CmdId,
}

impl CmdRange {
    /// Create the range `[start, end)`.
    pub fn new(start: CmdId, end: CmdId) -> Self {
        Self { start, end }
    }

    /// Number of identifiers covered.
    #[inline]
    pub fn length(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// True if the range covers no identifiers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check whether `id` lies inside the range.
    #[inline]
    pub fn contains(&self, id: CmdId) -> bool {
        self.start <= id && id < self.end
    }

    /// True if `other` lies entirely inside this range.
    pub fn encloses(&self, other: &CmdRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Split into the first `n` identifiers and the remainder.
    ///
    /// The first part holds `min(n, length)` identifiers; the remainder may be
    /// empty.
    pub fn split(&self, n: u64) -> (CmdRange, CmdRange) {
        let mid = self.start + n.min(self.length());
        (
            CmdRange::new(self.start, mid),
            CmdRange::new(mid, self.end),
        )
    }
}

impl From<std::ops::Range<CmdId>> for CmdRange {
    fn from(range: std::ops::Range<CmdId>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for CmdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.start, self.end)
    }
}
