//! Group children
//!
//! Span = leaf range | nested group.
//! Spans keep children sorted by (start, end) and non-overlapping, so every
//! lookup is a binary search over bounds.

use std::ops::Deref;

use super::{Group, GroupOrId};
use crate::range::{CmdId, CmdRange};

/// A child of a [`Group`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    /// Contiguous run of leaf identifiers
    Range(CmdRange),

    /// Nested group
    Group(Group),
}

impl Span {
    /// Absolute identifier bounds of the span.
    pub fn bounds(&self) -> CmdRange {
        match self {
            Span::Range(range) => *range,
            Span::Group(group) => group.range,
        }
    }

    /// Number of items this span represents to its parent.
    ///
    /// A leaf range counts each identifier, a group always counts as 1.
    pub fn item_count(&self) -> u64 {
        match self {
            Span::Range(range) => range.length(),
            Span::Group(_) => 1,
        }
    }

    /// The `i`-th item of the span.
    ///
    /// For a group this is always the group itself.
    pub fn item(&self, i: u64) -> GroupOrId<'_> {
        match self {
            Span::Range(range) => GroupOrId::Id(range.start + i),
            Span::Group(group) => GroupOrId::Group(group),
        }
    }

    /// Item sub-index of `id` within the span.
    pub fn item_index(&self, id: CmdId) -> u64 {
        match self {
            Span::Range(range) => id - range.start,
            Span::Group(_) => 0,
        }
    }

    /// Split into a span holding `n` items and the rest, if any.
    ///
    /// Groups are indivisible: they come back whole with no remainder.
    pub fn split(self, n: u64) -> (Span, Option<Span>) {
        match self {
            Span::Range(range) => {
                let (head, tail) = range.split(n);
                let tail = (!tail.is_empty()).then_some(Span::Range(tail));
                (Span::Range(head), tail)
            }
            group @ Span::Group(_) => (group, None),
        }
    }
}

/// Ordered, non-overlapping list of [`Span`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spans(Vec<Span>);

impl Spans {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Index of the child containing `id`.
    pub fn index_of(&self, id: CmdId) -> Option<usize> {
        let idx = self.0.partition_point(|span| span.bounds().end <= id);
        self.0
            .get(idx)
            .filter(|span| span.bounds().contains(id))
            .map(|_| idx)
    }

    /// Contiguous run of children intersecting `range`.
    ///
    /// Returns: (index of first intersecting child, number of children)
    pub fn overlap(&self, range: CmdRange) -> (usize, usize) {
        let first = self.0.partition_point(|span| span.bounds().end <= range.start);
        let last = self.0.partition_point(|span| span.bounds().start < range.end);
        (first, last.saturating_sub(first))
    }

    /// Sorted position for a new span over `range` that overlaps nothing.
    pub fn insertion_point(&self, range: CmdRange) -> usize {
        self.0.partition_point(|span| {
            let bounds = span.bounds();
            (bounds.start, bounds.end) <= (range.start, range.end)
        })
    }

    /// Insert `span` before the child at `index`.
    pub fn insert_before(&mut self, index: usize, span: Span) {
        self.0.insert(index, span);
        debug_assert!(self.is_ordered(), "insert_before broke span order");
    }

    /// Replace `count` children starting at `index` with a single span built
    /// from them.
    pub fn replace(&mut self, index: usize, count: usize, wrap: impl FnOnce(Spans) -> Span) {
        let run: Vec<Span> = self.0.drain(index..index + count).collect();
        self.0.insert(index, wrap(Spans(run)));
        debug_assert!(self.is_ordered(), "replace broke span order");
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Span> {
        self.0.get_mut(index)
    }

    pub(crate) fn push(&mut self, span: Span) {
        self.0.push(span);
    }

    /// Total items of all children.
    pub fn item_count(&self) -> u64 {
        self.0.iter().map(Span::item_count).sum()
    }

    fn is_ordered(&self) -> bool {
        self.0
            .windows(2)
            .all(|pair| pair[0].bounds().end <= pair[1].bounds().start)
    }
}

impl Deref for Spans {
    type Target = [Span];

    fn deref(&self) -> &[Span] {
        &self.0
    }
}

impl IntoIterator for Spans {
    type Item = Span;
    type IntoIter = std::vec::IntoIter<Span>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Span> for Spans {
    fn from_iter<T: IntoIterator<Item = Span>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
