//! Counting and index lookup
//!
//! Flat index <-> identifier <-> path conversions over a filled tree.

use super::{Group, GroupOrId, Span};
use crate::range::CmdId;

impl Group {
    /// Number of direct items.
    pub fn count(&self) -> u64 {
        self.children.item_count()
    }

    /// Recursive item count.
    ///
    /// `should_expand` decides per sub-group whether it is recursed into or
    /// counted as a single item.
    pub fn deep_count<P>(&self, mut should_expand: P) -> u64
    where
        P: FnMut(&Group) -> bool,
    {
        self.deep_count_inner(&mut should_expand)
    }

    fn deep_count_inner<P>(&self, should_expand: &mut P) -> u64
    where
        P: FnMut(&Group) -> bool,
    {
        let mut count = 0;
        for span in self.children.iter() {
            count += match span {
                Span::Group(group) if should_expand(group) => group.deep_count_inner(should_expand),
                other => other.item_count(),
            };
        }
        count
    }

    /// The item at direct index `index`, or `None` past the end.
    pub fn index(&self, mut index: u64) -> Option<GroupOrId<'_>> {
        for span in self.children.iter() {
            let count = span.item_count();
            if index < count {
                return Some(span.item(index));
            }
            index -= count;
        }
        None
    }

    /// Direct index of the item that is, or contains, `id`.
    ///
    /// `None` if `id` falls in a gap or outside the group.
    pub fn index_of(&self, id: CmdId) -> Option<u64> {
        let child = self.children.index_of(id)?;
        let preceding: u64 = self.children[..child].iter().map(Span::item_count).sum();
        Some(preceding + self.children[child].item_index(id))
    }

    /// Full path from this group down to the leaf holding `id`.
    pub fn path_of(&self, id: CmdId) -> Option<Vec<u64>> {
        let mut path = Vec::new();
        let mut group = self;
        loop {
            path.push(group.index_of(id)?);
            let child = group.children.index_of(id)?;
            match &group.children[child] {
                Span::Group(inner) => group = inner,
                Span::Range(_) => return Some(path),
            }
        }
    }

    /// Follow `path` from this group.
    ///
    /// An empty path resolves to the group itself.
    pub fn resolve(&self, path: &[u64]) -> Option<GroupOrId<'_>> {
        let mut item = GroupOrId::Group(self);
        for &index in path {
            item = item.group()?.index(index)?;
        }
        Some(item)
    }
}
