//! Resumable depth-first traversal
//!
//! Items are addressed by paths: one direct-child index per level.
//! Forward walks emit a group before its items (pre-order), backward walks
//! emit it after its items (post-order), so full walks mirror each other.
//!
//! The path buffer is appended before descending and popped on return; the
//! callback only ever sees it borrowed for the duration of its call.

use std::marker::PhantomData;

use super::{Group, GroupOrId};

/// Traversal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending identifiers
    Forwards,

    /// Descending identifiers
    Backwards,
}

impl Group {
    /// Call `visit` with each direct item at index `from` or later.
    ///
    /// Leaf ranges are expanded into individual identifiers. The first error
    /// returned by `visit` stops iteration and is returned.
    pub fn iterate_forwards<'a, E, F>(&'a self, from: u64, mut visit: F) -> Result<(), E>
    where
        F: FnMut(u64, GroupOrId<'a>) -> Result<(), E>,
    {
        let mut base = 0;
        for span in self.children.iter() {
            let count = span.item_count();
            if base + count > from {
                for i in from.saturating_sub(base)..count {
                    visit(base + i, span.item(i))?;
                }
            }
            base += count;
        }
        Ok(())
    }

    /// Call `visit` with each direct item at index `from` or earlier, in
    /// descending order.
    pub fn iterate_backwards<'a, E, F>(&'a self, from: u64, mut visit: F) -> Result<(), E>
    where
        F: FnMut(u64, GroupOrId<'a>) -> Result<(), E>,
    {
        let mut end = self.count();
        for span in self.children.iter().rev() {
            let count = span.item_count();
            let base = end - count;
            end = base;
            if count == 0 || base > from {
                continue;
            }
            let last = (from - base).min(count - 1);
            for i in (0..=last).rev() {
                visit(base + i, span.item(i))?;
            }
        }
        Ok(())
    }

    /// Depth-first walk starting at the item addressed by `start`.
    ///
    /// `callback` receives the absolute path of each item and the item
    /// itself. An empty `start` walks the whole tree (the root itself is not
    /// emitted). Returning an error aborts the walk immediately.
    pub fn traverse<'a, E, F>(
        &'a self,
        direction: Direction,
        start: &[u64],
        mut callback: F,
    ) -> Result<(), E>
    where
        F: FnMut(&[u64], GroupOrId<'a>) -> Result<(), E>,
    {
        // chain[k] is the group at path start[..k]
        let mut chain: Vec<&'a Group> = vec![self];
        for &index in start {
            match chain[chain.len() - 1].index(index) {
                Some(GroupOrId::Group(group)) => chain.push(group),
                _ => break,
            }
        }

        let deepest = chain.len() - 1;
        let mut walker = Walker {
            direction,
            callback: &mut callback,
            path: Vec::with_capacity(start.len() + 1),
            _items: PhantomData,
        };

        for (level, &group) in chain.iter().enumerate().rev() {
            walker.path.clear();
            walker.path.extend_from_slice(&start[..level]);

            let Some(&index) = start.get(level) else {
                walker.walk(group)?;
                continue;
            };

            // The deepest level resumes at its own entry, outer levels just
            // past the entry they descended through.
            let resume_at_entry = level == deepest;
            match direction {
                Direction::Forwards => {
                    let from = if resume_at_entry {
                        index
                    } else {
                        index.saturating_add(1)
                    };
                    group.iterate_forwards(from, |child, item| walker.visit(child, item))?;
                }
                Direction::Backwards => {
                    let from = if resume_at_entry {
                        Some(index)
                    } else {
                        index.checked_sub(1)
                    };
                    if let Some(from) = from {
                        group.iterate_backwards(from, |child, item| walker.visit(child, item))?;
                    }
                    walker.emit(GroupOrId::Group(group))?;
                }
            }
        }
        Ok(())
    }
}

struct Walker<'a, 'f, E, F> {
    direction: Direction,
    callback: &'f mut F,
    path: Vec<u64>,
    _items: PhantomData<fn(GroupOrId<'a>) -> E>,
}

impl<'a, 'f, E, F> Walker<'a, 'f, E, F>
where
    F: FnMut(&[u64], GroupOrId<'a>) -> Result<(), E>,
{
    fn emit(&mut self, item: GroupOrId<'a>) -> Result<(), E> {
        (self.callback)(&self.path, item)
    }

    fn visit(&mut self, child: u64, item: GroupOrId<'a>) -> Result<(), E> {
        self.path.push(child);
        let result = self.visit_at_path(item);
        self.path.pop();
        result
    }

    fn visit_at_path(&mut self, item: GroupOrId<'a>) -> Result<(), E> {
        if self.direction == Direction::Forwards {
            self.emit(item)?;
        }
        if let GroupOrId::Group(group) = item {
            self.walk(group)?;
        }
        if self.direction == Direction::Backwards {
            self.emit(item)?;
        }
        Ok(())
    }

    /// Every item of `group`, in walk direction.
    fn walk(&mut self, group: &'a Group) -> Result<(), E> {
        match self.direction {
            Direction::Forwards => group.iterate_forwards(0, |child, item| self.visit(child, item)),
            Direction::Backwards => {
                group.iterate_backwards(u64::MAX, |child, item| self.visit(child, item))
            }
        }
    }
}
