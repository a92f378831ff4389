//! Skeleton construction: inserting named sub-groups
//!
//! All groups must be added before leaves are filled. A filled subtree holds
//! leaf ranges that the builder cannot re-home.

use tracing::debug;

use super::{Group, GroupError, Span};
use crate::range::{CmdId, CmdRange};

impl Group {
    /// Insert a new sub-group named `name` spanning `[start, end)`.
    ///
    /// - No overlap with existing children: inserted in identifier order.
    /// - Contained in a single existing child group: added to that group.
    /// - Wraps one or more existing children exactly: those children move
    ///   into the new group, which takes their place.
    /// - Partially overlaps an existing child: [`GroupError::Overlap`].
    ///
    /// On error the tree is left unchanged.
    ///
    /// # Panics
    ///
    /// If the overlapped children include leaf ranges, i.e. the subtree has
    /// already been filled.
    pub fn add_group(
        &mut self,
        start: CmdId,
        end: CmdId,
        name: impl Into<String>,
    ) -> Result<(), GroupError> {
        self.add_group_inner(start, end, name.into())
    }

    fn add_group_inner(&mut self, start: CmdId, end: CmdId, name: String) -> Result<(), GroupError> {
        if start > end {
            return Err(GroupError::InvertedRange { start, end });
        }
        if start < self.range.start {
            return Err(GroupError::StartBeforeGroup {
                start,
                group_start: self.range.start,
            });
        }
        if end > self.range.end {
            return Err(GroupError::EndAfterGroup {
                end,
                group_end: self.range.end,
            });
        }

        let range = CmdRange::new(start, end);
        let (first_idx, count) = self.children.overlap(range);

        if count == 0 {
            let idx = self.children.insertion_point(range);
            debug!(group = %self.name, %name, %range, "inserting sub-group");
            self.children.insert_before(idx, Span::Group(Group::new(name, range)));
            return Ok(());
        }

        let last_idx = first_idx + count - 1;
        let first = skeleton_group(&self.children[first_idx]).range;
        let last = skeleton_group(&self.children[last_idx]).range;
        let starts_inside = first.contains(start);
        let ends_inside = end.checked_sub(1).is_some_and(|last_id| last.contains(last_id));

        if count == 1 && starts_inside && ends_inside {
            let Some(Span::Group(existing)) = self.children.get_mut(first_idx) else {
                unreachable!("overlapped child checked to be a group");
            };
            existing.add_group_inner(start, end, name)?;
            debug!(parent = %self.name, %range, "nested sub-group");
            return Ok(());
        }
        if starts_inside && start != first.start {
            return Err(self.overlap_error(name, first_idx));
        }
        if ends_inside && end != last.end {
            return Err(self.overlap_error(name, last_idx));
        }

        debug!(group = %self.name, %name, %range, wrapped = count, "wrapping existing groups");
        self.children.replace(first_idx, count, |wrapped| {
            Span::Group(Group::with_children(name, range, wrapped))
        });
        Ok(())
    }

    fn overlap_error(&self, name: String, idx: usize) -> GroupError {
        let existing = skeleton_group(&self.children[idx]);
        GroupError::Overlap {
            name,
            existing: existing.name.clone(),
            existing_range: existing.range,
        }
    }
}

fn skeleton_group(span: &Span) -> &Group {
    match span {
        Span::Group(group) => group,
        Span::Range(range) => panic!(
            "cannot add groups over filled commands {}: all groups must be added before filling",
            range
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_names(group: &Group) -> Vec<String> {
        group
            .children()
            .iter()
            .map(|span| match span {
                Span::Group(g) => format!("{} {}", g.name, g.range),
                Span::Range(r) => format!("atoms {}", r),
            })
            .collect()
    }

    #[test]
    fn test_clean_insertion_keeps_order() {
        let mut root = Group::new("root", 0..100);
        root.add_group(50, 60, "b").unwrap();
        root.add_group(10, 20, "a").unwrap();
        root.add_group(70, 80, "c").unwrap();
        assert_eq!(child_names(&root), ["a [10-20)", "b [50-60)", "c [70-80)"]);
    }

    #[test]
    fn test_nested_insertion() {
        let mut root = Group::new("root", 0..100);
        root.add_group(10, 50, "frame").unwrap();
        root.add_group(20, 30, "draw").unwrap();
        assert_eq!(child_names(&root), ["frame [10-50)"]);
        let frame = root.index(0).and_then(|item| item.group()).unwrap();
        assert_eq!(child_names(frame), ["draw [20-30)"]);
    }

    #[test]
    fn test_wrapping_moves_children() {
        let mut root = Group::new("root", 0..100);
        root.add_group(10, 20, "a").unwrap();
        root.add_group(30, 40, "b").unwrap();
        root.add_group(90, 95, "z").unwrap();
        root.add_group(10, 40, "frame").unwrap();
        assert_eq!(child_names(&root), ["frame [10-40)", "z [90-95)"]);
        let frame = root.index(0).and_then(|item| item.group()).unwrap();
        assert_eq!(child_names(frame), ["a [10-20)", "b [30-40)"]);
    }

    #[test]
    fn test_partial_overlap_leaves_tree_untouched() {
        let mut root = Group::new("root", 0..100);
        root.add_group(10, 20, "a").unwrap();
        let before = root.clone();
        let err = root.add_group(15, 25, "b").unwrap_err();
        assert_eq!(
            err,
            GroupError::Overlap {
                name: "b".into(),
                existing: "a".into(),
                existing_range: CmdRange::new(10, 20),
            }
        );
        assert_eq!(root, before);
    }

    #[test]
    #[should_panic(expected = "all groups must be added before filling")]
    fn test_add_after_fill_panics() {
        let mut root = Group::new("root", 0..10);
        root.fill(|_| true, 0).unwrap();
        let _ = root.add_group(2, 4, "late");
    }

    #[test]
    fn test_failed_nesting_is_not_logged() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let capture = Capture(Arc::default());
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut root = Group::new("root", 0..100);
        root.add_group(10, 50, "frame").unwrap();
        root.add_group(20, 30, "draw").unwrap();
        let before = root.clone();
        tracing::subscriber::with_default(subscriber, || {
            assert!(root.add_group(25, 40, "state").is_err());
            root.add_group(40, 45, "blit").unwrap();
        });
        assert_ne!(root, before);

        let logs = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        let nested: Vec<&str> = logs.lines().filter(|l| l.contains("nested sub-group")).collect();
        assert_eq!(nested.len(), 1, "{}", logs);
        assert!(nested[0].contains("[40-45)"), "{}", logs);
    }

    #[test]
    fn test_empty_group_inserts_and_nests() {
        let mut root = Group::new("root", 0..100);
        root.add_group(10, 50, "frame").unwrap();
        root.add_group(10, 10, "marker").unwrap();
        root.add_group(30, 30, "inner").unwrap();
        assert_eq!(child_names(&root), ["marker [10-10)", "frame [10-50)"]);
        let frame = root.index(1).and_then(|item| item.group()).unwrap();
        assert_eq!(child_names(frame), ["inner [30-30)"]);
    }
}
