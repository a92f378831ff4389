//! Leaf filling and fan-out rebalancing
//!
//! Fill sweeps each group left to right: identifiers accepted by the
//! predicate become leaf ranges, rejected ones stay gaps, and existing
//! sub-groups are filled recursively in place.
//!
//! Rebalance: a group holding more than `max_children` items has its
//! children packed into synthetic buckets of at most `max_children` items.

use tracing::{debug, trace};

use super::{Group, GroupError, Span, Spans};
use crate::range::{CmdId, CmdRange};

/// Name prefix for synthetic buckets ("Sub Group 1", "Sub Group 2", ...).
pub const DEFAULT_BUCKET_PREFIX: &str = "Sub Group";

/// Configuration for [`Group::fill_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillConfig {
    max_children: u64,
    bucket_prefix: String,
}

impl FillConfig {
    /// Configuration bounding every group to `max_children` items.
    ///
    /// `max_children == 1` cannot be honoured: a bucket is itself an item.
    pub fn new(max_children: u64) -> Result<Self, GroupError> {
        if max_children == 1 {
            return Err(GroupError::InvalidConfiguration(
                "max children must be 0 (unbounded) or at least 2".to_string(),
            ));
        }
        Ok(Self {
            max_children,
            bucket_prefix: DEFAULT_BUCKET_PREFIX.to_string(),
        })
    }

    /// Configuration that never rebalances.
    pub fn unbounded() -> Self {
        Self {
            max_children: 0,
            bucket_prefix: DEFAULT_BUCKET_PREFIX.to_string(),
        }
    }

    /// Set the synthetic bucket name prefix.
    pub fn with_bucket_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bucket_prefix = prefix.into();
        self
    }

    /// Maximum direct items per group; 0 disables rebalancing.
    pub fn max_children(&self) -> u64 {
        self.max_children
    }

    /// Name prefix for synthetic buckets.
    pub fn bucket_prefix(&self) -> &str {
        &self.bucket_prefix
    }

    fn limit(&self) -> Option<u64> {
        (self.max_children > 0).then_some(self.max_children)
    }
}

impl Default for FillConfig {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Group {
    /// Fill this group and its sub-groups with leaf ranges selected by
    /// `predicate`, then bound every group to `max_children` items
    /// (0 = unbounded).
    ///
    /// Must be called once, after every [`Group::add_group`] call.
    pub fn fill<P>(&mut self, predicate: P, max_children: u64) -> Result<(), GroupError>
    where
        P: FnMut(CmdId) -> bool,
    {
        let config = FillConfig::new(max_children)?;
        self.fill_with(predicate, &config);
        Ok(())
    }

    /// [`Group::fill`] with an explicit configuration.
    pub fn fill_with<P>(&mut self, mut predicate: P, config: &FillConfig)
    where
        P: FnMut(CmdId) -> bool,
    {
        self.fill_inner(&mut predicate, config);
    }

    fn fill_inner<P>(&mut self, predicate: &mut P, config: &FillConfig)
    where
        P: FnMut(CmdId) -> bool,
    {
        let existing = std::mem::take(&mut self.children);
        let mut spans = Spans::with_capacity(existing.len());
        let mut cursor = self.range.start;

        for span in existing {
            // Stale leaves are rebuilt by the sweep.
            if let Span::Group(mut group) = span {
                push_runs(&mut spans, cursor, group.range.start, predicate);
                group.fill_inner(predicate, config);
                cursor = group.range.end;
                spans.push(Span::Group(group));
            }
        }
        push_runs(&mut spans, cursor, self.range.end, predicate);
        self.children = spans;

        if let Some(max) = config.limit() {
            let mut items = self.count();
            while items > max {
                debug!(group = %self.name, items, max, "rebalancing into buckets");
                let children = std::mem::take(&mut self.children);
                self.children = into_buckets(children, max, &config.bucket_prefix);

                // A pass that cannot shrink the group would repeat forever.
                let packed = self.count();
                if packed >= items {
                    break;
                }
                items = packed;
            }
        }
    }
}

/// Push leaf ranges for the accepted runs of `[from, to)`.
fn push_runs<P>(spans: &mut Spans, from: CmdId, to: CmdId, predicate: &mut P)
where
    P: FnMut(CmdId) -> bool,
{
    let mut run_start = from;
    for id in from..to {
        if !predicate(id) {
            push_run(spans, run_start, id);
            run_start = id + 1;
        }
    }
    push_run(spans, run_start, to);
}

fn push_run(spans: &mut Spans, start: CmdId, end: CmdId) {
    if start < end {
        trace!(start, end, "leaf run");
        spans.push(Span::Range(CmdRange::new(start, end)));
    }
}

/// Pack `spans` into buckets of at most `max` items.
///
/// Leaf ranges split at bucket boundaries; groups never split and start a
/// fresh bucket when the current one is full.
fn into_buckets(spans: Spans, max: u64, prefix: &str) -> Spans {
    let mut out = Spans::default();
    let mut current = Spans::default();
    let mut count = 0;

    for span in spans {
        let mut pending = Some(span);
        while let Some(span) = pending.take() {
            let space = max - count;
            if span.item_count() <= space {
                count += span.item_count();
                current.push(span);
                break;
            }
            if space > 0 {
                let (head, tail) = span.split(space);
                current.push(head);
                pending = tail;
            } else {
                pending = Some(span);
            }
            out.push(bucket(std::mem::take(&mut current), out.len() + 1, prefix));
            count = 0;
        }
    }

    if !current.is_empty() {
        out.push(bucket(current, out.len() + 1, prefix));
    }
    out
}

fn bucket(children: Spans, index: usize, prefix: &str) -> Span {
    let start = children.first().map_or(0, |span| span.bounds().start);
    let end = children.last().map_or(start, |span| span.bounds().end);
    Span::Group(Group::with_children(
        format!("{} {}", prefix, index),
        CmdRange::new(start, end),
        children,
    ))
}
