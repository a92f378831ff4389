//! Named command groups
//!
//! A group projects a slice of the flat command stream into a tree:
//! children are either leaf ranges of identifiers or nested groups,
//! kept in ascending, non-overlapping order.
//!
//! Lifecycle:
//! 1. Build the skeleton with [`Group::add_group`] (any order of calls)
//! 2. Fill leaves once with [`Group::fill`] / [`Group::fill_with`]
//! 3. Query read-only: counting, lookup, traversal

mod build;
mod fill;
mod format;
mod query;
mod span;
mod traversal;

pub use fill::{FillConfig, DEFAULT_BUCKET_PREFIX};
pub use span::{Span, Spans};
pub use traversal::Direction;

use thiserror::Error;

use crate::range::{CmdId, CmdRange};

/// Errors reported while building or filling a group tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// Sub-group range is inverted
    #[error("sub-group start ({start}) is greater than end ({end})")]
    InvertedRange {
        /// Requested start
        start: CmdId,
        /// Requested end
        end: CmdId,
    },

    /// Sub-group starts before its parent
    #[error("sub-group start ({start}) is earlier than group start ({group_start})")]
    StartBeforeGroup {
        /// Requested start
        start: CmdId,
        /// Start of the enclosing group
        group_start: CmdId,
    },

    /// Sub-group ends after its parent
    #[error("sub-group end ({end}) is later than group end ({group_end})")]
    EndAfterGroup {
        /// Requested end
        end: CmdId,
        /// End of the enclosing group
        group_end: CmdId,
    },

    /// New group partially overlaps an existing sibling
    #[error("new group '{name}' overlaps with existing group '{existing}' {existing_range}")]
    Overlap {
        /// Name of the rejected group
        name: String,
        /// Name of the group it collides with
        existing: String,
        /// Range of the group it collides with
        existing_range: CmdRange,
    },

    /// Fill configuration cannot be honoured
    #[error("invalid fill configuration: {0}")]
    InvalidConfiguration(String),
}

/// A named group of commands with sparse sub-groups and leaf ranges.
///
/// Items: each direct child contributes items to the group. A leaf range
/// contributes one item per identifier, a nested group exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Display name
    pub name: String,

    /// Identifiers this group (and all its items) represents
    pub range: CmdRange,

    children: Spans,
}

impl Group {
    /// Create an empty group over `range`.
    pub fn new(name: impl Into<String>, range: impl Into<CmdRange>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
            children: Spans::default(),
        }
    }

    pub(crate) fn with_children(name: String, range: CmdRange, children: Spans) -> Self {
        Self {
            name,
            range,
            children,
        }
    }

    /// Direct children in ascending identifier order.
    pub fn children(&self) -> &Spans {
        &self.children
    }
}

/// An item of a group: a single command identifier or a nested group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrId<'a> {
    /// Leaf command identifier
    Id(CmdId),

    /// Interior node
    Group(&'a Group),
}

impl<'a> GroupOrId<'a> {
    /// Identifier if this is a leaf.
    pub fn id(&self) -> Option<CmdId> {
        match self {
            GroupOrId::Id(id) => Some(*id),
            GroupOrId::Group(_) => None,
        }
    }

    /// Group if this is an interior node.
    pub fn group(&self) -> Option<&'a Group> {
        match self {
            GroupOrId::Id(_) => None,
            GroupOrId::Group(group) => Some(group),
        }
    }
}
