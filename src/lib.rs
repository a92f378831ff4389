//! # Hierarchical command-group index
//!
//! Projects a flat, monotonically increasing stream of recorded command
//! identifiers into a navigable tree of named groups and leaf ranges,
//! without copying or reordering the stream.
//!
//! ## Core Algorithm
//!
//! 1. **Build**: nest named groups (`frame 3`, `draw 12`) via interval
//!    containment; partial overlaps are rejected
//! 2. **Fill**: sweep each group, turning accepted identifiers into leaf
//!    ranges and leaving rejected ones as gaps
//! 3. **Rebalance**: pack overlarge groups into synthetic buckets so every
//!    group holds at most `max_children` items
//! 4. **Query**: flat index <-> identifier <-> path, and resumable
//!    bidirectional depth-first traversal
//!
//! ## Usage Example
//!
//! ```
//! use cmdtree::{Direction, Group, GroupOrId};
//!
//! let mut root = Group::new("trace", 0..10);
//! root.add_group(2, 4, "draw").unwrap();
//! root.fill(|_| true, 0).unwrap();
//!
//! assert_eq!(root.count(), 9);
//! assert_eq!(root.path_of(3), Some(vec![2, 1]));
//!
//! let mut ids = Vec::new();
//! root.traverse(Direction::Forwards, &[], |_, item| {
//!     if let GroupOrId::Id(id) = item {
//!         ids.push(id);
//!     }
//!     Ok::<_, ()>(())
//! })
//! .unwrap();
//! assert_eq!(ids, (0..10).collect::<Vec<_>>());
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod group; // Group tree: build, fill, query, traverse
pub mod range; // Half-open identifier ranges

// Re-exports for convenience
pub use group::{Direction, FillConfig, Group, GroupError, GroupOrId, Span, Spans};
pub use range::{CmdId, CmdRange};
