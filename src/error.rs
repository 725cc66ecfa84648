//! Error types for tree export and structural validation.
//!
//! Looking up or removing an absent element is not an error: `find`
//! returns `None` and `remove` returns `false`. The types here cover the
//! two remaining failure modes, a destination that cannot grow during bulk
//! export and a tree whose structure no longer satisfies its invariants.

use std::collections::TryReserveError;
use std::fmt;

/// Failure while copying the elements of a tree into a caller-owned container.
///
/// The source tree is never modified by an export, so it is still intact
/// when this error is returned.
///
/// # Examples
///
/// ```rust
/// use balanced_tree::error::ExportError;
/// use std::error::Error;
///
/// let source = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
/// let error = ExportError::AllocationFailed { requested: 3, source };
/// assert_eq!(
///     format!("{error}"),
///     "export failed: could not allocate room for 3 elements"
/// );
/// assert!(error.source().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// The destination buffer could not reserve room for every element.
    AllocationFailed {
        /// Number of elements the export tried to reserve.
        requested: usize,
        /// The reservation error reported by the allocator.
        source: TryReserveError,
    },
}

impl ExportError {
    pub(crate) fn from_reserve(requested: usize, source: TryReserveError) -> Self {
        log::trace!("export reservation of {requested} elements failed: {source}");
        Self::AllocationFailed { requested, source }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested, .. } => write!(
                formatter,
                "export failed: could not allocate room for {requested} elements"
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::AllocationFailed { source, .. } => Some(source),
        }
    }
}

/// A broken structural invariant reported by
/// [`BalancedOrderedTree::validate`](crate::tree::BalancedOrderedTree::validate).
///
/// Depths are counted from the root, which has depth 0. A healthy tree never
/// produces one of these. Seeing one means the comparator is not a strict
/// weak ordering, or the tree has a bug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The heights of two sibling subtrees differ by more than one.
    Unbalanced {
        /// Depth of the offending node.
        depth: usize,
        /// Height of its left subtree.
        left_height: usize,
        /// Height of its right subtree.
        right_height: usize,
    },
    /// A node's cached height disagrees with the height of its subtrees.
    StaleHeight {
        /// Depth of the offending node.
        depth: usize,
        /// Height stored in the node.
        cached: usize,
        /// Height recomputed from its children.
        actual: usize,
    },
    /// In-order traversal found an element that precedes its predecessor.
    OutOfOrder {
        /// Zero-based in-order position of the offending element.
        position: usize,
    },
    /// The stored length differs from the number of reachable nodes.
    CountMismatch {
        /// Length recorded by the tree.
        recorded: usize,
        /// Nodes actually reachable from the root.
        reachable: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbalanced {
                depth,
                left_height,
                right_height,
            } => write!(
                formatter,
                "node at depth {depth} is unbalanced: left height {left_height}, right height {right_height}"
            ),
            Self::StaleHeight {
                depth,
                cached,
                actual,
            } => write!(
                formatter,
                "node at depth {depth} caches height {cached} but has height {actual}"
            ),
            Self::OutOfOrder { position } => {
                write!(formatter, "element at in-order position {position} is out of order")
            }
            Self::CountMismatch {
                recorded,
                reachable,
            } => write!(
                formatter,
                "tree records {recorded} elements but {reachable} are reachable"
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
