//! Self-balancing ordered tree.
//!
//! This module provides [`BalancedOrderedTree`], a mutable AVL tree that
//! keeps its elements sorted under a [`Compare`](crate::compare::Compare)
//! relation and allows duplicates.
//!
//! # Overview
//!
//! After every insertion or removal each node on the modified path is
//! rebalanced bottom-up, so for every node the heights of its two subtrees
//! differ by at most one. This bounds the height by roughly
//! `1.44 * log2(N)` and keeps `insert`, `find` and `remove` at O(log N).
//!
//! Rebalancing uses the four classic rotation shapes:
//!
//! ```text
//!   left-left        left-right        right-right       right-left
//!       c                c             a                  a
//!      /                /               \                  \
//!     b                a                 b                  c
//!    /                  \                 \                /
//!   a                    b                 c              b
//!
//!   each becomes      b
//!                    / \
//!                   a   c
//! ```
//!
//! # Examples
//!
//! ```rust
//! use balanced_tree::tree::BalancedOrderedTree;
//!
//! let mut tree: BalancedOrderedTree<i32> = [1, 2, 8, 74, 5].into_iter().collect();
//! assert_eq!(tree.to_sequence::<Vec<_>>(), vec![1, 2, 5, 8, 74]);
//!
//! // Moving out leaves an empty tree behind
//! let moved = std::mem::take(&mut tree);
//! assert!(tree.is_empty());
//! assert_eq!(moved.len(), 5);
//! ```

mod balanced;
mod iter;
mod node;

pub use balanced::BalancedOrderedTree;
pub use iter::IntoIter;
pub use iter::Iter;
