//! # balanced-tree
//!
//! A generic self-balancing binary search tree (AVL tree) with ordered
//! multiset semantics.
//!
//! ## Overview
//!
//! - **Tree**: [`BalancedOrderedTree`](tree::BalancedOrderedTree), with
//!   O(log N) insert, find and remove, and O(1) length
//! - **Comparators**: [`Compare`](compare::Compare) strict weak orderings,
//!   including closures and [`Reverse`](compare::Reverse)
//! - **Iteration**: pausable in-order iterators backed by an explicit stack
//! - **Errors**: export failures and structural invariant reports
//!
//! ## Feature Flags
//!
//! - `serde`: serialize trees as in-order sequences and deserialize them
//!   by repeated insertion
//!
//! ## Logging
//!
//! Structural events (rotations, node removal, clearing) are reported at
//! `trace` level through the [`log`] facade. Install any `log` backend to
//! see them.
//!
//! ## Example
//!
//! ```rust
//! use balanced_tree::prelude::*;
//!
//! let mut tree = BalancedOrderedTree::new();
//! for element in [5, 8, 4, 6, 5] {
//!     tree.insert(element);
//! }
//! assert_eq!(tree.to_sequence::<Vec<_>>(), vec![4, 5, 5, 6, 8]);
//! assert!(tree.validate().is_ok());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the tree, its iterators, the comparators and the error types.
///
/// # Usage
///
/// ```rust
/// use balanced_tree::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compare::*;
    pub use crate::error::*;
    pub use crate::tree::*;
}

pub mod compare;
pub mod error;
pub mod tree;
