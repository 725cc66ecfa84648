//! Ordering relations used by [`BalancedOrderedTree`](crate::tree::BalancedOrderedTree).
//!
//! A tree never calls [`Ord`] directly. It asks its comparator whether one
//! element strictly precedes another, which lets callers order elements by
//! a projection, in reverse, or by any ad-hoc rule.
//!
//! # Contract
//!
//! Every comparator must be a *strict weak ordering*:
//!
//! - irreflexive: `less(a, a)` is `false`
//! - transitive: `less(a, b) && less(b, c)` implies `less(a, c)`
//! - incomparability is transitive: if `a ~ b` and `b ~ c` then `a ~ c`,
//!   where `x ~ y` means neither `less(x, y)` nor `less(y, x)`
//!
//! Breaking the contract is a caller error. The tree does not detect it and
//! its ordering and balance guarantees no longer hold.
//!
//! # Examples
//!
//! ```rust
//! use balanced_tree::compare::{Compare, Natural, Reverse};
//!
//! assert!(Natural.less(&1, &2));
//! assert!(Reverse(Natural).less(&2, &1));
//!
//! let by_length = |left: &&str, right: &&str| left.len() < right.len();
//! assert!(by_length.equivalent(&"abc", &"xyz"));
//! ```

use std::cmp::Ordering;

/// A strict weak ordering over `T`.
pub trait Compare<T: ?Sized> {
    /// Returns `true` if `left` strictly precedes `right`.
    fn less(&self, left: &T, right: &T) -> bool;

    /// Returns `true` if neither element precedes the other.
    #[inline]
    fn equivalent(&self, left: &T, right: &T) -> bool {
        !self.less(left, right) && !self.less(right, left)
    }

    /// Converts the relation into a three-way [`Ordering`].
    #[inline]
    fn ordering(&self, left: &T, right: &T) -> Ordering {
        if self.less(left, right) {
            Ordering::Less
        } else if self.less(right, left) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// The natural order of a type, as given by its [`Ord`] implementation.
///
/// This is the default comparator of every tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> Compare<T> for Natural {
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        left < right
    }
}

/// Flips the direction of the wrapped comparator.
///
/// # Examples
///
/// ```rust
/// use balanced_tree::compare::{Natural, Reverse};
/// use balanced_tree::tree::BalancedOrderedTree;
///
/// let tree = BalancedOrderedTree::from_iter_with([1, 3, 2], Reverse(Natural));
/// let descending: Vec<i32> = tree.to_sequence();
/// assert_eq!(descending, vec![3, 2, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reverse<C>(pub C);

impl<T: ?Sized, C: Compare<T>> Compare<T> for Reverse<C> {
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        self.0.less(right, left)
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, left: &T, right: &T) -> bool {
        self(left, right)
    }
}
