//! In-order iterators over a [`BalancedOrderedTree`](super::BalancedOrderedTree).
//!
//! Both iterators walk the tree with an explicit stack of pending ancestors
//! instead of recursion, so a traversal can stop after any element and
//! resume later. The stack never holds more than `height` nodes.

use super::node::{Link, Node};
use smallvec::SmallVec;
use std::iter::FusedIterator;
use std::ptr;

/// Stack slots kept inline before spilling to the heap.
///
/// An AVL tree of height 32 holds millions of elements, so typical trees
/// never allocate while iterating.
const INLINE_DEPTH: usize = 32;

/// A borrowing iterator over the elements of a tree in ascending order.
///
/// Created by [`BalancedOrderedTree::iter`](super::BalancedOrderedTree::iter).
///
/// Besides the [`Iterator`] protocol it exposes the current position:
/// [`peek`](Self::peek) returns the element `next` would yield and
/// [`is_exhausted`](Self::is_exhausted) reports whether anything remains.
/// Two iterators are equal when they are positioned on the same node of the
/// same tree, or when both are exhausted.
///
/// # Examples
///
/// ```rust
/// use balanced_tree::tree::BalancedOrderedTree;
///
/// let tree: BalancedOrderedTree<i32> = [3, 1, 2].into_iter().collect();
/// let mut iter = tree.iter();
///
/// assert_eq!(iter.peek(), Some(&1));
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.peek(), Some(&2));
/// assert_eq!(iter.len(), 2);
/// ```
pub struct Iter<'a, T> {
    stack: SmallVec<[&'a Node<T>; INLINE_DEPTH]>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(root: Option<&'a Node<T>>, length: usize) -> Self {
        let mut iter = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }

    /// Returns the element the next call to `next` would yield, without
    /// advancing.
    #[must_use]
    pub fn peek(&self) -> Option<&'a T> {
        self.stack.last().map(|node| &node.element)
    }

    /// Returns `true` once every element has been yielded.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T> PartialEq for Iter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.stack.last(), other.stack.last()) {
            (Some(current), Some(other_current)) => ptr::eq(*current, *other_current),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T> Eq for Iter<'_, T> {}

/// An owning iterator over the elements of a tree in ascending order.
///
/// Created by the [`IntoIterator`] implementation of
/// [`BalancedOrderedTree`](super::BalancedOrderedTree). Nodes are unlinked
/// one at a time as their element is yielded.
///
/// Dropping a partly consumed iterator releases each pending element before
/// its right subtree, unlike the children-first order of
/// [`clear`](super::BalancedOrderedTree::clear).
pub struct IntoIter<T> {
    stack: SmallVec<[Box<Node<T>>; INLINE_DEPTH]>,
    remaining: usize,
}

impl<T> IntoIter<T> {
    pub(super) fn new(root: Link<T>, length: usize) -> Self {
        let mut iter = Self {
            stack: SmallVec::new(),
            remaining: length,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut link: Link<T>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        let right = node.right.take();
        self.push_left_spine(right);
        self.remaining = self.remaining.saturating_sub(1);
        let Node { element, .. } = *node;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for IntoIter<T> {}
