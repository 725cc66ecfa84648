//! The [`BalancedOrderedTree`] container.

use super::iter::{IntoIter, Iter};
use super::node::{self, Link, Node};
use crate::compare::{Compare, Natural};
use crate::error::{ExportError, InvariantViolation};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;

// =============================================================================
// BalancedOrderedTree Definition
// =============================================================================

/// A self-balancing (AVL) binary search tree with ordered multiset semantics.
///
/// Elements are ordered by a comparator `C`, which defaults to [`Natural`]
/// (the element's [`Ord`] implementation). Elements the comparator considers
/// equivalent are all kept; a new duplicate is placed after the existing
/// ones, so in-order iteration yields equivalent elements in insertion order.
///
/// Every node owns its children, so dropping, clearing, or cloning the tree
/// releases or copies the whole node graph with no sharing.
///
/// # Time Complexity
///
/// | Operation              | Complexity |
/// |------------------------|------------|
/// | `new`                  | O(1)       |
/// | `insert`               | O(log N)   |
/// | `find` / `contains`    | O(log N)   |
/// | `remove` / `take`      | O(log N)   |
/// | `first` / `last`       | O(log N)   |
/// | `len` / `is_empty`     | O(1)       |
/// | `clear` / `clone`      | O(N)       |
/// | `iter` (full pass)     | O(N)       |
///
/// # Examples
///
/// ```rust
/// use balanced_tree::tree::BalancedOrderedTree;
///
/// let mut tree = BalancedOrderedTree::new();
/// for element in [5, 8, 4, 6, 5] {
///     tree.insert(element);
/// }
///
/// assert_eq!(tree.len(), 5);
/// assert_eq!(tree.find(&5), Some(&5));
/// assert_eq!(tree.to_sequence::<Vec<_>>(), vec![4, 5, 5, 6, 8]);
///
/// assert!(tree.remove(&5));
/// assert_eq!(tree.len(), 4);
/// assert!(tree.contains(&5));
/// ```
#[derive(Clone)]
pub struct BalancedOrderedTree<T, C = Natural> {
    root: Link<T>,
    length: usize,
    comparator: C,
}

impl<T> BalancedOrderedTree<T> {
    /// Creates an empty tree ordered by the element's [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let tree: BalancedOrderedTree<i32> = BalancedOrderedTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> BalancedOrderedTree<T, C> {
    /// Creates an empty tree ordered by `comparator`.
    ///
    /// The comparator must be a strict weak ordering; see
    /// [`compare`](crate::compare) for the contract.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let mut tree = BalancedOrderedTree::with_comparator(|left: &i32, right: &i32| left > right);
    /// tree.insert(1);
    /// tree.insert(3);
    /// assert_eq!(tree.first(), Some(&3));
    /// ```
    #[inline]
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            length: 0,
            comparator,
        }
    }

    /// Returns the number of elements, counting duplicates.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the tree holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single element.
    ///
    /// The AVL invariant keeps this below `1.45 * log2(len + 2)`.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        node::height(self.root.as_deref())
    }

    /// Returns the comparator ordering this tree.
    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Removes every element.
    ///
    /// Nodes are released children-first. The comparator is kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let mut tree: BalancedOrderedTree<i32> = (0..10).collect();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert_eq!(tree.height(), 0);
    /// ```
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            log::trace!("clearing tree of {} elements", self.length);
            node::release(root);
        }
        self.length = 0;
    }

    /// Returns an iterator over the elements in ascending order.
    ///
    /// The iterator keeps an explicit stack of ancestors, so it can be
    /// paused between elements and never recurses.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let tree: BalancedOrderedTree<i32> = [3, 1, 2].into_iter().collect();
    /// let elements: Vec<&i32> = tree.iter().collect();
    /// assert_eq!(elements, vec![&1, &2, &3]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref(), self.length)
    }

    /// Returns the smallest element, or the first of several equivalent ones.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        let mut current = self.root.as_deref()?;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        Some(&current.element)
    }

    /// Returns the largest element, or the last of several equivalent ones.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        let mut current = self.root.as_deref()?;
        while let Some(right) = current.right.as_deref() {
            current = right;
        }
        Some(&current.element)
    }

    /// Copies every element, in order, into a new container of the caller's
    /// choosing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    /// use std::collections::VecDeque;
    ///
    /// let tree: BalancedOrderedTree<i32> = [2, 1, 3].into_iter().collect();
    /// let vector: Vec<i32> = tree.to_sequence();
    /// let deque: VecDeque<i32> = tree.to_sequence();
    /// assert_eq!(vector, vec![1, 2, 3]);
    /// assert_eq!(deque, VecDeque::from([1, 2, 3]));
    /// ```
    #[must_use]
    pub fn to_sequence<S>(&self) -> S
    where
        T: Clone,
        S: FromIterator<T>,
    {
        self.iter().cloned().collect()
    }

    /// Appends every element, in order, to an existing container.
    pub fn export_into<E>(&self, destination: &mut E)
    where
        T: Clone,
        E: Extend<T>,
    {
        destination.extend(self.iter().cloned());
    }

    /// Feeds every element, in order, to a fallible `append` callback.
    ///
    /// The first error stops the export and is returned unchanged. The tree
    /// is only read, so it is intact afterwards; whatever `append` already
    /// stored is the caller's to discard.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `append`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let tree: BalancedOrderedTree<i32> = (1..=5).collect();
    /// let mut bounded = Vec::new();
    /// let result = tree.try_export(|element| {
    ///     if bounded.len() == 3 {
    ///         return Err("destination full");
    ///     }
    ///     bounded.push(*element);
    ///     Ok(())
    /// });
    ///
    /// assert_eq!(result, Err("destination full"));
    /// assert_eq!(bounded, vec![1, 2, 3]);
    /// assert_eq!(tree.len(), 5);
    /// ```
    pub fn try_export<E, F>(&self, append: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        self.iter().try_for_each(append)
    }

    /// Copies every element, in order, into a freshly allocated vector,
    /// reporting allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::AllocationFailed`] if room for `len()` elements
    /// cannot be reserved.
    pub fn try_to_vec(&self) -> Result<Vec<T>, ExportError>
    where
        T: Clone,
    {
        let mut elements = Vec::new();
        elements
            .try_reserve_exact(self.length)
            .map_err(|error| ExportError::from_reserve(self.length, error))?;
        elements.extend(self.iter().cloned());
        Ok(elements)
    }

    /// Writes the elements in order, separated by single spaces.
    ///
    /// # Errors
    ///
    /// Propagates any error from `writer`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let tree: BalancedOrderedTree<i32> = [8, 4, 6].into_iter().collect();
    /// let mut output = Vec::new();
    /// tree.write_in_order(&mut output).unwrap();
    /// assert_eq!(output, b"4 6 8");
    /// ```
    pub fn write_in_order<W>(&self, writer: &mut W) -> io::Result<()>
    where
        T: fmt::Display,
        W: io::Write + ?Sized,
    {
        write!(writer, "{self}")
    }
}

impl<T, C: Compare<T>> BalancedOrderedTree<T, C> {
    /// Builds a tree from `elements`, ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let by_length = |left: &&str, right: &&str| left.len() < right.len();
    /// let tree = BalancedOrderedTree::from_iter_with(["ccc", "a", "bb"], by_length);
    /// assert_eq!(tree.to_sequence::<Vec<_>>(), vec!["a", "bb", "ccc"]);
    /// ```
    pub fn from_iter_with<I>(elements: I, comparator: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_comparator(comparator);
        tree.extend(elements);
        tree
    }

    /// Inserts an element, keeping any equivalent elements already present.
    ///
    /// The new element becomes the last of its equivalence class in
    /// iteration order.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let mut tree = BalancedOrderedTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn insert(&mut self, element: T) {
        self.root = Some(Self::insert_into(
            self.root.take(),
            element,
            &self.comparator,
        ));
        self.length += 1;
    }

    #[allow(clippy::unnecessary_box_returns)] // relinked into the parent slot
    fn insert_into(link: Link<T>, element: T, comparator: &C) -> Box<Node<T>> {
        let Some(mut node) = link else {
            return Box::new(Node::leaf(element));
        };
        if comparator.less(&element, &node.element) {
            node.left = Some(Self::insert_into(node.left.take(), element, comparator));
        } else {
            node.right = Some(Self::insert_into(node.right.take(), element, comparator));
        }
        node::balance(node)
    }

    /// Returns a stored element equivalent to `element`, if there is one.
    ///
    /// With duplicates present, whichever equivalent element the search
    /// reaches first is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let tree: BalancedOrderedTree<i32> = [5, 8, 4].into_iter().collect();
    /// assert_eq!(tree.find(&8), Some(&8));
    /// assert_eq!(tree.find(&7), None);
    /// ```
    #[must_use]
    pub fn find(&self, element: &T) -> Option<&T> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            if self.comparator.less(element, &node.element) {
                current = node.left.as_deref();
            } else if self.comparator.less(&node.element, element) {
                current = node.right.as_deref();
            } else {
                return Some(&node.element);
            }
        }
        None
    }

    /// Returns `true` if an element equivalent to `element` is stored.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.find(element).is_some()
    }

    /// Removes one element equivalent to `element`.
    ///
    /// Returns `false`, leaving the tree untouched, when nothing matches.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let mut tree: BalancedOrderedTree<i32> = [4, 5, 5].into_iter().collect();
    /// assert!(tree.remove(&5));
    /// assert!(tree.contains(&5));
    /// assert!(!tree.remove(&9));
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn remove(&mut self, element: &T) -> bool {
        self.take(element).is_some()
    }

    /// Removes one element equivalent to `element` and returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let mut tree: BalancedOrderedTree<String> =
    ///     ["a".to_string(), "b".to_string()].into_iter().collect();
    /// assert_eq!(tree.take(&"a".to_string()), Some("a".to_string()));
    /// assert_eq!(tree.take(&"a".to_string()), None);
    /// ```
    pub fn take(&mut self, element: &T) -> Option<T> {
        let (root, removed) = Self::remove_from(self.root.take(), element, &self.comparator);
        self.root = root;
        if removed.is_some() {
            self.length -= 1;
        }
        removed
    }

    fn remove_from(link: Link<T>, element: &T, comparator: &C) -> (Link<T>, Option<T>) {
        let Some(mut node) = link else {
            return (None, None);
        };

        let removed = if comparator.less(element, &node.element) {
            let (left, removed) = Self::remove_from(node.left.take(), element, comparator);
            node.left = left;
            removed
        } else if comparator.less(&node.element, element) {
            let (right, removed) = Self::remove_from(node.right.take(), element, comparator);
            node.right = right;
            removed
        } else {
            return Self::unlink(node);
        };

        (Some(node::balance(node)), removed)
    }

    /// Removes `node` itself from its subtree.
    fn unlink(mut node: Box<Node<T>>) -> (Link<T>, Option<T>) {
        match (node.left.take(), node.right.take()) {
            (None, None) => {
                log::trace!("unlinking leaf");
                let Node { element, .. } = *node;
                (None, Some(element))
            }
            (Some(child), None) | (None, Some(child)) => {
                log::trace!("splicing single child of height {}", child.height);
                let Node { element, .. } = *node;
                (Some(child), Some(element))
            }
            (Some(left), Some(right)) => {
                log::trace!("replacing node with its in-order successor");
                let (rest, successor) = node::take_min(right);
                let removed = std::mem::replace(&mut node.element, successor);
                node.left = Some(left);
                node.right = rest;
                (Some(node::balance(node)), Some(removed))
            }
        }
    }

    /// Replaces the contents of the tree with `elements`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let mut tree: BalancedOrderedTree<i32> = (0..100).collect();
    /// tree.assign([3, 1, 2]);
    /// assert_eq!(tree.to_sequence::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    pub fn assign<I>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.extend(elements);
    }

    /// Checks every structural invariant of the tree.
    ///
    /// Verifies that sibling heights differ by at most one, that every
    /// cached height is current, that in-order traversal is non-decreasing
    /// under the comparator, and that the recorded length matches the number
    /// of nodes.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use balanced_tree::tree::BalancedOrderedTree;
    ///
    /// let tree: BalancedOrderedTree<i32> = (0..1000).collect();
    /// assert!(tree.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let reachable = Self::validate_node(self.root.as_deref(), 0)?;
        if reachable != self.length {
            return Err(InvariantViolation::CountMismatch {
                recorded: self.length,
                reachable,
            });
        }

        let mut previous: Option<&T> = None;
        for (position, element) in self.iter().enumerate() {
            if let Some(previous) = previous
                && self.comparator.less(element, previous)
            {
                return Err(InvariantViolation::OutOfOrder { position });
            }
            previous = Some(element);
        }
        Ok(())
    }

    /// Validates heights and balance below `node`, returning its node count.
    fn validate_node(node: Option<&Node<T>>, depth: usize) -> Result<usize, InvariantViolation> {
        let Some(node) = node else {
            return Ok(0);
        };
        let left_count = Self::validate_node(node.left.as_deref(), depth + 1)?;
        let right_count = Self::validate_node(node.right.as_deref(), depth + 1)?;

        let left_height = node::height(node.left.as_deref());
        let right_height = node::height(node.right.as_deref());
        let actual = 1 + left_height.max(right_height);
        if node.height != actual {
            return Err(InvariantViolation::StaleHeight {
                depth,
                cached: node.height,
                actual,
            });
        }
        if !node::is_within_tolerance(left_height, right_height) {
            return Err(InvariantViolation::Unbalanced {
                depth,
                left_height,
                right_height,
            });
        }
        Ok(left_count + right_count + 1)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, C> Drop for BalancedOrderedTree<T, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, C: Default> Default for BalancedOrderedTree<T, C> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for BalancedOrderedTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(iter, C::default())
    }
}

impl<T, C: Compare<T> + Default, const N: usize> From<[T; N]> for BalancedOrderedTree<T, C> {
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<T, C: Compare<T>> Extend<T> for BalancedOrderedTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<'a, T: Copy + 'a, C: Compare<T>> Extend<&'a T> for BalancedOrderedTree<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, C> IntoIterator for BalancedOrderedTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let length = std::mem::take(&mut self.length);
        IntoIter::new(self.root.take(), length)
    }
}

impl<'a, T, C> IntoIterator for &'a BalancedOrderedTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Trees are equal when they yield equal sequences; comparators are ignored.
impl<T: PartialEq, C> PartialEq for BalancedOrderedTree<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for BalancedOrderedTree<T, C> {}

impl<T: Hash, C> Hash for BalancedOrderedTree<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BalancedOrderedTree<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, C> fmt::Display for BalancedOrderedTree<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, " ")?;
            }
            write!(formatter, "{element}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T, C> serde::Serialize for BalancedOrderedTree<T, C>
where
    T: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut sequence = serializer.serialize_seq(Some(self.length))?;
        for element in self {
            sequence.serialize_element(element)?;
        }
        sequence.end()
    }
}

#[cfg(feature = "serde")]
struct BalancedOrderedTreeVisitor<T, C> {
    marker: std::marker::PhantomData<(T, C)>,
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::de::Visitor<'de> for BalancedOrderedTreeVisitor<T, C>
where
    T: serde::Deserialize<'de>,
    C: Compare<T> + Default,
{
    type Value = BalancedOrderedTree<T, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut tree = BalancedOrderedTree::default();
        while let Some(element) = access.next_element()? {
            tree.insert(element);
        }
        Ok(tree)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::Deserialize<'de> for BalancedOrderedTree<T, C>
where
    T: serde::Deserialize<'de>,
    C: Compare<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(BalancedOrderedTreeVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_serialize_empty() {
        let tree: BalancedOrderedTree<i32> = BalancedOrderedTree::new();
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, "[]");
    }

    #[rstest]
    fn test_serialize_in_order_with_duplicates() {
        let tree: BalancedOrderedTree<i32> = [5, 8, 4, 6, 5].into_iter().collect();
        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, "[4,5,5,6,8]");
    }

    #[rstest]
    fn test_deserialize_unsorted_input() {
        let tree: BalancedOrderedTree<i32> = serde_json::from_str("[3,1,2,1]").unwrap();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.to_sequence::<Vec<_>>(), vec![1, 1, 2, 3]);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[rstest]
    fn test_roundtrip_large() {
        let original: BalancedOrderedTree<String> =
            (0..100).map(|index| format!("key{index:03}")).collect();
        let json = serde_json::to_string(&original).unwrap();
        let restored: BalancedOrderedTree<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[rstest]
    fn test_deserialize_rejects_non_sequence() {
        let result: Result<BalancedOrderedTree<i32>, _> = serde_json::from_str("{\"a\":1}");
        assert!(result.is_err());
    }
}
