//! Tree nodes and the AVL balancing primitives.
//!
//! Heights follow the convention empty = 0, leaf = 1. Every function here
//! takes ownership of a subtree and hands back the (possibly new) root of
//! that subtree, so callers relink the result into the parent slot.

/// An owned, possibly absent, child subtree.
pub(super) type Link<T> = Option<Box<Node<T>>>;

/// Largest permitted height difference between sibling subtrees.
const ALLOWED_IMBALANCE: usize = 1;

/// A single tree node.
///
/// Each node exclusively owns both children. The derived `Clone` copies the
/// element first and then the left and right subtrees, giving a pre-order
/// deep copy that shares nothing with the source.
#[derive(Clone)]
pub(super) struct Node<T> {
    pub(super) element: T,
    pub(super) left: Link<T>,
    pub(super) right: Link<T>,
    pub(super) height: usize,
}

impl<T> Node<T> {
    /// Creates a detached leaf.
    pub(super) const fn leaf(element: T) -> Self {
        Self {
            element,
            left: None,
            right: None,
            height: 1,
        }
    }

    /// Recomputes the cached height from the children.
    fn refresh_height(&mut self) {
        self.height = 1 + height(self.left.as_deref()).max(height(self.right.as_deref()));
    }
}

/// Height of a subtree, 0 when it is absent.
#[inline]
pub(super) fn height<T>(node: Option<&Node<T>>) -> usize {
    node.map_or(0, |node| node.height)
}

/// Promotes the left child into `root`'s position.
///
/// ```text
///       root            pivot
///      /    \          /     \
///   pivot    c  =>    a      root
///   /   \                   /    \
///  a     b                 b      c
/// ```
#[allow(clippy::unnecessary_box_returns)] // subtrees are relinked as boxes
fn rotate_right<T>(mut root: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut pivot) = root.left.take() else {
        return root;
    };
    log::trace!("rotate right at height {}", root.height);
    root.left = pivot.right.take();
    // The demoted root must be refreshed first: the pivot's height reads it.
    root.refresh_height();
    pivot.right = Some(root);
    pivot.refresh_height();
    pivot
}

/// Promotes the right child into `root`'s position. Mirror of [`rotate_right`].
#[allow(clippy::unnecessary_box_returns)] // subtrees are relinked as boxes
fn rotate_left<T>(mut root: Box<Node<T>>) -> Box<Node<T>> {
    let Some(mut pivot) = root.right.take() else {
        return root;
    };
    log::trace!("rotate left at height {}", root.height);
    root.right = pivot.left.take();
    root.refresh_height();
    pivot.left = Some(root);
    pivot.refresh_height();
    pivot
}

/// Restores the AVL invariant at `node`, assuming both subtrees already
/// satisfy it and their heights differ by at most two.
///
/// Returns the new subtree root with a fresh cached height.
#[allow(clippy::unnecessary_box_returns)] // subtrees are relinked as boxes
pub(super) fn balance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let left_height = height(node.left.as_deref());
    let right_height = height(node.right.as_deref());

    if left_height > right_height + ALLOWED_IMBALANCE {
        if let Some(left) = node.left.take() {
            // Left-right shape: straighten the child before the outer rotation.
            node.left = Some(
                if height(left.left.as_deref()) >= height(left.right.as_deref()) {
                    left
                } else {
                    rotate_left(left)
                },
            );
        }
        node = rotate_right(node);
    } else if right_height > left_height + ALLOWED_IMBALANCE {
        if let Some(right) = node.right.take() {
            node.right = Some(
                if height(right.right.as_deref()) >= height(right.left.as_deref()) {
                    right
                } else {
                    rotate_right(right)
                },
            );
        }
        node = rotate_left(node);
    }

    node.refresh_height();
    node
}

/// Detaches the minimum element of a subtree.
///
/// Returns the rebalanced remainder of the subtree and the detached element.
pub(super) fn take_min<T>(mut node: Box<Node<T>>) -> (Link<T>, T) {
    match node.left.take() {
        None => {
            let Node { element, right, .. } = *node;
            (right, element)
        }
        Some(left) => {
            let (rest, minimum) = take_min(left);
            node.left = rest;
            (Some(balance(node)), minimum)
        }
    }
}

/// Drops a subtree children-first.
pub(super) fn release<T>(mut node: Box<Node<T>>) {
    if let Some(left) = node.left.take() {
        release(left);
    }
    if let Some(right) = node.right.take() {
        release(right);
    }
}

/// Is `left_height` within tolerance of `right_height`?
#[inline]
pub(super) const fn is_within_tolerance(left_height: usize, right_height: usize) -> bool {
    left_height.abs_diff(right_height) <= ALLOWED_IMBALANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn leaf(element: i32) -> Box<Node<i32>> {
        Box::new(Node::leaf(element))
    }

    fn join(left: Link<i32>, element: i32, right: Link<i32>) -> Box<Node<i32>> {
        let mut node = Box::new(Node {
            element,
            left,
            right,
            height: 0,
        });
        node.refresh_height();
        node
    }

    fn in_order(node: Option<&Node<i32>>, output: &mut Vec<i32>) {
        if let Some(node) = node {
            in_order(node.left.as_deref(), output);
            output.push(node.element);
            in_order(node.right.as_deref(), output);
        }
    }

    fn elements(node: &Node<i32>) -> Vec<i32> {
        let mut output = Vec::new();
        in_order(Some(node), &mut output);
        output
    }

    #[rstest]
    fn test_leaf_has_height_one() {
        let node = Node::leaf(7);
        assert_eq!(node.height, 1);
        assert_eq!(height::<i32>(None), 0);
        assert_eq!(height(Some(&node)), 1);
    }

    #[rstest]
    fn test_rotate_right_promotes_left_child() {
        // 30 <- 20 <- 10 chain leaning left
        let chain = join(Some(join(Some(leaf(10)), 20, None)), 30, None);
        let rotated = rotate_right(chain);

        assert_eq!(rotated.element, 20);
        assert_eq!(rotated.height, 2);
        assert_eq!(rotated.left.as_ref().map(|node| node.element), Some(10));
        assert_eq!(rotated.right.as_ref().map(|node| node.height), Some(1));
        assert_eq!(elements(&rotated), vec![10, 20, 30]);
    }

    #[rstest]
    fn test_rotate_left_promotes_right_child() {
        let chain = join(None, 10, Some(join(None, 20, Some(leaf(30)))));
        let rotated = rotate_left(chain);

        assert_eq!(rotated.element, 20);
        assert_eq!(rotated.height, 2);
        assert_eq!(elements(&rotated), vec![10, 20, 30]);
    }

    #[rstest]
    fn test_rotation_without_pivot_is_identity() {
        let single = leaf(5);
        let rotated = rotate_right(single);
        assert_eq!(rotated.element, 5);
        let rotated = rotate_left(rotated);
        assert_eq!(rotated.element, 5);
    }

    #[rstest]
    fn test_rotation_moves_inner_subtree() {
        //       40
        //      /  \
        //    20    50
        //   /  \
        //  10  30
        let tree = join(
            Some(join(Some(leaf(10)), 20, Some(leaf(30)))),
            40,
            Some(leaf(50)),
        );
        let rotated = rotate_right(tree);

        assert_eq!(rotated.element, 20);
        let demoted = rotated.right.as_deref().map(|node| node.element);
        assert_eq!(demoted, Some(40));
        let moved = rotated
            .right
            .as_deref()
            .and_then(|node| node.left.as_deref())
            .map(|node| node.element);
        assert_eq!(moved, Some(30));
        assert_eq!(elements(&rotated), vec![10, 20, 30, 40, 50]);
    }

    #[rstest]
    #[case::left_left(join(Some(join(Some(leaf(1)), 2, None)), 3, None))]
    #[case::left_right(join(Some(join(None, 1, Some(leaf(2)))), 3, None))]
    #[case::right_right(join(None, 1, Some(join(None, 2, Some(leaf(3))))))]
    #[case::right_left(join(None, 1, Some(join(Some(leaf(2)), 3, None))))]
    fn test_balance_fixes_every_shape(#[case] unbalanced: Box<Node<i32>>) {
        let balanced = balance(unbalanced);
        assert_eq!(balanced.element, 2);
        assert_eq!(balanced.height, 2);
        assert_eq!(elements(&balanced), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_balance_leaves_balanced_node_alone() {
        let node = join(Some(leaf(1)), 2, Some(leaf(3)));
        let balanced = balance(node);
        assert_eq!(balanced.element, 2);
        assert_eq!(balanced.height, 2);
    }

    #[rstest]
    fn test_take_min_detaches_leftmost() {
        let tree = join(
            Some(join(Some(leaf(1)), 2, Some(leaf(3)))),
            4,
            Some(leaf(5)),
        );
        let (rest, minimum) = take_min(tree);
        assert_eq!(minimum, 1);
        let rest = rest.expect("four elements remain");
        assert_eq!(elements(&rest), vec![2, 3, 4, 5]);
        assert!(rest.height <= 3);
    }

    #[rstest]
    fn test_take_min_of_single_node() {
        let (rest, minimum) = take_min(leaf(9));
        assert_eq!(minimum, 9);
        assert!(rest.is_none());
    }

    #[rstest]
    #[case(0, 0, true)]
    #[case(2, 1, true)]
    #[case(1, 3, false)]
    fn test_is_within_tolerance(#[case] left: usize, #[case] right: usize, #[case] expected: bool) {
        assert_eq!(is_within_tolerance(left, right), expected);
    }
}
