// 🌳 Order-Statistics Tree - Left-leaning red-black tree with subtree sizes
//
// Nodes live in an arena (`Vec<Node>`) and refer to each other by index.
// Every entry is keyed by (value, insertion sequence), so equal amounts never
// collide: ties are ordered by arrival. Each node caches the size of its
// subtree, which makes select-by-rank O(log n).
//
// The tree only grows. There is no deletion, so the arena never has holes.

use crate::error::EngineError;
use std::cmp::Ordering;

type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
struct Node {
    value: f64,
    seq: usize,
    left: Option<NodeId>,
    right: Option<NodeId>,
    /// Number of entries in the subtree rooted here (including this one)
    size: usize,
    color: Color,
}

impl Node {
    fn leaf(value: f64, seq: usize) -> Self {
        Node {
            value,
            seq,
            left: None,
            right: None,
            size: 1,
            color: Color::Red,
        }
    }
}

// ============================================================================
// ORDER-STATISTICS TREE
// ============================================================================

/// Multiset of real values with O(log n) insert and k-th smallest lookup.
#[derive(Debug, Clone, Default)]
pub struct OrderStatisticTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl OrderStatisticTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.size_of(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a value. The entry's sequence number is the current size, so
    /// it sorts after every earlier entry with the same value.
    pub fn insert(&mut self, value: f64) {
        let seq = self.len();
        let root = self.put(self.root, value, seq);
        self.nodes[root].color = Color::Black;
        self.root = Some(root);
    }

    /// Return the value of the (k+1)-th smallest entry (0-indexed rank).
    ///
    /// Walks a single root-to-node path, so it touches at most `height()`
    /// nodes.
    pub fn select_kth_smallest(&self, k: usize) -> Result<f64, EngineError> {
        let len = self.len();
        if k >= len {
            return Err(EngineError::OutOfRange { index: k, len });
        }

        let mut rank = k;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            let left_size = self.size_of(node.left);
            match rank.cmp(&left_size) {
                Ordering::Less => current = node.left,
                Ordering::Greater => {
                    rank -= left_size + 1;
                    current = node.right;
                }
                Ordering::Equal => return Ok(node.value),
            }
        }

        // Subtree sizes always sum to `len`, so the walk ends on a node.
        Err(EngineError::OutOfRange { index: k, len })
    }

    /// Longest root-to-leaf path, in nodes. Zero for an empty tree.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(NodeId, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            let node = &self.nodes[id];
            if let Some(l) = node.left {
                stack.push((l, depth + 1));
            }
            if let Some(r) = node.right {
                stack.push((r, depth + 1));
            }
        }
        max
    }

    /// In-order iterator over all values, smallest first.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            tree: self,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn size_of(&self, id: Option<NodeId>) -> usize {
        id.map_or(0, |id| self.nodes[id].size)
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.nodes[id].color == Color::Red)
    }

    fn compare(&self, value: f64, seq: usize, id: NodeId) -> Ordering {
        let node = &self.nodes[id];
        value
            .total_cmp(&node.value)
            .then_with(|| seq.cmp(&node.seq))
    }

    fn put(&mut self, h: Option<NodeId>, value: f64, seq: usize) -> NodeId {
        let Some(mut h) = h else {
            self.nodes.push(Node::leaf(value, seq));
            return self.nodes.len() - 1;
        };

        // Sequence numbers are unique, so the comparison is never Equal.
        if self.compare(value, seq, h) == Ordering::Less {
            let left = self.put(self.nodes[h].left, value, seq);
            self.nodes[h].left = Some(left);
        } else {
            let right = self.put(self.nodes[h].right, value, seq);
            self.nodes[h].right = Some(right);
        }

        if self.is_red(self.nodes[h].right) && !self.is_red(self.nodes[h].left) {
            h = self.rotate_left(h);
        }
        if self.is_red(self.nodes[h].left) {
            let left = self.nodes[h].left;
            if self.is_red(left.and_then(|l| self.nodes[l].left)) {
                h = self.rotate_right(h);
            }
        }
        if self.is_red(self.nodes[h].left) && self.is_red(self.nodes[h].right) {
            self.flip_colors(h);
        }

        self.refresh_size(h);
        h
    }

    fn refresh_size(&mut self, id: NodeId) {
        let size = 1 + self.size_of(self.nodes[id].left) + self.size_of(self.nodes[id].right);
        self.nodes[id].size = size;
    }

    fn rotate_left(&mut self, h: NodeId) -> NodeId {
        let Some(x) = self.nodes[h].right else {
            return h;
        };
        self.nodes[h].right = self.nodes[x].left;
        self.nodes[x].left = Some(h);
        self.nodes[x].color = self.nodes[h].color;
        self.nodes[h].color = Color::Red;
        self.nodes[x].size = self.nodes[h].size;
        self.refresh_size(h);
        x
    }

    fn rotate_right(&mut self, h: NodeId) -> NodeId {
        let Some(x) = self.nodes[h].left else {
            return h;
        };
        self.nodes[h].left = self.nodes[x].right;
        self.nodes[x].right = Some(h);
        self.nodes[x].color = self.nodes[h].color;
        self.nodes[h].color = Color::Red;
        self.nodes[x].size = self.nodes[h].size;
        self.refresh_size(h);
        x
    }

    // Insert-only: the parent turns red and both children black.
    fn flip_colors(&mut self, h: NodeId) {
        self.nodes[h].color = Color::Red;
        for child in [self.nodes[h].left, self.nodes[h].right].into_iter().flatten() {
            self.nodes[child].color = Color::Black;
        }
    }
}

// ============================================================================
// ITERATION
// ============================================================================

pub struct Iter<'a> {
    tree: &'a OrderStatisticTree,
    stack: Vec<NodeId>,
}

impl Iter<'_> {
    fn push_left_spine(&mut self, mut current: Option<NodeId>) {
        while let Some(id) = current {
            self.stack.push(id);
            current = self.tree.nodes[id].left;
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        self.push_left_spine(node.right);
        Some(node.value)
    }
}

impl<'a> IntoIterator for &'a OrderStatisticTree {
    type Item = f64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_from(values: &[f64]) -> OrderStatisticTree {
        let mut tree = OrderStatisticTree::new();
        for &v in values {
            tree.insert(v);
        }
        tree
    }

    #[test]
    fn test_empty_tree() {
        let tree = OrderStatisticTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(
            tree.select_kth_smallest(0),
            Err(EngineError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_select_in_sorted_order() {
        let tree = tree_from(&[30.0, 10.0, 50.0, 20.0, 40.0]);

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.select_kth_smallest(0), Ok(10.0));
        assert_eq!(tree.select_kth_smallest(1), Ok(20.0));
        assert_eq!(tree.select_kth_smallest(2), Ok(30.0));
        assert_eq!(tree.select_kth_smallest(3), Ok(40.0));
        assert_eq!(tree.select_kth_smallest(4), Ok(50.0));
    }

    #[test]
    fn test_select_out_of_range() {
        let tree = tree_from(&[1.0, 2.0, 3.0]);
        assert_eq!(
            tree.select_kth_smallest(3),
            Err(EngineError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let tree = tree_from(&[50.0, 20.0, 50.0, 50.0, 20.0]);

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.select_kth_smallest(0), Ok(20.0));
        assert_eq!(tree.select_kth_smallest(1), Ok(20.0));
        assert_eq!(tree.select_kth_smallest(2), Ok(50.0));
        assert_eq!(tree.select_kth_smallest(3), Ok(50.0));
        assert_eq!(tree.select_kth_smallest(4), Ok(50.0));
    }

    #[test]
    fn test_iter_is_in_order() {
        let tree = tree_from(&[3.5, 1.25, 2.0, 1.25, 9.0]);
        let values: Vec<f64> = tree.iter().collect();
        assert_eq!(values, vec![1.25, 1.25, 2.0, 3.5, 9.0]);
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        // Sorted input is the worst case for an unbalanced BST.
        let n = 10_000;
        let mut tree = OrderStatisticTree::new();
        for i in 0..n {
            tree.insert(i as f64);
        }

        assert_eq!(tree.len(), n);
        // Red-black bound: height <= 2 * log2(n + 1)
        let bound = 2.0 * ((n + 1) as f64).log2();
        assert!((tree.height() as f64) <= bound, "height {}", tree.height());
        assert_eq!(tree.select_kth_smallest(n / 2), Ok((n / 2) as f64));
    }

    #[test]
    fn test_all_equal_inserts_stay_balanced() {
        let n = 4_096;
        let tree = tree_from(&vec![7.0; n]);

        let bound = 2.0 * ((n + 1) as f64).log2();
        assert!((tree.height() as f64) <= bound);
        assert_eq!(tree.select_kth_smallest(n - 1), Ok(7.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn select_matches_stable_sort(values in prop::collection::vec(0u32..5_000, 0..300)) {
                let values: Vec<f64> = values.into_iter().map(|v| v as f64 / 4.0).collect();
                let tree = tree_from(&values);

                let mut sorted = values.clone();
                sorted.sort_by(|a, b| a.total_cmp(b));

                prop_assert_eq!(tree.len(), values.len());
                for (k, expected) in sorted.iter().enumerate() {
                    prop_assert_eq!(tree.select_kth_smallest(k), Ok(*expected));
                }
                prop_assert_eq!(tree.iter().collect::<Vec<_>>(), sorted);
            }

            #[test]
            fn height_stays_logarithmic(values in prop::collection::vec(0u32..100, 1..500)) {
                let tree = tree_from(&values.iter().map(|&v| v as f64).collect::<Vec<_>>());
                let bound = 2.0 * ((tree.len() + 1) as f64).log2();
                prop_assert!((tree.height() as f64) <= bound);
            }
        }
    }
}
