use crate::treap::aggregator::Aggregator;
use crate::treap::node::Node;
use rand::Rng;

pub type Tree<T> = Option<Box<Node<T>>>;

/// Builds a treap from values in key order, drawing a fresh priority per node.
///
/// Processes elements left to right while maintaining the rightmost path of the tree
/// built so far as a stack. Each new node pops every spine node with a strictly greater
/// priority and subsumes the popped chain as its left subtree. A node's aggregate is
/// closed when it leaves the spine, so every aggregate is final when the build returns.
/// Amortized `O(n)`: every node is pushed and popped exactly once.
pub fn build<T, A, R>(values: Vec<T>, keys: Vec<i64>, aggregator: &A, rng: &mut R) -> Tree<T>
where
    T: Clone,
    A: Aggregator<T>,
    R: Rng,
{
    let mut spine: Vec<Box<Node<T>>> = Vec::new();
    for (value, key) in values.into_iter().zip(keys) {
        let mut node = Box::new(Node::new(value, key, rng.next_u32()));
        let mut last = None;
        while spine
            .last()
            .map_or(false, |top| top.priority > node.priority)
        {
            let mut top = spine.pop().expect("Unreachable code");
            top.right = last;
            top.update(aggregator);
            last = Some(top);
        }
        node.left = last;
        node.update(aggregator);
        spine.push(node);
    }

    let mut tree = None;
    while let Some(mut top) = spine.pop() {
        top.right = tree;
        top.update(aggregator);
        tree = Some(top);
    }
    tree
}

/// Partitions the tree by a key threshold. Keys strictly less than `key` remain in
/// `tree`; the subtree holding all keys greater than or equal to `key` is returned.
///
/// Each visited node's pending lazy state is resolved before its children are
/// rearranged, and its aggregate is recomputed after rewiring. Expected `O(log n)`.
pub fn split<T, A>(tree: &mut Tree<T>, key: i64, aggregator: &A) -> Tree<T>
where
    T: Clone,
    A: Aggregator<T>,
{
    match tree.take() {
        Some(mut node) => {
            node.push(aggregator);
            let ret;
            if node.key >= key {
                let res = split(&mut node.left, key, aggregator);
                *tree = node.left.take();
                node.left = res;
                node.update(aggregator);
                ret = Some(node);
            } else {
                ret = split(&mut node.right, key, aggregator);
                node.update(aggregator);
                *tree = Some(node);
            }
            ret
        }
        None => None,
    }
}

/// Merges two trees where every key in `l_tree` is strictly less than every key in
/// `r_tree`, leaving the result in `l_tree`.
///
/// The root with the smaller priority wins, ties breaking toward the left root. The
/// winner's pending lazy state is resolved before its boundary child is merged with the
/// other whole tree, and its aggregate is recomputed after the attach. Expected
/// `O(log n)`.
pub fn merge<T, A>(l_tree: &mut Tree<T>, r_tree: Tree<T>, aggregator: &A)
where
    T: Clone,
    A: Aggregator<T>,
{
    match (l_tree.take(), r_tree) {
        (Some(mut l_node), Some(mut r_node)) => {
            debug_assert!(
                max_key(&l_node) < min_key(&r_node),
                "Error: merged trees must have ordered, disjoint key ranges."
            );
            if l_node.priority <= r_node.priority {
                l_node.push(aggregator);
                merge(&mut l_node.right, Some(r_node), aggregator);
                l_node.update(aggregator);
                *l_tree = Some(l_node);
            } else {
                r_node.push(aggregator);
                let mut new_tree = Some(l_node);
                merge(&mut new_tree, r_node.left.take(), aggregator);
                r_node.left = new_tree;
                r_node.update(aggregator);
                *l_tree = Some(r_node);
            }
        }
        (new_tree, None) | (None, new_tree) => *l_tree = new_tree,
    }
}

fn min_key<T>(node: &Node<T>) -> i64 {
    let mut curr = node;
    while let Some(ref left_node) = curr.left {
        curr = left_node;
    }
    curr.key
}

fn max_key<T>(node: &Node<T>) -> i64 {
    let mut curr = node;
    while let Some(ref right_node) = curr.right {
        curr = right_node;
    }
    curr.key
}
