use crate::treap::aggregator::Aggregator;

/// A struct representing an internal node of a range treap.
pub struct Node<T> {
    /// The node's own contribution, as supplied at construction.
    pub value: T,
    /// The aggregate of the subtree rooted at this node.
    pub data: T,
    /// The externally supplied sort key.
    pub key: i64,
    /// The randomly assigned heap rank, fixed for the node's lifetime.
    pub priority: u32,
    pub left: Option<Box<Node<T>>>,
    pub right: Option<Box<Node<T>>>,
}

impl<T> Node<T>
where
    T: Clone,
{
    pub(crate) fn new(value: T, key: i64, priority: u32) -> Self {
        let data = value.clone();
        Node {
            value,
            data,
            key,
            priority,
            left: None,
            right: None,
        }
    }

    /// Recomputes the subtree aggregate from the node's own value and the children's
    /// current aggregates. Must be called bottom-up after any structural change.
    pub(crate) fn update<A>(&mut self, aggregator: &A)
    where
        A: Aggregator<T>,
    {
        self.data = aggregator.update(
            &self.value,
            self.left.as_ref().map(|node| &node.data),
            self.right.as_ref().map(|node| &node.data),
        );
    }

    /// Resolves the node's pending lazy state, stamping the returned overrides onto the
    /// children's aggregates. Must be called before the children are read or rearranged.
    pub(crate) fn push<A>(&mut self, aggregator: &A)
    where
        A: Aggregator<T>,
    {
        let (data, left_data, right_data) = aggregator.push(self.data.clone());
        self.data = data;
        if let (Some(node), Some(data)) = (self.left.as_mut(), left_data) {
            node.data = data;
        }
        if let (Some(node), Some(data)) = (self.right.as_mut(), right_data) {
            node.data = data;
        }
    }
}
