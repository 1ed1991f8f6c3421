use crate::treap::aggregator::Aggregator;
use crate::treap::node::Node;
use crate::treap::tree;
use rand::Rng;
use rand::XorShiftRng;

/// An ordered sequence of values at explicit 64-bit keys, implemented using a treap with
/// caller-supplied aggregation.
///
/// A treap is a tree that satisfies both the binary search tree property and a heap
/// property. Each node has a key, a value, and a priority. The key of any node is
/// greater than all keys in its left subtree and no greater than all keys in its right
/// subtree. The priority of a node is no greater than the priority of any node in its
/// subtrees. By randomly generating priorities, the expected height of the tree is
/// proportional to the logarithm of the number of keys, so range operations run in
/// expected `O(log N)` time without explicit rebalancing.
///
/// Every node carries a subtree aggregate that the supplied [`Aggregator`] keeps
/// consistent: `Aggregator::update` recomputes an aggregate bottom-up after structural
/// changes, and `Aggregator::push` resolves deferred per-range work one level down
/// before a node's children are inspected or rearranged.
///
/// The set of keys is fixed at construction. Range operations re-partition and re-merge
/// the existing nodes in place; they never insert or remove keys.
///
/// # Examples
///
/// ```
/// use range_treap::treap::{Aggregator, RangeTreap};
///
/// struct Sum;
///
/// impl Aggregator<i64> for Sum {
///     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
///         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
///     }
///
///     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
///         (data, None, None)
///     }
/// }
///
/// let mut treap = RangeTreap::from_sorted(vec![1, 2, 3, 4], vec![0, 1, 2, 3], Sum);
///
/// assert_eq!(treap.query(0, 2), Some(3));
/// assert_eq!(treap.query(0, 4), Some(10));
///
/// treap.change(1, 2, |data| data * 10);
/// assert_eq!(treap.query(0, 4), Some(28));
/// ```
pub struct RangeTreap<T, A> {
    tree: tree::Tree<T>,
    aggregator: A,
    len: usize,
}

impl<T, A> RangeTreap<T, A>
where
    T: Clone,
    A: Aggregator<T>,
{
    /// Constructs a `RangeTreap<T, A>` from values listed in key order, drawing node
    /// priorities from an unseeded xorshift generator.
    ///
    /// Keys need not be contiguous; they only need to be comparable and already sorted.
    /// Runs in amortized `O(N)`.
    ///
    /// # Panics
    ///
    /// Panics if `values` and `keys` differ in length, if `keys` is not sorted in
    /// non-decreasing order, or if the input is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use range_treap::treap::{Aggregator, RangeTreap};
    /// # struct Sum;
    /// # impl Aggregator<i64> for Sum {
    /// #     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
    /// #         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    /// #     }
    /// #     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
    /// #         (data, None, None)
    /// #     }
    /// # }
    /// let mut treap = RangeTreap::from_sorted(vec![1, 2, 3], vec![10, 20, 30], Sum);
    /// assert_eq!(treap.len(), 3);
    /// assert_eq!(treap.query(10, 31), Some(6));
    /// ```
    pub fn from_sorted(values: Vec<T>, keys: Vec<i64>, aggregator: A) -> Self {
        let mut rng = XorShiftRng::new_unseeded();
        Self::from_sorted_with_rng(values, keys, aggregator, &mut rng)
    }

    /// Constructs a `RangeTreap<T, A>` as [`from_sorted`](RangeTreap::from_sorted) does,
    /// drawing node priorities from the given generator.
    ///
    /// The quality of the generator determines the expected balance of the tree; a
    /// seeded generator gives a deterministic shape for testing.
    ///
    /// # Panics
    ///
    /// Panics if `values` and `keys` differ in length, if `keys` is not sorted in
    /// non-decreasing order, or if the input is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use range_treap::treap::{Aggregator, RangeTreap};
    /// # struct Sum;
    /// # impl Aggregator<i64> for Sum {
    /// #     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
    /// #         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    /// #     }
    /// #     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
    /// #         (data, None, None)
    /// #     }
    /// # }
    /// use rand::{SeedableRng, XorShiftRng};
    ///
    /// let mut rng = XorShiftRng::from_seed([1, 2, 3, 4]);
    /// let mut treap = RangeTreap::from_sorted_with_rng(vec![5, 6], vec![0, 1], Sum, &mut rng);
    /// assert_eq!(treap.query(0, 2), Some(11));
    /// ```
    pub fn from_sorted_with_rng<R>(values: Vec<T>, keys: Vec<i64>, aggregator: A, rng: &mut R) -> Self
    where
        R: Rng,
    {
        assert!(
            values.len() == keys.len(),
            "Error: values and keys must have the same length."
        );
        assert!(
            !values.is_empty(),
            "Error: cannot build from an empty collection."
        );
        assert!(
            keys.windows(2).all(|window| window[0] <= window[1]),
            "Error: keys must be sorted."
        );
        let len = values.len();
        let tree = tree::build(values, keys, &aggregator, rng);
        RangeTreap { tree, aggregator, len }
    }

    /// Returns the aggregate of all values with keys in `[start, end)`, or `None` if no
    /// key falls in the range.
    ///
    /// The range is split out as a standalone subtree, its root aggregate is read, and
    /// the pieces are merged back, so the sequence is unchanged apart from the
    /// resolution of pending lazy state along the way.
    ///
    /// # Examples
    ///
    /// ```
    /// # use range_treap::treap::{Aggregator, RangeTreap};
    /// # struct Sum;
    /// # impl Aggregator<i64> for Sum {
    /// #     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
    /// #         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    /// #     }
    /// #     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
    /// #         (data, None, None)
    /// #     }
    /// # }
    /// let mut treap = RangeTreap::from_sorted(vec![1, 2, 3, 4], vec![0, 1, 2, 3], Sum);
    /// assert_eq!(treap.query(0, 2), Some(3));
    /// assert_eq!(treap.query(2, 2), None);
    /// assert_eq!(treap.query(4, 8), None);
    /// ```
    pub fn query(&mut self, start: i64, end: i64) -> Option<T> {
        let RangeTreap {
            tree, aggregator, ..
        } = self;
        let mut mid = tree::split(tree, start, aggregator);
        let right = tree::split(&mut mid, end, aggregator);
        let ret = mid.as_ref().map(|node| node.data.clone());
        tree::merge(tree, mid, aggregator);
        tree::merge(tree, right, aggregator);
        ret
    }

    /// Transforms the aggregate of the range `[start, end)` as a single unit and returns
    /// the transformed aggregate, or `None` if no key falls in the range.
    ///
    /// The transform is applied to the extracted range's root aggregate and to that
    /// root's stored value; descendants are never visited, so this is not a per-element
    /// map. Callers needing per-element effects encode them in the aggregate so that
    /// [`Aggregator::push`] distributes them to the leaves on later traversals. For a
    /// single-element range the aggregate and the stored value coincide, giving plain
    /// point-update semantics.
    ///
    /// # Examples
    ///
    /// ```
    /// # use range_treap::treap::{Aggregator, RangeTreap};
    /// # struct Sum;
    /// # impl Aggregator<i64> for Sum {
    /// #     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
    /// #         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    /// #     }
    /// #     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
    /// #         (data, None, None)
    /// #     }
    /// # }
    /// let mut treap = RangeTreap::from_sorted(vec![1, 2, 3, 4], vec![0, 1, 2, 3], Sum);
    /// assert_eq!(treap.change(1, 2, |data| data * 10), Some(20));
    /// assert_eq!(treap.query(0, 4), Some(28));
    /// ```
    pub fn change<F>(&mut self, start: i64, end: i64, change_fn: F) -> Option<T>
    where
        F: Fn(T) -> T,
    {
        let RangeTreap {
            tree, aggregator, ..
        } = self;
        let mut mid = tree::split(tree, start, aggregator);
        let right = tree::split(&mut mid, end, aggregator);
        let ret = mid.as_mut().map(|node| {
            node.value = change_fn(node.value.clone());
            node.data = change_fn(node.data.clone());
            node.data.clone()
        });
        tree::merge(tree, mid, aggregator);
        tree::merge(tree, right, aggregator);
        ret
    }

    /// Transforms the value at a single key, equivalent to
    /// `change(key, key + 1, change_fn)`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use range_treap::treap::{Aggregator, RangeTreap};
    /// # struct Sum;
    /// # impl Aggregator<i64> for Sum {
    /// #     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
    /// #         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    /// #     }
    /// #     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
    /// #         (data, None, None)
    /// #     }
    /// # }
    /// let mut treap = RangeTreap::from_sorted(vec![1, 2, 3, 4], vec![0, 1, 2, 3], Sum);
    /// assert_eq!(treap.change_at(2, |value| value + 5), Some(8));
    /// assert_eq!(treap.query(0, 4), Some(15));
    /// assert_eq!(treap.change_at(9, |value| value + 5), None);
    /// ```
    pub fn change_at<F>(&mut self, key: i64, change_fn: F) -> Option<T>
    where
        F: Fn(T) -> T,
    {
        self.change(key, key + 1, change_fn)
    }

    /// Splits out the range `[start, end)`, hands the extracted subtree's root to
    /// `introspect` for read-only inspection (`None` if the range is empty), and merges
    /// the pieces back unconditionally.
    ///
    /// This is an escape hatch for callers that need structural detail beyond the range
    /// aggregate.
    ///
    /// # Examples
    ///
    /// ```
    /// # use range_treap::treap::{Aggregator, RangeTreap};
    /// # struct Sum;
    /// # impl Aggregator<i64> for Sum {
    /// #     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
    /// #         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    /// #     }
    /// #     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
    /// #         (data, None, None)
    /// #     }
    /// # }
    /// let mut treap = RangeTreap::from_sorted(vec![1, 2, 3, 4], vec![0, 1, 2, 3], Sum);
    /// treap.with_split(1, 3, |root| {
    ///     assert_eq!(root.map(|node| node.data), Some(5));
    /// });
    /// treap.with_split(4, 8, |root| {
    ///     assert!(root.is_none());
    /// });
    /// assert_eq!(treap.query(0, 4), Some(10));
    /// ```
    pub fn with_split<F>(&mut self, start: i64, end: i64, introspect: F)
    where
        F: FnOnce(Option<&Node<T>>),
    {
        let RangeTreap {
            tree, aggregator, ..
        } = self;
        let mut mid = tree::split(tree, start, aggregator);
        let right = tree::split(&mut mid, end, aggregator);
        introspect(mid.as_ref().map(|node| &**node));
        tree::merge(tree, mid, aggregator);
        tree::merge(tree, right, aggregator);
    }

    /// Returns the number of values in the treap, fixed at construction.
    ///
    /// # Examples
    ///
    /// ```
    /// # use range_treap::treap::{Aggregator, RangeTreap};
    /// # struct Sum;
    /// # impl Aggregator<i64> for Sum {
    /// #     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
    /// #         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    /// #     }
    /// #     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
    /// #         (data, None, None)
    /// #     }
    /// # }
    /// let treap = RangeTreap::from_sorted(vec![1, 2], vec![0, 1], Sum);
    /// assert_eq!(treap.len(), 2);
    /// assert!(!treap.is_empty());
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the treap holds no values. Construction requires a non-empty
    /// input, so this returns `false` for any constructed treap.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns an iterator over the `(key, value)` pairs in key order.
    ///
    /// Iteration reads the stored values as they are; it does not resolve pending lazy
    /// state.
    ///
    /// # Examples
    ///
    /// ```
    /// # use range_treap::treap::{Aggregator, RangeTreap};
    /// # struct Sum;
    /// # impl Aggregator<i64> for Sum {
    /// #     fn update(&self, value: &i64, left: Option<&i64>, right: Option<&i64>) -> i64 {
    /// #         *value + left.map_or(0, |data| *data) + right.map_or(0, |data| *data)
    /// #     }
    /// #     fn push(&self, data: i64) -> (i64, Option<i64>, Option<i64>) {
    /// #         (data, None, None)
    /// #     }
    /// # }
    /// let treap = RangeTreap::from_sorted(vec![5, 6], vec![10, 20], Sum);
    ///
    /// let mut iterator = treap.iter();
    /// assert_eq!(iterator.next(), Some((10, &5)));
    /// assert_eq!(iterator.next(), Some((20, &6)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            current: &self.tree,
            stack: Vec::new(),
        }
    }
}

impl<T, A> IntoIterator for RangeTreap<T, A> {
    type IntoIter = IntoIter<T>;
    type Item = (i64, T);

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            current: self.tree,
            stack: Vec::new(),
        }
    }
}

impl<'a, T, A> IntoIterator for &'a RangeTreap<T, A>
where
    T: 'a + Clone,
    A: Aggregator<T>,
{
    type IntoIter = Iter<'a, T>;
    type Item = (i64, &'a T);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RangeTreap<T, A>`.
///
/// This iterator traverses the nodes in key order and yields owned `(key, value)` pairs.
pub struct IntoIter<T> {
    current: tree::Tree<T>,
    stack: Vec<Node<T>>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = (i64, T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut node) = self.current.take() {
            self.current = node.left.take();
            self.stack.push(*node);
        }
        self.stack.pop().map(|node| {
            let Node {
                value, key, right, ..
            } = node;
            self.current = right;
            (key, value)
        })
    }
}

/// An iterator for `RangeTreap<T, A>`.
///
/// This iterator traverses the nodes in key order and yields `(key, &value)` pairs.
pub struct Iter<'a, T> {
    current: &'a tree::Tree<T>,
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T>
where
    T: 'a,
{
    type Item = (i64, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.current {
            self.current = &node.left;
            self.stack.push(node);
        }
        self.stack.pop().map(|node| {
            self.current = &node.right;
            (node.key, &node.value)
        })
    }
}
