/// A trait describing how subtree aggregates are computed and how pending lazy values
/// are resolved.
///
/// An implementation is fixed for the lifetime of the treap that owns it. The treap only
/// guarantees that the two methods are invoked at the documented points with the
/// documented arguments; their semantic correctness is the implementer's responsibility.
pub trait Aggregator<T> {
    /// Recomputes a node's subtree aggregate from the node's own value and the current
    /// aggregates of its children, either of which may be absent.
    ///
    /// Invoked bottom-up after any structural change that touches a node or its
    /// children.
    fn update(&self, value: &T, left: Option<&T>, right: Option<&T>) -> T;

    /// Resolves a node's pending lazy state. Takes the node's current aggregate and
    /// returns the aggregate to store in its place, plus optional overrides that replace
    /// the left and right children's aggregates.
    ///
    /// Invoked on a node before its children are read or rearranged, so deferred work
    /// staged at the node is resolved one level down first. Implementations with no
    /// lazy state return `(data, None, None)`.
    fn push(&self, data: T) -> (T, Option<T>, Option<T>);
}
