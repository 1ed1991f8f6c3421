//! Probabilistic binary search tree over explicit keys where each node also maintains the
//! heap invariant, with subtree aggregates and lazy value propagation supplied by the
//! caller.

mod aggregator;
mod node;
mod range;
mod tree;

pub use self::aggregator::Aggregator;
pub use self::node::Node;
pub use self::range::{IntoIter, Iter, RangeTreap};
