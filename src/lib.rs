//! An ordered-sequence data structure with randomized balancing, range queries, range
//! mutation, and caller-supplied aggregation.

pub mod treap;
