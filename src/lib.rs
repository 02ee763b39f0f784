//! A Fenwick tree (Binary Indexed Tree) generic over the merge operation.
//!
//! [`PrefixAggregateTree`] supports point updates and prefix queries in Θ(log n) for any
//! associative operation described by a [`MergeStrategy`]: prefix sums with [`Sum`],
//! prefix xors with [`Xor`], or anything else through [`FnMerge`] or a custom impl.
//!
//! ```
//! use prefixtree::{PrefixAggregateTree, Sum};
//!
//! let mut tree = PrefixAggregateTree::new(10, Sum::<u32>::new()).unwrap();
//! tree.update(2, 5).unwrap();
//! tree.update(7, 1).unwrap();
//! assert_eq!(tree.query(6).unwrap(), 5);
//! assert_eq!(tree.query(9).unwrap(), 6);
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod merge;
pub use merge::{FnMerge, MergeStrategy, Sum, Xor};

pub mod prefix_tree;
pub use prefix_tree::{PrefixAggregateTree, PrefixAggregates};

pub mod gen_sequences;

pub mod utils;
