use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::merge::MergeStrategy;

/// A Fenwick Tree (also known as Binary Indexed Tree or BIT) over an arbitrary
/// associative merge operation.
///
/// # Overview
///
/// The tree addresses positions `1..size` and supports two operations:
/// - **Point update**: merge a value into a position in Θ(log n) time
/// - **Prefix query**: merge-fold of all values at positions `1..=i` in Θ(log n) time
///
/// The operation is supplied by a [`MergeStrategy`], so the same structure computes
/// prefix sums ([`Sum`](crate::Sum)), prefix xors ([`Xor`](crate::Xor)), or any other
/// associative aggregate ([`FnMerge`](crate::FnMerge)). No inverse is required: there is
/// no range query by subtraction and no point "set".
///
/// # Generic Parameters
///
/// - `S`: the merge strategy. It can be owned or borrowed (`&S`); a borrowed strategy
///   must outlive the tree, which the borrow checker enforces.
///
/// # Complexity
///
/// - **Construction**: Θ(n) with [`new`](Self::new) or [`from_values`](Self::from_values)
/// - **Point update** (`update`): Θ(log n)
/// - **Prefix query** (`query`): Θ(log n)
/// - **Iteration** (`prefix_aggregates`): Θ(n) total
///
/// # Examples
///
/// ```
/// use prefixtree::{PrefixAggregateTree, Sum};
///
/// let mut tree = PrefixAggregateTree::new(10, Sum::<i32>::new()).unwrap();
/// for i in 1..10 {
///     tree.update(i, 1).unwrap();
/// }
///
/// assert_eq!(tree.query(0).unwrap(), 0); // empty prefix
/// assert_eq!(tree.query(4).unwrap(), 4);
/// assert_eq!(tree.query(9).unwrap(), 9);
/// assert!(tree.query(10).is_err()); // positions are 1..size
/// ```
///
/// # Implementation Notes
///
/// Slots are 1-indexed and slot 0 is never read or written. Slot `i` holds the merge of
/// the positions in `(i - lsb(i), i]`, where `lsb(i)` is the lowest set bit of `i`.
/// `update` walks `i += lsb(i)` and `query` walks `i -= lsb(i)`, folding as
/// `result = merge(result, slot[i])`. For non-commutative operations this exact grouping
/// is part of the contract and is reproduced by every method of the tree.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, S::Value: Serialize",
    deserialize = "S: Deserialize<'de>, S::Value: Deserialize<'de>"
))]
pub struct PrefixAggregateTree<S>
where
    S: MergeStrategy,
{
    nodes: Box<[S::Value]>,
    zero: S::Value,
    strategy: S,
}

impl<S> PrefixAggregateTree<S>
where
    S: MergeStrategy,
    S::Value: Clone,
{
    /// Creates a tree addressing positions `1..size`, every slot set to `strategy.zero()`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `size + 1` slots cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefixtree::{PrefixAggregateTree, Xor};
    ///
    /// let tree = PrefixAggregateTree::new(100, Xor::<u64>::new()).unwrap();
    /// assert_eq!(tree.size(), 100);
    /// assert_eq!(tree.len(), 99);
    /// assert_eq!(tree.query(99).unwrap(), 0);
    /// ```
    pub fn new(size: usize, strategy: S) -> Result<Self> {
        let slots = size.checked_add(1).ok_or_else(|| invalid_size(size))?;

        let zero = strategy.zero();
        let mut nodes = Vec::new();
        nodes
            .try_reserve_exact(slots)
            .map_err(|_| invalid_size(size))?;
        nodes.resize(slots, zero.clone());

        trace!(size, slots, "created prefix aggregate tree");

        Ok(Self {
            nodes: nodes.into_boxed_slice(),
            zero,
            strategy,
        })
    }

    /// Like [`new`](Self::new), for callers holding a signed size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `size` is negative or too large.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefixtree::{Error, PrefixAggregateTree, Sum};
    ///
    /// let err = PrefixAggregateTree::with_signed_len(-1, Sum::<i32>::new()).unwrap_err();
    /// assert!(matches!(err, Error::InvalidArgument { .. }));
    /// ```
    pub fn with_signed_len(size: isize, strategy: S) -> Result<Self> {
        let size = usize::try_from(size).map_err(|_| invalid_size(size))?;
        Self::new(size, strategy)
    }

    /// Builds a tree in Θ(n) from the values of positions `1..=values.len()`.
    ///
    /// `values[k]` is merged into position `k + 1`, so the resulting size is
    /// `values.len() + 1`. The tree is the same one obtained by calling `update(k + 1,
    /// values[k])` for every `k` in ascending order on an empty tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the tree cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefixtree::{PrefixAggregateTree, Sum};
    ///
    /// let tree = PrefixAggregateTree::from_values(vec![1, 2, 3, 4, 5], Sum::<i32>::new()).unwrap();
    /// assert_eq!(tree.size(), 6);
    /// assert_eq!(tree.query(3).unwrap(), 6);
    /// assert_eq!(tree.query(5).unwrap(), 15);
    /// ```
    pub fn from_values(values: Vec<S::Value>, strategy: S) -> Result<Self> {
        let size = values
            .len()
            .checked_add(1)
            .ok_or_else(|| invalid_size(values.len()))?;
        let mut tree = Self::new(size, strategy)?;

        for (k, value) in values.into_iter().enumerate() {
            let i = k + 1;
            // Children of `i` were merged in already, its own value goes last.
            let node = mem::replace(&mut tree.nodes[i], tree.zero.clone());
            tree.nodes[i] = tree.strategy.merge(node, value);

            let parent = Self::next(i);
            if parent < size {
                let child = tree.nodes[i].clone();
                let acc = mem::replace(&mut tree.nodes[parent], tree.zero.clone());
                tree.nodes[parent] = tree.strategy.merge(acc, child);
            }
        }

        Ok(tree)
    }

    /// Merges `value` into position `index`.
    ///
    /// Every `query(j)` with `j >= index` now includes `value`; queries below `index`
    /// are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index` is not in `[1, size)`. The tree is
    /// not modified in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefixtree::{PrefixAggregateTree, Sum};
    ///
    /// let mut tree = PrefixAggregateTree::new(8, Sum::<i64>::new()).unwrap();
    /// tree.update(3, 10).unwrap();
    /// assert_eq!(tree.query(2).unwrap(), 0);
    /// assert_eq!(tree.query(3).unwrap(), 10);
    /// assert_eq!(tree.query(7).unwrap(), 10);
    ///
    /// assert!(tree.update(0, 1).is_err());
    /// assert!(tree.update(8, 1).is_err());
    /// ```
    pub fn update(&mut self, index: usize, value: S::Value) -> Result<()> {
        let size = self.size();
        if index == 0 || index >= size {
            return Err(out_of_range(index, 1, size));
        }

        let mut i = index;
        while i < size {
            let node = &mut self.nodes[i];
            *node = self.strategy.merge(node.clone(), value.clone());
            i = Self::next(i);
        }

        Ok(())
    }

    /// Returns the merge-fold of positions `1..=index`.
    ///
    /// `query(0)` is the empty prefix and returns the strategy's zero, for any size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `index >= size` (and `index != 0`).
    ///
    /// # Examples
    ///
    /// ```
    /// use prefixtree::{PrefixAggregateTree, Xor};
    ///
    /// let mut tree = PrefixAggregateTree::new(10, Xor::<u32>::new()).unwrap();
    /// for i in 1..10 {
    ///     tree.update(i, 1).unwrap();
    /// }
    /// tree.update(5, 8).unwrap();
    ///
    /// assert_eq!(tree.query(4).unwrap(), 0);
    /// assert_eq!(tree.query(5).unwrap(), 9);
    /// assert_eq!(tree.query(6).unwrap(), 8);
    /// ```
    #[must_use = "a query has no side effects"]
    pub fn query(&self, index: usize) -> Result<S::Value> {
        let upper = self.size().max(1);
        if index >= upper {
            return Err(out_of_range(index, 0, upper));
        }

        let mut result = self.zero.clone();
        let mut i = index;
        while i > 0 {
            result = self.strategy.merge(result, self.nodes[i].clone());
            i = Self::prev(i);
        }

        Ok(result)
    }

    /// Returns an iterator over `query(1), query(2), ..., query(size - 1)`.
    ///
    /// Each yielded value is identical to the corresponding `query`, grouping included,
    /// but the whole iteration takes Θ(n) merges instead of Θ(n log n).
    ///
    /// # Examples
    ///
    /// ```
    /// use prefixtree::{PrefixAggregateTree, Sum};
    ///
    /// let tree = PrefixAggregateTree::from_values(vec![1, 2, 3, 4, 5], Sum::<i32>::new()).unwrap();
    /// let prefixes: Vec<i32> = tree.prefix_aggregates().collect();
    /// assert_eq!(prefixes, vec![1, 3, 6, 10, 15]);
    /// ```
    #[inline]
    pub fn prefix_aggregates(&self) -> PrefixAggregates<'_, S> {
        PrefixAggregates {
            tree: self,
            pos: 1,
            stack: Vec::new(),
        }
    }
}

impl<S> PrefixAggregateTree<S>
where
    S: MergeStrategy,
{
    /// Returns the size the tree was created with. Addressable positions are `1..size`.
    pub fn size(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Returns the number of addressable positions, i.e., `size - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use prefixtree::{PrefixAggregateTree, Sum};
    ///
    /// assert_eq!(PrefixAggregateTree::new(10, Sum::<i32>::new()).unwrap().len(), 9);
    /// assert_eq!(PrefixAggregateTree::new(0, Sum::<i32>::new()).unwrap().len(), 0);
    /// ```
    pub fn len(&self) -> usize {
        self.size().saturating_sub(1)
    }

    /// Returns `true` if no position can be updated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the merge strategy of the tree.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Returns the lowest set bit of `i`, `i & -i` in two's complement.
    #[inline(always)]
    const fn lowest_set_bit(i: usize) -> usize {
        i & i.wrapping_neg()
    }

    /// Returns the next slot on the update path of `i`.
    ///
    /// Saturates instead of wrapping; `usize::MAX` is never a valid slot.
    #[inline(always)]
    const fn next(i: usize) -> usize {
        i.saturating_add(Self::lowest_set_bit(i))
    }

    /// Returns the next slot on the query path of `i`, clearing its lowest set bit.
    #[inline(always)]
    const fn prev(i: usize) -> usize {
        i - Self::lowest_set_bit(i)
    }
}

fn invalid_size<N: fmt::Display>(size: N) -> Error {
    debug!(%size, "rejected tree size");
    Error::InvalidArgument {
        size: size.to_string(),
    }
}

fn out_of_range(index: usize, lower: usize, upper: usize) -> Error {
    debug!(index, lower, upper, "rejected out of range index");
    Error::OutOfRange {
        index,
        lower,
        upper,
    }
}

impl<S> Clone for PrefixAggregateTree<S>
where
    S: MergeStrategy + Clone,
    S::Value: Clone,
{
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            zero: self.zero.clone(),
            strategy: self.strategy.clone(),
        }
    }
}

impl<S> PartialEq for PrefixAggregateTree<S>
where
    S: MergeStrategy,
    S::Value: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.zero == other.zero && self.nodes == other.nodes
    }
}

impl<S> fmt::Debug for PrefixAggregateTree<S>
where
    S: MergeStrategy + fmt::Debug,
    S::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixAggregateTree")
            .field("size", &self.size())
            .field("strategy", &self.strategy)
            .field("nodes", &self.nodes)
            .finish()
    }
}

/// Iterator over the prefix aggregates of a [`PrefixAggregateTree`].
///
/// Visiting positions in ascending order, the stack always holds the query path of the
/// previous position. The query path of the current position is that path cut at
/// `prev(pos)`, plus `pos` itself, so each slot is pushed and popped at most once.
///
/// Every stack entry stores the merge of the slots on the path from its position down,
/// in query order, without the leading zero. The yielded value is `merge(zero, entry)`.
pub struct PrefixAggregates<'a, S>
where
    S: MergeStrategy,
{
    tree: &'a PrefixAggregateTree<S>,
    pos: usize,
    /// (position, merge of its query path)
    stack: Vec<(usize, S::Value)>,
}

impl<'a, S> Iterator for PrefixAggregates<'a, S>
where
    S: MergeStrategy,
    S::Value: Clone,
{
    type Item = S::Value;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.tree.size() {
            return None;
        }

        let pos = self.pos;
        self.pos += 1;

        let parent = PrefixAggregateTree::<S>::prev(pos);
        while let Some(&(top, _)) = self.stack.last() {
            if top == parent {
                break;
            }
            self.stack.pop();
        }

        let strategy = &self.tree.strategy;
        let node = self.tree.nodes[pos].clone();
        let path = match self.stack.last() {
            Some((_, below)) => strategy.merge(node, below.clone()),
            None => node,
        };
        let aggregate = strategy.merge(self.tree.zero.clone(), path.clone());
        self.stack.push((pos, path));

        Some(aggregate)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tree.size().saturating_sub(self.pos);
        (remaining, Some(remaining))
    }
}

impl<'a, S> ExactSizeIterator for PrefixAggregates<'a, S>
where
    S: MergeStrategy,
    S::Value: Clone,
{
}

impl<'a, S> FusedIterator for PrefixAggregates<'a, S>
where
    S: MergeStrategy,
    S::Value: Clone,
{
}

#[cfg(test)]
mod tests {
    use super::{Error, MergeStrategy, PrefixAggregateTree};
    use crate::gen_sequences::{gen_queries, gen_values};
    use crate::merge::{FnMerge, Sum, Xor};
    use proptest::prelude::*;

    type Concat = FnMerge<String, fn(String, String) -> String>;

    fn join(a: String, b: String) -> String {
        a + &b
    }

    fn concat() -> Concat {
        FnMerge::new(String::new(), join as fn(String, String) -> String)
    }

    #[test]
    fn test_sum_counts_positions() {
        let mut tree = PrefixAggregateTree::new(10, Sum::<i32>::new()).unwrap();
        for i in 1..10 {
            tree.update(i, 1).unwrap();
        }
        for i in 1..10 {
            assert_eq!(tree.query(i).unwrap(), i as i32);
        }
    }

    #[test]
    fn test_xor_scenario() {
        let mut tree = PrefixAggregateTree::new(10, Xor::<i32>::new()).unwrap();
        for i in 1..10 {
            tree.update(i, 1).unwrap();
        }

        for (i, expected) in [(1, 1), (2, 0), (3, 1), (4, 0), (8, 0), (9, 1)] {
            assert_eq!(tree.query(i).unwrap(), expected, "query({i})");
        }

        tree.update(5, 8).unwrap();

        let expected = [1, 0, 1, 0, 9, 8, 9, 8, 9];
        for (i, &e) in expected.iter().enumerate() {
            assert_eq!(tree.query(i + 1).unwrap(), e, "query({})", i + 1);
        }
    }

    #[test]
    fn test_uppermost_position_is_size_minus_one() {
        for size in [2, 3, 8, 9, 16, 17, 100] {
            let mut tree = PrefixAggregateTree::new(size, Sum::<u64>::new()).unwrap();
            for i in 1..size {
                tree.update(i, 1).unwrap();
            }
            assert_eq!(tree.query(size - 1).unwrap(), (size - 1) as u64);
            assert!(tree.query(size).is_err());
            assert!(tree.update(size, 1).is_err());
        }
    }

    #[test]
    fn test_query_zero_is_identity() {
        for size in [0, 1, 2, 10] {
            let mut tree = PrefixAggregateTree::new(size, Sum::<i32>::new()).unwrap();
            if size > 1 {
                tree.update(1, 5).unwrap();
            }
            assert_eq!(tree.query(0).unwrap(), 0);
        }
    }

    #[test]
    fn test_out_of_range_leaves_state_unchanged() {
        let mut tree = PrefixAggregateTree::from_values(vec![3, 1, 4, 1, 5], Sum::<i32>::new()).unwrap();
        let before = tree.clone();

        assert_eq!(
            tree.update(0, 7),
            Err(Error::OutOfRange {
                index: 0,
                lower: 1,
                upper: 6
            })
        );
        assert_eq!(
            tree.update(6, 7),
            Err(Error::OutOfRange {
                index: 6,
                lower: 1,
                upper: 6
            })
        );
        assert_eq!(
            tree.query(6),
            Err(Error::OutOfRange {
                index: 6,
                lower: 0,
                upper: 6
            })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn test_empty_trees() {
        for size in [0, 1] {
            let mut tree = PrefixAggregateTree::new(size, Xor::<u8>::new()).unwrap();
            assert!(tree.is_empty());
            assert_eq!(tree.len(), 0);
            assert!(tree.update(1, 1).is_err());
            assert!(tree.query(1).is_err());
            assert_eq!(tree.prefix_aggregates().count(), 0);
        }
    }

    #[test]
    fn test_invalid_sizes() {
        let err = PrefixAggregateTree::with_signed_len(-5, Sum::<i32>::new()).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidArgument {
                size: "-5".to_owned()
            }
        );

        let err = PrefixAggregateTree::new(usize::MAX, Sum::<i32>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        // Cannot be reserved on any real machine.
        let err = PrefixAggregateTree::new(usize::MAX / 2, Sum::<u64>::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let tree = PrefixAggregateTree::with_signed_len(4, Sum::<i32>::new()).unwrap();
        assert_eq!(tree.size(), 4);
    }

    #[test]
    fn test_slot_zero_untouched() {
        let mut tree = PrefixAggregateTree::new(32, Sum::<i32>::new()).unwrap();
        for i in 1..32 {
            tree.update(i, i as i32).unwrap();
        }
        assert_eq!(tree.nodes[0], 0);
        // The extra trailing slot is never on an update path either.
        assert_eq!(tree.nodes[32], 0);
    }

    #[test]
    fn test_non_commutative_grouping() {
        let mut tree = PrefixAggregateTree::new(8, concat()).unwrap();
        for (i, c) in (1..8).zip('a'..='g') {
            tree.update(i, c.to_string()).unwrap();
        }

        // query(i) folds slot[i], slot[prev(i)], ... from left to right.
        assert_eq!(tree.query(1).unwrap(), "a");
        assert_eq!(tree.query(2).unwrap(), "ab");
        assert_eq!(tree.query(3).unwrap(), "cab");
        assert_eq!(tree.query(4).unwrap(), "abcd");
        assert_eq!(tree.query(5).unwrap(), "eabcd");
        assert_eq!(tree.query(6).unwrap(), "efabcd");
        assert_eq!(tree.query(7).unwrap(), "gefabcd");

        let all: Vec<String> = tree.prefix_aggregates().collect();
        assert_eq!(all, ["a", "ab", "cab", "abcd", "eabcd", "efabcd", "gefabcd"]);
    }

    #[test]
    fn test_repeated_updates_fold_in_arrival_order() {
        let mut tree = PrefixAggregateTree::new(4, concat()).unwrap();
        tree.update(1, "x".into()).unwrap();
        tree.update(1, "y".into()).unwrap();
        tree.update(2, "z".into()).unwrap();
        assert_eq!(tree.query(1).unwrap(), "xy");
        assert_eq!(tree.query(2).unwrap(), "xyz");
        assert_eq!(tree.query(3).unwrap(), "xyz");
    }

    #[test]
    fn test_from_values_matches_updates() {
        let values: Vec<String> = (0..37).map(|i| format!("<{i}>")).collect();
        let built = PrefixAggregateTree::from_values(values.clone(), concat()).unwrap();

        let mut updated = PrefixAggregateTree::new(values.len() + 1, concat()).unwrap();
        for (k, v) in values.into_iter().enumerate() {
            updated.update(k + 1, v).unwrap();
        }

        assert_eq!(built.nodes, updated.nodes);
    }

    #[test]
    fn test_from_values_empty() {
        let tree = PrefixAggregateTree::from_values(Vec::new(), Sum::<i32>::new()).unwrap();
        assert_eq!(tree.size(), 1);
        assert!(tree.is_empty());
        assert_eq!(tree.query(0).unwrap(), 0);
    }

    #[test]
    fn test_random_updates_against_model() {
        let size = 1000;
        let positions = gen_queries(5000, size - 1);
        let values = gen_values(5000, 100);

        let mut tree = PrefixAggregateTree::new(size, Sum::<u64>::new()).unwrap();
        let mut model = vec![0u64; size];
        for (&p, &v) in positions.iter().zip(values.iter()) {
            tree.update(p + 1, v).unwrap();
            model[p + 1] += v;
        }

        let mut acc = 0;
        for (i, &m) in model.iter().enumerate() {
            acc += m;
            assert_eq!(tree.query(i).unwrap(), acc);
        }
    }

    #[test]
    fn test_prefix_aggregates_exact_size() {
        let tree = PrefixAggregateTree::from_values((1..=50).collect(), Sum::<i32>::new()).unwrap();

        let mut iter = tree.prefix_aggregates();
        assert_eq!(iter.len(), 50);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.len(), 49);

        let rest: Vec<i32> = iter.by_ref().collect();
        assert_eq!(rest.len(), 49);
        assert_eq!(rest.last(), Some(&1275));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_borrowed_strategy() {
        let xor = Xor::<u16>::new();
        let mut a = PrefixAggregateTree::new(16, &xor).unwrap();
        let mut b = PrefixAggregateTree::new(16, &xor).unwrap();
        a.update(3, 0b101).unwrap();
        b.update(3, 0b011).unwrap();
        assert_eq!(a.query(15).unwrap() ^ b.query(15).unwrap(), 0b110);
    }

    #[test]
    fn test_serde() {
        let mut tree = PrefixAggregateTree::new(12, Sum::<i64>::new()).unwrap();
        tree.update(5, -3).unwrap();
        tree.update(11, 9).unwrap();

        let json = serde_json::to_string(&tree).unwrap();
        let back: PrefixAggregateTree<Sum<i64>> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, tree);
        assert_eq!(back.size(), 12);
        assert_eq!(back.query(11).unwrap(), 6);
    }

    /// Folds the query path of `index` directly from the slots.
    fn path_fold<S>(tree: &PrefixAggregateTree<S>, mut index: usize) -> S::Value
    where
        S: MergeStrategy,
        S::Value: Clone,
    {
        let mut path = Vec::new();
        while index > 0 {
            path.push(tree.nodes[index].clone());
            index &= index - 1;
        }
        path.into_iter()
            .fold(tree.zero.clone(), |acc, v| tree.strategy.merge(acc, v))
    }

    proptest! {
        #[test]
        fn sum_is_additive(
            size in 1usize..200,
            ops in prop::collection::vec((any::<usize>(), -1000i64..1000), 0..100),
        ) {
            let mut tree = PrefixAggregateTree::new(size, Sum::<i64>::new()).unwrap();
            let mut model = vec![0i64; size];
            if size > 1 {
                for (raw, v) in ops {
                    let i = 1 + raw % (size - 1);
                    tree.update(i, v).unwrap();
                    model[i] += v;
                }
            }

            let mut acc = 0;
            for (i, &m) in model.iter().enumerate() {
                acc += m;
                prop_assert_eq!(tree.query(i).unwrap(), acc);
                prop_assert_eq!(tree.query(i).unwrap(), acc);
            }
        }

        #[test]
        fn update_is_local(
            values in prop::collection::vec(any::<u32>(), 1..100),
            raw in any::<usize>(),
            v in any::<u32>(),
        ) {
            let mut tree = PrefixAggregateTree::from_values(values, Xor::<u32>::new()).unwrap();
            let i = 1 + raw % tree.len();
            let before: Vec<u32> = tree.prefix_aggregates().collect();

            tree.update(i, v).unwrap();

            for j in 0..i {
                let expected = if j == 0 { 0 } else { before[j - 1] };
                prop_assert_eq!(tree.query(j).unwrap(), expected);
            }
            for j in i..tree.size() {
                prop_assert_eq!(tree.query(j).unwrap(), before[j - 1] ^ v);
            }
        }

        #[test]
        fn from_values_equals_ascending_updates(
            values in prop::collection::vec("[a-z]{0,3}", 0..64),
        ) {
            let built = PrefixAggregateTree::from_values(values.clone(), concat()).unwrap();
            let mut updated = PrefixAggregateTree::new(values.len() + 1, concat()).unwrap();
            for (k, v) in values.into_iter().enumerate() {
                updated.update(k + 1, v).unwrap();
            }
            prop_assert_eq!(built, updated);
        }

        #[test]
        fn queries_follow_the_path_grouping(
            ops in prop::collection::vec((1usize..40, "[a-z]{1,2}"), 0..80),
        ) {
            let mut tree = PrefixAggregateTree::new(40, concat()).unwrap();
            for (i, s) in ops {
                tree.update(i, s).unwrap();
            }

            let iterated: Vec<String> = tree.prefix_aggregates().collect();
            for i in 1..40 {
                let queried = tree.query(i).unwrap();
                prop_assert_eq!(&queried, &path_fold(&tree, i));
                prop_assert_eq!(&queried, &iterated[i - 1]);
            }
        }
    }
}
