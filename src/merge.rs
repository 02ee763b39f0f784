//! Merge strategies: the associative operation a [`PrefixAggregateTree`] folds with.
//!
//! [`PrefixAggregateTree`]: crate::PrefixAggregateTree

use num::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, BitXor};

/// An associative binary operation together with its identity value.
///
/// Implementors must guarantee that
/// - `merge(merge(a, b), c) == merge(a, merge(b, c))` for every reachable `a`, `b`, `c`;
/// - `merge(zero(), x) == x` for every reachable `x`.
///
/// Commutativity is not required. The tree cannot check any of this: a
/// non-associative `merge` silently yields meaningless aggregates.
///
/// # Examples
///
/// ```
/// use prefixtree::{MergeStrategy, PrefixAggregateTree};
///
/// struct Max;
///
/// impl MergeStrategy for Max {
///     type Value = u32;
///
///     fn zero(&self) -> u32 {
///         0
///     }
///
///     fn merge(&self, a: u32, b: u32) -> u32 {
///         a.max(b)
///     }
/// }
///
/// let mut tree = PrefixAggregateTree::new(8, Max).unwrap();
/// tree.update(3, 7).unwrap();
/// tree.update(5, 2).unwrap();
/// assert_eq!(tree.query(2).unwrap(), 0);
/// assert_eq!(tree.query(6).unwrap(), 7);
/// ```
pub trait MergeStrategy {
    /// The type of the aggregated values.
    type Value;

    /// Returns the identity element of [`merge`](MergeStrategy::merge).
    fn zero(&self) -> Self::Value;

    /// Combines two values. Must be pure and associative.
    fn merge(&self, a: Self::Value, b: Self::Value) -> Self::Value;
}

/// A borrowed strategy works wherever an owned one does.
///
/// The tree holding the reference cannot outlive the strategy it borrows.
impl<S> MergeStrategy for &S
where
    S: MergeStrategy + ?Sized,
{
    type Value = S::Value;

    #[inline(always)]
    fn zero(&self) -> Self::Value {
        (**self).zero()
    }

    #[inline(always)]
    fn merge(&self, a: Self::Value, b: Self::Value) -> Self::Value {
        (**self).merge(a, b)
    }
}

/// Addition, with `T::zero()` as identity.
///
/// # Examples
///
/// ```
/// use prefixtree::{MergeStrategy, Sum};
///
/// let sum = Sum::<i64>::new();
/// assert_eq!(sum.merge(40, 2), 42);
/// assert_eq!(sum.zero(), 0);
/// ```
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Sum<T> {
    _marker: PhantomData<T>,
}

/// Bitwise exclusive or, with `T::zero()` as identity.
///
/// # Examples
///
/// ```
/// use prefixtree::{MergeStrategy, Xor};
///
/// let xor = Xor::<u8>::new();
/// assert_eq!(xor.merge(0b1100, 0b1010), 0b0110);
/// ```
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Xor<T> {
    _marker: PhantomData<T>,
}

// Manual impls: deriving would require `T: Clone`, `T: Debug`, ... on a marker.
macro_rules! impl_stateless_strategy {
    ($name:ident) => {
        impl<T> $name<T> {
            /// Creates the strategy.
            #[must_use]
            pub const fn new() -> Self {
                Self {
                    _marker: PhantomData,
                }
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> PartialEq for $name<T> {
            fn eq(&self, _other: &Self) -> bool {
                true
            }
        }

        impl<T> Eq for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}<{}>", stringify!($name), std::any::type_name::<T>())
            }
        }
    };
}

impl_stateless_strategy!(Sum);
impl_stateless_strategy!(Xor);

impl<T> MergeStrategy for Sum<T>
where
    T: Zero + Add<Output = T>,
{
    type Value = T;

    #[inline(always)]
    fn zero(&self) -> T {
        T::zero()
    }

    #[inline(always)]
    fn merge(&self, a: T, b: T) -> T {
        a + b
    }
}

impl<T> MergeStrategy for Xor<T>
where
    T: Zero + BitXor<Output = T>,
{
    type Value = T;

    #[inline(always)]
    fn zero(&self) -> T {
        T::zero()
    }

    #[inline(always)]
    fn merge(&self, a: T, b: T) -> T {
        a ^ b
    }
}

/// A strategy assembled at runtime from an identity value and a closure.
///
/// Handy for one-off operations, including non-commutative ones.
///
/// # Examples
///
/// ```
/// use prefixtree::{FnMerge, MergeStrategy};
///
/// let concat = FnMerge::new(String::new(), |a: String, b: String| a + &b);
/// assert_eq!(concat.merge("ab".to_owned(), "cd".to_owned()), "abcd");
/// ```
#[derive(Clone, Copy)]
pub struct FnMerge<T, F> {
    zero: T,
    f: F,
}

impl<T, F> FnMerge<T, F>
where
    T: Clone,
    F: Fn(T, T) -> T,
{
    /// Creates a strategy with identity `zero` and combinator `f`.
    pub fn new(zero: T, f: F) -> Self {
        Self { zero, f }
    }
}

impl<T, F> MergeStrategy for FnMerge<T, F>
where
    T: Clone,
    F: Fn(T, T) -> T,
{
    type Value = T;

    #[inline(always)]
    fn zero(&self) -> T {
        self.zero.clone()
    }

    #[inline(always)]
    fn merge(&self, a: T, b: T) -> T {
        (self.f)(a, b)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for FnMerge<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMerge")
            .field("zero", &self.zero)
            .finish_non_exhaustive()
    }
}
