use thiserror::Error;

/// Errors returned by [`PrefixAggregateTree`](crate::PrefixAggregateTree).
///
/// Both variants are contract violations by the caller. The tree is left
/// untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested size cannot back a tree.
    #[error("invalid tree size: {size}")]
    InvalidArgument { size: String },
    /// `index` lies outside the half-open range `[lower, upper)`.
    #[error("index {index} out of range [{lower}, {upper})")]
    OutOfRange {
        index: usize,
        lower: usize,
        upper: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
