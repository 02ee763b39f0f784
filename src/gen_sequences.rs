use rand::Rng;

/// Generates a random vector of `n` values in [0, `range_size`).
/// This can be used to generate random positions to update or query.
///
/// ## Examples
/// ```
/// use prefixtree::gen_sequences;
///
/// let queries = gen_sequences::gen_queries(5, 10);
/// assert_eq!(queries.len(), 5);
/// assert!(queries.iter().all(|&q| q < 10));
/// ```
pub fn gen_queries(n: usize, range_size: usize) -> Vec<usize> {
    let mut rng = rand::rng();
    (0..n).map(|_x| rng.random_range(0..range_size)).collect()
}

/// Generates a random vector of `n` values in [0, `max`].
///
/// ## Examples
/// ```
/// use prefixtree::gen_sequences::gen_values;
///
/// let values = gen_values(100, 7);
/// assert!(values.iter().all(|&v| v <= 7));
/// ```
pub fn gen_values(n: usize, max: u64) -> Vec<u64> {
    let mut rng = rand::rng();
    (0..n).map(|_x| rng.random_range(0..=max)).collect()
}
