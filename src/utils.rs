use std::time::Instant;

/// Collects wall-clock timings of repeated batches of queries.
pub struct TimingQueries {
    timings: Vec<u128>,
    time: Instant,
    n_queries: usize,
}

impl TimingQueries {
    pub fn new(n_runs: usize, n_queries: usize) -> Self {
        Self {
            timings: Vec::with_capacity(n_runs),
            time: Instant::now(),
            n_queries: n_queries.max(1),
        }
    }

    #[inline(always)]
    pub fn start(&mut self) {
        self.time = Instant::now();
    }

    #[inline(always)]
    pub fn stop(&mut self) {
        self.timings.push(self.time.elapsed().as_nanos());
    }

    /// Returns minimum, maximum, average query time per query in nanosecs.
    ///
    /// All zeros if nothing was timed yet.
    pub fn get(&self) -> (u128, u128, u128) {
        let n = self.n_queries as u128;
        let min = self.timings.iter().min().copied().unwrap_or(0) / n;
        let max = self.timings.iter().max().copied().unwrap_or(0) / n;
        let avg = self.timings.iter().sum::<u128>() / (self.timings.len().max(1) as u128 * n);
        (min, max, avg)
    }
}

/// Returns the type name of its argument.
pub fn type_of<T>(_: &T) -> &'static str {
    std::any::type_name::<T>()
}
