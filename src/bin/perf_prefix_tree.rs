use prefixtree::gen_sequences::gen_queries;
use prefixtree::utils::{type_of, TimingQueries};
use prefixtree::{Error, MergeStrategy, PrefixAggregateTree, Sum, Xor};

use std::fmt::Display;

const N_RUNS: usize = 5;
const DEFAULT_N_QUERIES: usize = 10_000_000;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Size of the tree; positions are 1..n.
    #[arg(short, long, allow_hyphen_values = true)]
    n: isize,
    #[arg(default_value_t = DEFAULT_N_QUERIES)]
    n_queries: usize,
    #[arg(short, long)]
    update: bool,
    #[arg(short, long)]
    query: bool,
    #[arg(short, long)]
    iter: bool,
}

fn test_update<S>(ds: &mut PrefixAggregateTree<S>, queries: &[usize], v: S::Value) -> Result<(), Error>
where
    S: MergeStrategy,
    S::Value: Clone,
{
    let n = ds.size();

    let mut t = TimingQueries::new(N_RUNS, queries.len());
    for _ in 0..N_RUNS {
        t.start();
        for &i in queries.iter() {
            ds.update(i, v.clone())?;
        }
        t.stop();
    }

    let (t_min, t_max, t_avg) = t.get();
    println!("UPDATE: [ds_name: {}, n: {}, min_time (ns): {}, max_time (ns): {}, avg_time (ns): {}, num_queries: {}, num_runs: {}]", type_of(&ds), n, t_min, t_max, t_avg, queries.len(), N_RUNS);

    Ok(())
}

fn test_query<S>(ds: &PrefixAggregateTree<S>, queries: &[usize]) -> Result<(), Error>
where
    S: MergeStrategy,
    S::Value: Clone + Display,
{
    let mut r = ds.strategy().zero();
    let mut t = TimingQueries::new(N_RUNS, queries.len());
    let n = ds.size();

    for _ in 0..N_RUNS {
        t.start();
        for &i in queries.iter() {
            r = ds.strategy().merge(r, ds.query(i)?);
        }
        t.stop();
    }

    let (t_min, t_max, t_avg) = t.get();
    println!("QUERY: [ds_name: {}, n: {}, min_time (ns): {}, max_time (ns): {}, avg_time (ns): {}, num_queries: {}, num_runs: {}]", type_of(&ds), n, t_min, t_max, t_avg, queries.len(), N_RUNS);

    println!("IGNORE: {r}");

    Ok(())
}

fn test_prefix_aggregates<S>(ds: &PrefixAggregateTree<S>)
where
    S: MergeStrategy,
    S::Value: Clone + Display,
{
    let n = ds.len();
    let mut t = TimingQueries::new(N_RUNS, n);
    let mut r = ds.strategy().zero();

    for _ in 0..N_RUNS {
        t.start();
        for val in ds.prefix_aggregates() {
            r = ds.strategy().merge(r, val);
        }
        t.stop();
    }

    let (t_min, t_max, t_avg) = t.get();

    println!("PREFIX_AGGREGATES: [ds_name: {}, n: {}, min_time (ns): {}, max_time (ns): {}, avg_time (ns): {}, num_queries: {}, num_runs: {}]", type_of(&ds), n, t_min, t_max, t_avg, n, N_RUNS);

    println!("IGNORE: {r}");
}

fn run<S>(mut ft: PrefixAggregateTree<S>, args: &Args, v: S::Value) -> Result<(), Error>
where
    S: MergeStrategy,
    S::Value: Clone + Display,
{
    if ft.is_empty() {
        println!("nothing to measure, no addressable positions");
        return Ok(());
    }

    // Positions are 1..size.
    let update_queries: Vec<usize> = gen_queries(args.n_queries, ft.len()).into_iter().map(|i| i + 1).collect();
    let query_queries = gen_queries(args.n_queries, ft.size());

    // Populate with some values for more realistic queries
    for i in (1..ft.size()).step_by(ft.size() / 100 + 1) {
        ft.update(i, v.clone())?;
    }

    if args.update {
        test_update(&mut ft, &update_queries, v)?;
    }
    if args.query {
        test_query(&ft, &query_queries)?;
    }
    if args.iter {
        test_prefix_aggregates(&ft);
    }

    Ok(())
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    println!("n = {}, n_queries = {}", args.n, args.n_queries);

    println!("\n=== PrefixAggregateTree with Sum ===");
    run(PrefixAggregateTree::with_signed_len(args.n, Sum::<i64>::new())?, &args, 1)?;

    println!("\n=== PrefixAggregateTree with Xor ===");
    run(PrefixAggregateTree::with_signed_len(args.n, Xor::<u64>::new())?, &args, 0x2a)?;

    Ok(())
}
