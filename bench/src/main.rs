use std::time::Instant;

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use dijkstra::{Graph, Weight};
use fenwick::Fenwick;
use hull::cht::ConvexHullTrick;
use lca::LcaSolver;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use rmq::{MaskRmq, Rmq, SparseTable};
use segtree::LazySegmentTree;
use tracing_subscriber::filter::LevelFilter;
use trie::Trie;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Structure {
    Segtree,
    Sparse,
    Mask,
    Lca,
    Fenwick,
    Dijkstra,
    Cht,
    Trie,
    All,
}

const ALL: [Structure; 8] = [
    Structure::Segtree,
    Structure::Sparse,
    Structure::Mask,
    Structure::Lca,
    Structure::Fenwick,
    Structure::Dijkstra,
    Structure::Cht,
    Structure::Trie,
];

/// Run random operations against one structure and report timings.
#[derive(clap::Parser)]
struct Args {
    #[clap(value_enum)]
    structure: Structure,
    /// Number of elements (or tree or graph nodes).
    #[clap(short, long, default_value_t = 1 << 20)]
    len: usize,
    /// Number of random operations (or graph edges).
    #[clap(short, long, default_value_t = 1 << 20)]
    ops: usize,
    /// Seed for the random input. Random when omitted.
    #[clap(short, long)]
    seed: Option<u64>,
    /// Check every answer against a naive implementation. Linear per operation.
    #[clap(short, long)]
    verify: bool,
    /// Worker threads for `all`.
    #[clap(short, long)]
    threads: Option<usize>,
    /// Also show debug logs from the libraries.
    #[clap(long)]
    debug: bool,
}

/// A random inclusive interval in [0, n).
fn interval(rng: &mut impl Rng, n: usize) -> (usize, usize) {
    let i = rng.gen_range(0..n);
    let j = rng.gen_range(0..n);
    (i.min(j), i.max(j))
}

fn run_segtree(args: &Args, rng: &mut StdRng) -> Result<()> {
    let mut a: Vec<i64> = (0..args.len).map(|_| rng.gen_range(-1000..1000)).collect();
    let start = Instant::now();
    let mut tree = LazySegmentTree::new(&a)?;
    info!("segtree: built in {:?}", start.elapsed());

    let start = Instant::now();
    for _ in 0..args.ops {
        let (i, j) = interval(rng, args.len);
        match rng.gen_range(0..3) {
            0 => {
                let d = rng.gen_range(-10..10);
                tree.range_update(i, j, d)?;
                if args.verify {
                    a[i..=j].iter_mut().for_each(|x| *x += d);
                }
            }
            1 => {
                let v = rng.gen_range(-1000..1000);
                tree.update(i, v)?;
                if args.verify {
                    a[i] = v;
                }
            }
            _ => {
                let sum = tree.lazy_query(i, j)?;
                if args.verify {
                    let real: i64 = a[i..=j].iter().sum();
                    ensure!(sum == real, "segtree: sum of [{i}, {j}] is {sum}, expected {real}");
                }
            }
        }
    }
    info!("segtree: {} ops in {:?}", args.ops, start.elapsed());
    Ok(())
}

fn run_rmq<R: Rmq<u32>>(name: &str, args: &Args, rng: &mut StdRng) -> Result<()> {
    let a: Vec<u32> = (0..args.len).map(|_| rng.gen()).collect();
    let start = Instant::now();
    let rmq = R::new(&a)?;
    info!("{name}: built in {:?}", start.elapsed());

    let start = Instant::now();
    let mut checksum = 0;
    for _ in 0..args.ops {
        let (i, j) = interval(rng, args.len);
        let k = rmq.range_min_index(i, j)?;
        checksum ^= k;
        if args.verify {
            let real = (i..=j).fold(i, |best, m| if a[m] < a[best] { m } else { best });
            ensure!(k == real, "{name}: argmin of [{i}, {j}] is {k}, expected {real}");
        }
    }
    info!("{name}: {} queries in {:?} (checksum {checksum})", args.ops, start.elapsed());
    Ok(())
}

fn run_lca(args: &Args, rng: &mut StdRng) -> Result<()> {
    let n = args.len;
    let mut parent = vec![0; n];
    let mut depth = vec![0; n];
    for i in 1..n {
        parent[i] = rng.gen_range(0..i);
        depth[i] = depth[parent[i]] + 1;
    }

    let start = Instant::now();
    let mut solver = LcaSolver::<usize>::from_edges((1..n).map(|i| (parent[i], i)));
    solver.initialize(0)?;
    info!("lca: built in {:?}", start.elapsed());

    let start = Instant::now();
    for _ in 0..args.ops {
        let (mut a, mut b) = (rng.gen_range(0..n), rng.gen_range(0..n));
        let ans = solver.query(a, b)?;
        if args.verify {
            let (qa, qb) = (a, b);
            while depth[a] > depth[b] {
                a = parent[a];
            }
            while depth[b] > depth[a] {
                b = parent[b];
            }
            while a != b {
                a = parent[a];
                b = parent[b];
            }
            ensure!(ans == a, "lca: lca({qa}, {qb}) is {ans}, expected {a}");
        }
    }
    info!("lca: {} queries in {:?}", args.ops, start.elapsed());
    Ok(())
}

fn run_fenwick(args: &Args, rng: &mut StdRng) -> Result<()> {
    let mut a: Vec<i64> = (0..args.len).map(|_| rng.gen_range(-1000..1000)).collect();
    let start = Instant::now();
    let mut tree = Fenwick::from_slice(&a);
    info!("fenwick: built in {:?}", start.elapsed());

    let start = Instant::now();
    for _ in 0..args.ops {
        let (i, j) = interval(rng, args.len);
        if rng.gen_bool(0.5) {
            let d = rng.gen_range(-10..10);
            tree.add(i, d)?;
            if args.verify {
                a[i] += d;
            }
        } else {
            let sum = tree.range_sum(i, j)?;
            if args.verify {
                let real: i64 = a[i..=j].iter().sum();
                ensure!(sum == real, "fenwick: sum of [{i}, {j}] is {sum}, expected {real}");
            }
        }
    }
    info!("fenwick: {} ops in {:?}", args.ops, start.elapsed());
    Ok(())
}

fn run_dijkstra(args: &Args, rng: &mut StdRng) -> Result<()> {
    let n = args.len;
    let edges: Vec<(usize, usize, Weight)> = (0..args.ops)
        .map(|_| (rng.gen_range(0..n), rng.gen_range(0..n), rng.gen_range(0..1000)))
        .collect();
    let mut graph = Graph::new();
    for i in 0..n {
        graph.add_node(i);
    }
    for &(u, v, w) in &edges {
        graph.add_edge(u, v, w);
    }

    let start = Instant::now();
    let paths = graph.shortest_paths(0)?;
    info!(
        "dijkstra: {} of {n} nodes reached in {:?}",
        paths.reachable(),
        start.elapsed()
    );

    if args.verify {
        // Bellman-Ford.
        let mut real: Vec<Option<Weight>> = vec![None; n];
        real[0] = Some(0);
        let mut changed = true;
        while changed {
            changed = false;
            for &(u, v, w) in &edges {
                if let Some(d) = real[u] {
                    if real[v].map_or(true, |x| d + w < x) {
                        real[v] = Some(d + w);
                        changed = true;
                    }
                }
            }
        }
        for (v, &d) in real.iter().enumerate() {
            let got = paths.distance(v);
            ensure!(got == d, "dijkstra: distance to {v} is {got:?}, expected {d:?}");
        }
    }
    Ok(())
}

fn run_cht(args: &Args, rng: &mut StdRng) -> Result<()> {
    let mut cht = ConvexHullTrick::new();
    let mut lines = vec![];
    let (mut m, mut x) = (0i64, -(1i64 << 20));

    let start = Instant::now();
    let mut checksum = 0;
    for _ in 0..args.ops {
        if cht.is_empty() || rng.gen_bool(0.5) {
            m -= rng.gen_range(0..3);
            let b = rng.gen_range(-1_000_000..1_000_000);
            cht.add_line(m, b)?;
            if args.verify {
                lines.push((m, b));
            }
        } else {
            x += rng.gen_range(0..100);
            let y = cht.query(x)?;
            checksum ^= y;
            if args.verify {
                let real = lines.iter().map(|&(m, b)| m as i128 * x as i128 + b as i128).min();
                ensure!(Some(y) == real, "cht: min at {x} is {y}, expected {real:?}");
            }
        }
    }
    info!(
        "cht: {} ops in {:?}, {} lines kept (checksum {checksum})",
        args.ops,
        start.elapsed(),
        cht.len()
    );
    Ok(())
}

fn run_trie(args: &Args, rng: &mut StdRng) -> Result<()> {
    const MAX_LEN: usize = 8;
    let word = |rng: &mut StdRng| -> String {
        let len = rng.gen_range(1..=MAX_LEN);
        (0..len).map(|_| rng.gen_range('A'..='D')).collect()
    };
    let mut trie = Trie::with_capacity(args.ops * MAX_LEN + 1);
    let mut words = vec![];

    let start = Instant::now();
    for _ in 0..args.ops {
        let w = word(rng);
        trie.insert(&w)?;
        if args.verify {
            words.push(w);
        }
    }
    info!(
        "trie: {} words in {:?}, {} nodes",
        args.ops,
        start.elapsed(),
        trie.nodes()
    );

    let start = Instant::now();
    for _ in 0..args.ops {
        let mut prefix = word(rng);
        prefix.truncate(rng.gen_range(1..=3));
        let count = trie.count_prefixes(&prefix)?;
        if args.verify {
            let real = words.iter().filter(|w| w.starts_with(&prefix)).count() as u64;
            ensure!(count == real, "trie: {count} words start with {prefix}, expected {real}");
        }
    }
    info!("trie: {} queries in {:?}", args.ops, start.elapsed());
    Ok(())
}

fn run(structure: Structure, args: &Args, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    match structure {
        Structure::Segtree => run_segtree(args, &mut rng),
        Structure::Sparse => run_rmq::<SparseTable<u32>>("sparse", args, &mut rng),
        Structure::Mask => run_rmq::<MaskRmq<u32>>("mask", args, &mut rng),
        Structure::Lca => run_lca(args, &mut rng),
        Structure::Fenwick => run_fenwick(args, &mut rng),
        Structure::Dijkstra => run_dijkstra(args, &mut rng),
        Structure::Cht => run_cht(args, &mut rng),
        Structure::Trie => run_trie(args, &mut rng),
        // One instance per worker; nothing is shared between them.
        Structure::All => ALL
            .par_iter()
            .enumerate()
            .try_for_each(|(i, &s)| run(s, args, seed.wrapping_add(i as u64))),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        })
        .init();

    ensure!(args.len > 0, "--len must be positive");
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "{:?}: len={} ops={} seed={seed} verify={}",
        args.structure, args.len, args.ops, args.verify
    );

    let start = Instant::now();
    run(args.structure, &args, seed)?;
    info!("Total time: {:?}", start.elapsed());
    Ok(())
}
