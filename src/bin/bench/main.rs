// Path Finder Benchmark Runner - seeded random grid graphs
//
// Usage:
//   cargo run --release --bin bench                      # 30 runs, 40 nodes, density 0.08
//   cargo run --release --bin bench -- --runs 5          # Quick mode
//   cargo run --release --bin bench -- --nodes 100       # Fill the grid
//   cargo run --release --bin bench -- --density 0.02    # Sparse links
//   cargo run --release --bin bench -- --seed 42         # Custom base seed

mod topology;

use grid_netsim::pathfinder::{routing_table, shortest_path};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;
use topology::{random_graph, TopologySpec};

const QUERIES_PER_RUN: usize = 200;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    nodes: usize,
    density: f64,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        nodes: 40,
        density: 0.08,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--nodes" => {
                i += 1;
                if i < args.len() {
                    cli.nodes = args[i].parse().unwrap_or(40);
                }
            }
            "--density" => {
                i += 1;
                if i < args.len() {
                    cli.density = args[i].parse().unwrap_or(0.08);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Per-run statistics ─────────────────────────────────────────────────────

#[derive(Default)]
struct RunStats {
    queries: usize,
    reachable: usize,
    total_hops: usize,
    total_cost: f64,
    elapsed_us: f64,
    routing_entries: usize,
}

fn run_single(seed: u64, spec: &TopologySpec) -> RunStats {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (store, ids) = random_graph(&mut rng, spec);
    let mut stats = RunStats::default();
    if ids.len() < 2 {
        return stats;
    }

    let started = Instant::now();
    for _ in 0..QUERIES_PER_RUN {
        let (Some(from), Some(to)) = (ids.choose(&mut rng), ids.choose(&mut rng)) else {
            continue;
        };
        stats.queries += 1;
        if let Ok(path) = shortest_path(&store, from, to) {
            stats.reachable += 1;
            stats.total_hops += path.len() - 1;
            stats.total_cost += path.cost();
        }
    }
    stats.elapsed_us = started.elapsed().as_secs_f64() * 1e6;

    stats.routing_entries = routing_table(&store, &ids[0]).map(|t| t.len()).unwrap_or(0);
    stats
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    let cli = parse_args();
    let spec = TopologySpec {
        nodes: cli.nodes,
        density: cli.density,
        max_latency: 10.0,
    };

    println!("\n  Path Finder Benchmark");
    println!(
        "  PRNG: ChaCha8Rng | Runs: {} | Base seed: {} | Nodes: {} | Density: {}",
        cli.runs, cli.seed, cli.nodes, cli.density
    );
    println!("  {:>6} {:>9} {:>8} {:>9} {:>10} {:>8}",
        "Seed", "Reach%", "Hops", "Cost", "us/query", "Routes");
    println!("  {}", "-".repeat(56));

    let suite_start = Instant::now();
    let mut all = Vec::with_capacity(cli.runs);

    for i in 0..cli.runs {
        let seed = cli.seed + i as u64;
        let stats = run_single(seed, &spec);
        let reach_pct = ratio(stats.reachable, stats.queries) * 100.0;
        println!("  {:>6} {:>8.1}% {:>8.2} {:>9.2} {:>10.2} {:>8}",
            seed,
            reach_pct,
            ratio_f(stats.total_hops as f64, stats.reachable),
            ratio_f(stats.total_cost, stats.reachable),
            ratio_f(stats.elapsed_us, stats.queries),
            stats.routing_entries,
        );
        all.push(stats);
    }

    // ─── Summary ────────────────────────────────────────────────────────

    let queries: usize = all.iter().map(|s| s.queries).sum();
    let reachable: usize = all.iter().map(|s| s.reachable).sum();
    let hops: usize = all.iter().map(|s| s.total_hops).sum();
    let elapsed: f64 = all.iter().map(|s| s.elapsed_us).sum();

    println!("  {}", "-".repeat(56));
    println!("  Queries: {} | Reachable: {:.1}% | Mean hops: {:.2} | Mean time: {:.2}us",
        queries,
        ratio(reachable, queries) * 100.0,
        ratio_f(hops as f64, reachable),
        ratio_f(elapsed, queries),
    );
    println!("  Wall time: {:.1}ms\n", suite_start.elapsed().as_secs_f64() * 1e3);
}

fn ratio(num: usize, den: usize) -> f64 {
    ratio_f(num as f64, den)
}

fn ratio_f(num: f64, den: usize) -> f64 {
    if den > 0 { num / den as f64 } else { 0.0 }
}
