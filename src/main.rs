use clap::{Parser, Subcommand};
use hostpart::io::{self, ListingFormat};
use hostpart::partitioning::{PartitionerConfig, Strategy};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Partition an edge-group listing node by node.
    Batch {
        /// Edge-group listing (`node numEdges dst [weight] ...`)
        edge_groups: PathBuf,
        /// Number of hosts
        num_hosts: usize,
        /// Output node → host map
        node_part: PathBuf,
        /// Base path of the per-host edge-group files
        edge_part: PathBuf,
        /// Scoring strategy: affinity, balance or random
        #[arg(default_value_t = Strategy::Affinity)]
        strategy: Strategy,
        /// Seed for tie-breaking and random scores
        #[arg(default_value_t = 42)]
        seed: u64,
    },
    /// Partition a raw edge listing in a single streaming pass.
    Stream {
        /// Raw edge listing (`src dst [weight]`)
        edge_list: PathBuf,
        /// Number of hosts
        num_hosts: usize,
        /// Output `src dst host` listing
        edge_part: PathBuf,
        /// Output node → host map
        node_part: PathBuf,
    },
    /// Count cut edges of a node map over a listing.
    Cuts {
        /// Number of nodes in the graph
        num_nodes: usize,
        /// Node → host map
        node_part: PathBuf,
        /// Listing to evaluate
        listing: PathBuf,
        /// Listing format: groups or edges
        #[arg(default_value_t = ListingFormat::Groups)]
        format: ListingFormat,
    },
    /// Count endpoints stored away from their edge's host.
    Borrowed {
        /// Number of nodes in the graph
        num_nodes: usize,
        /// Number of hosts
        num_hosts: usize,
        /// Node → host map
        node_part: PathBuf,
        /// Streaming `src dst host` listing
        edge_part: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let start = Instant::now();
    match args.command {
        Command::Batch {
            edge_groups,
            num_hosts,
            node_part,
            edge_part,
            strategy,
            seed,
        } => {
            let cfg = PartitionerConfig {
                num_hosts,
                strategy,
                rng_seed: seed,
                ..Default::default()
            };
            let report = io::run_batch(&cfg, &edge_groups, &node_part, &edge_part)?;
            println!(
                "num nodes: {}, num_edges: {}",
                report.outcome.assignment.assigned_count(),
                report.edges
            );
            println!("Host sizes {:?}", report.outcome.host_sizes);
            println!("Cut ratio: {:.6}", report.cuts.ratio());
        }
        Command::Stream {
            edge_list,
            num_hosts,
            edge_part,
            node_part,
        } => {
            let cfg = PartitionerConfig::with_hosts(num_hosts);
            let report = io::run_stream(&cfg, &edge_list, &edge_part, &node_part)?;
            println!(
                "num nodes: {}, num_edges: {}",
                report.counts.nodes, report.counts.edges
            );
            for (host, state) in report.outcome.hosts.iter().enumerate() {
                println!("host {}: {} nodes, {} edges", host, state.nodes, state.edges);
            }
        }
        Command::Cuts {
            num_nodes,
            node_part,
            listing,
            format,
        } => {
            let report = io::evaluate_cuts(num_nodes, &node_part, &listing, format)?;
            println!("Cuts: {}", report.cut_edges);
            println!("Evaluated edges: {}", report.evaluated_edges);
            println!("Cut ratio: {:.6}", report.ratio());
        }
        Command::Borrowed {
            num_nodes,
            num_hosts,
            node_part,
            edge_part,
        } => {
            let borrowed = io::count_borrowed(num_nodes, num_hosts, &node_part, &edge_part)?;
            println!("Borrowed nodes: {}", borrowed);
        }
    }
    info!("done in {:?}", start.elapsed());
    Ok(())
}
