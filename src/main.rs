use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use level_ancestor::{LevelAncestor, LevelAncestorConfig, NodeId, TreeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "level-ancestor",
    about = "Constant-time level ancestor queries on static trees"
)]
struct Cli {
    /// Log preprocessing phases (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the built-in 13-node sample tree and run two queries.
    Demo,
    /// Answer queries against a tree read from an edge list.
    Query {
        /// Edge list: one `parent child` pair per line, `#` starts a comment.
        edges: PathBuf,
        /// Root node id.
        #[arg(long, default_value_t = 0)]
        root: NodeId,
        /// Number of nodes (default: largest id in the file + 1).
        #[arg(long)]
        nodes: Option<usize>,
        /// Override the micro block threshold.
        #[arg(long)]
        block_size: Option<usize>,
        /// Queries as `NODE:DEPTH`.
        #[arg(required = true)]
        queries: Vec<String>,
    },
    /// Check random queries on a random tree against a naive parent walk.
    Verify {
        /// Number of nodes.
        #[arg(long, default_value_t = 1000)]
        nodes: usize,
        /// Number of random queries.
        #[arg(long, default_value_t = 100_000)]
        queries: usize,
        /// RNG seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Override the micro block threshold.
        #[arg(long)]
        block_size: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Demo => run_demo()?,
        Commands::Query {
            edges,
            root,
            nodes,
            block_size,
            queries,
        } => run_query(edges, root, nodes, block_size, &queries)?,
        Commands::Verify {
            nodes,
            queries,
            seed,
            block_size,
        } => run_verify(nodes, queries, seed, block_size)?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_demo() -> Result<()> {
    let edges = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 6),
        (3, 7),
        (7, 8),
        (2, 9),
        (9, 10),
        (10, 11),
        (1, 12),
    ];

    let mut builder = LevelAncestor::new(13);
    for (parent, child) in edges {
        builder.add_edge(parent, child)?;
    }
    let la = builder.preprocess(0)?;

    for (node, depth) in [(8, 4), (6, 1)] {
        println!("{}", format_answer(la.query(node, depth)));
    }

    Ok(())
}

fn run_query(
    edges_path: PathBuf,
    root: NodeId,
    nodes: Option<usize>,
    block_size: Option<usize>,
    queries: &[String],
) -> Result<()> {
    let edges = read_edge_file(&edges_path)?;
    let nodes_count = match nodes {
        Some(n) => n,
        None => edges
            .iter()
            .map(|&(parent, child)| parent.max(child) + 1)
            .max()
            .unwrap_or(1)
            .max(root + 1),
    };

    let la = build(nodes_count, &edges, root, block_size)
        .with_context(|| format!("failed to preprocess tree from {}", edges_path.display()))?;

    for raw in queries {
        let (node, depth) = parse_query(raw)?;
        let answer = la
            .try_query(node, depth)
            .with_context(|| format!("query {} rejected", raw))?;
        println!("{}\t{}", raw, format_answer(answer));
    }

    Ok(())
}

fn run_verify(
    nodes_count: usize,
    queries: usize,
    seed: u64,
    block_size: Option<usize>,
) -> Result<()> {
    if nodes_count == 0 {
        bail!("--nodes must be at least 1");
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let edges: Vec<(NodeId, NodeId)> = (1..nodes_count)
        .map(|child| (rng.gen_range(0..child), child))
        .collect();

    let la = build(nodes_count, &edges, 0, block_size).context("failed to preprocess random tree")?;
    info!(nodes = nodes_count, queries, seed, "verifying");

    let tree = la.tree();
    let mut mismatches = 0usize;
    for _ in 0..queries {
        let node = rng.gen_range(0..nodes_count);
        let target = rng.gen_range(0..=tree.depth(node));
        let expected = tree.naive_ancestor(node, target);
        let actual = la.query(node, target);
        if actual != expected {
            mismatches += 1;
            eprintln!(
                "mismatch: node {} depth {}: expected {}, got {}",
                node,
                target,
                format_answer(expected),
                format_answer(actual)
            );
        }
    }

    println!("{}", la.storage_profile().report());
    if mismatches > 0 {
        bail!("{} of {} queries disagreed with the naive walk", mismatches, queries);
    }
    println!("{} queries verified", queries);

    Ok(())
}

fn build(
    nodes_count: usize,
    edges: &[(NodeId, NodeId)],
    root: NodeId,
    block_size: Option<usize>,
) -> Result<LevelAncestor> {
    let mut config = LevelAncestorConfig::default();
    if let Some(block_size) = block_size {
        config = config.with_block_size(block_size)?;
    }

    let mut builder = TreeBuilder::with_config(nodes_count, config);
    for &(parent, child) in edges {
        builder
            .add_edge(parent, child)
            .with_context(|| format!("invalid edge {} -> {}", parent, child))?;
    }
    Ok(builder.preprocess(root)?)
}

fn read_edge_file(path: &PathBuf) -> Result<Vec<(NodeId, NodeId)>> {
    let file =
        File::open(path).with_context(|| format!("failed to open edge file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut edges = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let mut fields = content.split_whitespace();
        let parent = parse_id(fields.next(), "parent", line_no)?;
        let child = parse_id(fields.next(), "child", line_no)?;
        if fields.next().is_some() {
            bail!("unexpected extra field on line {}", line_no + 1);
        }
        edges.push((parent, child));
    }

    Ok(edges)
}

fn parse_id(field: Option<&str>, what: &str, line_no: usize) -> Result<NodeId> {
    let field = field.ok_or_else(|| anyhow::anyhow!("missing {} on line {}", what, line_no + 1))?;
    field
        .parse()
        .with_context(|| format!("invalid {} '{}' on line {}", what, field, line_no + 1))
}

fn parse_query(raw: &str) -> Result<(NodeId, usize)> {
    let (node, depth) = raw
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("query '{}' is not NODE:DEPTH", raw))?;
    let node = node
        .trim()
        .parse()
        .with_context(|| format!("invalid node in query '{}'", raw))?;
    let depth = depth
        .trim()
        .parse()
        .with_context(|| format!("invalid depth in query '{}'", raw))?;
    Ok((node, depth))
}

fn format_answer(answer: Option<NodeId>) -> String {
    match answer {
        Some(node) => node.to_string(),
        None => "none".to_string(),
    }
}
