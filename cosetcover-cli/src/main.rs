use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use cosetcover_core::{
    Coset, CoverError, IndexSearch, Lattice, PrimitiveVectors, Progression, SearchConfig,
    SequenceExplorer, full_cover, is_cover, is_full, is_minimal, is_strongly_minimal, weight,
};
use num_bigint::BigInt;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};
use std::str::FromStr;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::IndexSequences {
            n,
            up_to,
            psi_max,
            weak,
        } => run_index_sequences(n, up_to, psi_max, weak),
        Command::FullCover { rank, index } => run_full_cover(rank, index),
        Command::Check { rank, cosets } => run_check(rank, &cosets),
        Command::Sequences { n, allow_repeats } => run_sequences(n, allow_repeats),
        Command::PrimitiveVectors { count, skip } => run_primitive_vectors(count, skip),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "cosetcover",
    about = "Coverings of Z and Z^2 by cosets: covering tests, minimality and index searches"
)]
struct Cli {
    /// Log debug events (overridden by RUST_LOG)
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index lists that could belong to a strongly minimal covering of Z^2
    IndexSequences {
        /// Number of cosets in the covering
        #[arg(long)]
        n: usize,

        /// Also search every size from n up to this one (inclusive)
        #[arg(long)]
        up_to: Option<usize>,

        /// Exclusive bound on the psi values considered
        #[arg(long, default_value_t = 100)]
        psi_max: u64,

        /// Only apply the conditions valid for all minimal coverings
        #[arg(long, action = ArgAction::SetTrue)]
        weak: bool,
    },

    /// The covering by all cosets of one index
    FullCover {
        /// 1 for residue classes of Z, 2 for sublattices of Z^2
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        rank: u8,

        /// Index of every coset in the covering
        #[arg(long)]
        index: u64,
    },

    /// Test a list of cosets, written <a;N> (rank 1) or L(c:d;N) (rank 2)
    Check {
        /// 1 for residue classes of Z, 2 for sublattices of Z^2
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        rank: u8,

        /// The cosets of the candidate covering
        #[arg(required = true)]
        cosets: Vec<String>,
    },

    /// Nested index sequences generated by prime refinement
    Sequences {
        /// Number of refinement units
        #[arg(long)]
        n: u64,

        /// Refine every entry, not only the first of equal ones
        #[arg(long, action = ArgAction::SetTrue)]
        allow_repeats: bool,
    },

    /// List primitive vectors of Z^2 up to sign, by height
    PrimitiveVectors {
        /// How many vectors to print
        #[arg(long, default_value_t = 10)]
        count: usize,

        /// How many vectors to skip first
        #[arg(long, default_value_t = 0)]
        skip: usize,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn run_index_sequences(n: usize, up_to: Option<usize>, psi_max: u64, weak: bool) -> Result<()> {
    let last = up_to.unwrap_or(n);
    if last < n {
        anyhow::bail!("--up-to ({}) must be at least --n ({})", last, n);
    }
    let search = IndexSearch::new(SearchConfig {
        psi_max,
        strong: !weak,
    });
    debug!(config = ?search.config(), "index search configured");
    for size in n..=last {
        let sequences = search.all_index_sequences(size);
        println!("n = {}: {} index list(s)", size, sequences.len());
        for seq in &sequences {
            let text: Vec<String> = seq.iter().map(u64::to_string).collect();
            println!("  [{}]", text.join(", "));
        }
    }
    Ok(())
}

fn run_full_cover(rank: u8, index: u64) -> Result<()> {
    let n = BigInt::from(index);
    match rank {
        1 => print_cover(&full_cover::<Progression>(&n)),
        _ => print_cover(&full_cover::<Lattice>(&n)),
    }
    Ok(())
}

fn print_cover<C: Coset>(cover: &[C]) {
    println!("Covering (size={})", cover.len());
    for (i, coset) in cover.iter().enumerate() {
        println!("  {}) {}", i + 1, coset);
    }
    println!("weight = {}", weight(cover));
    println!("cover  = {}", is_cover(cover));
}

fn run_check(rank: u8, texts: &[String]) -> Result<()> {
    match rank {
        1 => report(&parse_cosets::<Progression>(texts)?),
        _ => report(&parse_cosets::<Lattice>(texts)?),
    }
    Ok(())
}

fn parse_cosets<C>(texts: &[String]) -> Result<Vec<C>>
where
    C: Coset + FromStr<Err = CoverError>,
{
    texts
        .iter()
        .map(|text| {
            text.parse::<C>()
                .with_context(|| format!("could not read coset {:?}", text))
        })
        .collect()
}

fn report<C: Coset>(cover: &[C]) {
    print_cover(cover);
    if !is_cover(cover) {
        return;
    }
    println!("full   = {}", is_full(cover, false));
    println!("minimal = {}", is_minimal(cover, false));
    println!("strongly minimal = {}", is_strongly_minimal(cover, false));
}

fn run_sequences(n: u64, allow_repeats: bool) -> Result<()> {
    let mut explorer = SequenceExplorer::new(!allow_repeats);
    let sequences = explorer.all_sequences(n);
    println!("Sequences (n={}) count={}", n, sequences.len());
    for (i, seq) in sequences.iter().enumerate() {
        let text: Vec<String> = seq.iter().map(ToString::to_string).collect();
        println!("  {}) [{}]", i + 1, text.join(", "));
    }
    Ok(())
}

fn run_primitive_vectors(count: usize, skip: usize) -> Result<()> {
    for (i, (a, b)) in PrimitiveVectors::new().skip(skip).take(count).enumerate() {
        println!("  {}) ({}, {})", skip + i + 1, a, b);
    }
    Ok(())
}
