//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use ragsearch_core::Strategy;

#[derive(Parser)]
#[command(name = "ragsearch")]
#[command(
    author,
    version,
    about = "Search a document corpus with keyword, vector, sparse and fused strategies, with AI-grounded answers"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the corpus and generate one grounded answer per result
    Search(SearchArgs),

    /// Interactive chat grounded in retrieved content
    Chat(ChatArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: Vec<String>,

    /// Retrieval strategy
    #[arg(short, long, value_enum, default_value = "keyword")]
    pub strategy: StrategyArg,

    /// Keyword score boost for the hybrid strategy (0.0 - 5.0)
    #[arg(long, default_value = "0.0", value_parser = parse_boost)]
    pub bm25_boost: f64,

    /// Vector score boost for the hybrid strategy (0.0 - 5.0)
    #[arg(long, default_value = "0.0", value_parser = parse_boost)]
    pub knn_boost: f64,

    /// Rank constant for reciprocal rank fusion
    #[arg(long, default_value = "1")]
    pub rrf_rank_constant: u32,

    /// Window size for reciprocal rank fusion
    #[arg(long, default_value = "200")]
    pub rrf_window_size: u32,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Retrieval strategy used to ground the first turn
    #[arg(short, long, value_enum, default_value = "sparse")]
    pub strategy: StrategyArg,

    /// Rank constant for reciprocal rank fusion
    #[arg(long, default_value = "1")]
    pub rrf_rank_constant: u32,

    /// Window size for reciprocal rank fusion
    #[arg(long, default_value = "200")]
    pub rrf_window_size: u32,
}

/// Display labels mapped onto the core strategy enum
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Keyword,
    Vector,
    Sparse,
    Fused,
    Hybrid,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Keyword => Strategy::Keyword,
            StrategyArg::Vector => Strategy::Vector,
            StrategyArg::Sparse => Strategy::SparseExpansion,
            StrategyArg::Fused => Strategy::FusedRank,
            StrategyArg::Hybrid => Strategy::HybridWeighted,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}

fn parse_boost(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("invalid boost: {}", s))?;
    if !(0.0..=5.0).contains(&value) {
        return Err(format!("boost must be between 0.0 and 5.0, got {}", value));
    }
    Ok(value)
}
