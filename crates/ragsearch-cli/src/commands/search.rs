//! Search command

use crate::app::{OutputFormat, SearchArgs};
use crate::output::format_results;
use anyhow::{Context, Result};
use ragsearch_core::{Config, Pipeline, TuningConfig};

pub async fn run(args: SearchArgs, mut config: Config, format: OutputFormat) -> Result<()> {
    let query = args.query.join(" ");

    // Reject empty submissions before touching any external service
    if query.trim().is_empty() {
        anyhow::bail!("Please enter a question before searching.");
    }

    config.tuning = TuningConfig {
        bm25_boost: args.bm25_boost,
        knn_boost: args.knn_boost,
        rrf_rank_constant: args.rrf_rank_constant,
        rrf_window_size: args.rrf_window_size,
    };

    let pipeline = Pipeline::from_config(config)?;

    pipeline
        .ping()
        .await
        .context("Error connecting to the search engine. Fix connection and restart.")?;

    let results = pipeline.search(&query, args.strategy.into()).await?;

    if results.is_empty() {
        println!("No search results found.");
        return Ok(());
    }

    print!("{}", format_results(&results, format));
    Ok(())
}
