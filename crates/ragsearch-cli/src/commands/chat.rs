//! Interactive chat command

use crate::app::ChatArgs;
use anyhow::{Context, Result};
use ragsearch_core::{
    chat_turn, grounding_bodies, ChatSession, Config, OpenAiClient, Pipeline, TuningConfig,
};
use std::io::{BufRead, Write};

pub async fn run(args: ChatArgs, mut config: Config) -> Result<()> {
    config.tuning = TuningConfig {
        rrf_rank_constant: args.rrf_rank_constant,
        rrf_window_size: args.rrf_window_size,
        ..TuningConfig::default()
    };

    let llm = OpenAiClient::new(config.llm_service.clone())?;
    let pipeline = Pipeline::from_config(config)?;

    pipeline
        .ping()
        .await
        .context("Error connecting to the search engine. Fix connection and restart.")?;

    let mut session = ChatSession::new();
    let strategy = args.strategy.into();

    println!("How may I help you? (ctrl-d to exit)");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            println!("Please enter a question.");
            continue;
        }

        // Retrieval feeds the transcript only on the first turn; later
        // turns rely on the accumulated history for grounding.
        let grounding = if session.is_first_turn() {
            let response = pipeline.retrieve(question, strategy).await?;
            if response.is_empty() {
                println!("No results found.");
            }
            grounding_bodies(&response)
        } else {
            Vec::new()
        };

        let reply = chat_turn(&mut session, &llm, question, &grounding).await?;

        println!("{}", reply);
        println!();
    }

    Ok(())
}
