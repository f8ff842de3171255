//! stock-analyst: one-shot technical + fundamental summary for a ticker,
//! handed to a local Ollama model for a buy/sell/hold write-up.
//!
//! Usage:
//!   cargo run -p stock-analyst -- AAPL
//!   RUST_LOG=analysis_orchestrator=info cargo run -p stock-analyst -- msft
//!
//! Environment: OLLAMA_URL, OLLAMA_MODEL, HTTP_TIMEOUT_SECS, INFERENCE_TIMEOUT_SECS

use analysis_core::AnalysisError;
use analysis_orchestrator::{presentation, AnalystConfig, StockAnalyst};
use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "AI-assisted stock analysis from market data and insider activity")]
struct Cli {
    /// Ticker symbol, case-insensitive
    #[arg(value_parser = parse_ticker)]
    ticker: String,
}

fn parse_ticker(raw: &str) -> Result<String, String> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return Err("ticker must not be empty".to_string());
    }
    Ok(ticker.to_uppercase())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stock_analyst=warn,analysis_orchestrator=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli.ticker).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<AnalysisError>() {
                Some(analysis) => analysis.to_string(),
                None => format!("{e:#}"),
            };
            println!("{}", presentation::error_line(&message));
            ExitCode::FAILURE
        }
    }
}

async fn run(ticker: &str) -> anyhow::Result<()> {
    let config = AnalystConfig::default();
    tracing::info!("Using model {} at {}", config.llm.model, config.llm.base_url);
    let analyst = StockAnalyst::from_config(&config).context("failed to build inference client")?;

    print!("{}", presentation::header(ticker));
    println!("{}", presentation::progress(&format!("Fetching data for {ticker}...")));
    let data = analyst.fetch(ticker).await?;

    let prompt = analyst.compose(ticker, &data)?;

    println!("{}", presentation::progress(&format!("Analyzing {ticker}...")));
    let recommendation = analyst.recommend(&prompt).await?;

    println!("{}", presentation::results_block(&recommendation.formatted));
    Ok(())
}
