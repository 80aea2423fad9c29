//! Command-line interface for analyst-rs

use analyst_agents::{AnalystKind, AnalystLoop, LoopConfig, NodeSettings, create_analyst};
use analyst_core::AnalysisState;
use analyst_dataflows::{DataflowConfig, NewsVendor, build_router, derive_sentiment_window, retrieve_macro_window};
use analyst_llm::providers::AnthropicProvider;
use analyst_utils::Config;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "analyst")]
#[command(about = "Run market analysts and inspect their data windows", long_about = None)]
struct Args {
    /// Data directory (defaults to ANALYST_DATA_DIR, then ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the three-year macro indicator window ending at a date
    Macro {
        /// Anchor date, YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    /// Print the seven-day sentiment window for an anchor
    Window {
        /// Anchor date or datetime, ISO format
        #[arg(long)]
        date: String,
    },
    /// Run one analyst to completion and print its report and the final state
    Run {
        /// Ticker under analysis
        #[arg(long)]
        ticker: String,
        /// Trade date, YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Analyst type: macro, sentiment (social) or news
        #[arg(long, default_value = "macro")]
        analyst: AnalystKind,
        /// News vendor: local or finnhub
        #[arg(long, default_value = "local")]
        news_vendor: NewsVendor,
        /// Model identifier (defaults to ANALYST_MODEL)
        #[arg(long)]
        model: Option<String>,
        /// Maximum analyst activations
        #[arg(long, default_value_t = 10)]
        max_iterations: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    analyst_utils::init_tracing_with(&config.log_filter, config.log_format);

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(|| config.data_dir.clone());
    info!(app = %config.app_name, environment = %config.environment, "Starting analyst");

    match args.command {
        Command::Macro { date } => {
            let dataflows = DataflowConfig::builder().data_dir(data_dir).build()?;
            let text = retrieve_macro_window(&dataflows.macro_dataset_path(), &date)?;
            println!("{text}");
        }
        Command::Window { date } => {
            let window = derive_sentiment_window(&date)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "start_date": window.start.to_string(),
                    "end_date": window.end.to_string(),
                }))?
            );
        }
        Command::Run {
            ticker,
            date,
            analyst,
            news_vendor,
            model,
            max_iterations,
        } => {
            let dataflows = DataflowConfig::builder()
                .data_dir(data_dir)
                .news_vendor(news_vendor)
                .with_env_api_key()
                .build()?;
            let router = Arc::new(build_router(&dataflows)?);
            let provider = AnthropicProvider::from_env().context("failed to create Anthropic provider")?;

            let mut settings = NodeSettings::default();
            if let Some(model) = model.or(config.model) {
                settings.model = model;
            }

            let node = create_analyst(analyst, &router, Arc::new(provider), settings);
            let driver = AnalystLoop::new(node, LoopConfig { max_iterations });
            let mut state = AnalysisState::new(ticker, &date)?;

            let report = driver.run(&mut state).await?;
            println!("{report}\n");
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }

    Ok(())
}
