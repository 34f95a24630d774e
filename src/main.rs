use anyhow::Result;
use tracing::{info, warn};

use daily_briefing::analyzer::Analyzer;
use daily_briefing::config::Config;
use daily_briefing::news::NewsFetcher;
use daily_briefing::pipeline::Pipeline;
use daily_briefing::sheets::SheetWriter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("daily_briefing=info")),
        )
        .init();

    info!("Daily briefing starting for {} tickers", config.tickers.len());

    let fetcher = NewsFetcher::new(&config)?;
    if config.news_api_key.is_empty() {
        warn!("NEWS_API_KEY not set — analyses will run without news context");
    }

    let analyzer = if config.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY not set — every ticker gets the fallback record");
        None
    } else {
        Some(Analyzer::new(&config)?)
    };

    // Authorize the sheet once per run, reused for every append
    let writer = SheetWriter::connect(&config).await?;

    let pipeline = Pipeline::new(fetcher, analyzer, writer);
    pipeline.run(&config.tickers).await?;

    info!("Briefing complete: {} tickers processed", config.tickers.len());
    Ok(())
}
