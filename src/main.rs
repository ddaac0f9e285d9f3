use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stock_signal::data::StaticProvider;
use stock_signal::pipeline::{rank_by_technical_score, select_symbols};
use stock_signal::{AnalysisConfig, AnalysisPipeline, NewsArticle, PriceSeries};

/// One symbol's materialized market data
#[derive(Debug, Deserialize)]
struct SymbolInput {
    symbol: String,
    #[serde(default)]
    bars: PriceSeries,
    #[serde(default)]
    news: Vec<NewsArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputDocument {
    Batch(Vec<SymbolInput>),
    Single(SymbolInput),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: stock_signal <input.json>")?;

    let config = AnalysisConfig::load()?;
    info!("[CONFIG] Loaded configuration: {:?}", config);

    let content = std::fs::read_to_string(&path)?;
    let (inputs, batch) = match serde_json::from_str::<InputDocument>(&content)? {
        InputDocument::Batch(inputs) => (inputs, true),
        InputDocument::Single(input) => (vec![input], false),
    };

    let mut provider = StaticProvider::new();
    let mut available = Vec::with_capacity(inputs.len());
    for input in inputs {
        info!(
            "📥 {}: {} valid bars, {} articles",
            input.symbol,
            input.bars.len(),
            input.news.len()
        );
        available.push(input.symbol.clone());
        provider = provider
            .with_series(input.symbol.clone(), input.bars)
            .with_news(input.symbol, input.news);
    }

    let symbols = select_symbols(&config.pipeline.symbols, &available);
    let pipeline = AnalysisPipeline::new(Arc::new(provider), &config);
    let mut reports = pipeline.analyze_all(&symbols).await;
    rank_by_technical_score(&mut reports);

    let output = match (batch, reports.first()) {
        (false, Some(report)) => serde_json::to_string_pretty(report)?,
        _ => serde_json::to_string_pretty(&reports)?,
    };
    println!("{}", output);

    Ok(())
}
