//! stock_signal - Stock analysis and signal core
//!
//! This library turns a daily price series and a batch of news articles into
//! a technical score, a sentiment score, a risk assessment and a composite
//! recommendation, and replays indicator-driven signals through a backtest.

pub mod analyzers;
pub mod backtest;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod pipeline;
pub mod predictor;

// Re-export commonly used types
pub use analyzers::{AnalysisOrchestrator, PolarityScorer, RiskAssessor, SentimentEngine, TechnicalScorer};
pub use backtest::{BacktestResult, Backtester, Signal};
pub use config::AnalysisConfig;
pub use models::{CompositeAnalysis, NewsArticle, PriceBar, PriceSeries, Recommendation};
pub use pipeline::{AnalysisPipeline, SymbolReport};
pub use predictor::{LinearTrendPredictor, Prediction, TrendPredictor};
