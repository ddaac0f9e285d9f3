//! Async driver running the synchronous analysis core over many symbols.
//!
//! Each symbol is fetched through a [`MarketDataProvider`], then analyzed,
//! backtested and predicted on a blocking worker under a per-symbol timeout.
//! Symbols run concurrently up to `pipeline.max_concurrent`; a symbol that
//! fails or times out still produces a report built from the degraded
//! defaults.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::analyzers::AnalysisOrchestrator;
use crate::backtest::{BacktestResult, Backtester};
use crate::config::AnalysisConfig;
use crate::constants::predictor::DEFAULT_HORIZON_DAYS;
use crate::data::MarketDataProvider;
use crate::error::DataError;
use crate::models::CompositeAnalysis;
use crate::predictor::{LinearTrendPredictor, Prediction, TrendPredictor};

/// Everything produced for one symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub analysis: CompositeAnalysis,
    pub backtest: BacktestResult,
    pub prediction: Prediction,
}

impl SymbolReport {
    pub fn unavailable(symbol: &str, reason: &str, initial_capital: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            analysis: CompositeAnalysis::unavailable(symbol, reason),
            backtest: BacktestResult::zero_activity(initial_capital),
            prediction: Prediction::insufficient_data(DEFAULT_HORIZON_DAYS),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.analysis.is_degraded()
    }
}

#[derive(Clone)]
pub struct AnalysisPipeline {
    provider: Arc<dyn MarketDataProvider>,
    orchestrator: Arc<AnalysisOrchestrator>,
    backtester: Backtester,
    predictor: Arc<dyn TrendPredictor>,
    limiter: Arc<Semaphore>,
    timeout: Duration,
}

impl AnalysisPipeline {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: &AnalysisConfig) -> Self {
        Self {
            provider,
            orchestrator: Arc::new(AnalysisOrchestrator::new(config)),
            backtester: Backtester::new(config),
            predictor: Arc::new(LinearTrendPredictor::new(config.indicators.clone())),
            limiter: Arc::new(Semaphore::new(config.pipeline.max_concurrent.max(1))),
            timeout: config.timeout(),
        }
    }

    pub fn with_orchestrator(mut self, orchestrator: AnalysisOrchestrator) -> Self {
        self.orchestrator = Arc::new(orchestrator);
        self
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn TrendPredictor>) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch, analyze, backtest and predict one symbol. Never fails.
    pub async fn analyze_symbol(&self, symbol: &str) -> SymbolReport {
        let capital = self.backtester.initial_capital();

        let series = match self.provider.price_series(symbol).await {
            Ok(series) => series,
            Err(e) => {
                warn!("[PIPELINE] {} price fetch failed: {}", symbol, e);
                return SymbolReport::unavailable(symbol, &e.to_string(), capital);
            }
        };

        let news = match self.provider.news(symbol).await {
            Ok(news) => news,
            Err(e) => {
                warn!("[PIPELINE] {} news fetch failed, scoring without news: {}", symbol, e);
                Vec::new()
            }
        };

        let orchestrator = Arc::clone(&self.orchestrator);
        let backtester = self.backtester.clone();
        let predictor = Arc::clone(&self.predictor);
        let owned = symbol.to_string();

        let worker = tokio::task::spawn_blocking(move || {
            let analysis = orchestrator.analyze(&owned, &series, &news);
            let backtest = backtester.run_strategy(&series);
            let prediction = predictor.predict(&series);
            SymbolReport {
                symbol: owned,
                analysis,
                backtest,
                prediction,
            }
        });

        let failure = match tokio::time::timeout(self.timeout, worker).await {
            Ok(Ok(report)) => {
                info!(
                    "[PIPELINE] {} done: {} (tech {:.1}, risk {})",
                    symbol,
                    report.analysis.recommendation,
                    report.analysis.technical.technical_score,
                    report.analysis.risk.risk_level
                );
                return report;
            }
            Ok(Err(join_error)) => DataError::Worker {
                symbol: symbol.to_string(),
                reason: join_error.to_string(),
            },
            Err(_) => DataError::Timeout {
                symbol: symbol.to_string(),
                millis: self.timeout.as_millis(),
            },
        };

        error!("[PIPELINE] {}", failure);
        SymbolReport::unavailable(symbol, &failure.to_string(), capital)
    }

    /// Analyze every symbol concurrently. Output order is not guaranteed to match input.
    pub async fn analyze_all(&self, symbols: &[String]) -> Vec<SymbolReport> {
        info!(
            "[PIPELINE] Analyzing {} symbols via {} provider",
            symbols.len(),
            self.provider_name()
        );

        let handles: Vec<_> = symbols
            .iter()
            .map(|symbol| {
                let pipeline = self.clone();
                let task_symbol = symbol.clone();
                let handle = tokio::spawn(async move {
                    // Acquire only fails on a closed semaphore
                    let _permit = Arc::clone(&pipeline.limiter).acquire_owned().await.ok();
                    pipeline.analyze_symbol(&task_symbol).await
                });
                (symbol.clone(), handle)
            })
            .collect();

        let mut reports = Vec::with_capacity(handles.len());
        for (symbol, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!("[PIPELINE] Task for {} failed: {}", symbol, e);
                    reports.push(SymbolReport::unavailable(
                        &symbol,
                        &e.to_string(),
                        self.backtester.initial_capital(),
                    ));
                }
            }
        }
        reports
    }
}

/// Symbols to analyze: the configured list when set, otherwise everything available.
///
/// Configured order is kept and repeats are dropped. A configured symbol with
/// no data still gets a (degraded) report.
pub fn select_symbols(configured: &[String], available: &[String]) -> Vec<String> {
    if configured.is_empty() {
        return available.to_vec();
    }

    let mut selected: Vec<String> = Vec::with_capacity(configured.len());
    for symbol in configured {
        if !selected.contains(symbol) {
            selected.push(symbol.clone());
        }
    }

    let skipped = available.iter().filter(|s| !selected.contains(*s)).count();
    if skipped > 0 {
        info!("[PIPELINE] Skipping {} symbols not listed in pipeline.symbols", skipped);
    }
    selected
}

/// Order reports by technical score, strongest first
pub fn rank_by_technical_score(reports: &mut [SymbolReport]) {
    reports.sort_by(|a, b| {
        b.analysis
            .technical
            .technical_score
            .total_cmp(&a.analysis.technical.technical_score)
    });
}
