//! Integration tests for the analysis core.
//! These tests verify that components work together correctly.

use chrono::NaiveDate;
use std::sync::Arc;

use stock_signal::analyzers::{AnalysisOrchestrator, PolarityScorer};
use stock_signal::backtest::{BacktestResult, Backtester, Signal, TradeAction};
use stock_signal::data::{CachedProvider, MarketDataProvider, SeriesStore, StaticProvider};
use stock_signal::models::{MacdTrend, RiskLevel, RsiSignal, SentimentSignal, TechnicalSignal};
use stock_signal::pipeline::{rank_by_technical_score, AnalysisPipeline};
use stock_signal::{AnalysisConfig, NewsArticle, PriceBar, PriceSeries, Recommendation};

fn series(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::new(start + chrono::Duration::days(i as i64), c, c * 1.01, c * 0.99, c, 2_000.0))
        .collect::<Vec<_>>()
        .into()
}

struct Constant(f64);

impl PolarityScorer for Constant {
    fn polarity(&self, _text: &str) -> f64 {
        self.0
    }
}

/// Flat series: neutral technicals, low-to-moderate risk, no trades
#[test]
fn test_flat_prices() {
    let bars = series(&[50.0; 25]);
    let analysis = AnalysisOrchestrator::default().analyze("FLAT", &bars, &[]);

    assert!((analysis.technical.rsi - 50.0).abs() < 1e-9);
    assert_eq!(analysis.technical.signal, TechnicalSignal::Neutral);
    assert!(matches!(analysis.risk.risk_level, RiskLevel::Low | RiskLevel::Moderate));
    assert_eq!(analysis.price_change_pct, 0.0);

    let backtest = Backtester::default().run_strategy(&bars);
    assert_eq!(backtest.total_trades, 0);
    assert_eq!(backtest.final_value, backtest.initial_capital);
}

/// Steady uptrend: overbought RSI above a rising SMA with bullish MACD
#[test]
fn test_rising_prices() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let bars = series(&closes);
    let analysis = AnalysisOrchestrator::default().analyze("UP", &bars, &[]);
    let technical = &analysis.technical;

    assert!(technical.rsi > 70.0);
    assert_eq!(technical.rsi_signal, RsiSignal::Overbought);
    assert!(technical.above_sma);
    assert_eq!(technical.macd.trend, MacdTrend::Bullish);
    assert_eq!(technical.signal, TechnicalSignal::Bullish);

    let backtest = Backtester::default().run_strategy(&bars);
    assert!(backtest.buy_hold_return_pct > 0.0);
    assert_eq!(backtest.buy_hold_return_pct, 29.0);
}

/// No news: zero sentiment with a coverage notice
#[test]
fn test_empty_news_batch() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 3) as f64).collect();
    let analysis = AnalysisOrchestrator::default().analyze("QUIET", &series(&closes), &[]);
    let sentiment = &analysis.sentiment;

    assert_eq!(sentiment.sentiment_score, 0.0);
    assert_eq!(sentiment.signal, SentimentSignal::Neutral);
    assert_eq!(sentiment.confidence, 0.0);
    assert_eq!(sentiment.news_count, 0);
    assert!(sentiment.insights.iter().any(|i| i.contains("No recent news coverage")));
}

/// One BUY and one SELL around a rally beat a buy-and-hold that rode the whole decline
#[test]
fn test_explicit_round_trip() {
    let mut closes = vec![100.0; 5];
    closes.extend([100.0, 102.0, 104.0, 106.0, 108.0, 110.0, 104.0, 98.0]);
    let mut signals = vec![Signal::Hold; closes.len()];
    signals[5] = Signal::Buy;
    signals[10] = Signal::Sell;

    let result = Backtester::default().run(&series(&closes), &signals);
    assert_eq!(result.total_trades, 2);
    assert_eq!(result.trades[0].action, TradeAction::Buy);
    assert_eq!(result.trades[1].action, TradeAction::Sell);
    assert!(result.final_value > result.initial_capital);
    assert_eq!(result.buy_hold_return_pct, -2.0);
    assert_eq!(
        result.outperformed_buy_hold,
        result.total_return_pct > result.buy_hold_return_pct
    );
    assert!(result.outperformed_buy_hold);
}

/// A single bar degrades every scorer without failing
#[test]
fn test_single_bar() {
    let bars = series(&[42.0]);
    let news = vec![NewsArticle::new("Company beats estimates", "")];
    let analysis = AnalysisOrchestrator::default().analyze("ONE", &bars, &news);

    assert!(!analysis.is_degraded());
    assert_eq!(analysis.technical.technical_score, 50.0);
    assert_eq!(analysis.technical.signal, TechnicalSignal::Neutral);
    assert_eq!(analysis.current_price, 42.0);
    assert_eq!(analysis.price_change_pct, 0.0);
    assert!((0.0..=100.0).contains(&analysis.risk.risk_score));

    let backtest = Backtester::default().run_strategy(&bars);
    assert_eq!(backtest, BacktestResult::zero_activity(100_000.0));
    assert_eq!(backtest.buy_hold_return_pct, 0.0);
    assert!(!backtest.outperformed_buy_hold);
}

/// Scores stay in range even for violent, spiky series and extreme polarity
#[test]
fn test_scores_stay_bounded() {
    let closes: Vec<f64> = (0..80)
        .map(|i| if i % 2 == 0 { 1.0 + i as f64 } else { 500.0 - i as f64 * 3.0 })
        .collect();
    let bars = series(&closes);

    for polarity in [-1.0, -0.3, 0.0, 0.7, 1.0] {
        let orchestrator = AnalysisOrchestrator::default().with_polarity(Box::new(Constant(polarity)));
        let news: Vec<NewsArticle> = (0..12).map(|i| NewsArticle::new(format!("story {}", i), "")).collect();
        let analysis = orchestrator.analyze("WILD", &bars, &news);

        assert!((0.0..=100.0).contains(&analysis.technical.technical_score));
        assert!((0.0..=100.0).contains(&analysis.technical.rsi));
        assert!((0.0..=100.0).contains(&analysis.risk.risk_score));
        assert!((-1.0..=1.0).contains(&analysis.sentiment.sentiment_score));
        assert!((0.0..=1.0).contains(&analysis.technical.confidence));
        assert!((0.0..=1.0).contains(&analysis.sentiment.confidence));
        assert!((0.0..=1.0).contains(&analysis.confidence_score));
        assert!(analysis.technical.bollinger.upper >= analysis.technical.bollinger.lower);
    }
}

/// Strong uptrend, upbeat news and low volatility line up for a strong buy
#[test]
fn test_strong_buy_alignment() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let news: Vec<NewsArticle> = (0..10).map(|i| NewsArticle::new(format!("headline {}", i), "")).collect();
    let orchestrator = AnalysisOrchestrator::default().with_polarity(Box::new(Constant(0.6)));

    let analysis = orchestrator.analyze("UP", &series(&closes), &news);
    assert_eq!(analysis.recommendation, Recommendation::StrongBuy);
    assert_eq!(analysis.to_record().overall_recommendation, "STRONG BUY");
}

/// Invalid rows are dropped before analysis when decoding JSON input
#[test]
fn test_json_input_drops_invalid_rows() {
    let json = r#"[
        {"date": "2024-01-03", "open": 1, "high": 1, "low": 1, "close": 11.0, "volume": 10},
        {"date": "2024-01-02", "open": 1, "high": 1, "low": 1, "close": 10.0, "volume": 10},
        {"date": "2024-01-04", "open": 1, "high": 1, "low": 1, "close": 0.0, "volume": 10},
        {"date": "2024-01-05", "open": 1, "high": 1, "low": 1, "close": -3.0, "volume": 10}
    ]"#;
    let bars: PriceSeries = serde_json::from_str(json).unwrap();
    assert_eq!(bars.closes(), vec![10.0, 11.0]);

    let analysis = AnalysisOrchestrator::default().analyze("JSON", &bars, &[]);
    assert_eq!(analysis.price_change_pct, 10.0);

    let encoded = serde_json::to_value(&analysis).unwrap();
    assert_eq!(encoded["technical"]["signal"], "NEUTRAL");
    assert!(encoded["error"].is_null());
}

/// Cached provider feeding the concurrent pipeline end to end
#[tokio::test]
async fn test_pipeline_through_cache() {
    let rising: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
    let falling: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    let upstream = StaticProvider::new()
        .with_series("UP", series(&rising))
        .with_series("DOWN", series(&falling))
        .with_news("UP", vec![NewsArticle::new("Record profit and strong growth", "")]);
    let store = SeriesStore::new(250);
    let provider = Arc::new(CachedProvider::new(upstream, store.clone()));

    let pipeline = AnalysisPipeline::new(provider.clone(), &AnalysisConfig::default());
    let symbols = vec!["DOWN".to_string(), "UP".to_string(), "MISSING".to_string()];
    let mut reports = pipeline.analyze_all(&symbols).await;
    rank_by_technical_score(&mut reports);

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].symbol, "UP");
    assert_eq!(reports[2].symbol, "DOWN");
    assert!(reports.iter().find(|r| r.symbol == "MISSING").unwrap().is_degraded());

    assert_eq!(store.symbols(), vec!["DOWN", "UP"]);
    assert_eq!(store.get_news("UP").unwrap().len(), 1);
    assert_eq!(provider.price_series("UP").await.unwrap().len(), 60);
}

/// Identical inputs produce identical composites apart from the timestamp
#[tokio::test]
async fn test_pipeline_is_deterministic() {
    let closes: Vec<f64> = (0..45).map(|i| 60.0 + ((i * 5) % 9) as f64).collect();
    let provider = StaticProvider::new()
        .with_series("DET", series(&closes))
        .with_news("DET", vec![NewsArticle::new("Analysts upgrade outlook", "")]);
    let pipeline = AnalysisPipeline::new(Arc::new(provider), &AnalysisConfig::default());

    let first = pipeline.analyze_symbol("DET").await;
    let mut second = pipeline.analyze_symbol("DET").await;
    assert!(!first.is_degraded());

    second.analysis.analysis_timestamp = first.analysis.analysis_timestamp;
    assert_eq!(first, second);
}
