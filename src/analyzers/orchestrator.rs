use chrono::Utc;
use tracing::{debug, info, warn};

use super::polarity::PolarityScorer;
use super::risk::RiskAssessor;
use super::sentiment::SentimentEngine;
use super::technical::TechnicalScorer;
use crate::config::AnalysisConfig;
use crate::constants::composite::*;
use crate::constants::technical::NEUTRAL_SCORE;
use crate::error::{is_insufficient_data, AnalysisError};
use crate::indicators::stats::round_to;
use crate::models::{
    CompositeAnalysis, LegacyOutlook, NewsArticle, PriceSeries, Recommendation, RiskLevel,
    RiskSnapshot, SentimentSignal, SentimentSnapshot, TechnicalSignal, TechnicalSnapshot,
};

/// Runs the three scorers for one symbol and composes the result
pub struct AnalysisOrchestrator {
    technical: TechnicalScorer,
    sentiment: SentimentEngine,
    risk: RiskAssessor,
}

impl Default for AnalysisOrchestrator {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl AnalysisOrchestrator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            technical: TechnicalScorer::new(config.indicators.clone()),
            sentiment: SentimentEngine::from_config(&config.sentiment),
            risk: RiskAssessor::new(config.risk.clone()),
        }
    }

    /// Swap in a different polarity capability for news scoring
    pub fn with_polarity(mut self, scorer: Box<dyn PolarityScorer>) -> Self {
        self.sentiment = SentimentEngine::new(scorer);
        self
    }

    /// Always returns a well-formed composite; failed stages fall back to their defaults
    pub fn analyze(&self, symbol: &str, series: &PriceSeries, news: &[NewsArticle]) -> CompositeAnalysis {
        if series.is_empty() {
            warn!("[ANALYSIS] {} has no price data", symbol);
            return CompositeAnalysis::unavailable(symbol, "No price data available");
        }

        let technical = settle("TECH", symbol, self.technical.try_score(series), TechnicalSnapshot::unavailable);
        let sentiment = settle("SENTIMENT", symbol, self.sentiment.try_score(news), SentimentSnapshot::unavailable);
        let risk = settle(
            "RISK",
            symbol,
            self.risk
                .try_assess(&series.closes(), technical.technical_score, sentiment.sentiment_score),
            RiskSnapshot::unavailable,
        );

        let composite = compose(symbol, series, technical, sentiment, risk);
        info!(
            "[ANALYSIS] {} -> {} (tech {:.1} {}, sentiment {:.3} {}, risk {:.1} {}, confidence {:.2})",
            symbol,
            composite.recommendation,
            composite.technical.technical_score,
            composite.technical.signal,
            composite.sentiment.sentiment_score,
            composite.sentiment.signal,
            composite.risk.risk_score,
            composite.risk.risk_level,
            composite.confidence_score
        );
        composite
    }
}

fn settle<T>(tag: &str, symbol: &str, result: Result<T, AnalysisError>, fallback: fn() -> T) -> T {
    match result {
        Ok(snapshot) => snapshot,
        Err(e) if is_insufficient_data(&e) => {
            debug!("[{}] {}: {}, using neutral default", tag, symbol, e);
            fallback()
        }
        Err(e) => {
            warn!("[{}] {}: {}, using neutral default", tag, symbol, e);
            fallback()
        }
    }
}

/// Assemble the composite from finished snapshots
pub fn compose(
    symbol: &str,
    series: &PriceSeries,
    technical: TechnicalSnapshot,
    sentiment: SentimentSnapshot,
    risk: RiskSnapshot,
) -> CompositeAnalysis {
    let recommendation = recommend(technical.signal, sentiment.signal, risk.risk_level);
    let confidence_score = combined_confidence(technical.confidence, sentiment.confidence);
    let (legacy_score, legacy_outlook) = legacy_score(technical.technical_score, sentiment.sentiment_score);

    CompositeAnalysis {
        symbol: symbol.to_string(),
        current_price: round_to(series.last_close().unwrap_or(0.0), 2),
        price_change_pct: round_to(series.price_change_pct(), 2),
        technical,
        sentiment,
        risk,
        recommendation,
        confidence_score,
        legacy_score,
        legacy_outlook,
        analysis_timestamp: Utc::now(),
        error: None,
    }
}

/// Ordered decision matrix, first match wins
pub fn recommend(technical: TechnicalSignal, sentiment: SentimentSignal, risk: RiskLevel) -> Recommendation {
    use SentimentSignal as S;
    use TechnicalSignal as T;

    match (technical, sentiment, risk) {
        (T::Bullish, S::Positive, RiskLevel::Low) => Recommendation::StrongBuy,
        (T::Bullish, s, RiskLevel::Low | RiskLevel::Moderate) if s != S::Negative => Recommendation::Buy,
        (T::Bearish, S::Negative, _) => Recommendation::Sell,
        (_, _, r) if r.is_elevated() => Recommendation::HoldHighRisk,
        (T::Neutral, S::Neutral, _) => Recommendation::HoldNeutral,
        _ => Recommendation::HoldMixed,
    }
}

/// Technical-weighted blend of the two confidences, two decimals
pub fn combined_confidence(technical: f64, sentiment: f64) -> f64 {
    let blended = TECHNICAL_CONFIDENCE_WEIGHT * technical + SENTIMENT_CONFIDENCE_WEIGHT * sentiment;
    round_to(blended.clamp(0.0, 1.0), 2)
}

/// Single number in roughly [-1, 1] mixing the technical deviation and the sentiment score
pub fn legacy_score(technical_score: f64, sentiment_score: f64) -> (f64, LegacyOutlook) {
    let tech = (technical_score - NEUTRAL_SCORE) / NEUTRAL_SCORE;
    let combined = LEGACY_TECHNICAL_WEIGHT * tech + LEGACY_SENTIMENT_WEIGHT * sentiment_score;
    let outlook = if combined > LEGACY_THRESHOLD {
        LegacyOutlook::Bullish
    } else if combined < -LEGACY_THRESHOLD {
        LegacyOutlook::Bearish
    } else {
        LegacyOutlook::Neutral
    };
    (round_to(combined, 3), outlook)
}
