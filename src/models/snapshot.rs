use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{risk, technical};

macro_rules! wire_name {
    ($ty:ty { $($variant:ident => $name:expr),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TechnicalSignal {
    Bullish,
    #[default]
    Neutral,
    Bearish,
}

wire_name!(TechnicalSignal {
    Bullish => "BULLISH",
    Neutral => "NEUTRAL",
    Bearish => "BEARISH",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentSignal {
    Positive,
    #[default]
    Neutral,
    Negative,
}

wire_name!(SentimentSignal {
    Positive => "POSITIVE",
    Neutral => "NEUTRAL",
    Negative => "NEGATIVE",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentTrend {
    Improving,
    #[default]
    Stable,
    Deteriorating,
}

wire_name!(SentimentTrend {
    Improving => "improving",
    Stable => "stable",
    Deteriorating => "deteriorating",
});

/// Per-article label
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

wire_name!(SentimentLabel {
    Positive => "positive",
    Negative => "negative",
    Neutral => "neutral",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "LOW")]
    Low,
    #[default]
    #[serde(rename = "MODERATE")]
    Moderate,
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "VERY HIGH")]
    VeryHigh,
}

wire_name!(RiskLevel {
    Low => "LOW",
    Moderate => "MODERATE",
    High => "HIGH",
    VeryHigh => "VERY HIGH",
});

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < risk::LOW_BELOW {
            RiskLevel::Low
        } else if score < risk::MODERATE_BELOW {
            RiskLevel::Moderate
        } else if score < risk::HIGH_BELOW {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low risk - Suitable for conservative investors",
            RiskLevel::Moderate => "Moderate risk - Balanced risk-reward profile",
            RiskLevel::High => "Elevated risk - Monitor closely",
            RiskLevel::VeryHigh => "High risk - Exercise caution",
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::VeryHigh)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacdTrend {
    Bullish,
    Bearish,
    /// Only used by the default snapshot when MACD could not be computed
    #[default]
    Neutral,
}

wire_name!(MacdTrend {
    Bullish => "bullish",
    Bearish => "bearish",
    Neutral => "neutral",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandSignal {
    Overbought,
    Oversold,
    #[default]
    Neutral,
}

wire_name!(BandSignal {
    Overbought => "overbought",
    Oversold => "oversold",
    Neutral => "neutral",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiSignal {
    Overbought,
    Oversold,
    #[default]
    Hold,
}

wire_name!(RsiSignal {
    Overbought => "Overbought",
    Oversold => "Oversold",
    Hold => "Hold",
});

/// Where the last close sits relative to the trailing support/resistance range
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelPosition {
    NearSupport,
    NearResistance,
    MidRange,
    #[default]
    Unknown,
}

wire_name!(LevelPosition {
    NearSupport => "near_support",
    NearResistance => "near_resistance",
    MidRange => "mid_range",
    Unknown => "unknown",
});

// ============= Technical =============

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdReading {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub trend: MacdTrend,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BollingerReading {
    pub upper: f64,
    pub lower: f64,
    pub sma: f64,
    /// (price - lower) / (upper - lower), clamped to [0, 1]
    pub position: f64,
    pub signal: BandSignal,
}

impl Default for BollingerReading {
    fn default() -> Self {
        Self {
            upper: 0.0,
            lower: 0.0,
            sma: 0.0,
            position: 0.5,
            signal: BandSignal::Neutral,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VolumeReading {
    pub ratio: f64,
    pub unusual: bool,
}

impl Default for VolumeReading {
    fn default() -> Self {
        Self {
            ratio: 1.0,
            unusual: false,
        }
    }
}

/// Sub-scores feeding the weighted technical composite
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalComponents {
    pub rsi: f64,
    pub sma: f64,
    pub volume: f64,
    pub macd: f64,
    pub bollinger: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    pub technical_score: f64,
    pub signal: TechnicalSignal,
    pub rsi: f64,
    pub rsi_signal: RsiSignal,
    pub sma: f64,
    pub above_sma: bool,
    pub sma_distance_pct: f64,
    pub macd: MacdReading,
    pub bollinger: BollingerReading,
    pub volume: VolumeReading,
    pub components: TechnicalComponents,
    pub confidence: f64,
    pub insights: Vec<String>,
}

impl TechnicalSnapshot {
    /// Neutral default used whenever technical scoring cannot run
    pub fn unavailable() -> Self {
        Self {
            technical_score: technical::NEUTRAL_SCORE,
            signal: TechnicalSignal::Neutral,
            rsi: 50.0,
            rsi_signal: RsiSignal::Hold,
            sma: 0.0,
            above_sma: false,
            sma_distance_pct: 0.0,
            macd: MacdReading::default(),
            bollinger: BollingerReading::default(),
            volume: VolumeReading::default(),
            components: TechnicalComponents::default(),
            confidence: 0.0,
            insights: vec!["Technical analysis temporarily unavailable".to_string()],
        }
    }
}

impl Default for TechnicalSnapshot {
    fn default() -> Self {
        Self::unavailable()
    }
}

// ============= Sentiment =============

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub title: String,
    pub published_at: String,
    pub score: f64,
    pub label: SentimentLabel,
    pub source: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    pub sentiment_score: f64,
    pub trend: SentimentTrend,
    pub signal: SentimentSignal,
    pub confidence: f64,
    pub news_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub neutral_count: usize,
    pub latest_sentiment: SentimentLabel,
    pub articles: Vec<SentimentRecord>,
    pub insights: Vec<String>,
}

impl SentimentSnapshot {
    /// Zero-coverage snapshot; shared by the empty batch and the error default
    fn neutral(insight: &str) -> Self {
        Self {
            sentiment_score: 0.0,
            trend: SentimentTrend::Stable,
            signal: SentimentSignal::Neutral,
            confidence: 0.0,
            news_count: 0,
            positive_count: 0,
            negative_count: 0,
            neutral_count: 0,
            latest_sentiment: SentimentLabel::Neutral,
            articles: Vec::new(),
            insights: vec![insight.to_string()],
        }
    }

    pub fn no_coverage() -> Self {
        Self::neutral("📰 No recent news coverage available")
    }

    pub fn unavailable() -> Self {
        Self::neutral("Sentiment analysis temporarily unavailable")
    }
}

impl Default for SentimentSnapshot {
    fn default() -> Self {
        Self::unavailable()
    }
}

// ============= Risk =============

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskComponents {
    pub volatility: f64,
    pub technical: f64,
    pub sentiment: f64,
    pub position: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskSnapshot {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Annualized standard deviation of daily returns
    pub volatility: f64,
    pub support_level: f64,
    pub resistance_level: f64,
    pub dist_to_support_pct: f64,
    pub dist_to_resistance_pct: f64,
    pub position: LevelPosition,
    pub components: RiskComponents,
    pub advisory: String,
}

impl RiskSnapshot {
    pub fn unavailable() -> Self {
        Self {
            risk_score: risk::DEFAULT_SCORE,
            risk_level: RiskLevel::Moderate,
            volatility: 0.0,
            support_level: 0.0,
            resistance_level: 0.0,
            dist_to_support_pct: 0.0,
            dist_to_resistance_pct: 0.0,
            position: LevelPosition::Unknown,
            components: RiskComponents::default(),
            advisory: "Further analysis needed".to_string(),
        }
    }
}

impl Default for RiskSnapshot {
    fn default() -> Self {
        Self::unavailable()
    }
}

// ============= Composite =============

/// Outcome of the decision matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "HOLD (high risk)")]
    HoldHighRisk,
    #[serde(rename = "HOLD (neutral)")]
    HoldNeutral,
    #[serde(rename = "HOLD (mixed signals)")]
    HoldMixed,
    #[serde(rename = "Analysis unavailable")]
    Unavailable,
}

wire_name!(Recommendation {
    StrongBuy => "STRONG BUY",
    Buy => "BUY",
    Sell => "SELL",
    HoldHighRisk => "HOLD (high risk)",
    HoldNeutral => "HOLD (neutral)",
    HoldMixed => "HOLD (mixed signals)",
    Unavailable => "Analysis unavailable",
});

impl Recommendation {
    pub fn rationale(&self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Excellent technicals, positive sentiment, low risk",
            Recommendation::Buy => "Positive outlook with acceptable risk",
            Recommendation::Sell => "Negative technicals and sentiment",
            Recommendation::HoldHighRisk => "High risk, wait for better entry point",
            Recommendation::HoldNeutral => "Neutral signals, monitor for changes",
            Recommendation::HoldMixed => "Mixed signals, further monitoring recommended",
            Recommendation::Unavailable => "Not enough information to form a view",
        }
    }
}

/// Coarse label derived from the legacy combined score
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LegacyOutlook {
    Bullish,
    #[default]
    Neutral,
    Bearish,
}

wire_name!(LegacyOutlook {
    Bullish => "BULLISH",
    Neutral => "NEUTRAL",
    Bearish => "BEARISH",
});

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeAnalysis {
    pub symbol: String,
    pub current_price: f64,
    pub price_change_pct: f64,
    pub technical: TechnicalSnapshot,
    pub sentiment: SentimentSnapshot,
    pub risk: RiskSnapshot,
    pub recommendation: Recommendation,
    pub confidence_score: f64,
    pub legacy_score: f64,
    pub legacy_outlook: LegacyOutlook,
    pub analysis_timestamp: DateTime<Utc>,
    /// Set when the composite was produced by the error path
    pub error: Option<String>,
}

impl CompositeAnalysis {
    /// Well-formed composite for a symbol whose analysis could not run at all
    pub fn unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            current_price: 0.0,
            price_change_pct: 0.0,
            technical: TechnicalSnapshot::unavailable(),
            sentiment: SentimentSnapshot::unavailable(),
            risk: RiskSnapshot::unavailable(),
            recommendation: Recommendation::Unavailable,
            confidence_score: 0.0,
            legacy_score: 0.0,
            legacy_outlook: LegacyOutlook::Neutral,
            analysis_timestamp: Utc::now(),
            error: Some(reason.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }

    /// Flat record with the fields downstream consumers rely on
    pub fn to_record(&self) -> AnalysisRecord {
        AnalysisRecord {
            symbol: self.symbol.clone(),
            current_price: self.current_price,
            price_change_pct: self.price_change_pct,
            technical_score: self.technical.technical_score,
            technical_signal: self.technical.signal,
            technical_insights: self.technical.insights.clone(),
            sentiment_score: self.sentiment.sentiment_score,
            sentiment_signal: self.sentiment.signal,
            sentiment_insights: self.sentiment.insights.clone(),
            risk_score: self.risk.risk_score,
            risk_level: self.risk.risk_level,
            overall_recommendation: self.recommendation.as_str().to_string(),
            confidence_score: self.confidence_score,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub symbol: String,
    pub current_price: f64,
    pub price_change_pct: f64,
    pub technical_score: f64,
    pub technical_signal: TechnicalSignal,
    pub technical_insights: Vec<String>,
    pub sentiment_score: f64,
    pub sentiment_signal: SentimentSignal,
    pub sentiment_insights: Vec<String>,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub overall_recommendation: String,
    pub confidence_score: f64,
}
