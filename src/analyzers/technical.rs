use crate::config::IndicatorConfig;
use crate::constants::indicators::{RSI_OVERBOUGHT, RSI_OVERSOLD};
use crate::constants::technical::*;
use crate::error::AnalysisError;
use crate::indicators::stats::round_to;
use crate::indicators::volume::volume_reading;
use crate::indicators::IndicatorFrame;
use crate::models::{
    BandSignal, MacdReading, MacdTrend, PriceSeries, RsiSignal, TechnicalComponents,
    TechnicalSignal, TechnicalSnapshot,
};

/// Weighted five-factor technical score on the latest bar
#[derive(Clone, Debug, Default)]
pub struct TechnicalScorer {
    config: IndicatorConfig,
}

impl TechnicalScorer {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    pub fn try_score(&self, series: &PriceSeries) -> Result<TechnicalSnapshot, AnalysisError> {
        if series.len() < MIN_BARS {
            return Err(AnalysisError::InsufficientData {
                component: "technical",
                count: series.len(),
                required: MIN_BARS,
            });
        }
        let frame = IndicatorFrame::compute(series, &self.config);
        self.score_frame(&frame)
    }

    /// Score the last bar of an already computed frame
    pub fn score_frame(&self, frame: &IndicatorFrame) -> Result<TechnicalSnapshot, AnalysisError> {
        let last = frame.last_index().ok_or(AnalysisError::InsufficientData {
            component: "technical",
            count: 0,
            required: MIN_BARS,
        })?;
        let close = frame.closes[last];

        let rsi = frame.rsi[last].ok_or(AnalysisError::UndefinedIndicator { indicator: "rsi" })?;
        let sma = frame.sma[last].ok_or(AnalysisError::UndefinedIndicator { indicator: "sma" })?;
        let band = frame.bollinger[last].ok_or(AnalysisError::UndefinedIndicator {
            indicator: "bollinger",
        })?;
        let ratio = frame.volume_ratio[last].ok_or(AnalysisError::UndefinedIndicator {
            indicator: "volume_ratio",
        })?;
        let raw_macd = frame
            .macd
            .reading_at(last)
            .ok_or(AnalysisError::UndefinedIndicator { indicator: "macd" })?;

        let macd = MacdReading {
            macd: round_to(raw_macd.macd, 4),
            signal: round_to(raw_macd.signal, 4),
            histogram: round_to(raw_macd.histogram, 4),
            trend: raw_macd.trend,
        };
        let bollinger = band.reading(close);
        let volume = volume_reading(ratio);

        let rsi_signal = if rsi > RSI_OVERBOUGHT {
            RsiSignal::Overbought
        } else if rsi < RSI_OVERSOLD {
            RsiSignal::Oversold
        } else {
            RsiSignal::Hold
        };

        let above_sma = close > sma;
        let sma_distance_pct = (close / sma - 1.0) * 100.0;

        let components = TechnicalComponents {
            rsi: 100.0 - (50.0 - rsi).abs() * 2.0,
            sma: if sma_distance_pct.abs() < SMA_NEAR_PCT {
                50.0
            } else if above_sma {
                80.0
            } else {
                20.0
            },
            volume: if volume.unusual { 30.0 } else { 70.0 },
            // Left unbounded; only the weighted total is clamped
            macd: 50.0 + macd.histogram * MACD_HISTOGRAM_SCALE,
            bollinger: match bollinger.signal {
                BandSignal::Neutral => 50.0,
                BandSignal::Overbought => 30.0,
                BandSignal::Oversold => 70.0,
            },
        };

        let raw = components.rsi * WEIGHT_RSI
            + components.sma * WEIGHT_SMA
            + components.volume * WEIGHT_VOLUME
            + components.macd * WEIGHT_MACD
            + components.bollinger * WEIGHT_BOLLINGER;
        if !raw.is_finite() {
            return Err(AnalysisError::NonFinite {
                context: "technical score",
            });
        }
        let score = raw.clamp(0.0, 100.0);

        let signal = if score > BULLISH_ABOVE {
            TechnicalSignal::Bullish
        } else if score < BEARISH_BELOW {
            TechnicalSignal::Bearish
        } else {
            TechnicalSignal::Neutral
        };

        let mut snapshot = TechnicalSnapshot {
            technical_score: round_to(score, 1),
            signal,
            rsi,
            rsi_signal,
            sma,
            above_sma,
            sma_distance_pct,
            macd,
            bollinger,
            volume,
            components,
            confidence: ((score - NEUTRAL_SCORE).abs() / NEUTRAL_SCORE).min(1.0),
            insights: Vec::new(),
        };
        snapshot.insights = technical_insights(&snapshot, self.config.sma_window);
        Ok(snapshot)
    }
}

/// Insight lines in fixed priority: score band, RSI, SMA, volume, MACD, Bollinger
pub fn technical_insights(snapshot: &TechnicalSnapshot, sma_window: usize) -> Vec<String> {
    let mut insights = Vec::new();
    let score = snapshot.technical_score;

    insights.push(
        if score > 80.0 {
            "🚀 Strong bullish technical signals"
        } else if score > 60.0 {
            "📈 Moderately bullish technical outlook"
        } else if score < 20.0 {
            "🔻 Strong bearish technical signals"
        } else if score < 40.0 {
            "📉 Moderately bearish technical outlook"
        } else {
            "➡️ Mixed or neutral technical signals"
        }
        .to_string(),
    );

    match snapshot.rsi_signal {
        RsiSignal::Overbought => insights.push("⚡ RSI indicates overbought conditions".to_string()),
        RsiSignal::Oversold => insights.push("💎 RSI indicates oversold conditions".to_string()),
        RsiSignal::Hold => {}
    }

    let direction = if snapshot.above_sma { "above" } else { "below" };
    insights.push(format!(
        "📊 Trading {} {}-day SMA by {:.2}%",
        direction,
        sma_window,
        snapshot.sma_distance_pct.abs()
    ));

    if snapshot.volume.unusual {
        insights.push(format!(
            "🔥 Unusual volume detected ({:.1}x average)",
            snapshot.volume.ratio
        ));
    }

    match snapshot.macd.trend {
        MacdTrend::Bullish => insights.push("📈 MACD shows bullish momentum".to_string()),
        MacdTrend::Bearish => insights.push("📉 MACD shows bearish momentum".to_string()),
        MacdTrend::Neutral => {}
    }

    match snapshot.bollinger.signal {
        BandSignal::Overbought => insights
            .push("🎯 Price near upper Bollinger Band (potential resistance)".to_string()),
        BandSignal::Oversold => {
            insights.push("🎯 Price near lower Bollinger Band (potential support)".to_string())
        }
        BandSignal::Neutral => {}
    }

    insights
}
