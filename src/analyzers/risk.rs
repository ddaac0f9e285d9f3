use serde::{Deserialize, Serialize};

use crate::config::RiskConfig;
use crate::constants::backtest::TRADING_DAYS_PER_YEAR;
use crate::constants::risk::*;
use crate::error::AnalysisError;
use crate::indicators::stats::{pct_returns, round_to, std_sample};
use crate::models::{LevelPosition, RiskComponents, RiskLevel, RiskSnapshot};

/// Trailing support/resistance range around the last close
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelReading {
    pub support: f64,
    pub resistance: f64,
    pub dist_to_support_pct: f64,
    pub dist_to_resistance_pct: f64,
    pub position: LevelPosition,
}

/// Annualized standard deviation of daily returns over the trailing window.
/// Fewer than two returns reads 0.
pub fn volatility(closes: &[f64], window: usize) -> f64 {
    let returns = pct_returns(closes);
    if returns.len() < 2 {
        return 0.0;
    }
    let span = window.min(returns.len());
    let recent = &returns[returns.len() - span..];
    let daily = std_sample(recent).unwrap_or(0.0);
    round_to(daily * TRADING_DAYS_PER_YEAR.sqrt(), 4)
}

/// Min/max of the trailing window (shrunk to the series length when short)
pub fn support_resistance(closes: &[f64], window: usize) -> Option<LevelReading> {
    let current = *closes.last()?;
    let span = window.clamp(1, closes.len());
    let recent = &closes[closes.len() - span..];

    let support = recent.iter().copied().reduce(f64::min)?;
    let resistance = recent.iter().copied().reduce(f64::max)?;
    let dist_to_support_pct = (current - support) / current * 100.0;
    let dist_to_resistance_pct = (resistance - current) / current * 100.0;

    let position = if dist_to_support_pct < NEAR_LEVEL_PCT {
        LevelPosition::NearSupport
    } else if dist_to_resistance_pct < NEAR_LEVEL_PCT {
        LevelPosition::NearResistance
    } else {
        LevelPosition::MidRange
    };

    Some(LevelReading {
        support,
        resistance,
        dist_to_support_pct,
        dist_to_resistance_pct,
        position,
    })
}

/// Combines volatility, level position and the two other scores into 0-100 (lower is safer)
#[derive(Clone, Debug, Default)]
pub struct RiskAssessor {
    config: RiskConfig,
}

impl RiskAssessor {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn try_assess(
        &self,
        closes: &[f64],
        technical_score: f64,
        sentiment_score: f64,
    ) -> Result<RiskSnapshot, AnalysisError> {
        if !(technical_score.is_finite() && sentiment_score.is_finite()) {
            return Err(AnalysisError::NonFinite {
                context: "risk inputs",
            });
        }
        let levels = support_resistance(closes, self.config.support_resistance_window).ok_or(
            AnalysisError::InsufficientData {
                component: "risk",
                count: closes.len(),
                required: 1,
            },
        )?;
        let vol = volatility(closes, self.config.volatility_window);
        if !vol.is_finite() {
            return Err(AnalysisError::NonFinite {
                context: "volatility",
            });
        }

        let components = RiskComponents {
            volatility: (vol * VOLATILITY_SCALE).min(VOLATILITY_CAP),
            technical: TECHNICAL_CAP - technical_score * 0.3,
            sentiment: (SENTIMENT_BASE - sentiment_score * SENTIMENT_SCALE).clamp(0.0, SENTIMENT_CAP),
            position: match levels.position {
                LevelPosition::NearSupport => NEAR_SUPPORT_POINTS,
                LevelPosition::NearResistance => NEAR_RESISTANCE_POINTS,
                _ => MID_RANGE_POINTS,
            },
        };

        let total = (components.volatility
            + components.technical
            + components.sentiment
            + components.position)
            .clamp(0.0, 100.0);
        let risk_level = RiskLevel::from_score(total);

        Ok(RiskSnapshot {
            risk_score: round_to(total, 1),
            risk_level,
            volatility: vol,
            support_level: round_to(levels.support, 2),
            resistance_level: round_to(levels.resistance, 2),
            dist_to_support_pct: round_to(levels.dist_to_support_pct, 2),
            dist_to_resistance_pct: round_to(levels.dist_to_resistance_pct, 2),
            position: levels.position,
            components: RiskComponents {
                volatility: round_to(components.volatility, 1),
                technical: round_to(components.technical, 1),
                sentiment: round_to(components.sentiment, 1),
                position: components.position,
            },
            advisory: risk_level.advisory().to_string(),
        })
    }
}
