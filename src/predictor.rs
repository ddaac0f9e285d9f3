//! Pluggable next-move predictor.
//!
//! The default implementation fits a linear probability model on a handful of
//! price and indicator features and reads the fitted value for the latest bar
//! as the probability that the next close is higher.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IndicatorConfig;
use crate::constants::indicators::{RSI_OVERBOUGHT, RSI_OVERSOLD};
use crate::constants::predictor::*;
use crate::indicators::stats::{mean, pct_returns, round_to, std_pop, std_sample};
use crate::indicators::IndicatorFrame;
use crate::models::PriceSeries;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PredictedTrend {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_trend: PredictedTrend,
    pub confidence: f64,
    pub price_target: f64,
    pub current_price: f64,
    pub horizon_days: usize,
    pub reasoning: String,
}

impl Prediction {
    pub fn insufficient_data(horizon_days: usize) -> Self {
        Self {
            predicted_trend: PredictedTrend::Neutral,
            confidence: 0.5,
            price_target: 0.0,
            current_price: 0.0,
            horizon_days,
            reasoning: "Insufficient data for prediction".to_string(),
        }
    }
}

pub trait TrendPredictor: Send + Sync {
    fn predict(&self, series: &PriceSeries) -> Prediction;
}

#[derive(Clone, Debug)]
pub struct LinearTrendPredictor {
    indicators: IndicatorConfig,
    horizon_days: usize,
}

impl Default for LinearTrendPredictor {
    fn default() -> Self {
        Self::new(IndicatorConfig::default())
    }
}

/// Feature row for one bar
#[derive(Clone, Debug, PartialEq)]
struct Features {
    returns: f64,
    volatility: f64,
    momentum: f64,
    rsi: f64,
    volume_ratio: f64,
    price_to_sma: f64,
    lags: [f64; RETURN_LAGS],
}

impl Features {
    fn to_vec(&self) -> Vec<f64> {
        let mut row = vec![
            self.returns,
            self.volatility,
            self.momentum,
            self.rsi,
            self.volume_ratio,
            self.price_to_sma,
        ];
        row.extend_from_slice(&self.lags);
        row
    }
}

impl LinearTrendPredictor {
    pub fn new(indicators: IndicatorConfig) -> Self {
        Self {
            indicators,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    pub fn with_horizon(mut self, days: usize) -> Self {
        self.horizon_days = days;
        self
    }

    fn features(&self, series: &PriceSeries) -> Vec<Features> {
        let frame = IndicatorFrame::compute(series, &self.indicators);
        let closes = &frame.closes;

        // returns[0] has no previous bar and reads 0
        let mut returns = vec![0.0; closes.len()];
        for i in 1..closes.len() {
            returns[i] = closes[i] / closes[i - 1] - 1.0;
        }

        (0..closes.len())
            .map(|i| {
                let volatility = if i >= FEATURE_WINDOW {
                    std_sample(&returns[i + 1 - FEATURE_WINDOW..=i]).unwrap_or(0.0)
                } else {
                    0.0
                };
                let momentum = if i >= FEATURE_WINDOW {
                    closes[i] / closes[i - FEATURE_WINDOW] - 1.0
                } else {
                    0.0
                };
                let mut lags = [0.0; RETURN_LAGS];
                for (k, lag) in lags.iter_mut().enumerate() {
                    if i > k {
                        *lag = returns[i - k - 1];
                    }
                }
                Features {
                    returns: returns[i],
                    volatility,
                    momentum,
                    rsi: frame.rsi[i].unwrap_or(50.0),
                    volume_ratio: frame.volume_ratio[i].unwrap_or(1.0),
                    price_to_sma: frame.sma[i].map(|s| closes[i] / s).unwrap_or(1.0),
                    lags,
                }
            })
            .collect()
    }

    fn reasoning(&self, trend: PredictedTrend, last: &Features) -> String {
        let mut reasons = Vec::new();

        if last.momentum > STRONG_MOMENTUM {
            reasons.push("strong upward momentum");
        } else if last.momentum < -STRONG_MOMENTUM {
            reasons.push("strong downward momentum");
        }

        if last.rsi > RSI_OVERBOUGHT {
            reasons.push("overbought RSI conditions");
        } else if last.rsi < RSI_OVERSOLD {
            reasons.push("oversold RSI conditions");
        }

        if last.volume_ratio > HIGH_VOLUME_RATIO {
            reasons.push("high trading volume");
        }

        if reasons.is_empty() {
            reasons.push("mixed technical signals");
        }

        let direction = match trend {
            PredictedTrend::Bullish => "bullish",
            PredictedTrend::Bearish => "bearish",
            PredictedTrend::Neutral => "neutral",
        };
        format!(
            "Prediction based on {}. Historical patterns suggest {} movement likely.",
            reasons.join(", "),
            direction
        )
    }
}

impl TrendPredictor for LinearTrendPredictor {
    fn predict(&self, series: &PriceSeries) -> Prediction {
        if series.len() < MIN_BARS {
            return Prediction::insufficient_data(self.horizon_days);
        }

        let features = self.features(series);
        let closes = series.closes();
        let rows: Vec<Vec<f64>> = features[..features.len() - 1].iter().map(Features::to_vec).collect();
        let targets: Vec<f64> = closes
            .windows(2)
            .map(|w| if w[1] > w[0] { 1.0 } else { 0.0 })
            .collect();
        if rows.len() < MIN_TRAINING_ROWS {
            return Prediction::insufficient_data(self.horizon_days);
        }

        let Some(last) = features.last() else {
            return Prediction::insufficient_data(self.horizon_days);
        };
        let Some(model) = LinearModel::fit(&rows, &targets) else {
            debug!("[PREDICT] Normal equations not solvable, using default prediction");
            return Prediction::insufficient_data(self.horizon_days);
        };
        let probability = model.predict(&last.to_vec());
        if !probability.is_finite() {
            return Prediction::insufficient_data(self.horizon_days);
        }

        let current_price = closes[closes.len() - 1];
        let avg_change = mean(&pct_returns(&closes)).unwrap_or(0.0).abs();
        let horizon = self.horizon_days as f64;

        let (trend, price_target) = if probability > 0.5 {
            (PredictedTrend::Bullish, current_price * (1.0 + avg_change * horizon))
        } else {
            (PredictedTrend::Bearish, current_price * (1.0 - avg_change * horizon))
        };

        Prediction {
            predicted_trend: trend,
            confidence: ((probability - 0.5).abs() * 2.0).min(MAX_CONFIDENCE),
            price_target: round_to(price_target, 2),
            current_price: round_to(current_price, 2),
            horizon_days: self.horizon_days,
            reasoning: self.reasoning(trend, last),
        }
    }
}

/// Ordinary least squares on standardized columns with an intercept
struct LinearModel {
    means: Vec<f64>,
    scales: Vec<f64>,
    intercept: f64,
    weights: Vec<f64>,
}

impl LinearModel {
    fn fit(rows: &[Vec<f64>], targets: &[f64]) -> Option<Self> {
        let n = rows.len();
        let k = rows.first()?.len();
        let targets = &targets[..n];

        let column = |j: usize| rows.iter().map(|r| r[j]).collect::<Vec<f64>>();
        let means: Vec<f64> = (0..k).map(|j| mean(&column(j)).unwrap_or(0.0)).collect();
        let scales: Vec<f64> = (0..k)
            .map(|j| match std_pop(&column(j)) {
                Some(s) if s > 0.0 => s,
                _ => 1.0,
            })
            .collect();

        let z: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| (0..k).map(|j| (r[j] - means[j]) / scales[j]).collect())
            .collect();
        let y_mean = mean(targets)?;

        // Normal equations on centered data: (ZᵀZ + λI) w = Zᵀ(y - ȳ)
        let mut a = vec![vec![0.0; k + 1]; k];
        for (row, &y) in z.iter().zip(targets) {
            for i in 0..k {
                for j in 0..k {
                    a[i][j] += row[i] * row[j];
                }
                a[i][k] += row[i] * (y - y_mean);
            }
        }
        for (i, eq) in a.iter_mut().enumerate() {
            eq[i] += RIDGE;
        }

        let weights = solve(a)?;
        Some(Self {
            means,
            scales,
            intercept: y_mean,
            weights,
        })
    }

    fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + row
                .iter()
                .enumerate()
                .map(|(j, x)| self.weights[j] * (x - self.means[j]) / self.scales[j])
                .sum::<f64>()
    }
}

/// Gaussian elimination with partial pivoting on an augmented matrix
fn solve(mut a: Vec<Vec<f64>>) -> Option<Vec<f64>> {
    let k = a.len();
    for col in 0..k {
        let pivot = (col..k).max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))?;
        if a[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        for r in (col + 1)..k {
            let factor = a[r][col] / a[col][col];
            for c in col..=k {
                a[r][c] -= factor * a[col][c];
            }
        }
    }

    let mut x = vec![0.0; k];
    for i in (0..k).rev() {
        let tail: f64 = ((i + 1)..k).map(|j| a[i][j] * x[j]).sum();
        x[i] = (a[i][k] - tail) / a[i][i];
    }
    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
