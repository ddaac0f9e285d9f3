//! Analysis-wide constants and magic numbers
//!
//! Centralizes the documented windows, weights and thresholds so the
//! scorers and the config defaults agree on a single value.

/// Indicator window defaults
pub mod indicators {
    /// Rolling window for SMA, Bollinger and volume averages
    pub const SMA_WINDOW: usize = 20;

    /// RSI lookback (in day-over-day deltas)
    pub const RSI_PERIOD: usize = 14;

    /// Guards the RS division when the average loss is zero
    pub const RSI_EPSILON: f64 = 1e-10;

    pub const MACD_FAST: usize = 12;
    pub const MACD_SLOW: usize = 26;
    pub const MACD_SIGNAL: usize = 9;

    pub const BOLLINGER_WINDOW: usize = 20;
    pub const BOLLINGER_K: f64 = 2.0;

    /// Bollinger position above which price is considered overbought
    pub const BOLLINGER_UPPER_ZONE: f64 = 0.8;

    /// Bollinger position below which price is considered oversold
    pub const BOLLINGER_LOWER_ZONE: f64 = 0.2;

    pub const VOLUME_WINDOW: usize = 20;

    /// Volume ratio above which a bar counts as unusual
    pub const UNUSUAL_VOLUME_RATIO: f64 = 2.0;

    pub const RSI_OVERBOUGHT: f64 = 70.0;
    pub const RSI_OVERSOLD: f64 = 30.0;
}

/// Technical scorer weights and bands
pub mod technical {
    /// Minimum bars before any technical scoring is attempted
    pub const MIN_BARS: usize = 20;

    pub const WEIGHT_RSI: f64 = 0.25;
    pub const WEIGHT_SMA: f64 = 0.20;
    pub const WEIGHT_VOLUME: f64 = 0.15;
    pub const WEIGHT_MACD: f64 = 0.20;
    pub const WEIGHT_BOLLINGER: f64 = 0.20;

    /// Within this distance (percent) of the SMA the position is treated as flat
    pub const SMA_NEAR_PCT: f64 = 2.0;

    /// Histogram multiplier for the MACD sub-score
    pub const MACD_HISTOGRAM_SCALE: f64 = 1000.0;

    pub const BULLISH_ABOVE: f64 = 70.0;
    pub const BEARISH_BELOW: f64 = 30.0;

    pub const NEUTRAL_SCORE: f64 = 50.0;
}

/// Sentiment thresholds
pub mod sentiment {
    /// Per-article label threshold (looser than the aggregate signal)
    pub const LABEL_THRESHOLD: f64 = 0.1;

    /// Aggregate signal threshold
    pub const SIGNAL_THRESHOLD: f64 = 0.2;

    /// Articles in each half of the trend comparison
    pub const TREND_WINDOW: usize = 3;

    /// Article count at which batch size stops discounting confidence
    pub const FULL_CONFIDENCE_COUNT: f64 = 10.0;

    pub const HIGH_COVERAGE: usize = 15;
    pub const LOW_COVERAGE: usize = 3;

    /// Applied to a word preceded by a negator ("not good" reads mildly negative)
    pub const NEGATION_FACTOR: f64 = -0.5;
}

/// Risk assessment constants
pub mod risk {
    pub const VOLATILITY_WINDOW: usize = 30;
    pub const SUPPORT_RESISTANCE_WINDOW: usize = 20;

    /// Percent distance that counts as "near" a support/resistance level
    pub const NEAR_LEVEL_PCT: f64 = 5.0;

    pub const VOLATILITY_CAP: f64 = 40.0;
    pub const VOLATILITY_SCALE: f64 = 1000.0;
    pub const TECHNICAL_CAP: f64 = 30.0;
    pub const SENTIMENT_BASE: f64 = 10.0;
    pub const SENTIMENT_SCALE: f64 = 50.0;
    pub const SENTIMENT_CAP: f64 = 20.0;

    pub const NEAR_SUPPORT_POINTS: f64 = 3.0;
    pub const NEAR_RESISTANCE_POINTS: f64 = 8.0;
    pub const MID_RANGE_POINTS: f64 = 5.0;

    pub const LOW_BELOW: f64 = 25.0;
    pub const MODERATE_BELOW: f64 = 50.0;
    pub const HIGH_BELOW: f64 = 75.0;

    pub const DEFAULT_SCORE: f64 = 50.0;
}

/// Backtest constants
pub mod backtest {
    /// Starting cash for every simulation run
    pub const INITIAL_CAPITAL: f64 = 100_000.0;

    pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

    /// Fewest bars a simulation will run on
    pub const MIN_BARS: usize = 2;
}

/// Orchestrator weighting
pub mod composite {
    pub const TECHNICAL_CONFIDENCE_WEIGHT: f64 = 0.7;
    pub const SENTIMENT_CONFIDENCE_WEIGHT: f64 = 0.3;

    /// Legacy combined score weights
    pub const LEGACY_TECHNICAL_WEIGHT: f64 = 0.6;
    pub const LEGACY_SENTIMENT_WEIGHT: f64 = 0.4;
    pub const LEGACY_THRESHOLD: f64 = 0.3;
}

/// Linear trend predictor
pub mod predictor {
    pub const MIN_BARS: usize = 20;
    pub const MIN_TRAINING_ROWS: usize = 10;
    pub const DEFAULT_HORIZON_DAYS: usize = 5;

    /// Rolling window for the volatility and momentum features
    pub const FEATURE_WINDOW: usize = 5;
    pub const RETURN_LAGS: usize = 5;

    pub const MAX_CONFIDENCE: f64 = 0.85;

    /// Diagonal load keeping the normal equations solvable with constant features
    pub const RIDGE: f64 = 1e-6;

    pub const STRONG_MOMENTUM: f64 = 0.05;
    pub const HIGH_VOLUME_RATIO: f64 = 1.5;
}

/// Pipeline scheduling defaults
pub mod pipeline {
    pub const DEFAULT_MAX_CONCURRENT: usize = 4;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Bars and articles retained per symbol by the in-memory store
    pub const DEFAULT_CACHE_LIMIT: usize = 1000;
    pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
    pub const CONFIG_PATH_ENV: &str = "STOCK_SIGNAL_CONFIG";
}
