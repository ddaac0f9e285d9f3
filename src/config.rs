use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::constants::{backtest, indicators, pipeline, risk};
use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_window: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    pub bollinger_k: f64,
    pub volume_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_window: indicators::SMA_WINDOW,
            rsi_period: indicators::RSI_PERIOD,
            macd_fast: indicators::MACD_FAST,
            macd_slow: indicators::MACD_SLOW,
            macd_signal: indicators::MACD_SIGNAL,
            bollinger_window: indicators::BOLLINGER_WINDOW,
            bollinger_k: indicators::BOLLINGER_K,
            volume_window: indicators::VOLUME_WINDOW,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskConfig {
    pub volatility_window: usize,
    pub support_resistance_window: usize,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            volatility_window: risk::VOLATILITY_WINDOW,
            support_resistance_window: risk::SUPPORT_RESISTANCE_WINDOW,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestConfig {
    pub initial_capital: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: backtest::INITIAL_CAPITAL,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SentimentConfig {
    /// Extra lexicon entries (word -> weight in [-1, 1]), merged over the built-in list
    pub lexicon: HashMap<String, f64>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub symbols: Vec<String>,
    pub max_concurrent: usize,
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            max_concurrent: pipeline::DEFAULT_MAX_CONCURRENT,
            timeout_secs: pipeline::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub indicators: IndicatorConfig,
    pub risk: RiskConfig,
    pub backtest: BacktestConfig,
    pub sentiment: SentimentConfig,
    pub pipeline: PipelineConfig,
}

impl AnalysisConfig {
    /// Load from `$STOCK_SIGNAL_CONFIG` or `config.yaml`; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(pipeline::CONFIG_PATH_ENV)
            .unwrap_or_else(|_| pipeline::DEFAULT_CONFIG_PATH.to_string());

        if !Path::new(&path).exists() {
            info!("[CONFIG] {} not found, using built-in defaults", path);
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // Strip BOM if present
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: AnalysisConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ind = &self.indicators;
        let windows = [
            ("indicators.sma_window", ind.sma_window),
            ("indicators.rsi_period", ind.rsi_period),
            ("indicators.macd_fast", ind.macd_fast),
            ("indicators.macd_slow", ind.macd_slow),
            ("indicators.macd_signal", ind.macd_signal),
            ("indicators.volume_window", ind.volume_window),
            ("risk.volatility_window", self.risk.volatility_window),
            ("risk.support_resistance_window", self.risk.support_resistance_window),
            ("pipeline.max_concurrent", self.pipeline.max_concurrent),
        ];
        for (field, value) in windows {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if self.pipeline.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "pipeline.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        // Sample standard deviation needs two observations
        if ind.bollinger_window < 2 {
            return Err(ConfigError::Invalid {
                field: "indicators.bollinger_window",
                reason: format!("must be at least 2, got {}", ind.bollinger_window),
            });
        }

        if ind.macd_fast >= ind.macd_slow {
            return Err(ConfigError::Invalid {
                field: "indicators.macd_fast",
                reason: format!("fast span {} must be below slow span {}", ind.macd_fast, ind.macd_slow),
            });
        }

        if !(ind.bollinger_k.is_finite() && ind.bollinger_k > 0.0) {
            return Err(ConfigError::Invalid {
                field: "indicators.bollinger_k",
                reason: format!("must be positive, got {}", ind.bollinger_k),
            });
        }

        let capital = self.backtest.initial_capital;
        if !(capital.is_finite() && capital > 0.0) {
            return Err(ConfigError::Invalid {
                field: "backtest.initial_capital",
                reason: format!("must be positive, got {}", capital),
            });
        }

        if let Some((word, weight)) = self
            .sentiment
            .lexicon
            .iter()
            .find(|(_, w)| !(-1.0..=1.0).contains(*w))
        {
            return Err(ConfigError::Invalid {
                field: "sentiment.lexicon",
                reason: format!("weight for '{}' must lie in [-1, 1], got {}", word, weight),
            });
        }

        Ok(())
    }

    /// Per-symbol analysis timeout
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.pipeline.timeout_secs)
    }
}
