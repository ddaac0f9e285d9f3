//! Pure indicator functions over closing prices and volumes.
//!
//! Every rolling output is index-aligned with its input and uses `None` for
//! bars where the window is not yet full. Callers fall back to neutral
//! defaults when the value they need is `None`.

pub mod bands;
pub mod momentum;
pub mod moving;
pub mod stats;
pub mod volume;


pub use bands::{bollinger, Band};
pub use momentum::{macd, rsi, MacdSeries};
pub use moving::{ema, rolling_max, rolling_min, rolling_std, sma};
pub use volume::volume_ratio;

use crate::config::IndicatorConfig;
use crate::models::PriceSeries;

/// All indicator columns for one series, computed in a single pass
#[derive(Clone, Debug, Default)]
pub struct IndicatorFrame {
    pub closes: Vec<f64>,
    pub sma: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub macd: MacdSeries,
    pub bollinger: Vec<Option<Band>>,
    pub volume_ratio: Vec<Option<f64>>,
}

impl IndicatorFrame {
    pub fn compute(series: &PriceSeries, cfg: &IndicatorConfig) -> Self {
        let closes = series.closes();
        let volumes = series.volumes();

        Self {
            sma: sma(&closes, cfg.sma_window),
            rsi: rsi(&closes, cfg.rsi_period),
            macd: macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal),
            bollinger: bollinger(&closes, cfg.bollinger_window, cfg.bollinger_k),
            volume_ratio: volume_ratio(&volumes, cfg.volume_window),
            closes,
        }
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.closes.len().checked_sub(1)
    }
}
