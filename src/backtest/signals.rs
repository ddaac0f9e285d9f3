use serde::{Deserialize, Serialize};

use crate::constants::indicators::{RSI_OVERBOUGHT, RSI_OVERSOLD};
use crate::indicators::IndicatorFrame;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    Hold,
}

/// Mean-reversion rule on RSI and the SMA: buy oversold dips below the
/// average, sell overbought runs above it.
///
/// Bar 0 and any bar missing RSI or SMA is `Hold`. Output length equals the
/// frame length.
pub fn generate_signals(frame: &IndicatorFrame) -> Vec<Signal> {
    (0..frame.len())
        .map(|i| {
            if i == 0 {
                return Signal::Hold;
            }
            let (Some(rsi), Some(sma)) = (frame.rsi[i], frame.sma[i]) else {
                return Signal::Hold;
            };
            let close = frame.closes[i];

            if rsi < RSI_OVERSOLD && close < sma {
                Signal::Buy
            } else if rsi > RSI_OVERBOUGHT && close > sma {
                Signal::Sell
            } else {
                Signal::Hold
            }
        })
        .collect()
}
