use super::moving::ema;
use crate::constants::indicators::RSI_EPSILON;
use crate::models::{MacdReading, MacdTrend};

/// Relative Strength Index over trailing `period` close-to-close deltas.
///
/// Index `i` is defined once `period` deltas exist (`i >= period`). A window
/// with neither gains nor losses reads 50.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }

    for (i, slot) in out.iter_mut().enumerate().skip(period) {
        let mut gain = 0.0;
        let mut loss = 0.0;
        for j in (i + 1 - period)..=i {
            let delta = closes[j] - closes[j - 1];
            if delta > 0.0 {
                gain += delta;
            } else {
                loss -= delta;
            }
        }
        let avg_gain = gain / period as f64;
        let avg_loss = loss / period as f64;

        let value = if avg_gain == 0.0 && avg_loss == 0.0 {
            50.0
        } else {
            let rs = avg_gain / (avg_loss + RSI_EPSILON);
            100.0 - 100.0 / (1.0 + rs)
        };
        if value.is_finite() {
            *slot = Some(value.clamp(0.0, 100.0));
        }
    }
    out
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    pub fn reading_at(&self, index: usize) -> Option<MacdReading> {
        let macd = *self.macd.get(index)?;
        let signal = *self.signal.get(index)?;
        let histogram = *self.histogram.get(index)?;
        if !(macd.is_finite() && signal.is_finite()) {
            return None;
        }
        Some(MacdReading {
            macd,
            signal,
            histogram,
            trend: if macd > signal {
                MacdTrend::Bullish
            } else {
                MacdTrend::Bearish
            },
        })
    }

    pub fn latest(&self) -> Option<MacdReading> {
        self.reading_at(self.macd.len().checked_sub(1)?)
    }
}

/// MACD line (fast EMA minus slow EMA), its signal EMA and the histogram
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = ema(&line, signal);
    let histogram = line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd: line,
        signal: signal_line,
        histogram,
    }
}
