use super::moving::{rolling_std, sma};
use crate::constants::indicators::{BOLLINGER_LOWER_ZONE, BOLLINGER_UPPER_ZONE};
use crate::models::{BandSignal, BollingerReading};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

impl Band {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Position of `price` inside the band, clamped to [0, 1]; 0.5 for a zero-width band
    pub fn position(&self, price: f64) -> f64 {
        let width = self.width();
        if width <= f64::EPSILON * self.middle.abs().max(1.0) {
            return 0.5;
        }
        ((price - self.lower) / width).clamp(0.0, 1.0)
    }

    pub fn reading(&self, price: f64) -> BollingerReading {
        let position = self.position(price);
        let signal = if position > BOLLINGER_UPPER_ZONE {
            BandSignal::Overbought
        } else if position < BOLLINGER_LOWER_ZONE {
            BandSignal::Oversold
        } else {
            BandSignal::Neutral
        };
        BollingerReading {
            upper: self.upper,
            lower: self.lower,
            sma: self.middle,
            position,
            signal,
        }
    }
}

/// Bollinger Bands: SMA ± k · rolling sample stddev
pub fn bollinger(closes: &[f64], window: usize, k: f64) -> Vec<Option<Band>> {
    let mid = sma(closes, window);
    let std = rolling_std(closes, window);
    mid.into_iter()
        .zip(std)
        .map(|(m, s)| {
            let (m, s) = (m?, s?);
            Some(Band {
                upper: m + k * s,
                middle: m,
                lower: m - k * s,
            })
        })
        .collect()
}
