use super::moving::sma;
use crate::constants::indicators::UNUSUAL_VOLUME_RATIO;
use crate::models::VolumeReading;

/// Volume divided by its trailing mean (current bar included).
/// A window with zero mean volume reads 1.0.
pub fn volume_ratio(volumes: &[f64], window: usize) -> Vec<Option<f64>> {
    sma(volumes, window)
        .into_iter()
        .zip(volumes)
        .map(|(avg, &vol)| {
            let avg = avg?;
            if !(avg.is_finite() && vol.is_finite()) {
                return None;
            }
            if avg == 0.0 {
                Some(1.0)
            } else {
                Some(vol / avg)
            }
        })
        .collect()
}

pub fn volume_reading(ratio: f64) -> VolumeReading {
    VolumeReading {
        ratio,
        unusual: ratio > UNUSUAL_VOLUME_RATIO,
    }
}
