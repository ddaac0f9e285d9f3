//! Unit tests for volatility, support/resistance and the risk score.

#[cfg(test)]
mod risk_tests {
    use crate::analyzers::risk::*;
    use crate::config::RiskConfig;
    use crate::error::AnalysisError;
    use crate::models::{LevelPosition, RiskLevel};

    // ============= Volatility Tests =============

    #[test]
    fn test_volatility_needs_two_returns() {
        assert_eq!(volatility(&[], 30), 0.0);
        assert_eq!(volatility(&[100.0], 30), 0.0);
        assert_eq!(volatility(&[100.0, 101.0], 30), 0.0);
    }

    #[test]
    fn test_volatility_flat_series() {
        assert_eq!(volatility(&[50.0; 40], 30), 0.0);
    }

    #[test]
    fn test_volatility_annualized() {
        // returns +10%, -10%, +10%
        let vol = volatility(&[100.0, 110.0, 99.0, 108.9], 30);
        assert!((vol - 1.833).abs() < 1e-9);
    }

    #[test]
    fn test_volatility_uses_trailing_window() {
        let mut closes = vec![100.0, 150.0, 90.0, 160.0];
        closes.extend(std::iter::repeat(160.0).take(30));
        assert_eq!(volatility(&closes, 30), 0.0);
        assert!(volatility(&closes, 33) > 0.0);
    }

    // ============= Support/Resistance Tests =============

    #[test]
    fn test_levels_near_resistance() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let levels = support_resistance(&closes, 20).unwrap();
        assert_eq!(levels.support, 110.0);
        assert_eq!(levels.resistance, 129.0);
        assert_eq!(levels.dist_to_resistance_pct, 0.0);
        assert_eq!(levels.position, LevelPosition::NearResistance);
    }

    #[test]
    fn test_levels_short_series_mid_range() {
        let levels = support_resistance(&[10.0, 12.0, 11.0], 20).unwrap();
        assert_eq!(levels.support, 10.0);
        assert_eq!(levels.resistance, 12.0);
        assert_eq!(levels.position, LevelPosition::MidRange);
    }

    #[test]
    fn test_levels_empty() {
        assert!(support_resistance(&[], 20).is_none());
    }

    // ============= Risk Score Tests =============

    #[test]
    fn test_flat_series_is_low_risk() {
        let snap = RiskAssessor::default()
            .try_assess(&[100.0; 25], 65.5, 0.0)
            .unwrap();
        assert!((snap.risk_score - 23.35).abs() < 0.11);
        assert_eq!(snap.risk_level, RiskLevel::Low);
        assert_eq!(snap.position, LevelPosition::NearSupport);
        assert_eq!(snap.components.position, 3.0);
        assert_eq!(snap.components.volatility, 0.0);
        assert_eq!(snap.advisory, "Low risk - Suitable for conservative investors");
    }

    #[test]
    fn test_single_bar_is_moderate() {
        let snap = RiskAssessor::default().try_assess(&[42.0], 50.0, 0.0).unwrap();
        assert_eq!(snap.volatility, 0.0);
        assert_eq!(snap.risk_score, 28.0);
        assert_eq!(snap.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_component_caps() {
        let choppy: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 100.0 } else { 130.0 }).collect();
        let snap = RiskAssessor::default().try_assess(&choppy, 0.0, -1.0).unwrap();
        assert_eq!(snap.components.volatility, 40.0);
        assert_eq!(snap.components.technical, 30.0);
        assert_eq!(snap.components.sentiment, 20.0);
        assert_eq!(snap.risk_level, RiskLevel::VeryHigh);
        assert!(snap.risk_score <= 100.0);

        let calm = RiskAssessor::default().try_assess(&[10.0; 5], 100.0, 1.0).unwrap();
        assert_eq!(calm.components.sentiment, 0.0);
        assert_eq!(calm.components.technical, 0.0);
        assert!(calm.risk_score >= 0.0);
    }

    #[test]
    fn test_custom_windows() {
        let config = RiskConfig {
            volatility_window: 2,
            support_resistance_window: 2,
        };
        let snap = RiskAssessor::new(config)
            .try_assess(&[100.0, 50.0, 60.0, 60.0, 60.0], 50.0, 0.0)
            .unwrap();
        assert_eq!(snap.volatility, 0.0);
        assert_eq!(snap.support_level, 60.0);
    }

    #[test]
    fn test_errors() {
        let assessor = RiskAssessor::default();
        assert!(matches!(
            assessor.try_assess(&[], 50.0, 0.0),
            Err(AnalysisError::InsufficientData { component: "risk", .. })
        ));
        assert!(matches!(
            assessor.try_assess(&[1.0, 2.0], f64::NAN, 0.0),
            Err(AnalysisError::NonFinite { .. })
        ));
    }
}
