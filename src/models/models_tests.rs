//! Unit tests for market data and snapshot records.

#[cfg(test)]
mod models_tests {
    use crate::models::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn bar(d: u32, close: f64) -> PriceBar {
        PriceBar::new(day(d), close, close, close, close, 1_000.0)
    }

    // ============= PriceSeries Tests =============

    #[test]
    fn test_series_drops_invalid_rows() {
        let series = PriceSeries::new(vec![
            bar(1, 10.0),
            bar(2, 0.0),
            bar(3, -4.0),
            bar(4, f64::NAN),
            bar(5, 12.0),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.0, 12.0]);
    }

    #[test]
    fn test_series_sorts_and_dedups_dates() {
        let series = PriceSeries::new(vec![bar(3, 30.0), bar(1, 10.0), bar(3, 31.0), bar(2, 20.0)]);
        assert_eq!(series.closes(), vec![10.0, 20.0, 31.0]);
        assert_eq!(series.last().map(|b| b.date), Some(day(3)));
    }

    #[test]
    fn test_price_change_pct() {
        let series = PriceSeries::new(vec![bar(1, 100.0), bar(2, 105.0)]);
        assert!((series.price_change_pct() - 5.0).abs() < 1e-9);

        let single = PriceSeries::new(vec![bar(1, 100.0)]);
        assert_eq!(single.price_change_pct(), 0.0);
        assert_eq!(PriceSeries::default().price_change_pct(), 0.0);
    }

    #[test]
    fn test_series_deserialize_filters() {
        let json = r#"[
            {"date":"2024-03-02","open":1,"high":1,"low":1,"close":11,"volume":5},
            {"date":"2024-03-01","open":1,"high":1,"low":1,"close":10,"volume":5},
            {"date":"2024-03-03","open":1,"high":1,"low":1,"close":0,"volume":5}
        ]"#;
        let series: PriceSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.closes(), vec![10.0, 11.0]);
        assert_eq!(series.last_close(), Some(11.0));
    }

    // ============= NewsArticle Tests =============

    #[test]
    fn test_article_missing_and_null_fields() {
        let json = r#"{"title": null, "publishedAt": "2024-03-01T10:00:00Z"}"#;
        let article: NewsArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.description, "");
        assert_eq!(article.published_at, "2024-03-01T10:00:00Z");
        assert_eq!(article.source, "");
    }

    #[test]
    fn test_article_source_shapes() {
        let plain: NewsArticle = serde_json::from_str(r#"{"source": "Reuters"}"#).unwrap();
        assert_eq!(plain.source, "Reuters");

        let object: NewsArticle =
            serde_json::from_str(r#"{"source": {"id": null, "name": "Bloomberg"}}"#).unwrap();
        assert_eq!(object.source, "Bloomberg");

        let nameless: NewsArticle = serde_json::from_str(r#"{"source": {"id": "x"}}"#).unwrap();
        assert_eq!(nameless.source, "");
    }

    #[test]
    fn test_article_text_joins_title_and_description() {
        let article = NewsArticle::new("Shares rally", "after earnings beat").with_source("Wire");
        assert_eq!(article.text(), "Shares rally after earnings beat");
        assert_eq!(article.source, "Wire");
    }

    // ============= Snapshot Tests =============

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(24.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::VeryHigh);
        assert!(RiskLevel::High.is_elevated());
        assert!(!RiskLevel::Moderate.is_elevated());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&RiskLevel::VeryHigh).unwrap(), "\"VERY HIGH\"");
        assert_eq!(serde_json::to_string(&TechnicalSignal::Bullish).unwrap(), "\"BULLISH\"");
        assert_eq!(serde_json::to_string(&SentimentTrend::Deteriorating).unwrap(), "\"deteriorating\"");
        assert_eq!(serde_json::to_string(&Recommendation::HoldMixed).unwrap(), "\"HOLD (mixed signals)\"");
        assert_eq!(LevelPosition::NearSupport.to_string(), "near_support");
        assert_eq!(RsiSignal::Hold.as_str(), "Hold");
    }

    #[test]
    fn test_unavailable_snapshots() {
        let tech = TechnicalSnapshot::unavailable();
        assert_eq!(tech.technical_score, 50.0);
        assert_eq!(tech.signal, TechnicalSignal::Neutral);
        assert_eq!(tech.confidence, 0.0);
        assert!(tech.insights[0].contains("unavailable"));

        let sentiment = SentimentSnapshot::no_coverage();
        assert_eq!(sentiment.sentiment_score, 0.0);
        assert!(sentiment.insights[0].contains("No recent news coverage"));

        let risk = RiskSnapshot::default();
        assert_eq!(risk.risk_score, 50.0);
        assert_eq!(risk.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_composite_unavailable_record() {
        let composite = CompositeAnalysis::unavailable("ACME", "no data");
        assert!(composite.is_degraded());

        let record = composite.to_record();
        assert_eq!(record.symbol, "ACME");
        assert_eq!(record.overall_recommendation, "Analysis unavailable");
        assert_eq!(record.technical_signal, TechnicalSignal::Neutral);
        assert_eq!(record.risk_level, RiskLevel::Moderate);
        assert_eq!(record.confidence_score, 0.0);
    }
}
