//! Unit tests for SeriesStore and the data providers.

#[cfg(test)]
mod store_tests {
    use crate::data::{CachedProvider, DataResult, MarketDataProvider, SeriesStore, StaticProvider};
    use crate::error::DataError;
    use crate::models::{NewsArticle, PriceBar, PriceSeries};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bar(day: i64, close: f64) -> PriceBar {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Duration::days(day);
        PriceBar::new(date, close, close, close, close, 500.0)
    }

    fn series(closes: &[f64]) -> PriceSeries {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| bar(i as i64, c))
            .collect::<Vec<_>>()
            .into()
    }

    /// Counts upstream calls so cache hits can be observed
    struct CountingProvider {
        inner: StaticProvider,
        series_calls: AtomicUsize,
        news_calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn price_series(&self, symbol: &str) -> DataResult<PriceSeries> {
            self.series_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.price_series(symbol).await
        }

        async fn news(&self, symbol: &str) -> DataResult<Vec<NewsArticle>> {
            self.news_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.news(symbol).await
        }
    }

    // ============= SeriesStore Tests =============

    #[test]
    fn test_series_store_new() {
        let store = SeriesStore::new(100);
        assert_eq!(store.limit, 100);
        assert!(store.get_series("AAPL").is_none());
        assert!(store.get_news("AAPL").is_none());
    }

    #[test]
    fn test_update_and_get_latest_bar() {
        let store = SeriesStore::new(100);
        store.update_bar("AAPL", bar(0, 10.0));
        store.update_bar("AAPL", bar(1, 11.0));

        let latest = store.get_latest_bar("AAPL").unwrap();
        assert_eq!(latest.close, 11.0);
        assert_eq!(store.get_series("AAPL").unwrap().len(), 2);
    }

    #[test]
    fn test_bar_limit_evicts_oldest() {
        let store = SeriesStore::new(3);
        for i in 0..5 {
            store.update_bar("MSFT", bar(i, 100.0 + i as f64));
        }

        let cached = store.get_series("MSFT").unwrap();
        assert_eq!(cached.closes(), vec![102.0, 103.0, 104.0]);
    }

    #[test]
    fn test_put_series_keeps_most_recent() {
        let store = SeriesStore::new(2);
        store.put_series("TSLA", &series(&[1.0, 2.0, 3.0]));
        assert_eq!(store.get_series("TSLA").unwrap().closes(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_out_of_order_bars_come_back_sorted() {
        let store = SeriesStore::new(10);
        store.update_bar("AMD", bar(2, 3.0));
        store.update_bar("AMD", bar(0, 1.0));
        store.update_bar("AMD", bar(1, 2.0));
        assert_eq!(store.get_series("AMD").unwrap().closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_news_limit_and_order() {
        let store = SeriesStore::new(2);
        store.add_news("NVDA", NewsArticle::new("first", ""));
        store.add_news("NVDA", NewsArticle::new("second", ""));
        store.add_news("NVDA", NewsArticle::new("third", ""));

        let titles: Vec<String> = store.get_news("NVDA").unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["second", "third"]);

        let batch = vec![
            NewsArticle::new("newest", ""),
            NewsArticle::new("older", ""),
            NewsArticle::new("oldest", ""),
        ];
        store.put_news("NVDA", &batch);
        let titles: Vec<String> = store.get_news("NVDA").unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["newest", "older"]);
    }

    #[test]
    fn test_invalidate_and_symbols() {
        let store = SeriesStore::new(10);
        store.put_series("B", &series(&[1.0]));
        store.put_series("A", &series(&[1.0]));
        store.put_news("A", &[NewsArticle::new("x", "")]);
        assert_eq!(store.symbols(), vec!["A", "B"]);

        store.invalidate("A");
        assert_eq!(store.symbols(), vec!["B"]);
        assert!(store.get_news("A").is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SeriesStore::new(10);
        let handle = store.clone();
        handle.update_bar("IBM", bar(0, 5.0));
        assert!(store.get_latest_bar("IBM").is_some());
    }

    // ============= Provider Tests =============

    #[tokio::test]
    async fn test_static_provider_lookup() {
        let provider = StaticProvider::new()
            .with_series("AAPL", series(&[1.0, 2.0]))
            .with_series("EMPTY", PriceSeries::default())
            .with_news("AAPL", vec![NewsArticle::new("headline", "")]);

        assert_eq!(provider.name(), "static");
        assert_eq!(provider.symbols(), vec!["AAPL", "EMPTY"]);
        assert_eq!(provider.price_series("AAPL").await.unwrap().len(), 2);
        assert_eq!(provider.news("AAPL").await.unwrap().len(), 1);
        assert!(provider.news("GOOG").await.unwrap().is_empty());

        assert_eq!(
            provider.price_series("GOOG").await,
            Err(DataError::UnknownSymbol {
                symbol: "GOOG".to_string()
            })
        );
        assert_eq!(
            provider.price_series("EMPTY").await,
            Err(DataError::EmptySeries {
                symbol: "EMPTY".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_cached_provider_reads_through_once() {
        let upstream = CountingProvider {
            inner: StaticProvider::new()
                .with_series("AAPL", series(&[1.0, 2.0, 3.0]))
                .with_news("AAPL", vec![NewsArticle::new("headline", "")]),
            series_calls: AtomicUsize::new(0),
            news_calls: AtomicUsize::new(0),
        };
        let cached = CachedProvider::new(upstream, SeriesStore::new(100));

        for _ in 0..3 {
            assert_eq!(cached.price_series("AAPL").await.unwrap().len(), 3);
            assert_eq!(cached.news("AAPL").await.unwrap().len(), 1);
        }

        assert_eq!(cached.name(), "counting");
        assert_eq!(cached.inner_calls(), (1, 1));
        assert!(cached.store().get_latest_bar("AAPL").is_some());
    }

    #[tokio::test]
    async fn test_cached_provider_does_not_cache_errors() {
        let upstream = CountingProvider {
            inner: StaticProvider::new(),
            series_calls: AtomicUsize::new(0),
            news_calls: AtomicUsize::new(0),
        };
        let cached = CachedProvider::new(upstream, SeriesStore::new(100));

        assert!(cached.price_series("NOPE").await.is_err());
        assert!(cached.price_series("NOPE").await.is_err());
        assert!(cached.store().get_series("NOPE").is_none());
        assert_eq!(cached.inner_calls().0, 2);
    }

    impl CachedProvider<CountingProvider> {
        fn inner_calls(&self) -> (usize, usize) {
            let inner = self.inner();
            (
                inner.series_calls.load(Ordering::SeqCst),
                inner.news_calls.load(Ordering::SeqCst),
            )
        }
    }
}
