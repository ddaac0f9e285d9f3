//! Market data collaborators.
//!
//! The analysis core never performs I/O; a [`MarketDataProvider`] hands it
//! already-materialized price series and news batches.

pub mod store;

#[cfg(test)]
mod store_tests;

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::error::DataError;
use crate::models::{NewsArticle, PriceSeries};

pub use store::SeriesStore;

pub type DataResult<T> = Result<T, DataError>;

/// Source of daily price history and recent news per symbol
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Daily bars, already cleaned and ordered
    async fn price_series(&self, symbol: &str) -> DataResult<PriceSeries>;

    /// Recent articles, most recent first
    async fn news(&self, symbol: &str) -> DataResult<Vec<NewsArticle>>;
}

/// Provider backed by in-memory maps, for replaying fixed datasets
#[derive(Clone, Debug, Default)]
pub struct StaticProvider {
    series: HashMap<String, PriceSeries>,
    news: HashMap<String, Vec<NewsArticle>>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: impl Into<String>, series: PriceSeries) -> Self {
        self.series.insert(symbol.into(), series);
        self
    }

    pub fn with_news(mut self, symbol: impl Into<String>, articles: Vec<NewsArticle>) -> Self {
        self.news.insert(symbol.into(), articles);
        self
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.series.keys().cloned().collect();
        symbols.sort();
        symbols
    }
}

#[async_trait]
impl MarketDataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn price_series(&self, symbol: &str) -> DataResult<PriceSeries> {
        let series = self.series.get(symbol).ok_or_else(|| DataError::UnknownSymbol {
            symbol: symbol.to_string(),
        })?;
        if series.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: symbol.to_string(),
            });
        }
        Ok(series.clone())
    }

    async fn news(&self, symbol: &str) -> DataResult<Vec<NewsArticle>> {
        Ok(self.news.get(symbol).cloned().unwrap_or_default())
    }
}

/// Read-through cache in front of another provider
pub struct CachedProvider<P> {
    inner: P,
    store: SeriesStore,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    pub fn new(inner: P, store: SeriesStore) -> Self {
        Self { inner, store }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn store(&self) -> &SeriesStore {
        &self.store
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn price_series(&self, symbol: &str) -> DataResult<PriceSeries> {
        if let Some(series) = self.store.get_series(symbol) {
            debug!("[DATA] Cache hit for {} bars ({})", symbol, series.len());
            return Ok(series);
        }

        let series = self.inner.price_series(symbol).await?;
        self.store.put_series(symbol, &series);
        Ok(series)
    }

    async fn news(&self, symbol: &str) -> DataResult<Vec<NewsArticle>> {
        if let Some(articles) = self.store.get_news(symbol) {
            debug!("[DATA] Cache hit for {} news ({})", symbol, articles.len());
            return Ok(articles);
        }

        let articles = self.inner.news(symbol).await?;
        self.store.put_news(symbol, &articles);
        Ok(articles)
    }
}
