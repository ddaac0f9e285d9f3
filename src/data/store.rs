use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::models::{NewsArticle, PriceBar, PriceSeries};

/// In-memory per-symbol cache of price history and news.
///
/// Each symbol keeps at most `limit` bars and `limit` articles; the oldest
/// entries are evicted first. Clones share the same underlying maps.
#[derive(Clone, Debug)]
pub struct SeriesStore {
    bars: Arc<DashMap<String, VecDeque<PriceBar>>>,
    news: Arc<DashMap<String, VecDeque<NewsArticle>>>,
    pub limit: usize,
}

impl SeriesStore {
    pub fn new(limit: usize) -> Self {
        Self {
            bars: Arc::new(DashMap::new()),
            news: Arc::new(DashMap::new()),
            limit,
        }
    }

    pub fn update_bar(&self, symbol: &str, bar: PriceBar) {
        let mut queue = self.bars.entry(symbol.to_string()).or_default();
        if queue.len() >= self.limit {
            queue.pop_front();
        }
        queue.push_back(bar);
    }

    /// Replace the cached history for `symbol`, keeping the most recent `limit` bars
    pub fn put_series(&self, symbol: &str, series: &PriceSeries) {
        let bars = series.bars();
        let skip = bars.len().saturating_sub(self.limit);
        self.bars
            .insert(symbol.to_string(), bars[skip..].iter().cloned().collect());
    }

    /// Cached history as a cleaned series; `None` when nothing is cached
    pub fn get_series(&self, symbol: &str) -> Option<PriceSeries> {
        self.bars
            .get(symbol)
            .filter(|queue| !queue.is_empty())
            .map(|queue| PriceSeries::new(queue.iter().cloned().collect()))
    }

    pub fn get_latest_bar(&self, symbol: &str) -> Option<PriceBar> {
        self.bars.get(symbol).and_then(|q| q.back().cloned())
    }

    pub fn add_news(&self, symbol: &str, article: NewsArticle) {
        let mut queue = self.news.entry(symbol.to_string()).or_default();
        if queue.len() >= self.limit {
            queue.pop_front();
        }
        queue.push_back(article);
    }

    /// Replace the cached news batch; input order (most recent first) is preserved
    pub fn put_news(&self, symbol: &str, articles: &[NewsArticle]) {
        let keep = articles.len().min(self.limit);
        self.news
            .insert(symbol.to_string(), articles[..keep].iter().cloned().collect());
    }

    /// Cached news batch; `None` when the symbol was never stored
    pub fn get_news(&self, symbol: &str) -> Option<Vec<NewsArticle>> {
        self.news.get(symbol).map(|q| q.iter().cloned().collect())
    }

    pub fn invalidate(&self, symbol: &str) {
        self.bars.remove(symbol);
        self.news.remove(symbol);
    }

    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.bars.iter().map(|e| e.key().clone()).collect();
        symbols.sort();
        symbols
    }
}

impl Default for SeriesStore {
    fn default() -> Self {
        Self::new(crate::constants::pipeline::DEFAULT_CACHE_LIMIT)
    }
}
