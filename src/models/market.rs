use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// One trading day of OHLCV data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A row is usable when its close is a positive finite number
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Ordered daily bars, ascending by date with no duplicate dates.
///
/// Construction drops invalid rows, sorts, and keeps the last bar seen for a
/// repeated date. The series may be empty; the scorers degrade to their
/// neutral defaults in that case.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        let total = bars.len();
        let mut bars: Vec<PriceBar> = bars.into_iter().filter(PriceBar::is_valid).collect();
        if bars.len() < total {
            debug!("[SERIES] Dropped {} invalid bars", total - bars.len());
        }

        // Stable sort keeps input order within a date, so the later row wins below
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// One-bar close change in percent; 0 with fewer than two bars
    pub fn price_change_pct(&self) -> f64 {
        match self.bars.len() {
            0 | 1 => 0.0,
            n => {
                let current = self.bars[n - 1].close;
                let previous = self.bars[n - 2].close;
                (current - previous) / previous * 100.0
            }
        }
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bars = Vec::<PriceBar>::deserialize(deserializer)?;
        Ok(PriceSeries::new(bars))
    }
}

impl From<Vec<PriceBar>> for PriceSeries {
    fn from(bars: Vec<PriceBar>) -> Self {
        PriceSeries::new(bars)
    }
}

/// A news item as delivered by the collector. Every field defaults to "".
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,

    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,

    #[serde(default, rename = "publishedAt", deserialize_with = "string_or_null")]
    pub published_at: String,

    /// Accepts either a plain string or a `{ "name": ... }` object
    #[serde(default, deserialize_with = "source_name")]
    pub source: String,
}

impl NewsArticle {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = published_at.into();
        self
    }

    /// Title and description joined for polarity scoring
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

fn string_or_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceField {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
}

fn source_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<SourceField>::deserialize(deserializer)? {
        Some(SourceField::Name(name)) => name,
        Some(SourceField::Object { name }) => name.unwrap_or_default(),
        None => String::new(),
    })
}
