use tracing::debug;

use super::polarity::{LexiconPolarity, PolarityScorer};
use crate::config::SentimentConfig;
use crate::constants::sentiment::*;
use crate::error::AnalysisError;
use crate::indicators::stats::{mean, round_to, std_pop};
use crate::models::{
    NewsArticle, SentimentLabel, SentimentRecord, SentimentSignal, SentimentSnapshot,
    SentimentTrend,
};

/// Aggregates per-article polarity into a sentiment snapshot
pub struct SentimentEngine {
    scorer: Box<dyn PolarityScorer>,
}

impl Default for SentimentEngine {
    fn default() -> Self {
        Self::new(Box::new(LexiconPolarity::new()))
    }
}

impl SentimentEngine {
    pub fn new(scorer: Box<dyn PolarityScorer>) -> Self {
        Self { scorer }
    }

    pub fn from_config(config: &SentimentConfig) -> Self {
        Self::new(Box::new(LexiconPolarity::new().with_overrides(&config.lexicon)))
    }

    /// Score each article; output order follows input order (most recent first)
    pub fn score_articles(&self, articles: &[NewsArticle]) -> Vec<SentimentRecord> {
        articles
            .iter()
            .map(|article| {
                let score = self.scorer.polarity(&article.text());
                SentimentRecord {
                    title: article.title.clone(),
                    published_at: article.published_at.clone(),
                    score,
                    label: label_for(score),
                    source: if article.source.is_empty() {
                        "Unknown".to_string()
                    } else {
                        article.source.clone()
                    },
                }
            })
            .collect()
    }

    pub fn try_score(&self, articles: &[NewsArticle]) -> Result<SentimentSnapshot, AnalysisError> {
        if articles.is_empty() {
            return Ok(SentimentSnapshot::no_coverage());
        }

        let records = self.score_articles(articles);
        let scores: Vec<f64> = records.iter().map(|r| r.score).collect();
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(AnalysisError::NonFinite {
                context: "article polarity",
            });
        }
        let scores: Vec<f64> = scores.into_iter().map(|s| s.clamp(-1.0, 1.0)).collect();

        let average = mean(&scores).unwrap_or(0.0);
        let trend = trend_of(&scores);

        let spread = if scores.len() > 1 {
            std_pop(&scores).unwrap_or(0.0)
        } else {
            0.0
        };
        let volume_weight = (scores.len() as f64 / FULL_CONFIDENCE_COUNT).min(1.0);
        let confidence = ((1.0 - spread).max(0.0) * volume_weight).clamp(0.0, 1.0);

        let signal = if average > SIGNAL_THRESHOLD {
            SentimentSignal::Positive
        } else if average < -SIGNAL_THRESHOLD {
            SentimentSignal::Negative
        } else {
            SentimentSignal::Neutral
        };

        let count = |label: SentimentLabel| records.iter().filter(|r| r.label == label).count();

        let mut snapshot = SentimentSnapshot {
            sentiment_score: round_to(average, 3),
            trend,
            signal,
            confidence: round_to(confidence, 2),
            news_count: records.len(),
            positive_count: count(SentimentLabel::Positive),
            negative_count: count(SentimentLabel::Negative),
            neutral_count: count(SentimentLabel::Neutral),
            latest_sentiment: records.first().map(|r| r.label).unwrap_or_default(),
            articles: records,
            insights: Vec::new(),
        };
        snapshot.insights = sentiment_insights(&snapshot);

        debug!(
            "[SENTIMENT] {} articles, score {:.3} ({}), trend {}",
            snapshot.news_count, snapshot.sentiment_score, snapshot.signal, snapshot.trend
        );
        Ok(snapshot)
    }
}

fn label_for(score: f64) -> SentimentLabel {
    if score > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if score < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Most recent articles against the ones just before them.
/// With no older articles the recent set is compared with itself.
fn trend_of(scores: &[f64]) -> SentimentTrend {
    let split = scores.len().min(TREND_WINDOW);
    let recent = &scores[..split];
    let older = if scores.len() > TREND_WINDOW {
        &scores[TREND_WINDOW..scores.len().min(2 * TREND_WINDOW)]
    } else {
        recent
    };

    let recent_avg = mean(recent).unwrap_or(0.0);
    let older_avg = mean(older).unwrap_or(recent_avg);

    if recent_avg > older_avg {
        SentimentTrend::Improving
    } else if recent_avg < older_avg {
        SentimentTrend::Deteriorating
    } else {
        SentimentTrend::Stable
    }
}

pub fn sentiment_insights(snapshot: &SentimentSnapshot) -> Vec<String> {
    if snapshot.news_count == 0 {
        return vec!["📰 No recent news coverage available".to_string()];
    }

    let mut insights = Vec::new();

    insights.push(
        match snapshot.signal {
            SentimentSignal::Positive => "😊 Strong positive sentiment in recent news",
            SentimentSignal::Negative => "😟 Strong negative sentiment in recent news",
            SentimentSignal::Neutral => "😐 Neutral news sentiment overall",
        }
        .to_string(),
    );

    match snapshot.trend {
        SentimentTrend::Improving => insights.push("📈 Sentiment showing recent improvement".to_string()),
        SentimentTrend::Deteriorating => insights.push("📉 Sentiment showing recent decline".to_string()),
        SentimentTrend::Stable => {}
    }

    if snapshot.news_count > HIGH_COVERAGE {
        insights.push("🔥 High media coverage indicates strong market interest".to_string());
    } else if snapshot.news_count < LOW_COVERAGE {
        insights.push("ℹ️ Limited news coverage may affect sentiment reliability".to_string());
    }

    let (pos, neg, neu) = (
        snapshot.positive_count,
        snapshot.negative_count,
        snapshot.neutral_count,
    );
    if pos > neg && pos > neu {
        insights.push(format!("✅ Majority positive news ({} positive articles)", pos));
    } else if neg > pos && neg > neu {
        insights.push(format!("❌ Majority negative news ({} negative articles)", neg));
    }

    insights
}
