pub mod orchestrator;
pub mod polarity;
pub mod risk;
pub mod sentiment;
pub mod technical;

#[cfg(test)]
mod risk_tests;

pub use orchestrator::{combined_confidence, compose, legacy_score, recommend, AnalysisOrchestrator};
pub use polarity::{LexiconPolarity, PolarityScorer};
pub use risk::RiskAssessor;
pub use sentiment::SentimentEngine;
pub use technical::TechnicalScorer;
