pub mod market;
pub mod snapshot;

pub use market::{NewsArticle, PriceBar, PriceSeries};
pub use snapshot::*;

#[cfg(test)]
mod models_tests;
