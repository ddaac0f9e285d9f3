//! Signal generation and portfolio simulation over a price series.

pub mod engine;
pub mod report;
pub mod signals;


pub use engine::{sharpe_ratio, win_rate_pct, BacktestResult, Backtester, PortfolioState, Trade, TradeAction};
pub use report::{ClosedTrade, OpenPosition, RoundTripSummary};
pub use signals::{generate_signals, Signal};
