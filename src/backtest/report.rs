use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::engine::{BacktestResult, Trade, TradeAction};

/// A BUY matched with the SELL that closed it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    pub buy_price: f64,
    pub sell_price: f64,
    pub shares: u64,
    pub pnl: f64,
    pub pnl_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub buy_date: NaiveDate,
    pub buy_price: f64,
    pub shares: u64,
}

/// Per-position performance of a simulation's trade log
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundTripSummary {
    pub history: Vec<ClosedTrade>,
    pub open_position: Option<OpenPosition>,

    pub total_closed_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_pct: f64,

    pub total_profit: f64,
    pub total_loss: f64,
    pub total_realized_pnl: f64,
    pub avg_profit_per_trade: f64,

    /// Gross profit over gross loss; 0 with no losing trades
    pub profit_factor: f64,
}

impl RoundTripSummary {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut summary = Self::default();
        let mut open: Option<OpenPosition> = None;

        for trade in trades {
            match trade.action {
                TradeAction::Buy => {
                    // Leftover cash can add to an open position at a lower price
                    open = Some(match open.take() {
                        Some(pos) => {
                            let shares = pos.shares + trade.shares;
                            OpenPosition {
                                buy_date: pos.buy_date,
                                buy_price: (pos.buy_price * pos.shares as f64 + trade.value) / shares as f64,
                                shares,
                            }
                        }
                        None => OpenPosition {
                            buy_date: trade.date,
                            buy_price: trade.price,
                            shares: trade.shares,
                        },
                    });
                }
                TradeAction::Sell => {
                    let Some(pos) = open.take() else { continue };
                    let pnl = (trade.price - pos.buy_price) * trade.shares as f64;
                    summary.history.push(ClosedTrade {
                        buy_date: pos.buy_date,
                        sell_date: trade.date,
                        buy_price: pos.buy_price,
                        sell_price: trade.price,
                        shares: trade.shares,
                        pnl,
                        pnl_percent: (trade.price - pos.buy_price) / pos.buy_price * 100.0,
                    });
                }
            }
        }
        summary.open_position = open;

        for closed in &summary.history {
            if closed.pnl > 0.0 {
                summary.winning_trades += 1;
                summary.total_profit += closed.pnl;
            } else {
                summary.losing_trades += 1;
                summary.total_loss += -closed.pnl;
            }
        }
        summary.total_closed_trades = summary.history.len();
        summary.total_realized_pnl = summary.total_profit - summary.total_loss;

        if summary.total_closed_trades > 0 {
            let n = summary.total_closed_trades as f64;
            summary.win_rate_pct = summary.winning_trades as f64 / n * 100.0;
            summary.avg_profit_per_trade = summary.total_realized_pnl / n;
        }
        if summary.total_loss > 0.0 {
            summary.profit_factor = summary.total_profit / summary.total_loss;
        }

        summary
    }
}

impl BacktestResult {
    pub fn summary(&self) -> RoundTripSummary {
        RoundTripSummary::from_trades(&self.trades)
    }
}
