use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::signals::{generate_signals, Signal};
use crate::config::{AnalysisConfig, BacktestConfig, IndicatorConfig};
use crate::constants::backtest::{MIN_BARS, TRADING_DAYS_PER_YEAR};
use crate::error::BacktestError;
use crate::indicators::stats::{mean, pct_returns, round_to, std_sample};
use crate::indicators::IndicatorFrame;
use crate::models::PriceSeries;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub shares: u64,
    pub price: f64,
    /// Cost for a buy, proceeds for a sell
    pub value: f64,
}

/// Cash and whole shares held during one simulation run
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioState {
    cash: f64,
    shares: u64,
}

impl PortfolioState {
    pub fn new(cash: f64) -> Self {
        Self { cash, shares: 0 }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }

    /// Spend available cash on whole shares; `None` when not even one is affordable
    pub fn buy_max(&mut self, price: f64) -> Option<(u64, f64)> {
        if price <= 0.0 || self.cash < price {
            return None;
        }
        let mut shares = (self.cash / price).floor() as u64;
        while shares > 0 && shares as f64 * price > self.cash {
            shares -= 1;
        }
        if shares == 0 {
            return None;
        }
        let cost = shares as f64 * price;
        self.cash -= cost;
        self.shares += shares;
        Some((shares, cost))
    }

    /// Liquidate the whole position; `None` when flat
    pub fn sell_all(&mut self, price: f64) -> Option<(u64, f64)> {
        if self.shares == 0 {
            return None;
        }
        let shares = self.shares;
        let proceeds = shares as f64 * price;
        self.cash += proceeds;
        self.shares = 0;
        Some((shares, proceeds))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return_pct: f64,
    pub buy_hold_return_pct: f64,
    pub sharpe_ratio: f64,
    pub total_trades: usize,
    pub win_rate_pct: f64,
    pub trades: Vec<Trade>,
    /// Mark-to-market value after each bar's action
    pub portfolio_values: Vec<f64>,
    pub outperformed_buy_hold: bool,
}

impl BacktestResult {
    /// Capital untouched, no trades, no return
    pub fn zero_activity(initial_capital: f64) -> Self {
        Self {
            initial_capital,
            final_value: initial_capital,
            total_return_pct: 0.0,
            buy_hold_return_pct: 0.0,
            sharpe_ratio: 0.0,
            total_trades: 0,
            win_rate_pct: 0.0,
            trades: Vec::new(),
            portfolio_values: Vec::new(),
            outperformed_buy_hold: false,
        }
    }
}

/// Replays BUY/SELL/HOLD signals against a price series
#[derive(Clone, Debug, Default)]
pub struct Backtester {
    config: BacktestConfig,
    indicators: IndicatorConfig,
}

impl Backtester {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            config: config.backtest.clone(),
            indicators: config.indicators.clone(),
        }
    }

    pub fn initial_capital(&self) -> f64 {
        self.config.initial_capital
    }

    pub fn generate_signals(&self, series: &PriceSeries) -> Vec<Signal> {
        generate_signals(&IndicatorFrame::compute(series, &self.indicators))
    }

    /// Indicators, signals and simulation in one call
    pub fn run_strategy(&self, series: &PriceSeries) -> BacktestResult {
        let signals = self.generate_signals(series);
        self.run(series, &signals)
    }

    /// Invalid input degrades to the zero-activity result
    pub fn run(&self, series: &PriceSeries, signals: &[Signal]) -> BacktestResult {
        match self.try_simulate(series, signals) {
            Ok(result) => result,
            Err(e) => {
                warn!("[BACKTEST] {}, returning zero-activity result", e);
                BacktestResult::zero_activity(self.config.initial_capital)
            }
        }
    }

    pub fn try_simulate(&self, series: &PriceSeries, signals: &[Signal]) -> Result<BacktestResult, BacktestError> {
        if series.is_empty() {
            return Err(BacktestError::EmptySeries);
        }
        if series.len() < MIN_BARS {
            return Err(BacktestError::InsufficientBars {
                bars: series.len(),
                required: MIN_BARS,
            });
        }
        if signals.len() != series.len() {
            return Err(BacktestError::LengthMismatch {
                signals: signals.len(),
                bars: series.len(),
            });
        }

        let initial = self.config.initial_capital;
        let mut portfolio = PortfolioState::new(initial);
        let mut trades = Vec::new();
        let mut portfolio_values = Vec::with_capacity(series.len());

        for (bar, signal) in series.bars().iter().zip(signals) {
            let price = bar.close;
            let executed = match signal {
                Signal::Buy => portfolio.buy_max(price).map(|fill| (TradeAction::Buy, fill)),
                Signal::Sell => portfolio.sell_all(price).map(|fill| (TradeAction::Sell, fill)),
                Signal::Hold => None,
            };
            if let Some((action, (shares, value))) = executed {
                debug!("[BACKTEST] {} {:?} {} @ {:.2}", bar.date, action, shares, price);
                trades.push(Trade {
                    date: bar.date,
                    action,
                    shares,
                    price,
                    value,
                });
            }
            portfolio_values.push(portfolio.value(price));
        }

        let final_value = portfolio_values.last().copied().unwrap_or(initial);
        let total_return_pct = (final_value - initial) / initial * 100.0;

        let closes = series.closes();
        let first = closes[0];
        let last = closes[closes.len() - 1];
        let hold_shares = (initial / first).floor();
        let hold_value = hold_shares * last;
        let buy_hold_return_pct = (hold_value - initial) / initial * 100.0;

        let result = BacktestResult {
            initial_capital: initial,
            final_value: round_to(final_value, 2),
            total_return_pct: round_to(total_return_pct, 2),
            buy_hold_return_pct: round_to(buy_hold_return_pct, 2),
            sharpe_ratio: round_to(sharpe_ratio(&portfolio_values), 2),
            total_trades: trades.len(),
            win_rate_pct: round_to(win_rate_pct(&trades, initial), 2),
            outperformed_buy_hold: total_return_pct > buy_hold_return_pct,
            trades,
            portfolio_values,
        };

        info!(
            "[BACKTEST] {} bars, {} trades, return {:.2}% vs buy-and-hold {:.2}%",
            series.len(),
            result.total_trades,
            result.total_return_pct,
            result.buy_hold_return_pct
        );
        Ok(result)
    }
}

/// Annualized mean/stddev of bar-over-bar portfolio returns; 0 without dispersion
pub fn sharpe_ratio(portfolio_values: &[f64]) -> f64 {
    let returns = pct_returns(portfolio_values);
    match (mean(&returns), std_sample(&returns)) {
        (Some(m), Some(s)) if s > 0.0 => m / s * TRADING_DAYS_PER_YEAR.sqrt(),
        _ => 0.0,
    }
}

/// Share of SELL trades whose proceeds beat `initial_capital / number_of_buys`.
///
/// This baseline ignores each position's actual cost basis; see
/// `RoundTripSummary` for a per-position win rate.
pub fn win_rate_pct(trades: &[Trade], initial_capital: f64) -> f64 {
    let buys = trades.iter().filter(|t| t.action == TradeAction::Buy).count();
    let sells: Vec<&Trade> = trades.iter().filter(|t| t.action == TradeAction::Sell).collect();
    if buys == 0 {
        return 0.0;
    }
    let baseline = initial_capital / buys as f64;
    let wins = sells.iter().filter(|t| t.value > baseline).count();
    wins as f64 / sells.len().max(1) as f64 * 100.0
}
