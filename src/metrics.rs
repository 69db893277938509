use serde::Serialize;

use crate::format::NOT_AVAILABLE;
use crate::model::{Asset, AssetKind, Trade};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProfitGroup {
    pub count: usize,
    pub total: f64,
}

impl ProfitGroup {
    fn add(&mut self, profit: f64) {
        self.count += 1;
        self.total += profit;
    }
}

/// Aggregates over a trade list. Breakeven trades (`profit == 0`) are in neither group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TradeStats {
    pub trade_count: usize,
    pub total_profit: f64,
    pub profitable: ProfitGroup,
    pub unprofitable: ProfitGroup,
}

impl TradeStats {
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut stats = TradeStats::default();
        for trade in trades {
            stats.trade_count += 1;
            stats.total_profit += trade.profit;
            if trade.profit > 0.0 {
                stats.profitable.add(trade.profit);
            } else if trade.profit < 0.0 {
                stats.unprofitable.add(trade.profit);
            }
        }
        stats
    }

    pub fn breakeven_count(&self) -> usize {
        self.trade_count - self.profitable.count - self.unprofitable.count
    }

    /// Share of profitable trades in percent; `None` for an empty list.
    pub fn success_rate(&self) -> Option<f64> {
        if self.trade_count == 0 {
            return None;
        }
        Some(self.profitable.count as f64 / self.trade_count as f64 * 100.0)
    }

    pub fn success_rate_label(&self) -> String {
        match self.success_rate() {
            Some(rate) => format!("{rate:.1}"),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioMix {
    pub stocks: usize,
    pub crypto: usize,
}

impl PortfolioMix {
    pub fn from_assets(assets: &[Asset]) -> Self {
        assets
            .iter()
            .fold(PortfolioMix::default(), |mut mix, asset| {
                match asset.kind {
                    AssetKind::Stock => mix.stocks += 1,
                    AssetKind::Crypto => mix.crypto += 1,
                }
                mix
            })
    }

    pub fn total(&self) -> usize {
        self.stocks + self.crypto
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub asset_count: usize,
    pub mix: PortfolioMix,
    pub prediction_count: usize,
    pub trades: TradeStats,
    pub breakeven_trades: usize,
    pub success_rate: Option<f64>,
    pub success_rate_label: String,
}

impl DashboardSummary {
    pub fn build(assets: &[Asset], prediction_count: usize, trades: &[Trade]) -> Self {
        let stats = TradeStats::from_trades(trades);
        DashboardSummary {
            asset_count: assets.len(),
            mix: PortfolioMix::from_assets(assets),
            prediction_count,
            trades: stats,
            breakeven_trades: stats.breakeven_count(),
            success_rate: stats.success_rate(),
            success_rate_label: stats.success_rate_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TradeSide;
    use crate::sample_data;
    use chrono::NaiveDate;

    fn trade_with_profit(profit: f64) -> Trade {
        Trade {
            id: "t".to_string(),
            asset: "ETH".to_string(),
            action: TradeSide::Sell,
            price: 100.0,
            quantity: 1.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            profit,
        }
    }

    #[test]
    fn sample_trades_total_and_success_rate() {
        let stats = TradeStats::from_trades(sample_data::trades());
        assert!((stats.total_profit - 1323.45).abs() < 1e-9);
        assert_eq!(format!("{:.2}", stats.total_profit), "1323.45");
        assert_eq!(stats.profitable.count, 4);
        assert_eq!(stats.unprofitable.count, 1);
        assert_eq!(stats.success_rate_label(), "80.0");
    }

    #[test]
    fn sample_partition_sums() {
        let stats = TradeStats::from_trades(sample_data::trades());
        assert_eq!(format!("{:.2}", stats.profitable.total), "1552.05");
        assert_eq!(format!("{:.2}", stats.unprofitable.total), "-228.60");
    }

    #[test]
    fn empty_trade_list_has_defined_metrics() {
        let stats = TradeStats::from_trades(&[]);
        assert_eq!(stats.total_profit, 0.0);
        assert_eq!(stats.success_rate(), None);
        assert_eq!(stats.success_rate_label(), "--");
        assert_eq!(stats.breakeven_count(), 0);
    }

    #[test]
    fn breakeven_trades_belong_to_neither_group() {
        let trades = vec![
            trade_with_profit(0.0),
            trade_with_profit(10.0),
            trade_with_profit(-5.0),
        ];
        let stats = TradeStats::from_trades(&trades);
        assert_eq!(stats.profitable, ProfitGroup { count: 1, total: 10.0 });
        assert_eq!(stats.unprofitable, ProfitGroup { count: 1, total: -5.0 });
        assert_eq!(stats.breakeven_count(), 1);
        assert_eq!(stats.success_rate_label(), "33.3");
    }

    #[test]
    fn total_profit_is_order_independent() {
        let mut trades = sample_data::trades().to_vec();
        let forward = TradeStats::from_trades(&trades).total_profit;
        trades.reverse();
        let backward = TradeStats::from_trades(&trades).total_profit;
        trades.rotate_left(2);
        let rotated = TradeStats::from_trades(&trades).total_profit;
        assert!((forward - backward).abs() < 1e-9);
        assert!((forward - rotated).abs() < 1e-9);
    }

    #[test]
    fn summary_counts_portfolio_mix() {
        let summary = DashboardSummary::build(
            sample_data::assets(),
            sample_data::predictions().len(),
            sample_data::trades(),
        );
        assert_eq!(summary.asset_count, 6);
        assert_eq!(summary.mix, PortfolioMix { stocks: 3, crypto: 3 });
        assert_eq!(summary.mix.total(), summary.asset_count);
        assert_eq!(summary.prediction_count, 4);
        assert_eq!(summary.success_rate_label, "80.0");
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["trades"]["profitable"]["count"], 4);
    }
}
