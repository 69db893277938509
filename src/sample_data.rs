use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::model::{Asset, AssetKind, Prediction, Signal, Trade, TradeSide, format_volume};

/// Unread count shown on the (inert) notification badge.
pub const NOTIFICATION_COUNT: usize = 3;
/// Month-over-month profit note shown under the total profit card.
pub const MONTHLY_PROFIT_CHANGE_PERCENT: f64 = 12.4;

static ASSETS: Lazy<Vec<Asset>> = Lazy::new(|| {
    vec![
        asset("1", "Apple Inc.", "AAPL", 178.25, 2.45, 1.39, 52_300_000.0),
        asset("2", "Tesla", "TSLA", 242.84, -5.12, -2.07, 98_700_000.0),
        asset("3", "Bitcoin", "BTC", 43250.00, 1250.00, 2.98, 28_500_000_000.0),
        asset("4", "Ethereum", "ETH", 2285.50, -45.30, -1.94, 12_800_000_000.0),
        asset("5", "Microsoft", "MSFT", 378.91, 4.23, 1.13, 24_100_000.0),
        asset("6", "Solana", "SOL", 98.75, 8.45, 9.35, 2_100_000_000.0),
    ]
});

static PREDICTIONS: Lazy<Vec<Prediction>> = Lazy::new(|| {
    vec![
        prediction(
            "1",
            "BTC",
            Signal::Buy,
            87,
            45000.0,
            43250.0,
            "Strong technical pattern, rising buy volume",
            "2 hours ago",
        ),
        prediction(
            "2",
            "AAPL",
            Signal::Hold,
            72,
            185.0,
            178.25,
            "Consolidation ahead of the quarterly report",
            "4 hours ago",
        ),
        prediction(
            "3",
            "SOL",
            Signal::Buy,
            91,
            115.0,
            98.75,
            "Resistance breakout, strong momentum",
            "1 hour ago",
        ),
        prediction(
            "4",
            "TSLA",
            Signal::Sell,
            68,
            230.0,
            242.84,
            "Overbought, weak delivery demand",
            "6 hours ago",
        ),
    ]
});

static TRADES: Lazy<Vec<Trade>> = Lazy::new(|| {
    vec![
        trade("1", "BTC", TradeSide::Buy, 41000.0, 0.5, (2024, 1, 15), 1125.0),
        trade("2", "AAPL", TradeSide::Buy, 170.0, 10.0, (2024, 1, 10), 82.5),
        trade("3", "ETH", TradeSide::Sell, 2400.0, 2.0, (2024, 1, 8), -228.6),
        trade("4", "MSFT", TradeSide::Buy, 365.0, 5.0, (2024, 1, 5), 69.55),
        trade("5", "SOL", TradeSide::Buy, 85.0, 20.0, (2024, 1, 12), 275.0),
    ]
});

/// Borrowed view over the three record sets shown by the dashboard.
#[derive(Clone, Copy, Debug)]
pub struct Records<'a> {
    pub assets: &'a [Asset],
    pub predictions: &'a [Prediction],
    pub trades: &'a [Trade],
}

impl Records<'static> {
    pub fn sample() -> Self {
        Records {
            assets: assets(),
            predictions: predictions(),
            trades: trades(),
        }
    }
}

pub fn assets() -> &'static [Asset] {
    &ASSETS
}

pub fn predictions() -> &'static [Prediction] {
    &PREDICTIONS
}

pub fn trades() -> &'static [Trade] {
    &TRADES
}

fn asset(
    id: &str,
    name: &str,
    symbol: &str,
    price: f64,
    change: f64,
    change_percent: f64,
    raw_volume: f64,
) -> Asset {
    Asset {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        price,
        change,
        change_percent,
        volume: format_volume(raw_volume),
        kind: AssetKind::for_symbol(symbol),
    }
}

#[allow(clippy::too_many_arguments)]
fn prediction(
    id: &str,
    asset: &str,
    action: Signal,
    confidence: u8,
    target_price: f64,
    current_price: f64,
    reason: &str,
    timestamp: &str,
) -> Prediction {
    Prediction {
        id: id.to_string(),
        asset: asset.to_string(),
        action,
        confidence,
        target_price,
        current_price,
        reason: reason.to_string(),
        timestamp: timestamp.to_string(),
    }
}

fn trade(
    id: &str,
    asset: &str,
    action: TradeSide,
    price: f64,
    quantity: f64,
    (year, month, day): (i32, u32, u32),
    profit: f64,
) -> Trade {
    let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    Trade {
        id: id.to_string(),
        asset: asset.to_string(),
        action,
        price,
        quantity,
        date,
        profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_assets_are_well_formed() {
        assert_eq!(assets().len(), 6);
        assert!(assets().iter().all(Asset::is_well_formed));
    }

    #[test]
    fn sample_volumes_match_display_labels() {
        let volumes: Vec<&str> = assets().iter().map(|asset| asset.volume.as_str()).collect();
        assert_eq!(
            volumes,
            vec!["52.3M", "98.7M", "$28.5B", "$12.8B", "24.1M", "$2.1B"]
        );
    }

    #[test]
    fn sample_kinds_split_evenly() {
        let crypto = assets()
            .iter()
            .filter(|asset| asset.kind == AssetKind::Crypto)
            .count();
        assert_eq!(crypto, 3);
    }

    #[test]
    fn sample_predictions_have_valid_confidence() {
        assert_eq!(predictions().len(), 4);
        assert!(predictions().iter().all(|p| p.confidence <= 100));
    }

    #[test]
    fn sample_trades_keep_literal_dates() {
        assert_eq!(trades().len(), 5);
        assert_eq!(
            trades()[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }
}
