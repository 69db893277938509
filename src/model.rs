use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const CRYPTO_SYMBOLS: [&str; 10] = [
    "BTC", "ETH", "SOL", "BNB", "XRP", "ADA", "DOGE", "AVAX", "MATIC", "DOT",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Stock,
    Crypto,
}

impl AssetKind {
    /// Tickers outside the known crypto list are treated as stocks.
    pub fn for_symbol(symbol: &str) -> AssetKind {
        let upper = symbol.trim().to_ascii_uppercase();
        if CRYPTO_SYMBOLS.contains(&upper.as_str()) {
            AssetKind::Crypto
        } else {
            AssetKind::Stock
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            AssetKind::Stock => "STK",
            AssetKind::Crypto => "₿",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: String,
    pub kind: AssetKind,
}

impl Asset {
    pub fn is_gaining(&self) -> bool {
        self.change >= 0.0
    }

    /// `change` and `change_percent` must agree in sign (zero counts as its own sign).
    pub fn is_well_formed(&self) -> bool {
        sign_of(self.change) == sign_of(self.change_percent)
    }
}

fn sign_of(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Formats a raw traded volume the way asset cards display it.
pub fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000_000.0 {
        format!("${:.1}B", volume / 1_000_000_000.0)
    } else if volume >= 1_000_000.0 {
        format!("{:.1}M", volume / 1_000_000.0)
    } else {
        crate::format::group_thousands(&format!("{:.0}", volume.max(0.0)))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Signal::Buy => "buy",
            Signal::Sell => "sell",
            Signal::Hold => "hold",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_tag(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub id: String,
    pub asset: String,
    pub action: Signal,
    pub confidence: u8,
    pub target_price: f64,
    pub current_price: f64,
    pub reason: String,
    pub timestamp: String,
}

impl Prediction {
    /// Confidence capped at 100, as shown next to the gauge.
    pub fn confidence_percent(&self) -> u8 {
        self.confidence.min(100)
    }

    pub fn confidence_ratio(&self) -> f64 {
        f64::from(self.confidence_percent()) / 100.0
    }

    pub fn expected_move_percent(&self) -> Option<f64> {
        if self.current_price == 0.0 || !self.current_price.is_finite() {
            return None;
        }
        Some((self.target_price - self.current_price) / self.current_price * 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub id: String,
    pub asset: String,
    pub action: TradeSide,
    pub price: f64,
    pub quantity: f64,
    pub date: NaiveDate,
    pub profit: f64,
}

impl Trade {
    pub fn cost_basis(&self) -> f64 {
        self.price * self.quantity
    }

    /// Profit relative to the cost basis, in percent. `None` for a zero-cost trade.
    pub fn return_percent(&self) -> Option<f64> {
        let basis = self.cost_basis();
        if basis == 0.0 || !basis.is_finite() {
            return None;
        }
        Some(self.profit / basis * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(price: f64, quantity: f64, profit: f64) -> Trade {
        Trade {
            id: "t".to_string(),
            asset: "BTC".to_string(),
            action: TradeSide::Buy,
            price,
            quantity,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            profit,
        }
    }

    #[test]
    fn return_percent_uses_cost_basis() {
        let value = trade(41000.0, 0.5, 1125.0).return_percent().unwrap();
        assert_eq!(format!("{value:.2}"), "5.49");
    }

    #[test]
    fn zero_cost_trade_has_no_return_percent() {
        assert!(trade(0.0, 3.0, 10.0).return_percent().is_none());
        assert!(trade(120.0, 0.0, -4.0).return_percent().is_none());
    }

    #[test]
    fn crypto_symbols_are_recognised_case_insensitively() {
        assert_eq!(AssetKind::for_symbol("btc"), AssetKind::Crypto);
        assert_eq!(AssetKind::for_symbol(" MATIC "), AssetKind::Crypto);
        assert_eq!(AssetKind::for_symbol("AAPL"), AssetKind::Stock);
    }

    #[test]
    fn volume_formatting_matches_card_labels() {
        assert_eq!(format_volume(28_500_000_000.0), "$28.5B");
        assert_eq!(format_volume(52_300_000.0), "52.3M");
        assert_eq!(format_volume(987_654.0), "987,654");
        assert_eq!(format_volume(0.0), "0");
    }

    #[test]
    fn sign_mismatch_is_not_well_formed() {
        let mut asset = Asset {
            id: "x".to_string(),
            name: "X".to_string(),
            symbol: "X".to_string(),
            price: 10.0,
            change: 1.0,
            change_percent: 10.0,
            volume: "1M".to_string(),
            kind: AssetKind::Stock,
        };
        assert!(asset.is_well_formed());
        asset.change_percent = -10.0;
        assert!(!asset.is_well_formed());
        asset.change = 0.0;
        asset.change_percent = 0.0;
        assert!(asset.is_well_formed());
        assert!(asset.is_gaining());
    }

    #[test]
    fn confidence_ratio_is_clamped() {
        let mut prediction = Prediction {
            id: "p".to_string(),
            asset: "SOL".to_string(),
            action: Signal::Buy,
            confidence: 91,
            target_price: 115.0,
            current_price: 98.75,
            reason: String::new(),
            timestamp: String::new(),
        };
        assert!((prediction.confidence_ratio() - 0.91).abs() < 1e-9);
        prediction.confidence = 250;
        assert_eq!(prediction.confidence_percent(), 100);
        assert_eq!(prediction.confidence_ratio(), 1.0);
        prediction.current_price = 0.0;
        assert!(prediction.expected_move_percent().is_none());
    }
}
