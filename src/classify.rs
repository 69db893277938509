use ratatui::style::{Color, Modifier, Style};

use crate::model::{Signal, TradeSide};

/// Presentation intent of an action tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Bullish,
    Bearish,
    Neutral,
    Unstyled,
}

/// Both style intents for one action: plain text colour and badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStyle {
    pub text: Style,
    pub badge: Style,
}

impl ActionCategory {
    /// Total over any tag; tags match exactly, anything else is `Unstyled`.
    pub fn classify(tag: &str) -> ActionCategory {
        match tag {
            "buy" => ActionCategory::Bullish,
            "sell" => ActionCategory::Bearish,
            "hold" => ActionCategory::Neutral,
            _ => ActionCategory::Unstyled,
        }
    }

    pub fn text_color(&self) -> Color {
        match self {
            ActionCategory::Bullish => Color::Green,
            ActionCategory::Bearish => Color::Red,
            ActionCategory::Neutral => Color::Yellow,
            ActionCategory::Unstyled => Color::Gray,
        }
    }

    pub fn badge_style(&self) -> Style {
        let tinted = |fg: Color, bg: Color| {
            Style::default()
                .fg(fg)
                .bg(bg)
                .add_modifier(Modifier::BOLD)
        };
        match self {
            ActionCategory::Bullish => tinted(Color::LightGreen, Color::Rgb(16, 60, 32)),
            ActionCategory::Bearish => tinted(Color::LightRed, Color::Rgb(70, 20, 24)),
            ActionCategory::Neutral => tinted(Color::LightYellow, Color::Rgb(70, 60, 10)),
            ActionCategory::Unstyled => Style::default(),
        }
    }

    pub fn style(&self) -> ActionStyle {
        ActionStyle {
            text: Style::default().fg(self.text_color()),
            badge: self.badge_style(),
        }
    }
}

impl From<Signal> for ActionCategory {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Buy => ActionCategory::Bullish,
            Signal::Sell => ActionCategory::Bearish,
            Signal::Hold => ActionCategory::Neutral,
        }
    }
}

impl From<TradeSide> for ActionCategory {
    fn from(side: TradeSide) -> Self {
        match side {
            TradeSide::Buy => ActionCategory::Bullish,
            TradeSide::Sell => ActionCategory::Bearish,
        }
    }
}

pub fn signal_label(signal: Signal) -> &'static str {
    match signal {
        Signal::Buy => "BUY",
        Signal::Sell => "SELL",
        Signal::Hold => "HOLD",
    }
}

pub fn signal_icon(signal: Signal) -> &'static str {
    match signal {
        Signal::Buy => "▲",
        Signal::Sell => "▼",
        Signal::Hold => "‖",
    }
}

pub fn side_label(side: TradeSide) -> &'static str {
    match side {
        TradeSide::Buy => "BUY",
        TradeSide::Sell => "SELL",
    }
}

pub fn side_arrow(side: TradeSide) -> &'static str {
    match side {
        TradeSide::Buy => "↗",
        TradeSide::Sell => "↘",
    }
}

/// Colour for signed amounts; zero gets its own neutral treatment.
pub fn signed_color(value: f64) -> Color {
    if value > 0.0 {
        Color::Green
    } else if value < 0.0 {
        Color::Red
    } else {
        Color::Gray
    }
}
