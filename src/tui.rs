use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Tabs, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::classify::{
    ActionCategory, side_arrow, side_label, signal_icon, signal_label, signed_color,
};
use crate::command::Command;
use crate::config::ConfiguredTimeZone;
use crate::format::{
    ColumnAlign, NOT_AVAILABLE, clamp_index, format_column_value, format_money,
    format_optional_percent, format_plain, format_signed_percent, format_signed_usd,
    format_trade_date, format_usd, visible_range,
};
use crate::metrics::{PortfolioMix, TradeStats};
use crate::model::{Asset, Prediction, Trade};
use crate::sample_data::{MONTHLY_PROFIT_CHANGE_PERCENT, NOTIFICATION_COUNT, Records};
use crate::view::{ViewController, ViewTab};

const ACCENT: Color = Color::LightCyan;
const MUTED: Color = Color::DarkGray;
const STAT_CARD_HEIGHT: u16 = 5;
const ASSET_CARD_HEIGHT: u16 = 6;
const PREDICTION_CARD_HEIGHT: u16 = 10;
const CONFIDENCE_BAR_WIDTH: usize = 20;
const CLOCK_FORMAT: &str = "%H:%M:%S";

pub struct TuiApp<'a> {
    records: Records<'a>,
    views: ViewController,
    timezone: ConfiguredTimeZone,
    tick_rate: Duration,
    clock: String,
    status_message: Option<String>,
    status_visible_until: Option<Instant>,
    exit_confirmation: bool,
    dirty: bool,
    asset_row_offset: usize,
    asset_max_offset: usize,
    prediction_row_offset: usize,
    prediction_max_offset: usize,
    selected_trade: usize,
}

impl<'a> TuiApp<'a> {
    pub fn new(
        records: Records<'a>,
        views: ViewController,
        timezone: ConfiguredTimeZone,
        tick_rate: Duration,
    ) -> TuiApp<'a> {
        let clock = timezone.now_label(CLOCK_FORMAT);
        TuiApp {
            records,
            views,
            timezone,
            tick_rate,
            clock,
            status_message: None,
            status_visible_until: None,
            exit_confirmation: false,
            dirty: true,
            asset_row_offset: 0,
            asset_max_offset: 0,
            prediction_row_offset: 0,
            prediction_max_offset: 0,
            selected_trade: 0,
        }
    }

    pub fn active_view(&self) -> ViewTab {
        self.views.active()
    }

    pub fn dispose(&self) {
        ratatui::restore();
    }

    pub async fn run(&mut self, rx: &mut broadcast::Receiver<Command>) -> Result<()> {
        color_eyre::install()?;
        let mut terminal = ratatui::init();
        let mut input_tick = tokio::time::interval(self.tick_rate);
        terminal.draw(|frame| self.render(frame))?;
        self.dirty = false;
        loop {
            tokio::select! {
                biased;
                _ = input_tick.tick() => {
                    if self.poll_input()? {
                        return Ok(());
                    }
                    self.refresh_clock();
                    self.clear_status_if_allowed();
                    if self.dirty {
                        terminal.draw(|frame| self.render(frame))?;
                        self.dirty = false;
                    }
                }
                result = rx.recv() => {
                    match result {
                        Ok(Command::ViewChanged { from, to }) => {
                            debug!(%from, %to, "redrawing after view change");
                            terminal.draw(|frame| self.render(frame))?;
                            self.dirty = false;
                        }
                        Ok(Command::Exit) => break,
                        Err(broadcast::error::RecvError::Closed) => break,
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    }
                }
            }
        }
        Ok(())
    }

    /// Draws one frame off-screen and returns it as plain text.
    pub fn render_snapshot(&mut self, width: u16, height: u16) -> Result<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height))?;
        terminal.draw(|frame| self.render(frame))?;
        Ok(buffer_to_string(terminal.backend().buffer()))
    }

    fn refresh_clock(&mut self) {
        let clock = self.timezone.now_label(CLOCK_FORMAT);
        if clock != self.clock {
            self.clock = clock;
            self.dirty = true;
        }
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_visible_until = Some(Instant::now() + Duration::from_secs(3));
        self.dirty = true;
    }

    fn clear_status_if_allowed(&mut self) {
        if self.status_message.is_none() || self.exit_confirmation {
            return;
        }
        if let Some(visible_until) = self.status_visible_until {
            if Instant::now() < visible_until {
                return;
            }
        }
        self.status_message = None;
        self.status_visible_until = None;
        self.dirty = true;
    }

    fn poll_input(&mut self) -> Result<bool> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if self.handle_key_event(key)? {
                        return Ok(true);
                    }
                }
                Event::Resize(_, _) => self.dirty = true,
                _ => {}
            }
        }
        Ok(false)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        if self.exit_confirmation {
            return self.handle_exit_confirmation_key(key);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                self.prompt_exit_confirmation();
                return Ok(false);
            }
        }
        self.dirty = true;
        let before = self.views.active();
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.prompt_exit_confirmation();
            }
            KeyCode::Char('1') | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.views.select(ViewTab::Dashboard);
            }
            KeyCode::Char('2') | KeyCode::Char('p') | KeyCode::Char('P') => {
                self.views.select(ViewTab::Predictions);
            }
            KeyCode::Char('3') | KeyCode::Char('h') | KeyCode::Char('H') => {
                self.views.select(ViewTab::History);
            }
            KeyCode::Tab | KeyCode::Right => {
                self.views.next();
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.views.previous();
            }
            KeyCode::Up | KeyCode::Char('k') => self.scroll(-1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll(1),
            KeyCode::Home => self.scroll(isize::MIN),
            KeyCode::End => self.scroll(isize::MAX),
            KeyCode::Char('r') | KeyCode::Char('R') => self.press_refresh(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.press_filter(),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                info!("settings requested");
                self.set_status_message("Settings are not available in this build");
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                info!("notifications requested");
                self.set_status_message(format!("{NOTIFICATION_COUNT} unread notifications"));
            }
            _ => {}
        }
        let after = self.views.active();
        if after != before {
            self.set_status_message(format!("Showing {}", after.title()));
        }
        Ok(false)
    }

    fn prompt_exit_confirmation(&mut self) {
        if self.exit_confirmation {
            return;
        }
        self.exit_confirmation = true;
        self.dirty = true;
        self.set_status_message("Quit? Y/Enter confirm · N/Esc cancel");
    }

    fn handle_exit_confirmation_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if let KeyCode::Char('c') = key.code {
                self.exit_confirmation = false;
                return Ok(true);
            }
        }
        match key.code {
            KeyCode::Char('y')
            | KeyCode::Char('Y')
            | KeyCode::Char('q')
            | KeyCode::Char('Q')
            | KeyCode::Enter => {
                self.exit_confirmation = false;
                Ok(true)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.exit_confirmation = false;
                self.set_status_message("Quit cancelled");
                Ok(false)
            }
            _ => Ok(false),
        }
    }

    fn scroll(&mut self, delta: isize) {
        match self.views.active() {
            ViewTab::Dashboard => {
                self.asset_row_offset =
                    shift_index(self.asset_row_offset, delta, self.asset_max_offset);
            }
            ViewTab::Predictions => {
                self.prediction_row_offset =
                    shift_index(self.prediction_row_offset, delta, self.prediction_max_offset);
            }
            ViewTab::History => {
                let last = self.records.trades.len().saturating_sub(1);
                self.selected_trade = shift_index(self.selected_trade, delta, last);
            }
        }
    }

    fn press_refresh(&mut self) {
        info!(view = %self.views.active(), "refresh requested");
        if self.views.active() == ViewTab::Predictions {
            self.set_status_message("Predictions are sample data; nothing to refresh");
        } else {
            self.set_status_message("Refresh is available on the Predictions tab");
        }
    }

    fn press_filter(&mut self) {
        info!(view = %self.views.active(), "filter requested");
        if self.views.active() == ViewTab::Dashboard {
            self.set_status_message("Filtering is not available for sample assets");
        } else {
            self.set_status_message("Filter is available on the Dashboard tab");
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(area);
        self.render_header(frame, chunks[0]);
        self.render_tabs(frame, chunks[1]);
        match self.views.active() {
            ViewTab::Dashboard => self.render_dashboard(frame, chunks[2]),
            ViewTab::Predictions => self.render_predictions(frame, chunks[2]),
            ViewTab::History => self.render_history(frame, chunks[2]),
        }
        self.render_status(frame, chunks[3]);
        if self.exit_confirmation {
            self.render_exit_confirmation(frame);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered();
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let title = Line::from(vec![
            Span::styled(
                "◆ TradeAI",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Smart market analysis", Style::default().fg(MUTED)),
        ]);
        let affordances = Line::from(vec![
            Span::raw(format!("{} ({})", self.clock, self.timezone.label())),
            Span::raw("  ⚙ Settings  Alerts "),
            Span::styled(
                format!(" {NOTIFICATION_COUNT} "),
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        let right_width = (affordances.width() as u16).min(inner.width);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(right_width)])
            .split(inner);
        frame.render_widget(Paragraph::new(title), chunks[0]);
        frame.render_widget(
            Paragraph::new(affordances).alignment(Alignment::Right),
            chunks[1],
        );
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles = ViewTab::ALL
            .iter()
            .map(|tab| format!("{} {}", tab.index() + 1, tab.title()));
        let tabs = Tabs::new(titles)
            .select(self.views.active().index())
            .divider("│")
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::bordered().title("Views"));
        frame.render_widget(tabs, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.status_message {
            Some(message) => Line::styled(message.clone(), Style::default().fg(Color::Yellow)),
            None => Line::styled(
                "1/2/3 switch view · Tab/←→ cycle · ↑↓ scroll · r refresh · f filter · q quit",
                Style::default().fg(MUTED),
            ),
        };
        let status = Paragraph::new(line)
            .alignment(Alignment::Left)
            .block(Block::bordered().title("Status"));
        frame.render_widget(status, area);
    }

    fn render_exit_confirmation(&self, frame: &mut Frame) {
        let area = frame.area();
        if area.width < 24 || area.height < 5 {
            return;
        }
        let popup_width = area.width.saturating_sub(20).clamp(28, 44);
        let popup_height = 5;
        let left = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let top = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup = Rect::new(left, top, popup_width, popup_height);
        let lines = vec![
            Line::from(Span::styled(
                "Quit the dashboard?",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("Y/Enter confirm · N/Esc cancel"),
            Line::from("Ctrl+C quits immediately"),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .block(Block::bordered().title("Quit"));
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }

    fn render_dashboard(&mut self, frame: &mut Frame, area: Rect) {
        let stats = TradeStats::from_trades(self.records.trades);
        let mix = PortfolioMix::from_assets(self.records.assets);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(STAT_CARD_HEIGHT), Constraint::Min(0)])
            .split(area);
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[0]);

        render_stat_card(
            frame,
            cards[0],
            "Total assets",
            Span::raw(self.records.assets.len().to_string()),
            format!("{} stocks • {} crypto", mix.stocks, mix.crypto),
        );
        render_stat_card(
            frame,
            cards[1],
            "Total profit",
            Span::styled(
                format_money(stats.total_profit),
                Style::default().fg(signed_color(stats.total_profit)),
            ),
            format!(
                "{} this month",
                format_signed_percent(MONTHLY_PROFIT_CHANGE_PERCENT)
            ),
        );
        let success_label = match stats.success_rate() {
            Some(_) => format!("{}%", stats.success_rate_label()),
            None => NOT_AVAILABLE.to_string(),
        };
        render_stat_card(
            frame,
            cards[2],
            "Success rate",
            Span::raw(success_label),
            format!(
                "{} of {} trades in profit",
                stats.profitable.count, stats.trade_count
            ),
        );
        self.render_asset_grid(frame, chunks[1]);
    }

    fn render_asset_grid(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(" Portfolio assets ")
            .title_top(Line::from(" [f] Filter ").right_aligned());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let assets = self.records.assets;
        if assets.is_empty() {
            frame.render_widget(Paragraph::new("No assets"), inner);
            return;
        }
        let columns = grid_columns(inner.width, &[(120, 3), (80, 2)]);
        let total_rows = assets.len().div_ceil(columns);
        let visible_rows = (inner.height / ASSET_CARD_HEIGHT).max(1) as usize;
        self.asset_max_offset = total_rows.saturating_sub(visible_rows);
        self.asset_row_offset = self.asset_row_offset.min(self.asset_max_offset);
        let offset = self.asset_row_offset;
        for (row_idx, row) in assets
            .chunks(columns)
            .enumerate()
            .skip(offset)
            .take(visible_rows)
        {
            let Some(row_area) = grid_row(inner, row_idx - offset, ASSET_CARD_HEIGHT) else {
                break;
            };
            let cells = split_columns(row_area, columns);
            for (asset, cell) in row.iter().zip(cells.iter()) {
                render_asset_card(frame, *cell, asset);
            }
        }
    }

    fn render_predictions(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .title(" AI Predictions ")
            .title_top(Line::from(" [r] Refresh ").right_aligned());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(
            Paragraph::new(Line::styled(
                "Recommendations based on analysis of 1000+ factors",
                Style::default().fg(MUTED),
            )),
            chunks[0],
        );
        let grid = chunks[1];
        let predictions = self.records.predictions;
        if predictions.is_empty() {
            frame.render_widget(Paragraph::new("No predictions"), grid);
            return;
        }
        let columns = grid_columns(grid.width, &[(100, 2)]);
        let total_rows = predictions.len().div_ceil(columns);
        let visible_rows = (grid.height / PREDICTION_CARD_HEIGHT).max(1) as usize;
        self.prediction_max_offset = total_rows.saturating_sub(visible_rows);
        self.prediction_row_offset = self.prediction_row_offset.min(self.prediction_max_offset);
        let offset = self.prediction_row_offset;
        for (row_idx, row) in predictions
            .chunks(columns)
            .enumerate()
            .skip(offset)
            .take(visible_rows)
        {
            let Some(row_area) = grid_row(grid, row_idx - offset, PREDICTION_CARD_HEIGHT) else {
                break;
            };
            let cells = split_columns(row_area, columns);
            for (prediction, cell) in row.iter().zip(cells.iter()) {
                render_prediction_card(frame, *cell, prediction);
            }
        }
    }

    fn render_history(&mut self, frame: &mut Frame, area: Rect) {
        let stats = TradeStats::from_trades(self.records.trades);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(STAT_CARD_HEIGHT), Constraint::Min(0)])
            .split(area);
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
            .split(chunks[0]);
        render_stat_card(
            frame,
            cards[0],
            "Profitable trades",
            Span::styled(
                stats.profitable.count.to_string(),
                Style::default().fg(Color::Green),
            ),
            format_signed_usd(stats.profitable.total),
        );
        render_stat_card(
            frame,
            cards[1],
            "Unprofitable trades",
            Span::styled(
                stats.unprofitable.count.to_string(),
                Style::default().fg(Color::Red),
            ),
            format_money(stats.unprofitable.total),
        );
        self.render_trade_list(frame, chunks[1], &stats);
    }

    fn render_trade_list(&mut self, frame: &mut Frame, area: Rect, stats: &TradeStats) {
        let block = Block::bordered().title(" Trade history ");
        let inner_height = area.height.saturating_sub(2) as usize;
        let trades = self.records.trades;
        let mut subtitle = format!("Last {} transactions", trades.len());
        let breakeven = stats.breakeven_count();
        if breakeven > 0 {
            subtitle.push_str(&format!(" · {breakeven} breakeven"));
        }
        let mut lines = vec![Line::styled(subtitle, Style::default().fg(MUTED))];
        if trades.is_empty() {
            lines.push(Line::from("No trades"));
        } else {
            lines.push(trade_header_line());
            let list_visible = inner_height.saturating_sub(2);
            self.selected_trade = clamp_index(self.selected_trade, trades.len());
            let (start, end) = visible_range(trades.len(), list_visible, self.selected_trade);
            for (idx, trade) in trades.iter().enumerate().skip(start).take(end - start) {
                lines.push(trade_line(trade, idx == self.selected_trade));
            }
        }
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .block(block);
        frame.render_widget(paragraph, area);
    }
}

fn render_stat_card(frame: &mut Frame, area: Rect, title: &str, value: Span, caption: String) {
    let value = value.patch_style(Style::default().add_modifier(Modifier::BOLD));
    let lines = vec![
        Line::from(value),
        Line::styled(caption, Style::default().fg(MUTED)),
    ];
    let paragraph = Paragraph::new(lines).block(Block::bordered().title(format!(" {title} ")));
    frame.render_widget(paragraph, area);
}

fn render_asset_card(frame: &mut Frame, area: Rect, asset: &Asset) {
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", asset.symbol),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("[{}] ", asset.kind.badge()), Style::default().fg(MUTED)),
    ]);
    let change_color = if asset.is_gaining() {
        Color::Green
    } else {
        Color::Red
    };
    let percent_color = if asset.change_percent >= 0.0 {
        Color::Green
    } else {
        Color::Red
    };
    let arrow = if asset.is_gaining() { "▲" } else { "▼" };
    let lines = vec![
        Line::styled(asset.name.clone(), Style::default().fg(MUTED)),
        Line::styled(
            format_usd(asset.price),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(vec![
            Span::styled(
                format!("{arrow} ${:.2}", asset.change.abs()),
                Style::default().fg(change_color),
            ),
            Span::raw(" "),
            Span::styled(
                format!("({})", format_signed_percent(asset.change_percent)),
                Style::default().fg(percent_color),
            ),
        ]),
        Line::from(vec![
            Span::styled("Volume: ", Style::default().fg(MUTED)),
            Span::raw(asset.volume.clone()),
        ]),
    ];
    let paragraph = Paragraph::new(lines).block(Block::bordered().title(title));
    frame.render_widget(paragraph, area);
}

fn render_prediction_card(frame: &mut Frame, area: Rect, prediction: &Prediction) {
    let category = ActionCategory::from(prediction.action);
    let style = category.style();
    let title = Line::from(vec![
        Span::styled(format!(" {} ", signal_icon(prediction.action)), style.text),
        Span::styled(
            prediction.asset.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" · {} ", prediction.timestamp),
            Style::default().fg(MUTED),
        ),
    ]);
    let badge = Line::from(Span::styled(
        format!(" {} ", signal_label(prediction.action)),
        style.badge,
    ))
    .right_aligned();
    let label = |text: &str| {
        Span::styled(
            format_column_value(text, ColumnAlign::Left, 15),
            Style::default().fg(MUTED),
        )
    };
    let mut target_spans = vec![
        label("Target price"),
        Span::styled(
            format_usd(prediction.target_price),
            style.text.add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(expected) = prediction.expected_move_percent() {
        target_spans.push(Span::styled(
            format!(" ({})", format_signed_percent((expected * 100.0).round() / 100.0)),
            Style::default().fg(MUTED),
        ));
    }
    let lines = vec![
        Line::from(vec![
            label("Current price"),
            Span::styled(
                format_usd(prediction.current_price),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(target_spans),
        Line::from(vec![
            label("AI confidence"),
            Span::styled(confidence_bar(prediction), Style::default().fg(ACCENT)),
            Span::styled(
                format!(" {}%", prediction.confidence_percent()),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::styled("✦ Reason", Style::default().fg(MUTED)),
        Line::from(prediction.reason.clone()),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title(title).title_top(badge));
    frame.render_widget(paragraph, area);
}

fn confidence_bar(prediction: &Prediction) -> String {
    let filled = (prediction.confidence_ratio() * CONFIDENCE_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(CONFIDENCE_BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(CONFIDENCE_BAR_WIDTH - filled)
    )
}

fn trade_header_line() -> Line<'static> {
    let columns = [
        ("", ColumnAlign::Left, 2),
        ("Asset", ColumnAlign::Left, 6),
        ("Side", ColumnAlign::Left, 5),
        ("Details", ColumnAlign::Left, 30),
        ("Profit", ColumnAlign::Right, 12),
        ("Return", ColumnAlign::Right, 9),
    ];
    let text = columns
        .iter()
        .map(|(value, align, width)| format_column_value(value, *align, *width))
        .collect::<Vec<_>>()
        .join(" ");
    Line::styled(text, Style::default().add_modifier(Modifier::UNDERLINED))
}

fn trade_line(trade: &Trade, selected: bool) -> Line<'static> {
    let side_style = ActionCategory::from(trade.action).style().text;
    let details = format!(
        "{} × ${} • {}",
        format_plain(trade.quantity),
        format_plain(trade.price),
        format_trade_date(trade.date)
    );
    let spans = vec![
        Span::styled(
            format_column_value(side_arrow(trade.action), ColumnAlign::Left, 2),
            side_style,
        ),
        Span::raw(" "),
        Span::styled(
            format_column_value(&trade.asset, ColumnAlign::Left, 6),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format_column_value(side_label(trade.action), ColumnAlign::Left, 5),
            side_style,
        ),
        Span::raw(" "),
        Span::styled(
            format_column_value(&details, ColumnAlign::Left, 30),
            Style::default().fg(MUTED),
        ),
        Span::raw(" "),
        Span::styled(
            format_column_value(&format_signed_usd(trade.profit), ColumnAlign::Right, 12),
            Style::default()
                .fg(signed_color(trade.profit))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            format_column_value(
                &format_optional_percent(trade.return_percent(), 2),
                ColumnAlign::Right,
                9,
            ),
            Style::default().fg(MUTED),
        ),
    ];
    Line::from(spans).style(row_style(selected))
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .bg(Color::Rgb(40, 48, 60))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Picks the column count for the first breakpoint the width reaches.
fn grid_columns(width: u16, breakpoints: &[(u16, usize)]) -> usize {
    breakpoints
        .iter()
        .find(|(min_width, _)| width >= *min_width)
        .map(|(_, columns)| *columns)
        .unwrap_or(1)
}

fn grid_row(area: Rect, row: usize, card_height: u16) -> Option<Rect> {
    let top = area.y as usize + row * card_height as usize;
    if top >= area.bottom() as usize {
        return None;
    }
    let top = top as u16;
    let height = card_height.min(area.bottom() - top);
    Some(Rect::new(area.x, top, area.width, height))
}

fn split_columns(area: Rect, columns: usize) -> std::rc::Rc<[Rect]> {
    let ratio = Constraint::Ratio(1, columns as u32);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![ratio; columns])
        .split(area)
}

fn shift_index(current: usize, delta: isize, max: usize) -> usize {
    let shifted = if delta.is_negative() {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta as usize)
    };
    shifted.min(max)
}

fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buffer[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TradeSide;
    use crate::sample_data;
    use chrono::NaiveDate;

    fn build_app(records: Records<'_>, initial: ViewTab) -> TuiApp<'_> {
        TuiApp::new(
            records,
            ViewController::new(initial, None),
            ConfiguredTimeZone::Local,
            Duration::from_millis(100),
        )
    }

    fn press(app: &mut TuiApp<'_>, code: KeyCode) -> bool {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .expect("key handling should not fail")
    }

    #[test]
    fn dashboard_snapshot_shows_aggregates() {
        let mut app = build_app(Records::sample(), ViewTab::Dashboard);
        let screen = app.render_snapshot(120, 40).unwrap();
        assert!(screen.contains("TradeAI"));
        assert!(screen.contains("$1323.45"));
        assert!(screen.contains("80.0%"));
        assert!(screen.contains("3 stocks • 3 crypto"));
        assert!(screen.contains("4 of 5 trades in profit"));
        assert!(screen.contains("+12.4% this month"));
        assert!(screen.contains("$43,250"));
        assert!(screen.contains("▼ $5.12"));
        assert!(screen.contains("(+9.35%)"));
        assert!(screen.contains("$28.5B"));
    }

    #[test]
    fn predictions_snapshot_shows_badges_and_confidence() {
        let mut app = build_app(Records::sample(), ViewTab::Predictions);
        let screen = app.render_snapshot(120, 40).unwrap();
        assert!(screen.contains(" BUY "));
        assert!(screen.contains(" HOLD "));
        assert!(screen.contains(" SELL "));
        assert!(screen.contains("87%"));
        assert!(screen.contains("$45,000"));
        assert!(screen.contains("Resistance breakout"));
    }

    #[test]
    fn history_snapshot_shows_signed_profits() {
        let mut app = build_app(Records::sample(), ViewTab::History);
        let screen = app.render_snapshot(120, 40).unwrap();
        assert!(screen.contains("+$1125.00"));
        assert!(screen.contains("-$228.60"));
        assert!(screen.contains("5.49%"));
        assert!(screen.contains("0.5 × $41000 • 15.01.2024"));
        assert!(screen.contains("+$1552.05"));
        assert!(screen.contains("Last 5 transactions"));
    }

    #[test]
    fn empty_trade_list_renders_placeholders() {
        let sample = Records::sample();
        let records = Records {
            assets: sample.assets,
            predictions: sample.predictions,
            trades: &[],
        };
        let mut app = build_app(records, ViewTab::Dashboard);
        let screen = app.render_snapshot(120, 40).unwrap();
        assert!(screen.contains("$0.00"));
        assert!(screen.contains("0 of 0 trades in profit"));
        assert!(screen.contains("--"));
        press(&mut app, KeyCode::Char('3'));
        let screen = app.render_snapshot(120, 40).unwrap();
        assert!(screen.contains("No trades"));
    }

    #[test]
    fn zero_cost_and_breakeven_trades_are_marked() {
        let trades = vec![Trade {
            id: "z".to_string(),
            asset: "DOGE".to_string(),
            action: TradeSide::Buy,
            price: 0.0,
            quantity: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            profit: 0.0,
        }];
        let sample = Records::sample();
        let records = Records {
            assets: sample.assets,
            predictions: sample.predictions,
            trades: &trades,
        };
        let mut app = build_app(records, ViewTab::History);
        let screen = app.render_snapshot(120, 40).unwrap();
        assert!(screen.contains("+$0.00"));
        assert!(screen.contains("1 breakeven"));
        let row = screen
            .lines()
            .find(|line| line.contains("DOGE"))
            .expect("trade row rendered");
        assert!(row.trim_end().trim_end_matches('│').trim_end().ends_with("--"));
    }

    #[test]
    fn number_keys_switch_views() {
        let mut app = build_app(Records::sample(), ViewTab::Dashboard);
        assert_eq!(app.active_view(), ViewTab::Dashboard);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_view(), ViewTab::Predictions);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.active_view(), ViewTab::Predictions);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_view(), ViewTab::History);
        assert_eq!(
            app.status_message.as_deref(),
            Some(format!("Showing {}", ViewTab::History.title()).as_str())
        );
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_view(), ViewTab::Dashboard);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.active_view(), ViewTab::History);
    }

    #[test]
    fn inert_affordances_only_set_status() {
        let mut app = build_app(Records::sample(), ViewTab::Predictions);
        assert!(!press(&mut app, KeyCode::Char('r')));
        assert_eq!(app.active_view(), ViewTab::Predictions);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Predictions are sample data; nothing to refresh")
        );
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(
            app.status_message.as_deref(),
            Some("Filtering is not available for sample assets")
        );
    }

    #[test]
    fn quitting_requires_confirmation() {
        let mut app = build_app(Records::sample(), ViewTab::Dashboard);
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert!(app.exit_confirmation);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert!(!app.exit_confirmation);
        press(&mut app, KeyCode::Esc);
        assert!(press(&mut app, KeyCode::Enter));
    }

    #[test]
    fn trade_selection_is_clamped() {
        let mut app = build_app(Records::sample(), ViewTab::History);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected_trade, 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected_trade, 4);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_trade, 4);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.selected_trade, 0);
    }

    #[test]
    fn narrow_terminal_still_renders() {
        let mut app = build_app(Records::sample(), ViewTab::Predictions);
        let screen = app.render_snapshot(40, 12).unwrap();
        assert!(screen.contains("Predictions"));
        let mut app = build_app(Records::sample(), ViewTab::Dashboard);
        assert!(app.render_snapshot(10, 4).is_ok());
    }

    #[test]
    fn confidence_bar_is_proportional() {
        let prediction = &sample_data::predictions()[0];
        let bar = confidence_bar(prediction);
        assert_eq!(bar.chars().filter(|ch| *ch == '█').count(), 17);
        assert_eq!(bar.chars().count(), CONFIDENCE_BAR_WIDTH);
    }

    #[test]
    fn out_of_range_confidence_is_capped_on_cards() {
        let mut predictions = sample_data::predictions().to_vec();
        predictions.truncate(1);
        predictions[0].confidence = 250;
        let sample = Records::sample();
        let records = Records {
            assets: sample.assets,
            predictions: &predictions,
            trades: sample.trades,
        };
        let mut app = build_app(records, ViewTab::Predictions);
        let screen = app.render_snapshot(120, 40).unwrap();
        assert!(screen.contains(" 100%"));
        assert!(!screen.contains("250%"));
        assert_eq!(
            confidence_bar(&predictions[0]).chars().filter(|ch| *ch == '█').count(),
            CONFIDENCE_BAR_WIDTH
        );
    }

    #[test]
    fn grid_columns_follow_breakpoints() {
        assert_eq!(grid_columns(130, &[(120, 3), (80, 2)]), 3);
        assert_eq!(grid_columns(90, &[(120, 3), (80, 2)]), 2);
        assert_eq!(grid_columns(40, &[(120, 3), (80, 2)]), 1);
    }
}
