use std::fmt;
use std::str::FromStr;

use tokio::sync::broadcast;
use tracing::debug;

use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewTab {
    #[default]
    Dashboard,
    Predictions,
    History,
}

impl ViewTab {
    pub const ALL: [ViewTab; 3] = [ViewTab::Dashboard, ViewTab::Predictions, ViewTab::History];

    pub fn index(&self) -> usize {
        match self {
            ViewTab::Dashboard => 0,
            ViewTab::Predictions => 1,
            ViewTab::History => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewTab::Dashboard => "dashboard",
            ViewTab::Predictions => "predictions",
            ViewTab::History => "history",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewTab::Dashboard => "Dashboard",
            ViewTab::Predictions => "Predictions",
            ViewTab::History => "History",
        }
    }

    fn offset(&self, delta: isize) -> ViewTab {
        let len = Self::ALL.len() as isize;
        let idx = (self.index() as isize + delta).rem_euclid(len);
        Self::ALL[idx as usize]
    }
}

impl fmt::Display for ViewTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Ok(ViewTab::Dashboard),
            "predictions" => Ok(ViewTab::Predictions),
            "history" => Ok(ViewTab::History),
            other => Err(format!(
                "unknown view `{other}` (use dashboard, predictions, or history)"
            )),
        }
    }
}

/// Owns the active tab and tells subscribers when it changes.
pub struct ViewController {
    active: ViewTab,
    notifier: Option<broadcast::Sender<Command>>,
}

impl ViewController {
    pub fn new(initial: ViewTab, notifier: Option<broadcast::Sender<Command>>) -> Self {
        ViewController {
            active: initial,
            notifier,
        }
    }

    pub fn active(&self) -> ViewTab {
        self.active
    }

    /// Returns `false` when `tab` is already active; nothing is published then.
    pub fn select(&mut self, tab: ViewTab) -> bool {
        if self.active == tab {
            return false;
        }
        let from = self.active;
        self.active = tab;
        debug!(%from, to = %tab, "view changed");
        if let Some(tx) = &self.notifier {
            let _ = tx.send(Command::ViewChanged { from, to: tab });
        }
        true
    }

    pub fn next(&mut self) -> bool {
        self.select(self.active.offset(1))
    }

    pub fn previous(&mut self) -> bool {
        self.select(self.active.offset(-1))
    }
}
