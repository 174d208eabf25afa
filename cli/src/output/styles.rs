//! Terminal stylesheet for cf-recycle output.

use owo_colors::Style;

use crate::domain::SkipReason;

/// Styles for each kind of line cf-recycle prints. Plain by default.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` once an instance or command has completed (green)
    pub done: Style,
    /// `!` for instances that were not running (yellow)
    pub attention: Style,
    /// `✗` on stderr (red)
    pub failure: Style,
    /// `ℹ` notes and already-fresh instances (blue)
    pub note: Style,
    /// `→` restart and poll progress (cyan)
    pub progress: Style,
    /// Keys in `config show` and `version` listings
    pub key: Style,
    /// Section titles
    pub title: Style,
}

impl Styles {
    /// Stylesheet used when stdout is a terminal and color is allowed.
    #[must_use]
    pub fn colored() -> Self {
        Self {
            done: Style::new().green(),
            attention: Style::new().yellow(),
            failure: Style::new().red(),
            note: Style::new().blue(),
            progress: Style::new().cyan(),
            key: Style::new().dimmed(),
            title: Style::new().bold().cyan(),
        }
    }

    /// Style of the marker in front of a skipped instance.
    #[must_use]
    pub fn skip(&self, reason: SkipReason) -> Style {
        match reason {
            SkipReason::NotRunning => self.attention,
            SkipReason::AlreadyFresh => self.note,
        }
    }
}
