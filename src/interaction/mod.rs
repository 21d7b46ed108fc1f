use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::WaterfallDatum;

/// Host callback receiving the clicked bar; typically emits a cross-chart filter.
pub type BarClickHandler = Arc<dyn Fn(&WaterfallDatum) + Send + Sync + 'static>;
/// Host callback clearing filters previously emitted by this chart.
pub type ResetFiltersHandler = Arc<dyn Fn() + Send + Sync + 'static>;

pub const DEFAULT_NOTIFICATION_MESSAGE: &str =
    "Filter applied: other charts on the dashboard now show the selected category.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Notifying,
}

/// What a click ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    /// The chart is not interactive, or nothing reacted to the click.
    Ignored,
    BarClicked { index: usize },
    NotificationDismissed,
    FiltersReset,
}

/// Click handling and the transient notification banner.
///
/// Clicks only reach the host when the chart is `interactive`; otherwise they
/// are dropped without touching state or invoking callbacks. Host callbacks
/// run synchronously and a panic inside them propagates to the caller.
pub struct InteractionController {
    interactive: bool,
    message: String,
    notification: Option<String>,
    on_bar_click: BarClickHandler,
    reset_filters: Option<ResetFiltersHandler>,
}

impl fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionController")
            .field("interactive", &self.interactive)
            .field("message", &self.message)
            .field("notification", &self.notification)
            .field("on_bar_click", &"<fn>")
            .field(
                "reset_filters",
                &self.reset_filters.as_ref().map(|_| "<fn>"),
            )
            .finish()
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(false)
    }
}

impl InteractionController {
    #[must_use]
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            message: DEFAULT_NOTIFICATION_MESSAGE.to_owned(),
            notification: None,
            on_bar_click: Arc::new(|_: &WaterfallDatum| {}),
            reset_filters: None,
        }
    }

    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Turning interactivity off also drops any visible notification.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
        if !interactive {
            self.notification = None;
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn set_on_bar_click(&mut self, handler: BarClickHandler) {
        self.on_bar_click = handler;
    }

    pub fn clear_on_bar_click(&mut self) {
        self.on_bar_click = Arc::new(|_: &WaterfallDatum| {});
    }

    pub fn set_reset_filters(&mut self, handler: Option<ResetFiltersHandler>) {
        self.reset_filters = handler;
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if self.notification.is_some() {
            InteractionMode::Notifying
        } else {
            InteractionMode::Idle
        }
    }

    #[must_use]
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn on_bar_click(&mut self, datum: &WaterfallDatum) -> ClickOutcome {
        if !self.interactive {
            return ClickOutcome::Ignored;
        }
        debug!(index = datum.index, category = %datum.category, "bar clicked");
        (self.on_bar_click)(datum);
        self.notification = Some(self.message.clone());
        ClickOutcome::BarClicked { index: datum.index }
    }

    pub fn dismiss_notification(&mut self) -> ClickOutcome {
        if self.notification.take().is_some() {
            ClickOutcome::NotificationDismissed
        } else {
            ClickOutcome::Ignored
        }
    }

    pub fn on_background_click(&mut self) -> ClickOutcome {
        if !self.interactive {
            return ClickOutcome::Ignored;
        }
        match &self.reset_filters {
            Some(reset) => {
                debug!("background clicked, resetting filters");
                reset();
                ClickOutcome::FiltersReset
            }
            None => ClickOutcome::Ignored,
        }
    }
}
