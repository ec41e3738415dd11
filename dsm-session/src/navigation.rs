//! Leave-page decisions
//!
//! The page glue reports clicks, submits and history changes as they
//! happen. When the browser is about to unload, [`NavigationContext`]
//! says whether the user is moving within the app (no prompt) or leaving
//! it with unsaved work (prompt).

use reqwest::Url;
use tracing::debug;

/// Button labels that move to the next step of a method
pub const NAVIGATION_KEYWORDS: [&str; 10] = [
    "далі",
    "дальше",
    "next",
    "продовжити",
    "continue",
    "вперед",
    "submit",
    "відправити",
    "завершити",
    "finish",
];

/// Confirmation text shown when leaving with unsaved work
pub const LEAVE_PROMPT: &str = "У вас є незбережені зміни. Дійсно хочете покинути сторінку?";

/// Something the user did that may unload the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// Click on a link, with its raw `href`
    LinkClick { href: String },
    /// Click on a button or submit input
    ButtonClick {
        label: String,
        in_form: bool,
        submit_type: bool,
    },
    FormSubmit,
    HistoryPush,
    HistoryReplace,
    HistoryPop,
}

/// What to do when the page is about to unload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Allow,
    Prompt,
}

impl LeaveDecision {
    /// Text for the browser's leave confirmation, when one is needed
    pub fn prompt_message(&self) -> Option<&'static str> {
        match self {
            LeaveDecision::Allow => None,
            LeaveDecision::Prompt => Some(LEAVE_PROMPT),
        }
    }
}

/// Per-page navigation state
#[derive(Debug, Clone)]
pub struct NavigationContext {
    app_host: String,
    internal: bool,
}

impl NavigationContext {
    /// `app_host` is the host the app is served from
    pub fn new(app_host: impl Into<String>) -> Self {
        Self {
            app_host: app_host.into(),
            internal: false,
        }
    }

    /// Whether the next unload is currently expected to stay in the app
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn record(&mut self, event: &NavigationEvent) {
        let internal = match event {
            NavigationEvent::LinkClick { href } => self.is_internal_link(href),
            NavigationEvent::ButtonClick {
                label,
                in_form,
                submit_type,
            } => *in_form || *submit_type || is_navigation_label(label),
            NavigationEvent::FormSubmit
            | NavigationEvent::HistoryPush
            | NavigationEvent::HistoryReplace
            | NavigationEvent::HistoryPop => true,
        };

        if internal {
            debug!(?event, "Internal navigation");
            self.internal = true;
        }
    }

    /// Decide on unload; consumes the internal-navigation mark
    pub fn before_unload(&mut self, has_unsaved_changes: bool) -> LeaveDecision {
        if std::mem::take(&mut self.internal) {
            return LeaveDecision::Allow;
        }
        if has_unsaved_changes {
            LeaveDecision::Prompt
        } else {
            LeaveDecision::Allow
        }
    }

    /// Relative or unparseable links stay in the app; absolute ones must
    /// point at the app host
    fn is_internal_link(&self, href: &str) -> bool {
        if href.is_empty() || href.starts_with("javascript:") || href.starts_with('#') {
            return false;
        }
        match Url::parse(href) {
            Ok(url) => url.host_str() == Some(self.app_host.as_str()),
            Err(_) => true,
        }
    }
}

fn is_navigation_label(label: &str) -> bool {
    let label = label.to_lowercase();
    NAVIGATION_KEYWORDS.iter().any(|k| label.contains(k))
}
