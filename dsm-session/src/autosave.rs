//! Change tracking for autosave and the leave prompt

use dsm_common::FormData;

/// Outcome of checking the page before an autosave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveDecision {
    /// Page has content that differs from the last save
    Save,
    /// Page matches the last save
    NoChanges,
    /// Nothing has been entered yet
    Empty,
}

/// Remembers the last saved page content
#[derive(Debug, Clone, Default)]
pub struct AutoSaveTracker {
    last_saved: Option<FormData>,
}

impl AutoSaveTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `current` should be saved
    ///
    /// Snapshot timestamps are ignored when comparing.
    pub fn decide(&self, current: &FormData) -> SaveDecision {
        if !current.has_content() {
            return SaveDecision::Empty;
        }
        match &self.last_saved {
            Some(saved) if saved.same_content(current) => SaveDecision::NoChanges,
            _ => SaveDecision::Save,
        }
    }

    /// Record a successful save (or a load, which counts as saved)
    pub fn mark_saved(&mut self, form: FormData) {
        self.last_saved = Some(form);
    }

    pub fn last_saved(&self) -> Option<&FormData> {
        self.last_saved.as_ref()
    }

    /// Whether leaving now would lose work
    ///
    /// Before the first save any content counts; afterwards any difference
    /// counts, including clearing the page.
    pub fn has_unsaved_changes(&self, current: &FormData) -> bool {
        match &self.last_saved {
            None => current.has_content(),
            Some(saved) => !saved.same_content(current),
        }
    }
}
