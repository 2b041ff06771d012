use crate::config::ViewerConfig;
use crate::paginate::{next_page, prev_page};
use crate::view::{ViewOutcome, render_view};
use std::path::Path;

/// Per-viewer page state. Owned by one viewer and passed through each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub page: usize,
    pub page_size: usize,
}

impl SessionState {
    pub fn new(page_size: usize) -> Self {
        Self { page: 1, page_size }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.page_size)
    }

    /// Starts over on page 1 with `page_size` rows per page.
    pub fn load(
        source: Option<&Path>,
        page_size: usize,
        config: &ViewerConfig,
    ) -> (SessionState, ViewOutcome) {
        SessionState::new(page_size).show(source, config)
    }

    /// Renders the current page without moving.
    pub fn show(self, source: Option<&Path>, config: &ViewerConfig) -> (SessionState, ViewOutcome) {
        let outcome = render_view(source, self.page, self.page_size, config);
        (self, outcome)
    }

    /// Advances one page and renders it. There is no upper bound; pages past
    /// the end render as an empty table.
    pub fn next(self, source: Option<&Path>, config: &ViewerConfig) -> (SessionState, ViewOutcome) {
        SessionState {
            page: next_page(self.page),
            ..self
        }
        .show(source, config)
    }

    /// Steps back one page, never below page 1, and renders it.
    pub fn prev(self, source: Option<&Path>, config: &ViewerConfig) -> (SessionState, ViewOutcome) {
        SessionState {
            page: prev_page(self.page),
            ..self
        }
        .show(source, config)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::from_config(&ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_first_page_with_configured_size() {
        let state = SessionState::default();
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 10);
    }

    #[test]
    fn navigation_without_source_still_moves_the_page() {
        let config = ViewerConfig::default();
        let (state, outcome) = SessionState::new(10).next(None, &config);
        assert_eq!(state.page, 2);
        assert_eq!(outcome.status, "Please upload a valid Excel file.");

        let (state, _) = state.prev(None, &config);
        let (state, _) = state.prev(None, &config);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn load_resets_to_first_page() {
        let config = ViewerConfig::default();
        let (state, outcome) = SessionState::load(None, 25, &config);
        assert_eq!(state, SessionState::new(25));
        assert!(!outcome.has_table());
    }

    #[test]
    fn show_keeps_the_current_page() {
        let config = ViewerConfig::default();
        let state = SessionState {
            page: 4,
            page_size: 5,
        };
        let (after, _) = state.show(None, &config);
        assert_eq!(after, state);
    }
}
