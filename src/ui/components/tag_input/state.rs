//! Selection state for the tag input.
//!
//! The selected set only changes through [`TagInput::select_tag`],
//! [`TagInput::remove_tag`] and [`TagInput::remove_last`]; each of them ends
//! by handing the full set to the commit callback. Suggestions are always
//! derived from the query and the selected set, never edited directly.

use tracing::{debug, trace};

use super::{FocusLocus, TagInput};
use crate::ui::components::fuzzy::fuzzy_match;

impl TagInput {
    /// The committed tags, in selection order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// The literal query text.
    pub fn query(&self) -> &str {
        self.query.value()
    }

    /// Candidates currently offered for the query.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Index of the highlighted suggestion.
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// The highlighted suggestion, if the list has one.
    pub fn highlighted_suggestion(&self) -> Option<&str> {
        self.suggestions.get(self.highlighted).map(String::as_str)
    }

    /// Whether the suggestion list is open.
    pub fn suggestions_visible(&self) -> bool {
        self.suggestions_visible
    }

    /// Where keys currently go inside the widget.
    pub fn focus_locus(&self) -> FocusLocus {
        self.focus
    }

    /// Replace the query and recompute suggestions.
    ///
    /// The highlight goes back to the first row and the list opens whenever
    /// anything matches.
    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query.set_value(text);
        self.refilter(true);
    }

    /// Recompute suggestions from the query and the selected set.
    ///
    /// With `reveal` the list opens when non-empty; without it the list only
    /// stays open if it already was.
    pub(super) fn refilter(&mut self, reveal: bool) {
        let was_visible = self.suggestions_visible;
        let query = self.query.value();
        let suggestions: Vec<String> = if query.is_empty() {
            Vec::new()
        } else {
            self.source
                .candidates()
                .into_iter()
                .filter(|tag| !self.selected.contains(tag))
                .filter(|tag| fuzzy_match(query, tag))
                .collect()
        };
        trace!(query = %query, matches = suggestions.len(), "Suggestions recomputed");

        self.suggestions = suggestions;
        self.highlighted = 0;
        self.suggestion_offset = 0;
        self.suggestions_visible = (reveal || was_visible) && !self.suggestions.is_empty();
    }

    /// Commit `tag` if it is currently offered.
    ///
    /// Clears the query, closes the list and returns focus to the query row.
    /// Tags that are not in the suggestion list are ignored. Returns whether
    /// the set changed.
    pub fn select_tag(&mut self, tag: &str) -> bool {
        if !self.suggestions.iter().any(|s| s == tag) || self.selected.iter().any(|s| s == tag) {
            trace!(tag = %tag, "Ignoring selection of a tag that is not offered");
            return false;
        }

        self.selected.push(tag.to_string());
        self.query.clear();
        self.suggestions.clear();
        self.highlighted = 0;
        self.suggestion_offset = 0;
        self.suggestions_visible = false;
        self.focus = FocusLocus::Input;

        debug!(tag = %tag, total = self.selected.len(), "Tag selected");
        self.commit();
        true
    }

    /// Remove `tag` from the selected set.
    ///
    /// A chip focused after the removed one keeps its tag; focus on the
    /// removed chip goes back to the query row. Returns whether the set
    /// changed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let Some(index) = self.selected.iter().position(|s| s == tag) else {
            trace!(tag = %tag, "Ignoring removal of a tag that is not selected");
            return false;
        };

        self.selected.remove(index);
        self.focus = match self.focus {
            FocusLocus::Chip(i) if i == index => FocusLocus::Input,
            FocusLocus::Chip(i) if i > index => FocusLocus::Chip(i - 1),
            other => other,
        };
        if matches!(self.focus, FocusLocus::Chip(i) if i >= self.selected.len()) {
            self.focus = FocusLocus::Input;
        }

        // The removed tag may match the pending query again.
        if !self.query.is_empty() {
            self.refilter(false);
        }

        debug!(tag = %tag, total = self.selected.len(), "Tag removed");
        self.commit();
        true
    }

    /// Remove the most recently selected tag.
    pub fn remove_last(&mut self) -> bool {
        match self.selected.last().cloned() {
            Some(tag) => self.remove_tag(&tag),
            None => false,
        }
    }

    /// Close the suggestion list, keeping the query text.
    pub fn hide_suggestions(&mut self) {
        self.suggestions_visible = false;
        self.pending_hide = None;
    }

    /// Move the highlight down one row, stopping at the last.
    pub fn highlight_next(&mut self) {
        if self.highlighted + 1 < self.suggestions.len() {
            self.highlighted += 1;
        }
    }

    /// Move the highlight up one row, stopping at the first.
    pub fn highlight_prev(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    /// Highlight the suggestion at `index`. Out-of-range indices are ignored.
    pub fn set_highlight(&mut self, index: usize) {
        if index < self.suggestions.len() {
            self.highlighted = index;
        }
    }

    /// Focus the chip at `index`. Out-of-range indices are ignored.
    pub fn focus_chip(&mut self, index: usize) {
        if index < self.selected.len() {
            self.focus = FocusLocus::Chip(index);
        }
    }

    /// Send keys back to the query row.
    pub fn focus_input(&mut self) {
        self.focus = FocusLocus::Input;
    }

    /// Refresh geometry and report the full set upward.
    fn commit(&mut self) {
        self.relayout();
        (self.on_commit)(&self.selected);
    }
}
