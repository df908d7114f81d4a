//! Tag autocomplete input.
//!
//! A combo-box that fuzzy-matches typed text against a pool of candidate tags,
//! shows a navigable suggestion list under the field, and turns selections
//! into removable chips. The widget is split into:
//! - [`state`]: the selected set, query, suggestions and focus locus
//! - [`nav`]: key and mouse handling, including spatial chip navigation
//! - [`layout`]: chip geometry used for rendering, hit testing and navigation
//!
//! Every change to the selected set is reported through the commit callback
//! with the full, ordered set.

mod layout;
mod nav;
mod state;

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

pub use layout::{chip_width, layout_chips, ChipLayout};
pub use nav::{spatial_neighbor, Vertical};

use super::input::TextInput;
use crate::ui::theme::theme;

/// Placeholder shown in the query row while no tag is selected.
pub const PLACEHOLDER: &str = "Type to search tags...";

/// Default delay between losing focus and hiding the suggestion list.
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(150);

/// Most suggestion rows shown at once.
const MAX_VISIBLE_SUGGESTIONS: usize = 6;

/// Callback informed of the full selected set after every change.
pub type CommitCallback = Box<dyn FnMut(&[String])>;

/// Where the candidate tags come from.
pub enum TagSource {
    /// A fixed pool, deduplicated once on construction.
    Static(Vec<String>),
    /// A lookup queried each time suggestions are recomputed.
    Lookup(Box<dyn Fn() -> Vec<String>>),
}

impl TagSource {
    /// A fixed pool of tags.
    pub fn fixed<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Static(dedup_tags(tags.into_iter().map(Into::into)))
    }

    /// A pool produced on demand.
    pub fn lookup(f: impl Fn() -> Vec<String> + 'static) -> Self {
        Self::Lookup(Box::new(f))
    }

    /// The current candidate pool: no blanks, no duplicates, source order.
    pub fn candidates(&self) -> Vec<String> {
        match self {
            Self::Static(tags) => tags.clone(),
            Self::Lookup(f) => dedup_tags(f()),
        }
    }
}

impl Default for TagSource {
    fn default() -> Self {
        Self::Static(Vec::new())
    }
}

impl fmt::Debug for TagSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(tags) => f.debug_tuple("Static").field(tags).finish(),
            Self::Lookup(_) => f.write_str("Lookup(..)"),
        }
    }
}

/// Drop blank entries and later duplicates, keeping first-seen order.
fn dedup_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| !tag.trim().is_empty())
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Which part of the widget receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusLocus {
    /// The query row.
    #[default]
    Input,
    /// The chip at this index in the selected set.
    Chip(usize),
}

/// The tag autocomplete widget.
pub struct TagInput {
    /// Candidate tags.
    source: TagSource,
    /// Told about every change to `selected`.
    on_commit: CommitCallback,
    /// Committed tags, in selection order, without duplicates.
    selected: Vec<String>,
    /// The query text and caret.
    query: TextInput,
    /// Candidates matching the query, excluding selected ones.
    suggestions: Vec<String>,
    /// Index into `suggestions`.
    highlighted: usize,
    /// Whether the suggestion list is open.
    suggestions_visible: bool,
    /// Where keys go inside the widget.
    focus: FocusLocus,
    /// Whether the widget as a whole has keyboard focus.
    has_focus: bool,
    /// Cleared on unmount; an unmounted widget ignores all events.
    mounted: bool,
    /// How long after blur the suggestion list stays open.
    hide_delay: Duration,
    /// Deadline of a blur-triggered hide.
    pending_hide: Option<Instant>,
    /// Inner area from the last layout pass.
    area: Option<Rect>,
    /// Outer area (including the border) from the last render.
    anchor: Option<Rect>,
    /// Chip and query geometry inside `area`.
    layout: ChipLayout,
    /// Rows of the rendered suggestion list.
    suggestion_area: Option<Rect>,
    /// First suggestion shown in `suggestion_area`.
    suggestion_offset: usize,
}

impl TagInput {
    /// Create a tag input over `source` reporting changes to `on_commit`.
    pub fn new(source: TagSource, on_commit: impl FnMut(&[String]) + 'static) -> Self {
        let mut query = TextInput::new();
        query.set_placeholder(PLACEHOLDER);

        Self {
            source,
            on_commit: Box::new(on_commit),
            selected: Vec::new(),
            query,
            suggestions: Vec::new(),
            highlighted: 0,
            suggestions_visible: false,
            focus: FocusLocus::Input,
            has_focus: false,
            mounted: true,
            hide_delay: DEFAULT_HIDE_DELAY,
            pending_hide: None,
            area: None,
            anchor: None,
            layout: ChipLayout::default(),
            suggestion_area: None,
            suggestion_offset: 0,
        }
    }

    /// Set the blur-to-hide delay.
    pub fn with_hide_delay(mut self, delay: Duration) -> Self {
        self.hide_delay = delay;
        self
    }

    // ========================================================================
    // Lifecycle and focus
    // ========================================================================

    /// Whether the widget still reacts to events.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Tear the widget down. Pending hides are dropped and all later events
    /// are ignored.
    pub fn unmount(&mut self) {
        tracing::debug!(tags = self.selected.len(), "Tag input unmounted");
        self.mounted = false;
        self.pending_hide = None;
        self.has_focus = false;
    }

    /// Whether the widget has keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Give the widget keyboard focus, cancelling any pending hide.
    pub fn focus(&mut self) {
        if !self.mounted {
            return;
        }
        self.has_focus = true;
        self.pending_hide = None;
    }

    /// Take keyboard focus away.
    ///
    /// The suggestion list stays open for the hide delay so a click that is
    /// already on its way can still land on a row.
    pub fn blur(&mut self, now: Instant) {
        if !self.mounted {
            return;
        }
        self.has_focus = false;
        self.focus = FocusLocus::Input;
        if self.suggestions_visible {
            self.pending_hide = Some(now + self.hide_delay);
        }
    }

    /// Advance timers. Fires a blur-triggered hide once its deadline passed.
    pub fn tick(&mut self, now: Instant) {
        if !self.mounted {
            return;
        }
        if let Some(deadline) = self.pending_hide {
            if now >= deadline {
                self.pending_hide = None;
                if !self.has_focus {
                    tracing::trace!("Hiding suggestions after blur");
                    self.suggestions_visible = false;
                }
            }
        }
    }

    /// Whether a blur-triggered hide is waiting.
    pub fn has_pending_hide(&self) -> bool {
        self.pending_hide.is_some()
    }

    // ========================================================================
    // Geometry and rendering
    // ========================================================================

    /// Lay chips out inside `inner`, the area within the border.
    pub fn layout_in(&mut self, inner: Rect) {
        self.area = Some(inner);
        self.layout = layout_chips(&self.selected, inner);
    }

    /// Recompute chip geometry after the selected set changed.
    fn relayout(&mut self) {
        match self.area {
            Some(inner) => self.layout = layout_chips(&self.selected, inner),
            None => self.layout = ChipLayout::default(),
        }
    }

    /// Current chip geometry.
    pub fn chip_layout(&self) -> &ChipLayout {
        &self.layout
    }

    /// Height needed to show every chip and the query row at `width`,
    /// including the border.
    pub fn preferred_height(&self, width: u16) -> u16 {
        // Chip layout ignores the height; a tall rect would make Rect::new
        // shrink the width to keep the area in range.
        let inner = Rect::new(0, 0, width.saturating_sub(2), 1);
        layout_chips(&self.selected, inner).rows(inner) + 2
    }

    /// Whether the suggestion list is drawn on the next frame.
    pub fn shows_suggestions(&self) -> bool {
        self.suggestions_visible && !self.suggestions.is_empty() && !self.query.is_empty()
    }

    /// Render the field: border, chips and query row.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let t = theme();
        self.anchor = Some(area);

        let border_style = if focused {
            Style::default().fg(t.border_focused)
        } else {
            Style::default().fg(t.border)
        };
        let title_style = if focused {
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(t.fg)
        };
        let block = Block::default()
            .title(Span::styled(" Tags ", title_style))
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.layout_in(inner);

        for (i, (tag, rect)) in self.layout.chips.iter().enumerate() {
            let visible = rect.intersection(inner);
            if visible.is_empty() {
                continue;
            }
            let chip_focused = focused && self.focus == FocusLocus::Chip(i);
            let style = if chip_focused {
                Style::default()
                    .fg(t.chip_fg)
                    .bg(t.chip_focused_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(t.chip_fg).bg(t.chip_bg)
            };
            frame.render_widget(Paragraph::new(format!(" {} ", tag)).style(style), visible);
        }

        let placeholder = if self.selected.is_empty() { PLACEHOLDER } else { "" };
        self.query.set_placeholder(placeholder);

        let input_area = self.layout.input.intersection(inner);
        if !input_area.is_empty() {
            self.query
                .render_inline(frame, input_area, focused && self.focus == FocusLocus::Input);
        }
    }

    /// Render the suggestion list under the field, clipped to `bounds`.
    ///
    /// Call after everything the list may overlap has been drawn.
    pub fn render_suggestions(&mut self, frame: &mut Frame, bounds: Rect) {
        self.suggestion_area = None;
        let Some(anchor) = self.anchor else {
            return;
        };
        if !self.shows_suggestions() {
            return;
        }

        let rows = self.suggestions.len().min(MAX_VISIBLE_SUGGESTIONS) as u16;
        let wanted = Rect::new(anchor.x, anchor.y.saturating_add(anchor.height), anchor.width, rows + 2);
        let dropdown = wanted.intersection(bounds);
        if dropdown.height < 3 {
            return;
        }

        let t = theme();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_focused));
        let inner = block.inner(dropdown);

        let visible_rows = inner.height as usize;
        if self.highlighted < self.suggestion_offset {
            self.suggestion_offset = self.highlighted;
        } else if self.highlighted >= self.suggestion_offset + visible_rows {
            self.suggestion_offset = self.highlighted + 1 - visible_rows;
        }

        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .skip(self.suggestion_offset)
            .take(visible_rows)
            .map(|tag| ListItem::new(tag.as_str()))
            .collect();

        let list = List::new(items)
            .block(block)
            .style(Style::default().fg(t.fg))
            .highlight_style(
                Style::default()
                    .bg(t.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = ListState::default();
        state.select(Some(self.highlighted - self.suggestion_offset));

        frame.render_widget(Clear, dropdown);
        frame.render_stateful_widget(list, dropdown, &mut state);
        self.suggestion_area = Some(inner);
    }
}

impl Default for TagInput {
    fn default() -> Self {
        Self::new(TagSource::default(), |_: &[String]| {})
    }
}

impl fmt::Debug for TagInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagInput")
            .field("source", &self.source)
            .field("selected", &self.selected)
            .field("query", &self.query.value())
            .field("suggestions", &self.suggestions)
            .field("highlighted", &self.highlighted)
            .field("suggestions_visible", &self.suggestions_visible)
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    use super::*;

    /// Every argument the commit callback received, in order.
    pub type Commits = Rc<RefCell<Vec<Vec<String>>>>;

    pub const TAGS: [&str; 6] = ["React", "TypeScript", "Docker", "Kubernetes", "AWS", "Python"];

    pub fn recording_input(tags: &[&str]) -> (TagInput, Commits) {
        let commits: Commits = Rc::default();
        let sink = Rc::clone(&commits);
        let mut input = TagInput::new(TagSource::fixed(tags.iter().copied()), move |set: &[String]| {
            sink.borrow_mut().push(set.to_vec())
        });
        input.focus();
        (input, commits)
    }

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn type_text(input: &mut TagInput, text: &str) {
        for c in text.chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
    }

    pub fn last_commit(commits: &Commits) -> Option<Vec<String>> {
        commits.borrow().last().cloned()
    }

    pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use ratatui::{backend::TestBackend, Terminal};

    use super::test_support::*;
    use super::*;

    fn draw(input: &mut TagInput, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let field = Rect::new(0, 0, width, 3);
                input.render(frame, field, true);
                input.render_suggestions(frame, frame.area());
            })
            .unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn test_fixed_source_dedups_and_drops_blanks() {
        let source = TagSource::fixed(["React", "Go", "React", " ", "", "Go", "Rust"]);
        assert_eq!(source.candidates(), vec!["React", "Go", "Rust"]);
    }

    #[test]
    fn test_lookup_source_is_queried_on_demand() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let source = TagSource::lookup(move || {
            counter.set(counter.get() + 1);
            vec!["a".to_string(), "a".to_string(), "b".to_string()]
        });
        assert_eq!(source.candidates(), vec!["a", "b"]);
        assert_eq!(source.candidates(), vec!["a", "b"]);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_default_is_inert_and_safe() {
        let mut input = TagInput::default();
        input.focus();
        type_text(&mut input, "react");
        assert!(input.suggestions().is_empty());
        assert!(!input.handle_key(key(KeyCode::Enter)));
        assert!(input.handle_key(key(KeyCode::Backspace)));
        assert!(input.selected().is_empty());
    }

    #[test]
    fn test_placeholder_only_without_tags() {
        let (mut input, _) = recording_input(&TAGS);
        let lines = draw(&mut input, 40, 10);
        assert!(lines[1].contains(PLACEHOLDER));

        type_text(&mut input, "react");
        input.handle_key(key(KeyCode::Enter));
        let lines = draw(&mut input, 40, 10);
        assert!(!lines.iter().any(|l| l.contains(PLACEHOLDER)));
        assert!(lines[1].contains(" React "));
    }

    #[test]
    fn test_suggestion_list_rendered_only_while_querying() {
        let (mut input, _) = recording_input(&TAGS);
        let lines = draw(&mut input, 40, 10);
        assert!(!lines[3..].iter().any(|l| l.contains("React")));

        type_text(&mut input, "react");
        let lines = draw(&mut input, 40, 10);
        assert!(lines[4].contains("React"));

        input.handle_key(key(KeyCode::Esc));
        let lines = draw(&mut input, 40, 10);
        assert!(!lines[3..].iter().any(|l| l.contains("React")));
        assert!(lines[1].contains("react"));
    }

    #[test]
    fn test_no_dropdown_for_non_matches() {
        let (mut input, _) = recording_input(&["React", "TypeScript"]);
        type_text(&mut input, "xyz");
        let lines = draw(&mut input, 40, 10);
        assert!(!lines.iter().any(|l| l.contains("React")));
        assert!(!input.shows_suggestions());
    }

    #[test]
    fn test_dropdown_scrolls_to_highlight() {
        let tags: Vec<String> = (0..10).map(|i| format!("tag{i}")).collect();
        let refs: Vec<&str> = tags.iter().map(String::as_str).collect();
        let (mut input, _) = recording_input(&refs);
        type_text(&mut input, "tag");
        draw(&mut input, 30, 12);
        for _ in 0..8 {
            input.handle_key(key(KeyCode::Down));
        }
        let lines = draw(&mut input, 30, 12);
        assert!(lines.iter().any(|l| l.contains("tag8")));
        assert!(!lines.iter().any(|l| l.contains("tag0")));
    }

    #[test]
    fn test_preferred_height_grows_with_rows() {
        let (mut input, _) = recording_input(&TAGS);
        assert_eq!(input.preferred_height(20), 3);
        for q in ["react", "docker", "python"] {
            type_text(&mut input, q);
            input.handle_key(key(KeyCode::Enter));
        }
        // Inner width 18: " React " + " Docker " share a row, " Python " wraps
        // and leaves too little room for the query.
        assert_eq!(input.preferred_height(20), 5);

        // Wide enough for all three chips and the query on one row.
        assert_eq!(input.preferred_height(40), 3);
    }

    #[test]
    fn test_blur_hides_suggestions_after_delay() {
        let (mut input, _) = recording_input(&TAGS);
        type_text(&mut input, "r");
        assert!(input.suggestions_visible());

        let now = Instant::now();
        input.blur(now);
        assert!(input.has_pending_hide());

        input.tick(now + Duration::from_millis(10));
        assert!(input.suggestions_visible());

        input.tick(now + DEFAULT_HIDE_DELAY);
        assert!(!input.suggestions_visible());
        assert!(!input.has_pending_hide());
        assert_eq!(input.query(), "r");
    }

    #[test]
    fn test_refocus_cancels_pending_hide() {
        let (mut input, _) = recording_input(&TAGS);
        type_text(&mut input, "r");
        let now = Instant::now();
        input.blur(now);
        input.focus();
        input.tick(now + Duration::from_secs(1));
        assert!(input.suggestions_visible());
    }

    #[test]
    fn test_blur_never_touches_selection() {
        let (mut input, commits) = recording_input(&TAGS);
        type_text(&mut input, "react");
        input.handle_key(key(KeyCode::Enter));
        type_text(&mut input, "d");
        let now = Instant::now();
        input.blur(now);
        input.tick(now + Duration::from_secs(1));
        assert_eq!(input.selected(), ["React"]);
        assert_eq!(commits.borrow().len(), 1);
    }

    #[test]
    fn test_unmounted_widget_is_inert() {
        let (mut input, commits) = recording_input(&TAGS);
        type_text(&mut input, "react");
        let now = Instant::now();
        input.blur(now);
        input.unmount();
        assert!(!input.has_pending_hide());

        input.tick(now + Duration::from_secs(1));
        assert!(!input.handle_key(key(KeyCode::Enter)));
        assert!(commits.borrow().is_empty());
        assert!(!input.is_mounted());
    }
}
