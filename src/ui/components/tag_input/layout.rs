//! Chip geometry for the tag input.
//!
//! Chips flow left to right and wrap onto new rows like inline boxes. The
//! query row follows the last chip when enough width remains, otherwise it
//! starts a row of its own. Geometry is keyed by tag text so a stale layout
//! can never point a click at the wrong tag.

use ratatui::layout::{Position, Rect};
use unicode_width::UnicodeWidthStr;

/// Blank columns between neighbouring chips.
pub const CHIP_GAP: u16 = 1;

/// Narrowest query row that may share a row with chips.
pub const INPUT_MIN_WIDTH: u16 = 12;

/// Computed positions of every chip and of the query row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipLayout {
    /// One entry per selected tag, in selection order.
    pub chips: Vec<(String, Rect)>,
    /// Where the query text goes.
    pub input: Rect,
}

impl ChipLayout {
    /// Index of the chip under `pos`, if any.
    pub fn chip_at(&self, pos: Position) -> Option<usize> {
        self.chips.iter().position(|(_, rect)| rect.contains(pos))
    }

    /// Chip rectangles in selection order.
    pub fn rects(&self) -> Vec<Rect> {
        self.chips.iter().map(|(_, rect)| *rect).collect()
    }

    /// Number of rows from the first chip row to the query row, inclusive.
    pub fn rows(&self, area: Rect) -> u16 {
        self.input.y.saturating_sub(area.y) + 1
    }
}

/// Width of a chip, including one column of padding on each side.
pub fn chip_width(tag: &str) -> u16 {
    u16::try_from(tag.width())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

/// Lay out chips for `tags` inside `area`.
///
/// Rows are one cell high and may run past the bottom of `area`; renderers
/// clip them.
pub fn layout_chips(tags: &[String], area: Rect) -> ChipLayout {
    let right = area.x.saturating_add(area.width);
    let mut chips = Vec::with_capacity(tags.len());
    let mut x = area.x;
    let mut y = area.y;

    for tag in tags {
        let width = chip_width(tag).min(area.width.max(1));
        if x > area.x && x.saturating_add(width) > right {
            x = area.x;
            y = y.saturating_add(1);
        }
        chips.push((tag.clone(), Rect::new(x, y, width, 1)));
        x = x.saturating_add(width).saturating_add(CHIP_GAP);
    }

    let remaining = right.saturating_sub(x);
    let input = if tags.is_empty() {
        Rect::new(area.x, area.y, area.width, 1)
    } else if remaining >= INPUT_MIN_WIDTH {
        Rect::new(x, y, remaining, 1)
    } else {
        Rect::new(area.x, y.saturating_add(1), area.width, 1)
    };

    ChipLayout { chips, input }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_chip_width_includes_padding() {
        assert_eq!(chip_width("React"), 7);
        assert_eq!(chip_width(""), 2);
    }

    #[test]
    fn test_empty_layout_gives_full_row_to_input() {
        let area = Rect::new(2, 3, 30, 4);
        let layout = layout_chips(&[], area);
        assert!(layout.chips.is_empty());
        assert_eq!(layout.input, Rect::new(2, 3, 30, 1));
        assert_eq!(layout.rows(area), 1);
    }

    #[test]
    fn test_chips_flow_on_one_row() {
        let area = Rect::new(0, 0, 40, 4);
        let layout = layout_chips(&tags(&["React", "Go"]), area);
        assert_eq!(layout.chips[0].1, Rect::new(0, 0, 7, 1));
        assert_eq!(layout.chips[1].1, Rect::new(8, 0, 4, 1));
        assert_eq!(layout.input, Rect::new(13, 0, 27, 1));
    }

    #[test]
    fn test_chips_wrap_when_row_is_full() {
        let area = Rect::new(0, 0, 16, 6);
        // " React " (7) + gap + " Docker " (8) = 16, then " AWS " wraps.
        let layout = layout_chips(&tags(&["React", "Docker", "AWS"]), area);
        assert_eq!(layout.chips[0].1.y, 0);
        assert_eq!(layout.chips[1].1, Rect::new(8, 0, 8, 1));
        assert_eq!(layout.chips[2].1, Rect::new(0, 1, 5, 1));
        // Only 10 columns remain after " AWS ", so the query gets row 2.
        assert_eq!(layout.input, Rect::new(0, 2, 16, 1));
        assert_eq!(layout.rows(area), 3);
    }

    #[test]
    fn test_input_moves_to_next_row_when_too_narrow() {
        let area = Rect::new(0, 0, 20, 4);
        let layout = layout_chips(&tags(&["TypeScript"]), area);
        // 12 columns of chip + gap leaves 7 < INPUT_MIN_WIDTH.
        assert_eq!(layout.input, Rect::new(0, 1, 20, 1));
        assert_eq!(layout.rows(area), 2);
    }

    #[test]
    fn test_oversized_chip_is_clamped_to_area() {
        let area = Rect::new(0, 0, 6, 4);
        let layout = layout_chips(&tags(&["Kubernetes"]), area);
        assert_eq!(layout.chips[0].1.width, 6);
    }

    #[test]
    fn test_chip_at() {
        let area = Rect::new(0, 0, 40, 4);
        let layout = layout_chips(&tags(&["React", "Go"]), area);
        assert_eq!(layout.chip_at(Position::new(3, 0)), Some(0));
        assert_eq!(layout.chip_at(Position::new(9, 0)), Some(1));
        // The gap between chips belongs to neither.
        assert_eq!(layout.chip_at(Position::new(7, 0)), None);
        assert_eq!(layout.chip_at(Position::new(3, 1)), None);
    }
}
