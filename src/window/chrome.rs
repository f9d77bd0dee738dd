//! Title-bar geometry shared by the renderer and the mouse router.

use ratatui::prelude::Rect;

/// What a press on a window's title row means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleHit {
    /// Anywhere on the row outside the buttons: start dragging.
    Drag,
    Minimize,
    Close,
}

/// Width of one `[x]` style button.
pub const BUTTON_WIDTH: u16 = 3;

/// Rect of the close button on `rect`'s title row.
pub fn close_button(rect: Rect) -> Rect {
    Rect {
        x: rect
            .x
            .saturating_add(rect.width.saturating_sub(BUTTON_WIDTH + 1)),
        y: rect.y,
        width: BUTTON_WIDTH,
        height: 1,
    }
}

/// Rect of the minimize button, immediately left of close.
pub fn minimize_button(rect: Rect) -> Rect {
    Rect {
        x: rect
            .x
            .saturating_add(rect.width.saturating_sub(2 * BUTTON_WIDTH + 1)),
        y: rect.y,
        width: BUTTON_WIDTH,
        height: 1,
    }
}

/// Classify a press at `(x, y)` against `rect`'s title row.
pub fn title_hit(rect: Rect, x: u16, y: u16) -> Option<TitleHit> {
    if y != rect.y || x < rect.x || x >= rect.x.saturating_add(rect.width) {
        return None;
    }
    let close = close_button(rect);
    if x >= close.x && x < close.x + close.width {
        return Some(TitleHit::Close);
    }
    let minimize = minimize_button(rect);
    if x >= minimize.x && x < minimize.x + minimize.width {
        return Some(TitleHit::Minimize);
    }
    Some(TitleHit::Drag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_title_row_presses() {
        let rect = Rect::new(10, 5, 40, 12);
        assert_eq!(title_hit(rect, 12, 5), Some(TitleHit::Drag));
        assert_eq!(title_hit(rect, 47, 5), Some(TitleHit::Close));
        assert_eq!(title_hit(rect, 44, 5), Some(TitleHit::Minimize));
        // body and outside rows are not title hits
        assert_eq!(title_hit(rect, 12, 6), None);
        assert_eq!(title_hit(rect, 9, 5), None);
        assert_eq!(title_hit(rect, 50, 5), None);
    }
}
