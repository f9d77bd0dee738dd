//! Clipped drawing helpers shared by the desktop renderer and the taskbar.
//!
//! Window rects routinely drift partially outside the terminal while being
//! dragged or after a resize; writing out of bounds into the ratatui
//! `Buffer` corrupts the frame. Everything here clamps to the visible area
//! first so callers never guard individual draws.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct directly from an area and buffer, for buffer-level tests.
    #[cfg(test)]
    pub(crate) fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        let clipped = area.intersection(self.area);
        if clipped.width > 0 && clipped.height > 0 {
            widget.render(clipped, self.buffer);
        }
    }

    /// Paint `style` over every cell of `area`, replacing symbols with
    /// spaces. Used for window bodies and the taskbar strip.
    pub fn fill(&mut self, area: Rect, style: Style) {
        let clipped = area.intersection(self.area);
        for y in clipped.y..clipped.y.saturating_add(clipped.height) {
            for x in clipped.x..clipped.x.saturating_add(clipped.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.set_symbol(" ");
                    cell.set_style(style);
                }
            }
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_to_width_short_and_long() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn safe_set_string_writes_within_bounds() {
        let bounds = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(bounds);
        safe_set_string(&mut buf, bounds, 1, 0, "hello", Style::default());
        let cell = buf.cell((1, 0)).expect("cell present");
        assert!(cell.symbol().starts_with('h'));

        // outside bounds is ignored, no panic
        safe_set_string(&mut buf, bounds, 100, 0, "x", Style::default());
    }

    #[test]
    fn fill_clips_to_frame_area() {
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        let mut ui = UiFrame::from_parts(area, &mut buf);
        ui.fill(Rect::new(3, 1, 10, 10), Style::default());
        assert_eq!(buf.cell((4, 2)).unwrap().symbol(), " ");
    }

    #[test]
    fn rect_contains_is_edge_exclusive_on_the_far_side() {
        let rect = Rect::new(2, 2, 4, 2);
        assert!(rect_contains(rect, 2, 2));
        assert!(rect_contains(rect, 5, 3));
        assert!(!rect_contains(rect, 6, 3));
        assert!(!rect_contains(rect, 2, 4));
    }
}
