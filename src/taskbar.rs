//! The bottom taskbar: start button, start menu, window buttons, clock.
//!
//! Hit rects are recorded while rendering and consumed by the mouse router
//! on the next event, so hit testing always matches what was last drawn.
//! `begin_frame` clears them before each paint.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::constants::TASKBAR_HEIGHT;
use crate::ui::{UiFrame, rect_contains, safe_set_string, truncate_to_width};
use crate::window::{TaskbarEntry, WindowKind};

/// Live start-menu entries. Run and Shut Down are painted but inert, as
/// befits the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartItem {
    Search,
    Settings,
    Help,
}

impl StartItem {
    pub fn window(self) -> WindowKind {
        match self {
            StartItem::Search => WindowKind::Search,
            StartItem::Settings => WindowKind::Settings,
            StartItem::Help => WindowKind::Help,
        }
    }

    fn label(self) -> &'static str {
        match self {
            StartItem::Search => "Search",
            StartItem::Settings => "Settings",
            StartItem::Help => "Help",
        }
    }
}

const MAX_BUTTON_LABEL: usize = 18;

#[derive(Debug, Default)]
pub struct Taskbar {
    area: Rect,
    start_rect: Option<Rect>,
    menu_bounds: Option<Rect>,
    menu_item_hits: Vec<(StartItem, Rect)>,
    window_hits: Vec<(WindowKind, Rect)>,
}

impl Taskbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self) {
        self.start_rect = None;
        self.menu_bounds = None;
        self.menu_item_hits.clear();
        self.window_hits.clear();
    }

    /// Split the terminal into the desktop viewport and the taskbar strip.
    pub fn split_area(&mut self, area: Rect) -> (Rect, Rect) {
        let bar_h = TASKBAR_HEIGHT.min(area.height);
        let bar = Rect {
            x: area.x,
            y: area.y.saturating_add(area.height).saturating_sub(bar_h),
            width: area.width,
            height: bar_h,
        };
        let desktop = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height.saturating_sub(bar_h),
        };
        self.area = bar;
        (desktop, bar)
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        entries: &[TaskbarEntry],
        menu_open: bool,
        clock_label: &str,
    ) {
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let bar_style = Style::default().bg(Color::Gray).fg(Color::Black);
        frame.fill(area, bar_style);
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }

        let mut x = area.x;
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);

        let start_label = " Start ";
        let start_width = start_label.len() as u16;
        if x.saturating_add(start_width) <= max_x {
            let start_style = if menu_open {
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                bar_style.add_modifier(Modifier::BOLD)
            };
            safe_set_string(buffer, bounds, x, y, start_label, start_style);
            self.start_rect = Some(Rect {
                x,
                y,
                width: start_width,
                height: 1,
            });
            x = x.saturating_add(start_width).saturating_add(1);
        }

        // Clock, right-aligned, reserved before window buttons claim space.
        let clock_text = format!(" {clock_label} ");
        let clock_width = clock_text.chars().count() as u16;
        let clock_x = max_x.saturating_sub(clock_width);
        if clock_x > x {
            safe_set_string(buffer, bounds, clock_x, y, &clock_text, bar_style);
        }
        let buttons_max_x = clock_x.saturating_sub(1).max(x);

        for entry in entries {
            let mut label = entry.title.clone();
            if label.chars().count() > MAX_BUTTON_LABEL {
                label = truncate_to_width(&label, MAX_BUTTON_LABEL);
            }
            let chunk = format!(" {label} ");
            let chunk_width = chunk.chars().count() as u16;
            if x.saturating_add(chunk_width) > buttons_max_x {
                break;
            }
            let style = if entry.focused && !entry.minimized {
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                bar_style
            };
            safe_set_string(buffer, bounds, x, y, &chunk, style);
            self.window_hits.push((
                entry.kind,
                Rect {
                    x,
                    y,
                    width: chunk_width,
                    height: 1,
                },
            ));
            x = x.saturating_add(chunk_width).saturating_add(1);
        }
    }

    /// Paint the start menu above the bar. Must run after `render` so the
    /// anchor rect exists.
    pub fn render_menu(&mut self, frame: &mut UiFrame<'_>, open: bool, screen: Rect) {
        if !open {
            return;
        }
        let Some(anchor) = self.start_rect else {
            return;
        };
        const ACTIVE: [StartItem; 3] = [StartItem::Search, StartItem::Settings, StartItem::Help];
        // active items + separator + two inert rows
        let rows = ACTIVE.len() as u16 + 3;
        let width = 16u16.min(screen.width);
        let top = anchor.y.saturating_sub(rows);
        let menu = Rect {
            x: anchor.x,
            y: top,
            width,
            height: rows,
        };
        let menu_style = Style::default().bg(Color::Gray).fg(Color::Black);
        let dim_style = menu_style.add_modifier(Modifier::DIM);
        frame.fill(menu, menu_style);
        let buffer = frame.buffer_mut();
        let bounds = menu.intersection(buffer.area);

        let mut y = menu.y;
        for item in ACTIVE {
            safe_set_string(buffer, bounds, menu.x, y, &format!(" {}", item.label()), menu_style);
            self.menu_item_hits.push((
                item,
                Rect {
                    x: menu.x,
                    y,
                    width,
                    height: 1,
                },
            ));
            y = y.saturating_add(1);
        }
        safe_set_string(buffer, bounds, menu.x, y, " Run...", dim_style);
        y = y.saturating_add(1);
        safe_set_string(buffer, bounds, menu.x, y, &"-".repeat(width as usize), dim_style);
        y = y.saturating_add(1);
        safe_set_string(buffer, bounds, menu.x, y, " Shut Down...", dim_style);

        self.menu_bounds = Some(menu);
    }

    pub fn hit_test_start(&self, column: u16, row: u16) -> bool {
        self.start_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
    }

    pub fn hit_test_menu_item(&self, column: u16, row: u16) -> Option<StartItem> {
        self.menu_item_hits
            .iter()
            .find(|(_, rect)| rect_contains(*rect, column, row))
            .map(|(item, _)| *item)
    }

    pub fn menu_contains_point(&self, column: u16, row: u16) -> bool {
        self.menu_bounds
            .is_some_and(|rect| rect_contains(rect, column, row))
    }

    pub fn hit_test_window(&self, column: u16, row: u16) -> Option<WindowKind> {
        self.window_hits
            .iter()
            .find(|(_, rect)| rect_contains(*rect, column, row))
            .map(|(kind, _)| *kind)
    }

    pub fn contains_point(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn split_reserves_the_bottom_strip() {
        let mut bar = Taskbar::new();
        let (desktop, strip) = bar.split_area(Rect::new(0, 0, 80, 24));
        assert_eq!(desktop.height, 24 - TASKBAR_HEIGHT);
        assert_eq!(strip.y, 24 - TASKBAR_HEIGHT);
        assert_eq!(strip.height, TASKBAR_HEIGHT);
    }

    #[test]
    fn render_records_hit_rects_for_start_and_windows() {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let mut bar = Taskbar::new();
        bar.begin_frame();
        bar.split_area(area);
        let entries = vec![TaskbarEntry {
            kind: WindowKind::Messenger,
            title: "Instant Messenger".to_string(),
            focused: true,
            minimized: false,
        }];
        bar.render(&mut frame, &entries, false, "10:14 PM");

        assert!(bar.hit_test_start(1, 23));
        assert!(!bar.hit_test_start(1, 22));
        let hit = bar.hit_test_window(10, 23);
        assert_eq!(hit, Some(WindowKind::Messenger));
    }

    #[test]
    fn start_menu_hits_only_live_items() {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let mut bar = Taskbar::new();
        bar.begin_frame();
        bar.split_area(area);
        bar.render(&mut frame, &[], true, "10:14 PM");
        bar.render_menu(&mut frame, true, area);

        let menu = bar.menu_bounds.expect("menu rendered");
        assert_eq!(
            bar.hit_test_menu_item(menu.x + 1, menu.y),
            Some(StartItem::Search)
        );
        assert_eq!(
            bar.hit_test_menu_item(menu.x + 1, menu.y + 2),
            Some(StartItem::Help)
        );
        // inert rows miss
        assert_eq!(bar.hit_test_menu_item(menu.x + 1, menu.y + 3), None);
        assert!(bar.menu_contains_point(menu.x + 1, menu.y + 3));
    }
}
