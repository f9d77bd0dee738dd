//! Floating desktop windows: identity, geometry and the stacking manager.

mod chrome;
mod desktop;

pub use chrome::{TitleHit, close_button, minimize_button, title_hit};
pub use desktop::{Desktop, TaskbarEntry};

use ratatui::prelude::Rect;

use crate::constants::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH, TASKBAR_HEIGHT};

/// Every window the desktop can show. At most one instance of each exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WindowKind {
    MyComputer,
    Messenger,
    Netscape,
    Winamp,
    Diary,
    Search,
    FileExplorer,
    TextViewer,
    DevLogViewer,
    Settings,
    Help,
    ChatLogViewer,
}

impl WindowKind {
    pub const ALL: [WindowKind; 12] = [
        WindowKind::MyComputer,
        WindowKind::Messenger,
        WindowKind::Netscape,
        WindowKind::Winamp,
        WindowKind::Diary,
        WindowKind::Search,
        WindowKind::FileExplorer,
        WindowKind::TextViewer,
        WindowKind::DevLogViewer,
        WindowKind::Settings,
        WindowKind::Help,
        WindowKind::ChatLogViewer,
    ];

    pub fn default_title(self) -> &'static str {
        match self {
            WindowKind::MyComputer => "My Computer",
            WindowKind::Messenger => "Instant Messenger",
            WindowKind::Netscape => "Netscape Navigator",
            WindowKind::Winamp => "Winamp",
            WindowKind::Diary => "Diary_Final_Draft.txt",
            WindowKind::Search => "Search",
            WindowKind::FileExplorer => "File Explorer",
            WindowKind::TextViewer => "Notepad",
            WindowKind::DevLogViewer => "DEV_LOG.txt",
            WindowKind::Settings => "Settings",
            WindowKind::Help => "Help",
            WindowKind::ChatLogViewer => "Chat Log",
        }
    }

    /// Spawn position as per-mille of the usable viewport, staggered so
    /// freshly opened windows do not stack exactly.
    fn spawn_origin_permille(self) -> (u32, u32) {
        match self {
            WindowKind::MyComputer => (50, 100),
            WindowKind::Messenger => (200, 50),
            WindowKind::Netscape => (300, 150),
            WindowKind::Winamp => (400, 200),
            WindowKind::Diary => (500, 250),
            WindowKind::Search => (100, 200),
            WindowKind::FileExplorer => (100, 150),
            WindowKind::TextViewer => (250, 250),
            WindowKind::DevLogViewer => (250, 200),
            WindowKind::Settings => (200, 200),
            WindowKind::Help => (200, 200),
            WindowKind::ChatLogViewer => (150, 150),
        }
    }

    /// Preferred footprint in cells before viewport clamping.
    fn preferred_size(self) -> (u16, u16) {
        match self {
            WindowKind::MyComputer => (44, 14),
            WindowKind::Messenger => (52, 20),
            WindowKind::Netscape => (64, 18),
            WindowKind::Winamp => (40, 12),
            WindowKind::Diary => (44, 14),
            WindowKind::Search => (56, 17),
            WindowKind::FileExplorer => (56, 17),
            WindowKind::TextViewer => (60, 16),
            WindowKind::DevLogViewer => (60, 17),
            WindowKind::Settings => (44, 14),
            WindowKind::Help => (50, 15),
            WindowKind::ChatLogViewer => (46, 18),
        }
    }

    /// Geometry a fresh window takes in `viewport`, clamped like any other
    /// placement so it never straddles the taskbar strip.
    pub fn spawn_rect(self, viewport: Rect) -> Rect {
        let (px, py) = self.spawn_origin_permille();
        let (w, h) = self.preferred_size();
        let x = viewport.x + (u32::from(viewport.width) * px / 1000) as u16;
        let y = viewport.y + (u32::from(viewport.height) * py / 1000) as u16;
        clamp_to_viewport(
            Rect {
                x,
                y,
                width: w,
                height: h,
            },
            viewport,
        )
    }
}

/// One window's mutable geometry and stacking position. Frames are created
/// on first open and never destroyed afterwards; closing clears the flag so
/// geometry survives a reopen.
#[derive(Debug, Clone)]
pub struct WindowFrame {
    pub kind: WindowKind,
    pub title: String,
    pub rect: Rect,
    pub z: u64,
    pub open: bool,
    pub minimized: bool,
}

/// Clamp a window rect so it fits the viewport minus the taskbar strip,
/// shrinking first and translating second. Minimum footprint wins over the
/// viewport when the terminal is pathologically small.
pub fn clamp_to_viewport(rect: Rect, viewport: Rect) -> Rect {
    let usable_h = viewport.height.saturating_sub(TASKBAR_HEIGHT);
    let min_w = MIN_WINDOW_WIDTH.min(viewport.width.max(1));
    let min_h = MIN_WINDOW_HEIGHT.min(usable_h.max(1));
    let width = rect.width.min(viewport.width).max(min_w);
    let height = rect.height.min(usable_h).max(min_h);

    let max_x = viewport
        .x
        .saturating_add(viewport.width.saturating_sub(width));
    let max_y = viewport
        .y
        .saturating_add(usable_h.saturating_sub(height));
    Rect {
        x: rect.x.clamp(viewport.x, max_x.max(viewport.x)),
        y: rect.y.clamp(viewport.y, max_y.max(viewport.y)),
        width,
        height,
    }
}
