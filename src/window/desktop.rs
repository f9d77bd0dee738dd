//! Stacking window manager for the simulated desktop.
//!
//! One frame per window kind, created on first open and kept forever so
//! geometry survives close/reopen, a monotonically increasing z counter for
//! raise-to-top, and an epilogue lock that refuses opening anything but the
//! messenger. Focus is explicit: opening, restoring or raising a window
//! takes it; minimizing or closing the focused window leaves nothing
//! focused rather than promoting the next window down.

use std::collections::BTreeMap;

use ratatui::prelude::Rect;
use tracing::debug;

use super::{WindowFrame, WindowKind, clamp_to_viewport};

#[derive(Debug, Clone, Copy)]
struct DragState {
    kind: WindowKind,
    /// Offset of the grab point inside the window, preserved for the whole
    /// drag so the window does not jump under the cursor.
    grab_dx: u16,
    grab_dy: u16,
}

/// A taskbar button: one per open window, in opening order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub kind: WindowKind,
    pub title: String,
    pub focused: bool,
    pub minimized: bool,
}

#[derive(Debug, Default)]
pub struct Desktop {
    windows: BTreeMap<WindowKind, WindowFrame>,
    /// Opening order, which the taskbar preserves across focus changes.
    open_order: Vec<WindowKind>,
    next_z: u64,
    focused: Option<WindowKind>,
    drag: Option<DragState>,
    epilogue_lock: bool,
}

impl Desktop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `kind`, or restore and raise it if it is already open. A frame
    /// that was closed before reopens with its old geometry. Under the
    /// epilogue lock only the messenger may open.
    pub fn open(&mut self, kind: WindowKind, viewport: Rect) {
        if self.epilogue_lock && kind != WindowKind::Messenger {
            return;
        }
        if self.is_open(kind) {
            self.restore(kind);
            return;
        }
        let z = self.take_z();
        match self.windows.get_mut(&kind) {
            Some(frame) => {
                frame.open = true;
                frame.minimized = false;
                frame.z = z;
            }
            None => {
                self.windows.insert(
                    kind,
                    WindowFrame {
                        kind,
                        title: kind.default_title().to_string(),
                        rect: kind.spawn_rect(viewport),
                        z,
                        open: true,
                        minimized: false,
                    },
                );
            }
        }
        self.focused = Some(kind);
        self.open_order.push(kind);
        debug!(kind = ?kind, "window opened");
    }

    /// Close `kind`: the frame stays so geometry survives a reopen. Closing
    /// the focused window clears focus.
    pub fn close(&mut self, kind: WindowKind) {
        if let Some(frame) = self.windows.get_mut(&kind)
            && frame.open
        {
            frame.open = false;
            frame.minimized = false;
            self.open_order.retain(|k| *k != kind);
            if self.focused == Some(kind) {
                self.focused = None;
            }
            if self.drag.is_some_and(|d| d.kind == kind) {
                self.drag = None;
            }
            debug!(kind = ?kind, "window closed");
        }
    }

    /// Raise `kind` to the top of the stack and focus it, restoring it if
    /// minimized.
    pub fn restore(&mut self, kind: WindowKind) {
        let z = self.take_z();
        if let Some(frame) = self.windows.get_mut(&kind)
            && frame.open
        {
            frame.minimized = false;
            frame.z = z;
            self.focused = Some(kind);
        }
    }

    /// Raise and focus without restoring; a minimized window stays put.
    pub fn focus_if_visible(&mut self, kind: WindowKind) {
        let z = self.take_z();
        if let Some(frame) = self.windows.get_mut(&kind)
            && frame.open
            && !frame.minimized
        {
            frame.z = z;
            self.focused = Some(kind);
        }
    }

    /// Hide `kind` from the desktop, leaving its taskbar button. Focus is
    /// cleared, never handed to the next window down.
    pub fn minimize(&mut self, kind: WindowKind) {
        if let Some(frame) = self.windows.get_mut(&kind)
            && frame.open
        {
            frame.minimized = true;
            if self.focused == Some(kind) {
                self.focused = None;
            }
            if self.drag.is_some_and(|d| d.kind == kind) {
                self.drag = None;
            }
        }
    }

    /// Taskbar button semantics: minimized or unfocused restores and
    /// raises, only the focused window minimizes.
    pub fn taskbar_activate(&mut self, kind: WindowKind) {
        let Some(frame) = self.windows.get(&kind) else {
            return;
        };
        if !frame.open {
            return;
        }
        if frame.minimized || self.focused != Some(kind) {
            self.restore(kind);
        } else {
            self.minimize(kind);
        }
    }

    /// The explicitly focused window, always open and visible.
    pub fn focused(&self) -> Option<WindowKind> {
        self.focused
    }

    pub fn is_open(&self, kind: WindowKind) -> bool {
        self.windows.get(&kind).is_some_and(|f| f.open)
    }

    pub fn frame(&self, kind: WindowKind) -> Option<&WindowFrame> {
        self.windows.get(&kind)
    }

    pub fn set_title(&mut self, kind: WindowKind, title: impl Into<String>) {
        if let Some(frame) = self.windows.get_mut(&kind) {
            frame.title = title.into();
        }
    }

    /// Visible windows back-to-front, for painting.
    pub fn render_order(&self) -> Vec<&WindowFrame> {
        let mut frames: Vec<&WindowFrame> = self
            .windows
            .values()
            .filter(|f| f.open && !f.minimized)
            .collect();
        frames.sort_by_key(|f| f.z);
        frames
    }

    /// The visible window under `(x, y)`, topmost first.
    pub fn window_at(&self, x: u16, y: u16) -> Option<WindowKind> {
        self.render_order()
            .iter()
            .rev()
            .find(|f| crate::ui::rect_contains(f.rect, x, y))
            .map(|f| f.kind)
    }

    pub fn taskbar_entries(&self) -> Vec<TaskbarEntry> {
        let focused = self.focused();
        self.open_order
            .iter()
            .filter_map(|kind| self.windows.get(kind))
            .map(|frame| TaskbarEntry {
                kind: frame.kind,
                title: frame.title.clone(),
                focused: focused == Some(frame.kind),
                minimized: frame.minimized,
            })
            .collect()
    }

    // ---- dragging ------------------------------------------------------

    /// Begin dragging `kind` from a press at `(x, y)` on its title row.
    /// Raises the window immediately.
    pub fn begin_drag(&mut self, kind: WindowKind, x: u16, y: u16) {
        self.restore(kind);
        if let Some(frame) = self.windows.get(&kind) {
            self.drag = Some(DragState {
                kind,
                grab_dx: x.saturating_sub(frame.rect.x),
                grab_dy: y.saturating_sub(frame.rect.y),
            });
        }
    }

    /// Move the dragged window so the grab point follows the cursor,
    /// clamped into the viewport minus the taskbar strip.
    pub fn drag_to(&mut self, x: u16, y: u16, viewport: Rect) {
        let Some(drag) = self.drag else {
            return;
        };
        if let Some(frame) = self.windows.get_mut(&drag.kind) {
            let target = Rect {
                x: x.saturating_sub(drag.grab_dx),
                y: y.saturating_sub(drag.grab_dy),
                ..frame.rect
            };
            frame.rect = clamp_to_viewport(target, viewport);
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    pub fn dragging(&self) -> Option<WindowKind> {
        self.drag.map(|d| d.kind)
    }

    // ---- resize handling -----------------------------------------------

    /// Re-clamp every window after a terminal resize.
    pub fn handle_resize(&mut self, viewport: Rect) {
        for frame in self.windows.values_mut() {
            frame.rect = clamp_to_viewport(frame.rect, viewport);
        }
    }

    // ---- epilogue lock --------------------------------------------------

    /// Close everything but the messenger, open and raise it, and refuse
    /// opening anything else from now on. The messenger itself still
    /// minimizes, closes and reopens normally.
    pub fn lock_to_messenger(&mut self, viewport: Rect) {
        self.drag = None;
        for frame in self.windows.values_mut() {
            if frame.kind != WindowKind::Messenger {
                frame.open = false;
                frame.minimized = false;
            }
        }
        self.open_order.retain(|kind| *kind == WindowKind::Messenger);
        self.epilogue_lock = true;
        self.open(WindowKind::Messenger, viewport);
        self.restore(WindowKind::Messenger);
        debug!("desktop locked to messenger");
    }

    pub fn is_locked(&self) -> bool {
        self.epilogue_lock
    }

    fn take_z(&mut self) -> u64 {
        self.next_z += 1;
        self.next_z
    }
}
