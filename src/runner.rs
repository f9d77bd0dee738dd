//! The main loop: one thread polls input, advances the logical timeline and
//! repaints. All delayed narrative work happens in the session's schedule;
//! the loop only maps wall-clock instants onto the millisecond timeline.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use tracing::error;

use crate::app::{App, Intent};
use crate::constants::TASKBAR_HEIGHT;
use crate::error::DeskError;
use crate::render;
use crate::schedule::Tick;
use crate::ui::rect_contains;
use crate::window::{TitleHit, WindowKind, title_hit};

pub struct Runner {
    start: Instant,
    tick_rate: Duration,
}

impl Runner {
    pub fn new(tick_rate: Duration) -> Self {
        Self {
            start: Instant::now(),
            tick_rate,
        }
    }

    fn now(&self) -> Tick {
        self.start.elapsed().as_millis() as Tick
    }

    pub fn run<B: Backend<Error = io::Error>>(
        &mut self,
        terminal: &mut Terminal<B>,
        app: &mut App,
    ) -> Result<(), DeskError> {
        while !app.should_quit {
            let size = terminal.size()?;
            let screen = Rect::new(0, 0, size.width, size.height);
            let viewport = desktop_viewport(screen);

            app.sync(self.now(), viewport);
            if app.bell_pending {
                app.bell_pending = false;
                ring_bell();
            }

            terminal.draw(|frame| render::draw(frame, app))?;

            let timeout = self.poll_timeout(app);
            if crossterm::event::poll(timeout)? {
                // drain the queue so drags do not lag behind the input stream
                loop {
                    let event = crossterm::event::read()?;
                    self.handle_event(app, event, viewport);
                    if app.should_quit || !crossterm::event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Wake early when a scheduled effect is about to land.
    fn poll_timeout(&self, app: &App) -> Duration {
        let until_due = app
            .session
            .next_due()
            .map(|due| due.saturating_sub(self.now()))
            .unwrap_or(u64::MAX);
        self.tick_rate.min(Duration::from_millis(until_due.max(1)))
    }

    fn handle_event(&mut self, app: &mut App, event: Event, viewport: Rect) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                self.handle_key(app, key.code, key.modifiers, viewport);
            }
            Event::Mouse(mouse) => self.handle_mouse(app, mouse, viewport),
            Event::Resize(width, height) => {
                let next = desktop_viewport(Rect::new(0, 0, width, height));
                app.desktop.handle_resize(next);
            }
            _ => {}
        }
    }

    fn handle_key(
        &mut self,
        app: &mut App,
        code: KeyCode,
        modifiers: KeyModifiers,
        _viewport: Rect,
    ) {
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            app.should_quit = true;
            return;
        }
        if app.session.state().crash_active {
            return;
        }
        match code {
            KeyCode::Esc => app.start_menu_open = false,
            KeyCode::Char(c) => match app.desktop.focused() {
                Some(WindowKind::Search) => app.search_input.push(c),
                Some(WindowKind::Diary) if !app.session.state().diary_read => {
                    app.diary_input.push(c);
                }
                _ => {}
            },
            KeyCode::Backspace => match app.desktop.focused() {
                Some(WindowKind::Search) => {
                    app.search_input.pop();
                }
                Some(WindowKind::Diary) => {
                    app.diary_input.pop();
                }
                _ => {}
            },
            KeyCode::Enter => match app.desktop.focused() {
                Some(WindowKind::Search) => app.submit_search(),
                Some(WindowKind::Diary) if !app.session.state().diary_read => {
                    app.submit_diary_password();
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_mouse(&mut self, app: &mut App, mouse: MouseEvent, viewport: Rect) {
        if app.session.state().crash_active {
            return;
        }
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_press(app, x, y, viewport),
            MouseEventKind::Drag(MouseButton::Left) => app.desktop.drag_to(x, y, viewport),
            MouseEventKind::Up(MouseButton::Left) => app.desktop.end_drag(),
            _ => {}
        }
    }

    fn handle_press(&mut self, app: &mut App, x: u16, y: u16, viewport: Rect) {
        let now = self.now();

        if app.taskbar.hit_test_start(x, y) {
            app.start_menu_open = !app.start_menu_open;
            return;
        }
        if app.start_menu_open {
            if let Some(item) = app.taskbar.hit_test_menu_item(x, y) {
                app.start_menu_open = false;
                app.session.note_first_interaction();
                app.desktop.open(item.window(), viewport);
                return;
            }
            app.start_menu_open = false;
            if app.taskbar.menu_contains_point(x, y) {
                return;
            }
        }
        if app.taskbar.contains_point(x, y) {
            if let Some(kind) = app.taskbar.hit_test_window(x, y) {
                app.desktop.taskbar_activate(kind);
            }
            return;
        }

        if let Some(kind) = app.desktop.window_at(x, y) {
            let rect = match app.desktop.frame(kind) {
                Some(frame) => frame.rect,
                None => return,
            };
            match title_hit(rect, x, y) {
                Some(TitleHit::Close) => app.desktop.close(kind),
                Some(TitleHit::Minimize) => app.desktop.minimize(kind),
                Some(TitleHit::Drag) => app.desktop.begin_drag(kind, x, y),
                None => {
                    app.desktop.restore(kind);
                    if let Some(intent) = resolve_intent(app, x, y, Some(rect)) {
                        app.handle_intent(intent, now, viewport);
                    }
                }
            }
            return;
        }

        // bare desktop: icons only
        if let Some(intent) = resolve_intent(app, x, y, None) {
            app.handle_intent(intent, now, viewport);
        }
    }
}

/// Topmost intent under the cursor. When a window rect is given, only
/// intents rendered inside it count, so clicks never fall through to a
/// window underneath.
fn resolve_intent(app: &App, x: u16, y: u16, within: Option<Rect>) -> Option<Intent> {
    app.intents
        .iter()
        .rev()
        .find(|(rect, _)| {
            rect_contains(*rect, x, y)
                && within.is_none_or(|outer| rect_contains(outer, rect.x, rect.y))
        })
        .map(|(_, intent)| *intent)
}

fn desktop_viewport(screen: Rect) -> Rect {
    Rect {
        height: screen.height.saturating_sub(TASKBAR_HEIGHT),
        ..screen
    }
}

fn ring_bell() {
    let mut stdout = io::stdout();
    if let Err(error) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
        error!(cause = %error, "sound cue bell failed");
    }
}
