//! Paints the whole desktop each frame and records the intent hit list.
//!
//! Rendering order is background, icons, windows back-to-front, overlays,
//! then the taskbar. Intents are pushed in the same order, so the router
//! scans the list in reverse to give the topmost surface priority.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use crate::app::{App, Intent, SearchOutcome};
use crate::content::{self, Bookmark, BookmarkAction};
use crate::game::{HauntingEvent, Sender};
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};
use crate::window::{WindowFrame, WindowKind, close_button, minimize_button};

const BSOD_LINES: [&str; 6] = [
    "A problem has been detected and the system has been shut down",
    "to prevent damage to your computer.",
    "",
    "A GHOST IN THE MACHINE",
    "",
    "*** STOP: 0x0000DEAD (Promise_Not_Kept, Memory_Corrupted, He_is_gone)",
];

pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let screen = frame.area();
    let mut ui = UiFrame::new(frame);
    app.intents.clear();
    app.taskbar.begin_frame();

    let state_crashed = app.session.state().crash_active;
    if state_crashed {
        draw_bsod(&mut ui, screen);
        return;
    }

    let (viewport, _bar) = app.taskbar.split_area(screen);
    let glitching = app.session.state().haunting_event == Some(HauntingEvent::Glitch)
        || app.session.state().game_ended;
    draw_background(&mut ui, viewport, glitching);
    draw_icons(app, &mut ui, viewport);

    let frames: Vec<WindowFrame> = app.desktop.render_order().into_iter().cloned().collect();
    let focused = app.desktop.focused();
    for window in &frames {
        draw_window(app, &mut ui, window, focused == Some(window.kind), glitching);
    }

    if app.session.state().fake_error_visible {
        draw_fake_error(&mut ui, viewport);
    }

    let entries = app.desktop.taskbar_entries();
    let clock = app.clock_label();
    app.taskbar
        .render(&mut ui, &entries, app.start_menu_open, &clock);
    app.taskbar.render_menu(&mut ui, app.start_menu_open, screen);
}

fn draw_background(ui: &mut UiFrame<'_>, viewport: Rect, glitching: bool) {
    let bg = if glitching {
        Style::default().bg(Color::Magenta).fg(Color::Black)
    } else {
        Style::default().bg(Color::Cyan).fg(Color::Black)
    };
    ui.fill(viewport, bg);
}

fn draw_icons(app: &mut App, ui: &mut UiFrame<'_>, viewport: Rect) {
    let style = Style::default().bg(Color::Cyan).fg(Color::White);
    let mut y = viewport.y.saturating_add(1);
    for icon in app.visible_icons() {
        if y >= viewport.y.saturating_add(viewport.height) {
            break;
        }
        let label = truncate_to_width(icon.label(), 22);
        let rect = Rect {
            x: viewport.x.saturating_add(1),
            y,
            width: label.chars().count() as u16 + 2,
            height: 1,
        };
        let buffer = ui.buffer_mut();
        let bounds = viewport.intersection(buffer.area);
        safe_set_string(buffer, bounds, rect.x, rect.y, &format!("* {label}"), style);
        app.intents.push((rect, Intent::Icon(icon)));
        y = y.saturating_add(2);
    }
}

fn title_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

fn draw_window(
    app: &mut App,
    ui: &mut UiFrame<'_>,
    window: &WindowFrame,
    focused: bool,
    glitching: bool,
) {
    let rect = window.rect;
    if rect.width == 0 || rect.height == 0 {
        return;
    }

    // title row with buttons
    let mut chrome = title_style(focused);
    if glitching {
        chrome = chrome.add_modifier(Modifier::REVERSED);
    }
    let title_row = Rect {
        height: 1,
        ..rect
    };
    ui.fill(title_row, chrome);
    {
        let buffer = ui.buffer_mut();
        let bounds = title_row.intersection(buffer.area);
        let title = truncate_to_width(&window.title, rect.width.saturating_sub(8) as usize);
        safe_set_string(buffer, bounds, rect.x + 1, rect.y, &title, chrome);
        let min_rect = minimize_button(rect);
        safe_set_string(buffer, bounds, min_rect.x, min_rect.y, "[_]", chrome);
        let close_rect = close_button(rect);
        safe_set_string(buffer, bounds, close_rect.x, close_rect.y, "[x]", chrome);
    }

    // body
    let body = Rect {
        x: rect.x,
        y: rect.y.saturating_add(1),
        width: rect.width,
        height: rect.height.saturating_sub(1),
    };
    ui.fill(body, Style::default().bg(Color::White).fg(Color::Black));
    let inner = Rect {
        x: body.x.saturating_add(1),
        y: body.y,
        width: body.width.saturating_sub(2),
        height: body.height,
    };
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match window.kind {
        WindowKind::MyComputer => draw_my_computer(app, ui, inner),
        WindowKind::FileExplorer => draw_file_explorer(app, ui, inner),
        WindowKind::TextViewer => {
            let body_text = app.viewer.body.clone();
            draw_plain_text(ui, inner, &body_text);
        }
        WindowKind::DevLogViewer => {
            if let Some(file) = content::file_entry("dev_log") {
                draw_plain_text(ui, inner, file.body);
            }
        }
        WindowKind::ChatLogViewer => draw_chat_log(app, ui, inner),
        WindowKind::Help => draw_plain_text(
            ui,
            inner,
            "GHOST.SYS Help\n\nYou have accessed a closed system. The entity IL_Otome99 is present.\n\n1. Explore the desktop. Double-click icons to open files and programs.\n2. Communicate. Use the Instant Messenger to speak with the entity. Unlocked topics appear as buttons.\n3. Find clues. Information is scattered across files, websites and programs. New clues may unlock new conversation topics.\n\nYour goal is to uncover the truth.",
        ),
        WindowKind::Settings => draw_plain_text(
            ui,
            inner,
            "Settings\n\nDisplay Resolution: 1024x768\nSound Volume: ----\n\n[System settings are locked.]",
        ),
        WindowKind::Netscape => draw_netscape(app, ui, inner),
        WindowKind::Winamp => draw_winamp(app, ui, inner),
        WindowKind::Diary => draw_diary(app, ui, inner),
        WindowKind::Search => draw_search(app, ui, inner),
        WindowKind::Messenger => draw_messenger(app, ui, inner),
    }
}

fn body_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

fn row_rect(inner: Rect, row: u16, width: u16) -> Rect {
    Rect {
        x: inner.x,
        y: inner.y.saturating_add(row),
        width: width.min(inner.width),
        height: 1,
    }
}

fn draw_my_computer(app: &mut App, ui: &mut UiFrame<'_>, inner: Rect) {
    let label = "[C] Local Disk (C:)";
    let buffer = ui.buffer_mut();
    let bounds = inner.intersection(buffer.area);
    safe_set_string(buffer, bounds, inner.x, inner.y, label, body_style());
    app.intents.push((
        row_rect(inner, 0, label.len() as u16),
        Intent::DriveRoot,
    ));
}

fn draw_file_explorer(app: &mut App, ui: &mut UiFrame<'_>, inner: Rect) {
    let Some(folder) = content::folder(app.explorer_folder) else {
        return;
    };
    let buffer = ui.buffer_mut();
    let bounds = inner.intersection(buffer.area);
    for (index, entry) in folder.entries.iter().enumerate() {
        let row = index as u16;
        if row >= inner.height {
            break;
        }
        let clickable = !matches!(entry.item, content::FolderItem::Corrupted);
        let style = if clickable {
            body_style()
        } else {
            body_style().add_modifier(Modifier::DIM)
        };
        safe_set_string(buffer, bounds, inner.x, inner.y + row, entry.label, style);
        if clickable {
            app.intents.push((
                row_rect(inner, row, entry.label.chars().count() as u16),
                Intent::FolderItem(index),
            ));
        }
    }
}

fn draw_plain_text(ui: &mut UiFrame<'_>, inner: Rect, text: &str) {
    let lines = wrap_text(text, inner.width as usize);
    let buffer = ui.buffer_mut();
    let bounds = inner.intersection(buffer.area);
    for (row, line) in lines.iter().take(inner.height as usize).enumerate() {
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            inner.y + row as u16,
            line,
            body_style(),
        );
    }
}

fn draw_chat_log(app: &mut App, ui: &mut UiFrame<'_>, inner: Rect) {
    let Some(file) = app.chat_viewer else {
        return;
    };
    let buffer = ui.buffer_mut();
    let bounds = inner.intersection(buffer.area);
    let mut row = 0u16;
    for line in file.body.lines() {
        let color = chat_log_color(line);
        for wrapped in wrap_text(line, inner.width as usize) {
            if row >= inner.height {
                return;
            }
            safe_set_string(
                buffer,
                bounds,
                inner.x,
                inner.y + row,
                &wrapped,
                body_style().fg(color),
            );
            row += 1;
        }
    }
}

fn chat_log_color(line: &str) -> Color {
    let sender = line.split(':').next().unwrap_or("");
    if sender.starts_with("IL_") {
        Color::Red
    } else if sender.starts_with("Kielala_") {
        Color::Blue
    } else if sender.starts_with("Kikyo_") {
        Color::Magenta
    } else if sender.starts_with("Siririll_") {
        Color::DarkGray
    } else {
        Color::Black
    }
}

fn draw_netscape(app: &mut App, ui: &mut UiFrame<'_>, inner: Rect) {
    let bookmarks: &[Bookmark] = content::bookmarks();
    {
        let buffer = ui.buffer_mut();
        let bounds = inner.intersection(buffer.area);
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            inner.y,
            "Welcome to Netscape!",
            body_style().add_modifier(Modifier::BOLD),
        );
        safe_set_string(buffer, bounds, inner.x, inner.y + 1, "Bookmarks:", body_style());
    }
    for (index, bookmark) in bookmarks.iter().enumerate() {
        let row = 2 + index as u16;
        if row >= inner.height {
            break;
        }
        let unlocked_archive = app.archive_unlocked
            && matches!(bookmark.action, BookmarkAction::NewsArchive);
        let label = if unlocked_archive {
            bookmark.unlocked_label.unwrap_or(bookmark.label)
        } else {
            bookmark.label
        };
        let style = if unlocked_archive {
            body_style().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            body_style().fg(Color::Blue)
        };
        let text = format!("> {label}");
        let buffer = ui.buffer_mut();
        let bounds = inner.intersection(buffer.area);
        safe_set_string(buffer, bounds, inner.x, inner.y + row, &text, style);
        app.intents.push((
            row_rect(inner, row, text.chars().count() as u16),
            Intent::Bookmark(index),
        ));
    }
}

fn draw_winamp(app: &mut App, ui: &mut UiFrame<'_>, inner: Rect) {
    {
        let buffer = ui.buffer_mut();
        let bounds = inner.intersection(buffer.area);
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            inner.y,
            "Playlist:",
            body_style().add_modifier(Modifier::BOLD),
        );
    }
    for (index, track) in content::playlist().iter().enumerate() {
        let row = 1 + index as u16;
        if row >= inner.height {
            break;
        }
        let text = format!("{}. {}", index + 1, track.label);
        let buffer = ui.buffer_mut();
        let bounds = inner.intersection(buffer.area);
        safe_set_string(buffer, bounds, inner.x, inner.y + row, &text, body_style());
        app.intents.push((
            row_rect(inner, row, text.chars().count() as u16),
            Intent::Track(index),
        ));
    }
}

fn draw_diary(app: &mut App, ui: &mut UiFrame<'_>, inner: Rect) {
    if app.session.state().diary_read {
        draw_plain_text(ui, inner, content::DIARY_LETTER);
        return;
    }
    let prompt = format!("Password: {}_", app.diary_input);
    let buffer = ui.buffer_mut();
    let bounds = inner.intersection(buffer.area);
    safe_set_string(
        buffer,
        bounds,
        inner.x,
        inner.y,
        "This file is encrypted.",
        body_style(),
    );
    safe_set_string(buffer, bounds, inner.x, inner.y + 2, &prompt, body_style());
    let button = "[ Unlock ]";
    safe_set_string(
        buffer,
        bounds,
        inner.x,
        inner.y + 4,
        button,
        body_style().add_modifier(Modifier::BOLD),
    );
    app.intents.push((
        row_rect(inner, 4, button.len() as u16),
        Intent::DiarySubmit,
    ));
    if app.diary_error {
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            inner.y + 6,
            "Incorrect Password.",
            body_style().fg(Color::Red),
        );
    }
}

fn draw_search(app: &mut App, ui: &mut UiFrame<'_>, inner: Rect) {
    let prompt = format!("Search for: {}_", app.search_input);
    {
        let buffer = ui.buffer_mut();
        let bounds = inner.intersection(buffer.area);
        safe_set_string(buffer, bounds, inner.x, inner.y, &prompt, body_style());
        let button = "[ Search Now ]";
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            inner.y + 1,
            button,
            body_style().add_modifier(Modifier::BOLD),
        );
        app.intents.push((
            row_rect(inner, 1, button.len() as u16),
            Intent::SearchSubmit,
        ));
    }
    let results = Rect {
        x: inner.x,
        y: inner.y.saturating_add(3),
        width: inner.width,
        height: inner.height.saturating_sub(3),
    };
    if results.height == 0 {
        return;
    }
    match &app.search_outcome {
        SearchOutcome::Prompt => draw_plain_text(
            ui,
            results,
            "Enter a term to search for system-wide information.",
        ),
        SearchOutcome::Found(entry) => {
            let text = format!("{}\n\n{}", entry.title, entry.body);
            draw_plain_text(ui, results, &text);
        }
        SearchOutcome::Missing(term) => {
            let text = format!("No system-wide results found for \"{term}\".");
            draw_plain_text(ui, results, &text);
        }
    }
}

fn sender_color(kind: Sender) -> Color {
    match kind {
        Sender::Player => Color::LightBlue,
        Sender::Entity => Color::Red,
        Sender::System => Color::Green,
        Sender::Sibling => Color::Blue,
    }
}

fn draw_messenger(app: &mut App, ui: &mut UiFrame<'_>, inner: Rect) {
    let state = app.session.state();

    // bottom strip: choice chips, the word bank, or the epilogue notice
    let chips: Vec<(String, Intent)> = if state.epilogue_started {
        Vec::new()
    } else if state.confrontation_ready && !state.game_ended {
        let mut chips: Vec<(String, Intent)> = content::FINAL_WORDS
            .iter()
            .enumerate()
            .map(|(i, word)| (format!("[{word}]"), Intent::Word(i)))
            .collect();
        if app.final_message_complete() {
            chips.push(("[ Send ]".to_string(), Intent::SendFinal));
        }
        chips
    } else {
        app.session
            .available_choices()
            .into_iter()
            .map(|choice| (format!("[{}]", choice.label), Intent::Choice(choice)))
            .collect()
    };

    let composed_row = (state.confrontation_ready && !state.game_ended) as u16;
    let chip_rows_needed = layout_chip_rows(&chips, inner.width).len() as u16;
    let strip_h = if state.epilogue_started {
        1
    } else {
        (chip_rows_needed + composed_row).min(inner.height / 2)
    };
    let history = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width,
        height: inner.height.saturating_sub(strip_h + 1),
    };
    draw_chat_history(app, ui, history);

    let strip_y = inner.y.saturating_add(inner.height.saturating_sub(strip_h));
    let state = app.session.state();
    if state.epilogue_started {
        let buffer = ui.buffer_mut();
        let bounds = inner.intersection(buffer.area);
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            strip_y,
            "-- CONNECTION TERMINATED --",
            body_style().add_modifier(Modifier::DIM),
        );
        return;
    }

    let mut y = strip_y;
    if composed_row == 1 {
        let composed = format!("> {}", app.final_message.join(" "));
        let buffer = ui.buffer_mut();
        let bounds = inner.intersection(buffer.area);
        safe_set_string(
            buffer,
            bounds,
            inner.x,
            y,
            &truncate_to_width(&composed, inner.width as usize),
            body_style().add_modifier(Modifier::BOLD),
        );
        y = y.saturating_add(1);
    }

    let words_used = app.words_used.clone();
    for row in layout_chip_rows(&chips, inner.width) {
        if y >= inner.y + inner.height {
            break;
        }
        let mut x = inner.x;
        for (text, intent) in row {
            let used = matches!(intent, Intent::Word(i) if words_used.get(i).copied().unwrap_or(false));
            let style = if used {
                body_style().add_modifier(Modifier::DIM)
            } else {
                body_style().fg(Color::Blue)
            };
            let width = text.chars().count() as u16;
            let buffer = ui.buffer_mut();
            let bounds = inner.intersection(buffer.area);
            safe_set_string(buffer, bounds, x, y, &text, style);
            if !used {
                app.intents.push((
                    Rect {
                        x,
                        y,
                        width,
                        height: 1,
                    },
                    intent,
                ));
            }
            x = x.saturating_add(width).saturating_add(1);
        }
        y = y.saturating_add(1);
    }
}

/// Greedy left-to-right packing of chips into rows of at most `width`.
fn layout_chip_rows(chips: &[(String, Intent)], width: u16) -> Vec<Vec<(String, Intent)>> {
    let mut rows: Vec<Vec<(String, Intent)>> = Vec::new();
    let mut current: Vec<(String, Intent)> = Vec::new();
    let mut used = 0u16;
    for (text, intent) in chips {
        let w = text.chars().count() as u16 + 1;
        if used + w > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
        used += w;
        current.push((text.clone(), *intent));
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

fn draw_chat_history(app: &App, ui: &mut UiFrame<'_>, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    // flatten to wrapped lines, then keep the tail that fits
    let mut lines: Vec<(String, Color)> = Vec::new();
    for message in &app.session.state().chat_history {
        let color = sender_color(message.kind);
        let prefix = match message.date {
            Some(date) => format!("[{date}] {}: ", message.sender),
            None => format!("{}: ", message.sender),
        };
        let full = format!("{prefix}{}", message.text);
        for wrapped in wrap_text(&full, area.width as usize) {
            lines.push((wrapped, color));
        }
    }
    let skip = lines.len().saturating_sub(area.height as usize);
    let buffer = ui.buffer_mut();
    let bounds = area.intersection(buffer.area);
    for (row, (line, color)) in lines.into_iter().skip(skip).enumerate() {
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + row as u16,
            &line,
            body_style().fg(color),
        );
    }
}

fn draw_fake_error(ui: &mut UiFrame<'_>, viewport: Rect) {
    let width = 40u16.min(viewport.width);
    let height = 6u16.min(viewport.height);
    let dialog = Rect {
        x: viewport.x + viewport.width.saturating_sub(width) / 2,
        y: viewport.y + viewport.height.saturating_sub(height) / 2,
        width,
        height,
    };
    ui.fill(dialog, Style::default().bg(Color::Gray).fg(Color::Black));
    let title = Rect {
        height: 1,
        ..dialog
    };
    ui.fill(title, Style::default().bg(Color::Blue).fg(Color::White));
    let buffer = ui.buffer_mut();
    let bounds = dialog.intersection(buffer.area);
    safe_set_string(
        buffer,
        bounds,
        dialog.x + 1,
        dialog.y,
        "System Error",
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );
    safe_set_string(
        buffer,
        bounds,
        dialog.x + 2,
        dialog.y + 2,
        "MEMORY_CORRUPTION_DETECTED",
        Style::default()
            .bg(Color::Gray)
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    );
    safe_set_string(
        buffer,
        bounds,
        dialog.x + 2,
        dialog.y + 4,
        "He is still here.",
        Style::default().bg(Color::Gray).fg(Color::Black),
    );
}

fn draw_bsod(ui: &mut UiFrame<'_>, screen: Rect) {
    ui.fill(screen, Style::default().bg(Color::Blue).fg(Color::White));
    let top = screen
        .y
        .saturating_add(screen.height.saturating_sub(BSOD_LINES.len() as u16) / 2);
    let buffer = ui.buffer_mut();
    let bounds = screen.intersection(buffer.area);
    for (row, line) in BSOD_LINES.iter().enumerate() {
        let width = line.chars().count() as u16;
        let x = screen.x + screen.width.saturating_sub(width) / 2;
        safe_set_string(
            buffer,
            bounds,
            x,
            top + row as u16,
            line,
            Style::default().bg(Color::Blue).fg(Color::White),
        );
    }
}

/// Word wrap preserving explicit newlines; words longer than `width` are
/// hard-split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    for raw in text.split('\n') {
        if raw.is_empty() {
            out.push(String::new());
            continue;
        }
        let mut line = String::new();
        for word in raw.split_whitespace() {
            let word_len = word.chars().count();
            let line_len = line.chars().count();
            if line.is_empty() {
                if word_len <= width {
                    line.push_str(word);
                } else {
                    // hard-split an oversized word
                    let mut chars = word.chars().peekable();
                    while chars.peek().is_some() {
                        let chunk: String = chars.by_ref().take(width).collect();
                        out.push(chunk);
                    }
                    if let Some(last) = out.pop() {
                        line = last;
                    }
                }
            } else if line_len + 1 + word_len <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                out.push(std::mem::take(&mut line));
                if word_len <= width {
                    line.push_str(word);
                } else {
                    let mut chars = word.chars().peekable();
                    while chars.peek().is_some() {
                        let chunk: String = chars.by_ref().take(width).collect();
                        out.push(chunk);
                    }
                    if let Some(last) = out.pop() {
                        line = last;
                    }
                }
            }
        }
        out.push(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_text_respects_width_and_newlines() {
        let lines = wrap_text("hello there\n\nbig wide world", 10);
        assert_eq!(lines, vec!["hello", "there", "", "big wide", "world"]);
        for line in wrap_text("an unbreakable_identifier_chain here", 8) {
            assert!(line.chars().count() <= 8);
        }
    }

    #[test]
    fn chip_rows_pack_greedily() {
        let chips = vec![
            ("[aa]".to_string(), Intent::Word(0)),
            ("[bb]".to_string(), Intent::Word(1)),
            ("[cc]".to_string(), Intent::Word(2)),
        ];
        let rows = layout_chip_rows(&chips, 11);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].len(), 1);
    }
}
