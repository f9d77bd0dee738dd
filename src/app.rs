//! Application state: the desktop, the taskbar, the narrative session and
//! the per-window view state glueing them together.
//!
//! The renderer records an intent hit list while painting; the event router
//! resolves presses against it and calls back into [`App::handle_intent`].
//! All narrative consequences go through the session.

use ratatui::layout::Rect;

use crate::chance::Chance;
use crate::constants::DOUBLE_CLICK_MS;
use crate::content::{
    self, BookmarkAction, FileEntry, FolderItem, SearchEntry,
};
use crate::game::{Choice, HauntingEvent, Session, WindowCommand};
use crate::schedule::Tick;
use crate::taskbar::Taskbar;
use crate::window::{Desktop, WindowKind};

/// Desktop icons, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconId {
    MyComputer,
    Messenger,
    Netscape,
    Winamp,
    DevLog,
    KeywordResearch,
    Keywords,
    Diary,
}

impl IconId {
    pub fn label(self) -> &'static str {
        match self {
            IconId::MyComputer => "My Computer",
            IconId::Messenger => "IL_Messenger",
            IconId::Netscape => "Netscape",
            IconId::Winamp => "Winamp",
            IconId::DevLog => "DEV_LOG.txt",
            IconId::KeywordResearch => "keyword_research.txt",
            IconId::Keywords => "keywords.txt",
            IconId::Diary => "Diary_Final_Draft.txt",
        }
    }
}

/// A press resolved from the rendered hit list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Icon(IconId),
    Choice(Choice),
    /// Row index into the explorer's current folder.
    FolderItem(usize),
    /// The single drive row inside My Computer.
    DriveRoot,
    Bookmark(usize),
    Track(usize),
    /// Word-bank button index during the confrontation.
    Word(usize),
    SendFinal,
    SearchSubmit,
    DiarySubmit,
}

/// What the search pane is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Prompt,
    Found(&'static SearchEntry),
    Missing(String),
}

#[derive(Debug, Clone)]
pub struct ViewerContent {
    pub title: String,
    pub body: String,
}

pub struct App {
    pub desktop: Desktop,
    pub taskbar: Taskbar,
    pub session: Session,

    pub start_menu_open: bool,
    pub explorer_folder: &'static str,
    pub viewer: ViewerContent,
    pub chat_viewer: Option<&'static FileEntry>,
    pub search_input: String,
    pub search_outcome: SearchOutcome,
    pub diary_input: String,
    pub diary_error: bool,
    pub archive_unlocked: bool,
    pub final_message: Vec<&'static str>,
    pub words_used: Vec<bool>,

    /// Rendered hit regions, rebuilt every frame.
    pub intents: Vec<(Rect, Intent)>,
    last_icon_press: Option<(IconId, Tick)>,
    prev_haunting: Option<HauntingEvent>,
    pub bell_pending: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(chance: Box<dyn Chance>) -> Self {
        Self {
            desktop: Desktop::new(),
            taskbar: Taskbar::new(),
            session: Session::new(chance),
            start_menu_open: false,
            explorer_folder: "drive_c",
            viewer: ViewerContent {
                title: "Notepad".to_string(),
                body: String::new(),
            },
            chat_viewer: None,
            search_input: String::new(),
            search_outcome: SearchOutcome::Prompt,
            diary_input: String::new(),
            diary_error: false,
            archive_unlocked: false,
            final_message: Vec::new(),
            words_used: vec![false; content::FINAL_WORDS.len()],
            intents: Vec::new(),
            last_icon_press: None,
            prev_haunting: None,
            bell_pending: false,
            should_quit: false,
        }
    }

    /// Icons currently on the desktop; two only appear after their
    /// narrative gates open.
    pub fn visible_icons(&self) -> Vec<IconId> {
        let state = self.session.state();
        let mut icons = vec![
            IconId::MyComputer,
            IconId::Messenger,
            IconId::Netscape,
            IconId::Winamp,
            IconId::DevLog,
            IconId::KeywordResearch,
        ];
        if state.keywords_unlocked {
            icons.push(IconId::Keywords);
        }
        if state.promise_mentioned {
            icons.push(IconId::Diary);
        }
        icons
    }

    /// Advance the logical timeline and apply the side effects that landed:
    /// window commands, the sound cue bell.
    pub fn sync(&mut self, now: Tick, viewport: Rect) {
        self.session.advance_to(now);
        for command in self.session.take_window_commands() {
            match command {
                WindowCommand::OpenMessenger => {
                    self.desktop.open(WindowKind::Messenger, viewport);
                }
                WindowCommand::FocusMessengerIfOpen => {
                    if self.desktop.is_open(WindowKind::Messenger) {
                        self.desktop.restore(WindowKind::Messenger);
                    }
                }
                WindowCommand::LockToMessenger => {
                    self.desktop.lock_to_messenger(viewport);
                }
            }
        }
        let haunting = self.session.state().haunting_event;
        if haunting == Some(HauntingEvent::SoundCue) && self.prev_haunting != haunting {
            self.bell_pending = true;
        }
        self.prev_haunting = haunting;
    }

    /// Single-press on a desktop icon; a second press within the window
    /// counts as a double-click and opens it.
    pub fn icon_pressed(&mut self, icon: IconId, now: Tick, viewport: Rect) {
        if let Some((last, at)) = self.last_icon_press
            && last == icon
            && now.saturating_sub(at) <= DOUBLE_CLICK_MS
        {
            self.last_icon_press = None;
            self.open_icon(icon, viewport);
            return;
        }
        self.last_icon_press = Some((icon, now));
    }

    pub fn open_icon(&mut self, icon: IconId, viewport: Rect) {
        self.session.note_first_interaction();
        match icon {
            IconId::MyComputer => self.open_folder("drive_c", viewport),
            IconId::Messenger => self.desktop.open(WindowKind::Messenger, viewport),
            IconId::Netscape => self.desktop.open(WindowKind::Netscape, viewport),
            IconId::Winamp => self.desktop.open(WindowKind::Winamp, viewport),
            IconId::DevLog => self.open_dev_log(viewport),
            IconId::KeywordResearch => self.open_text_file("keyword_research", viewport),
            IconId::Keywords => self.open_keywords_file(viewport),
            IconId::Diary => self.desktop.open(WindowKind::Diary, viewport),
        }
    }

    pub fn handle_intent(&mut self, intent: Intent, now: Tick, viewport: Rect) {
        // timers armed by this intent must measure from the press instant,
        // not from the last frame sync
        self.session.advance_to(now);
        match intent {
            Intent::Icon(icon) => self.icon_pressed(icon, now, viewport),
            Intent::Choice(choice) => self.session.select_choice(choice),
            Intent::DriveRoot => {
                self.session.note_first_interaction();
                self.open_folder("drive_c", viewport);
            }
            Intent::FolderItem(index) => self.open_folder_item(index, viewport),
            Intent::Bookmark(index) => self.open_bookmark(index, viewport),
            Intent::Track(index) => self.play_track(index),
            Intent::Word(index) => self.pick_word(index),
            Intent::SendFinal => self.send_final_message(),
            Intent::SearchSubmit => self.submit_search(),
            Intent::DiarySubmit => self.submit_diary_password(),
        }
    }

    // ---- files and folders ---------------------------------------------

    pub fn open_folder(&mut self, folder_id: &'static str, viewport: Rect) {
        if let Some(folder) = content::folder(folder_id) {
            self.explorer_folder = folder_id;
            self.desktop.open(WindowKind::FileExplorer, viewport);
            self.desktop.set_title(WindowKind::FileExplorer, folder.title);
        }
    }

    fn open_folder_item(&mut self, index: usize, viewport: Rect) {
        let Some(folder) = content::folder(self.explorer_folder) else {
            return;
        };
        let Some(entry) = folder.entries.get(index) else {
            return;
        };
        self.session.note_first_interaction();
        match entry.item {
            FolderItem::Folder(id) => self.open_folder(id, viewport),
            FolderItem::TextFile(id) => self.open_text_file(id, viewport),
            FolderItem::ChatLog(id) => self.open_chat_log(id, viewport),
            FolderItem::Photo { topic, flavor } => self.session.discover_clue(topic, flavor),
            FolderItem::Corrupted => {}
        }
    }

    pub fn open_text_file(&mut self, file_id: &'static str, viewport: Rect) {
        self.session.note_first_interaction();
        if let Some(file) = content::file_entry(file_id) {
            self.viewer = ViewerContent {
                title: file.title.to_string(),
                body: file.body.to_string(),
            };
            self.desktop.open(WindowKind::TextViewer, viewport);
            self.desktop.set_title(WindowKind::TextViewer, file.title);
            self.session.open_file(file_id);
        }
    }

    pub fn open_chat_log(&mut self, file_id: &'static str, viewport: Rect) {
        if let Some(file) = content::file_entry(file_id) {
            self.chat_viewer = Some(file);
            self.desktop.open(WindowKind::ChatLogViewer, viewport);
            self.desktop.set_title(WindowKind::ChatLogViewer, file.title);
            self.session.open_file(file_id);
        }
    }

    fn open_dev_log(&mut self, viewport: Rect) {
        if let Some(file) = content::file_entry("dev_log") {
            self.desktop.open(WindowKind::DevLogViewer, viewport);
            self.desktop.set_title(WindowKind::DevLogViewer, file.title);
        }
    }

    fn open_keywords_file(&mut self, viewport: Rect) {
        self.viewer = ViewerContent {
            title: "keywords.txt".to_string(),
            body: self.session.keywords_file_body(),
        };
        self.desktop.open(WindowKind::TextViewer, viewport);
        self.desktop.set_title(WindowKind::TextViewer, "keywords.txt");
        self.session.open_file("keywords.txt");
    }

    // ---- browser and playlist ------------------------------------------

    fn open_bookmark(&mut self, index: usize, _viewport: Rect) {
        let Some(bookmark) = content::bookmarks().get(index) else {
            return;
        };
        self.session.note_first_interaction();
        match bookmark.action {
            BookmarkAction::Discover { topic, flavor } => {
                self.session.discover_clue(topic, flavor);
            }
            BookmarkAction::NewsArchive => {
                if self.session.access_news_archive() {
                    self.archive_unlocked = true;
                }
            }
        }
    }

    fn play_track(&mut self, index: usize) {
        let Some(track) = content::playlist().get(index) else {
            return;
        };
        self.session.note_first_interaction();
        if let Some((topic, flavor)) = track.discover {
            self.session.discover_clue(topic, flavor);
        }
    }

    // ---- search and diary ----------------------------------------------

    pub fn submit_search(&mut self) {
        self.session.note_first_interaction();
        let query = self.search_input.clone();
        if query.trim().is_empty() {
            return;
        }
        self.search_outcome = match self.session.search(&query) {
            Some(entry) => SearchOutcome::Found(entry),
            None => SearchOutcome::Missing(query.trim().to_lowercase()),
        };
    }

    pub fn submit_diary_password(&mut self) {
        let input = std::mem::take(&mut self.diary_input);
        self.diary_error = !self.session.check_diary_password(&input);
    }

    // ---- confrontation --------------------------------------------------

    fn pick_word(&mut self, index: usize) {
        if self.words_used.get(index).copied().unwrap_or(true) {
            return;
        }
        self.words_used[index] = true;
        self.final_message.push(content::FINAL_WORDS[index]);
    }

    pub fn final_message_complete(&self) -> bool {
        self.final_message.len() == content::FINAL_WORDS.len()
    }

    fn send_final_message(&mut self) {
        if self.final_message_complete() {
            let message = self.final_message.join(" ");
            self.session.trigger_end_sequence(message);
        }
    }

    // ---- clock -----------------------------------------------------------

    /// Taskbar clock label. Runs forward from the session's fixed start
    /// instant; during the epilogue it snaps to the date of the last
    /// delivered message.
    pub fn clock_label(&self) -> String {
        let state = self.session.state();
        if state.epilogue_started
            && let Some(date) = state.chat_history.last().and_then(|m| m.date)
        {
            return date.to_string();
        }
        let total_min = 22 * 60 + 14 + self.session.now() / 60_000;
        let h24 = (total_min / 60) % 24;
        let minute = total_min % 60;
        let (h12, meridiem) = match h24 {
            0 => (12, "AM"),
            1..=11 => (h24, "AM"),
            12 => (12, "PM"),
            _ => (h24 - 12, "PM"),
        };
        format!("{h12}:{minute:02} {meridiem} 12/27/1999")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chance::ScriptedChance;

    fn app() -> App {
        App::new(Box::new(ScriptedChance::new()))
    }

    fn viewport() -> Rect {
        Rect::new(0, 0, 100, 30)
    }

    #[test]
    fn double_click_opens_the_icon_single_click_does_not() {
        let mut a = app();
        a.icon_pressed(IconId::Netscape, 1000, viewport());
        assert!(!a.desktop.is_open(WindowKind::Netscape));
        a.icon_pressed(IconId::Netscape, 1000 + DOUBLE_CLICK_MS, viewport());
        assert!(a.desktop.is_open(WindowKind::Netscape));
    }

    #[test]
    fn slow_second_click_restarts_the_double_click_window() {
        let mut a = app();
        a.icon_pressed(IconId::Winamp, 1000, viewport());
        a.icon_pressed(IconId::Winamp, 1000 + DOUBLE_CLICK_MS + 1, viewport());
        assert!(!a.desktop.is_open(WindowKind::Winamp));
        a.icon_pressed(IconId::Winamp, 1000 + DOUBLE_CLICK_MS + 100, viewport());
        assert!(a.desktop.is_open(WindowKind::Winamp));
    }

    #[test]
    fn gated_icons_appear_with_their_flags() {
        let mut a = app();
        assert!(!a.visible_icons().contains(&IconId::Keywords));
        assert!(!a.visible_icons().contains(&IconId::Diary));
        // any topic unlock raises the keywords flag
        a.session
            .discover_clue(crate::content::TopicId::Kielala, "a photo");
        assert!(a.visible_icons().contains(&IconId::Keywords));
    }

    #[test]
    fn word_bank_consumes_each_word_once() {
        let mut a = app();
        a.handle_intent(Intent::Word(0), 0, viewport());
        a.handle_intent(Intent::Word(0), 0, viewport());
        assert_eq!(a.final_message, vec![content::FINAL_WORDS[0]]);
    }

    #[test]
    fn send_final_requires_a_complete_message() {
        let mut a = app();
        a.handle_intent(Intent::Word(0), 0, viewport());
        a.handle_intent(Intent::SendFinal, 0, viewport());
        assert!(!a.session.state().game_ended);
        for i in 1..content::FINAL_WORDS.len() {
            a.handle_intent(Intent::Word(i), 0, viewport());
        }
        a.handle_intent(Intent::SendFinal, 0, viewport());
        assert!(a.session.state().game_ended);
    }

    #[test]
    fn intents_advance_the_session_clock() {
        let mut a = app();
        a.handle_intent(Intent::Track(0), 5_000, viewport());
        assert_eq!(a.session.now(), 5_000);
    }

    #[test]
    fn search_submit_surfaces_the_indexed_entry() {
        let mut a = app();
        a.search_input = "tell me about y2k".to_string();
        a.submit_search();
        let entry = content::search_index()
            .iter()
            .find_map(|(key, entry)| (*key == "y2k").then_some(entry))
            .expect("indexed");
        assert_eq!(a.search_outcome, SearchOutcome::Found(entry));
    }

    #[test]
    fn diary_submit_reports_bad_passwords() {
        let mut a = app();
        a.diary_input = "letmein".to_string();
        a.submit_diary_password();
        assert!(a.diary_error);
        assert!(!a.session.state().diary_read);
        a.diary_input = content::DIARY_PASSWORD.to_string();
        a.submit_diary_password();
        assert!(!a.diary_error);
        assert!(a.session.state().diary_read);
    }

    #[test]
    fn clock_runs_forward_from_the_fixed_start() {
        let mut a = app();
        assert_eq!(a.clock_label(), "10:14 PM 12/27/1999");
        a.session.advance_to(50 * 60_000);
        assert_eq!(a.clock_label(), "11:04 PM 12/27/1999");
        a.session.advance_to(110 * 60_000);
        assert_eq!(a.clock_label(), "12:04 AM 12/27/1999");
    }

    #[test]
    fn opening_a_text_file_routes_through_the_session() {
        let mut a = app();
        a.open_text_file("notes", viewport());
        assert!(a.desktop.is_open(WindowKind::TextViewer));
        assert!(a.session.state().opened_files.contains("notes"));
        // the clue file registered its clue
        assert!(
            a.session
                .state()
                .collected_clues
                .contains(&crate::content::ClueId::Sickness)
        );
    }
}
