//! Read-only content tables: the story graph, file bodies, search index,
//! folder trees, bookmarks, playlist and the scripted end/epilogue
//! sequences.
//!
//! The engine only ever does exact and substring lookups against the keys in
//! here; it never interprets the bodies. Swapping this module out retells
//! the story without touching the core.

mod data;

pub use data::{
    ARCHIVE_ERROR_NOTICE, ARCHIVE_SUCCESS_NOTICE, DIARY_LETTER, DIARY_PASSWORD,
    DIARY_UNLOCKED_NOTICE, FINAL_WORDS, FRAGMENT_NOTICE, ambient_phrases, bookmarks,
    clue_for_file, end_sequence, epilogue_script, file_entry, folder, haunted_files, playlist,
    search_index, story_node,
};

/// Player-facing conversation subjects. Unlocking one is permanent; its chat
/// chip disappears once the backing node has been discussed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TopicId {
    OtomeMedia,
    Kielala,
    HospitalRecording,
    Diary,
    Y2k,
}

impl TopicId {
    pub const ALL: [TopicId; 5] = [
        TopicId::OtomeMedia,
        TopicId::Kielala,
        TopicId::HospitalRecording,
        TopicId::Diary,
        TopicId::Y2k,
    ];

    /// Human name shown in the keywords file.
    pub fn display_name(self) -> &'static str {
        match self {
            TopicId::OtomeMedia => "Otome Media",
            TopicId::Kielala => "Kielala",
            TopicId::HospitalRecording => "The hospital recording",
            TopicId::Diary => "The locked diary file",
            TopicId::Y2k => "Y2K",
        }
    }

    /// Bracketed label used for the chat chip and unlock notices.
    pub fn chip_label(self) -> &'static str {
        match self {
            TopicId::OtomeMedia => "[Otome Media]",
            TopicId::Kielala => "[Kielala]",
            TopicId::HospitalRecording => "[The hospital recording]",
            TopicId::Diary => "[The locked file]",
            TopicId::Y2k => "[Y2K]",
        }
    }

    /// Story node entered when the topic chip is chosen.
    pub fn node_id(self) -> &'static str {
        match self {
            TopicId::OtomeMedia => "topic_otome_media",
            TopicId::Kielala => "topic_kielala",
            TopicId::HospitalRecording => "topic_hospital_recording",
            TopicId::Diary => "topic_diary",
            TopicId::Y2k => "topic_y2k",
        }
    }
}

/// Internal triggers collected by reading specific content; combinations of
/// these gate one-shot narrative events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClueId {
    Sickness,
    Stress,
}

#[derive(Debug, Clone, Copy)]
pub struct StoryOption {
    pub label: &'static str,
    pub action: &'static str,
}

/// One node of the dialogue graph: scripted response lines plus the choices
/// offered afterwards.
#[derive(Debug, Clone, Copy)]
pub struct StoryNode {
    pub response: &'static [&'static str],
    pub options: &'static [StoryOption],
}

#[derive(Debug, Clone, Copy)]
pub struct FileEntry {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEntry {
    pub title: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Folder {
    pub title: &'static str,
    pub entries: &'static [FolderEntry],
}

#[derive(Debug, Clone, Copy)]
pub struct FolderEntry {
    pub label: &'static str,
    pub item: FolderItem,
}

#[derive(Debug, Clone, Copy)]
pub enum FolderItem {
    /// Descend into another folder.
    Folder(&'static str),
    /// Open in the plain text viewer.
    TextFile(&'static str),
    /// Open in the chat log viewer.
    ChatLog(&'static str),
    /// Viewing the photo discovers a topic.
    Photo {
        topic: TopicId,
        flavor: &'static str,
    },
    /// Unopenable filler.
    Corrupted,
}

#[derive(Debug, Clone, Copy)]
pub enum BookmarkAction {
    Discover {
        topic: TopicId,
        flavor: &'static str,
    },
    NewsArchive,
}

#[derive(Debug, Clone, Copy)]
pub struct Bookmark {
    pub label: &'static str,
    /// Replacement label once the archive gate has opened.
    pub unlocked_label: Option<&'static str>,
    pub action: BookmarkAction,
}

#[derive(Debug, Clone, Copy)]
pub struct Track {
    pub label: &'static str,
    pub discover: Option<(TopicId, &'static str)>,
}

/// One end-sequence line and the pause that follows it.
#[derive(Debug, Clone, Copy)]
pub struct TimedLine {
    pub text: &'static str,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpilogueSender {
    Sibling,
    System,
}

#[derive(Debug, Clone, Copy)]
pub struct EpilogueLine {
    pub sender: EpilogueSender,
    pub text: &'static str,
    pub date: &'static str,
    pub html: bool,
}
