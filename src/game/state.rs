//! The narrative aggregate and the chat message record.

use std::collections::BTreeSet;

use crate::content::{ClueId, TopicId};

/// Who a chat message came from, decided at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Player,
    Entity,
    System,
    Sibling,
}

/// An immutable, creation-ordered chat record. History is append-only and
/// never reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: &'static str,
    pub kind: Sender,
    pub text: String,
    pub html: bool,
    /// Faked chronological date shown during the epilogue.
    pub date: Option<&'static str>,
}

/// Transient disturbance kinds layered over the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HauntingEvent {
    Glitch,
    ErrorDialog,
    SoundCue,
}

/// The single narrative aggregate. Mutated exclusively through
/// [`reduce`](crate::game::reduce); milestone flags are monotonic except for
/// the explicit epilogue reinitialization.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub story_node: String,
    pub unlocked_topics: BTreeSet<TopicId>,
    pub discussed_topics: BTreeSet<String>,
    pub collected_clues: BTreeSet<ClueId>,
    pub opened_files: BTreeSet<String>,
    pub chat_history: Vec<ChatMessage>,

    pub first_interaction_done: bool,
    pub messenger_opened: bool,
    pub entity_contacted: bool,
    pub promise_mentioned: bool,
    pub diary_read: bool,
    pub confrontation_ready: bool,
    pub keywords_unlocked: bool,
    /// One-shot guard for the combined-clue fragment; set when the fragment
    /// is scheduled, not when it lands.
    pub fragment_revealed: bool,
    pub game_ended: bool,
    pub crash_active: bool,
    pub epilogue_started: bool,

    pub haunting_event: Option<HauntingEvent>,
    pub fake_error_visible: bool,

    next_message_id: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            story_node: "start".to_string(),
            unlocked_topics: BTreeSet::new(),
            discussed_topics: BTreeSet::new(),
            collected_clues: BTreeSet::new(),
            opened_files: BTreeSet::new(),
            chat_history: Vec::new(),
            first_interaction_done: false,
            messenger_opened: false,
            entity_contacted: false,
            promise_mentioned: false,
            diary_read: false,
            confrontation_ready: false,
            keywords_unlocked: false,
            fragment_revealed: false,
            game_ended: false,
            crash_active: false,
            epilogue_started: false,
            haunting_event: None,
            fake_error_visible: false,
            next_message_id: 0,
        }
    }

    /// Hand out the next strictly increasing message id.
    pub(crate) fn take_message_id(&mut self) -> u64 {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Shallow field-by-field override applied by the merge action. `None`
/// fields are left untouched; `clear_chat` empties the history (used only by
/// the epilogue reinitialization).
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub first_interaction_done: Option<bool>,
    pub messenger_opened: Option<bool>,
    pub entity_contacted: Option<bool>,
    pub promise_mentioned: Option<bool>,
    pub diary_read: Option<bool>,
    pub confrontation_ready: Option<bool>,
    pub fragment_revealed: Option<bool>,
    pub game_ended: Option<bool>,
    pub crash_active: Option<bool>,
    pub epilogue_started: Option<bool>,
    pub haunting_event: Option<Option<HauntingEvent>>,
    pub fake_error_visible: Option<bool>,
    pub clear_chat: bool,
}
