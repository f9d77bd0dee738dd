//! The pure reducer over the narrative aggregate.
//!
//! Every mutation of [`SessionState`] funnels through [`reduce`]: the
//! scheduling layer above composes actions, the reducer applies them whole,
//! so readers never observe a torn intermediate state.

use crate::content::{ClueId, TopicId};

use super::state::{ChatMessage, Sender, SessionState, StatePatch};

/// A chat message minus its id; the reducer assigns ids so creation order is
/// strictly increasing no matter which timer fired first.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub sender: &'static str,
    pub kind: Sender,
    pub text: String,
    pub html: bool,
    pub date: Option<&'static str>,
}

impl MessageDraft {
    pub fn player(text: impl Into<String>) -> Self {
        Self {
            sender: "You",
            kind: Sender::Player,
            text: text.into(),
            html: false,
            date: None,
        }
    }

    pub fn entity(text: impl Into<String>) -> Self {
        Self {
            sender: "IL_Otome99",
            kind: Sender::Entity,
            text: text.into(),
            html: false,
            date: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            sender: "System",
            kind: Sender::System,
            text: text.into(),
            html: false,
            date: None,
        }
    }

    pub fn sibling(text: impl Into<String>) -> Self {
        Self {
            sender: "Kielala_O",
            kind: Sender::Sibling,
            text: text.into(),
            html: false,
            date: None,
        }
    }

    pub fn with_date(mut self, date: &'static str) -> Self {
        self.date = Some(date);
        self
    }

    pub fn as_html(mut self) -> Self {
        self.html = true;
        self
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Append one message to the history.
    Append(MessageDraft),
    /// Append several messages, preserving the given order exactly.
    AppendAll(Vec<MessageDraft>),
    /// Move to a story node.
    AdvanceNode(String),
    /// Move to a topic node and retire its chat chip.
    DiscussTopic(String),
    /// Unlock a topic; also raises the monotonic keywords-file flag.
    UnlockTopic(TopicId),
    /// Record a collected clue.
    CollectClue(ClueId),
    /// Record a first-time file open.
    MarkFileOpened(String),
    /// Shallow partial-state override.
    Merge(StatePatch),
}

pub fn reduce(mut state: SessionState, action: Action) -> SessionState {
    match action {
        Action::Append(draft) => {
            push_message(&mut state, draft);
        }
        Action::AppendAll(drafts) => {
            for draft in drafts {
                push_message(&mut state, draft);
            }
        }
        Action::AdvanceNode(node) => {
            state.story_node = node;
        }
        Action::DiscussTopic(node) => {
            state.discussed_topics.insert(node.clone());
            state.story_node = node;
        }
        Action::UnlockTopic(topic) => {
            state.unlocked_topics.insert(topic);
            state.keywords_unlocked = true;
        }
        Action::CollectClue(clue) => {
            state.collected_clues.insert(clue);
        }
        Action::MarkFileOpened(id) => {
            state.opened_files.insert(id);
        }
        Action::Merge(patch) => {
            apply_patch(&mut state, patch);
        }
    }
    state
}

fn push_message(state: &mut SessionState, draft: MessageDraft) {
    let id = state.take_message_id();
    state.chat_history.push(ChatMessage {
        id,
        sender: draft.sender,
        kind: draft.kind,
        text: draft.text,
        html: draft.html,
        date: draft.date,
    });
}

fn apply_patch(state: &mut SessionState, patch: StatePatch) {
    if let Some(v) = patch.first_interaction_done {
        state.first_interaction_done = v;
    }
    if let Some(v) = patch.messenger_opened {
        state.messenger_opened = v;
    }
    if let Some(v) = patch.entity_contacted {
        state.entity_contacted = v;
    }
    if let Some(v) = patch.promise_mentioned {
        state.promise_mentioned = v;
    }
    if let Some(v) = patch.diary_read {
        state.diary_read = v;
    }
    if let Some(v) = patch.confrontation_ready {
        state.confrontation_ready = v;
    }
    if let Some(v) = patch.fragment_revealed {
        state.fragment_revealed = v;
    }
    if let Some(v) = patch.game_ended {
        state.game_ended = v;
    }
    if let Some(v) = patch.crash_active {
        state.crash_active = v;
    }
    if let Some(v) = patch.epilogue_started {
        state.epilogue_started = v;
    }
    if let Some(v) = patch.haunting_event {
        state.haunting_event = v;
    }
    if let Some(v) = patch.fake_error_visible {
        state.fake_error_visible = v;
    }
    if patch.clear_chat {
        state.chat_history.clear();
    }
}
