//! The session engine: intents in, scheduled effects out.
//!
//! [`Session`] owns the narrative aggregate, the effect schedule and the
//! chance source. UI code calls the intent methods synchronously; everything
//! delayed goes through [`Schedule`] and lands when [`advance_to`] crosses
//! the deadline. Window-level side effects (opening or focusing the
//! messenger, locking the desktop for the epilogue) are queued as
//! [`WindowCommand`]s for the runner to drain each frame.
//!
//! [`advance_to`]: Session::advance_to

use tracing::debug;

use crate::chance::Chance;
use crate::constants::{
    AMBIENT_CHANCE, AMBIENT_INTERVAL_MS, CHOICE_REPLY_DELAY_MS, CLUE_COMBO_DELAY_MS,
    END_SEQUENCE_LEAD_MS, END_SEQUENCE_TRAIL_MS, EPILOGUE_DELAY_MS, EPILOGUE_FIRST_MS,
    EPILOGUE_STEP_MS, FAKE_ERROR_VISIBLE_MS, FIRST_CONTACT_DELAY_MS, HAUNTING_TAG_MS,
    PLAYBACK_BASE_DELAY_MS, PLAYBACK_LINE_DELAY_MS, PLAYBACK_PER_CHAR_MS,
};
use crate::content::{
    self, ClueId, EpilogueSender, SearchEntry, TopicId,
};
use crate::schedule::{Schedule, Tick};

use super::reducer::{Action, MessageDraft, reduce};
use super::state::{HauntingEvent, SessionState, StatePatch};

/// Everything that can land from the schedule.
#[derive(Debug, Clone)]
enum Effect {
    /// Append one finished message.
    Line(MessageDraft),
    /// The entity makes first contact.
    FirstContact,
    /// The entity answers the choice that led to this node.
    ChoiceReply(&'static str),
    /// The combined-clue memory fragment surfaces.
    FragmentReveal,
    /// Clear the transient haunting tag.
    ClearHauntingTag,
    /// Dismiss the fake system-error dialog.
    ClearFakeError,
    /// The end sequence bottoms out into the crash screen.
    CriticalFailure,
    /// The crash screen gives way to the epilogue.
    BeginEpilogue,
    /// Periodic ambient disturbance check.
    AmbientRoll,
}

/// Desktop-level side effects the engine cannot perform itself; the runner
/// drains these once per frame, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    OpenMessenger,
    FocusMessengerIfOpen,
    /// Epilogue: close everything else and pin the messenger open.
    LockToMessenger,
}

/// One selectable dialogue choice, either a story-node option or the chip of
/// an unlocked, not-yet-discussed topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub action: &'static str,
}

pub struct Session {
    state: SessionState,
    schedule: Schedule<Effect>,
    chance: Box<dyn Chance>,
    now: Tick,
    window_commands: Vec<WindowCommand>,
    ambient_armed: bool,
}

impl Session {
    pub fn new(chance: Box<dyn Chance>) -> Self {
        Self {
            state: SessionState::new(),
            schedule: Schedule::new(),
            chance,
            now: 0,
            window_commands: Vec::new(),
            ambient_armed: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    /// Deadline of the nearest pending effect, for frame pacing.
    pub fn next_due(&self) -> Option<Tick> {
        self.schedule.next_due()
    }

    /// Move the timeline forward and fire everything that came due. The
    /// logical clock sits at each effect's own deadline while it fires, so
    /// cascaded delays are measured from the deadline and stay exact no
    /// matter how coarse the advance is.
    pub fn advance_to(&mut self, now: Tick) {
        let target = now.max(self.now);
        while let Some((due, effect)) = self.schedule.pop_due(target) {
            self.now = due.max(self.now);
            self.fire(effect);
        }
        self.now = target;
    }

    /// Commands queued since the last drain, in queueing order.
    pub fn take_window_commands(&mut self) -> Vec<WindowCommand> {
        std::mem::take(&mut self.window_commands)
    }

    // ---- intents -------------------------------------------------------

    /// First meaningful desktop interaction. Arms the one-shot first-contact
    /// timer.
    pub fn note_first_interaction(&mut self) {
        if self.state.first_interaction_done {
            return;
        }
        self.apply(Action::Merge(StatePatch {
            first_interaction_done: Some(true),
            ..Default::default()
        }));
        self.schedule
            .submit_in(self.now, FIRST_CONTACT_DELAY_MS, Effect::FirstContact);
        debug!("first interaction noted, contact armed");
    }

    /// The player picks a dialogue choice. The choice echoes immediately;
    /// the reply is delayed.
    pub fn select_choice(&mut self, choice: Choice) {
        if self.state.game_ended || self.state.epilogue_started {
            return;
        }
        self.apply(Action::Append(MessageDraft::player(choice.label)));
        if choice.action.starts_with("topic_") {
            self.apply(Action::DiscussTopic(choice.action.to_string()));
        } else {
            self.apply(Action::AdvanceNode(choice.action.to_string()));
        }
        self.schedule.submit_in(
            self.now,
            CHOICE_REPLY_DELAY_MS,
            Effect::ChoiceReply(choice.action),
        );
    }

    /// Unlock a topic found outside the chat (photos, bookmarks, the
    /// playlist). Repeat discoveries are silent no-ops.
    pub fn discover_clue(&mut self, topic: TopicId, flavor: &'static str) {
        if self.state.game_ended || self.state.unlocked_topics.contains(&topic) {
            return;
        }
        self.apply(Action::UnlockTopic(topic));
        self.apply(Action::AppendAll(vec![
            MessageDraft::system(flavor),
            MessageDraft::system(format!("New Topic Unlocked: {}", topic.chip_label())),
        ]));
        debug!(topic = ?topic, "topic unlocked");
    }

    /// Record an internal clue; the second distinct clue arms the one-shot
    /// fragment reveal.
    pub fn collect_clue(&mut self, clue: ClueId) {
        self.apply(Action::CollectClue(clue));
        if self.state.collected_clues.len() >= 2 && !self.state.fragment_revealed {
            // guard set at scheduling time so a re-collect cannot double-arm
            self.apply(Action::Merge(StatePatch {
                fragment_revealed: Some(true),
                ..Default::default()
            }));
            self.schedule
                .submit_in(self.now, CLUE_COMBO_DELAY_MS, Effect::FragmentReveal);
            debug!("clue combination armed");
        }
    }

    /// Correct diary password accepted. One-shot.
    pub fn unlock_diary(&mut self) {
        if self.state.diary_read {
            return;
        }
        self.apply(Action::Merge(StatePatch {
            diary_read: Some(true),
            ..Default::default()
        }));
        self.apply(Action::Append(MessageDraft::system(
            content::DIARY_UNLOCKED_NOTICE,
        )));
        debug!("diary unlocked");
    }

    /// Case-sensitive exact password check; unlocks on success.
    pub fn check_diary_password(&mut self, input: &str) -> bool {
        let ok = input == content::DIARY_PASSWORD;
        if ok {
            self.unlock_diary();
        }
        ok
    }

    /// Attempt the news-archive bookmark. Returns whether the archive page
    /// should be shown.
    pub fn access_news_archive(&mut self) -> bool {
        if !self.state.diary_read {
            self.apply(Action::Append(MessageDraft::system(
                content::ARCHIVE_ERROR_NOTICE,
            )));
            return false;
        }
        if !self.state.confrontation_ready {
            self.apply(Action::Merge(StatePatch {
                confrontation_ready: Some(true),
                ..Default::default()
            }));
            self.apply(Action::Append(MessageDraft::system(
                content::ARCHIVE_SUCCESS_NOTICE,
            )));
            debug!("confrontation ready");
        }
        true
    }

    /// The player sends the assembled final message. One-shot; starts the
    /// scripted end sequence.
    pub fn trigger_end_sequence(&mut self, final_message: String) {
        if self.state.game_ended {
            return;
        }
        self.apply(Action::Merge(StatePatch {
            game_ended: Some(true),
            ..Default::default()
        }));
        self.apply(Action::Append(MessageDraft::player(final_message)));

        // each line goes through the playback lead like any scripted reply
        let mut at = self.now.saturating_add(END_SEQUENCE_LEAD_MS);
        for line in content::end_sequence() {
            self.schedule.submit(
                at.saturating_add(PLAYBACK_BASE_DELAY_MS),
                Effect::Line(MessageDraft::entity(line.text)),
            );
            at = at.saturating_add(line.delay_ms);
        }
        self.schedule
            .submit(at.saturating_add(END_SEQUENCE_TRAIL_MS), Effect::CriticalFailure);
        debug!("end sequence started");
    }

    /// A file was opened. First opens of haunted files trigger a
    /// disturbance; clue-bearing files always register their clue.
    pub fn open_file(&mut self, file_id: &str) {
        if !self.state.opened_files.contains(file_id) {
            self.apply(Action::MarkFileOpened(file_id.to_string()));
            if content::haunted_files().contains(&file_id) {
                self.trigger_haunting();
            }
        }
        if let Some(clue) = content::clue_for_file(file_id) {
            self.collect_clue(clue);
        }
    }

    /// Search-engine lookup: lowercased, trimmed query matched by substring
    /// against the index keys in order. The "y2k" key additionally unlocks
    /// its topic, once.
    pub fn search(&mut self, query: &str) -> Option<&'static SearchEntry> {
        let term = query.to_lowercase();
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        for (key, entry) in content::search_index() {
            if term.contains(key) {
                if *key == "y2k" && !self.state.unlocked_topics.contains(&TopicId::Y2k) {
                    self.apply(Action::UnlockTopic(TopicId::Y2k));
                    self.apply(Action::Append(MessageDraft::system(format!(
                        "New Topic Unlocked: {}",
                        TopicId::Y2k.chip_label()
                    ))));
                }
                return Some(entry);
            }
        }
        None
    }

    // ---- view models ---------------------------------------------------

    /// Choices currently offered: the story node's options followed by the
    /// chips of unlocked, undiscussed topics. Empty once the confrontation
    /// word bank takes over.
    pub fn available_choices(&self) -> Vec<Choice> {
        if self.state.confrontation_ready || self.state.game_ended || self.state.epilogue_started {
            return Vec::new();
        }
        let mut choices = Vec::new();
        if let Some(node) = content::story_node(&self.state.story_node) {
            for option in node.options {
                choices.push(Choice {
                    label: option.label,
                    action: option.action,
                });
            }
        }
        for topic in TopicId::ALL {
            if self.state.unlocked_topics.contains(&topic)
                && !self.state.discussed_topics.contains(topic.node_id())
            {
                choices.push(Choice {
                    label: topic.chip_label(),
                    action: topic.node_id(),
                });
            }
        }
        choices
    }

    /// Body of the keywords file, regenerated from the unlocked set.
    pub fn keywords_file_body(&self) -> String {
        let mut body = String::from("RESEARCH KEYWORDS\n=================\n\n");
        let mut any = false;
        for topic in TopicId::ALL {
            if self.state.unlocked_topics.contains(&topic) {
                body.push_str("- ");
                body.push_str(topic.display_name());
                body.push('\n');
                any = true;
            }
        }
        if !any {
            body.push_str("(No keywords logged)\n");
        }
        body
    }

    // ---- internals -----------------------------------------------------

    fn apply(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    fn fire(&mut self, effect: Effect) {
        match effect {
            Effect::Line(draft) => self.apply(Action::Append(draft)),
            Effect::FirstContact => self.fire_first_contact(),
            Effect::ChoiceReply(action) => self.fire_choice_reply(action),
            Effect::FragmentReveal => {
                self.apply(Action::Append(MessageDraft::system(
                    content::FRAGMENT_NOTICE,
                )));
            }
            Effect::ClearHauntingTag => {
                self.apply(Action::Merge(StatePatch {
                    haunting_event: Some(None),
                    ..Default::default()
                }));
            }
            Effect::ClearFakeError => {
                self.apply(Action::Merge(StatePatch {
                    fake_error_visible: Some(false),
                    ..Default::default()
                }));
            }
            Effect::CriticalFailure => self.fire_critical_failure(),
            Effect::BeginEpilogue => self.fire_epilogue(),
            Effect::AmbientRoll => self.fire_ambient_roll(),
        }
    }

    fn fire_first_contact(&mut self) {
        self.window_commands.push(WindowCommand::OpenMessenger);
        self.apply(Action::Merge(StatePatch {
            messenger_opened: Some(true),
            ..Default::default()
        }));
        if self.state.entity_contacted {
            return;
        }
        self.apply(Action::Merge(StatePatch {
            entity_contacted: Some(true),
            ..Default::default()
        }));
        self.arm_ambient();
        if let Some(node) = content::story_node("start") {
            self.schedule_entity_lines(node.response);
        }
        debug!("first contact");
    }

    fn fire_choice_reply(&mut self, action: &'static str) {
        if action == "ask_more_kielala" && !self.state.promise_mentioned {
            self.apply(Action::Merge(StatePatch {
                promise_mentioned: Some(true),
                ..Default::default()
            }));
        }
        if let Some(node) = content::story_node(action) {
            if !node.response.is_empty() {
                self.schedule_entity_lines(node.response);
            }
        }
    }

    fn fire_critical_failure(&mut self) {
        self.apply(Action::Merge(StatePatch {
            crash_active: Some(true),
            ..Default::default()
        }));
        self.schedule
            .submit_in(self.now, EPILOGUE_DELAY_MS, Effect::BeginEpilogue);
        debug!("critical failure");
    }

    fn fire_epilogue(&mut self) {
        self.apply(Action::Merge(StatePatch {
            epilogue_started: Some(true),
            crash_active: Some(false),
            game_ended: Some(false),
            clear_chat: true,
            ..Default::default()
        }));
        self.window_commands.push(WindowCommand::LockToMessenger);
        let mut at = self.now.saturating_add(EPILOGUE_FIRST_MS);
        for line in content::epilogue_script() {
            let mut draft = match line.sender {
                EpilogueSender::Sibling => MessageDraft::sibling(line.text),
                EpilogueSender::System => MessageDraft::system(line.text),
            }
            .with_date(line.date);
            if line.html {
                draft = draft.as_html();
            }
            self.schedule.submit(at, Effect::Line(draft));
            at = at.saturating_add(EPILOGUE_STEP_MS);
        }
        debug!("epilogue started");
    }

    fn fire_ambient_roll(&mut self) {
        if !self.state.entity_contacted || self.state.game_ended || self.state.epilogue_started {
            // timer tears itself down; a later arm_ambient restarts it
            self.ambient_armed = false;
            return;
        }
        if self.chance.roll() < AMBIENT_CHANCE {
            if self.chance.pick(2) == 0 {
                let phrases = content::ambient_phrases();
                let phrase = phrases[self.chance.pick(phrases.len())];
                self.apply(Action::Append(MessageDraft::entity(phrase)));
                debug!(phrase, "ambient message");
            } else {
                self.window_commands.push(WindowCommand::FocusMessengerIfOpen);
                debug!("ambient focus steal");
            }
        }
        self.schedule
            .submit_in(self.now, AMBIENT_INTERVAL_MS, Effect::AmbientRoll);
    }

    fn arm_ambient(&mut self) {
        if self.ambient_armed {
            return;
        }
        self.ambient_armed = true;
        self.schedule
            .submit_in(self.now, AMBIENT_INTERVAL_MS, Effect::AmbientRoll);
    }

    /// Queue scripted lines with the typing simulation: a fixed lead, then
    /// each gap charged for the length of the line just shown.
    fn schedule_entity_lines(&mut self, lines: &[&'static str]) {
        let mut delay = PLAYBACK_BASE_DELAY_MS;
        for line in lines {
            self.schedule
                .submit_in(self.now, delay, Effect::Line(MessageDraft::entity(*line)));
            delay = delay
                .saturating_add(PLAYBACK_LINE_DELAY_MS)
                .saturating_add(PLAYBACK_PER_CHAR_MS * line.len() as u64);
        }
    }

    fn trigger_haunting(&mut self) {
        const KINDS: [HauntingEvent; 3] = [
            HauntingEvent::Glitch,
            HauntingEvent::ErrorDialog,
            HauntingEvent::SoundCue,
        ];
        let kind = KINDS[self.chance.pick(KINDS.len())];
        self.apply(Action::Merge(StatePatch {
            haunting_event: Some(Some(kind)),
            ..Default::default()
        }));
        if kind == HauntingEvent::ErrorDialog {
            self.apply(Action::Merge(StatePatch {
                fake_error_visible: Some(true),
                ..Default::default()
            }));
            self.schedule
                .submit_in(self.now, FAKE_ERROR_VISIBLE_MS, Effect::ClearFakeError);
        }
        self.schedule
            .submit_in(self.now, HAUNTING_TAG_MS, Effect::ClearHauntingTag);
        debug!(kind = ?kind, "haunting triggered");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("now", &self.now)
            .field("pending", &self.schedule.len())
            .field("node", &self.state.story_node)
            .finish()
    }
}
