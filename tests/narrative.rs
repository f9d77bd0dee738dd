//! Scenario tests for the narrative session, driven entirely on the
//! logical millisecond timeline.

use ghost_desk::chance::ScriptedChance;
use ghost_desk::constants::{
    AMBIENT_INTERVAL_MS, CHOICE_REPLY_DELAY_MS, CLUE_COMBO_DELAY_MS, END_SEQUENCE_LEAD_MS,
    END_SEQUENCE_TRAIL_MS, EPILOGUE_DELAY_MS, EPILOGUE_FIRST_MS, EPILOGUE_STEP_MS,
    FIRST_CONTACT_DELAY_MS, PLAYBACK_BASE_DELAY_MS, PLAYBACK_LINE_DELAY_MS, PLAYBACK_PER_CHAR_MS,
};
use ghost_desk::content::{self, ClueId, TopicId};
use ghost_desk::game::{Choice, Sender, Session, WindowCommand};

fn session() -> Session {
    Session::new(Box::new(ScriptedChance::new()))
}

/// Advance past first contact and the whole greeting playback.
fn contacted_session() -> Session {
    let mut s = session();
    s.note_first_interaction();
    s.advance_to(60_000);
    s.take_window_commands();
    s
}

#[test]
fn first_contact_lands_after_the_delay_and_opens_the_messenger() {
    let mut s = session();
    s.note_first_interaction();

    s.advance_to(FIRST_CONTACT_DELAY_MS - 1);
    assert!(!s.state().entity_contacted);
    assert!(s.take_window_commands().is_empty());

    s.advance_to(FIRST_CONTACT_DELAY_MS);
    assert!(s.state().entity_contacted);
    assert_eq!(s.take_window_commands(), vec![WindowCommand::OpenMessenger]);
    // greeting lines are queued but not yet delivered
    assert!(s.state().chat_history.is_empty());
}

#[test]
fn greeting_playback_charges_per_character_of_the_previous_line() {
    let greeting = content::story_node("start").expect("start node").response;
    assert!(greeting.len() >= 2);

    let mut s = session();
    s.note_first_interaction();
    let contact = FIRST_CONTACT_DELAY_MS;
    let first_line_at = contact + PLAYBACK_BASE_DELAY_MS;
    let second_line_at =
        first_line_at + PLAYBACK_LINE_DELAY_MS + PLAYBACK_PER_CHAR_MS * greeting[0].len() as u64;

    s.advance_to(first_line_at - 1);
    assert!(s.state().chat_history.is_empty());
    s.advance_to(first_line_at);
    assert_eq!(s.state().chat_history.len(), 1);
    assert_eq!(s.state().chat_history[0].text, greeting[0]);
    assert_eq!(s.state().chat_history[0].kind, Sender::Entity);

    s.advance_to(second_line_at - 1);
    assert_eq!(s.state().chat_history.len(), 1);
    s.advance_to(second_line_at);
    assert_eq!(s.state().chat_history.len(), 2);
}

#[test]
fn first_interaction_is_a_one_shot() {
    let mut s = session();
    s.note_first_interaction();
    s.note_first_interaction();
    s.advance_to(120_000);
    let greeting = content::story_node("start").expect("start node").response;
    let entity_lines = s
        .state()
        .chat_history
        .iter()
        .filter(|m| m.kind == Sender::Entity)
        .count();
    assert_eq!(entity_lines, greeting.len());
}

#[test]
fn choices_echo_immediately_and_replies_arrive_late() {
    let mut s = contacted_session();
    let t0 = s.now();
    let before = s.state().chat_history.len();
    s.select_choice(Choice {
        label: "Who are you?",
        action: "who_are_you",
    });
    assert_eq!(s.state().chat_history.len(), before + 1);
    assert_eq!(s.state().chat_history[before].kind, Sender::Player);
    assert_eq!(s.state().story_node, "who_are_you");

    let reply = content::story_node("who_are_you").expect("node").response;
    let first_reply_at = t0 + CHOICE_REPLY_DELAY_MS + PLAYBACK_BASE_DELAY_MS;
    s.advance_to(first_reply_at - 1);
    assert_eq!(s.state().chat_history.len(), before + 1);
    s.advance_to(first_reply_at);
    assert_eq!(s.state().chat_history[before + 1].text, reply[0]);
}

#[test]
fn topic_choices_retire_their_chip() {
    let mut s = contacted_session();
    s.discover_clue(TopicId::Kielala, "a photo of two kids");
    assert!(
        s.available_choices()
            .iter()
            .any(|c| c.action == "topic_kielala")
    );
    s.select_choice(Choice {
        label: "[Kielala]",
        action: "topic_kielala",
    });
    assert!(s.state().discussed_topics.contains("topic_kielala"));
    assert!(
        !s.available_choices()
            .iter()
            .any(|c| c.action == "topic_kielala")
    );
}

#[test]
fn asking_more_about_kielala_mentions_the_promise() {
    let mut s = contacted_session();
    let t0 = s.now();
    s.select_choice(Choice {
        label: "Tell me more.",
        action: "ask_more_kielala",
    });
    assert!(!s.state().promise_mentioned);
    s.advance_to(t0 + CHOICE_REPLY_DELAY_MS);
    assert!(s.state().promise_mentioned);
}

#[test]
fn discover_clue_unlocks_once_with_two_system_messages() {
    let mut s = contacted_session();
    let before = s.state().chat_history.len();
    s.discover_clue(TopicId::OtomeMedia, "A corporate nightmare of buzzwords.");
    assert_eq!(s.state().chat_history.len(), before + 2);
    assert!(
        s.state()
            .chat_history
            .last()
            .is_some_and(|m| m.text.contains("[Otome Media]"))
    );
    assert!(s.state().keywords_unlocked);

    s.discover_clue(TopicId::OtomeMedia, "A corporate nightmare of buzzwords.");
    assert_eq!(s.state().chat_history.len(), before + 2);
}

#[test]
fn search_matches_substring_keys_and_unlocks_y2k_once() {
    let mut s = contacted_session();
    let before = s.state().chat_history.len();
    let hit = s.search("  Y2K info please ");
    assert!(hit.is_some());
    assert!(s.state().unlocked_topics.contains(&TopicId::Y2k));
    assert_eq!(s.state().chat_history.len(), before + 1);

    // second hit on the same key is quiet
    assert!(s.search("y2k").is_some());
    assert_eq!(s.state().chat_history.len(), before + 1);

    assert!(s.search("nothing relevant").is_none());
    assert!(s.search("   ").is_none());
}

#[test]
fn diary_password_is_exact_and_single_use() {
    let mut s = contacted_session();
    assert!(!s.check_diary_password("wrong"));
    assert!(!s.state().diary_read);
    assert!(!s.check_diary_password(&content::DIARY_PASSWORD.to_lowercase()));
    assert!(s.check_diary_password(content::DIARY_PASSWORD));
    assert!(s.state().diary_read);

    let after_unlock = s.state().chat_history.len();
    assert!(s.check_diary_password(content::DIARY_PASSWORD));
    assert_eq!(s.state().chat_history.len(), after_unlock);
}

#[test]
fn news_archive_gates_on_the_diary() {
    let mut s = contacted_session();
    let before = s.state().chat_history.len();
    assert!(!s.access_news_archive());
    assert_eq!(
        s.state().chat_history.last().map(|m| m.text.as_str()),
        Some(content::ARCHIVE_ERROR_NOTICE)
    );

    assert!(s.check_diary_password(content::DIARY_PASSWORD));
    assert!(s.access_news_archive());
    assert!(s.state().confrontation_ready);
    assert_eq!(
        s.state().chat_history.last().map(|m| m.text.as_str()),
        Some(content::ARCHIVE_SUCCESS_NOTICE)
    );

    // repeat visits are quiet successes
    let len = s.state().chat_history.len();
    assert!(s.access_news_archive());
    assert_eq!(s.state().chat_history.len(), len);
    assert!(len > before);
}

#[test]
fn combining_both_clues_reveals_the_fragment_once() {
    let mut s = contacted_session();
    s.collect_clue(ClueId::Sickness);
    let t0 = s.now();
    s.collect_clue(ClueId::Stress);
    assert!(s.state().fragment_revealed);

    s.advance_to(t0 + CLUE_COMBO_DELAY_MS);
    let fragments = s
        .state()
        .chat_history
        .iter()
        .filter(|m| m.text == content::FRAGMENT_NOTICE)
        .count();
    assert_eq!(fragments, 1);

    // re-collecting cannot arm a second reveal
    s.collect_clue(ClueId::Sickness);
    s.advance_to(t0 + 10 * CLUE_COMBO_DELAY_MS);
    let fragments = s
        .state()
        .chat_history
        .iter()
        .filter(|m| m.text == content::FRAGMENT_NOTICE)
        .count();
    assert_eq!(fragments, 1);
}

#[test]
fn end_sequence_runs_the_script_then_crashes_then_epilogue() {
    let mut s = contacted_session();
    let t0 = s.now();
    s.trigger_end_sequence("Otome Media Scion".to_string());
    assert!(s.state().game_ended);
    let before = s.state().chat_history.len();

    // second trigger is ignored
    s.trigger_end_sequence("again".to_string());
    assert_eq!(s.state().chat_history.len(), before);

    // each line lands after the scripted offset plus the playback lead
    let script = content::end_sequence();
    let mut at = t0 + END_SEQUENCE_LEAD_MS;
    for (index, line) in script.iter().enumerate() {
        let line_at = at + PLAYBACK_BASE_DELAY_MS;
        s.advance_to(line_at - 1);
        assert_eq!(s.state().chat_history.len(), before + index);
        s.advance_to(line_at);
        assert_eq!(
            s.state().chat_history.last().map(|m| m.text.as_str()),
            Some(line.text)
        );
        at += line.delay_ms;
    }

    let crash_at = at + END_SEQUENCE_TRAIL_MS;
    s.advance_to(crash_at - 1);
    assert!(!s.state().crash_active);
    s.advance_to(crash_at);
    assert!(s.state().crash_active);

    let epilogue_at = crash_at + EPILOGUE_DELAY_MS;
    s.advance_to(epilogue_at);
    assert!(s.state().epilogue_started);
    assert!(!s.state().crash_active);
    assert!(!s.state().game_ended);
    assert!(s.state().chat_history.is_empty());
    assert!(
        s.take_window_commands()
            .contains(&WindowCommand::LockToMessenger)
    );

    let epilogue = content::epilogue_script();
    let mut due = epilogue_at + EPILOGUE_FIRST_MS;
    for (index, line) in epilogue.iter().enumerate() {
        s.advance_to(due);
        assert_eq!(s.state().chat_history.len(), index + 1);
        assert_eq!(
            s.state().chat_history.last().map(|m| m.text.as_str()),
            Some(line.text)
        );
        assert_eq!(s.state().chat_history.last().and_then(|m| m.date), Some(line.date));
        due += EPILOGUE_STEP_MS;
    }
    // ids keep increasing across the history reset
    let ids: Vec<u64> = s.state().chat_history.iter().map(|m| m.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert!(ids[0] > 0);
}

#[test]
fn coarse_advances_keep_cascaded_delays_exact() {
    let mut s = contacted_session();
    let t0 = s.now();
    s.trigger_end_sequence("the truth".to_string());
    let total: u64 = content::end_sequence().iter().map(|l| l.delay_ms).sum();
    let crash_at = t0 + END_SEQUENCE_LEAD_MS + total + END_SEQUENCE_TRAIL_MS;

    // one jump to just short of the epilogue deadline: the crash timer must
    // have measured its follow-up from its own due tick, not from the jump
    s.advance_to(crash_at + EPILOGUE_DELAY_MS - 1);
    assert!(s.state().crash_active);
    assert!(!s.state().epilogue_started);
    s.advance_to(crash_at + EPILOGUE_DELAY_MS);
    assert!(s.state().epilogue_started);
}

#[test]
fn ambient_roll_can_whisper_a_phrase() {
    let mut chance = ScriptedChance::new();
    chance.push_roll(0.1);
    chance.push_pick(0); // message branch
    chance.push_pick(2); // third phrase
    let mut s = Session::new(Box::new(chance));
    s.note_first_interaction();
    s.advance_to(FIRST_CONTACT_DELAY_MS);
    let contact = FIRST_CONTACT_DELAY_MS;
    s.advance_to(contact + 30_000);
    let before = s.state().chat_history.len();

    s.advance_to(contact + AMBIENT_INTERVAL_MS);
    let phrases = content::ambient_phrases();
    assert_eq!(
        s.state().chat_history.last().map(|m| m.text.as_str()),
        Some(phrases[2])
    );
    assert_eq!(s.state().chat_history.len(), before + 1);

    // dry script: the next interval rolls 1.0 and stays quiet
    s.advance_to(contact + 2 * AMBIENT_INTERVAL_MS);
    assert_eq!(s.state().chat_history.len(), before + 1);
}

#[test]
fn ambient_roll_can_steal_focus_instead() {
    let mut chance = ScriptedChance::new();
    chance.push_roll(0.1);
    chance.push_pick(1); // focus branch
    let mut s = Session::new(Box::new(chance));
    s.note_first_interaction();
    s.advance_to(FIRST_CONTACT_DELAY_MS);
    s.take_window_commands();

    s.advance_to(FIRST_CONTACT_DELAY_MS + AMBIENT_INTERVAL_MS);
    assert!(
        s.take_window_commands()
            .contains(&WindowCommand::FocusMessengerIfOpen)
    );
}

#[test]
fn ambient_timer_tears_down_after_the_game_ends() {
    let mut chance = ScriptedChance::new();
    // would fire on every interval if the timer survived
    for _ in 0..8 {
        chance.push_roll(0.0);
        chance.push_pick(0);
        chance.push_pick(0);
    }
    let mut s = Session::new(Box::new(chance));
    s.note_first_interaction();
    s.advance_to(FIRST_CONTACT_DELAY_MS);
    s.trigger_end_sequence("done".to_string());
    let t = s.now();

    s.advance_to(t + 4 * AMBIENT_INTERVAL_MS);
    let whispers = s
        .state()
        .chat_history
        .iter()
        .filter(|m| content::ambient_phrases().contains(&m.text.as_str()))
        .count();
    assert_eq!(whispers, 0);
}
