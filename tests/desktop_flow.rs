//! Whole-app scenarios: desktop windows reacting to narrative effects.

use ratatui::layout::Rect;

use ghost_desk::app::{App, IconId, Intent};
use ghost_desk::chance::ScriptedChance;
use ghost_desk::constants::{
    DOUBLE_CLICK_MS, FAKE_ERROR_VISIBLE_MS, FIRST_CONTACT_DELAY_MS, HAUNTING_TAG_MS,
};
use ghost_desk::content;
use ghost_desk::game::HauntingEvent;
use ghost_desk::window::WindowKind;

fn viewport() -> Rect {
    Rect::new(0, 0, 100, 30)
}

fn app() -> App {
    App::new(Box::new(ScriptedChance::new()))
}

fn double_click(app: &mut App, icon: IconId, at: u64) {
    app.handle_intent(Intent::Icon(icon), at, viewport());
    app.handle_intent(Intent::Icon(icon), at + DOUBLE_CLICK_MS / 2, viewport());
}

#[test]
fn first_desktop_interaction_summons_the_messenger() {
    let mut a = app();
    double_click(&mut a, IconId::Winamp, 100);
    assert!(a.desktop.is_open(WindowKind::Winamp));
    assert!(!a.desktop.is_open(WindowKind::Messenger));

    let contact = 100 + DOUBLE_CLICK_MS / 2 + FIRST_CONTACT_DELAY_MS;
    a.sync(contact - 1, viewport());
    assert!(!a.desktop.is_open(WindowKind::Messenger));
    a.sync(contact, viewport());
    assert!(a.desktop.is_open(WindowKind::Messenger));
    assert_eq!(a.desktop.focused(), Some(WindowKind::Messenger));
}

#[test]
fn haunted_file_shows_the_fake_error_then_clears_it() {
    let mut chance = ScriptedChance::new();
    chance.push_pick(1); // ErrorDialog
    let mut a = App::new(Box::new(chance));

    a.open_chat_log("log_mom", viewport());
    let state = a.session.state();
    assert_eq!(state.haunting_event, Some(HauntingEvent::ErrorDialog));
    assert!(state.fake_error_visible);

    let t0 = a.session.now();
    a.sync(t0 + HAUNTING_TAG_MS, viewport());
    assert_eq!(a.session.state().haunting_event, None);
    assert!(a.session.state().fake_error_visible);

    a.sync(t0 + FAKE_ERROR_VISIBLE_MS, viewport());
    assert!(!a.session.state().fake_error_visible);

    // a second open of the same file is quiet
    a.open_chat_log("log_mom", viewport());
    assert_eq!(a.session.state().haunting_event, None);
}

#[test]
fn sound_cue_haunting_requests_one_bell() {
    let mut chance = ScriptedChance::new();
    chance.push_pick(2); // SoundCue
    let mut a = App::new(Box::new(chance));

    a.open_text_file("corporate_memo", viewport());
    let t0 = a.session.now();
    a.sync(t0, viewport());
    assert!(a.bell_pending);
    a.bell_pending = false;

    a.sync(t0 + HAUNTING_TAG_MS, viewport());
    assert!(!a.bell_pending);
}

#[test]
fn photo_click_discovers_the_topic() {
    let mut a = app();
    a.open_folder("family_photos", viewport());
    a.handle_intent(Intent::FolderItem(0), 0, viewport());
    assert!(
        a.session
            .state()
            .unlocked_topics
            .contains(&content::TopicId::Kielala)
    );
    // corrupted neighbor is inert
    let before = a.session.state().chat_history.len();
    a.handle_intent(Intent::FolderItem(1), 0, viewport());
    assert_eq!(a.session.state().chat_history.len(), before);
}

#[test]
fn archive_bookmark_swaps_its_label_after_the_diary() {
    let mut a = app();
    let archive_index = content::bookmarks().len() - 1;
    a.handle_intent(Intent::Bookmark(archive_index), 0, viewport());
    assert!(!a.archive_unlocked);

    assert!(a.session.check_diary_password(content::DIARY_PASSWORD));
    a.handle_intent(Intent::Bookmark(archive_index), 0, viewport());
    assert!(a.archive_unlocked);
    assert!(a.session.state().confrontation_ready);
}

#[test]
fn hospital_track_is_the_only_discovering_one() {
    let mut a = app();
    a.handle_intent(Intent::Track(0), 0, viewport());
    a.handle_intent(Intent::Track(1), 0, viewport());
    assert!(a.session.state().unlocked_topics.is_empty());
    a.handle_intent(Intent::Track(2), 0, viewport());
    assert!(
        a.session
            .state()
            .unlocked_topics
            .contains(&content::TopicId::HospitalRecording)
    );
}

#[test]
fn full_ending_locks_the_desktop_to_the_messenger() {
    let mut a = app();
    a.desktop.open(WindowKind::Netscape, viewport());
    a.desktop.open(WindowKind::Winamp, viewport());
    a.session.trigger_end_sequence("the truth".to_string());

    // run far past the crash and into the epilogue
    a.sync(10 * 60_000, viewport());
    assert!(a.session.state().epilogue_started);
    assert!(a.desktop.is_locked());
    assert!(a.desktop.is_open(WindowKind::Messenger));
    assert!(!a.desktop.is_open(WindowKind::Netscape));
    assert!(!a.desktop.is_open(WindowKind::Winamp));

    // the lock refuses opening anything else; the messenger stays live
    a.desktop.open(WindowKind::Netscape, viewport());
    assert!(!a.desktop.is_open(WindowKind::Netscape));
    a.desktop.minimize(WindowKind::Messenger);
    a.desktop.taskbar_activate(WindowKind::Messenger);
    assert_eq!(a.desktop.focused(), Some(WindowKind::Messenger));

    // epilogue clock snaps to the delivered message dates
    let last_date = a
        .session
        .state()
        .chat_history
        .last()
        .and_then(|m| m.date)
        .expect("epilogue messages carry dates");
    assert_eq!(a.clock_label(), last_date);
}

#[test]
fn keywords_file_body_tracks_unlocks() {
    let mut a = app();
    a.session
        .discover_clue(content::TopicId::Y2k, "a warning about the rollover");
    a.open_icon(IconId::Keywords, viewport());
    assert!(a.desktop.is_open(WindowKind::TextViewer));
    assert!(a.viewer.body.contains("Y2K"));
    assert!(a.session.state().opened_files.contains("keywords.txt"));
}
