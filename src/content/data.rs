//! The story itself. Keys are stable ids; bodies are free-form fiction.

use indoc::indoc;

use super::{
    Bookmark, BookmarkAction, ClueId, EpilogueLine, EpilogueSender, FileEntry, Folder,
    FolderEntry, FolderItem, SearchEntry, StoryNode, StoryOption, TimedLine, TopicId, Track,
};

pub fn story_node(id: &str) -> Option<&'static StoryNode> {
    let node = match id {
        "start" => &StoryNode {
            response: &[
                "...",
                "hello?",
                "You can see this, right? The cursor stopped for a second.",
                "I don't get many visitors. Not anymore.",
            ],
            options: &[
                StoryOption {
                    label: "Who is this?",
                    action: "who_are_you",
                },
                StoryOption {
                    label: "Where am I?",
                    action: "where_is_this",
                },
            ],
        },
        "who_are_you" => &StoryNode {
            response: &[
                "IL_Otome99. That's the handle, anyway.",
                "Everyone just calls me Il.",
                "I've been on this machine a long time. The clock in the corner is wrong, by the way. Don't trust it.",
            ],
            options: &[StoryOption {
                label: "Why are you still here?",
                action: "why_still_here",
            }],
        },
        "where_is_this" => &StoryNode {
            response: &[
                "My computer. My room. My everything, these days.",
                "Dad had it shipped from the Otome Media offices. Top of the line, he said.",
                "Look around if you want. The drive isn't locked.",
            ],
            options: &[StoryOption {
                label: "Why are you still here?",
                action: "why_still_here",
            }],
        },
        "why_still_here" => &StoryNode {
            response: &[
                "That's the question, isn't it.",
                "I keep thinking there's something I was supposed to finish before the new year.",
                "The files remember more than I do. Go look. I'll wait.",
            ],
            options: &[],
        },
        "topic_otome_media" => &StoryNode {
            response: &[
                "The family business. Games, merch, a tower downtown with our name on it.",
                "Dad wanted a successor, not a son.",
                "Every memo on this drive reads like a eulogy for my free time.",
            ],
            options: &[],
        },
        "topic_kielala" => &StoryNode {
            response: &[
                "You found him, huh.",
                "Kielala. My little brother. He draws, he's actually good.",
                "He used to sit under my desk while I played, like a cat.",
            ],
            options: &[StoryOption {
                label: "Tell me more about Kielala.",
                action: "ask_more_kielala",
            }],
        },
        "ask_more_kielala" => &StoryNode {
            response: &[
                "He got scared a lot last year. Of the millennium stuff, of the doctors whispering.",
                "So I made him a promise. Once the Y2K thing blew over, just the two of us, anywhere he wanted.",
                "I wrote something for him. It's on this drive, locked. I was going to give it to him in person.",
            ],
            options: &[],
        },
        "topic_hospital_recording" => &StoryNode {
            response: &[
                "You listened to that?",
                "...I recorded it so I'd stop pretending the coughing was nothing.",
                "Didn't work. I kept pretending right up until I couldn't.",
            ],
            options: &[],
        },
        "topic_diary" => &StoryNode {
            response: &[
                "So you saw the locked file.",
                "The password is the only thing on this machine I never wrote down.",
                "It's the promise. The one I made him. If you've been paying attention, you already know it.",
            ],
            options: &[],
        },
        "topic_y2k" => &StoryNode {
            response: &[
                "Everyone thought the computers would die at midnight.",
                "Two digits for the year. Such a small thing to end the world over.",
                "The computers made it through the rollover just fine. Funny, right?",
            ],
            options: &[],
        },
        _ => return None,
    };
    Some(node)
}

pub fn file_entry(id: &str) -> Option<&'static FileEntry> {
    let entry = match id {
        "notes" => &FileEntry {
            title: "Notes.txt",
            body: indoc! {"
                dec 12 - coughing again. hid it from kielala. took double the syrup.
                dec 14 - dad's assistant called about the succession announcement. said yes to everything so he'd hang up.
                dec 18 - doctor wants me admitted over the holidays. told him after new year's. after the promise.
                dec 21 - it's harder to breathe lying down now. sleeping at the desk.
            "},
        },
        "corporate_memo" => &FileEntry {
            title: "Y2K_memo.txt",
            body: indoc! {"
                OTOME MEDIA INTERNAL - Y2K READINESS TASKFORCE

                All division heads will certify rollover compliance by Dec 30.
                The chairman's son will be presented as taskforce lead at the
                shareholder briefing. Ensure he is available for the photo
                session regardless of his, quote, personal scheduling
                conflicts.
            "},
        },
        "sys_config" => &FileEntry {
            title: "sys_config.bak",
            body: indoc! {"
                [boot]
                lastuser=IL_OTOME99
                lastlogin=12/27/1999 21:58
                sessions_since_restart=1
                uptime_days=271

                ; why does this machine never get turned off
            "},
        },
        "log_mom" => &FileEntry {
            title: "mom_log.txt",
            body: indoc! {"
                Mom_O: are you eating? the housekeeper says the trays come back full
                IL_Otome99: i eat. tell her to stop counting
                Mom_O: your father means well. the announcement can be moved
                IL_Otome99: it can't and you know it
                Mom_O: i heard you coughing on the phone yesterday
                IL_Otome99: line was bad. i'm fine, mom.
            "},
        },
        "log_father" => &FileEntry {
            title: "father_log.txt",
            body: indoc! {"
                Chairman_Otome: the board expects you at the briefing.
                IL_Otome99: i'll be there
                Chairman_Otome: no more postponements. the company is older than you and will outlive us both.
                IL_Otome99: understood
                Chairman_Otome: and get that cough seen to. it was audible in the conference room.
                IL_Otome99: yes sir
            "},
        },
        "log_kielala" => &FileEntry {
            title: "kielala_log.txt",
            body: indoc! {"
                Kielala_O: bro the computers are gonna explode at new years right
                IL_Otome99: they are not going to explode
                Kielala_O: sora at school said planes will fall
                IL_Otome99: sora is wrong. listen. after new years, you and me. anywhere you want.
                Kielala_O: PROMISE??
                IL_Otome99: promise. write it down so i can't take it back
                Kielala_O: i'm drawing it instead!!!
            "},
        },
        "draft_email" => &FileEntry {
            title: "draft_email.txt",
            body: indoc! {"
                To: chairman@otomemedia.co.jp
                Subject: (no subject)

                Dad. I'm sick. Not the kind that waits for a convenient
                quarter. I keep starting this email and deleting it because

                [draft - never sent]
            "},
        },
        "dev_log" => &FileEntry {
            title: "DEV_LOG.txt",
            body: indoc! {"
                GHOST.SYS maintenance log

                12/26 23:41 - memory residue detected in sector 7. not scrubbing it.
                12/27 02:13 - messenger daemon restarted itself. again.
                12/27 02:14 - it's waiting for someone to log on.
                12/27 09:00 - if you are reading this, you are the someone.
            "},
        },
        "keyword_research" => &FileEntry {
            title: "keyword_research.txt",
            body: indoc! {"
                The Search tool indexes this whole system.

                Type anything into Start > Search. If a logged keyword appears
                anywhere in your query, the indexed page will surface. Topics
                you unlock get logged to keywords.txt automatically.
            "},
        },
        _ => return None,
    };
    Some(entry)
}

/// Ordered index: the first key contained in the query wins.
pub fn search_index() -> &'static [(&'static str, SearchEntry)] {
    &[
        (
            "y2k",
            SearchEntry {
                title: "The Y2K Bug - What We Know",
                body: indoc! {"
                    As 1999 ends, experts disagree on whether two-digit year
                    fields will cripple global infrastructure. Authorities
                    recommend stockpiling water, cash, and patience. Most
                    engineers insist the rollover will pass without incident.
                "},
            },
        ),
        (
            "otome",
            SearchEntry {
                title: "Otome Media Corporation",
                body: indoc! {"
                    Entertainment conglomerate, est. 1961. Games, publishing,
                    character merchandise. Chairman Otome has named his eldest
                    son heir apparent; the announcement is expected at the
                    December shareholder briefing.
                "},
            },
        ),
        (
            "kielala",
            SearchEntry {
                title: "Kielala's Art Page - GeoCities",
                body: indoc! {"
                    doodles!! mostly game stuff. my big bro says i should
                    charge money but he has to say that. NEW: a drawing of the
                    trip we're taking after new years!! (it's a secret where)
                "},
            },
        ),
        (
            "hospital",
            SearchEntry {
                title: "St. Aerith General - Visiting Hours",
                body: indoc! {"
                    Pulmonary ward visiting hours are suspended over the
                    holiday period for all non-family visitors.
                "},
            },
        ),
    ]
}

pub fn folder(id: &str) -> Option<&'static Folder> {
    let folder = match id {
        "drive_c" => &Folder {
            title: "Local Disk (C:)",
            entries: &[
                FolderEntry {
                    label: "My Documents",
                    item: FolderItem::Folder("my_docs"),
                },
                FolderEntry {
                    label: "WINDOWS",
                    item: FolderItem::Folder("windows_folder"),
                },
            ],
        },
        "my_docs" => &Folder {
            title: "My Documents",
            entries: &[
                FolderEntry {
                    label: "Chat_Logs",
                    item: FolderItem::Folder("chat_logs"),
                },
                FolderEntry {
                    label: "Family_Photos",
                    item: FolderItem::Folder("family_photos"),
                },
                FolderEntry {
                    label: "Notes.txt",
                    item: FolderItem::TextFile("notes"),
                },
                FolderEntry {
                    label: "Y2K_memo.txt",
                    item: FolderItem::TextFile("corporate_memo"),
                },
            ],
        },
        "windows_folder" => &Folder {
            title: "WINDOWS",
            entries: &[FolderEntry {
                label: "sys_config.bak",
                item: FolderItem::TextFile("sys_config"),
            }],
        },
        "chat_logs" => &Folder {
            title: "Chat_Logs",
            entries: &[
                FolderEntry {
                    label: "mom_log.txt",
                    item: FolderItem::ChatLog("log_mom"),
                },
                FolderEntry {
                    label: "father_log.txt",
                    item: FolderItem::ChatLog("log_father"),
                },
                FolderEntry {
                    label: "kielala_log.txt",
                    item: FolderItem::ChatLog("log_kielala"),
                },
                FolderEntry {
                    label: "draft_email.txt",
                    item: FolderItem::TextFile("draft_email"),
                },
            ],
        },
        "family_photos" => &Folder {
            title: "Family_Photos",
            entries: &[
                FolderEntry {
                    label: "kielala_and_me.jpg",
                    item: FolderItem::Photo {
                        topic: TopicId::Kielala,
                        flavor: "An image of two young boys. The filename is kielala_and_me.jpg.",
                    },
                },
                FolderEntry {
                    label: "family_vacation_98.jpg (Corrupted)",
                    item: FolderItem::Corrupted,
                },
            ],
        },
        _ => return None,
    };
    Some(folder)
}

pub fn bookmarks() -> &'static [Bookmark] {
    &[
        Bookmark {
            label: "Otome Media Corporate Site",
            unlocked_label: None,
            action: BookmarkAction::Discover {
                topic: TopicId::OtomeMedia,
                flavor: "GeoCities site: OtomeMedia.com. A corporate nightmare of buzzwords.",
            },
        },
        Bookmark {
            label: "Kielala's Art Page",
            unlocked_label: None,
            action: BookmarkAction::Discover {
                topic: TopicId::Kielala,
                flavor: "GeoCities site: Kielala's Art Page. Mostly video game doodles.",
            },
        },
        Bookmark {
            label: "News Archive: December 1999 (Archive Damaged)",
            unlocked_label: Some("Otome Media Scion, Illmimi Otome, Dies. Dec 28th, 1999."),
            action: BookmarkAction::NewsArchive,
        },
    ]
}

pub fn playlist() -> &'static [Track] {
    &[
        Track {
            label: "techno_mix_98.mid",
            discover: None,
        },
        Track {
            label: "gaming_anthem.mid",
            discover: None,
        },
        Track {
            label: "Hospital_Recording_Final.mp3",
            discover: Some((
                TopicId::HospitalRecording,
                "You hear the faint beeping of a heart monitor and painful, suppressed coughing.",
            )),
        },
    ]
}

/// Files whose first opening disturbs the machine.
pub fn haunted_files() -> &'static [&'static str] {
    &["log_mom", "corporate_memo"]
}

/// Clues granted by reading specific files.
pub fn clue_for_file(id: &str) -> Option<ClueId> {
    match id {
        "notes" => Some(ClueId::Sickness),
        "log_father" => Some(ClueId::Stress),
        _ => None,
    }
}

pub fn ambient_phrases() -> &'static [&'static str] {
    &["...", "Why?", "Kielala..."]
}

/// The entity's last words; each line's delay is the pause *after* it.
pub fn end_sequence() -> &'static [TimedLine] {
    &[
        TimedLine {
            text: "What is this joke?",
            delay_ms: 4000,
        },
        TimedLine {
            text: "That's impossible. The new millennium hasn't even started.",
            delay_ms: 3000,
        },
        TimedLine {
            text: "Y2K didn't break the computers.",
            delay_ms: 3000,
        },
        TimedLine {
            text: "It broke... me?",
            delay_ms: 4000,
        },
        TimedLine {
            text: "...",
            delay_ms: 5000,
        },
        TimedLine {
            text: "Tell Kielala... I'm sorry.",
            delay_ms: 4000,
        },
    ]
}

pub fn epilogue_script() -> &'static [EpilogueLine] {
    &[
        EpilogueLine {
            sender: EpilogueSender::Sibling,
            text: "bro? are you there?",
            date: "01/01/2000",
            html: false,
        },
        EpilogueLine {
            sender: EpilogueSender::Sibling,
            text: "i miss you.",
            date: "07/07/2000",
            html: false,
        },
        EpilogueLine {
            sender: EpilogueSender::Sibling,
            text: "happy birthday big bro. i drew you something.<br><img src=\"for_il.jpg\" alt=\"drawing\">",
            date: "07/07/2001",
            html: true,
        },
        EpilogueLine {
            sender: EpilogueSender::Sibling,
            text: "i wish you were here",
            date: "12/28/2001",
            html: false,
        },
        EpilogueLine {
            sender: EpilogueSender::Sibling,
            text: "i still think about your promise. i'm trying to be strong.",
            date: "05/15/2002",
            html: false,
        },
        EpilogueLine {
            sender: EpilogueSender::Sibling,
            text: "happy birthday illmimi",
            date: "07/07/2002",
            html: false,
        },
        EpilogueLine {
            sender: EpilogueSender::System,
            text: "...<br>...<br>USER NOT FOUND",
            date: "...",
            html: true,
        },
    ]
}

/// Word bank for the assembled confrontation message, in display order.
pub const FINAL_WORDS: &[&str] = &[
    "Otome", "Media", "Scion,", "Illmimi", "Otome,", "Dies", "of", "Rare", "Pulmonary",
    "Illness.",
];

/// Surfaces once both the sickness and stress clues have been collected.
pub const FRAGMENT_NOTICE: &str = "System Memory Cache Purge... ERROR. Fragment Found: [A vision of a dark room. The sound of a keyboard clicking furiously, interrupted by a painful, racking cough. The screen flickers. The promise must be kept...]";

pub const DIARY_UNLOCKED_NOTICE: &str = "Diary Unlocked. The file contains an unsent letter.";

pub const ARCHIVE_SUCCESS_NOTICE: &str =
    "You piece the clues together. The final truth is unlocked.";

pub const ARCHIVE_ERROR_NOTICE: &str =
    "ERROR 404: Archive damaged. You need more information to access this page.";

pub const DIARY_PASSWORD: &str = "K1elala_my_pr0m1s3";

pub const DIARY_LETTER: &str = indoc! {"
    To Kielala,

    If you're reading this, it means I messed up. The doctors keep saying
    things I don't understand... It's hard to breathe. I'm supposed to be
    the strong one... but I'm just tired. The coughing won't stop. I'm
    sorry if I was ever too hard on you. I just wanted you to be safe.
    Wait for me. Once this Y2K bug is over, we'll...
"};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_option_targets_an_existing_node() {
        let roots = [
            "start",
            "who_are_you",
            "where_is_this",
            "why_still_here",
            "topic_otome_media",
            "topic_kielala",
            "ask_more_kielala",
            "topic_hospital_recording",
            "topic_diary",
            "topic_y2k",
        ];
        for id in roots {
            let node = story_node(id).expect(id);
            for opt in node.options {
                assert!(story_node(opt.action).is_some(), "dangling: {}", opt.action);
            }
        }
    }

    #[test]
    fn every_topic_chip_has_a_backing_node() {
        for topic in TopicId::ALL {
            assert!(story_node(topic.node_id()).is_some());
        }
    }

    #[test]
    fn folder_tree_references_resolve() {
        for folder_id in ["drive_c", "my_docs", "windows_folder", "chat_logs", "family_photos"] {
            let f = folder(folder_id).expect(folder_id);
            for entry in f.entries {
                match entry.item {
                    FolderItem::Folder(id) => assert!(folder(id).is_some(), "folder {id}"),
                    FolderItem::TextFile(id) | FolderItem::ChatLog(id) => {
                        assert!(file_entry(id).is_some(), "file {id}")
                    }
                    FolderItem::Photo { .. } | FolderItem::Corrupted => {}
                }
            }
        }
    }

    #[test]
    fn haunted_files_exist_in_the_file_table() {
        for id in haunted_files() {
            assert!(file_entry(id).is_some(), "haunted file {id}");
        }
    }

    #[test]
    fn search_index_contains_the_y2k_key() {
        assert!(search_index().iter().any(|(key, _)| *key == "y2k"));
    }
}
