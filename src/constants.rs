//! Shared crate-wide constants.
//!
//! Every narrative delay lives here, in milliseconds on the session's
//! logical timeline. Tests drive the timeline directly, so these values are
//! asserted against rather than slept on.

/// Height, in terminal rows, of the taskbar strip reserved at the bottom of
/// the viewport. Window positions are clamped so no window overlaps it.
pub const TASKBAR_HEIGHT: u16 = 1;

/// Smallest footprint a desktop window may take after viewport clamping.
pub const MIN_WINDOW_WIDTH: u16 = 16;
pub const MIN_WINDOW_HEIGHT: u16 = 5;

/// Delay before the first line of a scripted response appears.
pub const PLAYBACK_BASE_DELAY_MS: u64 = 500;

/// Flat part of the inter-line typing delay.
pub const PLAYBACK_LINE_DELAY_MS: u64 = 1000;

/// Per-character typing delay charged for the previous line, producing the
/// longer-lines-take-longer illusion.
pub const PLAYBACK_PER_CHAR_MS: u64 = 30;

/// Gap between the first desktop interaction and the messenger making
/// contact on its own.
pub const FIRST_CONTACT_DELAY_MS: u64 = 2000;

/// Delay before the entity starts replying to a dialogue choice.
pub const CHOICE_REPLY_DELAY_MS: u64 = 1200;

/// Fuse on the combined-clue memory fragment.
pub const CLUE_COMBO_DELAY_MS: u64 = 2000;

/// How long the fake system-error dialog stays up.
pub const FAKE_ERROR_VISIBLE_MS: u64 = 2000;

/// How long a haunting event tag stays set before clearing itself.
pub const HAUNTING_TAG_MS: u64 = 500;

/// Interval of the ambient disturbance roll while the entity is active.
pub const AMBIENT_INTERVAL_MS: u64 = 45_000;

/// Probability that one ambient roll produces a disturbance.
pub const AMBIENT_CHANCE: f64 = 0.2;

/// Lead-in before the first end-sequence line is queued.
pub const END_SEQUENCE_LEAD_MS: u64 = 1000;

/// Pause between the last end-sequence line and the crash screen.
pub const END_SEQUENCE_TRAIL_MS: u64 = 2000;

/// Gap between the crash screen appearing and the epilogue taking over.
pub const EPILOGUE_DELAY_MS: u64 = 8000;

/// Delay before the first epilogue message.
pub const EPILOGUE_FIRST_MS: u64 = 3000;

/// Spacing between consecutive epilogue messages.
pub const EPILOGUE_STEP_MS: u64 = 4000;

/// Two presses on the same desktop icon within this window count as a
/// double-click and open the icon.
pub const DOUBLE_CLICK_MS: u64 = 500;
